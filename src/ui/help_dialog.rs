use glib::Propagation;
use gtk4::{
    gdk::Key,
    prelude::{BoxExt, ButtonExt, GtkWindowExt, WidgetExt},
    ApplicationWindow, EventControllerKey, Label,
};

use crate::model::MISMATCH_PENALTY;

/// "How to Play" window opened from the header bar.
pub struct HelpDialog;

impl HelpDialog {
    fn topic(content_area: &gtk4::Box, heading: &str, text: &str) {
        let heading_label = Label::new(None);
        heading_label.set_markup(&format!("<b>{}</b>", heading));
        heading_label.set_halign(gtk4::Align::Start);
        content_area.append(&heading_label);

        let text_label = Label::new(Some(text));
        text_label.set_wrap(true);
        text_label.set_max_width_chars(48);
        text_label.set_halign(gtk4::Align::Start);
        content_area.append(&text_label);
    }

    pub fn show(window: &ApplicationWindow) {
        let content_area = gtk4::Box::builder()
            .orientation(gtk4::Orientation::Vertical)
            .spacing(10)
            .margin_bottom(20)
            .margin_top(20)
            .margin_start(20)
            .margin_end(20)
            .build();
        let dialog = gtk4::Window::builder()
            .title("How to Play")
            .transient_for(window)
            .child(&content_area)
            .modal(true)
            .build();

        Self::topic(
            &content_area,
            "Matching",
            "Flip two cards at a time and find every pair before the clock runs out. \
             Consecutive matches raise your combo multiplier.",
        );
        Self::topic(
            &content_area,
            "Time Management",
            &format!(
                "Match cards quickly! Wrong matches deduct {} seconds.",
                MISMATCH_PENALTY.as_secs()
            ),
        );
        Self::topic(
            &content_area,
            "Daily Challenges",
            "Win a game to complete the daily challenge (resets every day).",
        );

        let play_button = gtk4::Button::builder()
            .label("Let's Play!")
            .css_classes(["suggested-action"])
            .build();
        play_button.connect_clicked({
            let dialog = dialog.clone();
            move |_| dialog.close()
        });
        content_area.append(&play_button);

        let key_controller = EventControllerKey::new();
        key_controller.connect_key_pressed({
            let dialog = dialog.clone();
            move |_, keyval, _, _| {
                if keyval == Key::Escape {
                    dialog.close();
                    return Propagation::Stop;
                }
                Propagation::Proceed
            }
        });
        dialog.add_controller(key_controller);

        dialog.present();
    }
}
