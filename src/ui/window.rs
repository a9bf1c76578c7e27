use gtk4::gdk::Display;
use gtk4::{
    prelude::*, Application, ApplicationWindow, Button, CssProvider, DropDown, Entry, HeaderBar,
    Label, Orientation, ToggleButton, STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::Cell;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::Channel;
use crate::game::clock::SystemClock;
use crate::game::game_engine::GameEngine;
use crate::game::repository::Repository;
use crate::game::settings::Settings;
use crate::game::storage::FileStore;
use crate::model::{Category, Difficulty, GameEngineCommand, GameEngineEvent, GamePhase};

use super::card_grid_ui::CardGridUI;
use super::completion_banner_ui::CompletionBannerUI;
use super::game_info_ui::GameInfoUI;
use super::help_dialog::HelpDialog;
use super::media_sound_player::MediaSoundPlayer;
use super::session_timer::SessionTimer;
use super::stats_dialog::StatsDialog;

const STYLE: &str = "
.card { font-size: 32px; }
.card.flipped { background: #fff7d6; }
.card.matched { background: #c8f7c5; }
.timer.running-out { color: #c01c28; font-weight: bold; }
.daily-challenge.completed { color: #26a269; }
.completion-banner { padding: 12px; }
.completion-title { font-size: 24px; font-weight: bold; }
.completion-title.won { color: #26a269; }
.completion-title.lost { color: #c01c28; }
.highlight-score { font-weight: bold; color: #1c71d8; }
";

fn data_dir() -> PathBuf {
    Settings::data_dir_from_env().unwrap_or_else(|| glib::user_data_dir().join("flippy"))
}

/// `sounds/` next to the executable when installed, else relative to the
/// working directory.
fn sounds_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("sounds")))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("sounds"))
}

fn labelled(label: &str, widget: &impl IsA<gtk4::Widget>) -> gtk4::Box {
    let hbox = gtk4::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(5)
        .build();
    hbox.append(&Label::new(Some(label)));
    hbox.append(widget);
    hbox
}

fn dropdown(items: &[String]) -> DropDown {
    DropDown::from_strings(&items.iter().map(String::as_str).collect::<Vec<&str>>())
}

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_string(STYLE);
    match Display::default() {
        Some(display) => gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => log::warn!(target: "window", "No display; skipping styles"),
    }
}

pub fn build_ui(app: &Application) {
    let (game_engine_command_emitter, game_engine_command_observer) =
        Channel::<GameEngineCommand>::new();
    let (game_engine_event_emitter, game_engine_event_observer) =
        Channel::<GameEngineEvent>::new();

    let store = FileStore::new(data_dir());
    log::info!(target: "window", "Storing records in {}", store.data_dir().display());
    let repository = Repository::new(store);

    let engine = GameEngine::new(
        game_engine_command_observer,
        game_engine_event_emitter,
        repository,
        Rc::new(SystemClock),
        Rc::new(MediaSoundPlayer::new(sounds_dir())),
    );

    load_css();

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Flippy")
        .resizable(true)
        .default_width(720)
        .default_height(640)
        .build();

    // Header controls. Initial values come from the engine before any signal
    // is connected; `syncing` keeps engine-driven updates from echoing back
    // as commands.
    let syncing = Rc::new(Cell::new(false));
    let header_bar = HeaderBar::new();

    let difficulty_selector = dropdown(
        &Difficulty::all()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<String>>(),
    );
    difficulty_selector.set_tooltip_text(Some("Select Difficulty"));
    let category_selector = dropdown(
        &Category::all()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>(),
    );
    category_selector.set_tooltip_text(Some("Select Category"));
    let name_entry = Entry::builder()
        .placeholder_text("Your name")
        .width_chars(12)
        .build();
    let mute_button = ToggleButton::builder()
        .icon_name("audio-volume-high-symbolic")
        .tooltip_text("Mute")
        .build();
    {
        let engine = engine.borrow();
        difficulty_selector.set_selected(engine.settings().difficulty.index() as u32);
        category_selector.set_selected(engine.stats().category().index() as u32);
        name_entry.set_text(engine.stats().player_name());
        mute_button.set_active(engine.settings().muted);
    }

    difficulty_selector.connect_selected_notify({
        let emitter = game_engine_command_emitter.clone();
        let syncing = syncing.clone();
        move |selector| {
            if !syncing.get() {
                let difficulty = Difficulty::from_index(selector.selected() as usize);
                emitter.emit(GameEngineCommand::ChangeDifficulty(difficulty));
            }
        }
    });
    category_selector.connect_selected_notify({
        let emitter = game_engine_command_emitter.clone();
        let syncing = syncing.clone();
        move |selector| {
            if !syncing.get() {
                let category = Category::from_index(selector.selected() as usize);
                emitter.emit(GameEngineCommand::ChangeCategory(category));
            }
        }
    });
    name_entry.connect_changed({
        let emitter = game_engine_command_emitter.clone();
        let syncing = syncing.clone();
        move |entry| {
            if !syncing.get() {
                emitter.emit(GameEngineCommand::SetPlayerName(entry.text().to_string()));
            }
        }
    });
    mute_button.connect_toggled({
        let emitter = game_engine_command_emitter.clone();
        let syncing = syncing.clone();
        move |button| {
            if !syncing.get() {
                emitter.emit(GameEngineCommand::SetMuted(button.is_active()));
            }
        }
    });

    let header_sync = game_engine_event_observer.subscribe({
        let difficulty_selector = difficulty_selector.clone();
        let category_selector = category_selector.clone();
        let name_entry = name_entry.clone();
        let mute_button = mute_button.clone();
        let syncing = syncing.clone();
        let locked_controls: [gtk4::Widget; 3] = [
            difficulty_selector.clone().upcast(),
            category_selector.clone().upcast(),
            name_entry.clone().upcast(),
        ];
        // setup is fixed for the length of a game
        let set_locked = move |locked: bool| {
            for control in &locked_controls {
                control.set_sensitive(!locked);
            }
        };
        move |event| {
            syncing.set(true);
            match event {
                GameEngineEvent::SettingsChanged(settings) => {
                    let index = settings.difficulty.index() as u32;
                    if difficulty_selector.selected() != index {
                        difficulty_selector.set_selected(index);
                    }
                    if mute_button.is_active() != settings.muted {
                        mute_button.set_active(settings.muted);
                    }
                    mute_button.set_icon_name(if settings.muted {
                        "audio-volume-muted-symbolic"
                    } else {
                        "audio-volume-high-symbolic"
                    });
                }
                GameEngineEvent::CategoryChanged(category) => {
                    let index = category.index() as u32;
                    if category_selector.selected() != index {
                        category_selector.set_selected(index);
                    }
                }
                GameEngineEvent::PlayerNameChanged(name) => {
                    if name_entry.text().as_str() != name.as_str() {
                        name_entry.set_text(name);
                    }
                }
                GameEngineEvent::TimerStarted(_) => set_locked(true),
                GameEngineEvent::TimerStopped(_) => set_locked(false),
                GameEngineEvent::SessionUpdated(session) if session.phase == GamePhase::Idle => {
                    set_locked(false)
                }
                _ => {}
            }
            syncing.set(false);
        }
    });

    let new_game_button = Button::with_label("New Game");
    new_game_button.connect_clicked({
        let emitter = game_engine_command_emitter.clone();
        move |_| emitter.emit(GameEngineCommand::NewGame(None))
    });

    let show_scores: Rc<dyn Fn()> = Rc::new({
        let engine = engine.clone();
        let window = window.clone();
        move || {
            let engine = engine.borrow();
            let current = engine
                .session()
                .is_over()
                .then(|| engine.playthrough_id());
            StatsDialog::show(
                &window,
                engine.stats(),
                engine.session().difficulty,
                current,
            );
        }
    });
    let scores_button = Button::with_label("Scores");
    scores_button.connect_clicked({
        let show_scores = show_scores.clone();
        move |_| show_scores()
    });

    let help_button = Button::from_icon_name("help-about-symbolic");
    help_button.set_tooltip_text(Some("How to Play"));
    help_button.connect_clicked({
        let window = window.clone();
        move |_| HelpDialog::show(&window)
    });

    header_bar.pack_start(&labelled("Difficulty:", &difficulty_selector));
    header_bar.pack_start(&labelled("Category:", &category_selector));
    header_bar.pack_end(&help_button);
    header_bar.pack_end(&scores_button);
    header_bar.pack_end(&new_game_button);
    header_bar.pack_end(&mute_button);
    header_bar.pack_end(&labelled("Player:", &name_entry));
    window.set_titlebar(Some(&header_bar));

    let game_info_ui = GameInfoUI::new(game_engine_event_observer.clone());
    let completion_banner_ui = CompletionBannerUI::new(
        game_engine_event_observer.clone(),
        game_engine_command_emitter.clone(),
        move || show_scores(),
    );
    let card_grid_ui = CardGridUI::new(
        game_engine_command_emitter.clone(),
        game_engine_event_observer.clone(),
    );
    let session_timer = SessionTimer::new(
        game_engine_event_observer.clone(),
        game_engine_command_emitter.clone(),
    );

    let top_level_box = gtk4::Box::builder()
        .name("top-level-box")
        .orientation(Orientation::Vertical)
        .spacing(10)
        .margin_start(10)
        .margin_end(10)
        .margin_bottom(10)
        .build();
    top_level_box.append(&game_info_ui.borrow().info_box);
    top_level_box.append(&completion_banner_ui.borrow().revealer);
    top_level_box.append(&card_grid_ui.borrow().grid);

    let scrolled_window = gtk4::ScrolledWindow::builder()
        .child(&top_level_box)
        .hexpand(true)
        .vexpand(true)
        .build();
    window.set_child(Some(&scrolled_window));

    game_engine_command_emitter.emit(GameEngineCommand::InitDisplay);
    window.present();

    let header_sync = Cell::new(Some(header_sync));
    window.connect_close_request(move |_| {
        log::trace!(target: "window", "Destroying window");
        if let Some(subscription) = header_sync.take() {
            subscription.unsubscribe();
        }
        session_timer.borrow_mut().destroy();
        card_grid_ui.borrow_mut().destroy();
        completion_banner_ui.borrow_mut().destroy();
        game_info_ui.borrow_mut().destroy();
        engine.borrow_mut().destroy();
        glib::signal::Propagation::Proceed
    });
}
