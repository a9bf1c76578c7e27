use gtk4::prelude::*;
use gtk4::{Button, Label, Orientation, Revealer, RevealerTransitionType};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{GameCompletion, GameEngineCommand, GameEngineEvent, GamePhase};

/// Game-over panel shown above the grid, with "Play Again" and "View Scores";
/// hidden again when a new game is dealt.
pub struct CompletionBannerUI {
    pub revealer: Revealer,
    title: Label,
    details: Label,
    daily_label: Label,
    subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for CompletionBannerUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl CompletionBannerUI {
    pub fn new<F>(
        game_engine_event_observer: EventObserver<GameEngineEvent>,
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        on_view_scores: F,
    ) -> Rc<RefCell<Self>>
    where
        F: Fn() + 'static,
    {
        let panel = gtk4::Box::builder()
            .orientation(Orientation::Vertical)
            .spacing(6)
            .halign(gtk4::Align::Center)
            .css_classes(["completion-banner"])
            .build();
        let title = Label::builder().css_classes(["completion-title"]).build();
        let details = Label::builder()
            .justify(gtk4::Justification::Center)
            .build();
        let daily_label = Label::builder()
            .label("+ Daily Challenge Completed!")
            .css_classes(["daily-challenge", "completed"])
            .visible(false)
            .build();
        panel.append(&title);
        panel.append(&details);
        panel.append(&daily_label);

        let buttons = gtk4::Box::builder()
            .orientation(Orientation::Horizontal)
            .halign(gtk4::Align::Center)
            .spacing(10)
            .build();
        let play_again_button = Button::builder()
            .label("Play Again")
            .css_classes(["suggested-action"])
            .build();
        play_again_button.connect_clicked(move |_| {
            game_engine_command_emitter.emit(GameEngineCommand::NewGame(None));
        });
        let view_scores_button = Button::with_label("View Scores");
        view_scores_button.connect_clicked(move |_| on_view_scores());
        buttons.append(&play_again_button);
        buttons.append(&view_scores_button);
        panel.append(&buttons);

        let revealer = Revealer::builder()
            .transition_type(RevealerTransitionType::SlideDown)
            .child(&panel)
            .reveal_child(false)
            .build();

        let banner = Rc::new(RefCell::new(Self {
            revealer,
            title,
            details,
            daily_label,
            subscription: None,
        }));
        let subscription = {
            let banner = banner.clone();
            game_engine_event_observer.subscribe(move |event| match event {
                GameEngineEvent::GameCompleted(completion) => banner.borrow().show(completion),
                GameEngineEvent::SessionUpdated(session) if session.phase == GamePhase::Idle => {
                    banner.borrow().revealer.set_reveal_child(false);
                }
                _ => {}
            })
        };
        banner.borrow_mut().subscription = Some(subscription);
        banner
    }

    fn show(&self, completion: &GameCompletion) {
        match completion {
            GameCompletion::Won {
                score,
                new_best,
                moves,
                time_spent,
                daily_challenge_completed,
                ..
            } => {
                self.title.set_text("🎉 Victory!");
                let mut details = format!(
                    "Score: {}\nMoves: {}\nTime: {}s",
                    score,
                    moves,
                    time_spent.as_secs()
                );
                if *new_best {
                    details.push_str("\nNew best score!");
                }
                self.details.set_text(&details);
                self.daily_label.set_visible(*daily_challenge_completed);
            }
            GameCompletion::Lost { moves, .. } => {
                self.title.set_text("😢 Game Over");
                self.details
                    .set_text(&format!("Time's up after {} moves.", moves));
                self.daily_label.set_visible(false);
            }
        }
        self.title
            .set_css_classes(&["completion-title", Self::css_class(completion)]);
        self.revealer.set_reveal_child(true);
    }

    fn css_class(completion: &GameCompletion) -> &'static str {
        match completion {
            GameCompletion::Won { .. } => "won",
            GameCompletion::Lost { .. } => "lost",
        }
    }
}
