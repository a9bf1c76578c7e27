// time, moves, matches, combo and the daily challenge

use gtk4::prelude::*;
use gtk4::{Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventObserver, Unsubscriber};
use crate::model::{DailyChallenge, GameEngineEvent, GameSession};

pub struct GameInfoUI {
    pub info_box: gtk4::Box,
    timer_label: Label,
    moves_label: Label,
    matches_label: Label,
    combo_label: Label,
    daily_label: Label,
    subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for GameInfoUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

fn info_label(css_class: &str) -> Label {
    let label = Label::new(None);
    label.set_css_classes(&["info", css_class]);
    label
}

impl GameInfoUI {
    pub fn new(game_engine_event_observer: EventObserver<GameEngineEvent>) -> Rc<RefCell<Self>> {
        let info_box = gtk4::Box::builder()
            .name("info-box")
            .orientation(Orientation::Horizontal)
            .spacing(20)
            .halign(gtk4::Align::Center)
            .margin_top(10)
            .margin_bottom(10)
            .build();

        let timer_label = info_label("timer");
        let moves_label = info_label("moves");
        let matches_label = info_label("matches");
        let combo_label = info_label("combo");
        let daily_label = info_label("daily-challenge");
        for label in [
            &timer_label,
            &moves_label,
            &matches_label,
            &combo_label,
            &daily_label,
        ] {
            info_box.append(label);
        }

        let game_info = Rc::new(RefCell::new(Self {
            info_box,
            timer_label,
            moves_label,
            matches_label,
            combo_label,
            daily_label,
            subscription: None,
        }));

        let subscription = {
            let game_info = game_info.clone();
            game_engine_event_observer.subscribe(move |event| match event {
                GameEngineEvent::SessionUpdated(session) => {
                    game_info.borrow().update_session(session);
                }
                GameEngineEvent::DailyChallengeChanged(challenge) => {
                    game_info.borrow().update_daily_challenge(challenge);
                }
                _ => {}
            })
        };
        game_info.borrow_mut().subscription = Some(subscription);
        game_info
    }

    fn update_session(&self, session: &GameSession) {
        let remaining = session.countdown.remaining_secs();
        self.timer_label
            .set_text(&format!("⏱ {}:{:02}", remaining / 60, remaining % 60));
        if remaining <= 10 && session.is_playing() {
            self.timer_label.add_css_class("running-out");
        } else {
            self.timer_label.remove_css_class("running-out");
        }
        self.moves_label.set_text(&format!("Moves: {}", session.moves));
        self.matches_label.set_text(&format!(
            "Matches: {}/{}",
            session.matches,
            session.pairs_required()
        ));
        self.combo_label.set_text(&format!("Combo: {}", session.combo));
    }

    fn update_daily_challenge(&self, challenge: &DailyChallenge) {
        if challenge.completed {
            self.daily_label.set_text("Daily challenge: done ✓");
            self.daily_label.add_css_class("completed");
        } else {
            self.daily_label.set_text("Daily challenge: win a game today");
            self.daily_label.remove_css_class("completed");
        }
    }
}
