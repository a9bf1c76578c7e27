use gtk4::prelude::*;
use gtk4::{Button, Grid};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{Card, GameEngineCommand, GameEngineEvent, GameSession};

const CARD_BACK: &str = "❓";

pub struct CardGridUI {
    pub grid: Grid,
    buttons: Vec<Button>,
    n_cols: usize,
    game_engine_command_emitter: EventEmitter<GameEngineCommand>,
    subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for CardGridUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl CardGridUI {
    pub fn new(
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        game_engine_event_observer: EventObserver<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let grid = Grid::builder()
            .name("card-grid")
            .row_spacing(10)
            .column_spacing(10)
            .row_homogeneous(true)
            .column_homogeneous(true)
            .halign(gtk4::Align::Center)
            .valign(gtk4::Align::Center)
            .css_classes(["card-grid"])
            .build();

        let card_grid_ui = Rc::new(RefCell::new(Self {
            grid,
            buttons: Vec::new(),
            n_cols: 0,
            game_engine_command_emitter,
            subscription: None,
        }));

        let subscription = {
            let card_grid_ui = card_grid_ui.clone();
            game_engine_event_observer.subscribe(move |event| {
                if let GameEngineEvent::SessionUpdated(session) = event {
                    card_grid_ui.borrow_mut().update(session);
                }
            })
        };
        card_grid_ui.borrow_mut().subscription = Some(subscription);
        card_grid_ui
    }

    fn update(&mut self, session: &GameSession) {
        let n_cols = session.difficulty.n_cols();
        if self.buttons.len() != session.deck.len() || self.n_cols != n_cols {
            self.rebuild(session.deck.len(), n_cols);
        }
        for (button, card) in self.buttons.iter().zip(session.deck.iter()) {
            Self::render_card(button, card, session.can_flip(card.id));
        }
    }

    fn rebuild(&mut self, n_cards: usize, n_cols: usize) {
        log::trace!(target: "card_grid_ui", "Laying out {} cards in {} columns", n_cards, n_cols);
        for button in self.buttons.drain(..) {
            self.grid.remove(&button);
        }
        for card_id in 0..n_cards {
            let button = Button::builder()
                .label(CARD_BACK)
                .css_classes(["card"])
                .width_request(80)
                .height_request(80)
                .build();
            let emitter = self.game_engine_command_emitter.clone();
            button.connect_clicked(move |_| {
                emitter.emit(GameEngineCommand::Flip(card_id));
            });
            let row = (card_id / n_cols) as i32;
            let col = (card_id % n_cols) as i32;
            self.grid.attach(&button, col, row, 1, 1);
            self.buttons.push(button);
        }
        self.n_cols = n_cols;
    }

    fn render_card(button: &Button, card: &Card, clickable: bool) {
        if card.is_face_up() {
            button.set_label(&card.symbol);
            button.add_css_class("flipped");
        } else {
            button.set_label(CARD_BACK);
            button.remove_css_class("flipped");
        }
        if card.is_matched {
            button.add_css_class("matched");
        } else {
            button.remove_css_class("matched");
        }
        button.set_can_target(clickable);
    }
}
