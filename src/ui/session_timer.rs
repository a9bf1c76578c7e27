use glib::{timeout_add_local_once, timeout_add_seconds_local, ControlFlow, SourceId};
use std::cell::RefCell;
use std::rc::Rc;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{GameEngineCommand, GameEngineEvent, SessionId};

/// Turns the engine's timer events into glib sources. The one-second source
/// sends `Tick` for the session it was started for; flip-backs fire once
/// after their delay. Both go back to the engine as commands from the main
/// loop, never from inside an event dispatch.
pub struct SessionTimer {
    ticking: Option<(SessionId, SourceId)>,
    game_engine_command_emitter: EventEmitter<GameEngineCommand>,
    subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for SessionTimer {
    fn destroy(&mut self) {
        self.stop();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl SessionTimer {
    pub fn new(
        game_engine_event_observer: EventObserver<GameEngineEvent>,
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
    ) -> Rc<RefCell<Self>> {
        let timer = Rc::new(RefCell::new(Self {
            ticking: None,
            game_engine_command_emitter,
            subscription: None,
        }));

        let subscription = {
            let timer = timer.clone();
            game_engine_event_observer.subscribe(move |event| {
                timer.borrow_mut().handle_event(event);
            })
        };
        timer.borrow_mut().subscription = Some(subscription);
        timer
    }

    fn handle_event(&mut self, event: &GameEngineEvent) {
        match event {
            GameEngineEvent::TimerStarted(session_id) => self.start(*session_id),
            GameEngineEvent::TimerStopped(session_id) => {
                if self.ticking.as_ref().is_some_and(|(id, _)| id == session_id) {
                    self.stop();
                }
            }
            GameEngineEvent::FlipBackScheduled { pending, delay } => {
                let emitter = self.game_engine_command_emitter.clone();
                let pending = *pending;
                timeout_add_local_once(*delay, move || {
                    emitter.emit(GameEngineCommand::FlipBack(pending));
                });
            }
            _ => {}
        }
    }

    fn start(&mut self, session_id: SessionId) {
        self.stop();
        log::trace!(target: "session_timer", "Starting ticks for {:?}", session_id);
        let emitter = self.game_engine_command_emitter.clone();
        let source = timeout_add_seconds_local(1, move || {
            emitter.emit(GameEngineCommand::Tick(session_id));
            ControlFlow::Continue
        });
        self.ticking = Some((session_id, source));
    }

    fn stop(&mut self) {
        if let Some((session_id, source)) = self.ticking.take() {
            log::trace!(target: "session_timer", "Stopping ticks for {:?}", session_id);
            source.remove();
        }
    }
}
