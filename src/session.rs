//! Presentation boundary and event loop
//!
//! The presentation layer implements [`Presenter`] to receive render
//! commands, and feeds user input through a [`SessionHandle`]. A
//! [`Session`] owns the controller and processes UI input and countdown
//! notifications one at a time from a single queue, so no two events are
//! ever handled concurrently.

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::{
    Event,
    catalog::Catalog,
    game::{self, GameController, IncomingMessage, Screen, Update},
    hall_of_fame::HallOfFame,
    settings::SettingsStore,
};

/// Receiver of render commands
///
/// Implementations only display what they are given; they must not call
/// back into the session synchronously.
pub trait Presenter {
    /// Replaces the whole screen
    fn show(&self, screen: Screen);

    /// Changes part of the current screen
    fn update(&self, update: Update);
}

/// Errors that end or refuse a session interaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The controller reported a fault
    #[error(transparent)]
    Game(#[from] game::Error),
    /// The session is no longer running
    #[error("session is closed")]
    Closed,
}

/// Sender side of a session, used by the presentation layer
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<Event>,
}

impl SessionHandle {
    /// Queues user input for the session
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if the session has stopped.
    pub fn send(&self, message: IncomingMessage) -> Result<(), Error> {
        self.events
            .send(message.into())
            .map_err(|_| Error::Closed)
    }
}

/// A running controller together with its event queue
#[derive(Debug)]
pub struct Session<P, S, H> {
    controller: GameController<P, S, H>,
    events: mpsc::UnboundedReceiver<Event>,
}

impl<P: Presenter, S: SettingsStore, H: HallOfFame> Session<P, S, H> {
    /// Creates a session and the handle that feeds it
    ///
    /// The countdown only holds a weak reference to the queue, so the
    /// session ends once every [`SessionHandle`] is dropped.
    pub fn new(
        catalog: Catalog,
        settings: S,
        hall_of_fame: H,
        presenter: P,
        rng: fastrand::Rng,
    ) -> (Self, SessionHandle) {
        let (sender, events) = mpsc::unbounded_channel();
        let timer_events = sender.downgrade();

        let controller = GameController::new(
            catalog,
            settings,
            hall_of_fame,
            presenter,
            move |notification| {
                if let Some(sender) = timer_events.upgrade() {
                    // the receiver is only gone once the session stopped
                    let _ = sender.send(notification.into());
                }
            },
            rng,
        );

        (Self { controller, events }, SessionHandle { events: sender })
    }

    /// The controller driven by this session
    pub fn controller(&self) -> &GameController<P, S, H> {
        &self.controller
    }

    /// Shows the title screen and processes events until every handle is
    /// dropped
    ///
    /// # Errors
    ///
    /// Stops at the first fault reported by the controller and returns it.
    pub async fn run(mut self) -> Result<GameController<P, S, H>, Error> {
        self.controller.start();

        while let Some(event) = self.events.recv().await {
            if let Err(fault) = self.controller.handle(event) {
                error!(%fault, phase = ?self.controller.phase(), "game fault");
                return Err(fault.into());
            }
        }

        debug!("all session handles dropped");
        Ok(self.controller)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use super::*;
    use crate::{
        catalog::tests::create_test_catalog,
        game::{Phase, TitleOption},
        hall_of_fame::MemoryHallOfFame,
        settings::{MemorySettings, Settings},
        teams::TeamSide,
    };

    /// Everything a presenter was asked to do
    #[derive(Debug, Clone)]
    pub(crate) enum Output {
        Show(Screen),
        Update(Update),
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingPresenter {
        outputs: Arc<Mutex<Vec<Output>>>,
    }

    impl RecordingPresenter {
        pub(crate) fn outputs(&self) -> Vec<Output> {
            self.outputs.lock().unwrap().clone()
        }

        pub(crate) fn screens(&self) -> Vec<Screen> {
            self.outputs()
                .into_iter()
                .filter_map(|output| match output {
                    Output::Show(screen) => Some(screen),
                    Output::Update(_) => None,
                })
                .collect()
        }

        pub(crate) fn last_screen(&self) -> Option<Screen> {
            self.screens().pop()
        }

        pub(crate) fn updates(&self) -> Vec<Update> {
            self.outputs()
                .into_iter()
                .filter_map(|output| match output {
                    Output::Update(update) => Some(update),
                    Output::Show(_) => None,
                })
                .collect()
        }
    }

    impl Presenter for RecordingPresenter {
        fn show(&self, screen: Screen) {
            self.outputs.lock().unwrap().push(Output::Show(screen));
        }

        fn update(&self, update: Update) {
            self.outputs.lock().unwrap().push(Output::Update(update));
        }
    }

    fn create_session(
        settings: Settings,
    ) -> (
        Session<RecordingPresenter, MemorySettings, MemoryHallOfFame>,
        SessionHandle,
        RecordingPresenter,
    ) {
        let presenter = RecordingPresenter::default();
        let (session, handle) = Session::new(
            create_test_catalog(&["History", "Science"], 4),
            MemorySettings::new(settings),
            MemoryHallOfFame::default(),
            presenter.clone(),
            fastrand::Rng::with_seed(5),
        );
        (session, handle, presenter)
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ends_when_handles_dropped() {
        let (session, handle, presenter) = create_session(Settings::default());
        drop(handle);

        let controller = session.run().await.unwrap();
        assert_eq!(controller.phase(), Phase::Title);
        assert!(matches!(presenter.last_screen(), Some(Screen::Title)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_fault() {
        let (session, handle, _presenter) = create_session(Settings::default());
        let running = tokio::spawn(session.run());

        handle.send(IncomingMessage::WinnerDismissed).unwrap();

        let result = running.await.unwrap();
        assert!(matches!(
            result,
            Err(Error::Game(game::Error::ProtocolViolation {
                actual: Phase::Title,
                ..
            }))
        ));
        assert_eq!(
            handle.send(IncomingMessage::CancelGame),
            Err(Error::Closed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_flows_through_session() {
        let settings = Settings {
            rounds: 1,
            questions_per_round: 1,
            time_limit: Duration::from_secs(5),
            ..Settings::default()
        };
        let (session, handle, presenter) = create_session(settings);
        let running = tokio::spawn(session.run());

        for message in [
            IncomingMessage::TitleDismissed(TitleOption::StartGame),
            IncomingMessage::TeamNamesEntered {
                team_one: "Red".to_owned(),
                team_two: "Blue".to_owned(),
            },
            IncomingMessage::RoundOverviewDismissed,
            IncomingMessage::CategorySelected(0),
            IncomingMessage::AnswerEntered {
                team: TeamSide::One,
                index: 0,
            },
        ] {
            handle.send(message).unwrap();
        }

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(matches!(
            presenter.last_screen(),
            Some(Screen::Solution(view)) if view.timed_out && view.entered[TeamSide::Two].is_none()
        ));

        handle.send(IncomingMessage::SolutionDismissed).unwrap();
        handle.send(IncomingMessage::WinnerDismissed).unwrap();
        handle.send(IncomingMessage::HallOfFameDismissed).unwrap();
        drop(handle);

        let controller = running.await.unwrap().unwrap();
        assert_eq!(controller.phase(), Phase::Title);
        assert_eq!(controller.hall_of_fame().len(), 2);
    }
}
