//! The game controller
//!
//! [`GameController`] is the state machine that runs a quiz night: it moves
//! between the title screen, the game phases and the side screens in
//! response to [`Event`]s, keeps the [`GameState`] of the running game, owns
//! the question countdown and tells the [`Presenter`] what to show.
//!
//! All mutation happens inside [`GameController::handle`]. The countdown
//! only produces [`TimerNotification`]s, which come back through `handle`
//! like any other event and are dropped when they belong to a countdown
//! that is no longer current.

use std::{collections::HashMap, fmt::Debug, sync::Arc, time::Duration};

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{
    Event, TruncatedVec,
    catalog::{Catalog, Category, Presentation, Question},
    constants::game::{REUSE_QUESTIONS_WITHIN_ROUND, SIMULTANEOUS_CATEGORIES},
    game_state::{GameState, RoundLimitReached},
    hall_of_fame::{self, HallOfFame},
    names::{self, Rejection},
    round::PoolError,
    session::Presenter,
    settings::{Settings, SettingsStore},
    teams::{self, TeamSide},
    timer::{Generation, QuestionTimer, TimerNotification},
};

/// The phase the controller is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, the resting phase between games
    Title,
    /// Waiting for both team names
    AwaitingTeamNames,
    /// The choosing team picks one of the offered categories
    SelectingCategory,
    /// Scores between rounds
    RoundOverview,
    /// A question is open for answers
    ShowingQuestion,
    /// The correct answer and both teams' answers
    ShowingSolution,
    /// Final scores
    ShowingWinner,
    /// Ranked results of past games
    ShowingHallOfFame,
    /// The settings editor
    ShowingSettings,
}

/// Choices offered on the title screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleOption {
    /// Start a new game
    StartGame,
    /// Edit the settings
    Settings,
    /// Show the hall of fame
    HallOfFame,
}

/// Input coming from the presentation layer
#[derive(Debug, Clone, Deserialize)]
pub enum IncomingMessage {
    /// The title screen was left through one of its options
    TitleDismissed(TitleOption),
    /// Both team names were entered
    TeamNamesEntered {
        /// Name entered for team one
        team_one: String,
        /// Name entered for team two
        team_two: String,
    },
    /// The round overview was acknowledged
    RoundOverviewDismissed,
    /// The choosing team picked the offered category at this position
    CategorySelected(usize),
    /// A team picked the answer shown at `index`
    AnswerEntered {
        /// The answering team
        team: TeamSide,
        /// Position of the answer in the shown order
        index: usize,
    },
    /// The solution screen was acknowledged
    SolutionDismissed,
    /// The winner screen was acknowledged
    WinnerDismissed,
    /// The hall of fame was acknowledged
    HallOfFameDismissed,
    /// The settings editor was closed, with the edited settings if any
    SettingsDismissed(Option<Settings>),
    /// Abandon whatever is going on and return to the title screen
    CancelGame,
}

/// Points of one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStanding {
    /// Team name
    pub name: String,
    /// Correct answers so far
    pub points: usize,
}

/// Scores and progress of the running game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standings {
    /// Both teams and their points
    pub teams: EnumMap<TeamSide, TeamStanding>,
    /// Rounds begun so far
    pub rounds_played: usize,
    /// Rounds in the game
    pub round_limit: usize,
    /// Questions in each round
    pub questions_per_round: usize,
}

/// A question as shown to the teams
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    /// Category of the current round
    pub category: String,
    /// Current round, starting at 1
    pub round: usize,
    /// Question within the round, starting at 1
    pub number: usize,
    /// The question text
    pub prompt: String,
    /// Answer texts in presentation order
    pub answers: Vec<String>,
    /// Maps presentation order to stored order
    pub presentation: Presentation,
    /// Time the teams have
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub time_limit: Duration,
    /// Current scores
    pub standings: Standings,
}

/// The resolution of a question
#[derive(Debug, Clone, Serialize)]
pub struct SolutionView {
    /// The question text
    pub prompt: String,
    /// Answer texts in presentation order
    pub answers: Vec<String>,
    /// Shown position of the correct answer
    pub correct: Option<usize>,
    /// Shown position each team picked, `None` if it did not answer
    pub entered: EnumMap<TeamSide, Option<usize>>,
    /// Whether each team was right
    pub scored: EnumMap<TeamSide, bool>,
    /// Whether the question was closed by the countdown
    pub timed_out: bool,
    /// Scores after this question
    pub standings: Standings,
}

/// Everything the presentation layer may be asked to show
#[derive(Debug, Clone, Serialize)]
pub enum Screen {
    /// Title screen with its options
    Title,
    /// Prompt for both team names
    TeamNamePrompt {
        /// Generated names the prompt may offer
        suggestions: [String; 2],
    },
    /// Scores between rounds
    RoundOverview(Standings),
    /// Categories to choose from
    CategorySelector {
        /// The team that chooses
        chooser: TeamSide,
        /// Names of the offered categories
        categories: Vec<String>,
        /// Current scores
        standings: Standings,
    },
    /// An open question
    Question(Box<QuestionView>),
    /// The resolution of the last question
    Solution(Box<SolutionView>),
    /// Final scores
    Winner {
        /// Final scores
        standings: Standings,
        /// The team with more points, `None` on a tie
        winner: Option<TeamSide>,
    },
    /// Ranked results of past games
    HallOfFame {
        /// Best results first
        standings: TruncatedVec<hall_of_fame::Standing>,
        /// Names of the teams that just played, if shown after a game
        highlight: Option<[String; 2]>,
    },
    /// The settings editor
    Settings(Settings),
}

impl Screen {
    /// Converts the screen to a JSON string
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Changes to the screen currently shown
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize)]
pub enum Update {
    /// Time left on the open question
    TimerDisplay {
        /// Time remaining
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        remaining: Duration,
        /// Full time of the question
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        total: Duration,
    },
    /// The team already answered; its first answer stands
    DoubleAnswer(TeamSide),
    /// The question already closed on time before the team answered
    AnswerTooLate(TeamSide),
    /// A team name was refused
    TeamNameRejected(Rejection),
    /// The edited settings were refused
    SettingsRejected(String),
}

impl Update {
    /// Converts the update to a JSON string
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Faults returned by [`GameController::handle`]
///
/// None of these are recoverable by the controller; they indicate either a
/// presentation layer that does not follow the protocol or a catalog too
/// small for the configured game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The event is not allowed in the current phase
    #[error("controller is in phase {actual:?}, expected one of {expected:?}")]
    ProtocolViolation {
        /// The phase the controller is in
        actual: Phase,
        /// Phases in which the event would have been allowed
        expected: &'static [Phase],
    },
    /// The catalog cannot supply the configured game
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// An answer position outside the shown answers
    #[error("answer {index} is out of range for {count} answers")]
    AnswerOutOfRange {
        /// The entered position
        index: usize,
        /// Number of shown answers
        count: usize,
    },
    /// A category position outside the offered categories
    #[error("category {index} is out of range for {count} offered categories")]
    CategoryOutOfRange {
        /// The selected position
        index: usize,
        /// Number of offered categories
        count: usize,
    },
    /// A round was requested after the last one
    #[error(transparent)]
    RoundLimitReached(#[from] RoundLimitReached),
    /// Game data is missing for the current phase
    #[error("no {0} in progress")]
    NotInProgress(&'static str),
    /// The stored settings cannot configure a game
    #[error("cannot start a game: {0}")]
    InvalidSettings(String),
}

/// How an open question was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    BothAnswered,
    TimedOut,
}

/// The question currently shown, from opening to the next question
#[derive(Debug)]
struct ActiveQuestion {
    question: Question,
    presentation: Presentation,
    /// Shown positions entered by each team
    answers: EnumMap<TeamSide, Option<usize>>,
    /// The countdown started for this question
    generation: Generation,
    closing: Option<Closing>,
}

/// A game from the team names to the winner
#[derive(Debug)]
struct RunningGame {
    state: GameState,
    /// Settings as they were when the game started
    settings: Settings,
    /// Category indices offered on the current selector
    offered: Vec<usize>,
    question: Option<ActiveQuestion>,
}

impl RunningGame {
    fn standings(&self) -> Standings {
        Standings {
            teams: EnumMap::from_fn(|side| TeamStanding {
                name: self.state.team(side).name().to_owned(),
                points: self.state.team_points(side),
            }),
            rounds_played: self.state.rounds_played(),
            round_limit: self.state.round_limit(),
            questions_per_round: self.settings.questions_per_round,
        }
    }
}

type TimerSink = Arc<dyn Fn(TimerNotification) + Send + Sync>;

/// Position of `category` in the catalog it was shared from
fn catalog_position(catalog: &[Arc<Category>], category: &Arc<Category>) -> Option<usize> {
    catalog.iter().position(|c| Arc::ptr_eq(c, category))
}

/// The quiz state machine
pub struct GameController<P, S, H> {
    presenter: P,
    settings: S,
    hall_of_fame: H,
    /// Every category of the catalog
    catalog: Vec<Arc<Category>>,
    phase: Phase,
    game: Option<RunningGame>,
    /// Stored indices of the questions not yet asked, per catalog position
    ///
    /// Kept across games while questions are consumed.
    unasked: HashMap<usize, Vec<usize>>,
    timer: QuestionTimer,
    timer_sink: TimerSink,
    rng: fastrand::Rng,
}

impl<P, S, H> Debug for GameController<P, S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("phase", &self.phase)
            .field("game", &self.game)
            .finish_non_exhaustive()
    }
}

impl<P: Presenter, S: SettingsStore, H: HallOfFame> GameController<P, S, H> {
    /// Creates a controller resting on the title screen
    ///
    /// Nothing is shown until [`GameController::start`] is called.
    /// Countdown notifications are passed to `timer_sink`, which must route
    /// them back into [`GameController::handle`].
    ///
    /// The countdown runs as a Tokio task, so events that open a question
    /// must be handled from within a Tokio runtime.
    pub fn new<F>(
        catalog: Catalog,
        settings: S,
        hall_of_fame: H,
        presenter: P,
        timer_sink: F,
        rng: fastrand::Rng,
    ) -> Self
    where
        F: Fn(TimerNotification) + Send + Sync + 'static,
    {
        Self {
            presenter,
            settings,
            hall_of_fame,
            catalog: catalog.into_shared(),
            phase: Phase::Title,
            game: None,
            unasked: HashMap::new(),
            timer: QuestionTimer::default(),
            timer_sink: Arc::new(timer_sink),
            rng,
        }
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// State of the running game
    pub fn game_state(&self) -> Option<&GameState> {
        self.game.as_ref().map(|game| &game.state)
    }

    /// Answers entered for the current question
    pub fn answer_slots(&self) -> Option<&EnumMap<TeamSide, Option<usize>>> {
        self.active_question().map(|question| &question.answers)
    }

    /// The presentation layer
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The settings store
    pub fn settings_store(&self) -> &S {
        &self.settings
    }

    /// The hall of fame
    pub fn hall_of_fame(&self) -> &H {
        &self.hall_of_fame
    }

    fn active_question(&self) -> Option<&ActiveQuestion> {
        self.game.as_ref().and_then(|game| game.question.as_ref())
    }

    fn expect_phase(&self, expected: &'static [Phase]) -> Result<(), Error> {
        if expected.contains(&self.phase) {
            Ok(())
        } else {
            Err(Error::ProtocolViolation {
                actual: self.phase,
                expected,
            })
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Shows the title screen, abandoning any running game
    pub fn start(&mut self) {
        self.timer.cancel();
        self.game = None;
        self.set_phase(Phase::Title);
        self.presenter.show(Screen::Title);
    }

    /// Processes one event
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the event is not allowed in the current phase
    /// or the game cannot continue. The controller state is left unchanged
    /// by a refused event.
    ///
    /// # Panics
    ///
    /// Panics if an event opens a question outside of a Tokio runtime, since
    /// the countdown is spawned as a task.
    pub fn handle(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::Message(message) => self.receive_message(message),
            Event::Timer(notification) => self.receive_alarm(notification),
        }
    }

    /// Processes input from the presentation layer
    ///
    /// # Errors
    ///
    /// See [`GameController::handle`].
    ///
    /// # Panics
    ///
    /// See [`GameController::handle`].
    pub fn receive_message(&mut self, message: IncomingMessage) -> Result<(), Error> {
        match message {
            IncomingMessage::TitleDismissed(option) => self.title_dismissed(option),
            IncomingMessage::TeamNamesEntered { team_one, team_two } => {
                self.team_names_entered(&team_one, &team_two)
            }
            IncomingMessage::RoundOverviewDismissed => self.round_overview_dismissed(),
            IncomingMessage::CategorySelected(index) => self.category_selected(index),
            IncomingMessage::AnswerEntered { team, index } => self.answer_entered(team, index),
            IncomingMessage::SolutionDismissed => self.solution_dismissed(),
            IncomingMessage::WinnerDismissed => self.winner_dismissed(),
            IncomingMessage::HallOfFameDismissed => {
                self.expect_phase(&[Phase::ShowingHallOfFame])?;
                self.start();
                Ok(())
            }
            IncomingMessage::SettingsDismissed(settings) => self.settings_dismissed(settings),
            IncomingMessage::CancelGame => {
                if self.game.is_some() {
                    info!("game cancelled");
                }
                self.start();
                Ok(())
            }
        }
    }

    /// Processes a countdown notification
    ///
    /// Notifications of a countdown other than the one running for the open
    /// question are discarded.
    ///
    /// # Errors
    ///
    /// See [`GameController::handle`].
    pub fn receive_alarm(&mut self, notification: TimerNotification) -> Result<(), Error> {
        let generation = notification.generation();
        let is_current = self.phase == Phase::ShowingQuestion
            && self
                .active_question()
                .is_some_and(|q| q.generation == generation && q.closing.is_none());

        if !is_current {
            trace!(?generation, "discarding stale timer notification");
            return Ok(());
        }

        match notification {
            TimerNotification::Tick {
                remaining, total, ..
            } => {
                self.presenter
                    .update(Update::TimerDisplay { remaining, total });
                Ok(())
            }
            TimerNotification::Expired { .. } => {
                debug!(?generation, "question timed out");
                self.close_question(Closing::TimedOut)
            }
        }
    }

    fn title_dismissed(&mut self, option: TitleOption) -> Result<(), Error> {
        self.expect_phase(&[Phase::Title])?;

        match option {
            TitleOption::StartGame => {
                self.set_phase(Phase::AwaitingTeamNames);
                self.presenter.show(Screen::TeamNamePrompt {
                    suggestions: names::suggestions(),
                });
            }
            TitleOption::Settings => {
                self.set_phase(Phase::ShowingSettings);
                self.presenter
                    .show(Screen::Settings(self.settings.settings().clone()));
            }
            TitleOption::HallOfFame => {
                self.set_phase(Phase::ShowingHallOfFame);
                self.presenter.show(Screen::HallOfFame {
                    standings: hall_of_fame::standings(&self.hall_of_fame),
                    highlight: None,
                });
            }
        }

        Ok(())
    }

    fn team_names_entered(&mut self, team_one: &str, team_two: &str) -> Result<(), Error> {
        self.expect_phase(&[Phase::AwaitingTeamNames])?;

        let (one, two) = match names::validate_pair(team_one, team_two) {
            Ok(teams) => teams,
            Err(rejection) => {
                warn!(team = ?rejection.team, error = %rejection.error, "team name rejected");
                self.presenter.update(Update::TeamNameRejected(rejection));
                return Ok(());
            }
        };

        let settings = self.settings.settings().clone();
        settings
            .check()
            .map_err(|error| Error::InvalidSettings(error.to_string()))?;
        info!(
            team_one = one.name(),
            team_two = two.name(),
            rounds = settings.rounds,
            questions_per_round = settings.questions_per_round,
            "game started"
        );

        let game = RunningGame {
            state: GameState::new(
                teams::pair(one, two),
                self.catalog.clone(),
                settings.rounds,
                self.rng.fork(),
            ),
            settings,
            offered: Vec::new(),
            question: None,
        };
        let standings = game.standings();
        self.game = Some(game);

        self.set_phase(Phase::RoundOverview);
        self.presenter.show(Screen::RoundOverview(standings));
        Ok(())
    }

    fn round_overview_dismissed(&mut self) -> Result<(), Error> {
        self.expect_phase(&[Phase::RoundOverview])?;
        let game = self.game.as_mut().ok_or(Error::NotInProgress("game"))?;

        if game.state.all_rounds_begun() {
            return Err(RoundLimitReached {
                limit: game.state.round_limit(),
            }
            .into());
        }

        let offered = game
            .state
            .select_random_categories(SIMULTANEOUS_CATEGORIES)?;
        let categories = offered
            .iter()
            .filter_map(|&i| game.state.category(i))
            .map(|category| category.name().to_owned())
            .collect_vec();
        let chooser = if game.state.rounds_played() % 2 == 0 {
            TeamSide::One
        } else {
            TeamSide::Two
        };
        game.offered = offered;
        let standings = game.standings();

        self.set_phase(Phase::SelectingCategory);
        self.presenter.show(Screen::CategorySelector {
            chooser,
            categories,
            standings,
        });
        Ok(())
    }

    fn category_selected(&mut self, index: usize) -> Result<(), Error> {
        self.expect_phase(&[Phase::SelectingCategory])?;
        let game = self.game.as_mut().ok_or(Error::NotInProgress("game"))?;

        let out_of_range = Error::CategoryOutOfRange {
            index,
            count: game.offered.len(),
        };
        let &category_index = game.offered.get(index).ok_or(out_of_range.clone())?;
        let category = if game.settings.reuse_categories {
            game.state.category(category_index).cloned()
        } else {
            game.state.remove_category(category_index)
        }
        .ok_or(out_of_range)?;

        let unasked = game
            .settings
            .consume_questions
            .then(|| catalog_position(&self.catalog, &category))
            .flatten()
            .map(|position| self.unasked.entry(position).or_default());
        let pool = match unasked {
            Some(unasked) => {
                if unasked.len() < game.settings.questions_per_round {
                    debug!(category = category.name(), "refilling consumed questions");
                    *unasked = (0..category.len()).collect();
                }
                unasked.clone()
            }
            None => (0..category.len()).collect(),
        };

        let name = category.name().to_owned();
        game.offered.clear();
        game.state
            .begin_new_round(category, pool, REUSE_QUESTIONS_WITHIN_ROUND)?;
        info!(
            round = game.state.rounds_played(),
            category = %name,
            "round started"
        );

        self.open_question()
    }

    /// Draws the next question of the current round and starts its countdown
    fn open_question(&mut self) -> Result<(), Error> {
        self.expect_phase(&[Phase::SelectingCategory, Phase::ShowingSolution])?;
        let game = self.game.as_mut().ok_or(Error::NotInProgress("game"))?;
        let round = game
            .state
            .current_round_mut()
            .ok_or(Error::NotInProgress("round"))?;

        let pool_index = round.select_question_index(&mut self.rng)?;
        let stored_index = round.pool()[pool_index];
        let question = round
            .question(pool_index)
            .cloned()
            .ok_or(Error::NotInProgress("question"))?;
        round.remove_question(pool_index);

        let position = catalog_position(&self.catalog, round.category());
        let category = round.category().name().to_owned();
        let number = round.answered_count() + 1;

        if game.settings.consume_questions {
            if let Some(unasked) = position.and_then(|p| self.unasked.get_mut(&p)) {
                unasked.retain(|&i| i != stored_index);
            }
        }

        let presentation = question.shuffled_answers(&mut self.rng);
        let total = game.settings.time_limit;
        let view = QuestionView {
            category,
            round: game.state.rounds_played(),
            number,
            prompt: question.prompt().to_owned(),
            answers: presentation
                .answers(&question)
                .map(|answer| answer.text.clone())
                .collect(),
            presentation: presentation.clone(),
            time_limit: total,
            standings: game.standings(),
        };

        let sink = Arc::clone(&self.timer_sink);
        let generation = self
            .timer
            .start(total, game.settings.strict_timeout, move |n| sink(n));
        game.question = Some(ActiveQuestion {
            question,
            presentation,
            answers: EnumMap::default(),
            generation,
            closing: None,
        });

        self.set_phase(Phase::ShowingQuestion);
        self.presenter.show(Screen::Question(Box::new(view)));
        self.presenter.update(Update::TimerDisplay {
            remaining: total,
            total,
        });
        Ok(())
    }

    fn answer_entered(&mut self, team: TeamSide, index: usize) -> Result<(), Error> {
        if self.phase == Phase::ShowingSolution
            && self
                .active_question()
                .is_some_and(|q| q.closing == Some(Closing::TimedOut))
        {
            warn!(?team, "answer arrived after the question timed out");
            self.presenter.update(Update::AnswerTooLate(team));
            return Ok(());
        }

        self.expect_phase(&[Phase::ShowingQuestion])?;
        let question = self
            .game
            .as_mut()
            .and_then(|game| game.question.as_mut())
            .ok_or(Error::NotInProgress("question"))?;

        if question.answers[team].is_some() {
            warn!(?team, "double answer");
            self.presenter.update(Update::DoubleAnswer(team));
            return Ok(());
        }

        if index >= question.presentation.len() {
            return Err(Error::AnswerOutOfRange {
                index,
                count: question.presentation.len(),
            });
        }

        question.answers[team] = Some(index);
        debug!(?team, index, "answer entered");

        if question.answers.values().all(Option::is_some) {
            self.timer.cancel();
            self.close_question(Closing::BothAnswered)?;
        }
        Ok(())
    }

    /// Scores both teams and shows the solution
    fn close_question(&mut self, closing: Closing) -> Result<(), Error> {
        self.expect_phase(&[Phase::ShowingQuestion])?;
        self.timer.cancel();

        let game = self.game.as_mut().ok_or(Error::NotInProgress("game"))?;
        let active = game
            .question
            .as_mut()
            .ok_or(Error::NotInProgress("question"))?;
        let round = game
            .state
            .current_round_mut()
            .ok_or(Error::NotInProgress("round"))?;

        let scored = EnumMap::from_fn(|side| {
            active.answers[side]
                .is_some_and(|i| active.presentation.is_correct(&active.question, i))
        });
        for side in TeamSide::ALL {
            round.enter_team_answer(side, scored[side]);
        }
        active.closing = Some(closing);

        let prompt = active.question.prompt().to_owned();
        let answers = active
            .presentation
            .answers(&active.question)
            .map(|answer| answer.text.clone())
            .collect();
        let correct = (0..active.presentation.len())
            .find(|&i| active.presentation.is_correct(&active.question, i));
        let entered = active.answers.clone();

        let view = SolutionView {
            prompt,
            answers,
            correct,
            entered,
            scored,
            timed_out: closing == Closing::TimedOut,
            standings: game.standings(),
        };

        self.set_phase(Phase::ShowingSolution);
        self.presenter.show(Screen::Solution(Box::new(view)));
        Ok(())
    }

    fn solution_dismissed(&mut self) -> Result<(), Error> {
        self.expect_phase(&[Phase::ShowingSolution])?;
        let game = self.game.as_ref().ok_or(Error::NotInProgress("game"))?;
        let round = game
            .state
            .current_round()
            .ok_or(Error::NotInProgress("round"))?;

        if round.is_complete(game.settings.questions_per_round) {
            self.end_round()
        } else {
            self.open_question()
        }
    }

    fn end_round(&mut self) -> Result<(), Error> {
        self.expect_phase(&[Phase::ShowingSolution])?;
        let game = self.game.as_mut().ok_or(Error::NotInProgress("game"))?;
        game.question = None;
        let standings = game.standings();

        if !game.state.all_rounds_begun() {
            self.set_phase(Phase::RoundOverview);
            self.presenter.show(Screen::RoundOverview(standings));
            return Ok(());
        }

        for side in TeamSide::ALL {
            self.hall_of_fame.add_entry(
                game.state.team(side),
                game.state.team_points(side),
                &game.settings.location,
            );
        }

        let winner = game.state.leader();
        info!(
            team_one = standings.teams[TeamSide::One].points,
            team_two = standings.teams[TeamSide::Two].points,
            ?winner,
            "game finished"
        );

        self.set_phase(Phase::ShowingWinner);
        self.presenter.show(Screen::Winner { standings, winner });
        Ok(())
    }

    fn winner_dismissed(&mut self) -> Result<(), Error> {
        self.expect_phase(&[Phase::ShowingWinner])?;
        let game = self.game.as_ref().ok_or(Error::NotInProgress("game"))?;
        let highlight = TeamSide::ALL.map(|side| game.state.team(side).name().to_owned());

        self.set_phase(Phase::ShowingHallOfFame);
        self.presenter.show(Screen::HallOfFame {
            standings: hall_of_fame::standings(&self.hall_of_fame),
            highlight: Some(highlight),
        });
        Ok(())
    }

    fn settings_dismissed(&mut self, edited: Option<Settings>) -> Result<(), Error> {
        self.expect_phase(&[Phase::ShowingSettings])?;

        if let Some(settings) = edited.filter(|s| s != self.settings.settings()) {
            if let Err(error) = settings.check() {
                warn!(%error, "settings rejected");
                self.presenter
                    .update(Update::SettingsRejected(error.to_string()));
                return Ok(());
            }
            if let Err(error) = self.settings.update(settings) {
                warn!(%error, "settings could not be saved");
            }
        }

        self.start();
        Ok(())
    }
}
