//! # Team Quiz Library
//!
//! This library provides the game controller for a two-team quiz night.
//! Teams pick categories, answer timed multiple choice questions and collect
//! points over a fixed number of rounds; the results end up in a hall of
//! fame. Rendering, persistence of settings and storage of the hall of fame
//! are left to the embedding application, which plugs in through the
//! [`session::Presenter`], [`settings::SettingsStore`] and
//! [`hall_of_fame::HallOfFame`] traits.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use derive_where::derive_where;
use itertools::Itertools;
use serde::Serialize;

pub mod catalog;
pub mod constants;
pub mod game;
pub mod game_state;
pub mod hall_of_fame;
pub mod names;
pub mod round;
pub mod session;
pub mod settings;
pub mod teams;
pub mod timer;

/// Everything the controller reacts to
///
/// Input from the presentation layer and notifications from the question
/// countdown share one queue and are handled by a single transition
/// function, [`game::GameController::handle`].
#[derive(Debug, Clone, derive_more::From)]
pub enum Event {
    /// Input from the presentation layer
    Message(game::IncomingMessage),
    /// A tick or expiry of the question countdown
    Timer(timer::TimerNotification),
}

/// A truncated vector that maintains the exact count while limiting displayed items
///
/// This structure is useful for displaying a limited number of items while
/// still showing the total count. For example, showing "120 entries" but only
/// sending the best 50.
#[derive(Debug, Clone, Serialize)]
#[derive_where(Default)]
pub struct TruncatedVec<T> {
    /// The exact total count of items
    exact_count: usize,
    /// The truncated list of items (up to the limit)
    items: Vec<T>,
}

impl<T: Clone> TruncatedVec<T> {
    /// Creates a new truncated vector from an iterator
    ///
    /// # Arguments
    ///
    /// * `list` - An iterator over items to include
    /// * `limit` - Maximum number of items to include in the truncated vector
    /// * `exact_count` - The exact total count of items (may be larger than limit)
    pub fn new<I: Iterator<Item = T>>(list: I, limit: usize, exact_count: usize) -> Self {
        let items = list.take(limit).collect_vec();
        Self { exact_count, items }
    }

    /// Returns the exact count of items
    pub fn exact_count(&self) -> usize {
        self.exact_count
    }

    /// Returns the truncated items
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_truncated_vec_new() {
        let truncated = TruncatedVec::new([1, 2, 3, 4, 5].into_iter(), 3, 5);

        assert_eq!(truncated.exact_count(), 5);
        assert_eq!(truncated.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_vec_limit_larger_than_items() {
        let truncated = TruncatedVec::new([1, 2, 3].into_iter(), 5, 3);

        assert_eq!(truncated.exact_count(), 3);
        assert_eq!(truncated.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_vec_default_is_empty() {
        let truncated = TruncatedVec::<String>::default();

        assert_eq!(truncated.exact_count(), 0);
        assert!(truncated.items().is_empty());
    }

    #[test]
    fn test_event_from_message() {
        let event: Event = game::IncomingMessage::CancelGame.into();
        assert!(matches!(
            event,
            Event::Message(game::IncomingMessage::CancelGame)
        ));
    }

    #[test]
    fn test_event_from_timer() {
        let notification: timer::TimerNotification = serde_json::from_str(
            r#"{"Tick":{"generation":1,"remaining":250,"total":5000}}"#,
        )
        .unwrap();
        let event: Event = notification.into();

        match event {
            Event::Timer(timer::TimerNotification::Tick {
                remaining, total, ..
            }) => {
                assert_eq!(remaining, Duration::from_millis(250));
                assert_eq!(total, Duration::from_secs(5));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
