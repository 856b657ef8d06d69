//! Search page view state and its reducer.
//!
//! The page state is an immutable value. Every event produces a new state
//! through [`reduce`]; nothing mutates a state in place.

use crate::card::Card;
use crate::pager::Pager;
use crate::query::{PageNumber, SearchQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number of an issued search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed user-facing messages of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultMessages {
    pub no_result_title: String,
    pub no_result_text: String,
    pub search_failed_text: String,
    pub search_failed_toast: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoResultMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchViewState {
    pub page: PageNumber,
    pub query: SearchQuery,
    pub show_loader: bool,
    pub no_result: bool,
    pub no_result_message: Option<NoResultMessage>,
    pub search_list: Vec<Card>,
    pub total_count: u64,
    pub pager: Option<Pager>,
    /// Latest issued search; only its outcome is applied.
    pub generation: Generation,
}

impl Default for SearchViewState {
    fn default() -> Self {
        Self {
            page: PageNumber::FIRST,
            query: SearchQuery::from_route(None, &Default::default(), PageNumber::FIRST),
            show_loader: true,
            no_result: false,
            no_result_message: None,
            search_list: Vec::new(),
            total_count: 0,
            pager: None,
            generation: Generation::default(),
        }
    }
}

impl SearchViewState {
    /// True when `page` may be navigated to under the current pager.
    pub fn can_navigate_to(&self, page: u32) -> bool {
        self.pager.as_ref().is_some_and(|pager| pager.contains(page))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Route or query parameters changed.
    RouteChanged { query: SearchQuery },
    /// User picked another page of the current result set.
    PageSelected { page: PageNumber },
    SearchIssued { generation: Generation },
    SearchSucceeded {
        generation: Generation,
        total_count: u64,
        cards: Vec<Card>,
        pager: Pager,
    },
    SearchEmpty { generation: Generation },
    SearchFailed { generation: Generation },
}

/// Outcome of one reducer step.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduced {
    pub state: SearchViewState,
    /// False when the event was a stale search outcome and was dropped.
    pub applied: bool,
}

/// Apply `event` to `state`.
pub fn reduce(state: &SearchViewState, event: ViewEvent, messages: &ResultMessages) -> Reduced {
    if let Some(generation) = event.outcome_generation() {
        if generation != state.generation {
            return Reduced {
                state: state.clone(),
                applied: false,
            };
        }
    }

    let mut next = state.clone();
    match event {
        ViewEvent::RouteChanged { query } => {
            next.page = query.page;
            next.query = query;
        }
        ViewEvent::PageSelected { page } => {
            next.page = page;
            next.query.page = page;
        }
        ViewEvent::SearchIssued { generation } => {
            next.generation = generation;
            next.show_loader = true;
        }
        ViewEvent::SearchSucceeded {
            total_count,
            cards,
            pager,
            ..
        } => {
            next.show_loader = false;
            next.no_result = false;
            next.search_list = cards;
            next.total_count = total_count;
            next.pager = Some(pager);
        }
        ViewEvent::SearchEmpty { .. } => {
            next.show_loader = false;
            next.no_result = true;
            next.no_result_message = Some(NoResultMessage {
                message: Some(messages.no_result_title.clone()),
                message_text: messages.no_result_text.clone(),
            });
        }
        ViewEvent::SearchFailed { .. } => {
            next.show_loader = false;
            next.no_result = true;
            next.no_result_message = Some(NoResultMessage {
                message: None,
                message_text: messages.search_failed_text.clone(),
            });
        }
    }

    Reduced {
        state: next,
        applied: true,
    }
}

impl ViewEvent {
    fn outcome_generation(&self) -> Option<Generation> {
        match self {
            ViewEvent::SearchSucceeded { generation, .. }
            | ViewEvent::SearchEmpty { generation }
            | ViewEvent::SearchFailed { generation } => Some(*generation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardMapping;
    use crate::request::ContentItem;
    use serde_json::{json, Value};

    fn messages() -> ResultMessages {
        ResultMessages {
            no_result_title: "No results".to_string(),
            no_result_text: "Try different filters".to_string(),
            search_failed_text: "Could not fetch content".to_string(),
            search_failed_toast: "Search failed, please try again".to_string(),
        }
    }

    fn cards(n: usize) -> Vec<Card> {
        let content: Vec<ContentItem> = (0..n)
            .map(|i| match json!({ "identifier": format!("do_{i}"), "name": format!("Item {i}") }) {
                Value::Object(map) => ContentItem(map),
                _ => unreachable!(),
            })
            .collect();
        CardMapping::default().to_cards(&content)
    }

    fn issued(state: &SearchViewState) -> (SearchViewState, Generation) {
        let generation = state.generation.next();
        let reduced = reduce(state, ViewEvent::SearchIssued { generation }, &messages());
        (reduced.state, generation)
    }

    #[test]
    fn success_shows_results_and_pager() {
        let (state, generation) = issued(&SearchViewState::default());
        assert!(state.show_loader);

        let pager = Pager::new(5, 1, 2, 5).unwrap();
        let reduced = reduce(
            &state,
            ViewEvent::SearchSucceeded {
                generation,
                total_count: 5,
                cards: cards(5),
                pager,
            },
            &messages(),
        );
        assert!(reduced.applied);
        let state = reduced.state;
        assert!(!state.show_loader);
        assert!(!state.no_result);
        assert_eq!(state.search_list.len(), 5);
        assert_eq!(state.pager.as_ref().map(|p| p.total_pages), Some(3));
    }

    #[test]
    fn empty_keeps_previous_list_and_sets_message_pair() {
        let (state, generation) = issued(&SearchViewState::default());
        let state = reduce(
            &state,
            ViewEvent::SearchSucceeded {
                generation,
                total_count: 2,
                cards: cards(2),
                pager: Pager::new(2, 1, 10, 5).unwrap(),
            },
            &messages(),
        )
        .state;

        let (state, generation) = issued(&state);
        let state = reduce(&state, ViewEvent::SearchEmpty { generation }, &messages()).state;
        assert!(state.no_result);
        assert!(!state.show_loader);
        assert_eq!(state.search_list.len(), 2);
        assert_eq!(
            state.no_result_message,
            Some(NoResultMessage {
                message: Some("No results".to_string()),
                message_text: "Try different filters".to_string(),
            })
        );
    }

    #[test]
    fn failure_sets_error_message() {
        let (state, generation) = issued(&SearchViewState::default());
        let state = reduce(&state, ViewEvent::SearchFailed { generation }, &messages()).state;
        assert!(state.no_result);
        assert!(!state.show_loader);
        assert_eq!(
            state.no_result_message.map(|m| m.message_text),
            Some("Could not fetch content".to_string())
        );
    }

    #[test]
    fn stale_outcome_is_dropped() {
        let (state, first) = issued(&SearchViewState::default());
        let (state, second) = issued(&state);
        assert_ne!(first, second);

        let reduced = reduce(&state, ViewEvent::SearchFailed { generation: first }, &messages());
        assert!(!reduced.applied);
        assert_eq!(reduced.state, state);

        let reduced = reduce(&state, ViewEvent::SearchEmpty { generation: second }, &messages());
        assert!(reduced.applied);
        assert!(reduced.state.no_result);
    }

    #[test]
    fn navigation_requires_pager() {
        let state = SearchViewState::default();
        assert!(!state.can_navigate_to(1));
    }
}
