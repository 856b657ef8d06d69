//! Background tasks feeding the event loop.

use crate::api_client::SearchBackend;
use crate::controller::PendingSearch;
use crate::events::TuiEvent;
use crossterm::event::{self, Event as CrosstermEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Execute `pending` on the runtime and report its outcome as an event.
///
/// Searches are never cancelled; overlapping searches all report back and
/// the controller drops the stale ones.
pub fn spawn_search<B>(backend: Arc<B>, pending: PendingSearch, sender: mpsc::Sender<TuiEvent>)
where
    B: SearchBackend + ?Sized + 'static,
{
    tokio::spawn(async move {
        let outcome = backend.content_search(&pending.request).await;
        let event = TuiEvent::SearchCompleted {
            generation: pending.generation,
            outcome,
        };
        if sender.send(event).await.is_err() {
            tracing::debug!(generation = pending.generation.get(), "event loop gone, search outcome discarded");
        }
    });
}

pub fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let forwarded = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ApiClientError;
    use async_trait::async_trait;
    use libsearch_core::{FilterSet, Generation, PageNumber, SearchRequest, ServerResponse};

    struct EmptyBackend;

    #[async_trait]
    impl SearchBackend for EmptyBackend {
        async fn content_search(&self, _request: &SearchRequest) -> Result<ServerResponse, ApiClientError> {
            Ok(ServerResponse::new(0, Vec::new()))
        }
    }

    #[tokio::test]
    async fn spawned_search_reports_its_generation() {
        let (tx, mut rx) = mpsc::channel(4);
        let generation = Generation::default().next().next();
        let pending = PendingSearch {
            generation,
            request: SearchRequest::new(&FilterSet::default(), 10, PageNumber::FIRST, None, None),
        };
        spawn_search(Arc::new(EmptyBackend), pending, tx);
        match rx.recv().await {
            Some(TuiEvent::SearchCompleted { generation: got, outcome }) => {
                assert_eq!(got, generation);
                assert_eq!(outcome.unwrap().result.count, 0);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
