//! Search results page controller.
//!
//! Owns the page view state and drives it through the core reducer. Backend
//! calls are not awaited here: [`SearchResultsController::search`] returns a
//! [`PendingSearch`] that the runtime executes, and the outcome comes back
//! through [`SearchResultsController::complete`]. Only the outcome of the
//! latest issued search is applied.

use crate::api_client::{ApiClientError, SearchBackend};
use crate::config::{SortOption, TuiConfig};
use crate::nav::{Location, NavError, Navigator, Route};
use crate::notifications::{Notification, NotificationLevel};
use crate::player::PlayerService;
use chrono::{DateTime, Utc};
use libsearch_core::{
    reduce, Card, CardMapping, FilterSet, Generation, ImpressionEvent, InteractDescriptors,
    InviewEntry, InviewLog, PageNumber, Pager, ResultMessages, SearchQuery, SearchRequest,
    SearchViewState, ServerResponse, TelemetryRouteData, ViewEvent,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Read-only settings of the page.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub page_limit: u32,
    pub page_strip: u32,
    pub filter_type: Vec<String>,
    pub redirect_url: String,
    pub sort_options: Vec<SortOption>,
    pub card: CardMapping,
    pub messages: ResultMessages,
    pub telemetry: TelemetryRouteData,
}

impl From<&TuiConfig> for SearchSettings {
    fn from(config: &TuiConfig) -> Self {
        Self {
            page_limit: config.search.page_limit,
            page_strip: config.search.page_strip,
            filter_type: config.search.filter_type.clone(),
            redirect_url: config.search.redirect_url.clone(),
            sort_options: config.sort_options.clone(),
            card: config.card.clone(),
            messages: config.messages.clone(),
            telemetry: config.telemetry.clone(),
        }
    }
}

/// A search that has been issued but not yet answered.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSearch {
    pub generation: Generation,
    pub request: SearchRequest,
}

/// A card currently inside the viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleCard {
    /// Position of the card in the result list.
    pub index: usize,
    pub identifier: Option<String>,
    pub object_type: String,
}

impl VisibleCard {
    pub fn from_card(index: usize, card: &Card) -> Self {
        Self {
            index,
            identifier: card.identifier.clone(),
            object_type: card.object_type.clone(),
        }
    }
}

/// Viewport report: the cards visible right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviewEvent {
    pub inview: Vec<VisibleCard>,
}

pub struct SearchResultsController {
    settings: SearchSettings,
    navigator: Arc<dyn Navigator>,
    player: Arc<dyn PlayerService>,
    state: SearchViewState,
    interact: InteractDescriptors,
    inview_log: InviewLog,
    impression: watch::Sender<Arc<ImpressionEvent>>,
    notifications: Vec<Notification>,
}

impl SearchResultsController {
    /// Build the controller for the page opened at `route`.
    pub fn new(
        settings: SearchSettings,
        navigator: Arc<dyn Navigator>,
        player: Arc<dyn PlayerService>,
        route: &Route,
    ) -> Self {
        let impression = ImpressionEvent::new(&settings.telemetry, route.url());
        let (impression, _) = watch::channel(Arc::new(impression));
        Self {
            settings,
            navigator,
            player,
            state: SearchViewState::default(),
            interact: InteractDescriptors::library_search(),
            inview_log: InviewLog::new(),
            impression,
            notifications: Vec::new(),
        }
    }

    /// Build the controller and issue the first search for `route`.
    pub fn init(
        settings: SearchSettings,
        navigator: Arc<dyn Navigator>,
        player: Arc<dyn PlayerService>,
        route: &Route,
    ) -> (Self, PendingSearch) {
        let mut controller = Self::new(settings, navigator, player, route);
        let pending = controller.on_route_change(route);
        (controller, pending)
    }

    /// Derive page, filters, text and sort from `route`, then search.
    pub fn on_route_change(&mut self, route: &Route) -> PendingSearch {
        let query = SearchQuery::from_route(route.page_param.as_deref(), &route.query_params, self.state.page);
        let filters = query.filters.clone();
        self.apply(ViewEvent::RouteChanged { query });
        self.search(&filters)
    }

    /// Issue a search for the current page with `filters`.
    pub fn search(&mut self, filters: &FilterSet) -> PendingSearch {
        let generation = self.state.generation.next();
        let request = SearchRequest::new(
            filters,
            self.settings.page_limit,
            self.state.page,
            self.state.query.text.clone(),
            self.state.query.sort.as_ref(),
        );
        self.apply(ViewEvent::SearchIssued { generation });
        tracing::info!(
            generation = generation.get(),
            page = self.state.page.get(),
            filters = request.filters.len(),
            "content search issued"
        );
        PendingSearch { generation, request }
    }

    /// Apply a backend outcome. Returns false when the outcome was stale.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<ServerResponse, ApiClientError>,
    ) -> bool {
        let event = match outcome {
            Ok(response) if response.has_results() => self.success_event(generation, &response),
            Ok(_) => ViewEvent::SearchEmpty { generation },
            Err(err) => {
                tracing::warn!(generation = generation.get(), error = %err, "content search failed");
                ViewEvent::SearchFailed { generation }
            }
        };
        let failed = matches!(event, ViewEvent::SearchFailed { .. });

        if !self.apply(event) {
            tracing::debug!(
                generation = generation.get(),
                latest = self.state.generation.get(),
                "stale search outcome dropped"
            );
            return false;
        }
        if failed {
            let toast = self.settings.messages.search_failed_toast.clone();
            self.notify(NotificationLevel::Error, toast);
        }
        true
    }

    /// Run `pending` against `backend` and apply its outcome.
    pub async fn run_search<B>(&mut self, backend: &B, pending: PendingSearch) -> bool
    where
        B: SearchBackend + ?Sized,
    {
        let outcome = backend.content_search(&pending.request).await;
        self.complete(pending.generation, outcome)
    }

    /// Navigate to `page` of the current results. No-op outside the pager.
    pub fn navigate_to_page(&mut self, page: u32) -> bool {
        if !self.state.can_navigate_to(page) {
            return false;
        }
        let Some(page) = PageNumber::new(page) else {
            return false;
        };
        let route = Route::library_search(page, self.state.query.query_params.clone());
        if let Err(err) = self.navigator.navigate(Location::Search(route)) {
            tracing::warn!(page = page.get(), error = %err, "page navigation failed");
            self.notify(NotificationLevel::Warning, format!("Could not open page {}", page));
            return false;
        }
        self.apply(ViewEvent::PageSelected { page });
        true
    }

    /// Record newly visible cards and publish a page-exit impression.
    pub fn on_card_visible(&mut self, event: &InviewEvent) {
        for card in &event.inview {
            let Some(identifier) = &card.identifier else {
                continue;
            };
            self.inview_log.record(InviewEntry {
                objid: identifier.clone(),
                objtype: card.object_type.clone(),
                index: card.index,
            });
        }
        let snapshot = self.impression.borrow().with_page_exit(&self.inview_log);
        self.impression.send_replace(Arc::new(snapshot));
    }

    /// Hand the card's metadata to the player.
    pub fn on_play(&mut self, card: &Card) {
        let identifier = card.identifier.as_deref().unwrap_or_default();
        tracing::info!(interact = %self.interact.card.id, identifier, "content card played");
        if let Err(err) = self.player.play_content(&card.meta_data) {
            tracing::warn!(identifier, error = %err, "content could not be opened");
            self.notify(NotificationLevel::Warning, format!("Could not open {}", card.title()));
        }
    }

    /// Leave the page for the configured redirect location.
    pub fn close(&self) -> Result<(), NavError> {
        tracing::info!(
            interact = %self.interact.close.id,
            url = %self.settings.redirect_url,
            "search closed"
        );
        self.navigator
            .navigate(Location::Other(self.settings.redirect_url.clone()))
    }

    pub fn impressions(&self) -> watch::Receiver<Arc<ImpressionEvent>> {
        self.impression.subscribe()
    }

    pub fn impression(&self) -> Arc<ImpressionEvent> {
        self.impression.borrow().clone()
    }

    pub fn state(&self) -> &SearchViewState {
        &self.state
    }

    pub fn interact(&self) -> &InteractDescriptors {
        &self.interact
    }

    pub fn inview_log(&self) -> &InviewLog {
        &self.inview_log
    }

    pub fn filter_type(&self) -> &[String] {
        &self.settings.filter_type
    }

    pub fn redirect_url(&self) -> &str {
        &self.settings.redirect_url
    }

    pub fn sort_options(&self) -> &[SortOption] {
        &self.settings.sort_options
    }

    /// Display name of the active sort, if any.
    pub fn active_sort_name(&self) -> Option<&str> {
        let sort = self.state.query.sort.as_ref()?;
        self.settings
            .sort_options
            .iter()
            .find(|option| option.field == sort.field)
            .map(|option| option.name.as_str())
            .or(Some(sort.field.as_str()))
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn dismiss_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Drop notifications older than `ttl_ms`.
    pub fn prune_notifications(&mut self, now: DateTime<Utc>, ttl_ms: u64) {
        self.notifications.retain(|note| !note.is_expired(now, ttl_ms));
    }

    fn success_event(&self, generation: Generation, response: &ServerResponse) -> ViewEvent {
        let count = response.result.count;
        match Pager::new(count, self.state.page.get(), self.settings.page_limit, self.settings.page_strip) {
            Ok(pager) => {
                tracing::info!(generation = generation.get(), count, "content search succeeded");
                ViewEvent::SearchSucceeded {
                    generation,
                    total_count: count,
                    cards: self.settings.card.to_cards(&response.result.content),
                    pager,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "pager could not be computed");
                ViewEvent::SearchFailed { generation }
            }
        }
    }

    fn apply(&mut self, event: ViewEvent) -> bool {
        let reduced = reduce(&self.state, event, &self.settings.messages);
        self.state = reduced.state;
        reduced.applied
    }
}
