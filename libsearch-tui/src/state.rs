//! Application state of the terminal search page.

use crate::config::TuiConfig;
use crate::controller::{InviewEvent, SearchResultsController, VisibleCard};
use crate::theme::Theme;
use libsearch_core::Card;

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    pub controller: SearchResultsController,
    /// Index of the highlighted card in the current result list.
    pub selected: usize,
    /// Index of the first card shown in the viewport.
    pub offset: usize,
    /// Number of cards that fit in the viewport.
    pub viewport_rows: usize,
    /// Last location opened outside the search page.
    pub location: Option<String>,
}

impl App {
    pub fn new(config: TuiConfig, controller: SearchResultsController) -> Self {
        Self {
            config,
            theme: Theme::synthbrute(),
            controller,
            selected: 0,
            offset: 0,
            viewport_rows: 1,
            location: None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        let state = self.controller.state();
        if state.no_result {
            return &[];
        }
        &state.search_list
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.cards().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards().len() {
            self.selected += 1;
        }
        self.scroll_to_selected();
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.scroll_to_selected();
    }

    /// Reset selection after a new result list arrives.
    pub fn reset_selection(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.scroll_to_selected();
    }

    pub fn next_page(&mut self) -> bool {
        let page = self.current_page();
        self.controller.navigate_to_page(page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        let page = self.current_page();
        self.controller.navigate_to_page(page.saturating_sub(1))
    }

    /// Page shown by the pager, which may differ from the route page when
    /// the route asked for a page past the end.
    fn current_page(&self) -> u32 {
        let state = self.controller.state();
        state
            .pager
            .as_ref()
            .map_or(state.page.get(), |pager| pager.current_page)
    }

    /// Jump to the `index`-th page of the pager strip.
    pub fn jump_to_strip(&mut self, index: usize) -> bool {
        let target = self
            .controller
            .state()
            .pager
            .as_ref()
            .and_then(|pager| pager.pages.get(index).copied());
        match target {
            Some(page) => self.controller.navigate_to_page(page),
            None => false,
        }
    }

    pub fn play_selected(&mut self) {
        if let Some(card) = self.selected_card().cloned() {
            self.controller.on_play(&card);
        }
    }

    /// Cards inside the viewport, with their list positions.
    pub fn visible_cards(&self) -> InviewEvent {
        let inview = self
            .cards()
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.viewport_rows)
            .map(|(index, card)| VisibleCard::from_card(index, card))
            .collect();
        InviewEvent { inview }
    }

    /// Report the viewport to the controller's visit log.
    pub fn report_visible(&mut self) {
        let event = self.visible_cards();
        if !event.inview.is_empty() {
            self.controller.on_card_visible(&event);
        }
    }

    pub fn prune_notifications(&mut self) {
        let ttl = self.config.notification_ttl_ms;
        self.controller.prune_notifications(chrono::Utc::now(), ttl);
    }

    /// Keep the selection inside the list and the viewport.
    pub fn clamp_selection(&mut self) {
        let len = self.cards().len();
        if len == 0 {
            self.reset_selection();
            return;
        }
        self.selected = self.selected.min(len - 1);
        self.scroll_to_selected();
    }

    fn scroll_to_selected(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.viewport_rows {
            self.offset = self.selected + 1 - self.viewport_rows;
        }
    }
}
