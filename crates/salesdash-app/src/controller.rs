// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::ids::SalesRepId;
use crate::model::{ResultPage, SalesRep};
use crate::query::{Column, FilterField, PageSize, QueryState, SalesRepQuery};

/// Anything that can answer a sales rep query: the HTTP API, the local demo
/// store, or a test double.
pub trait SalesRepSource {
    fn fetch_page(&self, query: &SalesRepQuery) -> Result<ResultPage, FetchError>;
}

/// One issued request. The transport runs `query` and hands the result back to
/// [`TableController::complete_fetch`] together with `request_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub request_id: u64,
    pub query: SalesRepQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { request_id: u64, rows: usize },
    Failed { request_id: u64, error: FetchError },
    Discarded { request_id: u64, latest: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    SetPage(u32),
    NextPage,
    PreviousPage,
    SetPageSize(PageSize),
    Sort(Column),
    EditDraftFilter(FilterField, String),
    ApplyFilters,
    ResetFilters,
    SelectRow(usize),
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    FetchIssued(FetchTicket),
    DraftEdited(FilterField),
    FiltersReset,
    SelectionChanged(Option<SalesRepId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub page: u32,
    pub total_pages: u32,
    pub shown: usize,
    pub total_count: u64,
    pub can_previous: bool,
    pub can_next: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl TableSummary {
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }

    pub fn results_label(&self) -> String {
        format!("Showing {} of {} results", self.shown, self.total_count)
    }
}

/// Owns query state, the current result page and the selection for one
/// mounted table view.
///
/// Every transition that changes what should be shown returns a
/// [`FetchTicket`]. Only the most recently issued ticket may complete; older
/// ones are discarded when they resolve.
#[derive(Debug, Clone, Default)]
pub struct TableController {
    query: QueryState,
    result: ResultPage,
    selection: Option<SalesRep>,
    error: Option<FetchError>,
    last_issued: u64,
    in_flight: Option<u64>,
}

impl TableController {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            query: QueryState::new(page_size),
            ..Self::default()
        }
    }

    /// Issues the initial fetch for a freshly mounted view.
    pub fn mount(&mut self) -> FetchTicket {
        self.begin_fetch(false)
    }

    pub const fn query(&self) -> &QueryState {
        &self.query
    }

    pub const fn result(&self) -> &ResultPage {
        &self.result
    }

    pub fn rows(&self) -> &[SalesRep] {
        &self.result.rows
    }

    pub const fn selection(&self) -> Option<&SalesRep> {
        self.selection.as_ref()
    }

    pub const fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub const fn latest_request_id(&self) -> u64 {
        self.last_issued
    }

    pub fn can_previous(&self) -> bool {
        self.query.page() > 1
    }

    pub fn can_next(&self) -> bool {
        self.query.page() < self.result.total_pages
    }

    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        self.query.set_page(page).then(|| self.begin_fetch(false))
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.can_next() {
            return None;
        }
        self.set_page(self.query.page() + 1)
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        if !self.can_previous() {
            return None;
        }
        self.set_page(self.query.page() - 1)
    }

    pub fn set_page_size(&mut self, page_size: PageSize) -> Option<FetchTicket> {
        self.query
            .set_page_size(page_size)
            .then(|| self.begin_fetch(false))
    }

    pub fn set_sort(&mut self, column: Column) -> Option<FetchTicket> {
        self.query.set_sort(column).then(|| self.begin_fetch(false))
    }

    pub fn edit_draft_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.query.edit_draft_filter(field, value);
    }

    pub fn apply_filters(&mut self) -> FetchTicket {
        self.query.apply_filters();
        self.begin_fetch(true)
    }

    /// Clears draft and applied filters. The current rows stay as they are
    /// until the next fetch.
    pub fn reset_filters(&mut self) {
        self.query.reset_filters();
    }

    pub fn select(&mut self, record: SalesRep) {
        self.selection = Some(record);
    }

    pub fn select_row(&mut self, index: usize) -> bool {
        let Some(record) = self.result.rows.get(index) else {
            return false;
        };
        self.selection = Some(record.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Index of the selected record within the current page, if it is on it.
    pub fn highlighted_row(&self) -> Option<usize> {
        let selected = self.selection.as_ref()?;
        self.result.position_of(selected.id)
    }

    /// Starts a request for the current query state. Applied filters are sent
    /// only when `include_filters` is set, which only [`Self::apply_filters`]
    /// does; page, sort and size requests carry none.
    pub fn begin_fetch(&mut self, include_filters: bool) -> FetchTicket {
        self.last_issued += 1;
        self.in_flight = Some(self.last_issued);
        let query = self.query.to_query(include_filters);
        debug!(
            request_id = self.last_issued,
            page = query.page,
            page_size = query.page_size.get(),
            sort_by = query.sort_field.as_str(),
            sort_order = query.sort_order.as_str(),
            filters = query.filters.len(),
            "issue sales rep fetch"
        );
        FetchTicket {
            request_id: self.last_issued,
            query,
        }
    }

    pub fn complete_fetch(
        &mut self,
        request_id: u64,
        result: Result<ResultPage, FetchError>,
    ) -> FetchOutcome {
        if self.in_flight != Some(request_id) {
            debug!(request_id, latest = self.last_issued, "discard stale fetch");
            return FetchOutcome::Discarded {
                request_id,
                latest: self.last_issued,
            };
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let rows = page.rows.len();
                info!(
                    request_id,
                    rows,
                    total_pages = page.total_pages,
                    total_count = page.total_count,
                    "apply sales rep page"
                );
                self.result = page;
                self.error = None;
                FetchOutcome::Applied { request_id, rows }
            }
            Err(error) => {
                warn!(request_id, kind = error.kind(), %error, "sales rep fetch failed");
                self.error = Some(error.clone());
                FetchOutcome::Failed { request_id, error }
            }
        }
    }

    /// Runs a ticket to completion against `source` on the calling thread.
    pub fn execute(&mut self, ticket: FetchTicket, source: &dyn SalesRepSource) -> FetchOutcome {
        let result = source.fetch_page(&ticket.query);
        self.complete_fetch(ticket.request_id, result)
    }

    pub fn refetch(&mut self, source: &dyn SalesRepSource) -> FetchOutcome {
        let ticket = self.begin_fetch(false);
        self.execute(ticket, source)
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        let ticket = match command {
            TableCommand::SetPage(page) => self.set_page(page),
            TableCommand::NextPage => self.next_page(),
            TableCommand::PreviousPage => self.previous_page(),
            TableCommand::SetPageSize(size) => self.set_page_size(size),
            TableCommand::Sort(column) => self.set_sort(column),
            TableCommand::ApplyFilters => Some(self.apply_filters()),
            TableCommand::EditDraftFilter(field, value) => {
                self.edit_draft_filter(field, value);
                return vec![TableEvent::DraftEdited(field)];
            }
            TableCommand::ResetFilters => {
                self.reset_filters();
                return vec![TableEvent::FiltersReset];
            }
            TableCommand::SelectRow(index) => {
                if !self.select_row(index) {
                    return Vec::new();
                }
                return vec![TableEvent::SelectionChanged(
                    self.selection.as_ref().map(|rep| rep.id),
                )];
            }
            TableCommand::ClearSelection => {
                if self.selection.take().is_none() {
                    return Vec::new();
                }
                return vec![TableEvent::SelectionChanged(None)];
            }
        };

        ticket.map(TableEvent::FetchIssued).into_iter().collect()
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            page: self.query.page(),
            total_pages: self.result.total_pages,
            shown: self.result.rows.len(),
            total_count: self.result.total_count,
            can_previous: self.can_previous(),
            can_next: self.can_next(),
            loading: self.is_loading(),
            error: self.error.as_ref().map(ToString::to_string),
        }
    }
}
