//! The synchronous core of the feed.
//!
//! [`FeedState`] owns the mirror and every counter describing it. Loads are
//! split in two halves: a `begin_*` call hands out a [`LoadTicket`], the host
//! performs the request however it likes, and [`FeedState::complete`] merges
//! the result. Nothing here performs I/O, so hosts with their own event loop
//! can drive it directly and tests need no runtime.
use std::collections::HashSet;

use api_types::transaction::{PageResponse, TransactionRecord};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    Coordinator, FeedError, LoadKind, LoadTicket, LoaderConfig, LoadingStrategy, Mirror,
    Mutation, PaginationState, QueryDescriptor, Reconciled, Selection, StoreError,
    SuggestionIndex, choose_strategy, coordinator::within_lookahead, reconciler,
};

/// Result of settling (or trying to start) a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was merged; `appended` records were new to the mirror.
    Loaded { appended: usize },
    /// No load was started: one is already in flight, the dataset is
    /// complete, or it is not loaded incrementally.
    Skipped,
    /// The response belonged to a superseded query and was dropped.
    Stale,
    /// The server's `total` moved in a way the mirror cannot account for.
    /// The page was not merged; re-probe with a refresh.
    Drifted { expected: u64, reported: u64 },
    /// The request failed; the mirror is untouched.
    Failed(StoreError),
}

/// Everything a presentation layer needs to render the list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedSnapshot {
    pub records: Vec<TransactionRecord>,
    pub pagination: PaginationState,
    pub strategy: Option<LoadingStrategy>,
    pub loading: bool,
    pub error: Option<StoreError>,
    pub selected: HashSet<Uuid>,
    pub drifted: bool,
}

#[derive(Debug)]
pub struct FeedState {
    config: LoaderConfig,
    query: Option<QueryDescriptor>,
    mirror: Mirror,
    strategy: Option<LoadingStrategy>,
    coordinator: Coordinator,
    suggestions: SuggestionIndex,
    error: Option<StoreError>,
    drifted: bool,
}

impl FeedState {
    pub fn new(config: LoaderConfig) -> Result<Self, FeedError> {
        config.validate()?;
        Ok(Self {
            config,
            query: None,
            mirror: Mirror::default(),
            strategy: None,
            coordinator: Coordinator::default(),
            suggestions: SuggestionIndex::default(),
            error: None,
            drifted: false,
        })
    }

    /// Switches to `query` and starts its probe. The mirror, the suggestions
    /// and the selection of the previous query are discarded right away.
    pub fn begin_initial(&mut self, query: Option<QueryDescriptor>) -> LoadTicket {
        self.mirror = Mirror::default();
        self.suggestions.clear();
        self.strategy = None;
        self.query = query;
        self.start_probe()
    }

    /// Re-probes the active query. Records stay visible until the probe
    /// answers; the selection is kept.
    pub fn begin_refresh(&mut self) -> LoadTicket {
        self.start_probe()
    }

    fn start_probe(&mut self) -> LoadTicket {
        self.error = None;
        self.drifted = false;
        self.coordinator
            .start_probe(self.query.clone(), self.config.server_max_page_size)
    }

    /// Starts the next page, or returns `None` when no load may start.
    pub fn begin_load_more(&mut self) -> Option<LoadTicket> {
        if self.drifted {
            return None;
        }
        let ticket = self.coordinator.start_next(
            self.query.as_ref(),
            self.strategy,
            &self.mirror.pagination,
            self.mirror.loaded(),
            self.mirror.shift,
        )?;
        self.error = None;
        Some(ticket)
    }

    /// Whether a viewport ending at `render_end` should pull the next page.
    pub fn wants_more(&self, render_end: u64) -> bool {
        self.strategy == Some(LoadingStrategy::Incremental)
            && !self.drifted
            && !self.coordinator.is_loading()
            && self.mirror.loaded() < self.mirror.pagination.total
            && within_lookahead(render_end, self.mirror.loaded(), self.config.lookahead)
    }

    /// Settles the request described by `ticket`.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<PageResponse, StoreError>,
    ) -> LoadOutcome {
        if !self.coordinator.finish(&ticket, self.query.as_ref()) {
            debug!(
                generation = ticket.generation,
                current = self.coordinator.generation(),
                page = ticket.page,
                "dropping stale response"
            );
            return LoadOutcome::Stale;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(page = ticket.page, "load failed: {err}");
                self.error = Some(err.clone());
                return LoadOutcome::Failed(err);
            }
        };

        match ticket.kind {
            LoadKind::Probe => self.merge_probe(response),
            LoadKind::Next => self.merge_next(&ticket, response),
        }
    }

    fn merge_probe(&mut self, response: PageResponse) -> LoadOutcome {
        let total = response.total;
        let plan = choose_strategy(total, &self.config);
        let mut data = response.data;

        match plan.strategy {
            LoadingStrategy::FullLoad => {
                if (data.len() as u64) < total {
                    warn!(
                        received = data.len(),
                        total, "full load came back short, server cap below configuration"
                    );
                }
            }
            LoadingStrategy::Incremental => {
                // Page 1 at the steady-state size is a prefix of the probe page.
                data.truncate(usize::try_from(plan.page_size).unwrap_or(usize::MAX));
            }
        }

        let mut mirror = Mirror {
            selection: std::mem::take(&mut self.mirror.selection),
            ..Mirror::default()
        };
        let appended = mirror.append_unique(data);
        let bounded = self.bounded_total(total, mirror.loaded());
        mirror.pagination = PaginationState::new(1, plan.page_size, bounded);

        self.suggestions.ingest(&mirror.records);
        self.mirror = mirror;
        self.strategy = Some(plan.strategy);

        info!(
            total,
            strategy = ?plan.strategy,
            page_size = plan.page_size,
            loaded = appended,
            "probe loaded"
        );
        LoadOutcome::Loaded { appended }
    }

    fn merge_next(&mut self, ticket: &LoadTicket, response: PageResponse) -> LoadOutcome {
        let expected = self.mirror.pagination.total;
        if response.total != expected {
            warn!(expected, reported = response.total, "total drifted, re-probe required");
            self.drifted = true;
            return LoadOutcome::Drifted {
                expected,
                reported: response.total,
            };
        }

        let start = self.mirror.records.len();
        let appended = self.mirror.append_unique(response.data);
        self.suggestions.ingest(&self.mirror.records[start..]);

        let total = self.bounded_total(response.total, self.mirror.loaded());
        self.mirror.pagination = self.mirror.pagination.merged(ticket.page, total);
        self.mirror.shift = self.mirror.shift.saturating_sub(ticket.shift);

        info!(
            page = self.mirror.pagination.page,
            loaded = self.mirror.loaded(),
            total,
            "page loaded"
        );
        LoadOutcome::Loaded { appended }
    }

    /// Gives back the load slot held by `ticket` without merging anything.
    /// Used when the request was cancelled before it could complete.
    pub fn abandon(&mut self, ticket: &LoadTicket) {
        if self.coordinator.abandon(ticket) {
            debug!(page = ticket.page, kind = ?ticket.kind, "load abandoned");
        }
    }

    fn bounded_total(&self, reported: u64, loaded: u64) -> u64 {
        if loaded > reported {
            warn!(loaded, reported, "server returned more records than its total");
            return loaded;
        }
        reported
    }

    /// Applies a server-confirmed mutation to the mirror.
    pub fn apply(&mut self, mutation: Mutation) -> Reconciled {
        if let Mutation::Created(record) | Mutation::Updated(record) = &mutation {
            self.suggestions.ingest([record]);
        }
        let mirror = std::mem::take(&mut self.mirror);
        let (mirror, outcome) = reconciler::reconcile(mirror, mutation);
        self.mirror = mirror;
        outcome
    }

    pub fn apply_create(&mut self, record: TransactionRecord) -> Reconciled {
        self.apply(Mutation::Created(record))
    }

    pub fn apply_update(&mut self, record: TransactionRecord) -> Reconciled {
        self.apply(Mutation::Updated(record))
    }

    pub fn apply_delete(&mut self, id: Uuid) -> Reconciled {
        self.apply(Mutation::Deleted(id))
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn query(&self) -> Option<&QueryDescriptor> {
        self.query.as_ref()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.mirror.records
    }

    pub fn loaded(&self) -> u64 {
        self.mirror.loaded()
    }

    pub fn pagination(&self) -> PaginationState {
        self.mirror.pagination
    }

    pub fn strategy(&self) -> Option<LoadingStrategy> {
        self.strategy
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    pub fn is_drifted(&self) -> bool {
        self.drifted
    }

    pub fn selection(&self) -> &Selection {
        &self.mirror.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.mirror.selection
    }

    pub fn select_all_loaded(&mut self) {
        let Mirror {
            records, selection, ..
        } = &mut self.mirror;
        selection.select_all_loaded(records);
    }

    /// Suggestions from the records paged in so far; see [`SuggestionIndex`].
    pub fn suggestions(&self) -> &SuggestionIndex {
        &self.suggestions
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            records: self.mirror.records.clone(),
            pagination: self.mirror.pagination,
            strategy: self.strategy,
            loading: self.coordinator.is_loading(),
            error: self.error.clone(),
            selected: self.mirror.selection.ids().clone(),
            drifted: self.drifted,
        }
    }
}
