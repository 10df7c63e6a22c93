//! Single-flight load coordination.
//!
//! The coordinator walks `Idle -> Loading -> Idle`. Every request it starts
//! is described by a [`LoadTicket`] carrying the generation and the query it
//! was issued for; a completion whose ticket does not belong to the current
//! generation is stale and must be dropped. A failure also returns to
//! `Idle`: retries are up to the caller.
use tracing::debug;

use crate::{LoadingStrategy, PaginationState, QueryDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    /// First page for a query, used to learn `total`.
    Probe,
    /// The page after the highest loaded one.
    Next,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading(LoadKind),
}

/// Identity of one in-flight request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub query: Option<QueryDescriptor>,
    pub kind: LoadKind,
    pub page: u64,
    pub limit: u64,
    /// Deletions of loaded records this request already compensates for.
    pub shift: u64,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    generation: u64,
    phase: LoadPhase,
}

impl Coordinator {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading(_))
    }

    /// Opens a new generation and starts its probe. Whatever was in flight
    /// for the previous generation becomes stale.
    pub fn start_probe(&mut self, query: Option<QueryDescriptor>, limit: u64) -> LoadTicket {
        self.generation += 1;
        self.phase = LoadPhase::Loading(LoadKind::Probe);
        debug!(generation = self.generation, limit, "probe started");
        LoadTicket {
            generation: self.generation,
            query,
            kind: LoadKind::Probe,
            page: 1,
            limit,
            shift: 0,
        }
    }

    /// Starts the next page if the dataset is incremental, nothing is in
    /// flight and records are still missing. Returns `None` otherwise, which
    /// makes repeated triggers while loading a no-op.
    ///
    /// `shift` counts loaded records deleted since the last merge; the page
    /// is picked so that no server offset is skipped.
    pub fn start_next(
        &mut self,
        query: Option<&QueryDescriptor>,
        strategy: Option<LoadingStrategy>,
        pagination: &PaginationState,
        loaded: u64,
        shift: u64,
    ) -> Option<LoadTicket> {
        if self.is_loading() || strategy != Some(LoadingStrategy::Incremental) {
            return None;
        }
        let page = pagination.next_page(shift);
        if loaded >= pagination.total || page > pagination.total_pages() {
            return None;
        }

        self.phase = LoadPhase::Loading(LoadKind::Next);
        debug!(generation = self.generation, page, shift, "next page started");
        Some(LoadTicket {
            generation: self.generation,
            query: query.cloned(),
            kind: LoadKind::Next,
            page,
            limit: pagination.limit,
            shift,
        })
    }

    /// Settles the request behind `ticket`. Returns `false` when the ticket
    /// is stale, in which case the current phase is left untouched.
    pub fn finish(&mut self, ticket: &LoadTicket, current: Option<&QueryDescriptor>) -> bool {
        if ticket.generation != self.generation || ticket.query.as_ref() != current {
            return false;
        }
        self.phase = LoadPhase::Idle;
        true
    }

    /// Releases the slot held by a request that will never complete, e.g.
    /// because its future was dropped. Returns `false` when `ticket` no
    /// longer owns the slot.
    pub fn abandon(&mut self, ticket: &LoadTicket) -> bool {
        if ticket.generation != self.generation || self.phase != LoadPhase::Loading(ticket.kind) {
            return false;
        }
        debug!(generation = ticket.generation, page = ticket.page, "request abandoned");
        self.phase = LoadPhase::Idle;
        true
    }
}

/// Whether a viewport whose last rendered index is `render_end` is close
/// enough to the end of the `materialized` records to want the next page.
pub fn within_lookahead(render_end: u64, materialized: u64, lookahead: u64) -> bool {
    render_end.saturating_add(lookahead) >= materialized
}
