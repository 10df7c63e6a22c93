use api_types::transaction::{PageResponse, TransactionNew, TransactionRecord, TransactionUpdate};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::{
    FeedError, FeedSnapshot, FeedState, LoadOutcome, LoadTicket, LoaderConfig, Mutation,
    QueryDescriptor, Reconciled, RemoteStore, StoreError, SuggestionIndex,
};

/// Async driver around [`FeedState`] bound to a [`RemoteStore`].
///
/// Every transition is published to subscribers as a [`FeedSnapshot`].
/// Store failures never escape as panics or early returns from the load
/// methods: they come back as [`LoadOutcome::Failed`] and sit on the
/// snapshot's `error` until the next load starts.
#[derive(Debug)]
pub struct TransactionFeed<S> {
    store: S,
    state: FeedState,
    snapshots: watch::Sender<FeedSnapshot>,
}

impl<S: RemoteStore> TransactionFeed<S> {
    pub fn new(store: S, config: LoaderConfig) -> Result<Self, FeedError> {
        let state = FeedState::new(config)?;
        let (snapshots, _) = watch::channel(state.snapshot());
        Ok(Self {
            store,
            state,
            snapshots,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Probes `query` from scratch, discarding whatever was loaded before.
    pub async fn load_initial(&mut self, query: Option<QueryDescriptor>) -> LoadOutcome {
        let ticket = self.state.begin_initial(query);
        self.run(ticket).await
    }

    /// Like [`load_initial`](Self::load_initial), but a descriptor equal to
    /// the active one is a no-op once it has loaded successfully.
    pub async fn change_filters(&mut self, query: Option<QueryDescriptor>) -> LoadOutcome {
        if self.state.strategy().is_some()
            && self.state.error().is_none()
            && self.state.query() == query.as_ref()
        {
            debug!("filters unchanged, keeping mirror");
            return LoadOutcome::Skipped;
        }
        self.load_initial(query).await
    }

    /// Re-probes the active query, re-running the strategy choice.
    pub async fn refresh(&mut self) -> LoadOutcome {
        let ticket = self.state.begin_refresh();
        self.run(ticket).await
    }

    /// Loads the next page if one may start; otherwise a no-op.
    pub async fn load_more(&mut self) -> LoadOutcome {
        match self.state.begin_load_more() {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Scroll hook: loads the next page when the rendered range ending at
    /// `render_end` is within the lookahead margin of the mirror's end.
    pub async fn on_viewport(&mut self, render_end: u64) -> LoadOutcome {
        if !self.state.wants_more(render_end) {
            return LoadOutcome::Skipped;
        }
        self.load_more().await
    }

    async fn run(&mut self, ticket: LoadTicket) -> LoadOutcome {
        self.publish();
        let in_flight = InFlight {
            state: &mut self.state,
            snapshots: &self.snapshots,
            ticket: Some(ticket.clone()),
        };
        let result = self
            .store
            .fetch_page(ticket.query.as_ref(), ticket.page, ticket.limit)
            .await;
        let outcome = in_flight.complete(result);
        self.publish();
        outcome
    }

    /// Creates the record remotely and mirrors it once confirmed.
    pub async fn create(
        &mut self,
        payload: &TransactionNew,
    ) -> Result<TransactionRecord, StoreError> {
        let record = self.store.create(payload).await?;
        self.apply(Mutation::Created(record.clone()));
        Ok(record)
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        payload: &TransactionUpdate,
    ) -> Result<TransactionRecord, StoreError> {
        let record = self.store.update(id, payload).await?;
        self.apply(Mutation::Updated(record.clone()));
        Ok(record)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        self.apply(Mutation::Deleted(id));
        Ok(())
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

    fn apply(&mut self, mutation: Mutation) -> Reconciled {
        let outcome = self.state.apply(mutation);
        self.publish();
        outcome
    }

    pub fn select(&mut self, id: Uuid) {
        self.state.selection_mut().select(id);
        self.publish();
    }

    pub fn deselect(&mut self, id: Uuid) {
        self.state.selection_mut().deselect(id);
        self.publish();
    }

    pub fn toggle(&mut self, id: Uuid) -> bool {
        let selected = self.state.selection_mut().toggle(id);
        self.publish();
        selected
    }

    pub fn select_all_loaded(&mut self) {
        self.state.select_all_loaded();
        self.publish();
    }

    pub fn clear_selection(&mut self) {
        self.state.selection_mut().clear();
        self.publish();
    }

    /// Tokens from the records paged in so far. On incrementally loaded
    /// datasets this does not cover the whole remote collection.
    pub fn suggestions(&self) -> &SuggestionIndex {
        self.state.suggestions()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }
}

/// Holds the load slot while a request is awaited. Dropping it before
/// [`complete`](Self::complete) means the caller cancelled the future, and
/// the slot is released so later loads can start.
struct InFlight<'a> {
    state: &'a mut FeedState,
    snapshots: &'a watch::Sender<FeedSnapshot>,
    ticket: Option<LoadTicket>,
}

impl InFlight<'_> {
    fn complete(mut self, result: Result<PageResponse, StoreError>) -> LoadOutcome {
        match self.ticket.take() {
            Some(ticket) => self.state.complete(ticket, result),
            None => LoadOutcome::Stale,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.state.abandon(&ticket);
            self.snapshots.send_replace(self.state.snapshot());
        }
    }
}
