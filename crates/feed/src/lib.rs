//! Adaptive loading of a remote, filterable transaction list.
//!
//! The feed decides per dataset whether to fetch everything at once or to
//! page incrementally, keeps a client-side mirror of the matching records
//! and folds server-confirmed creates, updates and deletes into it without
//! reloading.
//!
//! - [`FeedState`] is the synchronous core: tickets in, outcomes out.
//! - [`TransactionFeed`] drives it against a [`RemoteStore`] and publishes
//!   [`FeedSnapshot`]s through a `tokio::sync::watch` channel.
pub use config::LoaderConfig;
pub use controller::TransactionFeed;
pub use coordinator::{Coordinator, LoadKind, LoadPhase, LoadTicket};
pub use error::{FeedError, StoreError};
pub use mirror::Mirror;
pub use money::MinorAmount;
pub use pagination::PaginationState;
pub use query::{FilterForm, QueryDescriptor, Sort, SortDirection, SortField, normalize};
pub use reconciler::{Mutation, Reconciled};
pub use selection::Selection;
pub use state::{FeedSnapshot, FeedState, LoadOutcome};
pub use store::RemoteStore;
pub use strategy::{LoadingStrategy, StrategyPlan, choose_strategy};
pub use suggestions::SuggestionIndex;

mod config;
mod controller;
pub mod coordinator;
mod error;
mod mirror;
mod money;
mod pagination;
pub mod query;
pub mod reconciler;
mod selection;
mod state;
mod store;
mod strategy;
mod suggestions;
