use std::future::Future;

use api_types::transaction::{PageResponse, TransactionNew, TransactionRecord, TransactionUpdate};
use uuid::Uuid;

use crate::{QueryDescriptor, StoreError};

/// The remote collection the feed mirrors.
///
/// Timeouts and retries of the transport belong to the implementation; the
/// feed only ever sees the final `Result`.
pub trait RemoteStore {
    /// Fetches page `page` (1-based) of size `limit`. A `None` query means
    /// no filter.
    fn fetch_page(
        &self,
        query: Option<&QueryDescriptor>,
        page: u64,
        limit: u64,
    ) -> impl Future<Output = Result<PageResponse, StoreError>> + Send;

    fn create(
        &self,
        payload: &TransactionNew,
    ) -> impl Future<Output = Result<TransactionRecord, StoreError>> + Send;

    fn update(
        &self,
        id: Uuid,
        payload: &TransactionUpdate,
    ) -> impl Future<Output = Result<TransactionRecord, StoreError>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), StoreError>> + Send;
}
