use serde::{Deserialize, Serialize};

/// Error body returned by the backend for any non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod transaction {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Income,
        Expense,
    }

    impl TransactionType {
        /// Returns the canonical string used in query parameters.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    /// A transaction as the backend returns it.
    ///
    /// The server owns the authoritative copy; clients only keep read mirrors.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionRecord {
        pub id: Uuid,
        /// Unsigned amount in minor units; `kind` gives the direction.
        pub amount_minor: i64,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        pub description: String,
        #[serde(default)]
        pub payee: Option<String>,
        #[serde(default)]
        pub notes: Option<String>,
        #[serde(default)]
        pub tags: Vec<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub payment_method: Option<String>,
        #[serde(default)]
        pub status: Option<String>,
    }

    /// One page of the paginated `GET /transactions` endpoint.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PageResponse {
        pub data: Vec<TransactionRecord>,
        pub page: u64,
        pub limit: u64,
        /// Server-side count of every record matching the query.
        pub total: u64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub amount_minor: i64,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub occurred_at: DateTime<FixedOffset>,
        pub description: String,
        pub payee: Option<String>,
        pub notes: Option<String>,
        #[serde(default)]
        pub tags: Vec<String>,
        pub category: Option<String>,
        pub payment_method: Option<String>,
    }

    /// Partial update: absent fields are left unchanged by the server.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: Option<i64>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionType>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
        pub description: Option<String>,
        pub payee: Option<String>,
        pub notes: Option<String>,
        pub tags: Option<Vec<String>>,
        pub category: Option<String>,
        pub payment_method: Option<String>,
        pub status: Option<String>,
    }
}
