//! Dataset size analysis: decides how a dataset of a given size is loaded.
//!
//! Small datasets are fetched in one request and never show pagination
//! spinners or scroll fetches. Large ones are paged with a steady-state size
//! well under the server cap, which is only used for the probe.
use crate::LoaderConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingStrategy {
    FullLoad,
    Incremental,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrategyPlan {
    pub strategy: LoadingStrategy,
    pub page_size: u64,
}

/// Maps the server-reported `total` to a strategy and page size.
///
/// - `total == 0`: full load with the configured floor, so no request is
///   ever sent with a zero limit.
/// - `total <= full_load_threshold`: full load at the server cap, which is
///   at least `total` for any valid [`LoaderConfig`].
/// - otherwise: incremental with `incremental_page_size`.
pub fn choose_strategy(total: u64, config: &LoaderConfig) -> StrategyPlan {
    if total == 0 {
        return StrategyPlan {
            strategy: LoadingStrategy::FullLoad,
            page_size: config.min_page_size,
        };
    }

    if total <= config.full_load_threshold {
        return StrategyPlan {
            strategy: LoadingStrategy::FullLoad,
            page_size: config.server_max_page_size.max(total),
        };
    }

    StrategyPlan {
        strategy: LoadingStrategy::Incremental,
        page_size: config.incremental_page_size,
    }
}
