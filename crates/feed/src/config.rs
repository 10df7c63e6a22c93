use serde::Deserialize;

use crate::FeedError;

/// Tunables for the loading strategy and the scroll trigger.
///
/// Every value can be overridden from the `[loader]` table of the
/// application config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Largest `limit` the server accepts. Used for the probe request.
    pub server_max_page_size: u64,
    /// Datasets with `total` at or below this are loaded in one request.
    pub full_load_threshold: u64,
    /// Steady-state page size once a dataset is loaded incrementally.
    pub incremental_page_size: u64,
    /// Page size used when the dataset is empty.
    pub min_page_size: u64,
    /// How many records before the end of the mirror a viewport may reach
    /// before the next page is requested.
    pub lookahead: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            server_max_page_size: 500,
            full_load_threshold: 500,
            incremental_page_size: 100,
            min_page_size: 10,
            lookahead: 10,
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<(), FeedError> {
        let invalid = |msg: &str| Err(FeedError::InvalidConfig(msg.to_string()));

        if self.server_max_page_size == 0 {
            return invalid("server_max_page_size must be > 0");
        }
        if self.incremental_page_size == 0 {
            return invalid("incremental_page_size must be > 0");
        }
        if self.min_page_size == 0 {
            return invalid("min_page_size must be > 0");
        }
        if self.incremental_page_size > self.server_max_page_size {
            return invalid("incremental_page_size exceeds server_max_page_size");
        }
        if self.min_page_size > self.server_max_page_size {
            return invalid("min_page_size exceeds server_max_page_size");
        }
        // A full load has to fit in the probe page.
        if self.full_load_threshold > self.server_max_page_size {
            return invalid("full_load_threshold exceeds server_max_page_size");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LoaderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn threshold_above_cap_is_rejected() {
        let config = LoaderConfig {
            full_load_threshold: 800,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FeedError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let config = LoaderConfig {
            incremental_page_size: 0,
            ..LoaderConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
