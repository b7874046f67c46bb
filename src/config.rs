use crate::error::KvsError;
use crate::error::Result;
use std::fmt;

pub const DEFAULT_BUCKETS: usize = 7;

/// What `set` does when the key is already present in its bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Replace the stored value in place.
    #[default]
    Overwrite,
    /// Push another entry onto the chain. `get` keeps returning the first one.
    Append,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Append => write!(f, "append"),
        }
    }
}

/// Construction options for a [`KeyValueTable`](crate::KeyValueTable).
///
/// ```rust
/// # use kvtable::{DuplicatePolicy, KeyValueTable, Result, TableConfig};
/// # fn try_main() -> Result<()> {
/// let config = TableConfig::new()
///     .buckets(16)
///     .policy(DuplicatePolicy::Append)
///     .max_load_factor(0.75);
/// let table: KeyValueTable<u32> = KeyValueTable::with_config(config)?;
/// assert_eq!(table.bucket_count(), 16);
/// # Ok(())
/// # }
/// # try_main().unwrap();
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub(crate) buckets: usize,
    pub(crate) policy: DuplicatePolicy,
    pub(crate) max_load_factor: Option<f64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
            policy: DuplicatePolicy::default(),
            max_load_factor: None,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buckets(mut self, buckets: usize) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Grow the table (doubling the bucket count as many times as needed)
    /// whenever `len / buckets` would exceed `factor`. Unset means the bucket
    /// count never changes.
    pub fn max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = Some(factor);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.buckets == 0 {
            return Err(KvsError::InvalidArgument(
                "bucket count must be at least 1".to_string(),
            ));
        }
        if let Some(factor) = self.max_load_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(KvsError::InvalidArgument(format!(
                    "max load factor must be a positive number, got {}",
                    factor
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_baseline_table() {
        let config = TableConfig::default();
        assert_eq!(config.buckets, 7);
        assert_eq!(config.policy, DuplicatePolicy::Overwrite);
        assert_eq!(config.max_load_factor, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_load_factors() {
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = TableConfig::new().max_load_factor(factor);
            assert!(matches!(
                config.validate(),
                Err(KvsError::InvalidArgument(_))
            ));
        }
    }
}
