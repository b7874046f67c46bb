use crate::config::TableConfig;
use crate::error::KvsError;
use crate::error::Result;
use crate::table::KeyValueTable;
use slog::Logger;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

/// A `KeyValueTable` behind a single lock, shareable between threads.
///
/// Clones are handles onto the same table.
pub struct SharedTable<V> {
    table: Arc<Mutex<KeyValueTable<V>>>,
}

impl<V> Clone for SharedTable<V> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<V> SharedTable<V> {
    pub fn new(table: KeyValueTable<V>) -> Self {
        Self {
            table: Arc::new(Mutex::new(table)),
        }
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self::new(KeyValueTable::with_config(config)?))
    }

    pub fn with_logger(config: TableConfig, log: Logger) -> Result<Self> {
        Ok(Self::new(KeyValueTable::with_logger(config, log)?))
    }

    pub fn set(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.lock()?.set(key, value);
        Ok(())
    }

    /// Get a copy of the value stored under `key`. A reference cannot outlive
    /// the lock, so the value is cloned out.
    pub fn get(&self, key: &str) -> Result<Option<V>>
    where
        V: Clone,
    {
        Ok(self.lock()?.get(key).cloned())
    }

    pub fn remove(&self, key: &str) -> Result<V> {
        self.lock()?.remove(key)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Run `f` with exclusive access to the table, e.g. for several
    /// operations that must not interleave with other writers.
    pub fn with_table<T>(&self, f: impl FnOnce(&mut KeyValueTable<V>) -> T) -> Result<T> {
        let mut table = self.lock()?;
        Ok(f(&mut table))
    }

    fn lock(&self) -> Result<MutexGuard<'_, KeyValueTable<V>>> {
        self.table
            .lock()
            .map_err(|e| KvsError::StringError(format!("table lock poisoned: {}", e)))
    }
}

impl<V> Default for SharedTable<V> {
    fn default() -> Self {
        Self::new(KeyValueTable::default())
    }
}
