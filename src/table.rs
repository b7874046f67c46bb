use crate::config::DuplicatePolicy;
use crate::config::TableConfig;
use crate::error::KvsError;
use crate::error::Result;
use slog::debug;
use slog::o;
use slog::trace;
use slog::Discard;
use slog::Logger;
use std::fmt;

const HASH_WEIGHT: u64 = 23;

type Bucket<V> = Vec<(String, V)>;

/// Map a key onto one of `buckets` slots.
///
/// Each Unicode scalar value is weighted by 23 and the running sum is reduced
/// modulo `buckets` after every step, so the accumulator stays below
/// `buckets`.
pub fn bucket_index(key: &str, buckets: usize) -> usize {
    let size = buckets as u64;
    let mut hash = 0u64;
    for c in key.chars() {
        hash = (hash + u64::from(c as u32) * HASH_WEIGHT) % size;
    }
    hash as usize
}

/// `KeyValueTable` maps string keys to values of type `V`.
///
/// Keys are spread over a fixed number of buckets by [`bucket_index`];
/// keys that land in the same bucket are chained in insertion order.
///
/// ```rust
/// # use kvtable::{KeyValueTable, Result};
/// # fn try_main() -> Result<()> {
/// let mut table = KeyValueTable::new(7)?;
/// table.set("hello", 1).set("world", 2).set("hi", 45);
/// assert_eq!(table.get("hi"), Some(&45));
/// assert_eq!(table.get("nonexistent"), None);
/// # Ok(())
/// # }
/// # try_main().unwrap();
/// ```
#[derive(Clone)]
pub struct KeyValueTable<V> {
    buckets: Vec<Option<Bucket<V>>>,
    len: usize,
    policy: DuplicatePolicy,
    max_load_factor: Option<f64>,
    log: Logger,
}

impl<V> KeyValueTable<V> {
    /// Create a table with `size` buckets. Fails if `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_config(TableConfig::new().buckets(size))
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_logger(config, Logger::root(Discard, o!()))
    }

    /// Create a table that reports construction, growth and writes to `log`.
    pub fn with_logger(config: TableConfig, log: Logger) -> Result<Self> {
        config.validate()?;
        debug!(log, "created table";
            "buckets" => config.buckets,
            "policy" => %config.policy,
            "max_load_factor" => ?config.max_load_factor);
        Ok(Self {
            buckets: empty_buckets(config.buckets),
            len: 0,
            policy: config.policy,
            max_load_factor: config.max_load_factor,
            log,
        })
    }

    pub fn compute_index(&self, key: &str) -> usize {
        bucket_index(key, self.buckets.len())
    }

    /// Store `value` under `key` and return the table for chaining.
    ///
    /// Under [`DuplicatePolicy::Overwrite`] an existing entry for `key` keeps
    /// its position and receives the new value. Under
    /// [`DuplicatePolicy::Append`] a second entry is pushed, which `get`
    /// will not see while the first one is present.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> &mut Self {
        let key = key.into();
        let value = match self.policy {
            DuplicatePolicy::Overwrite => match self.replace(&key, value) {
                Ok(()) => return self,
                Err(value) => value,
            },
            DuplicatePolicy::Append => value,
        };

        self.grow_if_needed();
        let index = self.compute_index(&key);
        trace!(self.log, "set"; "key" => key.as_str(), "bucket" => index);
        self.buckets[index]
            .get_or_insert_with(Vec::new)
            .push((key, value));
        self.len += 1;
        self
    }

    /// Get the first value stored under `key`, or `None` if nothing matches.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.compute_index(key)]
            .as_ref()?
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove every entry stored under `key` and return the one `get` would
    /// have returned. Return an error if the key does not exist.
    pub fn remove(&mut self, key: &str) -> Result<V> {
        let index = self.compute_index(key);
        let slot = &mut self.buckets[index];
        let bucket = slot.as_mut().ok_or(KvsError::KeyNotFound)?;
        let position = bucket
            .iter()
            .position(|(k, _)| k.as_str() == key)
            .ok_or(KvsError::KeyNotFound)?;

        let (_, value) = bucket.remove(position);
        let before = bucket.len();
        bucket.retain(|(k, _)| k.as_str() != key);
        let removed = 1 + before - bucket.len();
        if bucket.is_empty() {
            *slot = None;
        }
        self.len -= removed;
        trace!(self.log, "remove"; "key" => key, "bucket" => index, "entries" => removed);
        Ok(value)
    }

    /// Number of stored entries, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Chain length of every bucket, in bucket order.
    pub fn bucket_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|slot| slot.as_ref().map_or(0, Vec::len))
            .collect()
    }

    /// Iterate over entries in bucket order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .flat_map(|bucket| bucket.iter())
            .map(|(key, value)| (key.as_str(), value))
    }

    fn replace(&mut self, key: &str, value: V) -> std::result::Result<(), V> {
        let index = self.compute_index(key);
        let entry = self.buckets[index]
            .as_mut()
            .and_then(|bucket| bucket.iter_mut().find(|(k, _)| k.as_str() == key));
        match entry {
            Some(entry) => {
                entry.1 = value;
                trace!(self.log, "overwrite"; "key" => key, "bucket" => index);
                Ok(())
            }
            None => Err(value),
        }
    }

    fn grow_if_needed(&mut self) {
        let factor = match self.max_load_factor {
            Some(factor) => factor,
            None => return,
        };
        let buckets = self.buckets.len();
        let mut new_buckets = buckets;
        while (self.len + 1) as f64 / new_buckets as f64 > factor {
            new_buckets *= 2;
        }
        if new_buckets == buckets {
            return;
        }

        debug!(self.log, "resizing table"; "from" => buckets, "to" => new_buckets, "entries" => self.len);
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_buckets));
        // Same-key entries share a bucket, so walking chains in order keeps
        // their relative order after rehashing.
        for (key, value) in old.into_iter().flatten().flatten() {
            let index = bucket_index(&key, new_buckets);
            self.buckets[index]
                .get_or_insert_with(Vec::new)
                .push((key, value));
        }
    }
}

impl<V> Default for KeyValueTable<V> {
    fn default() -> Self {
        Self {
            buckets: empty_buckets(crate::config::DEFAULT_BUCKETS),
            len: 0,
            policy: DuplicatePolicy::default(),
            max_load_factor: None,
            log: Logger::root(Discard, o!()),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for KeyValueTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValueTable")
            .field("buckets", &self.buckets)
            .field("len", &self.len)
            .field("policy", &self.policy)
            .field("max_load_factor", &self.max_load_factor)
            .finish()
    }
}

fn empty_buckets<V>(count: usize) -> Vec<Option<Bucket<V>>> {
    let mut buckets = Vec::with_capacity(count);
    buckets.resize_with(count, || None);
    buckets
}
