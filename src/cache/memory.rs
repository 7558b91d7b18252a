use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::CacheBackend;
use crate::error::Result;

/// In-process cache backend, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|(_, expires)| expires.is_none_or(|at| at > now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock();

        match entries.get(key) {
            Some((_, Some(expires))) if *expires <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        // A TTL too large to represent never expires.
        let expires = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_string(), expires));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
