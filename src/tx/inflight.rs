use std::sync::Arc;

use dashmap::DashSet;

/// Registry of transactions currently being processed.
///
/// Keys are the deterministic encoding of the fabricated messages, so the
/// same intent always maps to the same key.
#[derive(Clone, Debug, Default)]
pub struct InFlight {
    keys: Arc<DashSet<String>>,
}

/// Marks a key as in flight until dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<DashSet<String>>,
    key: String,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` if the key is already in flight.
    pub fn acquire(&self, key: String) -> Option<InFlightGuard> {
        if !self.keys.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            keys: self.keys.clone(),
            key,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let registry = InFlight::new();

        let guard = registry.acquire("a".to_string()).unwrap();
        assert!(registry.contains("a"));
        assert!(registry.acquire("a".to_string()).is_none());

        let other = registry.acquire("b".to_string()).unwrap();
        assert_eq!(registry.len(), 2);

        drop(guard);
        assert!(!registry.contains("a"));
        assert!(registry.acquire("a".to_string()).is_some());

        drop(other);
        assert!(registry.is_empty());
    }
}
