//! Persistent best-score storage
//!
//! A narrow store interface injected into the shell instead of a global:
//! the only mutation path in normal play is the conditional
//! [`ScoreStore::set_if_higher`]; `reset` exists for ops/testing.

/// Key-value integer storage surviving restarts
pub trait ScoreStore {
    /// Stored best score, 0 if never written
    fn get(&self) -> u32;

    /// Overwrite only on strict increase. Returns whether a write happened;
    /// a non-increasing candidate is a defined no-op, not an error.
    fn set_if_higher(&mut self, candidate: u32) -> bool;

    /// Clear back to the default. Ops/testing path only.
    fn reset(&mut self);
}

/// In-memory store, backs native builds and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore {
    best: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self) -> u32 {
        self.best
    }

    fn set_if_higher(&mut self, candidate: u32) -> bool {
        if candidate <= self.best {
            return false;
        }
        self.best = candidate;
        true
    }

    fn reset(&mut self) {
        self.best = 0;
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    /// Cached copy; LocalStorage is the source of truth at load
    best: u32,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    const STORAGE_KEY: &'static str = "crypt_flight_highscore";

    /// Load the stored best, defaulting to 0 when the key was never
    /// written or LocalStorage is unavailable
    pub fn load() -> Self {
        let best = Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        log::info!("Loaded high score: {best}");
        Self { best }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }

    fn persist(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.best.to_string());
            log::info!("High score saved: {}", self.best);
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn get(&self) -> u32 {
        self.best
    }

    fn set_if_higher(&mut self, candidate: u32) -> bool {
        if candidate <= self.best {
            return false;
        }
        self.best = candidate;
        self.persist();
        true
    }

    fn reset(&mut self) {
        self.best = 0;
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(Self::STORAGE_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_to_zero() {
        assert_eq!(MemoryStore::new().get(), 0);
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.set_if_higher(50));
        assert_eq!(store.get(), 50);
        assert!(!store.set_if_higher(30));
        assert_eq!(store.get(), 50);
        assert!(!store.set_if_higher(50));
        assert_eq!(store.get(), 50);
    }

    #[test]
    fn test_reset() {
        let mut store = MemoryStore::new();
        store.set_if_higher(9);
        store.reset();
        assert_eq!(store.get(), 0);
    }

    proptest! {
        /// The stored value is the running maximum of everything offered
        #[test]
        fn prop_store_is_running_max(candidates in proptest::collection::vec(0u32..10_000, 0..64)) {
            let mut store = MemoryStore::new();
            let mut max = 0u32;
            for c in candidates {
                store.set_if_higher(c);
                max = max.max(c);
                prop_assert_eq!(store.get(), max);
            }
        }

        /// Non-increasing input never writes
        #[test]
        fn prop_no_op_under_non_increasing(base in 1u32..10_000, lower in 0u32..10_000) {
            let mut store = MemoryStore::new();
            store.set_if_higher(base);
            let candidate = lower.min(base);
            prop_assert!(!store.set_if_higher(candidate));
            prop_assert_eq!(store.get(), base);
        }
    }
}
