//! Single-entry memoization

use std::sync::Arc;

/// Caches one derived value together with the key it was computed from
///
/// While the key stays equal, lookups return the same `Arc`; any other key
/// recomputes and replaces the entry.
///
/// # Examples
///
/// ```
/// use eventboard_views::Memo;
/// use std::sync::Arc;
///
/// let mut memo = Memo::new();
/// let a = memo.get_or_compute(1, |k| k * 10);
/// let b = memo.get_or_compute(1, |_| unreachable!());
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let c = memo.get_or_compute(2, |k| k * 10);
/// assert_eq!(*c, 20);
/// ```
#[derive(Debug)]
pub struct Memo<K, V> {
    entry: Option<(K, Arc<V>)>,
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Create an empty memo
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Cached value, if it was computed for `key`
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        match &self.entry {
            Some((cached, value)) if cached == key => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Whether the cached value belongs to `key`
    pub fn is_current(&self, key: &K) -> bool {
        matches!(&self.entry, Some((cached, _)) if cached == key)
    }

    /// Key of the cached value
    pub fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(key, _)| key)
    }

    /// Cached value for `key`, computing it on a miss
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce(&K) -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = Arc::new(compute(&key));
        self.entry = Some((key, Arc::clone(&value)));
        value
    }

    /// Drop the cached value
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
