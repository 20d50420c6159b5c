//! String keyed lookup tables.
use std::fmt;

/// Number of buckets in a [`HashTable`].
pub const BUCKET_COUNT: usize = 0x1000; // 4096

/// Associates string keys with values.
pub trait Map<V> {
    /// Store a value under the key, returning the value it replaced.
    fn store(&mut self, key: &str, value: V) -> Option<V>;

    /// Value stored under the key.
    fn retrieve(&self, key: &str) -> Option<&V>;
}

/// Fixed size hash table with separately chained buckets.
///
/// Keys that land in the same bucket are kept side by side in that
/// bucket's chain, so a collision never evicts another key.
pub struct HashTable<V> {
    buckets: Box<[Vec<Entry<V>>]>,
    len: usize,
}

struct Entry<V> {
    key: Box<str>,
    value: V,
}

impl<V> HashTable<V> {
    pub fn new() -> Self {
        Self {
            buckets: (0..BUCKET_COUNT).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    /// Number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn bucket_index(key: &str) -> usize {
        string_hash(key) as usize % BUCKET_COUNT
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Map<V> for HashTable<V> {
    fn store(&mut self, key: &str, value: V) -> Option<V> {
        let bucket = &mut self.buckets[Self::bucket_index(key)];

        if let Some(entry) = bucket.iter_mut().find(|entry| &*entry.key == key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }

        bucket.push(Entry {
            key: key.into(),
            value,
        });
        self.len += 1;
        None
    }

    fn retrieve(&self, key: &str) -> Option<&V> {
        self.buckets[Self::bucket_index(key)]
            .iter()
            .find(|entry| &*entry.key == key)
            .map(|entry| &entry.value)
    }
}

impl<V: fmt::Debug> fmt::Debug for HashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(
                self.buckets
                    .iter()
                    .flatten()
                    .map(|entry| (&entry.key, &entry.value)),
            )
            .finish()
    }
}

/// Multiplicative string hash, `h = h * 31 + byte` with wrapping.
pub fn string_hash(key: &str) -> u32 {
    key.bytes()
        .fold(0_u32, |hash, byte| hash.wrapping_mul(31).wrapping_add(byte as u32))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_store_retrieve() {
        let mut table = HashTable::new();
        assert_eq!(table.store("var", 1), None);
        assert_eq!(table.store("func", 2), None);

        assert_eq!(table.retrieve("var"), Some(&1));
        assert_eq!(table.retrieve("func"), Some(&2));
        assert_eq!(table.retrieve("const"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_store_replaces() {
        let mut table = HashTable::new();
        table.store("x", 'a');
        assert_eq!(table.store("x", 'b'), Some('a'));
        assert_eq!(table.retrieve("x"), Some(&'b'));
        assert_eq!(table.len(), 1);
    }

    /// "Aa" and "BB" have the same hash, so they share a bucket.
    #[test]
    fn test_collision_keeps_both() {
        assert_eq!(string_hash("Aa"), string_hash("BB"));

        let mut table = HashTable::new();
        table.store("Aa", 1);
        table.store("BB", 2);

        assert_eq!(table.retrieve("Aa"), Some(&1));
        assert_eq!(table.retrieve("BB"), Some(&2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_more_keys_than_buckets() {
        let mut table = HashTable::new();
        let keys = (0..BUCKET_COUNT * 2)
            .map(|n| format!("key{n}"))
            .collect::<Vec<_>>();
        for (value, key) in keys.iter().enumerate() {
            table.store(key, value);
        }
        for (value, key) in keys.iter().enumerate() {
            assert_eq!(table.retrieve(key), Some(&value));
        }
    }
}
