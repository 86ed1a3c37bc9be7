//! Specialized collection types
//!
//! Entity arenas are slot maps: inserting returns a generational key that
//! stays valid until the entry is removed, and a removed key never aliases a
//! later entry.

pub use slotmap::{new_key_type, Key, SecondaryMap, SlotMap};

/// Remove every entry matching `predicate` and return the removed values
///
/// Keys are collected first so the predicate sees a consistent map.
pub fn drain_where<K, V, F>(map: &mut SlotMap<K, V>, mut predicate: F) -> Vec<(K, V)>
where
    K: Key,
    F: FnMut(K, &V) -> bool,
{
    let doomed: Vec<K> = map
        .iter()
        .filter(|(key, value)| predicate(*key, value))
        .map(|(key, _)| key)
        .collect();

    doomed
        .into_iter()
        .filter_map(|key| map.remove(key).map(|value| (key, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    new_key_type! {
        struct TestKey;
    }

    #[test]
    fn test_drain_where_removes_matching() {
        let mut map: SlotMap<TestKey, i32> = SlotMap::with_key();
        let a = map.insert(1);
        let b = map.insert(-2);
        let c = map.insert(3);

        let removed = drain_where(&mut map, |_, v| *v < 0);
        assert_eq!(removed, vec![(b, -2)]);
        assert!(map.contains_key(a));
        assert!(map.contains_key(c));
        assert!(!map.contains_key(b));
    }

    #[test]
    fn test_removed_key_is_not_reused() {
        let mut map: SlotMap<TestKey, &str> = SlotMap::with_key();
        let old = map.insert("old");
        map.remove(old);
        let new = map.insert("new");
        assert_ne!(old, new);
        assert!(map.get(old).is_none());
    }
}
