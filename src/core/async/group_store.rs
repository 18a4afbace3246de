//! Thread-safe group store for async batch processing
//!
//! This module provides the `AsyncGroupStore` struct, which holds group
//! documents in a `DashMap` so that records for different groups can be
//! applied from different tasks at the same time.
//!
//! # Thread Safety
//!
//! Each group lives in its own DashMap entry. Operations on different groups
//! don't block each other; operations on the same group are serialized by the
//! entry lock.

use crate::types::{Group, GroupId, SettlementError};
use dashmap::DashMap;

/// Thread-safe store of group documents keyed by group id
#[derive(Debug, Default)]
pub struct AsyncGroupStore {
    /// Concurrent map of group documents
    groups: DashMap<GroupId, Group>,
}

impl AsyncGroupStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }

    /// Update a group using a closure, creating it first if needed
    ///
    /// The closure runs while holding the entry lock.
    pub fn upsert<F>(&self, group_id: &str, f: F) -> Result<(), SettlementError>
    where
        F: FnOnce(&mut Group) -> Result<(), SettlementError>,
    {
        let mut entry = self
            .groups
            .entry(group_id.to_string())
            .or_insert_with(|| Group::new(group_id));
        f(entry.value_mut())
    }

    /// Update an existing group using a closure
    ///
    /// # Errors
    ///
    /// Returns `GroupNotFound` if the group does not exist, or the closure's
    /// error.
    pub fn update<F>(&self, group_id: &str, f: F) -> Result<(), SettlementError>
    where
        F: FnOnce(&mut Group) -> Result<(), SettlementError>,
    {
        match self.groups.get_mut(group_id) {
            Some(mut group) => f(group.value_mut()),
            None => Err(SettlementError::group_not_found(group_id)),
        }
    }

    /// Get a snapshot of a group
    ///
    /// The returned value is a clone; later changes are not reflected.
    pub fn get(&self, group_id: &str) -> Option<Group> {
        self.groups.get(group_id).map(|group| group.value().clone())
    }

    /// Delete a group if it has no members left
    ///
    /// Returns `true` if the group was removed.
    pub fn remove_if_empty(&self, group_id: &str) -> bool {
        self.groups
            .remove_if(group_id, |_, group| group.members.is_empty())
            .is_some()
    }

    /// Number of groups held
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the store holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Snapshot of all groups sorted by id
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self
            .groups
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Member;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_upsert_creates_group() {
        let store = AsyncGroupStore::new();

        store
            .upsert("trip", |group| {
                group.members.push(Member::new("a", "Alice"));
                Ok(())
            })
            .unwrap();

        let group = store.get("trip").unwrap();
        assert_eq!(group.id, "trip");
        assert_eq!(group.members.len(), 1);
    }

    #[test]
    fn test_update_missing_group_fails() {
        let store = AsyncGroupStore::new();

        let result = store.update("trip", |_| Ok(()));

        assert_eq!(result, Err(SettlementError::group_not_found("trip")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_returns_error_from_closure() {
        let store = AsyncGroupStore::new();
        store.upsert("trip", |_| Ok(())).unwrap();

        let result = store.update("trip", |_| Err(SettlementError::expense_not_found("trip", "e1")));

        assert!(matches!(
            result,
            Err(SettlementError::ExpenseNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_if_empty() {
        let store = AsyncGroupStore::new();
        store
            .upsert("full", |group| {
                group.members.push(Member::new("a", "Alice"));
                Ok(())
            })
            .unwrap();
        store.upsert("empty", |_| Ok(())).unwrap();

        assert!(!store.remove_if_empty("full"));
        assert!(store.remove_if_empty("empty"));
        assert!(!store.remove_if_empty("missing"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_groups_sorted_by_id() {
        let store = AsyncGroupStore::new();
        for id in ["c", "a", "b"] {
            store.upsert(id, |_| Ok(())).unwrap();
        }

        let ids: Vec<String> = store.groups().into_iter().map(|g| g.id).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_concurrent_upserts_on_different_groups() {
        let store = Arc::new(AsyncGroupStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store
                    .upsert(&format!("group-{i}"), |group| {
                        group.members.push(Member::new("a", "Alice"));
                        Ok(())
                    })
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_concurrent_upserts_on_same_group() {
        let store = Arc::new(AsyncGroupStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store
                    .upsert("trip", |group| {
                        group.members.push(Member::new(format!("m{i}"), "Member"));
                        Ok(())
                    })
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("trip").unwrap().members.len(), 10);
    }
}
