//! Group document store
//!
//! This module provides the `GroupStore` struct, an in-memory document store
//! holding one `Group` document per group id.
//!
//! The GroupStore is responsible for:
//! - Creating groups on first use
//! - Reading and updating group documents
//! - Deleting groups once their last member leaves
//! - Providing sorted group listings for output

use crate::types::{Group, GroupId, SettlementError};
use std::collections::HashMap;

/// In-memory store of group documents keyed by group id
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: HashMap<GroupId, Group>,
}

impl GroupStore {
    /// Create an empty store
    pub fn new() -> Self {
        GroupStore {
            groups: HashMap::new(),
        }
    }

    /// Get or create the group with the given id
    ///
    /// A new group starts with no members and no expenses.
    pub fn get_or_create(&mut self, group_id: &str) -> &mut Group {
        self.groups
            .entry(group_id.to_string())
            .or_insert_with(|| Group::new(group_id))
    }

    /// Look up a group by id
    pub fn get(&self, group_id: &str) -> Option<&Group> {
        self.groups.get(group_id)
    }

    /// Look up a group by id for modification
    pub fn get_mut(&mut self, group_id: &str) -> Option<&mut Group> {
        self.groups.get_mut(group_id)
    }

    /// Update an existing group using a closure
    ///
    /// # Errors
    ///
    /// Returns `GroupNotFound` if the group does not exist, or whatever error
    /// the closure returns. The closure is responsible for leaving the group
    /// unchanged when it fails.
    pub fn update<F>(&mut self, group_id: &str, f: F) -> Result<(), SettlementError>
    where
        F: FnOnce(&mut Group) -> Result<(), SettlementError>,
    {
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or_else(|| SettlementError::group_not_found(group_id))?;
        f(group)
    }

    /// Remove a group, returning it if it existed
    pub fn delete(&mut self, group_id: &str) -> Option<Group> {
        self.groups.remove(group_id)
    }

    /// Number of groups held
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the store holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups sorted by id
    ///
    /// Sorting keeps report output deterministic.
    pub fn groups(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        groups
    }
}
