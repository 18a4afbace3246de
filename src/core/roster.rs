//! Member roster for id and label resolution
//!
//! The roster indexes a group's members by id. All settlement matching is
//! keyed by member id; labels are resolved once, when a transfer is emitted.
//!
//! Label lookup (`find_by_label`) is case-insensitive so that a label shown
//! to a user resolves back to the same member regardless of how it was typed.

use crate::types::{Member, MemberId};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Read-only index over a group's members
#[derive(Debug, Clone)]
pub struct MemberRoster<'a> {
    members: &'a [Member],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> MemberRoster<'a> {
    /// Build a roster over the given members
    ///
    /// If an id appears more than once, the first occurrence wins.
    pub fn new(members: &'a [Member]) -> Self {
        let mut by_id = HashMap::with_capacity(members.len());
        for (idx, member) in members.iter().enumerate() {
            by_id.entry(member.id.as_str()).or_insert(idx);
        }
        MemberRoster { members, by_id }
    }

    /// All members in roster order
    pub fn members(&self) -> &'a [Member] {
        self.members
    }

    /// Look up a member by id
    pub fn get(&self, id: &str) -> Option<&'a Member> {
        self.by_id.get(id).map(|&idx| &self.members[idx])
    }

    /// Whether the id belongs to a member
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Resolve the output label for a member id
    ///
    /// Falls back to the raw id when the member has no usable label.
    /// Returns `None` only for unknown ids.
    pub fn label(&self, id: &str) -> Option<&'a str> {
        self.get(id)
            .map(|member| member.label().unwrap_or(member.id.as_str()))
    }

    /// Find a member by label, ignoring case and surrounding whitespace
    ///
    /// When several members share the label, the first in roster order is
    /// returned (see [`MemberRoster::ambiguous_labels`]).
    pub fn find_by_label(&self, label: &str) -> Option<&'a Member> {
        let needle = label.trim().to_lowercase();
        self.members
            .iter()
            .find(|member| member.label().unwrap_or(member.id.as_str()).to_lowercase() == needle)
    }

    /// Members with neither a display identifier nor a name
    pub fn unlabelled(&self) -> impl Iterator<Item = &'a Member> + '_ {
        self.members.iter().filter(|member| member.label().is_none())
    }

    /// Labels shared by more than one member, compared case-insensitively
    ///
    /// Each entry holds the label as first seen and the ids sharing it, in
    /// roster order.
    pub fn ambiguous_labels(&self) -> Vec<(String, Vec<MemberId>)> {
        let mut seen: IndexMap<String, (String, Vec<MemberId>)> = IndexMap::new();
        for member in self.members {
            let label = member.label().unwrap_or(member.id.as_str());
            seen.entry(label.to_lowercase())
                .or_insert_with(|| (label.to_string(), Vec::new()))
                .1
                .push(member.id.clone());
        }

        seen.into_values()
            .filter(|(_, ids)| ids.len() > 1)
            .collect()
    }
}
