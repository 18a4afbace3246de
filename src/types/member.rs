//! Member-related types for the SplitPay engine
//!
//! This module defines the Member structure and the identifiers used to key
//! members and groups throughout the system.

/// Member identifier
///
/// Opaque string id, unique within a group. All internal matching is keyed
/// by this id; display identifiers are only used for output.
pub type MemberId = String;

/// Group identifier
pub type GroupId = String;

/// A single participant of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Unique member id within the group
    pub id: MemberId,

    /// Display name
    pub name: String,

    /// Optional external identifier (e.g. an ENS-style alias)
    ///
    /// Preferred over `name` when labelling transfers.
    pub display_identifier: Option<String>,
}

impl Member {
    /// Create a new member without an external identifier
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
            display_identifier: None,
        }
    }

    /// Attach an external display identifier
    pub fn with_display_identifier(mut self, display: impl Into<String>) -> Self {
        self.display_identifier = Some(display.into());
        self
    }

    /// Resolve the label shown to users
    ///
    /// Returns the display identifier if present and non-blank, otherwise the
    /// name if non-blank, otherwise `None`.
    pub fn label(&self) -> Option<&str> {
        self.display_identifier
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.name.trim()).filter(|s| !s.is_empty()))
    }
}
