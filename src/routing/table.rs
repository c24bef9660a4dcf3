//! The frozen route table.
//!
//! # Design Decisions
//! - Keyed by (method, path); ordering is irrelevant to matching but keeps
//!   listings deterministic
//! - Disabled modules are kept as reserved entries, never registered

use std::collections::BTreeMap;

use crate::routing::{Chain, RouteMethod};

/// Whether an entry is served or only holds its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    Active,
    /// Discovered and validated, but not registered. The path stays claimed.
    Disabled,
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub method: RouteMethod,
    pub path: String,
    pub chain: Chain,
    pub state: RouteState,
    /// Module location the entry was built from.
    pub origin: String,
}

impl RouteEntry {
    pub fn is_enabled(&self) -> bool {
        self.state == RouteState::Active
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: BTreeMap<(RouteMethod, String), RouteEntry>,
}

impl RouteTable {
    pub(crate) fn from_entries(entries: BTreeMap<(RouteMethod, String), RouteEntry>) -> Self {
        Self { entries }
    }

    /// Active entry serving `method path`.
    pub fn lookup(&self, method: RouteMethod, path: &str) -> Option<&RouteEntry> {
        self.get(method, path).filter(|entry| entry.is_enabled())
    }

    /// Entry claiming `method path`, reserved ones included.
    pub fn get(&self, method: RouteMethod, path: &str) -> Option<&RouteEntry> {
        self.entries.get(&(method, path.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }

    pub fn active(&self) -> impl Iterator<Item = &RouteEntry> {
        self.iter().filter(|entry| entry.is_enabled())
    }

    pub fn disabled(&self) -> impl Iterator<Item = &RouteEntry> {
        self.iter().filter(|entry| !entry.is_enabled())
    }

    /// Number of entries, reserved ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
