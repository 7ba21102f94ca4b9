//! Memoised lookup results.
//!
//! Keys carry the caller's group as an `Option`, so "no group given" never
//! collides with a real group name.

use std::any::TypeId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct LookupKey {
    kind: TypeId,
    identifier: String,
    group: Option<String>,
}

impl LookupKey {
    pub(crate) fn new(kind: TypeId, identifier: &str, group: Option<&str>) -> Self {
        Self {
            kind,
            identifier: identifier.to_owned(),
            group: group.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GroupKey {
    kind: TypeId,
    group: Option<String>,
}

impl GroupKey {
    pub(crate) fn new(kind: TypeId, group: Option<&str>) -> Self {
        Self {
            kind,
            group: group.map(str::to_owned),
        }
    }
}

/// Positions into the registry's active variant list.
#[derive(Debug, Default)]
pub(crate) struct LookupCache {
    lookups: HashMap<LookupKey, usize>,
    groups: HashMap<GroupKey, Vec<usize>>,
}

impl LookupCache {
    pub(crate) fn position(&self, key: &LookupKey) -> Option<usize> {
        self.lookups.get(key).copied()
    }

    pub(crate) fn positions(&self, key: &GroupKey) -> Option<&[usize]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub(crate) fn remember(&mut self, key: LookupKey, position: usize) {
        self.lookups.insert(key, position);
    }

    /// Empty results are never stored.
    pub(crate) fn remember_group(&mut self, key: GroupKey, positions: Vec<usize>) {
        if !positions.is_empty() {
            self.groups.insert(key, positions);
        }
    }

    pub(crate) fn forget(&mut self, key: &LookupKey) {
        self.lookups.remove(key);
    }

    pub(crate) fn forget_group(&mut self, key: &GroupKey) {
        self.groups.remove(key);
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.lookups.is_empty() && self.groups.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.lookups.clear();
        self.groups.clear();
    }
}
