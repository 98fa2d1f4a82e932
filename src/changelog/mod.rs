//! Changelog aggregation and rendering
//!
//! [`aggregate`] groups parsed entries by type and scope. The resulting
//! [`ChangelogDocument`] is the only input of [`render::render`].

pub mod file;
pub mod render;

pub use file::prepend_to_file;
pub use render::{render, ChangelogMode, RenderContext, SquashInfo};

use crate::domain::{CommitEntry, CommitType};
use log::debug;

/// Entries sharing a scope, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeGroup {
    /// `None` is the no-scope bucket
    pub scope: Option<String>,
    pub entries: Vec<CommitEntry>,
}

/// Scope groups of one commit type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeGroup {
    pub commit_type: CommitType,
    pub scopes: Vec<ScopeGroup>,
}

impl TypeGroup {
    pub fn entry_count(&self) -> usize {
        self.scopes.iter().map(|s| s.entries.len()).sum()
    }
}

/// Grouped changelog, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangelogDocument {
    pub groups: Vec<TypeGroup>,
}

impl ChangelogDocument {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(TypeGroup::entry_count).sum()
    }

    pub fn group(&self, commit_type: CommitType) -> Option<&TypeGroup> {
        self.groups.iter().find(|g| g.commit_type == commit_type)
    }
}

/// Group entries by type (fixed order) then scope (first-seen order, no-scope last).
///
/// Entries keep their input order inside a scope and types without entries
/// are left out.
pub fn aggregate(entries: &[CommitEntry]) -> ChangelogDocument {
    let groups: Vec<TypeGroup> = CommitType::ALL
        .iter()
        .filter_map(|&commit_type| {
            let mut scopes: Vec<ScopeGroup> = Vec::new();
            let mut unscoped: Vec<CommitEntry> = Vec::new();

            for entry in entries.iter().filter(|e| e.commit_type == commit_type) {
                match &entry.scope {
                    None => unscoped.push(entry.clone()),
                    Some(scope) => match scopes.iter_mut().find(|g| g.scope.as_ref() == Some(scope)) {
                        Some(group) => group.entries.push(entry.clone()),
                        None => scopes.push(ScopeGroup {
                            scope: Some(scope.clone()),
                            entries: vec![entry.clone()],
                        }),
                    },
                }
            }

            if !unscoped.is_empty() {
                scopes.push(ScopeGroup {
                    scope: None,
                    entries: unscoped,
                });
            }

            (!scopes.is_empty()).then_some(TypeGroup {
                commit_type,
                scopes,
            })
        })
        .collect();

    debug!(
        "aggregated {} entries into {} type groups",
        entries.len(),
        groups.len()
    );
    ChangelogDocument { groups }
}
