//! Paper domain model and per-paper version ledger.
//!
//! # Responsibility
//! - Define the atomic document record shared by stack/folder/trash/archive.
//! - Provide the append-only version ledger operations.
//!
//! # Invariants
//! - `id` is stable and never reused for another paper.
//! - `versions` is append-only; `version_number` values are dense, 1-based
//!   and strictly increasing.
//! - Restoring a version copies subject/content only; it never touches the
//!   ledger itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a paper.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PaperId = Uuid;

/// Whether a paper participates in generation context.
///
/// Replaces the legacy `undefined | true | false` encoding: absent and
/// `true` both mean included, only an explicit `false` excludes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextFlag {
    /// Paper is visible to the generation service (default).
    #[default]
    Included,
    /// Paper is explicitly excluded from context.
    Excluded,
}

impl ContextFlag {
    /// Returns the opposite flag.
    pub fn toggled(self) -> Self {
        match self {
            Self::Included => Self::Excluded,
            Self::Excluded => Self::Included,
        }
    }

    /// Returns whether this flag admits the paper into context.
    pub fn is_included(self) -> bool {
        matches!(self, Self::Included)
    }
}

/// Serde bridge keeping snapshot compatibility with the boolean encoding.
///
/// Absent fields are handled by `#[serde(default)]`; a present `false` maps
/// to `Excluded`, anything else to `Included`.
mod context_flag_compat {
    use super::ContextFlag;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flag: &ContextFlag, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(flag.is_included())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ContextFlag, D::Error> {
        let value = Option::<bool>::deserialize(deserializer)?;
        Ok(match value {
            Some(false) => ContextFlag::Excluded,
            _ => ContextFlag::Included,
        })
    }
}

/// Immutable snapshot of a paper's subject/content at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// 1-based, dense, strictly increasing per paper.
    pub version_number: u32,
    pub subject: String,
    pub content: String,
    /// Unix epoch milliseconds.
    pub saved_at: i64,
}

/// The atomic document.
///
/// A paper lives in exactly one container at any time: the main stack, one
/// folder's paper list, one desk's trash, or the left-desk archive. That
/// single-location invariant is owned by the move engine, not this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub id: PaperId,
    /// Title line shown on tabs and rows.
    pub subject: String,
    /// Body text. May contain chain dividers (see context service).
    pub content: String,
    #[serde(default, with = "context_flag_compat")]
    pub in_context: ContextFlag,
    /// Append-only version ledger.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<Version>,
}

impl Paper {
    /// Creates a paper with a generated stable ID and no versions.
    pub fn new(subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            content: content.into(),
            in_context: ContextFlag::Included,
            versions: Vec::new(),
        }
    }

    /// Creates the blank paper produced by the "new paper" action.
    pub fn untitled() -> Self {
        Self::new("Untitled", "")
    }

    /// Returns whether both subject and content are empty.
    pub fn is_blank(&self) -> bool {
        self.subject.is_empty() && self.content.is_empty()
    }

    /// Appends a snapshot of the current subject/content to the ledger.
    ///
    /// Numbers are never reused: restoring an old version and saving again
    /// still produces a number higher than any prior one.
    pub fn record_version(&mut self, saved_at: i64) -> u32 {
        let version_number = self.versions.len() as u32 + 1;
        self.versions.push(Version {
            version_number,
            subject: self.subject.clone(),
            content: self.content.clone(),
            saved_at,
        });
        version_number
    }

    /// Copies subject/content back from a ledger entry.
    ///
    /// Unknown version numbers are a silent no-op (`false`): the caller is
    /// expected to only offer versions that exist. Restoring is not itself
    /// a save and records nothing.
    pub fn restore_version(&mut self, version_number: u32) -> bool {
        let Some(version) = self
            .versions
            .iter()
            .find(|version| version.version_number == version_number)
        else {
            return false;
        };

        self.subject = version.subject.clone();
        self.content = version.content.clone();
        true
    }

    /// Returns whether the ledger numbering is dense and 1-based.
    pub fn versions_are_dense(&self) -> bool {
        self.versions
            .iter()
            .enumerate()
            .all(|(index, version)| version.version_number == index as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextFlag, Paper};

    #[test]
    fn record_version_numbers_densely_from_one() {
        let mut paper = Paper::new("Draft", "first");
        assert_eq!(paper.record_version(10), 1);
        paper.content = "second".to_string();
        assert_eq!(paper.record_version(20), 2);
        assert!(paper.versions_are_dense());
    }

    #[test]
    fn restore_missing_version_is_silent_noop() {
        let mut paper = Paper::new("Draft", "body");
        paper.record_version(10);
        let before = paper.clone();
        assert!(!paper.restore_version(9));
        assert_eq!(paper, before);
    }

    #[test]
    fn context_flag_deserializes_legacy_booleans() {
        let included: Paper =
            serde_json::from_str(r#"{"id":"6e5c0d2a-94a6-4be8-9d3c-0c16d0c1a001","subject":"a","content":"b"}"#)
                .expect("paper without flag should parse");
        assert_eq!(included.in_context, ContextFlag::Included);

        let excluded: Paper = serde_json::from_str(
            r#"{"id":"6e5c0d2a-94a6-4be8-9d3c-0c16d0c1a002","subject":"a","content":"b","inContext":false}"#,
        )
        .expect("paper with false flag should parse");
        assert_eq!(excluded.in_context, ContextFlag::Excluded);
    }
}
