//! Label parsing and canonical label construction.
//!
//! A label may be spelled `feature`, `type/feature`, `type:feature`,
//! `type feature` or `✨ feature`; all of them classify as the change type
//! `feature` and share the canonical name `✨ feature`.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{LabelKind, Taxonomy};
use crate::error::LabelError;

/// Color for keys without a dedicated entry.
pub const DEFAULT_COLOR: &str = "FFFFFF";

/// Color shared by every scope label.
pub const SCOPE_COLOR: &str = "C2E0C6";

/// Emoji prefix of scope labels.
pub const SCOPE_EMOJI: &str = "📦";

/// Emoji prefix of change types without a dedicated entry.
pub const FALLBACK_EMOJI: &str = "🏷️";

/// `(key, emoji, color)` for the well-known change types.
const CHANGE_TYPE_STYLES: [(&str, &str, &str); 6] = [
    ("breaking", "💥", "B60205"),
    ("major", "🚨", "B60205"),
    ("feature", "✨", "0E8A16"),
    ("fix", "🐛", "1D76DB"),
    ("minor", "🔖", "D4DADF"),
    ("chore", "🧹", "D4DADF"),
];

static PREFIXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:/]+)[\s:/]+(.*)$").expect("valid label regex"));

/// Canonical shape of a label for one taxonomy key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub kind: LabelKind,
    pub key: String,
    pub name: String,
    pub color: String,
    pub description: String,
}

/// A raw label that resolved to a taxonomy key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLabel {
    pub spec: LabelSpec,
    /// The label text exactly as found on the remote.
    pub existing: String,
}

impl ClassifiedLabel {
    pub fn kind(&self) -> LabelKind {
        self.spec.kind
    }

    pub fn key(&self) -> &str {
        &self.spec.key
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == ':' || c.is_whitespace()
}

fn strip_variation(s: &str) -> &str {
    s.trim_end_matches('\u{FE0F}')
}

fn change_type_style(key: &str) -> Option<(&'static str, &'static str)> {
    CHANGE_TYPE_STYLES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, emoji, color)| (*emoji, *color))
}

/// Map a label prefix (textual or emoji) to the kind it selects.
fn prefix_kind(prefix: &str) -> Option<LabelKind> {
    if prefix == LabelKind::ChangeType.prefix() {
        return Some(LabelKind::ChangeType);
    }
    if prefix == LabelKind::Scope.prefix() {
        return Some(LabelKind::Scope);
    }

    let bare = strip_variation(prefix);
    if bare == strip_variation(SCOPE_EMOJI) {
        return Some(LabelKind::Scope);
    }

    let is_change_emoji = bare == strip_variation(FALLBACK_EMOJI)
        || CHANGE_TYPE_STYLES
            .iter()
            .any(|(_, emoji, _)| strip_variation(emoji) == bare);
    is_change_emoji.then_some(LabelKind::ChangeType)
}

/// Build the canonical label for a taxonomy key.
///
/// The name is a pure function of `kind` and `key`, so repeated runs agree
/// on label identity.
pub fn build_label(kind: LabelKind, key: &str, long_name: &str) -> LabelSpec {
    let (name, color, description) = match kind {
        LabelKind::ChangeType => {
            let (emoji, color) = change_type_style(key).unwrap_or((FALLBACK_EMOJI, DEFAULT_COLOR));
            (
                format!("{} {}", emoji, key),
                color,
                format!("Label for versioning: {}", long_name),
            )
        }
        LabelKind::Scope => (
            format!("{} {}", SCOPE_EMOJI, key),
            SCOPE_COLOR,
            format!("Label for affected scope: \"{}\"", long_name),
        ),
    };

    LabelSpec {
        kind,
        key: key.to_string(),
        name,
        color: color.to_string(),
        description,
    }
}

/// Canonical labels for every key in the taxonomy, change types first.
pub fn canonical_labels(taxonomy: &Taxonomy) -> Vec<LabelSpec> {
    [LabelKind::ChangeType, LabelKind::Scope]
        .into_iter()
        .flat_map(|kind| {
            taxonomy
                .entries(kind)
                .iter()
                .map(move |(key, long_name)| build_label(kind, key, long_name))
        })
        .collect()
}

/// Classify a raw label against the taxonomy.
///
/// Returns `Ok(None)` for labels that are not part of the taxonomy (bare
/// words that are not change types, unknown prefixes). A recognized prefix
/// with an unknown key is an error, as is more than one separator.
///
/// The prefix is checked before the separator count, so multi-word foreign
/// labels like `good first issue` are skipped rather than rejected; only
/// `type/...`, `scope/...` and emoji-prefixed labels can raise
/// [`LabelError::TooManySeparators`].
pub fn parse_label(taxonomy: &Taxonomy, raw: &str) -> Result<Option<ClassifiedLabel>, LabelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (kind, key) = if !trimmed.contains(is_separator) {
        // Bare keys are change-type shorthand only.
        if !taxonomy.change_types.contains_key(trimmed) {
            return Ok(None);
        }
        (LabelKind::ChangeType, trimmed)
    } else {
        let Some(caps) = PREFIXED.captures(trimmed) else {
            return Ok(None);
        };
        let (Some(prefix), Some(key)) = (caps.get(1), caps.get(2)) else {
            return Ok(None);
        };
        let key = key.as_str();

        // Foreign labels such as "good first issue" are skipped, not rejected.
        let Some(kind) = prefix_kind(prefix.as_str()) else {
            return Ok(None);
        };

        if key.contains(is_separator) {
            return Err(LabelError::TooManySeparators {
                label: raw.to_string(),
            });
        }

        if !taxonomy.entries(kind).contains_key(key) {
            return Err(LabelError::UnknownKey {
                label: trimmed.to_string(),
                key: key.to_string(),
                available: taxonomy.entries(kind).keys().cloned().collect(),
            });
        }
        (kind, key)
    };

    let spec = build_label(kind, key, taxonomy.long_name(kind, key));
    Ok(Some(ClassifiedLabel {
        spec,
        existing: raw.to_string(),
    }))
}
