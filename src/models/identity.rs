//! Layout identity and its canonical string form.

use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Immutable 128-bit identity of a layout.
///
/// The canonical string form is the uppercase, brace-delimited GUID
/// (`{0A1B2C3D-0000-4000-8000-000000000000}`). It is the external key used by
/// quick-key bindings and by persisted records, so serde uses it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutIdentity(Uuid);

impl LayoutIdentity {
    /// Generates a fresh random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the canonical `{UPPERCASE-GUID}` string.
    pub fn canonical(&self) -> String {
        format!("{{{}}}", self.0.hyphenated().to_string().to_uppercase())
    }

    /// Parses an externally supplied identifier.
    ///
    /// Accepts braced or bare GUIDs in any letter case. Braces must be balanced.
    pub fn parse(value: &str) -> LayoutResult<Self> {
        let trimmed = value.trim();
        let inner = match (trimmed.strip_prefix('{'), trimmed.ends_with('}')) {
            (Some(rest), true) => &rest[..rest.len() - 1],
            (None, false) => trimmed,
            _ => {
                return Err(LayoutError::InvalidIdentity {
                    value: value.to_string(),
                    reason: "unbalanced braces".to_string(),
                })
            }
        };

        Uuid::try_parse(inner)
            .map(Self)
            .map_err(|e| LayoutError::InvalidIdentity {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns true if `other` names this identity, ignoring case and braces.
    pub fn matches(&self, other: &str) -> bool {
        Self::parse(other).is_ok_and(|parsed| parsed == *self)
    }
}

impl Default for LayoutIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayoutIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for LayoutIdentity {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for LayoutIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for LayoutIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "{11111111-2222-4333-8444-555555555555}";

    #[test]
    fn test_canonical_is_braced_uppercase() {
        let id = LayoutIdentity::parse("abcdef01-2345-4678-9abc-def012345678").unwrap();
        assert_eq!(id.canonical(), "{ABCDEF01-2345-4678-9ABC-DEF012345678}");
        assert_eq!(id.to_string(), id.canonical());
    }

    #[test]
    fn test_parse_accepts_braced_and_bare() {
        let braced = LayoutIdentity::parse(SAMPLE).unwrap();
        let bare = LayoutIdentity::parse("11111111-2222-4333-8444-555555555555").unwrap();
        assert_eq!(braced, bare);
        assert_eq!(braced.canonical(), SAMPLE);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(LayoutIdentity::parse("").is_err());
        assert!(LayoutIdentity::parse("not-a-guid").is_err());
        assert!(LayoutIdentity::parse("{11111111-2222-4333-8444-555555555555").is_err());
        assert!(LayoutIdentity::parse("11111111-2222-4333-8444-555555555555}").is_err());
    }

    #[test]
    fn test_matches_ignores_case() {
        let id = LayoutIdentity::parse(SAMPLE).unwrap();
        assert!(id.matches(&SAMPLE.to_lowercase()));
        assert!(!id.matches("{00000000-0000-4000-8000-000000000000}"));
        assert!(!id.matches("garbage"));
    }

    #[test]
    fn test_new_identities_are_distinct() {
        assert_ne!(LayoutIdentity::new(), LayoutIdentity::new());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = LayoutIdentity::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));
        let back: LayoutIdentity = serde_json::from_str(&json.to_lowercase()).unwrap();
        assert_eq!(back, id);
    }
}
