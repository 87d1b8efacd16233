use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account as stored in the `profiles` table.
///
/// Only the fields the maintenance tooling reads are modelled; unknown
/// columns returned by the REST backend are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_name: Option<String>,
}

impl Profile {
    /// The name other members of the family see for this account.
    pub fn canonical_name(&self) -> Option<&str> {
        first_non_empty(&[self.full_name.as_deref(), self.profile_name.as_deref()])
    }
}

/// Return the first non-empty candidate, in priority order.
///
/// Empty strings count as missing. Whitespace is not trimmed: a name of
/// `" "` is still a value somebody stored.
pub fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .flatten()
        .find(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(full_name: Option<&str>, profile_name: Option<&str>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            full_name: full_name.map(String::from),
            profile_name: profile_name.map(String::from),
        }
    }

    #[test]
    fn full_name_wins_over_profile_name() {
        let p = profile(Some("Alice Martin"), Some("alice"));
        assert_eq!(p.canonical_name(), Some("Alice Martin"));
    }

    #[test]
    fn falls_back_to_profile_name_when_full_name_missing() {
        let p = profile(None, Some("alice"));
        assert_eq!(p.canonical_name(), Some("alice"));
    }

    #[test]
    fn empty_full_name_counts_as_missing() {
        let p = profile(Some(""), Some("alice"));
        assert_eq!(p.canonical_name(), Some("alice"));
    }

    #[test]
    fn no_name_at_all() {
        assert_eq!(profile(None, None).canonical_name(), None);
        assert_eq!(profile(Some(""), Some("")).canonical_name(), None);
    }

    #[test]
    fn resolve_keeps_priority_order() {
        assert_eq!(
            first_non_empty(&[None, Some(""), Some("second"), Some("third")]),
            Some("second")
        );
        assert_eq!(first_non_empty(&[]), None);
    }

    #[test]
    fn whitespace_name_is_kept() {
        assert_eq!(first_non_empty(&[Some(" "), Some("x")]), Some(" "));
    }

    #[test]
    fn decodes_row_with_extra_columns() {
        let json = r#"{
            "id": "8f2b5a8e-3c1d-4f6a-9b7e-2d4c6a8e0f12",
            "full_name": null,
            "profile_name": "Grandma",
            "avatar_url": "https://example.test/a.png"
        }"#;
        let p: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(p.canonical_name(), Some("Grandma"));
    }
}
