use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed relationship between two accounts (`family_connections` row).
///
/// `user_id` sent the invitation, `connected_user_id` received it. Each side
/// may carry a display-name override for how the other party is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyConnection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub connected_user_id: Uuid,
    #[serde(default)]
    pub sender_display_name: Option<String>,
    #[serde(default)]
    pub receiver_display_name: Option<String>,
}

/// The pair of display-name columns written by a corrective update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNameUpdate {
    pub sender_display_name: Option<String>,
    pub receiver_display_name: Option<String>,
}

impl DisplayNameUpdate {
    /// Sender override cleared, receiver sees the sender's canonical name.
    pub fn corrected(sender_canonical_name: Option<&str>) -> Self {
        Self {
            sender_display_name: None,
            receiver_display_name: sender_canonical_name.map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrected_update_clears_sender_side() {
        let update = DisplayNameUpdate::corrected(Some("Alice"));
        assert_eq!(update.sender_display_name, None);
        assert_eq!(update.receiver_display_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn update_serializes_explicit_nulls() {
        let json = serde_json::to_value(DisplayNameUpdate::corrected(Some("Alice"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sender_display_name": null,
                "receiver_display_name": "Alice"
            })
        );
    }

    #[test]
    fn connection_decodes_missing_name_columns_as_none() {
        let json = r#"{
            "id": "0b7c1e52-5d0e-4c55-a0b4-1f1f0c4e9a10",
            "user_id": "6a1b2c3d-4e5f-4a7b-8c9d-0e1f2a3b4c5d",
            "connected_user_id": "7b2c3d4e-5f6a-4b8c-9d0e-1f2a3b4c5d6e",
            "created_at": "2025-11-02T10:00:00Z"
        }"#;
        let conn: FamilyConnection = serde_json::from_str(json).unwrap();
        assert!(conn.sender_display_name.is_none());
        assert!(conn.receiver_display_name.is_none());
    }
}
