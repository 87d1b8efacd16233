use serde::Serialize;

use crate::models::FamilyConnection;

/// A way in which a connection's display names contradict the intended
/// direction of display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// `sender_display_name` holds the sender's own name, so the sender's
    /// family list shows themselves instead of the person they invited.
    SenderSeesOwnName,
    /// `receiver_display_name` is NULL, so the receiver has no name for
    /// whoever invited them.
    ReceiverNameMissing,
}

impl Violation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SenderSeesOwnName => "sender_sees_own_name",
            Self::ReceiverNameMissing => "receiver_name_missing",
        }
    }
}

/// Check one connection against its sender's canonical name.
///
/// Both conditions are evaluated independently; the result is empty for a
/// row that already satisfies the invariant.
pub fn detect_violations(connection: &FamilyConnection, sender_name: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if connection.sender_display_name.as_deref() == Some(sender_name) {
        violations.push(Violation::SenderSeesOwnName);
    }
    if connection.receiver_display_name.is_none() {
        violations.push(Violation::ReceiverNameMissing);
    }

    violations
}
