use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::detection::{detect_violations, Violation};
use super::traits::{ConnectionStore, ProfileStore};
use super::RepairError;
use crate::models::{DisplayNameUpdate, FamilyConnection};

/// What the auditor decided for one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AuditDecision {
    /// Row already satisfies the invariant; nothing written.
    Consistent,
    /// Row violated the invariant and was rewritten (or would have been,
    /// on a dry run).
    Repaired { violations: Vec<Violation> },
    /// Sender has no profile row.
    SkippedMissingProfile,
    /// Sender's profile has neither `full_name` nor `profile_name`, so there
    /// is no correct receiver-facing name to write.
    SkippedUnnamedProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub connection_id: Uuid,
    #[serde(flatten)]
    pub decision: AuditDecision,
}

/// Full trace of one audit pass.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub total: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl AuditReport {
    fn new(total: usize, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            total,
            outcomes: Vec::with_capacity(total),
        }
    }

    pub fn repaired(&self) -> usize {
        self.count(|d| matches!(d, AuditDecision::Repaired { .. }))
    }

    pub fn consistent(&self) -> usize {
        self.count(|d| matches!(d, AuditDecision::Consistent))
    }

    pub fn skipped(&self) -> usize {
        self.count(|d| {
            matches!(
                d,
                AuditDecision::SkippedMissingProfile | AuditDecision::SkippedUnnamedProfile
            )
        })
    }

    /// Ids of the rows that were (or would be) rewritten.
    pub fn repaired_ids(&self) -> Vec<Uuid> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.decision, AuditDecision::Repaired { .. }))
            .map(|o| o.connection_id)
            .collect()
    }

    fn count(&self, pred: impl Fn(&AuditDecision) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.decision)).count()
    }
}

/// Audits `family_connections` against sender profiles and rewrites rows
/// whose display names point the wrong way.
///
/// Sequential and single-pass. A missing profile skips one row; any store
/// error aborts the whole pass. Rerunning is safe because a repaired row no
/// longer matches either violation.
pub struct ConnectionAuditor<'a> {
    connections: &'a dyn ConnectionStore,
    profiles: &'a dyn ProfileStore,
    dry_run: bool,
}

impl<'a> ConnectionAuditor<'a> {
    pub fn new(connections: &'a dyn ConnectionStore, profiles: &'a dyn ProfileStore) -> Self {
        Self {
            connections,
            profiles,
            dry_run: false,
        }
    }

    /// Evaluate and report every decision without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self) -> Result<AuditReport, RepairError> {
        tracing::info!(dry_run = self.dry_run, "Starting connection audit");

        let connections = self.connections.list_connections()?;
        tracing::info!(total = connections.len(), "Found connections");

        let mut report = AuditReport::new(connections.len(), self.dry_run);
        for connection in &connections {
            let decision = self.audit_connection(connection)?;
            report.outcomes.push(RecordOutcome {
                connection_id: connection.id,
                decision,
            });
        }
        report.finished_at = Some(Utc::now());

        tracing::info!(
            total = report.total,
            repaired = report.repaired(),
            consistent = report.consistent(),
            skipped = report.skipped(),
            dry_run = self.dry_run,
            "Connection audit complete"
        );
        Ok(report)
    }

    fn audit_connection(&self, connection: &FamilyConnection) -> Result<AuditDecision, RepairError> {
        let Some(profile) = self.profiles.get_profile(&connection.user_id)? else {
            tracing::warn!(
                connection_id = %connection.id,
                sender_id = %connection.user_id,
                "Sender profile not found, skipping"
            );
            return Ok(AuditDecision::SkippedMissingProfile);
        };

        let Some(sender_name) = profile.canonical_name() else {
            tracing::warn!(
                connection_id = %connection.id,
                sender_id = %connection.user_id,
                "Sender profile has no display name, skipping"
            );
            return Ok(AuditDecision::SkippedUnnamedProfile);
        };

        tracing::info!(
            connection_id = %connection.id,
            sender = sender_name,
            sender_id = %connection.user_id,
            target_id = %connection.connected_user_id,
            saved_sender_display_name = ?connection.sender_display_name,
            saved_receiver_display_name = ?connection.receiver_display_name,
            "Checking connection"
        );

        let violations = detect_violations(connection, sender_name);
        if violations.is_empty() {
            return Ok(AuditDecision::Consistent);
        }

        for violation in &violations {
            match violation {
                Violation::SenderSeesOwnName => tracing::warn!(
                    connection_id = %connection.id,
                    "Suspicious: sender sees their own name"
                ),
                Violation::ReceiverNameMissing => tracing::warn!(
                    connection_id = %connection.id,
                    "Suspicious: receiver display name is NULL"
                ),
            }
        }

        let update = DisplayNameUpdate::corrected(Some(sender_name));
        if self.dry_run {
            tracing::info!(
                connection_id = %connection.id,
                receiver_display_name = sender_name,
                "Dry run: would fix"
            );
        } else {
            tracing::info!(connection_id = %connection.id, "Fixing");
            self.connections.update_display_names(&connection.id, &update)?;
            tracing::info!(
                connection_id = %connection.id,
                receiver_display_name = sender_name,
                "Fixed"
            );
        }

        Ok(AuditDecision::Repaired { violations })
    }
}

/// Run one applying audit pass over the given stores.
pub fn run_audit(
    connections: &dyn ConnectionStore,
    profiles: &dyn ProfileStore,
) -> Result<AuditReport, RepairError> {
    ConnectionAuditor::new(connections, profiles).run()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::models::Profile;

    /// In-memory stand-in for both tables, recording every write.
    #[derive(Default)]
    struct FakeStore {
        connections: RefCell<Vec<FamilyConnection>>,
        profiles: HashMap<Uuid, Profile>,
        updates: RefCell<Vec<Uuid>>,
        fail_update_for: Option<Uuid>,
    }

    impl FakeStore {
        fn with_profile(mut self, id: Uuid, full_name: Option<&str>, profile_name: Option<&str>) -> Self {
            self.profiles.insert(
                id,
                Profile {
                    id,
                    full_name: full_name.map(String::from),
                    profile_name: profile_name.map(String::from),
                },
            );
            self
        }

        fn with_connection(self, sender: Uuid, sender_name: Option<&str>, receiver_name: Option<&str>) -> (Self, Uuid) {
            let id = Uuid::new_v4();
            self.connections.borrow_mut().push(FamilyConnection {
                id,
                user_id: sender,
                connected_user_id: Uuid::new_v4(),
                sender_display_name: sender_name.map(String::from),
                receiver_display_name: receiver_name.map(String::from),
            });
            (self, id)
        }

        fn get(&self, id: Uuid) -> FamilyConnection {
            self.connections
                .borrow()
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .unwrap()
        }

        fn snapshot(&self) -> Vec<FamilyConnection> {
            self.connections.borrow().clone()
        }
    }

    impl ConnectionStore for FakeStore {
        fn list_connections(&self) -> Result<Vec<FamilyConnection>, RepairError> {
            Ok(self.connections.borrow().clone())
        }

        fn update_display_names(&self, id: &Uuid, update: &DisplayNameUpdate) -> Result<(), RepairError> {
            if self.fail_update_for == Some(*id) {
                return Err(RepairError::Store("connection reset by peer".into()));
            }
            self.updates.borrow_mut().push(*id);
            let mut rows = self.connections.borrow_mut();
            let row = rows
                .iter_mut()
                .find(|c| c.id == *id)
                .ok_or_else(|| RepairError::Store(format!("no row {id}")))?;
            row.sender_display_name = update.sender_display_name.clone();
            row.receiver_display_name = update.receiver_display_name.clone();
            Ok(())
        }
    }

    impl ProfileStore for FakeStore {
        fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>, RepairError> {
            Ok(self.profiles.get(id).cloned())
        }
    }

    #[test]
    fn repairs_classic_bug_pattern() {
        let alice = Uuid::new_v4();
        let (store, conn_id) = FakeStore::default()
            .with_profile(alice, Some("Alice"), None)
            .with_connection(alice, Some("Alice"), None);

        let report = run_audit(&store, &store).unwrap();

        let row = store.get(conn_id);
        assert_eq!(row.sender_display_name, None);
        assert_eq!(row.receiver_display_name.as_deref(), Some("Alice"));
        assert_eq!(report.repaired(), 1);
        assert_eq!(
            report.outcomes[0].decision,
            AuditDecision::Repaired {
                violations: vec![Violation::SenderSeesOwnName, Violation::ReceiverNameMissing]
            }
        );
    }

    #[test]
    fn consistent_row_is_not_written() {
        let alice = Uuid::new_v4();
        let (store, _) = FakeStore::default()
            .with_profile(alice, Some("Alice"), None)
            .with_connection(alice, Some("Bob's Nickname"), Some("Alice"));

        let report = run_audit(&store, &store).unwrap();

        assert!(store.updates.borrow().is_empty());
        assert_eq!(report.consistent(), 1);
        assert_eq!(report.repaired(), 0);
    }

    #[test]
    fn receiver_name_uses_profile_name_fallback() {
        let sender = Uuid::new_v4();
        let (store, conn_id) = FakeStore::default()
            .with_profile(sender, Some(""), Some("Grandpa Joe"))
            .with_connection(sender, Some("Nick"), None);

        run_audit(&store, &store).unwrap();

        let row = store.get(conn_id);
        assert_eq!(row.sender_display_name, None);
        assert_eq!(row.receiver_display_name.as_deref(), Some("Grandpa Joe"));
    }

    #[test]
    fn missing_profile_skips_and_continues() {
        let ghost = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let store = FakeStore::default().with_profile(alice, Some("Alice"), None);
        let (store, ghost_conn) = store.with_connection(ghost, Some("Ghost"), None);
        let (store, alice_conn) = store.with_connection(alice, Some("Alice"), None);

        let report = run_audit(&store, &store).unwrap();

        let untouched = store.get(ghost_conn);
        assert_eq!(untouched.sender_display_name.as_deref(), Some("Ghost"));
        assert_eq!(untouched.receiver_display_name, None);
        assert_eq!(store.get(alice_conn).receiver_display_name.as_deref(), Some("Alice"));
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.repaired(), 1);
        assert_eq!(report.outcomes[0].decision, AuditDecision::SkippedMissingProfile);
    }

    #[test]
    fn unnamed_profile_is_skipped() {
        let sender = Uuid::new_v4();
        let (store, conn_id) = FakeStore::default()
            .with_profile(sender, None, Some(""))
            .with_connection(sender, None, None);

        let report = run_audit(&store, &store).unwrap();

        assert!(store.updates.borrow().is_empty());
        assert_eq!(store.get(conn_id).receiver_display_name, None);
        assert_eq!(report.outcomes[0].decision, AuditDecision::SkippedUnnamedProfile);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let store = FakeStore::default()
            .with_profile(alice, Some("Alice"), None)
            .with_profile(bob, None, Some("Bob"));
        let (store, _) = store.with_connection(alice, Some("Alice"), None);
        let (store, _) = store.with_connection(bob, Some("Mum"), None);
        let (store, _) = store.with_connection(bob, None, Some("Bob"));

        let first = run_audit(&store, &store).unwrap();
        let after_first = store.snapshot();
        let writes_after_first = store.updates.borrow().len();

        let second = run_audit(&store, &store).unwrap();

        assert_eq!(first.repaired(), 2);
        assert_eq!(second.repaired(), 0);
        assert_eq!(second.consistent(), 3);
        assert_eq!(store.snapshot(), after_first);
        assert_eq!(store.updates.borrow().len(), writes_after_first);
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let alice = Uuid::new_v4();
        let (store, conn_id) = FakeStore::default()
            .with_profile(alice, Some("Alice"), None)
            .with_connection(alice, Some("Alice"), None);

        let report = ConnectionAuditor::new(&store, &store)
            .dry_run(true)
            .run()
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.repaired_ids(), vec![conn_id]);
        assert!(store.updates.borrow().is_empty());
        assert_eq!(store.get(conn_id).sender_display_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn store_failure_aborts_the_pass() {
        let alice = Uuid::new_v4();
        let store = FakeStore::default().with_profile(alice, Some("Alice"), None);
        let (store, first) = store.with_connection(alice, Some("Alice"), None);
        let (mut store, second) = store.with_connection(alice, Some("Alice"), None);
        store.fail_update_for = Some(first);

        let err = run_audit(&store, &store).unwrap_err();

        assert!(matches!(err, RepairError::Store(_)));
        assert_eq!(store.get(second).receiver_display_name, None);
    }

    #[test]
    fn empty_table_completes() {
        let store = FakeStore::default();
        let report = run_audit(&store, &store).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn report_serializes_decisions() {
        let alice = Uuid::new_v4();
        let (store, _) = FakeStore::default()
            .with_profile(alice, Some("Alice"), None)
            .with_connection(alice, Some("Alice"), Some("Alice"));

        let report = run_audit(&store, &store).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["outcomes"][0]["decision"], "repaired");
        assert_eq!(json["outcomes"][0]["violations"][0], "sender_sees_own_name");
    }
}
