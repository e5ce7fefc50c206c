//! Nutrack tools
//!
//! Tool implementations behind the MCP surface. Each takes the database and
//! the acting user's id and returns a serializable response.

pub mod account;
pub mod consumptions;
pub mod foods;
pub mod goals;
pub mod history;
pub mod status;

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::db::Database;
use crate::error::TrackerResult;
use crate::models::User;

/// Resolve the session user, creating the row on first use
pub fn session_user(db: &Database, name: &str) -> TrackerResult<User> {
    let user = db.with_conn(|conn| User::get_or_create(conn, name))?;
    debug!(user_id = user.id, name, "resolved session user");
    Ok(user)
}

/// Monotonic counter bumped after every successful write.
///
/// Read responses carry the value so a polling client can tell whether
/// anything changed since its last fetch.
#[derive(Debug, Default)]
pub struct DataRevision(AtomicU64);

impl DataRevision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Record a mutation; returns the new revision
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_increases() {
        let revision = DataRevision::new();
        assert_eq!(revision.current(), 0);
        assert_eq!(revision.bump(), 1);
        assert_eq!(revision.bump(), 2);
        assert_eq!(revision.current(), 2);
    }

    #[test]
    fn test_session_user_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("session.db")).unwrap();
        let first = session_user(&db, "alice").unwrap();
        let again = session_user(&db, "alice").unwrap();
        assert_eq!(first.id, again.id);
        assert_ne!(session_user(&db, "bob").unwrap().id, first.id);
    }
}
