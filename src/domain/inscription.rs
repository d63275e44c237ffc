use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an inscription.
///
/// Transitions are one-way: `Active` to `Cancelled` via explicit
/// cancellation. `Completed` is a valid persisted state reserved for
/// external lifecycle management; nothing here produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InscriptionStatus {
    Active,
    Cancelled,
    Completed,
}

/// An enrollment record linking one user to one class.
///
/// Inscriptions are never deleted directly; they disappear only when the
/// referenced user or class is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub class_id: Uuid,
    pub status: InscriptionStatus,
    pub enrolled_at: DateTime<Utc>,
}

impl Inscription {
    /// Creates a new active Inscription with a fresh id and enrollment
    /// timestamp.
    pub fn new(user_id: Uuid, class_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            class_id,
            status: InscriptionStatus::Active,
            enrolled_at: Utc::now(),
        }
    }

    /// Whether this inscription counts toward capacity and uniqueness checks.
    pub fn is_active(&self) -> bool {
        self.status == InscriptionStatus::Active
    }
}
