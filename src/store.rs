//! JSON-backed persistence for the full dataset.
//!
//! The store owns the canonical on-disk representation: one document with the
//! three collections, rewritten wholesale on every mutation. There is no
//! append log or diffing; durability comes from synchronously saving after
//! each write.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Class, Inscription, User};
use crate::error::StoreError;

/// The complete persisted state: all three collections, in insertion order.
///
/// All components operate on one shared instance of this (held by the
/// registry actor), never on private copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub users: Vec<User>,
    pub classes: Vec<Class>,
    pub inscriptions: Vec<Inscription>,
}

impl Dataset {
    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn class(&self, id: Uuid) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn class_mut(&mut self, id: Uuid) -> Option<&mut Class> {
        self.classes.iter_mut().find(|c| c.id == id)
    }

    pub fn inscription_mut(&mut self, id: Uuid) -> Option<&mut Inscription> {
        self.inscriptions.iter_mut().find(|i| i.id == id)
    }

    /// Whether `email` is registered to a user other than `exclude`.
    pub fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != exclude)
    }

    /// The active inscription for a (user, class) pair, if one exists. At
    /// most one can be active at a time.
    pub fn active_inscription(&self, user_id: Uuid, class_id: Uuid) -> Option<&Inscription> {
        self.inscriptions
            .iter()
            .find(|i| i.user_id == user_id && i.class_id == class_id && i.is_active())
    }

    /// Count of active inscriptions for a class, computed from the records
    /// themselves rather than the cached `enrolled_count`.
    pub fn active_count(&self, class_id: Uuid) -> u32 {
        self.inscriptions
            .iter()
            .filter(|i| i.class_id == class_id && i.is_active())
            .count() as u32
    }

    /// Removes a user and, in cascade, every inscription referencing it.
    /// Returns false when no such user exists. Cascades are linear scans;
    /// dataset sizes stay small enough that an index would not pay for
    /// itself.
    pub fn remove_user(&mut self, id: Uuid) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        if self.users.len() == before {
            return false;
        }
        self.inscriptions.retain(|i| i.user_id != id);
        true
    }

    /// Removes a class and, in cascade, every inscription referencing it.
    /// Returns false when no such class exists.
    pub fn remove_class(&mut self, id: Uuid) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c.id != id);
        if self.classes.len() == before {
            return false;
        }
        self.inscriptions.retain(|i| i.class_id != id);
        true
    }
}

/// File-backed store for a [`Dataset`].
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the full dataset from the backing file.
    ///
    /// A missing file yields an empty dataset. A file that exists but cannot
    /// be parsed as a dataset document (including one with missing top-level
    /// collections) is reported as [`StoreError::Corrupt`].
    pub fn load(&self) -> Result<Dataset, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No data file, starting with empty dataset");
            return Ok(Dataset::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        let dataset =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(dataset)
    }

    /// Serializes the full dataset and replaces the backing file.
    ///
    /// The document is written to a sibling temp file and renamed into place,
    /// so a crash mid-write never leaves a torn file behind.
    pub fn save(&self, data: &Dataset) -> Result<(), StoreError> {
        let json =
            serde_json::to_vec_pretty(data).map_err(|e| StoreError::Encode(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = json.len(), "Dataset saved");
        Ok(())
    }
}
