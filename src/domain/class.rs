use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a class.
///
/// `Completed` is a valid persisted state but no operation currently produces
/// it; classes reach it only through externally managed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    Active,
    Cancelled,
    Completed,
}

/// Represents a bookable class.
///
/// `status` and `enrolled_count` are system-managed: the update path replaces
/// only the six core fields, and `enrolled_count` is maintained by the
/// enrollment engine as inscriptions are created and cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub max_capacity: u32,
    pub schedule_date: NaiveDate,
    pub schedule_time: String,
    pub duration_minutes: u32,
    pub status: ClassStatus,
    pub enrolled_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Class {
    /// Creates a new Class with a fresh id, `Active` status, and an empty
    /// enrollment counter.
    pub fn new(params: ClassCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: params.name,
            description: params.description,
            max_capacity: params.max_capacity,
            schedule_date: params.schedule_date,
            schedule_time: params.schedule_time,
            duration_minutes: params.duration_minutes,
            status: ClassStatus::Active,
            enrolled_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Applies the user-editable field set, leaving `status` and
    /// `enrolled_count` untouched.
    pub fn apply_update(&mut self, update: ClassUpdate) {
        self.name = update.name;
        self.description = update.description;
        self.max_capacity = update.max_capacity;
        self.schedule_date = update.schedule_date;
        self.schedule_time = update.schedule_time;
        self.duration_minutes = update.duration_minutes;
    }
}

/// Payload for creating a new class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassCreate {
    pub name: String,
    pub description: String,
    pub max_capacity: u32,
    pub schedule_date: NaiveDate,
    pub schedule_time: String,
    pub duration_minutes: u32,
}

/// Payload for updating an existing class's core fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassUpdate {
    pub name: String,
    pub description: String,
    pub max_capacity: u32,
    pub schedule_date: NaiveDate,
    pub schedule_time: String,
    pub duration_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_create() -> ClassCreate {
        ClassCreate {
            name: "Morning Yoga".to_string(),
            description: "Beginner-friendly session".to_string(),
            max_capacity: 10,
            schedule_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            schedule_time: "09:00".to_string(),
            duration_minutes: 60,
        }
    }

    #[test]
    fn new_class_starts_active_and_empty() {
        let class = Class::new(sample_create());
        assert_eq!(class.status, ClassStatus::Active);
        assert_eq!(class.enrolled_count, 0);
    }

    #[test]
    fn update_leaves_system_managed_fields_alone() {
        let mut class = Class::new(sample_create());
        class.status = ClassStatus::Cancelled;
        class.enrolled_count = 3;

        class.apply_update(ClassUpdate {
            name: "Evening Yoga".to_string(),
            description: "Moved to the evening".to_string(),
            max_capacity: 5,
            schedule_date: NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
            schedule_time: "18:00".to_string(),
            duration_minutes: 45,
        });

        assert_eq!(class.name, "Evening Yoga");
        assert_eq!(class.max_capacity, 5);
        assert_eq!(class.status, ClassStatus::Cancelled);
        assert_eq!(class.enrolled_count, 3);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ClassStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
