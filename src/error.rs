use thiserror::Error;
use uuid::Uuid;

/// Errors from the JSON-backed dataset file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Corrupt data file: {0}")]
    Corrupt(String),
    #[error("Failed to encode dataset: {0}")]
    Encode(String),
    #[error("Data file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Failed to persist dataset: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Errors that can occur during class operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassError {
    #[error("Class not found: {0}")]
    NotFound(Uuid),
    #[error("Failed to persist dataset: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Errors that can occur during inscription operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InscriptionError {
    #[error("Inscription not found: {0}")]
    NotFound(Uuid),
    #[error("User not found: {0}")]
    UserNotFound(Uuid),
    #[error("Class not found: {0}")]
    ClassNotFound(Uuid),
    #[error("Class is not open for enrollment: {0}")]
    ClassNotActive(Uuid),
    #[error("User {user_id} is already enrolled in class {class_id}")]
    AlreadyEnrolled { user_id: Uuid, class_id: Uuid },
    #[error("Class {class_id} has reached its maximum capacity of {max_capacity}")]
    CapacityExceeded { class_id: Uuid, max_capacity: u32 },
    #[error("Failed to persist dataset: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        UserError::Persistence(e.to_string())
    }
}

impl From<StoreError> for ClassError {
    fn from(e: StoreError) -> Self {
        ClassError::Persistence(e.to_string())
    }
}

impl From<StoreError> for InscriptionError {
    fn from(e: StoreError) -> Self {
        InscriptionError::Persistence(e.to_string())
    }
}
