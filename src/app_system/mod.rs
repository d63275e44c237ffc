//! System orchestration, startup, and shutdown logic.

pub mod enrollment_system;
pub mod tracing;

pub use self::enrollment_system::*;
pub use self::tracing::*;
