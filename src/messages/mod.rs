use tokio::sync::oneshot;
use uuid::Uuid;

use crate::domain::{
    Class, ClassCreate, ClassUpdate, Inscription, PublicUser, UserCreate, UserUpdate,
};
use crate::error::{ClassError, InscriptionError, UserError};

#[cfg(test)]
use crate::domain::ClassStatus;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the registry actor. Each variant includes parameters
/// and a oneshot channel for the response.
///
/// Every mutation in the system flows through this one enum, which is what
/// makes the registry mailbox the single write-serialization point: a
/// guard-check-and-effect sequence is handled to completion before the next
/// message is taken.
#[derive(Debug)]
pub enum RegistryRequest {
    // Users
    CreateUser {
        params: UserCreate,
        respond_to: ServiceResponse<PublicUser, UserError>,
    },
    ListUsers {
        respond_to: ServiceResponse<Vec<PublicUser>, UserError>,
    },
    GetUser {
        id: Uuid,
        respond_to: ServiceResponse<PublicUser, UserError>,
    },
    UpdateUser {
        id: Uuid,
        params: UserUpdate,
        respond_to: ServiceResponse<PublicUser, UserError>,
    },
    DeleteUser {
        id: Uuid,
        respond_to: ServiceResponse<bool, UserError>,
    },

    // Classes
    CreateClass {
        params: ClassCreate,
        respond_to: ServiceResponse<Class, ClassError>,
    },
    ListClasses {
        respond_to: ServiceResponse<Vec<Class>, ClassError>,
    },
    GetClass {
        id: Uuid,
        respond_to: ServiceResponse<Class, ClassError>,
    },
    UpdateClass {
        id: Uuid,
        params: ClassUpdate,
        respond_to: ServiceResponse<Class, ClassError>,
    },
    DeleteClass {
        id: Uuid,
        respond_to: ServiceResponse<bool, ClassError>,
    },

    // Inscriptions
    CreateInscription {
        user_id: Uuid,
        class_id: Uuid,
        respond_to: ServiceResponse<Inscription, InscriptionError>,
    },
    ListInscriptions {
        respond_to: ServiceResponse<Vec<Inscription>, InscriptionError>,
    },
    ListInscriptionsByUser {
        user_id: Uuid,
        respond_to: ServiceResponse<Vec<Inscription>, InscriptionError>,
    },
    ListInscriptionsByClass {
        class_id: Uuid,
        respond_to: ServiceResponse<Vec<Inscription>, InscriptionError>,
    },
    CancelInscription {
        id: Uuid,
        respond_to: ServiceResponse<Inscription, InscriptionError>,
    },

    Shutdown,

    // Test-only state setup: class status has no public transition operation,
    // but guards against non-active classes still need exercising.
    #[cfg(test)]
    SetClassStatus {
        id: Uuid,
        status: ClassStatus,
        respond_to: ServiceResponse<(), ClassError>,
    },
}
