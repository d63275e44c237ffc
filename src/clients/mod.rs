use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{
    Class, ClassCreate, ClassUpdate, Inscription, PublicUser, UserCreate, UserUpdate,
};
use crate::error::{ClassError, InscriptionError, UserError};
use crate::messages::RegistryRequest;

#[cfg(test)]
use crate::domain::ClassStatus;

/// Generate client methods with oneshot channel boilerplate and automatic
/// tracing. Channel failures map to the domain's communication error.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

// =============================================================================
// User Client
// =============================================================================

/// Client for user operations on the registry actor.
///
/// All three clients share the registry's mailbox; splitting them per domain
/// keeps each consumer (e.g. a user endpoint group) on a narrow surface.
#[derive(Clone)]
pub struct UserClient {
    sender: mpsc::Sender<RegistryRequest>,
}

impl UserClient {
    pub fn new(sender: mpsc::Sender<RegistryRequest>) -> Self {
        Self { sender }
    }
}

client_method!(UserClient => fn create_user(params: UserCreate) -> PublicUser as RegistryRequest::CreateUser, Error = UserError);
client_method!(UserClient => fn list_users() -> Vec<PublicUser> as RegistryRequest::ListUsers, Error = UserError);
client_method!(UserClient => fn get_user(id: Uuid) -> PublicUser as RegistryRequest::GetUser, Error = UserError);
client_method!(UserClient => fn update_user(id: Uuid, params: UserUpdate) -> PublicUser as RegistryRequest::UpdateUser, Error = UserError);
client_method!(UserClient => fn delete_user(id: Uuid) -> bool as RegistryRequest::DeleteUser, Error = UserError);

// =============================================================================
// Class Client
// =============================================================================

/// Client for class operations on the registry actor.
#[derive(Clone)]
pub struct ClassClient {
    sender: mpsc::Sender<RegistryRequest>,
}

impl ClassClient {
    pub fn new(sender: mpsc::Sender<RegistryRequest>) -> Self {
        Self { sender }
    }
}

client_method!(ClassClient => fn create_class(params: ClassCreate) -> Class as RegistryRequest::CreateClass, Error = ClassError);
client_method!(ClassClient => fn list_classes() -> Vec<Class> as RegistryRequest::ListClasses, Error = ClassError);
client_method!(ClassClient => fn get_class(id: Uuid) -> Class as RegistryRequest::GetClass, Error = ClassError);
client_method!(ClassClient => fn update_class(id: Uuid, params: ClassUpdate) -> Class as RegistryRequest::UpdateClass, Error = ClassError);
client_method!(ClassClient => fn delete_class(id: Uuid) -> bool as RegistryRequest::DeleteClass, Error = ClassError);

// Test-only state setup for exercising non-active enrollment guards.
#[cfg(test)]
client_method!(ClassClient => fn set_class_status(id: Uuid, status: ClassStatus) -> () as RegistryRequest::SetClassStatus, Error = ClassError);

// =============================================================================
// Inscription Client
// =============================================================================

/// Client for enrollment operations on the registry actor.
#[derive(Clone)]
pub struct InscriptionClient {
    sender: mpsc::Sender<RegistryRequest>,
}

impl InscriptionClient {
    pub fn new(sender: mpsc::Sender<RegistryRequest>) -> Self {
        Self { sender }
    }
}

client_method!(InscriptionClient => fn create_inscription(user_id: Uuid, class_id: Uuid) -> Inscription as RegistryRequest::CreateInscription, Error = InscriptionError);
client_method!(InscriptionClient => fn list_inscriptions() -> Vec<Inscription> as RegistryRequest::ListInscriptions, Error = InscriptionError);
client_method!(InscriptionClient => fn list_by_user(user_id: Uuid) -> Vec<Inscription> as RegistryRequest::ListInscriptionsByUser, Error = InscriptionError);
client_method!(InscriptionClient => fn list_by_class(class_id: Uuid) -> Vec<Inscription> as RegistryRequest::ListInscriptionsByClass, Error = InscriptionError);
client_method!(InscriptionClient => fn cancel_inscription(id: Uuid) -> Inscription as RegistryRequest::CancelInscription, Error = InscriptionError);
