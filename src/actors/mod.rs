use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::domain::{
    Class, ClassCreate, ClassStatus, ClassUpdate, Inscription, InscriptionStatus, PublicUser,
    User, UserCreate, UserUpdate,
};
use crate::error::{ClassError, InscriptionError, StoreError, UserError};
use crate::messages::{RegistryRequest, ServiceResponse};
use crate::store::{Dataset, JsonStore};

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// The registry actor: owns the canonical dataset and the persistence store.
///
/// All entity CRUD, the enrollment engine, and the read accessors live here,
/// behind one mailbox. Mutating handlers follow a guard-then-commit
/// discipline (all checks against the current snapshot, then apply and
/// persist), and because messages are handled one at a time, the whole
/// check-and-effect sequence is atomic with respect to other requests.
pub struct RegistryService {
    receiver: mpsc::Receiver<RegistryRequest>,
    data: Dataset,
    store: JsonStore,
}

impl RegistryService {
    /// Hydrates the dataset from the store and returns the service together
    /// with the sender side of its mailbox.
    pub fn new(
        buffer_size: usize,
        store: JsonStore,
    ) -> Result<(Self, mpsc::Sender<RegistryRequest>), StoreError> {
        let data = store.load()?;
        info!(
            users = data.users.len(),
            classes = data.classes.len(),
            inscriptions = data.inscriptions.len(),
            "Dataset loaded"
        );
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            data,
            store,
        };
        Ok((service, sender))
    }

    /// Main actor loop. Delegates each message to a dedicated handler and
    /// runs until the mailbox closes or a shutdown request arrives.
    #[instrument(name = "registry_service", skip(self))]
    pub async fn run(mut self) {
        info!("RegistryService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RegistryRequest::CreateUser { params, respond_to } => {
                    self.handle_create_user(params, respond_to);
                }
                RegistryRequest::ListUsers { respond_to } => {
                    self.handle_list_users(respond_to);
                }
                RegistryRequest::GetUser { id, respond_to } => {
                    self.handle_get_user(id, respond_to);
                }
                RegistryRequest::UpdateUser {
                    id,
                    params,
                    respond_to,
                } => {
                    self.handle_update_user(id, params, respond_to);
                }
                RegistryRequest::DeleteUser { id, respond_to } => {
                    self.handle_delete_user(id, respond_to);
                }
                RegistryRequest::CreateClass { params, respond_to } => {
                    self.handle_create_class(params, respond_to);
                }
                RegistryRequest::ListClasses { respond_to } => {
                    self.handle_list_classes(respond_to);
                }
                RegistryRequest::GetClass { id, respond_to } => {
                    self.handle_get_class(id, respond_to);
                }
                RegistryRequest::UpdateClass {
                    id,
                    params,
                    respond_to,
                } => {
                    self.handle_update_class(id, params, respond_to);
                }
                RegistryRequest::DeleteClass { id, respond_to } => {
                    self.handle_delete_class(id, respond_to);
                }
                RegistryRequest::CreateInscription {
                    user_id,
                    class_id,
                    respond_to,
                } => {
                    self.handle_create_inscription(user_id, class_id, respond_to);
                }
                RegistryRequest::ListInscriptions { respond_to } => {
                    self.handle_list_inscriptions(respond_to);
                }
                RegistryRequest::ListInscriptionsByUser {
                    user_id,
                    respond_to,
                } => {
                    self.handle_list_inscriptions_by_user(user_id, respond_to);
                }
                RegistryRequest::ListInscriptionsByClass {
                    class_id,
                    respond_to,
                } => {
                    self.handle_list_inscriptions_by_class(class_id, respond_to);
                }
                RegistryRequest::CancelInscription { id, respond_to } => {
                    self.handle_cancel_inscription(id, respond_to);
                }
                RegistryRequest::Shutdown => {
                    info!("RegistryService shutting down");
                    break;
                }
                #[cfg(test)]
                RegistryRequest::SetClassStatus {
                    id,
                    status,
                    respond_to,
                } => {
                    let result = match self.data.class_mut(id) {
                        Some(class) => {
                            class.status = status;
                            Ok(())
                        }
                        None => Err(ClassError::NotFound(id)),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }

        info!("RegistryService stopped");
    }

    /// Synchronizes the full in-memory dataset to disk. Called by every
    /// mutating handler before it reports success; a failure here means the
    /// in-memory state is ahead of durable state, which is surfaced to the
    /// caller rather than rolled back.
    fn persist(&self) -> Result<(), StoreError> {
        self.store.save(&self.data)
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    #[instrument(fields(user_email = %params.email), skip(self, params, respond_to))]
    fn handle_create_user(
        &mut self,
        params: UserCreate,
        respond_to: ServiceResponse<PublicUser, UserError>,
    ) {
        debug!("Processing create_user request");

        if self.data.email_taken(&params.email, None) {
            error!("Email already registered");
            send_error!(respond_to, UserError::EmailTaken(params.email));
        }

        let user = User::new(params);
        let public = PublicUser::from(&user);
        self.data.users.push(user);

        if let Err(e) = self.persist() {
            error!(error = %e, "Failed to persist new user");
            send_error!(respond_to, UserError::from(e));
        }

        info!(user_id = %public.id, "User created successfully");
        let _ = respond_to.send(Ok(public));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_users(&self, respond_to: ServiceResponse<Vec<PublicUser>, UserError>) {
        debug!("Processing list_users request");

        let users: Vec<PublicUser> = self.data.users.iter().map(PublicUser::from).collect();
        info!(user_count = users.len(), "Listed users");

        let _ = respond_to.send(Ok(users));
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_get_user(&self, id: Uuid, respond_to: ServiceResponse<PublicUser, UserError>) {
        debug!("Processing get_user request");

        let result = match self.data.user(id) {
            Some(user) => {
                info!(user_name = %user.name, "User found");
                Ok(PublicUser::from(user))
            }
            None => {
                debug!("User not found");
                Err(UserError::NotFound(id))
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(user_id = %id), skip(self, params, respond_to))]
    fn handle_update_user(
        &mut self,
        id: Uuid,
        params: UserUpdate,
        respond_to: ServiceResponse<PublicUser, UserError>,
    ) {
        debug!("Processing update_user request");

        if self.data.user(id).is_none() {
            error!("User not found for update");
            send_error!(respond_to, UserError::NotFound(id));
        }
        // Uniqueness re-check excludes the record being updated, so keeping
        // one's own email is allowed.
        if self.data.email_taken(&params.email, Some(id)) {
            error!("Email already registered");
            send_error!(respond_to, UserError::EmailTaken(params.email));
        }

        let public = match self.data.user_mut(id) {
            Some(user) => {
                user.apply_update(params);
                PublicUser::from(&*user)
            }
            None => send_error!(respond_to, UserError::NotFound(id)),
        };

        if let Err(e) = self.persist() {
            error!(error = %e, "Failed to persist user update");
            send_error!(respond_to, UserError::from(e));
        }

        info!("User updated successfully");
        let _ = respond_to.send(Ok(public));
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_delete_user(&mut self, id: Uuid, respond_to: ServiceResponse<bool, UserError>) {
        debug!("Processing delete_user request");

        let removed = self.data.remove_user(id);
        if removed {
            if let Err(e) = self.persist() {
                error!(error = %e, "Failed to persist user deletion");
                send_error!(respond_to, UserError::from(e));
            }
            info!("User deleted, dependent inscriptions removed");
        } else {
            debug!("User not found");
        }

        let _ = respond_to.send(Ok(removed));
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    #[instrument(fields(class_name = %params.name), skip(self, params, respond_to))]
    fn handle_create_class(
        &mut self,
        params: ClassCreate,
        respond_to: ServiceResponse<Class, ClassError>,
    ) {
        debug!("Processing create_class request");

        let class = Class::new(params);
        let created = class.clone();
        self.data.classes.push(class);

        if let Err(e) = self.persist() {
            error!(error = %e, "Failed to persist new class");
            send_error!(respond_to, ClassError::from(e));
        }

        info!(class_id = %created.id, "Class created successfully");
        let _ = respond_to.send(Ok(created));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_classes(&self, respond_to: ServiceResponse<Vec<Class>, ClassError>) {
        debug!("Processing list_classes request");

        let classes = self.data.classes.clone();
        info!(class_count = classes.len(), "Listed classes");

        let _ = respond_to.send(Ok(classes));
    }

    #[instrument(fields(class_id = %id), skip(self, respond_to))]
    fn handle_get_class(&self, id: Uuid, respond_to: ServiceResponse<Class, ClassError>) {
        debug!("Processing get_class request");

        let result = match self.data.class(id) {
            Some(class) => {
                info!(class_name = %class.name, "Class found");
                Ok(class.clone())
            }
            None => {
                debug!("Class not found");
                Err(ClassError::NotFound(id))
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(class_id = %id), skip(self, params, respond_to))]
    fn handle_update_class(
        &mut self,
        id: Uuid,
        params: ClassUpdate,
        respond_to: ServiceResponse<Class, ClassError>,
    ) {
        debug!("Processing update_class request");

        let updated = match self.data.class_mut(id) {
            Some(class) => {
                class.apply_update(params);
                class.clone()
            }
            None => {
                error!("Class not found for update");
                send_error!(respond_to, ClassError::NotFound(id));
            }
        };

        if let Err(e) = self.persist() {
            error!(error = %e, "Failed to persist class update");
            send_error!(respond_to, ClassError::from(e));
        }

        info!("Class updated successfully");
        let _ = respond_to.send(Ok(updated));
    }

    #[instrument(fields(class_id = %id), skip(self, respond_to))]
    fn handle_delete_class(&mut self, id: Uuid, respond_to: ServiceResponse<bool, ClassError>) {
        debug!("Processing delete_class request");

        let removed = self.data.remove_class(id);
        if removed {
            if let Err(e) = self.persist() {
                error!(error = %e, "Failed to persist class deletion");
                send_error!(respond_to, ClassError::from(e));
            }
            info!("Class deleted, dependent inscriptions removed");
        } else {
            debug!("Class not found");
        }

        let _ = respond_to.send(Ok(removed));
    }

    // -------------------------------------------------------------------------
    // Inscriptions (the enrollment engine)
    // -------------------------------------------------------------------------

    /// Guard-then-commit enrollment. Every precondition is checked against
    /// the current snapshot before anything is mutated; a failed guard
    /// leaves the dataset untouched. The commit (append the inscription, set
    /// the class counter, persist) happens as one unit within this handler.
    #[instrument(fields(user_id = %user_id, class_id = %class_id), skip(self, respond_to))]
    fn handle_create_inscription(
        &mut self,
        user_id: Uuid,
        class_id: Uuid,
        respond_to: ServiceResponse<Inscription, InscriptionError>,
    ) {
        info!("Processing create_inscription request");

        // Guard 1: the user must exist.
        if self.data.user(user_id).is_none() {
            error!("User not found");
            send_error!(respond_to, InscriptionError::UserNotFound(user_id));
        }

        // Guard 2: the class must exist.
        let (status, max_capacity) = match self.data.class(class_id) {
            Some(class) => (class.status, class.max_capacity),
            None => {
                error!("Class not found");
                send_error!(respond_to, InscriptionError::ClassNotFound(class_id));
            }
        };

        // Guard 3: the class must be open for enrollment.
        if status != ClassStatus::Active {
            error!(?status, "Class is not open for enrollment");
            send_error!(respond_to, InscriptionError::ClassNotActive(class_id));
        }

        // Guard 4: at most one active inscription per (user, class) pair.
        if self.data.active_inscription(user_id, class_id).is_some() {
            error!("User already enrolled in class");
            send_error!(
                respond_to,
                InscriptionError::AlreadyEnrolled { user_id, class_id }
            );
        }

        // Guard 5: capacity, judged on the actual count of active
        // inscriptions rather than the cached counter.
        let active = self.data.active_count(class_id);
        if active >= max_capacity {
            error!(active, max_capacity, "Class is at maximum capacity");
            send_error!(
                respond_to,
                InscriptionError::CapacityExceeded {
                    class_id,
                    max_capacity,
                }
            );
        }

        let inscription = Inscription::new(user_id, class_id);
        self.data.inscriptions.push(inscription.clone());
        if let Some(class) = self.data.class_mut(class_id) {
            class.enrolled_count = active + 1;
        }

        if let Err(e) = self.persist() {
            error!(error = %e, "Failed to persist new inscription");
            send_error!(respond_to, InscriptionError::from(e));
        }

        info!(
            inscription_id = %inscription.id,
            enrolled_count = active + 1,
            "Inscription created successfully"
        );
        let _ = respond_to.send(Ok(inscription));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_inscriptions(
        &self,
        respond_to: ServiceResponse<Vec<Inscription>, InscriptionError>,
    ) {
        debug!("Processing list_inscriptions request");

        let inscriptions = self.data.inscriptions.clone();
        info!(inscription_count = inscriptions.len(), "Listed inscriptions");

        let _ = respond_to.send(Ok(inscriptions));
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_list_inscriptions_by_user(
        &self,
        user_id: Uuid,
        respond_to: ServiceResponse<Vec<Inscription>, InscriptionError>,
    ) {
        debug!("Processing list_inscriptions_by_user request");

        let inscriptions: Vec<Inscription> = self
            .data
            .inscriptions
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        info!(inscription_count = inscriptions.len(), "Listed user inscriptions");

        let _ = respond_to.send(Ok(inscriptions));
    }

    #[instrument(fields(class_id = %class_id), skip(self, respond_to))]
    fn handle_list_inscriptions_by_class(
        &self,
        class_id: Uuid,
        respond_to: ServiceResponse<Vec<Inscription>, InscriptionError>,
    ) {
        debug!("Processing list_inscriptions_by_class request");

        let inscriptions: Vec<Inscription> = self
            .data
            .inscriptions
            .iter()
            .filter(|i| i.class_id == class_id)
            .cloned()
            .collect();
        info!(inscription_count = inscriptions.len(), "Listed class inscriptions");

        let _ = respond_to.send(Ok(inscriptions));
    }

    /// Cancels an inscription and recomputes the owning class's counter from
    /// scratch. Recomputing (rather than decrementing) self-heals any drift
    /// the counter may have accumulated. Cancelling an already-cancelled
    /// inscription is a safe no-op that still persists.
    #[instrument(fields(inscription_id = %id), skip(self, respond_to))]
    fn handle_cancel_inscription(
        &mut self,
        id: Uuid,
        respond_to: ServiceResponse<Inscription, InscriptionError>,
    ) {
        debug!("Processing cancel_inscription request");

        let (cancelled, class_id) = match self.data.inscription_mut(id) {
            Some(inscription) => {
                inscription.status = InscriptionStatus::Cancelled;
                (inscription.clone(), inscription.class_id)
            }
            None => {
                error!("Inscription not found");
                send_error!(respond_to, InscriptionError::NotFound(id));
            }
        };

        let active = self.data.active_count(class_id);
        if let Some(class) = self.data.class_mut(class_id) {
            class.enrolled_count = active;
        }

        if let Err(e) = self.persist() {
            error!(error = %e, "Failed to persist cancellation");
            send_error!(respond_to, InscriptionError::from(e));
        }

        info!(enrolled_count = active, "Inscription cancelled successfully");
        let _ = respond_to.send(Ok(cancelled));
    }
}
