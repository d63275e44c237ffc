use std::path::Path;

use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use crate::actors::RegistryService;
use crate::clients::{ClassClient, InscriptionClient, UserClient};
use crate::error::StoreError;
use crate::messages::RegistryRequest;
use crate::store::JsonStore;

/// The main application system.
///
/// Responsible for hydrating the registry from its data file, starting the
/// actor, wiring up the per-domain clients, and handling shutdown. Because
/// all three clients feed the same mailbox, every mutation in the system is
/// serialized through a single point.
pub struct EnrollmentSystem {
    pub user_client: UserClient,
    pub class_client: ClassClient,
    pub inscription_client: InscriptionClient,
    sender: mpsc::Sender<RegistryRequest>,
    handle: tokio::task::JoinHandle<()>,
}

impl EnrollmentSystem {
    /// Create and start the system, loading state from `path`.
    ///
    /// Fails if the data file exists but cannot be read as a dataset.
    #[instrument(name = "enrollment_system", skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        info!("Starting enrollment system");

        let store = JsonStore::new(path.as_ref());
        let (service, sender) = RegistryService::new(100, store)?;
        let handle = tokio::spawn(service.run());

        info!("Enrollment system started successfully");

        Ok(Self {
            user_client: UserClient::new(sender.clone()),
            class_client: ClassClient::new(sender.clone()),
            inscription_client: InscriptionClient::new(sender.clone()),
            sender,
            handle,
        })
    }

    /// Gracefully shut down the registry actor and wait for it to stop.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down enrollment system");

        let _ = self.sender.send(RegistryRequest::Shutdown).await;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Registry task failed");
            return Err(format!("Registry task failed: {:?}", e));
        }

        info!("Enrollment system shutdown complete");
        Ok(())
    }
}
