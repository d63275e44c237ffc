mod actors;
mod app_system;
mod clients;
mod domain;
mod error;
mod messages;
mod store;

#[cfg(test)]
mod integration_tests;

use chrono::NaiveDate;
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, EnrollmentSystem};
use crate::domain::{ClassCreate, UserCreate, UserRole};
use crate::error::UserError;

const DATA_FILE: &str = "data.json";

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting class enrollment service");

    let system = EnrollmentSystem::new(DATA_FILE).map_err(|e| e.to_string())?;

    // Register a demo user, reusing the existing record on reruns.
    let span = tracing::info_span!("user_registration");
    let user = async {
        info!("Registering demo user");
        let params = UserCreate {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::Client,
            password: "secret".to_string(),
        };
        match system.user_client.create_user(params).await {
            Ok(user) => Ok(user),
            Err(UserError::EmailTaken(_)) => {
                info!("Demo user already registered, reusing");
                system
                    .user_client
                    .list_users()
                    .await
                    .map_err(|e| e.to_string())?
                    .into_iter()
                    .find(|u| u.email == "alice@example.com")
                    .ok_or_else(|| "demo user missing after conflict".to_string())
            }
            Err(e) => Err(e.to_string()),
        }
    }
    .instrument(span)
    .await?;

    info!(user_id = %user.id, "User registered successfully");

    let class = system
        .class_client
        .create_class(ClassCreate {
            name: "Morning Yoga".to_string(),
            description: "Beginner-friendly yoga session".to_string(),
            max_capacity: 10,
            schedule_date: NaiveDate::from_ymd_opt(2026, 9, 1)
                .ok_or_else(|| "invalid schedule date".to_string())?,
            schedule_time: "09:00".to_string(),
            duration_minutes: 60,
        })
        .await
        .map_err(|e| e.to_string())?;

    info!(class_id = %class.id, "Class created successfully");

    // Enroll the user - this exercises the full guard-then-commit path.
    let span = tracing::info_span!("enrollment");
    let enrollment = async {
        info!("Enrolling user in class");
        system
            .inscription_client
            .create_inscription(user.id, class.id)
            .await
    }
    .instrument(span)
    .await;

    match enrollment {
        Ok(inscription) => {
            info!(inscription_id = %inscription.id, "Enrollment succeeded");

            let mine = system
                .inscription_client
                .list_by_user(user.id)
                .await
                .map_err(|e| e.to_string())?;
            info!(count = mine.len(), "User's enrollments listed");

            let cancelled = system
                .inscription_client
                .cancel_inscription(inscription.id)
                .await
                .map_err(|e| e.to_string())?;
            info!(inscription_id = %cancelled.id, "Enrollment cancelled");
        }
        Err(e) => {
            error!(error = %e, "Enrollment failed")
        }
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
