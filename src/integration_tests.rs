#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::app_system::EnrollmentSystem;
    use crate::domain::{
        ClassCreate, ClassStatus, ClassUpdate, InscriptionStatus, UserCreate, UserRole,
        UserUpdate,
    };
    use crate::error::{ClassError, InscriptionError, UserError};

    fn start_system(dir: &tempfile::TempDir) -> EnrollmentSystem {
        EnrollmentSystem::new(dir.path().join("data.json")).expect("start system")
    }

    fn sample_user(name: &str, email: &str) -> UserCreate {
        UserCreate {
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::Client,
            password: "secret".to_string(),
        }
    }

    fn sample_class(name: &str, max_capacity: u32) -> ClassCreate {
        ClassCreate {
            name: name.to_string(),
            description: "A test class".to_string(),
            max_capacity,
            schedule_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            schedule_time: "09:00".to_string(),
            duration_minutes: 60,
        }
    }

    #[tokio::test]
    async fn full_enrollment_scenario_at_capacity_one() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let class = system
            .class_client
            .create_class(sample_class("Spin", 1))
            .await
            .unwrap();
        let alice = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();
        let bob = system
            .user_client
            .create_user(sample_user("Bob", "bob@example.com"))
            .await
            .unwrap();

        let first = system
            .inscription_client
            .create_inscription(alice.id, class.id)
            .await
            .unwrap();
        assert_eq!(
            system.class_client.get_class(class.id).await.unwrap().enrolled_count,
            1
        );

        let err = system
            .inscription_client
            .create_inscription(bob.id, class.id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InscriptionError::CapacityExceeded {
                class_id: class.id,
                max_capacity: 1,
            }
        );

        system
            .inscription_client
            .cancel_inscription(first.id)
            .await
            .unwrap();
        assert_eq!(
            system.class_client.get_class(class.id).await.unwrap().enrolled_count,
            0
        );

        system
            .inscription_client
            .create_inscription(bob.id, class.id)
            .await
            .unwrap();
        assert_eq!(
            system.class_client.get_class(class.id).await.unwrap().enrolled_count,
            1
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_active_enrollment_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let class = system
            .class_client
            .create_class(sample_class("Yoga", 10))
            .await
            .unwrap();
        let user = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();

        let first = system
            .inscription_client
            .create_inscription(user.id, class.id)
            .await
            .unwrap();

        let err = system
            .inscription_client
            .create_inscription(user.id, class.id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InscriptionError::AlreadyEnrolled {
                user_id: user.id,
                class_id: class.id,
            }
        );

        // Cancelling frees the pair for re-enrollment, which creates a new
        // record; the cancelled one is kept.
        system
            .inscription_client
            .cancel_inscription(first.id)
            .await
            .unwrap();
        let second = system
            .inscription_client
            .create_inscription(user.id, class.id)
            .await
            .unwrap();
        assert_ne!(second.id, first.id);

        let all = system
            .inscription_client
            .list_by_user(user.id)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(
            all.iter().filter(|i| i.status == InscriptionStatus::Active).count(),
            1
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn enrolled_count_matches_active_inscriptions_after_each_operation() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let class = system
            .class_client
            .create_class(sample_class("Pilates", 5))
            .await
            .unwrap();

        let mut inscriptions = Vec::new();
        for i in 0..3u32 {
            let user = system
                .user_client
                .create_user(sample_user("User", &format!("user{}@example.com", i)))
                .await
                .unwrap();
            let inscription = system
                .inscription_client
                .create_inscription(user.id, class.id)
                .await
                .unwrap();
            inscriptions.push(inscription);

            let current = system.class_client.get_class(class.id).await.unwrap();
            assert_eq!(current.enrolled_count, i + 1);
        }

        for (cancelled, inscription) in inscriptions.iter().enumerate() {
            system
                .inscription_client
                .cancel_inscription(inscription.id)
                .await
                .unwrap();

            let current = system.class_client.get_class(class.id).await.unwrap();
            assert_eq!(current.enrolled_count, 2 - cancelled as u32);
        }

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn enrollment_requires_an_active_class() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let user = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();

        for status in [ClassStatus::Cancelled, ClassStatus::Completed] {
            let class = system
                .class_client
                .create_class(sample_class("Closed", 10))
                .await
                .unwrap();
            system
                .class_client
                .set_class_status(class.id, status)
                .await
                .unwrap();

            let err = system
                .inscription_client
                .create_inscription(user.id, class.id)
                .await
                .unwrap_err();
            assert_eq!(err, InscriptionError::ClassNotActive(class.id));
        }

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn enrollment_fills_the_last_seat_but_not_beyond() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let class = system
            .class_client
            .create_class(sample_class("Boxing", 2))
            .await
            .unwrap();

        let mut users = Vec::new();
        for i in 0..3 {
            users.push(
                system
                    .user_client
                    .create_user(sample_user("User", &format!("user{}@example.com", i)))
                    .await
                    .unwrap(),
            );
        }

        system
            .inscription_client
            .create_inscription(users[0].id, class.id)
            .await
            .unwrap();

        // One seat left: this enrollment brings the class to max_capacity.
        system
            .inscription_client
            .create_inscription(users[1].id, class.id)
            .await
            .unwrap();
        assert_eq!(
            system.class_client.get_class(class.id).await.unwrap().enrolled_count,
            2
        );

        let err = system
            .inscription_client
            .create_inscription(users[2].id, class.id)
            .await
            .unwrap_err();
        assert!(matches!(err, InscriptionError::CapacityExceeded { .. }));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn enrollment_resolves_user_and_class_references() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let class = system
            .class_client
            .create_class(sample_class("Yoga", 10))
            .await
            .unwrap();
        let user = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();

        let ghost = Uuid::new_v4();
        assert_eq!(
            system
                .inscription_client
                .create_inscription(ghost, class.id)
                .await
                .unwrap_err(),
            InscriptionError::UserNotFound(ghost)
        );
        assert_eq!(
            system
                .inscription_client
                .create_inscription(user.id, ghost)
                .await
                .unwrap_err(),
            InscriptionError::ClassNotFound(ghost)
        );
        assert_eq!(
            system
                .inscription_client
                .cancel_inscription(ghost)
                .await
                .unwrap_err(),
            InscriptionError::NotFound(ghost)
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn email_uniqueness_is_enforced_on_create_and_update() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let alice = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();
        system
            .user_client
            .create_user(sample_user("Bob", "bob@example.com"))
            .await
            .unwrap();

        let err = system
            .user_client
            .create_user(sample_user("Impostor", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, UserError::EmailTaken("alice@example.com".to_string()));

        // Taking another user's email on update is rejected.
        let err = system
            .user_client
            .update_user(
                alice.id,
                UserUpdate {
                    name: "Alice".to_string(),
                    email: "bob@example.com".to_string(),
                    role: UserRole::Client,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, UserError::EmailTaken("bob@example.com".to_string()));

        // Keeping one's own email is not a conflict.
        let updated = system
            .user_client
            .update_user(
                alice.id,
                UserUpdate {
                    name: "Alice Smith".to_string(),
                    email: "alice@example.com".to_string(),
                    role: UserRole::Admin,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice Smith");
        assert_eq!(updated.role, UserRole::Admin);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_their_inscriptions() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let class_a = system
            .class_client
            .create_class(sample_class("A", 10))
            .await
            .unwrap();
        let class_b = system
            .class_client
            .create_class(sample_class("B", 10))
            .await
            .unwrap();
        let alice = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();
        let bob = system
            .user_client
            .create_user(sample_user("Bob", "bob@example.com"))
            .await
            .unwrap();

        system
            .inscription_client
            .create_inscription(alice.id, class_a.id)
            .await
            .unwrap();
        system
            .inscription_client
            .create_inscription(bob.id, class_b.id)
            .await
            .unwrap();

        assert!(system.user_client.delete_user(alice.id).await.unwrap());
        assert!(!system.user_client.delete_user(alice.id).await.unwrap());

        assert!(system
            .inscription_client
            .list_by_user(alice.id)
            .await
            .unwrap()
            .is_empty());

        // Bob's enrollment in the unrelated class is untouched.
        let bobs = system
            .inscription_client
            .list_by_user(bob.id)
            .await
            .unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(
            system.class_client.get_class(class_b.id).await.unwrap().enrolled_count,
            1
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn deleting_a_class_cascades_to_its_inscriptions() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let doomed = system
            .class_client
            .create_class(sample_class("Doomed", 10))
            .await
            .unwrap();
        let survivor = system
            .class_client
            .create_class(sample_class("Survivor", 10))
            .await
            .unwrap();
        let alice = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();

        system
            .inscription_client
            .create_inscription(alice.id, doomed.id)
            .await
            .unwrap();
        system
            .inscription_client
            .create_inscription(alice.id, survivor.id)
            .await
            .unwrap();

        assert!(system.class_client.delete_class(doomed.id).await.unwrap());

        assert_eq!(
            system.class_client.get_class(doomed.id).await.unwrap_err(),
            ClassError::NotFound(doomed.id)
        );
        assert!(system
            .inscription_client
            .list_by_class(doomed.id)
            .await
            .unwrap()
            .is_empty());

        let remaining = system
            .inscription_client
            .list_by_user(alice.id)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].class_id, survivor.id);
        assert_eq!(
            system
                .class_client
                .get_class(survivor.id)
                .await
                .unwrap()
                .enrolled_count,
            1
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn cancelling_twice_is_safe() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let class = system
            .class_client
            .create_class(sample_class("Yoga", 10))
            .await
            .unwrap();
        let user = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap();
        let inscription = system
            .inscription_client
            .create_inscription(user.id, class.id)
            .await
            .unwrap();

        let first = system
            .inscription_client
            .cancel_inscription(inscription.id)
            .await
            .unwrap();
        let second = system
            .inscription_client
            .cancel_inscription(inscription.id)
            .await
            .unwrap();

        assert_eq!(first.status, InscriptionStatus::Cancelled);
        assert_eq!(second.status, InscriptionStatus::Cancelled);
        assert_eq!(
            system.class_client.get_class(class.id).await.unwrap().enrolled_count,
            0
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn committed_state_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();

        let (user_id, class_id, inscription_id) = {
            let system = start_system(&dir);

            let class = system
                .class_client
                .create_class(sample_class("Yoga", 10))
                .await
                .unwrap();
            let user = system
                .user_client
                .create_user(sample_user("Alice", "alice@example.com"))
                .await
                .unwrap();
            let inscription = system
                .inscription_client
                .create_inscription(user.id, class.id)
                .await
                .unwrap();

            system.shutdown().await.unwrap();
            (user.id, class.id, inscription.id)
        };

        let system = start_system(&dir);

        let user = system.user_client.get_user(user_id).await.unwrap();
        assert_eq!(user.email, "alice@example.com");

        let class = system.class_client.get_class(class_id).await.unwrap();
        assert_eq!(class.enrolled_count, 1);
        assert_eq!(class.status, ClassStatus::Active);

        let inscriptions = system
            .inscription_client
            .list_inscriptions()
            .await
            .unwrap();
        assert_eq!(inscriptions.len(), 1);
        assert_eq!(inscriptions[0].id, inscription_id);
        assert_eq!(inscriptions[0].status, InscriptionStatus::Active);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn update_is_visible_after_restart() {
        let dir = tempfile::tempdir().unwrap();

        let class_id = {
            let system = start_system(&dir);
            let class = system
                .class_client
                .create_class(sample_class("Yoga", 10))
                .await
                .unwrap();
            system
                .class_client
                .update_class(
                    class.id,
                    ClassUpdate {
                        name: "Evening Yoga".to_string(),
                        description: "Moved to the evening".to_string(),
                        max_capacity: 8,
                        schedule_date: NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
                        schedule_time: "18:00".to_string(),
                        duration_minutes: 45,
                    },
                )
                .await
                .unwrap();
            system.shutdown().await.unwrap();
            class.id
        };

        let system = start_system(&dir);
        let class = system.class_client.get_class(class_id).await.unwrap();
        assert_eq!(class.name, "Evening Yoga");
        assert_eq!(class.max_capacity, 8);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn persistence_failure_is_surfaced_to_the_caller() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist: loading yields an empty dataset,
        // but every save fails.
        let system =
            EnrollmentSystem::new(dir.path().join("missing").join("data.json")).expect("start");

        let err = system
            .user_client
            .create_user(sample_user("Alice", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Persistence(_)));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_ids_are_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let system = start_system(&dir);

        let ghost = Uuid::new_v4();
        assert_eq!(
            system.user_client.get_user(ghost).await.unwrap_err(),
            UserError::NotFound(ghost)
        );
        assert_eq!(
            system
                .user_client
                .update_user(
                    ghost,
                    UserUpdate {
                        name: "Ghost".to_string(),
                        email: "ghost@example.com".to_string(),
                        role: UserRole::Client,
                    },
                )
                .await
                .unwrap_err(),
            UserError::NotFound(ghost)
        );
        assert_eq!(
            system.class_client.get_class(ghost).await.unwrap_err(),
            ClassError::NotFound(ghost)
        );
        assert!(!system.class_client.delete_class(ghost).await.unwrap());

        system.shutdown().await.unwrap();
    }
}
