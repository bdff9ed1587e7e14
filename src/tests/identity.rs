#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::{
        auth::models::{Identity, ProviderClaims, Role},
        client::image_host_client::ImageHost,
        common::{app_state::AppState, error::AppError},
        quiz::models::{QuestionBank, QuizState},
        system_log::{
            builder::SystemLogBuilder,
            db::list_system_logs,
            models::{LogAction, LogSeverity, SubjectType},
        },
        tests::support::{FakeImageHost, guest, memory_store, setup_logging},
    };

    fn claims(uid: &str, email: Option<&str>) -> ProviderClaims {
        ProviderClaims {
            uid: uid.to_string(),
            email: email.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn admin_by_email_ignores_case() {
        let identity = Identity::from_claims(&claims("u1", Some("Admin@Example.com")), "admin@example.com");

        assert!(identity.is_admin());
        assert_eq!(identity.role(), Role::Admin);
        assert_eq!(identity.voter_id(), "u1");
    }

    #[test]
    fn admin_by_claim() {
        let mut c = claims("u2", None);
        c.admin = true;

        assert!(Identity::from_claims(&c, "admin@example.com").is_admin());
    }

    #[test]
    fn anonymous_is_always_guest() {
        let mut c = claims("anon", Some("admin@example.com"));
        c.is_anonymous = true;
        c.admin = true;

        let identity = Identity::from_claims(&c, "admin@example.com");
        assert_eq!(identity.role(), Role::Guest);
        assert_eq!(identity.role().to_string(), "guest");
    }

    #[test]
    fn other_email_is_guest() {
        let identity = Identity::from_claims(&claims("u3", Some("aunt@example.com")), "admin@example.com");
        assert!(!identity.is_admin());
    }

    #[test]
    fn bank_rejects_bad_questions() {
        let empty = QuestionBank::from_json("[]");
        assert!(matches!(empty, Err(AppError::Validation(_))));

        let out_of_range = QuestionBank::from_json(
            r#"[{"text": "Q", "options": ["a", "b", "c", "d"], "correctOptionIndex": 4}]"#,
        );
        assert!(matches!(out_of_range, Err(AppError::Validation(_))));

        let three_options = QuestionBank::from_json(
            r#"[{"text": "Q", "options": ["a", "b", "c"], "correctOptionIndex": 0}]"#,
        );
        assert!(matches!(three_options, Err(AppError::Serialize(_))));
    }

    #[test]
    fn bank_loads_valid_json() {
        let bank = QuestionBank::from_json(
            r#"[{"text": "First dance song?", "options": ["a", "b", "c", "d"], "correctOptionIndex": 3}]"#,
        )
        .unwrap();

        assert_eq!(bank.len(), 1);
        assert_eq!(bank.question(0).unwrap().correct_option(), "d");
        assert!(!bank.contains(1));
    }

    #[test]
    fn builtin_bank_has_three_questions() {
        let bank = QuestionBank::builtin();
        let answers: Vec<usize> = bank.iter().map(|q| q.correct_option_index).collect();

        assert_eq!(answers, vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn system_log_truncates_long_descriptions() {
        setup_logging();
        let (_, store) = memory_store();

        SystemLogBuilder::new(store.clone())
            .subject(&guest("g1"))
            .action(LogAction::Create)
            .severity(LogSeverity::Warning)
            .function("post_message")
            .description(&"x".repeat(600))
            .metadata(json!({ "len": 600 }))
            .log()
            .await
            .unwrap();

        let logs = list_system_logs(store.as_ref(), None).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].subject_type, SubjectType::Guest);
        assert_eq!(logs[0].description.chars().count(), 512);
        assert!(logs[0].description.ends_with("..."));
    }

    #[tokio::test]
    async fn system_log_requires_subject() {
        let (_, store) = memory_store();

        let result = SystemLogBuilder::new(store.clone())
            .action(LogAction::Other)
            .log()
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));

        SystemLogBuilder::new(store.clone()).system().log().await.unwrap();
        let logs = list_system_logs(store.as_ref(), None).await.unwrap();
        assert_eq!(logs[0].subject_id, "system");
        assert_eq!(logs[0].function, "Not specified");
    }

    #[tokio::test]
    async fn app_state_shares_one_store() {
        let (_, store) = memory_store();
        let host: Arc<dyn ImageHost> = Arc::new(FakeImageHost::default());
        let state = AppState::new(store, host, QuestionBank::builtin(), "admin@example.com");

        let admin = state.identity(&claims("couple", Some("admin@example.com")));
        state.admin_quiz(admin).unwrap().select_question(1).await.unwrap();

        let mut session = state.guest_quiz(Some(guest("g1")));
        let mut sub = session.subscribe();
        session.sync(&mut sub).await.unwrap().unwrap();
        assert_eq!(session.state(), QuizState::showing(1));

        let denied = state.photo_moderation(guest("g2"));
        assert!(matches!(denied, Err(AppError::AccessDenied)));
    }
}
