#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use tokio::time::timeout;

    use crate::{
        common::error::AppError,
        message::{
            db,
            handlers::{MessageModeration, MessageWall, validate_message},
            models::{ANONYMOUS, GuestMessage, MAX_MESSAGE_LEN, MAX_NAME_LEN},
        },
        system_log::{db::list_system_logs, models::LogAction},
        tests::support::{admin, guest, memory_store, settle, setup_logging},
    };

    #[test]
    fn validation_trims_and_defaults_name() {
        let (name, message) = validate_message("   ", "  Congratulations!  ").unwrap();
        assert_eq!(name, ANONYMOUS);
        assert_eq!(message, "Congratulations!");

        let (name, _) = validate_message(" Aunt May ", "Cheers").unwrap();
        assert_eq!(name, "Aunt May");
    }

    #[test]
    fn validation_rejects_empty_and_long_input() {
        match validate_message("Bob", "   ") {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Message cannot be empty."),
            other => panic!("Expected validation error, got {:?}", other),
        }

        let long_message = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert!(matches!(
            validate_message("Bob", &long_message),
            Err(AppError::Validation(_))
        ));

        let long_name = "n".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            validate_message(&long_name, "hi"),
            Err(AppError::Validation(_))
        ));

        let exact = "é".repeat(MAX_MESSAGE_LEN);
        assert!(validate_message("Bob", &exact).is_ok());
    }

    #[tokio::test]
    async fn wall_is_open_without_settings() {
        setup_logging();
        let (_, store) = memory_store();
        let wall = MessageWall::new(store);

        assert!(wall.is_open().await.unwrap());
        let posted = wall.post_message("", "Best wishes").await.unwrap();

        assert!(!posted.id.is_empty());
        assert_eq!(posted.name, ANONYMOUS);
        let messages = wall.messages().await.unwrap();
        assert_eq!(messages, vec![posted]);
    }

    #[tokio::test]
    async fn closed_wall_rejects_posts() {
        let (inner, store) = memory_store();
        let wall = MessageWall::new(store.clone());
        let moderation = MessageModeration::new(store.clone(), admin()).unwrap();

        moderation.set_messaging_enabled(false).await.unwrap();
        assert!(!wall.is_open().await.unwrap());

        let result = wall.post_message("Bob", "Hello").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(inner.document_count(crate::message::models::MESSAGES_COLLECTION), 0);

        moderation.set_messaging_enabled(true).await.unwrap();
        assert!(wall.post_message("Bob", "Hello").await.is_ok());
    }

    #[tokio::test]
    async fn messages_are_newest_first() {
        let (_, store) = memory_store();
        let wall = MessageWall::new(store.clone());
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();

        for (offset, text) in [(2, "second"), (9, "third"), (0, "first")] {
            let message = GuestMessage {
                id: String::new(),
                name: "Guest".to_string(),
                message: text.to_string(),
                created_at: base + chrono::Duration::seconds(offset),
            };
            db::create_message(store.as_ref(), &message).await.unwrap();
        }

        let texts: Vec<String> = wall
            .messages()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.message)
            .collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn subscription_sees_new_and_deleted_messages() {
        setup_logging();
        let (_, store) = memory_store();
        let wall = MessageWall::new(store.clone());
        let moderation = MessageModeration::new(store.clone(), admin()).unwrap();
        let mut live = wall.subscribe();

        let initial = live.next().await.unwrap().unwrap();
        assert!(initial.is_empty());

        let posted = wall.post_message("Sam", "Cheers to you both").await.unwrap();
        let rows = timeout(Duration::from_secs(1), live.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let messages = db::decode_messages(&rows);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, posted.id);

        moderation.delete_message(&posted.id).await.unwrap();
        let rows = timeout(Duration::from_secs(1), live.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(rows.is_empty());

        settle().await;
        let logs = list_system_logs(store.as_ref(), Some(10)).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, LogAction::Delete);
        assert_eq!(logs[0].function, "delete_message");
    }

    #[tokio::test]
    async fn guests_cannot_moderate_messages() {
        let (_, store) = memory_store();
        let result = MessageModeration::new(store, guest("g1"));

        assert!(matches!(result, Err(AppError::AccessDenied)));
    }
}
