#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use futures::{StreamExt, executor::block_on};
    use serde_json::{Value, json};

    use crate::{
        store::{
            document_store::DocumentStore,
            memory::InMemoryStore,
            models::{DocPath, Fields, Query, StoreError, compare_values},
        },
        tests::support::memory_store,
    };

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected an object"),
        }
    }

    #[tokio::test]
    async fn create_refuses_existing_document() {
        let (_, store) = memory_store();
        let path = DocPath::new("quiz_responses", "q0_guest");

        store.create(&path, fields(json!({ "answer": 1 }))).await.unwrap();
        let second = store.create(&path, fields(json!({ "answer": 2 }))).await;

        assert!(matches!(second, Err(StoreError::AlreadyExists(_))));
        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.fields["answer"], json!(1));
    }

    #[tokio::test]
    async fn update_merges_and_requires_document() {
        let (_, store) = memory_store();
        let path = DocPath::new("uploaded_photos", "p1");

        let missing = store.update(&path, fields(json!({ "vetted": true }))).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));

        store
            .set(&path, fields(json!({ "url": "data:x", "vetted": false })))
            .await
            .unwrap();
        store
            .update(&path, fields(json!({ "vetted": true })))
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.fields["url"], json!("data:x"));
        assert_eq!(doc.fields["vetted"], json!(true));
    }

    #[tokio::test]
    async fn query_orders_timestamps_chronologically() {
        let (_, store) = memory_store();
        let rows = [
            ("a", "2024-06-01T18:00:00.5Z"),
            ("b", "2024-06-01T18:00:00Z"),
            ("c", "2024-06-01T18:00:01Z"),
        ];
        for (id, at) in rows {
            store
                .set(&DocPath::new("messages", id), fields(json!({ "createdAt": at })))
                .await
                .unwrap();
        }

        let query = Query::new().order_desc("createdAt");
        let ids: Vec<String> = store
            .list("messages", &query)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn query_filters_then_limits() {
        let (_, store) = memory_store();
        for (id, question, score) in [("a", 0, 1), ("b", 1, 5), ("c", 0, 3), ("d", 0, 2)] {
            store
                .set(
                    &DocPath::new("quiz_responses", id),
                    fields(json!({ "questionIndex": question, "score": score })),
                )
                .await
                .unwrap();
        }

        let query = Query::new().where_eq("questionIndex", 0).order_desc("score").limit(2);
        let ids: Vec<String> = store
            .list("quiz_responses", &query)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();

        assert_eq!(ids, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn document_listener_sees_every_write() {
        let (inner, store) = memory_store();
        let path = DocPath::new("quiz", "state");
        let mut sub = store.subscribe(&path);

        assert_eq!(sub.next().await.unwrap().unwrap(), None);

        store.set(&path, fields(json!({ "revealAnswer": false }))).await.unwrap();
        store
            .set(&DocPath::new("quiz", "other"), fields(json!({})))
            .await
            .unwrap();
        store.delete(&path).await.unwrap();

        let written = sub.next().await.unwrap().unwrap().unwrap();
        assert_eq!(written.id, "state");
        assert_eq!(sub.next().await.unwrap().unwrap(), None);
        assert!(sub.try_next().is_none());

        assert_eq!(inner.listener_count(), 1);
        sub.unsubscribe();
        assert_eq!(inner.listener_count(), 0);
    }

    #[tokio::test]
    async fn query_listener_works_as_stream() {
        let (inner, store) = memory_store();
        let mut sub = store.subscribe_query("messages", &Query::new());

        store
            .add("messages", fields(json!({ "message": "hi" })))
            .await
            .unwrap();

        let first = sub.next().await.unwrap().unwrap();
        assert!(first.is_empty());
        let second = StreamExt::next(&mut sub).await.unwrap().unwrap();
        assert_eq!(second.len(), 1);

        drop(sub);
        assert_eq!(inner.listener_count(), 0);
    }

    #[test]
    fn subscriber_racing_a_writer_ends_on_latest_state() {
        let store = Arc::new(InMemoryStore::new());
        let path = DocPath::new("quiz", "state");

        for round in 0..2000 {
            let writer = {
                let store = store.clone();
                let path = path.clone();
                thread::spawn(move || {
                    block_on(store.set(&path, fields(json!({ "round": round })))).unwrap();
                })
            };

            let mut doc_sub = store.subscribe(&path);
            let mut query_sub = store.subscribe_query("quiz", &Query::new());
            writer.join().unwrap();

            let mut latest = None;
            while let Some(push) = doc_sub.try_next() {
                latest = push.unwrap();
            }
            assert_eq!(latest.unwrap().fields["round"], json!(round), "round {}", round);

            let mut rows = Vec::new();
            while let Some(push) = query_sub.try_next() {
                rows = push.unwrap();
            }
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].fields["round"], json!(round), "round {}", round);
        }

        assert_eq!(store.listener_count(), 0);
    }

    #[tokio::test]
    async fn delete_many_reports_every_id() {
        let (inner, store) = memory_store();
        let mut ids = Vec::new();
        for n in 0..3 {
            ids.push(store.add("quiz_responses", fields(json!({ "n": n }))).await.unwrap());
        }

        let outcome = store.delete_many("quiz_responses", &ids).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.deleted, 3);
        assert_eq!(inner.document_count("quiz_responses"), 0);
    }

    #[test]
    fn doc_path_parses_collection_and_id() {
        let path = DocPath::parse("quiz/state").unwrap();
        assert_eq!(path, DocPath::new("quiz", "state"));
        assert_eq!(path.to_string(), "quiz/state");

        for bad in ["quiz", "/state", "quiz/", "a/b/c"] {
            assert!(matches!(DocPath::parse(bad), Err(StoreError::InvalidPath(_))));
        }
    }

    #[test]
    fn missing_values_sort_first() {
        use std::cmp::Ordering;

        let ts = json!("2024-06-01T18:00:00Z");
        assert_eq!(compare_values(None, Some(&ts)), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(true)), Some(&json!(1))), Ordering::Less);
    }
}
