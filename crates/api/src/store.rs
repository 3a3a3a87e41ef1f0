//! In-process annotation storage keyed by `(user_id, video_id)`.

use std::collections::HashMap;

use pairlabel_core::annotation::{Annotation, AnnotationPayload};
use pairlabel_core::error::CoreError;
use pairlabel_core::types::Timestamp;
use tokio::sync::RwLock;

type Key = (String, String);

#[derive(Debug, Default)]
pub struct AnnotationStore {
    records: RwLock<HashMap<Key, Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reviewer's annotations, newest first.
    pub async fn list_all(&self) -> Vec<Annotation> {
        let mut all: Vec<Annotation> = self.records.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub async fn get(&self, user_id: &str, video_id: &str) -> Option<Annotation> {
        self.records
            .read()
            .await
            .get(&(user_id.to_string(), video_id.to_string()))
            .cloned()
    }

    /// Whether any reviewer has annotated `video_id`.
    pub async fn has_any(&self, video_id: &str) -> bool {
        self.records
            .read()
            .await
            .keys()
            .any(|(_, video)| video == video_id)
    }

    /// Validate and insert or replace. The existing record (if any) is read
    /// and written under one lock so concurrent saves cannot interleave.
    pub async fn upsert(
        &self,
        user_id: &str,
        payload: AnnotationPayload,
        now: Timestamp,
    ) -> Result<(Annotation, bool), CoreError> {
        let key = (user_id.to_string(), payload.video_id.clone());
        let mut records = self.records.write().await;
        let existing = records.get(&key);
        let created = existing.is_none();
        let annotation = payload.validate_into(user_id, now, existing)?;
        records.insert(key, annotation.clone());
        Ok((annotation, created))
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, user_id: &str, video_id: &str) -> bool {
        self.records
            .write()
            .await
            .remove(&(user_id.to_string(), video_id.to_string()))
            .is_some()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn payload(video_id: &str) -> AnnotationPayload {
        serde_json::from_value(serde_json::json!({
            "videoId": video_id,
            "speaker1Label": "Morph A",
            "speaker2Label": "Morph B",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn upsert_is_keyed_per_reviewer() {
        let store = AnnotationStore::new();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let (_, created) = store.upsert("alice", payload("v1"), t).await.unwrap();
        assert!(created);
        let (_, created) = store.upsert("alice", payload("v1"), t).await.unwrap();
        assert!(!created);
        store.upsert("bob", payload("v1"), t).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.get("alice", "v1").await.is_some());
        assert!(store.get("carol", "v1").await.is_none());
        assert!(store.has_any("v1").await);
        assert!(!store.has_any("v2").await);
    }

    #[tokio::test]
    async fn rejected_payload_leaves_store_untouched() {
        let store = AnnotationStore::new();
        let mut p = payload("v1");
        p.speaker2_label = None;
        assert!(store.upsert("alice", p, Utc::now()).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_delete_removes() {
        let store = AnnotationStore::new();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.upsert("alice", payload("old"), t).await.unwrap();
        store
            .upsert("alice", payload("new"), t + Duration::hours(1))
            .await
            .unwrap();

        let ids: Vec<_> = store.list_all().await.into_iter().map(|a| a.video_id).collect();
        assert_eq!(ids, vec!["new", "old"]);

        assert!(store.delete("alice", "old").await);
        assert!(!store.delete("alice", "old").await);
        assert_eq!(store.len().await, 1);
    }
}
