use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{AnswerVector, LikeEdge, UserId};
use crate::services::store::{AnswerStore, LikeStore, StoreError};

/// In-process store for development and tests
///
/// Each map sits behind its own lock, so a pair update under one write guard
/// is atomic with respect to every reader.
#[derive(Default)]
pub struct MemoryStore {
    answers: RwLock<HashMap<UserId, AnswerVector>>,
    likes: RwLock<HashMap<(UserId, UserId), LikeEdge>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every like edge, sorted by (from, to)
    pub async fn edges(&self) -> Vec<LikeEdge> {
        let likes = self.likes.read().await;
        let mut edges: Vec<LikeEdge> = likes.values().cloned().collect();
        edges.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
        edges
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
    async fn get_answers(&self, user_id: &UserId) -> Result<AnswerVector, StoreError> {
        self.answers
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.clone()))
    }

    async fn get_all_answers_except(
        &self,
        user_id: &UserId,
    ) -> Result<HashMap<UserId, AnswerVector>, StoreError> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .filter(|(id, _)| *id != user_id)
            .map(|(id, vector)| (id.clone(), vector.clone()))
            .collect())
    }

    async fn insert_answers(
        &self,
        user_id: &UserId,
        answers: &AnswerVector,
    ) -> Result<bool, StoreError> {
        let mut stored = self.answers.write().await;
        if stored.contains_key(user_id) {
            return Ok(false);
        }
        stored.insert(user_id.clone(), answers.clone());
        Ok(true)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn get_edge(&self, from: &UserId, to: &UserId) -> Result<Option<LikeEdge>, StoreError> {
        let likes = self.likes.read().await;
        Ok(likes.get(&(from.clone(), to.clone())).cloned())
    }

    async fn put_edge(&self, edge: &LikeEdge) -> Result<(), StoreError> {
        let mut likes = self.likes.write().await;
        likes.insert((edge.from.clone(), edge.to.clone()), edge.clone());
        Ok(())
    }

    async fn insert_edge_if_absent(&self, edge: &LikeEdge) -> Result<bool, StoreError> {
        let mut likes = self.likes.write().await;
        let key = (edge.from.clone(), edge.to.clone());
        if likes.contains_key(&key) {
            return Ok(false);
        }
        likes.insert(key, edge.clone());
        Ok(true)
    }

    async fn put_edge_pair(&self, first: &LikeEdge, second: &LikeEdge) -> Result<(), StoreError> {
        let mut likes = self.likes.write().await;
        likes.insert((first.from.clone(), first.to.clone()), first.clone());
        likes.insert((second.from.clone(), second.to.clone()), second.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    #[tokio::test]
    async fn test_single_attempt_per_user() {
        let store = MemoryStore::new();
        let user = uid("u1");

        assert!(store.insert_answers(&user, &AnswerVector::new(vec![1, 2])).await.unwrap());
        assert!(!store.insert_answers(&user, &AnswerVector::new(vec![3, 3])).await.unwrap());
        assert_eq!(store.get_answers(&user).await.unwrap().as_slice(), &[1, 2]);
    }

    #[tokio::test]
    async fn test_missing_answers_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_answers(&uid("ghost")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_all_answers_except() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store.insert_answers(&uid(id), &AnswerVector::new(vec![0])).await.unwrap();
        }

        let others = store.get_all_answers_except(&uid("b")).await.unwrap();

        assert_eq!(others.len(), 2);
        assert!(!others.contains_key(&uid("b")));
    }

    #[tokio::test]
    async fn test_insert_edge_if_absent_keeps_existing() {
        let store = MemoryStore::new();
        let matched = LikeEdge::new(uid("a"), uid("b")).matched();
        store.put_edge(&matched).await.unwrap();

        let created = store
            .insert_edge_if_absent(&LikeEdge::new(uid("a"), uid("b")))
            .await
            .unwrap();

        assert!(!created);
        assert!(store.get_edge(&uid("a"), &uid("b")).await.unwrap().unwrap().is_match);
        assert_eq!(store.edges().await.len(), 1);
    }
}
