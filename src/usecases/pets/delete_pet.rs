/*
 * Responsibility
 * - Pet の削除 (存在しなければ NotFound)
 * - 所有者の照合は呼び出し側で済ませておくこと
 */
use std::sync::Arc;

use crate::repos::PetRepository;
use crate::usecases::{UseCaseError, UseCaseResult};

pub struct DeletePet {
    repo: Arc<dyn PetRepository>,
}

impl DeletePet {
    pub fn new(repo: Arc<dyn PetRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: i64) -> UseCaseResult<()> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(UseCaseError::NotFound)?;

        // Nothing else references a pet yet, so there is nothing to cascade.
        if !self.repo.delete(existing.id).await? {
            return Err(UseCaseError::NotFound);
        }

        tracing::info!(pet_id = id, owner_id = existing.owner_id, "pet deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::memory::InMemoryPetRepository;
    use crate::usecases::pets::fixtures::{minutes_ago, pet};

    #[tokio::test]
    async fn missing_pet_is_not_found() {
        let repo = Arc::new(InMemoryPetRepository::new());
        let result = DeletePet::new(repo).execute(5).await;
        assert!(matches!(result, Err(UseCaseError::NotFound)));
    }

    #[tokio::test]
    async fn deletes_regardless_of_owner() {
        // Ownership is checked by the HTTP layer before this runs.
        let repo = Arc::new(InMemoryPetRepository::new());
        repo.insert_raw(pet(1, 7, "Rex", minutes_ago(1))).await;
        repo.insert_raw(pet(2, 8, "Mia", minutes_ago(1))).await;

        DeletePet::new(repo.clone()).execute(2).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }
}
