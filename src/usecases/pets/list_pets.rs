/*
 * Responsibility
 * - owner 単位の Pet 一覧 (新しい順)
 * - name は trim して部分一致 (大文字小文字無視)、species は完全一致
 */
use std::sync::Arc;

use crate::domain::{Pet, PetFilter, PetSpecies};
use crate::repos::PetRepository;
use crate::usecases::UseCaseResult;
use crate::validation::trim_or_none;

/// Raw query-string filter.
#[derive(Debug, Clone, Default)]
pub struct ListPetsFilter {
    pub name: Option<String>,
    pub species: Option<String>,
}

pub struct ListPets {
    repo: Arc<dyn PetRepository>,
}

impl ListPets {
    pub fn new(repo: Arc<dyn PetRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, owner_id: i64, filter: ListPetsFilter) -> UseCaseResult<Vec<Pet>> {
        let species = match filter.species.as_deref().and_then(trim_or_none) {
            None => None,
            Some(raw) => match raw.parse::<PetSpecies>() {
                Ok(species) => Some(species),
                // no pet can match a species that does not exist
                Err(_) => return Ok(Vec::new()),
            },
        };

        let filter = PetFilter {
            name: filter.name.as_deref().and_then(trim_or_none),
            species,
        };
        let pets = self.repo.find_all_by_owner(owner_id, &filter).await?;

        tracing::debug!(owner_id, count = pets.len(), "pets listed");
        Ok(pets)
    }
}
