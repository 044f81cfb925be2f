/*
 * Responsibility
 * - Pet の部分更新
 *   - 存在しなければ即 NotFound
 *   - 入力にあるフィールドだけ検証して PetChanges に積む (Unset は現状維持)
 *   - breed / notes / sex は空文字なら NULL
 */
use std::sync::Arc;

use crate::domain::{Patch, Pet, PetChanges, PetSpecies};
use crate::repos::PetRepository;
use crate::usecases::{FieldErrors, UseCaseError, UseCaseResult, msg};
use crate::validation::{is_valid_name, trim_or_none};

use super::create_pet::parse_sex;
use super::optional_text;

#[derive(Debug, Clone, Default)]
pub struct UpdatePetInput {
    pub id: i64,
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Patch<String>,
    pub sex: Patch<String>,
    pub age: Patch<i32>,
    pub weight: Patch<f64>,
    pub height: Patch<f64>,
    pub notes: Patch<String>,
    pub photo_path: Patch<String>,
}

pub struct UpdatePet {
    repo: Arc<dyn PetRepository>,
}

impl UpdatePet {
    pub fn new(repo: Arc<dyn PetRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: UpdatePetInput) -> UseCaseResult<Pet> {
        let existing = self
            .repo
            .find_by_id(input.id)
            .await?
            .ok_or(UseCaseError::NotFound)?;

        let mut errors = FieldErrors::new();
        let mut next = PetChanges::default();

        if let Some(name) = &input.name {
            let name = name.trim();
            if is_valid_name(name) {
                next.name = Some(name.to_string());
            } else {
                errors.add("name", msg::NAME);
            }
        }

        if let Some(species) = &input.species {
            match species.trim().parse::<PetSpecies>() {
                Ok(species) => next.species = Some(species),
                Err(_) => errors.add("species", msg::SPECIES),
            }
        }

        next.breed = text_patch(&input.breed, "breed", msg::BREED, &mut errors);
        next.notes = text_patch(&input.notes, "notes", msg::NOTES, &mut errors);

        next.sex = match &input.sex {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(raw) => parse_sex(Some(raw.as_str()), &mut errors).into(),
        };

        next.age = input.age;
        next.weight = input.weight;
        next.height = input.height;
        next.photo_path = match input.photo_path {
            Patch::Value(path) => trim_or_none(&path).into(),
            other => other,
        };

        errors.into_result()?;

        let updated = self
            .repo
            .update(existing.id, next)
            .await?
            .ok_or(UseCaseError::NotFound)?;

        tracing::info!(pet_id = updated.id, "pet updated");
        Ok(updated)
    }
}

fn text_patch(
    patch: &Patch<String>,
    field: &'static str,
    message: &'static str,
    errors: &mut FieldErrors,
) -> Patch<String> {
    match patch {
        Patch::Unset => Patch::Unset,
        Patch::Null => Patch::Null,
        Patch::Value(raw) => optional_text(Some(raw.as_str()), field, message, errors).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PetSex;
    use crate::repos::memory::InMemoryPetRepository;
    use crate::usecases::pets::fixtures::{minutes_ago, pet};

    async fn setup() -> (Arc<InMemoryPetRepository>, UpdatePet) {
        let repo = Arc::new(InMemoryPetRepository::new());
        repo.insert_raw(pet(1, 7, "Rex", minutes_ago(10))).await;
        (repo.clone(), UpdatePet::new(repo))
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (_, usecase) = setup().await;

        let result = usecase
            .execute(UpdatePetInput {
                id: 99,
                name: Some("Al".into()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::NotFound)));
    }

    #[tokio::test]
    async fn untouched_fields_keep_their_values() {
        let (_, usecase) = setup().await;

        let pet = usecase
            .execute(UpdatePetInput {
                id: 1,
                name: Some(" Thor ".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(pet.name, "Thor");
        assert_eq!(pet.breed.as_deref(), Some("Vira-lata"));
        assert_eq!(pet.age, Some(3));
        assert_eq!(pet.weight, Some(12.5));
        assert_eq!(pet.species, PetSpecies::Cachorro);
    }

    #[tokio::test]
    async fn null_and_blank_clear_optional_fields() {
        let (_, usecase) = setup().await;

        let pet = usecase
            .execute(UpdatePetInput {
                id: 1,
                breed: Patch::Value("   ".into()),
                age: Patch::Null,
                weight: Patch::Value(14.0),
                sex: Patch::Value("Fêmea".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(pet.breed, None);
        assert_eq!(pet.age, None);
        assert_eq!(pet.weight, Some(14.0));
        assert_eq!(pet.sex, Some(PetSex::Femea));
    }

    #[tokio::test]
    async fn invalid_fields_leave_the_record_untouched() {
        let (repo, usecase) = setup().await;

        let result = usecase
            .execute(UpdatePetInput {
                id: 1,
                name: Some("Thor".into()),
                species: Some("Dragão".into()),
                notes: Patch::Value("ok".into()),
                ..Default::default()
            })
            .await;

        let Err(UseCaseError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert!(errors.contains("species"));
        assert!(errors.contains("notes"));
        assert!(!errors.contains("name"));

        let stored = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "Rex");
    }
}
