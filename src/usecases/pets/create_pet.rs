/*
 * Responsibility
 * - Pet の新規作成 (owner_id は呼び出し側のトークンから渡される)
 * - name / species / sex / breed / notes の検証 (エラーは全件収集)
 * - 文字列は trim、空の任意項目は NULL
 */
use std::sync::Arc;

use crate::domain::{NewPet, Pet, PetSex, PetSpecies};
use crate::repos::PetRepository;
use crate::usecases::{FieldErrors, UseCaseError, UseCaseResult, msg};
use crate::validation::{is_valid_name, trim_or_none};

use super::optional_text;

#[derive(Debug, Clone, Default)]
pub struct CreatePetInput {
    pub owner_id: i64,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
    pub photo_path: Option<String>,
}

pub struct CreatePet {
    repo: Arc<dyn PetRepository>,
}

impl CreatePet {
    pub fn new(repo: Arc<dyn PetRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CreatePetInput) -> UseCaseResult<Pet> {
        let mut errors = FieldErrors::new();

        let name = input.name.trim().to_string();
        if !is_valid_name(&name) {
            errors.add("name", msg::NAME);
        }

        let species = input.species.trim().parse::<PetSpecies>().ok();
        if species.is_none() {
            errors.add("species", msg::SPECIES);
        }

        let breed = optional_text(input.breed.as_deref(), "breed", msg::BREED, &mut errors);
        let notes = optional_text(input.notes.as_deref(), "notes", msg::NOTES, &mut errors);
        let sex = parse_sex(input.sex.as_deref(), &mut errors);

        let Some(species) = species else {
            return Err(UseCaseError::Validation(errors));
        };
        errors.into_result()?;

        let pet = self
            .repo
            .create(NewPet {
                owner_id: input.owner_id,
                name,
                species,
                breed,
                sex,
                age: input.age,
                weight: input.weight,
                height: input.height,
                notes,
                photo_path: input.photo_path.as_deref().and_then(trim_or_none),
            })
            .await?;

        tracing::info!(pet_id = pet.id, owner_id = pet.owner_id, "pet created");
        Ok(pet)
    }
}

/// Blank means "not informed"; anything else must be a known value.
pub(super) fn parse_sex(raw: Option<&str>, errors: &mut FieldErrors) -> Option<PetSex> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<PetSex>() {
        Ok(sex) => Some(sex),
        Err(_) => {
            errors.add("sex", msg::SEX);
            None
        }
    }
}
