/*
 * Responsibility
 * - Pets の request/response DTO (JSON は camelCase)
 * - owner_id は body から受け取らない (トークンの user id を使う)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Patch, Pet, PetSex, PetSpecies};
use crate::usecases::{CreatePetInput, ListPetsFilter, UpdatePetInput};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePetRequest {
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

impl CreatePetRequest {
    pub fn into_input(self, owner_id: i64) -> CreatePetInput {
        CreatePetInput {
            owner_id,
            name: self.name,
            species: self.species,
            breed: self.breed,
            sex: self.sex,
            age: self.age,
            weight: self.weight,
            height: self.height,
            notes: self.notes,
            photo_path: self.photo_path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePetRequest {
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

impl UpdatePetRequest {
    pub fn into_input(self, id: i64) -> UpdatePetInput {
        UpdatePetInput {
            id,
            name: self.name,
            species: self.species,
            breed: self.breed,
            sex: self.sex,
            age: self.age,
            weight: self.weight,
            height: self.height,
            notes: self.notes,
            photo_path: self.photo_path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPetsQuery {
    pub name: Option<String>,
    pub species: Option<String>,
}

impl From<ListPetsQuery> for ListPetsFilter {
    fn from(q: ListPetsQuery) -> Self {
        Self {
            name: q.name,
            species: q.species,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub species: PetSpecies,
    pub breed: Option<String>,
    pub sex: Option<PetSex>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Pet> for PetResponse {
    fn from(p: Pet) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            name: p.name,
            species: p.species,
            breed: p.breed,
            sex: p.sex,
            age: p.age,
            weight: p.weight,
            height: p.height,
            notes: p.notes,
            photo_path: p.photo_path,
            created_at: p.created_at,
        }
    }
}
