/*
 * Responsibility
 * - Pet エンティティと列挙型 (PetSpecies / PetSex)
 * - NewPet (作成) / PetChanges (部分更新) / PetFilter (一覧)
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;
use super::user::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetSpecies {
    Cachorro,
    Cavalo,
    Gato,
    Outros,
}

impl PetSpecies {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSpecies::Cachorro => "Cachorro",
            PetSpecies::Cavalo => "Cavalo",
            PetSpecies::Gato => "Gato",
            PetSpecies::Outros => "Outros",
        }
    }
}

impl fmt::Display for PetSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetSpecies {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cachorro" => Ok(PetSpecies::Cachorro),
            "Cavalo" => Ok(PetSpecies::Cavalo),
            "Gato" => Ok(PetSpecies::Gato),
            "Outros" => Ok(PetSpecies::Outros),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetSex {
    Macho,
    #[serde(rename = "Fêmea")]
    Femea,
    Irrelevante,
}

impl PetSex {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSex::Macho => "Macho",
            PetSex::Femea => "Fêmea",
            PetSex::Irrelevante => "Irrelevante",
        }
    }
}

impl fmt::Display for PetSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetSex {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Macho" => Ok(PetSex::Macho),
            "Fêmea" => Ok(PetSex::Femea),
            "Irrelevante" => Ok(PetSex::Irrelevante),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub species: PetSpecies,
    pub breed: Option<String>,
    pub sex: Option<PetSex>,
    pub age: Option<i32>,
    /// kg
    pub weight: Option<f64>,
    /// cm
    pub height: Option<f64>,
    pub notes: Option<String>,
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Pet {
    #[cfg(test)]
    pub fn merged(&self, changes: &PetChanges) -> Pet {
        let mut next = self.clone();
        if let Some(v) = &changes.name {
            next.name = v.clone();
        }
        if let Some(v) = changes.species {
            next.species = v;
        }
        next.breed = changes.breed.clone().apply(next.breed);
        next.sex = changes.sex.clone().apply(next.sex);
        next.age = changes.age.clone().apply(next.age);
        next.weight = changes.weight.clone().apply(next.weight);
        next.height = changes.height.clone().apply(next.height);
        next.notes = changes.notes.clone().apply(next.notes);
        next.photo_path = changes.photo_path.clone().apply(next.photo_path);
        next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
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
}

/// Staged field changes for one pet. Owner and creation time never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub species: Option<PetSpecies>,
    pub breed: Patch<String>,
    pub sex: Patch<PetSex>,
    pub age: Patch<i32>,
    pub weight: Patch<f64>,
    pub height: Patch<f64>,
    pub notes: Patch<String>,
    pub photo_path: Patch<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetFilter {
    /// Case-insensitive substring of the pet name.
    pub name: Option<String>,
    pub species: Option<PetSpecies>,
}
