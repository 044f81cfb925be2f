/*
 * Responsibility
 * - ドメイン型の公開 (re-export)
 */
pub mod patch;
pub mod pet;
pub mod user;

pub use patch::Patch;
pub use pet::{NewPet, Pet, PetChanges, PetFilter, PetSex, PetSpecies};
pub use user::{NewUser, User, UserChanges, UserFilter, UserRole, UserType};
