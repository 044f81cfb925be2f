/*
 * Responsibility
 * - use-case 共通の結果型 (UseCaseError) とフィールドエラー集合 (FieldErrors)
 * - 検証は「全部集めてから失敗」、存在チェックは即座に失敗
 */
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::repos::RepoError;
use crate::services::password::PasswordError;

pub mod create_user;
pub mod pets;
pub mod update_user;

pub use create_user::{CreateUser, CreateUserInput};
pub use pets::{CreatePet, CreatePetInput, DeletePet, ListPets, ListPetsFilter, UpdatePet, UpdatePetInput};
pub use update_user::{UpdateUser, UpdateUserInput};

/// Field name → human-readable message, collected across a whole call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// First message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), UseCaseError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(UseCaseError::Validation(self))
        }
    }
}

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("not found")]
    NotFound,
    #[error("validation failed: {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

pub type UseCaseResult<T> = Result<T, UseCaseError>;

/// Messages shown to the end user.
pub(crate) mod msg {
    pub const NAME: &str = "Nome deve ter entre 3 e 100 caracteres";
    pub const CPF_INVALID: &str = "CPF inválido (use 000.000.000-00)";
    pub const CPF_TAKEN: &str = "CPF já cadastrado";
    pub const TYPE: &str = "Tipo inválido";
    pub const EMAIL_INVALID: &str = "E-mail inválido (10 a 256 caracteres)";
    pub const EMAIL_TAKEN: &str = "E-mail já cadastrado";
    pub const PHONE: &str = "Celular inválido (formato: (00) 00000-0000)";
    pub const PASSWORD: &str = "Senha inválida (8-12, com número, especial e maiúscula)";
    pub const ROLE: &str = "Role inválida";
    pub const CRMV_REQUIRED: &str = "CRMV é obrigatório";
    pub const PROFESSIONAL_DOC_REQUIRED: &str = "Documento profissional é obrigatório";
    pub const DIPLOMA_DOC_REQUIRED: &str = "Diploma/Certificado é obrigatório";
    pub const SPECIES: &str = "Espécie inválida";
    pub const SEX: &str = "Sexo inválido";
    pub const BREED: &str = "Raça deve ter entre 3 e 100 caracteres";
    pub const NOTES: &str = "Adicional deve ter entre 3 e 100 caracteres";
}

/// Error-map keys for the veterinarian documents. They follow the upload
/// form field names, not the stored column names.
pub(crate) mod keys {
    pub const CRMV: &str = "crmv";
    pub const PROFESSIONAL_ID_DOC: &str = "professionalIdDoc";
    pub const DIPLOMA_DOC: &str = "diplomaDoc";
}
