/*
 * Responsibility
 * - User エンティティと列挙型 (UserType / UserRole)
 * - 永続化層へ渡す NewUser / UserChanges (部分更新パッチ)
 * - password_hash は外に出さない (DTO 側で落とす)
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    Tutor,
    #[serde(rename = "Veterinário")]
    Veterinario,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Tutor => "Tutor",
            UserType::Veterinario => "Veterinário",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tutor" => Ok(UserType::Tutor),
            "Veterinário" => Ok(UserType::Veterinario),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Text that does not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    pub user_type: UserType,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub crmv: Option<String>,
    pub clinic_address: Option<String>,
    pub professional_id_doc_path: Option<String>,
    pub diploma_doc_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Uploaded files referenced by this record.
    pub fn document_paths(&self) -> impl Iterator<Item = &str> {
        [&self.professional_id_doc_path, &self.diploma_doc_path]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }

    /// Record as it would look after `changes` were written.
    pub fn merged(&self, changes: &UserChanges) -> User {
        let mut next = self.clone();
        if let Some(v) = &changes.name {
            next.name = v.clone();
        }
        if let Some(v) = &changes.cpf {
            next.cpf = v.clone();
        }
        if let Some(v) = changes.user_type {
            next.user_type = v;
        }
        if let Some(v) = &changes.email {
            next.email = v.clone();
        }
        if let Some(v) = &changes.phone {
            next.phone = v.clone();
        }
        if let Some(v) = &changes.password_hash {
            next.password_hash = v.clone();
        }
        if let Some(v) = changes.role {
            next.role = v;
        }
        next.address = changes.address.clone().apply(next.address);
        next.crmv = changes.crmv.clone().apply(next.crmv);
        next.clinic_address = changes.clinic_address.clone().apply(next.clinic_address);
        next.professional_id_doc_path = changes
            .professional_id_doc_path
            .clone()
            .apply(next.professional_id_doc_path);
        next.diploma_doc_path = changes.diploma_doc_path.clone().apply(next.diploma_doc_path);
        next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub cpf: String,
    pub user_type: UserType,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub crmv: Option<String>,
    pub clinic_address: Option<String>,
    pub professional_id_doc_path: Option<String>,
    pub diploma_doc_path: Option<String>,
}

/// Staged field changes for one user.
///
/// Non-nullable columns are `Option` (set or leave); nullable columns are
/// [`Patch`] so "clear to NULL" is distinct from "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub user_type: Option<UserType>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Patch<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub crmv: Patch<String>,
    pub clinic_address: Patch<String>,
    pub professional_id_doc_path: Patch<String>,
    pub diploma_doc_path: Patch<String>,
}

impl UserChanges {
    /// Veterinarian-only columns forced to NULL.
    pub fn clear_vet_fields(&mut self) {
        self.crmv = Patch::Null;
        self.clinic_address = Patch::Null;
        self.professional_id_doc_path = Patch::Null;
        self.diploma_doc_path = Patch::Null;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub user_type: Option<UserType>,
    /// Substring matched against name or CPF, case-insensitive.
    pub q: Option<String>,
}
