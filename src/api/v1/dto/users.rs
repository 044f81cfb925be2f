/*
 * Responsibility
 * - admin 用 Users の request/response DTO (JSON は camelCase、type は "type")
 * - request は全項目 default 可: 欠けた必須項目は use-case の検証エラーとして返す
 * - UpdateUserRequest の nullable 項目は Patch (欠落 / null / 値 を区別)
 * - response に password_hash は含めない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Patch, User, UserRole, UserType};
use crate::usecases::{CreateUserInput, UpdateUserInput};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub cpf: String,
    #[serde(rename = "type")]
    pub user_type: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub password: String,
    pub role: Option<String>,
    pub crmv: Option<String>,
    pub clinic_address: Option<String>,
    pub professional_id_doc_path: Option<String>,
    pub diploma_doc_path: Option<String>,
}

impl CreateUserRequest {
    pub fn into_input(self) -> CreateUserInput {
        CreateUserInput {
            name: self.name,
            cpf: self.cpf,
            user_type: self.user_type,
            email: self.email,
            phone: self.phone,
            address: self.address,
            password: self.password,
            role: self.role,
            crmv: self.crmv,
            clinic_address: self.clinic_address,
            professional_id_doc_path: self.professional_id_doc_path,
            diploma_doc_path: self.diploma_doc_path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub cpf: Option<String>,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Patch<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub crmv: Patch<String>,
    pub clinic_address: Patch<String>,
    pub professional_id_doc_path: Patch<String>,
    pub diploma_doc_path: Patch<String>,
}

impl UpdateUserRequest {
    pub fn into_input(self, id: i64) -> UpdateUserInput {
        UpdateUserInput {
            id,
            name: self.name,
            cpf: self.cpf,
            user_type: self.user_type,
            email: self.email,
            phone: self.phone,
            address: self.address,
            password: self.password,
            role: self.role,
            crmv: self.crmv,
            clinic_address: self.clinic_address,
            professional_id_doc_path: self.professional_id_doc_path,
            diploma_doc_path: self.diploma_doc_path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub cpf: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub role: UserRole,
    pub crmv: Option<String>,
    pub clinic_address: Option<String>,
    pub professional_id_doc_path: Option<String>,
    pub diploma_doc_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            cpf: u.cpf,
            user_type: u.user_type,
            email: u.email,
            phone: u.phone,
            address: u.address,
            role: u.role,
            crmv: u.crmv,
            clinic_address: u.clinic_address,
            professional_id_doc_path: u.professional_id_doc_path,
            diploma_doc_path: u.diploma_doc_path,
            created_at: u.created_at,
        }
    }
}
