/*
 * Responsibility
 * - 既存ユーザーへの部分更新 (admin 操作)
 * - 送られてきたフィールドだけを検証して UserChanges に積む (エラーは全件収集)
 * - 最終的な type が Veterinário なら、マージ後のレコードで必須項目を再確認
 * - type を Tutor に変える呼び出しでは獣医用フィールドを NULL にする
 */
use std::sync::Arc;

use crate::domain::{Patch, User, UserChanges, UserRole, UserType};
use crate::repos::UserRepository;
use crate::services::password::PasswordHasher;
use crate::usecases::{FieldErrors, UseCaseError, UseCaseResult, keys, msg};
use crate::validation::{
    is_valid_cpf, is_valid_email, is_valid_name, is_valid_password, is_valid_phone_br,
    normalize_cpf, trim_or_none,
};

/// Partial user update. `None` / [`Patch::Unset`] means "not sent".
///
/// `user_type` and `role` stay raw text so an unknown value becomes a field
/// error instead of a decoding failure.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub id: i64,
    pub name: Option<String>,
    pub cpf: Option<String>,
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

pub struct UpdateUser {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UpdateUser {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    pub async fn execute(&self, input: UpdateUserInput) -> UseCaseResult<User> {
        let existing = self
            .repo
            .find_by_id(input.id)
            .await?
            .ok_or(UseCaseError::NotFound)?;

        let mut next = UserChanges::default();
        let mut errors = FieldErrors::new();

        if let Some(name) = &input.name {
            if is_valid_name(name) {
                next.name = Some(name.trim().to_string());
            } else {
                errors.add("name", msg::NAME);
            }
        }

        if let Some(cpf) = &input.cpf {
            if !is_valid_cpf(cpf) {
                errors.add("cpf", msg::CPF_INVALID);
            } else {
                let normalized = normalize_cpf(cpf);
                let holder = self.repo.find_by_cpf(&normalized).await?;
                match holder {
                    Some(other) if other.id != existing.id => errors.add("cpf", msg::CPF_TAKEN),
                    _ => next.cpf = Some(normalized),
                }
            }
        }

        if let Some(raw) = &input.user_type {
            match raw.parse::<UserType>() {
                Ok(t) => next.user_type = Some(t),
                Err(_) => errors.add("type", msg::TYPE),
            }
        }

        if let Some(email) = &input.email {
            if is_valid_email(email) {
                next.email = Some(email.trim().to_string());
            } else {
                errors.add("email", msg::EMAIL_INVALID);
            }
        }

        if let Some(phone) = &input.phone {
            if is_valid_phone_br(phone) {
                next.phone = Some(phone.trim().to_string());
            } else {
                errors.add("phone", msg::PHONE);
            }
        }

        next.address = trimmed_patch(&input.address);

        // Hashed only once everything else has passed.
        let mut new_password = None;
        if let Some(password) = &input.password {
            if is_valid_password(password) {
                new_password = Some(password.as_str());
            } else {
                errors.add("password", msg::PASSWORD);
            }
        }

        if let Some(raw) = &input.role {
            match raw.parse::<UserRole>() {
                Ok(r) => next.role = Some(r),
                Err(_) => errors.add("role", msg::ROLE),
            }
        }

        let target_type = next.user_type.unwrap_or(existing.user_type);
        match target_type {
            UserType::Veterinario => {
                stage_vet_fields(&input, &mut next);
                // Checked on the merged record, even when this call did not
                // touch type, crmv or the documents.
                check_vet_required(&existing.merged(&next), &mut errors);
            }
            UserType::Tutor => {
                if next.user_type == Some(UserType::Tutor) {
                    next.clear_vet_fields();
                }
            }
        }

        if !errors.is_empty() {
            tracing::debug!(user_id = existing.id, fields = ?errors.fields().collect::<Vec<_>>(), "user update rejected");
            return Err(UseCaseError::Validation(errors));
        }

        if let Some(password) = new_password {
            next.password_hash = Some(self.hasher.hash(password)?);
        }

        let updated = self
            .repo
            .update(existing.id, next)
            .await?
            .ok_or(UseCaseError::NotFound)?;

        tracing::info!(user_id = updated.id, user_type = %updated.user_type, "user updated");
        Ok(updated)
    }
}

fn stage_vet_fields(input: &UpdateUserInput, next: &mut UserChanges) {
    next.crmv = trimmed_patch(&input.crmv);
    next.clinic_address = trimmed_patch(&input.clinic_address);
    next.professional_id_doc_path = input.professional_id_doc_path.clone();
    next.diploma_doc_path = input.diploma_doc_path.clone();
}

/// Value → trimmed value, blank → Null.
fn trimmed_patch(patch: &Patch<String>) -> Patch<String> {
    match patch {
        Patch::Unset => Patch::Unset,
        Patch::Null => Patch::Null,
        Patch::Value(v) => trim_or_none(v).into(),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn check_vet_required(user: &User, errors: &mut FieldErrors) {
    if is_blank(&user.crmv) {
        errors.add(keys::CRMV, msg::CRMV_REQUIRED);
    }
    if is_blank(&user.professional_id_doc_path) {
        errors.add(keys::PROFESSIONAL_ID_DOC, msg::PROFESSIONAL_DOC_REQUIRED);
    }
    if is_blank(&user.diploma_doc_path) {
        errors.add(keys::DIPLOMA_DOC, msg::DIPLOMA_DOC_REQUIRED);
    }
}
