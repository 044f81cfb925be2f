/*
 * Responsibility
 * - admin によるユーザー作成 (Tutor / Veterinário)
 * - 全フィールド検証 (エラーは全件収集)、CPF 正規化、CPF / e-mail の重複チェック
 * - Veterinário は CRMV と 2 つの書類が必須、Tutor は獣医用フィールドを持たない
 */
use std::sync::Arc;

use crate::domain::{NewUser, User, UserRole, UserType};
use crate::repos::UserRepository;
use crate::services::password::PasswordHasher;
use crate::usecases::{FieldErrors, UseCaseError, UseCaseResult, keys, msg};
use crate::validation::{
    is_valid_cpf, is_valid_email, is_valid_name, is_valid_password, is_valid_phone_br,
    normalize_cpf, trim_or_none,
};

#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub name: String,
    pub cpf: String,
    pub user_type: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub password: String,
    /// Defaults to `user`.
    pub role: Option<String>,
    pub crmv: Option<String>,
    pub clinic_address: Option<String>,
    pub professional_id_doc_path: Option<String>,
    pub diploma_doc_path: Option<String>,
}

pub struct CreateUser {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateUser {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    pub async fn execute(&self, input: CreateUserInput) -> UseCaseResult<User> {
        let mut errors = FieldErrors::new();

        if !is_valid_name(&input.name) {
            errors.add("name", msg::NAME);
        }

        let cpf = normalize_cpf(&input.cpf);
        if !is_valid_cpf(&input.cpf) {
            errors.add("cpf", msg::CPF_INVALID);
        } else if self.repo.find_by_cpf(&cpf).await?.is_some() {
            errors.add("cpf", msg::CPF_TAKEN);
        }

        let user_type = input.user_type.parse::<UserType>().ok();
        if user_type.is_none() {
            errors.add("type", msg::TYPE);
        }

        let email = input.email.trim().to_string();
        if !is_valid_email(&email) {
            errors.add("email", msg::EMAIL_INVALID);
        } else if self.repo.find_by_email(&email).await?.is_some() {
            errors.add("email", msg::EMAIL_TAKEN);
        }

        if !is_valid_phone_br(&input.phone) {
            errors.add("phone", msg::PHONE);
        }

        if !is_valid_password(&input.password) {
            errors.add("password", msg::PASSWORD);
        }

        let role = match input.role.as_deref() {
            None => Some(UserRole::User),
            Some(raw) => raw.parse::<UserRole>().ok(),
        };
        if role.is_none() {
            errors.add("role", msg::ROLE);
        }

        let mut crmv = input.crmv.as_deref().and_then(trim_or_none);
        let mut clinic_address = input.clinic_address.as_deref().and_then(trim_or_none);
        let mut professional_id_doc_path = input.professional_id_doc_path.as_deref().and_then(trim_or_none);
        let mut diploma_doc_path = input.diploma_doc_path.as_deref().and_then(trim_or_none);

        match user_type {
            Some(UserType::Veterinario) => {
                if crmv.is_none() {
                    errors.add(keys::CRMV, msg::CRMV_REQUIRED);
                }
                if professional_id_doc_path.is_none() {
                    errors.add(keys::PROFESSIONAL_ID_DOC, msg::PROFESSIONAL_DOC_REQUIRED);
                }
                if diploma_doc_path.is_none() {
                    errors.add(keys::DIPLOMA_DOC, msg::DIPLOMA_DOC_REQUIRED);
                }
            }
            Some(UserType::Tutor) => {
                crmv = None;
                clinic_address = None;
                professional_id_doc_path = None;
                diploma_doc_path = None;
            }
            None => {}
        }

        let (Some(user_type), Some(role)) = (user_type, role) else {
            return Err(UseCaseError::Validation(errors));
        };
        errors.into_result()?;

        let password_hash = self.hasher.hash(&input.password)?;

        let created = self
            .repo
            .create(NewUser {
                name: input.name.trim().to_string(),
                cpf,
                user_type,
                email,
                phone: input.phone.trim().to_string(),
                address: input.address.as_deref().and_then(trim_or_none),
                password_hash,
                role,
                crmv,
                clinic_address,
                professional_id_doc_path,
                diploma_doc_path,
            })
            .await?;

        tracing::info!(user_id = created.id, user_type = %created.user_type, role = %created.role, "user created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::memory::InMemoryUserRepository;
    use crate::services::password::fake::PlainHasher;

    fn tutor_input() -> CreateUserInput {
        CreateUserInput {
            name: "  Maria Souza ".into(),
            cpf: "123.456.789-09".into(),
            user_type: "Tutor".into(),
            email: "maria@meupet.com".into(),
            phone: "(11) 98765-4321".into(),
            address: Some("  ".into()),
            password: "Senha@123A".into(),
            role: None,
            ..Default::default()
        }
    }

    fn setup() -> (Arc<InMemoryUserRepository>, CreateUser) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let usecase = CreateUser::new(repo.clone(), Arc::new(PlainHasher));
        (repo, usecase)
    }

    fn validation_errors(result: UseCaseResult<User>) -> FieldErrors {
        match result {
            Err(UseCaseError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn creates_tutor_with_normalized_fields() {
        let (_, usecase) = setup();

        let user = usecase.execute(tutor_input()).await.unwrap();

        assert_eq!(user.name, "Maria Souza");
        assert_eq!(user.cpf, "123.456.789-09");
        assert_eq!(user.user_type, UserType::Tutor);
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.address, None);
        assert_eq!(user.password_hash, "hashed:Senha@123A");
    }

    #[tokio::test]
    async fn tutor_never_keeps_vet_fields() {
        let (_, usecase) = setup();

        let user = usecase
            .execute(CreateUserInput {
                crmv: Some("SP-1".into()),
                diploma_doc_path: Some("/uploads/d.pdf".into()),
                ..tutor_input()
            })
            .await
            .unwrap();

        assert_eq!(user.crmv, None);
        assert_eq!(user.diploma_doc_path, None);
    }

    #[tokio::test]
    async fn vet_requires_crmv_and_documents() {
        let (repo, usecase) = setup();

        let errors = validation_errors(
            usecase
                .execute(CreateUserInput {
                    user_type: "Veterinário".into(),
                    crmv: Some("   ".into()),
                    ..tutor_input()
                })
                .await,
        );

        assert!(errors.contains(keys::CRMV));
        assert!(errors.contains(keys::PROFESSIONAL_ID_DOC));
        assert!(errors.contains(keys::DIPLOMA_DOC));
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn vet_with_documents_is_created() {
        let (_, usecase) = setup();

        let user = usecase
            .execute(CreateUserInput {
                user_type: "Veterinário".into(),
                crmv: Some("SP-12345".into()),
                professional_id_doc_path: Some("/uploads/id.pdf".into()),
                diploma_doc_path: Some("/uploads/dip.pdf".into()),
                ..tutor_input()
            })
            .await
            .unwrap();

        assert_eq!(user.user_type, UserType::Veterinario);
        assert_eq!(user.crmv.as_deref(), Some("SP-12345"));
    }

    #[tokio::test]
    async fn duplicate_cpf_and_email_are_rejected() {
        let (_, usecase) = setup();
        usecase.execute(tutor_input()).await.unwrap();

        let errors = validation_errors(usecase.execute(tutor_input()).await);

        assert_eq!(errors.get("cpf"), Some(msg::CPF_TAKEN));
        assert_eq!(errors.get("email"), Some(msg::EMAIL_TAKEN));
    }

    #[tokio::test]
    async fn unknown_type_and_role_are_field_errors() {
        let (_, usecase) = setup();

        let errors = validation_errors(
            usecase
                .execute(CreateUserInput {
                    user_type: "Gerente".into(),
                    role: Some("root".into()),
                    ..tutor_input()
                })
                .await,
        );

        assert!(errors.contains("type"));
        assert!(errors.contains("role"));
    }

    #[tokio::test]
    async fn every_bad_field_is_reported_at_once() {
        let (_, usecase) = setup();

        let errors = validation_errors(
            usecase
                .execute(CreateUserInput {
                    name: "Al".into(),
                    cpf: "123".into(),
                    user_type: "Tutor".into(),
                    email: "x@y".into(),
                    phone: "11 9".into(),
                    password: "abc".into(),
                    ..Default::default()
                })
                .await,
        );

        for field in ["name", "cpf", "email", "phone", "password"] {
            assert!(errors.contains(field), "missing {field}");
        }
    }
}
