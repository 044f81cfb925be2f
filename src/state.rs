/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users / pets repository, password hasher, token service, upload store, admin key
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - repository は trait object なので、テストでは in-memory 実装を差し込める
 */
use std::sync::Arc;

use crate::repos::{PetRepository, UserRepository};
use crate::services::auth::TokenService;
use crate::services::password::PasswordHasher;
use crate::services::uploads::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub pets: Arc<dyn PetRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<TokenService>,
    pub uploads: UploadStore,
    pub admin_key: Arc<str>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        pets: Arc<dyn PetRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
        uploads: UploadStore,
        admin_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            users,
            pets,
            hasher,
            tokens,
            uploads,
            admin_key: admin_key.into(),
        }
    }
}
