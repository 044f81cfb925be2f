/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証とユーザーの再読込は middleware 側の責務
 * - user_type / role はリクエスト時点の DB の値
 */
use crate::domain::{UserRole, UserType};

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub user_type: UserType,
    pub role: UserRole,
}

impl AuthCtx {
    pub fn new(user_id: i64, user_type: UserType, role: UserRole) -> Self {
        Self {
            user_id,
            user_type,
            role,
        }
    }

    pub fn is_tutor(&self) -> bool {
        self.user_type == UserType::Tutor
    }
}
