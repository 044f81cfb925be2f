/*
 * Responsibility
 * - handler / use-case から使うサービス群 (ハッシュ・トークン・アップロード)
 */
pub mod auth;
pub mod password;
pub mod uploads;
