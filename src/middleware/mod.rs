/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 各モジュールは `apply(router, ..)` で Router に layer を掛ける
 */
pub mod admin_key;
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
