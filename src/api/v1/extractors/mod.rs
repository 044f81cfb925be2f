/*
 * Responsibility
 * - handler 用の独自 extractor
 */
mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
