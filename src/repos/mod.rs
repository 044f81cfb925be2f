/*
 * Responsibility
 * - 保存先の契約 (trait) と実装の公開
 * - use-case は trait だけに依存し、PgPool には触れない
 */
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod pet_repo;
pub mod user_repo;

pub use error::RepoError;
pub use pet_repo::{PetRepository, PgPetRepository};
pub use user_repo::{PgUserRepository, UserRepository};

/// `%needle%` for ILIKE with `\` as the escape character, so `%` and `_` in
/// the needle match literally.
fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
