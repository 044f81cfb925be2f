/*
 * Responsibility
 * - Pet の作成 / 更新 / 削除 / 一覧 use-case
 * - 所有者チェックはしない (HTTP 層で owner_id を照合してから呼ぶ)
 */
pub mod create_pet;
pub mod delete_pet;
pub mod list_pets;
pub mod update_pet;

pub use create_pet::{CreatePet, CreatePetInput};
pub use delete_pet::DeletePet;
pub use list_pets::{ListPets, ListPetsFilter};
pub use update_pet::{UpdatePet, UpdatePetInput};

use crate::usecases::FieldErrors;
use crate::validation::{len_between, trim_or_none};

const TEXT_MIN: usize = 3;
const TEXT_MAX: usize = 100;

/// Optional free text (breed, notes). Blank collapses to `None`; anything
/// else must be 3..=100 characters after trimming.
fn optional_text(
    raw: Option<&str>,
    field: &'static str,
    message: &'static str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = raw.and_then(trim_or_none)?;
    if !len_between(&value, TEXT_MIN, TEXT_MAX) {
        errors.add(field, message);
        return None;
    }
    Some(value)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::msg;

    #[test]
    fn blank_text_is_absent_not_invalid() {
        let mut errors = FieldErrors::new();
        assert_eq!(optional_text(Some("   "), "breed", msg::BREED, &mut errors), None);
        assert_eq!(optional_text(None, "breed", msg::BREED, &mut errors), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn short_text_is_reported() {
        let mut errors = FieldErrors::new();
        assert_eq!(optional_text(Some(" ab "), "notes", msg::NOTES, &mut errors), None);
        assert_eq!(errors.get("notes"), Some(msg::NOTES));
    }

    #[test]
    fn text_is_trimmed() {
        let mut errors = FieldErrors::new();
        let value = optional_text(Some("  Poodle "), "breed", msg::BREED, &mut errors);
        assert_eq!(value.as_deref(), Some("Poodle"));
    }
}
