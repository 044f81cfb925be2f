//! Field validators.
//!
//! Pure predicates over raw input: no side effects, no errors, just `bool`.
//! Use-cases decide which message to attach to a failing field.

pub mod normalize;

use once_cell::sync::Lazy;
use regex::Regex;

pub use normalize::{normalize_cpf, trim_or_none};

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const EMAIL_MIN: usize = 10;
const EMAIL_MAX: usize = 256;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 12;

/// Characters that satisfy the "special character" password rule.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?`~";

static CPF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("valid CPF regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid e-mail regex"));
static PHONE_BR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{2}\) \d{5}-\d{4}$").expect("valid phone regex"));

/// Trimmed length within `[min, max]`, counted in characters.
pub fn len_between(s: &str, min: usize, max: usize) -> bool {
    let n = s.trim().chars().count();
    (min..=max).contains(&n)
}

pub fn is_valid_name(s: &str) -> bool {
    len_between(s, NAME_MIN, NAME_MAX)
}

/// Shape only (`###.###.###-##`); check digits are not verified.
pub fn is_valid_cpf(s: &str) -> bool {
    CPF_RE.is_match(s)
}

pub fn is_valid_email(s: &str) -> bool {
    len_between(s, EMAIL_MIN, EMAIL_MAX) && EMAIL_RE.is_match(s.trim())
}

/// Brazilian mobile number, `(##) #####-####`.
pub fn is_valid_phone_br(s: &str) -> bool {
    PHONE_BR_RE.is_match(s.trim())
}

pub fn is_valid_password(s: &str) -> bool {
    let n = s.chars().count();
    (PASSWORD_MIN..=PASSWORD_MAX).contains(&n)
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| c.is_uppercase())
        && s.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
