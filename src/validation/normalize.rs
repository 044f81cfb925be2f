//! Input normalizers applied after a field passes validation.

/// Keep only the digits and re-punctuate as `###.###.###-##`.
///
/// Input that does not carry exactly 11 digits is re-punctuated as far as the
/// digits go; callers validate the shape first.
pub fn normalize_cpf(cpf: &str) -> String {
    let digits: String = cpf.chars().filter(|c| c.is_ascii_digit()).collect();
    let part = |from: usize, to: usize| digits.get(from..to.min(digits.len())).unwrap_or("");
    format!(
        "{}.{}.{}-{}",
        part(0, 3),
        part(3, 6),
        part(6, 9),
        part(9, 11)
    )
}

/// Trim, and collapse blank to `None`.
pub fn trim_or_none(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}
