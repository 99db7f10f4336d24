//! Domain validation predicates for student writes.
//!
//! Each predicate answers "is this value invalid?" and has a matching
//! adapter returning the `Result` shape the `validator` derive expects.
//! All three run on every write, so a bad payload reports every failing
//! field at once.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Brazilian mobile number: two-digit area code not starting with zero,
/// the mandatory leading 9, then eight digits. Anchored so a valid number
/// embedded in garbage does not pass.
static CELULAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]{2}9[0-9]{8}$").expect("valid mobile number pattern"));

/// Compute the two CPF check digits for a nine-digit base.
///
/// Each digit is the weighted sum of the preceding digits, times ten,
/// modulo eleven, with ten collapsing to zero.
pub fn cpf_check_digits(base: &[u8; 9]) -> (u8, u8) {
    let first = {
        let sum: u32 = base
            .iter()
            .enumerate()
            .map(|(i, &d)| (10 - i as u32) * d as u32)
            .sum();
        ((sum * 10) % 11 % 10) as u8
    };

    let second = {
        let sum: u32 = base
            .iter()
            .enumerate()
            .map(|(i, &d)| (11 - i as u32) * d as u32)
            .sum::<u32>()
            + 2 * first as u32;
        ((sum * 10) % 11 % 10) as u8
    };

    (first, second)
}

/// A CPF is invalid unless it is exactly eleven ASCII digits, not a
/// single repeated digit, and its last two digits match the checksum of
/// the first nine.
pub fn cpf_invalido(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 11 || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return true;
    }

    // Repeated-digit sequences like 11111111111 satisfy the checksum but
    // are not assignable CPFs.
    if bytes.iter().all(|&b| b == bytes[0]) {
        return true;
    }

    let mut base = [0u8; 9];
    for (slot, &b) in base.iter_mut().zip(bytes.iter()) {
        *slot = b - b'0';
    }

    let (first, second) = cpf_check_digits(&base);
    first != bytes[9] - b'0' || second != bytes[10] - b'0'
}

/// A name is invalid when empty or containing anything besides letters.
/// Spaces count as non-letters, mirroring the registration form this
/// API replaces.
pub fn nome_invalido(value: &str) -> bool {
    value.is_empty() || value.chars().any(|c| !c.is_alphabetic())
}

/// A mobile number is invalid unless the whole value matches the
/// eleven-digit mobile pattern.
pub fn celular_invalido(value: &str) -> bool {
    !CELULAR_RE.is_match(value)
}

pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if cpf_invalido(value) {
        return Err(ValidationError::new("cpf")
            .with_message("CPF failed checksum validation".into()));
    }
    Ok(())
}

pub fn validate_nome(value: &str) -> Result<(), ValidationError> {
    if nome_invalido(value) {
        return Err(ValidationError::new("nome")
            .with_message("name must contain letters only".into()));
    }
    Ok(())
}

pub fn validate_celular(value: &str) -> Result<(), ValidationError> {
    if celular_invalido(value) {
        return Err(ValidationError::new("celular")
            .with_message("phone must be a valid mobile number like 11912345678".into()));
    }
    Ok(())
}
