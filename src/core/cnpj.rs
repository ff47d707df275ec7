use crate::core::tax_id::digit_values;

const CNPJ_LENGTH: usize = 14;

/// Weight cycle applied right to left.
const WEIGHTS: [u32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

/// Checks the two CNPJ check digits at positions 12 and 13.
/// Punctuation is ignored; anything that is not 14 digits is invalid.
pub fn validate_cnpj(raw: &str) -> bool {
    let digits = digit_values(raw);

    if digits.len() != CNPJ_LENGTH {
        return false;
    }

    let first = check_digit(&digits[..12]);
    let second = check_digit(&digits[..13]);

    first == digits[12] && second == digits[13]
}

fn check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .zip(WEIGHTS.iter().cycle())
        .map(|(d, w)| d * w)
        .sum();

    match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    }
}
