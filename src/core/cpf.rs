use crate::core::tax_id::digit_values;

const CPF_LENGTH: usize = 11;

/// Checks the two CPF check digits. Punctuation is ignored; anything that is
/// not 11 digits, or is one digit repeated, is invalid.
pub fn validate_cpf(raw: &str) -> bool {
    let digits = digit_values(raw);

    if digits.len() != CPF_LENGTH {
        return false;
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let first = check_digit(&digits[..9]);
    let second = check_digit(&digits[..10]);

    first == digits[9] && second == digits[10]
}

// Weights run from len + 1 down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    let check = 11 - sum % 11;
    if check >= 10 {
        0
    } else {
        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf() {
        assert!(validate_cpf("48247281856"));
        assert!(validate_cpf("482.472818-56"));
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("111.444.777-35"));
    }

    #[test]
    fn test_invalid_check_digits() {
        assert!(!validate_cpf("12345678910"));
        assert!(!validate_cpf("123.456.789-10"));
        assert!(!validate_cpf("48247281857"));
        assert!(!validate_cpf("48247281846"));
    }

    #[test]
    fn test_wrong_length() {
        assert!(!validate_cpf(""));
        assert!(!validate_cpf("123.456.789"));
        assert!(!validate_cpf("482472818560"));
        assert!(!validate_cpf("not a cpf"));
    }

    #[test]
    fn test_repeated_digits_rejected() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            assert!(!validate_cpf(&cpf), "{} should be rejected", cpf);
        }
    }

    #[test]
    fn test_check_digit_wraps_to_zero() {
        // 11 - (sum % 11) of 10 or 11 becomes 0
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 0]), 0);
        assert_eq!(check_digit(&[1, 0, 0, 0, 0, 0, 0, 0, 0]), 1);
    }
}
