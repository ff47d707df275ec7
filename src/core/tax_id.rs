use crate::core::{cnpj, cpf};
use crate::domain::model::TaxIdKind;

/// Keeps ASCII digits only, dropping dots, dashes, slashes and anything else.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub(crate) fn digit_values(raw: &str) -> Vec<u32> {
    raw.chars().filter_map(|c| c.to_digit(10)).collect()
}

impl TaxIdKind {
    pub fn validate(self, raw: &str) -> bool {
        match self {
            TaxIdKind::Cpf => cpf::validate_cpf(raw),
            TaxIdKind::Cnpj => cnpj::validate_cnpj(raw),
        }
    }

    /// Digits-only form of a valid ID, `None` when the checksum fails.
    pub fn normalize(self, raw: &str) -> Option<String> {
        if self.validate(raw) {
            Some(digits_only(raw))
        } else {
            None
        }
    }
}
