// src/common/validation.rs

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::ValidationError;

use crate::common::error::field_error;

pub static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("regex de cor HEX válida")
});

pub static CNPJ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$").expect("regex de CNPJ válida")
});

pub static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{3}$").expect("regex de CEP válida"));

pub static STATE_UF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("regex de UF válida"));

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 128;

// Lista curta das senhas mais usadas; o resto fica a cargo do comprimento mínimo.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "12345678", "123456789", "1234567890", "qwerty123",
    "qwertyuiop", "iloveyou", "senha123", "mudar123", "abc12345", "11111111",
    "00000000", "admin123", "welcome1", "letmein1",
];

/// E-mails são comparados e guardados sem espaços e em minúsculas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `deserialize_with` que tira os espaços das pontas antes do `#[validate]`.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Regras de senha para trocas e redefinições.
/// Devolve a chave da primeira regra violada.
pub fn password_policy_violation(password: &str, email: &str) -> Option<&'static str> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Some("password_too_short");
    }
    if password.chars().count() > PASSWORD_MAX_LENGTH {
        return Some("password_too_long");
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Some("password_entirely_numeric");
    }
    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        return Some("password_too_common");
    }
    let local_part = normalize_email(email);
    let local_part = local_part.split('@').next().unwrap_or_default();
    if !local_part.is_empty() && lowered == local_part {
        return Some("password_too_similar");
    }
    None
}

// --- Validadores customizados para #[validate(custom(...))] ---

pub fn validate_extra_config(value: &Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(field_error("invalid_extra_config"))
    }
}

pub fn validate_points_per_real(value: &Decimal) -> Result<(), ValidationError> {
    // NUMERIC(5, 2)
    let max = Decimal::new(99_999, 2);
    if value.is_sign_negative() || *value > max || value.scale() > 2 {
        Err(field_error("invalid_points_per_real"))
    } else {
        Ok(())
    }
}

pub fn validate_password_length(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < PASSWORD_MIN_LENGTH {
        Err(field_error("password_too_short"))
    } else if len > PASSWORD_MAX_LENGTH {
        Err(field_error("password_too_long"))
    } else {
        Ok(())
    }
}

/// UF opcional: vazio ou duas letras maiúsculas.
pub fn validate_state(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || STATE_UF.is_match(value) {
        Ok(())
    } else {
        Err(field_error("invalid_state"))
    }
}

/// CEP opcional: vazio ou `00000-000`.
pub fn validate_zip_code(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || ZIP_CODE.is_match(value) {
        Ok(())
    } else {
        Err(field_error("invalid_zip_code"))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(field_error("required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_colors() {
        for ok in ["#1976D2", "#fff", "#FAFAFA", "#abc"] {
            assert!(is_hex_color(ok), "{ok} deveria ser válida");
        }
        for bad in ["#ZZZZZZ", "1976D2", "#12345", "#1234567", "", "#"] {
            assert!(!is_hex_color(bad), "{bad} deveria ser inválida");
        }
    }

    #[test]
    fn cnpj_format() {
        assert!(CNPJ.is_match("12.345.678/0001-99"));
        assert!(!CNPJ.is_match("12345678000199"));
        assert!(!CNPJ.is_match("12.345.678/0001-9"));
    }

    #[test]
    fn optional_address_fields() {
        assert!(validate_state("").is_ok());
        assert!(validate_state("SP").is_ok());
        assert!(validate_state("sp").is_err());
        assert!(validate_zip_code("").is_ok());
        assert!(validate_zip_code("01310-100").is_ok());
        assert!(validate_zip_code("01310100").is_err());
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn password_policy() {
        assert_eq!(password_policy_violation("short", "a@x.com"), Some("password_too_short"));
        assert_eq!(
            password_policy_violation("1234567890123", "a@x.com"),
            Some("password_entirely_numeric")
        );
        assert_eq!(password_policy_violation("Password1", "a@x.com"), Some("password_too_common"));
        assert_eq!(
            password_policy_violation("mariasilva", "MariaSilva@x.com"),
            Some("password_too_similar")
        );
        assert_eq!(password_policy_violation("c0rrect-h0rse", "a@x.com"), None);
    }

    #[test]
    fn extra_config_must_be_object() {
        assert!(validate_extra_config(&json!({"border_radius": "8px"})).is_ok());
        assert!(validate_extra_config(&json!([1, 2])).is_err());
        assert!(validate_extra_config(&json!("x")).is_err());
    }

    #[test]
    fn points_per_real_bounds() {
        assert!(validate_points_per_real(&Decimal::new(150, 2)).is_ok());
        assert!(validate_points_per_real(&Decimal::new(99_999, 2)).is_ok());
        assert!(validate_points_per_real(&Decimal::new(100_000, 2)).is_err());
        assert!(validate_points_per_real(&Decimal::new(-1, 0)).is_err());
        assert!(validate_points_per_real(&Decimal::new(1_005, 3)).is_err());
    }
}
