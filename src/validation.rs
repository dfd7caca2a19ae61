//! Form Validation
//!
//! Client-side checks run before any auth request is sent. Messages are
//! rendered in the user's language.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    En,
    Vi,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Vi => "vi",
        }
    }

    pub fn from_code(code: &str) -> Self {
        if code.to_ascii_lowercase().starts_with("vi") {
            Language::Vi
        } else {
            Language::En
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("this field is required")]
    Required,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password is too short")]
    PasswordTooShort,
    #[error("password needs an uppercase letter")]
    PasswordMissingUpper,
    #[error("password needs a lowercase letter")]
    PasswordMissingLower,
    #[error("password needs a digit")]
    PasswordMissingDigit,
    #[error("password needs a special character")]
    PasswordMissingSymbol,
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    pub fn message(self, lang: Language) -> String {
        match lang {
            Language::En => match self {
                ValidationError::Required => "This field is required".to_string(),
                ValidationError::InvalidEmail => "Please enter a valid email address".to_string(),
                ValidationError::PasswordTooShort => {
                    format!("Password must be at least {} characters", MIN_PASSWORD_LEN)
                }
                ValidationError::PasswordMissingUpper => {
                    "Password must contain an uppercase letter".to_string()
                }
                ValidationError::PasswordMissingLower => {
                    "Password must contain a lowercase letter".to_string()
                }
                ValidationError::PasswordMissingDigit => "Password must contain a digit".to_string(),
                ValidationError::PasswordMissingSymbol => {
                    "Password must contain a special character".to_string()
                }
                ValidationError::PasswordMismatch => "Passwords do not match".to_string(),
            },
            Language::Vi => match self {
                ValidationError::Required => "Trường này là bắt buộc".to_string(),
                ValidationError::InvalidEmail => "Vui lòng nhập địa chỉ email hợp lệ".to_string(),
                ValidationError::PasswordTooShort => {
                    format!("Mật khẩu phải có ít nhất {} ký tự", MIN_PASSWORD_LEN)
                }
                ValidationError::PasswordMissingUpper => "Mật khẩu phải có chữ in hoa".to_string(),
                ValidationError::PasswordMissingLower => "Mật khẩu phải có chữ thường".to_string(),
                ValidationError::PasswordMissingDigit => "Mật khẩu phải có chữ số".to_string(),
                ValidationError::PasswordMissingSymbol => {
                    "Mật khẩu phải có ký tự đặc biệt".to_string()
                }
                ValidationError::PasswordMismatch => "Mật khẩu xác nhận không khớp".to_string(),
            },
        }
    }
}

/// Validation failure attached to one form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub error: ValidationError,
}

impl FieldError {
    pub fn new(field: &'static str, error: ValidationError) -> Self {
        Self { field, error }
    }
}

/// Message for `field` among `errors`, if it failed
pub fn message_for(errors: &[FieldError], field: &str, lang: Language) -> Option<String> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.error.message(lang))
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required)
    } else {
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    validate_required(value)?;
    let (local, domain) = value.split_once('@').ok_or(ValidationError::InvalidEmail)?;
    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) || !domain_ok {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Reports the first rule the password breaks
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !value.chars().any(|c| c.is_uppercase()) {
        return Err(ValidationError::PasswordMissingUpper);
    }
    if !value.chars().any(|c| c.is_lowercase()) {
        return Err(ValidationError::PasswordMissingLower);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    if !value.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        return Err(ValidationError::PasswordMissingSymbol);
    }
    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirm: &str) -> Result<(), ValidationError> {
    validate_required(confirm)?;
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

fn collect(checks: Vec<(&'static str, Result<(), ValidationError>)>) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|e| FieldError::new(field, e)))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Sign-in form: the policy is not re-checked, only presence and email shape
pub fn validate_login(email: &str, password: &str) -> Result<(), Vec<FieldError>> {
    collect(vec![
        ("email", validate_email(email)),
        ("password", validate_required(password)),
    ])
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub coder_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn validate_registration(form: &RegistrationForm) -> Result<(), Vec<FieldError>> {
    collect(vec![
        ("coderName", validate_required(&form.coder_name)),
        ("email", validate_email(&form.email)),
        ("password", validate_password(&form.password)),
        (
            "confirmPassword",
            validate_password_confirmation(&form.password, &form.confirm_password),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert_eq!(validate_password(""), Err(ValidationError::Required));
        assert_eq!(validate_password("Ab1!"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("abcdefg1!"), Err(ValidationError::PasswordMissingUpper));
        assert_eq!(validate_password("ABCDEFG1!"), Err(ValidationError::PasswordMissingLower));
        assert_eq!(validate_password("Abcdefgh!"), Err(ValidationError::PasswordMissingDigit));
        assert_eq!(validate_password("Abcdefg12"), Err(ValidationError::PasswordMissingSymbol));
        assert_eq!(validate_password("Abcdefg1!"), Ok(()));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("coder@ntu.edu.vn").is_ok());
        assert!(validate_email("  coder@ntu.vn ").is_ok());
        assert_eq!(validate_email(""), Err(ValidationError::Required));
        for bad in ["coder", "@ntu.vn", "coder@ntu", "coder@.vn", "a b@ntu.vn", "a@b@ntu.vn"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{}", bad);
        }
    }

    #[test]
    fn test_confirmation_must_match() {
        assert_eq!(
            validate_password_confirmation("Abcdefg1!", "Abcdefg1?"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(validate_password_confirmation("Abcdefg1!", "Abcdefg1!").is_ok());
    }

    #[test]
    fn test_registration_reports_every_field() {
        let form = RegistrationForm {
            coder_name: " ".into(),
            email: "nope".into(),
            password: "short".into(),
            confirm_password: "other".into(),
        };
        let errors = validate_registration(&form).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["coderName", "email", "password", "confirmPassword"]);
        assert_eq!(
            message_for(&errors, "confirmPassword", Language::Vi).as_deref(),
            Some("Mật khẩu xác nhận không khớp")
        );
    }

    #[test]
    fn test_messages_follow_language() {
        assert_eq!(ValidationError::Required.message(Language::En), "This field is required");
        assert_eq!(ValidationError::Required.message(Language::Vi), "Trường này là bắt buộc");
        assert_eq!(Language::from_code("vi-VN"), Language::Vi);
        assert_eq!(Language::from_code("en-US"), Language::En);
    }
}
