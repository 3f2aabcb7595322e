//! Form validation run before any call is made.
//!
//! Each validator returns every field error at once so forms can show them
//! inline; an empty [`FieldErrors`] means the form may be submitted.

use crate::auth_client::RegisterRequest;
use crate::user::UserRole;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// `Ok(())` when nothing was flagged.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern compiles"))
}

pub fn is_email(value: &str) -> bool {
    email_re().is_match(value.trim())
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_email(email) {
        errors.insert("email", "Invalid email address");
    }
}

fn check_new_password(errors: &mut FieldErrors, password: &str, confirm: &str) {
    if password.is_empty() {
        errors.insert("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        );
    }
    if confirm.is_empty() {
        errors.insert("confirmPassword", "Please confirm your password");
    } else if confirm != password {
        errors.insert("confirmPassword", "Passwords do not match");
    }
}

pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, email);
    if password.trim().is_empty() {
        errors.insert("password", "Password is required");
    }
    errors
}

pub fn validate_forgot_password(email: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, email);
    errors
}

pub fn validate_reset_password(token: &str, password: &str, confirm: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if token.trim().is_empty() {
        errors.insert("token", "Invalid or missing reset token");
    }
    check_new_password(&mut errors, password, confirm);
    errors
}

/// Raw registration form input; the role is still a string from a select.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub hospital: String,
    pub department: String,
}

pub fn validate_registration(form: &RegistrationForm) -> FieldErrors {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, &form.email);
    check_new_password(&mut errors, &form.password, &form.confirm_password);
    if form.first_name.trim().is_empty() {
        errors.insert("firstName", "First name is required");
    }
    if form.last_name.trim().is_empty() {
        errors.insert("lastName", "Last name is required");
    }
    if form.role.trim().is_empty() {
        errors.insert("role", "Role is required");
    } else if form.role.parse::<UserRole>().is_err() {
        errors.insert("role", "Unknown role");
    }
    errors
}

impl RegistrationForm {
    /// Validates and converts into a register call. Blank hospital or
    /// department become `None`.
    pub fn into_request(self) -> Result<RegisterRequest, FieldErrors> {
        let errors = validate_registration(&self);
        let role = self.role.trim().parse::<UserRole>().ok();
        let (true, Some(role)) = (errors.is_empty(), role) else {
            return Err(errors);
        };
        let optional = |v: String| Some(v.trim().to_owned()).filter(|v| !v.is_empty());
        Ok(RegisterRequest {
            email: self.email.trim().to_owned(),
            password: self.password,
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            role,
            hospital: optional(self.hospital),
            department: optional(self.department),
        })
    }
}

pub fn validate_password_change(current: &str, new: &str, confirm: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if current.is_empty() {
        errors.insert("currentPassword", "Current password is required");
    }
    check_new_password(&mut errors, new, confirm);
    if !current.is_empty() && current == new {
        errors.insert("password", "New password must differ from the current one");
    }
    errors
}

/// Shape rules for a hospital registration, shared with the registry API.
pub fn validate_hospital(name: &str, address: &str, phone: &str, capacity: i64) -> FieldErrors {
    let mut errors = FieldErrors::default();
    let name_len = name.chars().count();
    if name_len == 0 || name_len > 100 {
        errors.insert("name", "Length must be between 1 and 100.");
    }
    let address_len = address.chars().count();
    if address_len == 0 || address_len > 200 {
        errors.insert("address", "Length must be between 1 and 200.");
    }
    if !phone_re().is_match(phone) {
        errors.insert("phone", "String does not match expected pattern.");
    }
    if capacity < 1 {
        errors.insert("capacity", "Must be greater than or equal to 1.");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_flags_missing_and_malformed_fields() {
        let errors = validate_login("", " ");
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let errors = validate_login("admin@medisync", "password");
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(errors.len(), 1);

        assert!(validate_login("Admin@MediSync.com", "password").is_empty());
    }

    #[test]
    fn registration_checks_every_field() {
        let form = RegistrationForm {
            email: "new@medisync.com".into(),
            password: "short".into(),
            confirm_password: "shorter".into(),
            role: "surgeon".into(),
            ..RegistrationForm::default()
        };
        let errors = validate_registration(&form);
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters long")
        );
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("lastName"), Some("Last name is required"));
        assert_eq!(errors.get("role"), Some("Unknown role"));
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn valid_registration_passes() {
        let form = RegistrationForm {
            email: "new@medisync.com".into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            role: "paramedic".into(),
            ..RegistrationForm::default()
        };
        assert_eq!(validate_registration(&form).into_result(), Ok(()));
    }

    #[test]
    fn form_converts_to_request() {
        let form = RegistrationForm {
            email: " medic@medisync.com ".into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            role: "Paramedic".into(),
            hospital: "  ".into(),
            department: "Ambulance".into(),
        };
        let request = form.into_request().expect("valid");
        assert_eq!(request.email, "medic@medisync.com");
        assert_eq!(request.role, UserRole::Paramedic);
        assert_eq!(request.hospital, None);
        assert_eq!(request.department.as_deref(), Some("Ambulance"));

        let errors = RegistrationForm::default().into_request().expect_err("blank");
        assert!(errors.get("role").is_some());
    }

    #[test]
    fn reset_requires_token_and_matching_passwords() {
        let errors = validate_reset_password("", "abcdefgh", "abcdefgh");
        assert_eq!(errors.get("token"), Some("Invalid or missing reset token"));
        assert_eq!(errors.len(), 1);

        let errors = validate_reset_password("t", "abcdefgh", "");
        assert_eq!(errors.get("confirmPassword"), Some("Please confirm your password"));
    }

    #[test]
    fn password_change_rejects_reuse() {
        let errors = validate_password_change("password1", "password1", "password1");
        assert_eq!(
            errors.get("password"),
            Some("New password must differ from the current one")
        );
        assert!(validate_password_change("password1", "password2", "password2").is_empty());
    }

    #[test]
    fn hospital_rules() {
        assert!(validate_hospital("Central", "1 Main St", "+15551234567", 10).is_empty());

        let errors = validate_hospital("", &"x".repeat(201), "555-1234", 0);
        assert_eq!(errors.len(), 4);
        assert!(validate_hospital(&"n".repeat(100), "a", "123456789", 1).is_empty());
        assert!(!validate_hospital(&"n".repeat(101), "a", "123456789", 1).is_empty());
    }
}
