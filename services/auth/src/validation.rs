//! Input validation utilities
//!
//! Everything here is advisory and runs before a request is sent; the
//! backend applies its own policy.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::models::RegistrationForm;

/// Minimum password length for the local check
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Character categories needed for a password to pass the local check
pub const MIN_PASSWORD_CATEGORIES: usize = 2;

/// Strength label shown next to the password field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
        };
        f.write_str(label)
    }
}

/// Result of scoring a password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_digit: bool,
    pub has_special: bool,
    pub length_met: bool,
}

impl PasswordStrength {
    /// Number of character categories present (0 to 4)
    pub fn categories(&self) -> usize {
        [
            self.has_uppercase,
            self.has_lowercase,
            self.has_digit,
            self.has_special,
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Whether the password passes the local check
    pub fn is_valid(&self) -> bool {
        self.categories() >= MIN_PASSWORD_CATEGORIES && self.length_met
    }

    /// Display score out of 5: the four categories plus the length requirement
    pub fn score(&self) -> usize {
        self.categories() + usize::from(self.length_met)
    }

    /// Display score as a percentage
    pub fn percentage(&self) -> usize {
        self.score() * 100 / 5
    }

    pub fn label(&self) -> StrengthLabel {
        match self.percentage() {
            0..=40 => StrengthLabel::Weak,
            41..=70 => StrengthLabel::Medium,
            _ => StrengthLabel::Strong,
        }
    }
}

/// Score a password
pub fn score_password(password: &str) -> PasswordStrength {
    let mut strength = PasswordStrength {
        has_uppercase: false,
        has_lowercase: false,
        has_digit: false,
        has_special: false,
        length_met: password.chars().count() >= MIN_PASSWORD_LENGTH,
    };

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            strength.has_uppercase = true;
        } else if c.is_ascii_lowercase() {
            strength.has_lowercase = true;
        } else if c.is_ascii_digit() {
            strength.has_digit = true;
        } else {
            strength.has_special = true;
        }
    }

    strength
}

/// Validate password against the local policy
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if !score_password(password).is_valid() {
        return Err(format!(
            "Password must be at least {} characters long and contain at least two of: \
             uppercase letters, lowercase letters, numbers, special characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }

    Ok(())
}

/// Validate the login form
pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Please fill in all fields".to_string());
    }

    Ok(())
}

/// Validate the sign-up form
pub fn validate_registration(form: &RegistrationForm) -> Result<(), String> {
    if form.username.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err("Please fill in all fields".to_string());
    }

    validate_email(form.email.trim())?;

    if form.password != form.confirm_password {
        return Err("Passwords do not match".to_string());
    }

    validate_password(&form.password)
}
