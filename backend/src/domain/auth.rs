//! Login and registration inputs.
//!
//! Handlers hand raw strings over; these constructors validate them before
//! anything reaches a port. Registration reports every policy failure at once
//! so a caller can show the whole list.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::{EmailAddress, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller whitespace.
///
/// # Examples
/// ```
/// use polls::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" voter1 ", "password").unwrap();
/// assert_eq!(creds.username(), "voter1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;

/// One failed registration policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationIssue {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl RegistrationIssue {
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

/// Registration input that passed every local policy.
///
/// Uniqueness of username and email is checked later against storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields, collecting every failure.
    ///
    /// # Examples
    /// ```
    /// use polls::domain::Registration;
    ///
    /// let issues = Registration::try_from_parts("bob", "bob@example.org", "short", "other")
    ///     .unwrap_err();
    /// let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
    /// assert_eq!(codes, ["too_short", "too_short", "mismatch"]);
    /// ```
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<Self, Vec<RegistrationIssue>> {
        let mut issues = Vec::new();

        let username = Username::new(username)
            .map_err(|err| issues.push(username_issue(&err)))
            .ok();
        let email = EmailAddress::new(email)
            .map_err(|err| issues.push(RegistrationIssue::new("email", "invalid_email", err.to_string())))
            .ok();
        if password.chars().count() < PASSWORD_MIN {
            issues.push(RegistrationIssue::new(
                "password",
                "too_short",
                format!("Password should contain at least {PASSWORD_MIN} characters"),
            ));
        }
        if password != password_confirmation {
            issues.push(RegistrationIssue::new(
                "passwordConfirmation",
                "mismatch",
                "Passwords should be the same",
            ));
        }

        match (username, email) {
            (Some(username), Some(email)) if issues.is_empty() => Ok(Self {
                username,
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(issues),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn username_issue(err: &UserValidationError) -> RegistrationIssue {
    let code = match err {
        UserValidationError::UsernameTooShort { .. } => "too_short",
        UserValidationError::UsernameTooLong { .. } => "too_long",
        _ => "invalid_characters",
    };
    RegistrationIssue::new("username", code, err.to_string())
}
