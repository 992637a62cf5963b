//! Account data types
//!
//! - `User`: a registered customer account
//! - `Registration`: sign-up form input
//! - `ProfilePatch`: partial profile update
//! - `Session`: pointer to the logged-in user

use crate::auth::error::{AuthError, AuthResult};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// Avatar given to every new account
pub const DEFAULT_AVATAR: &str = "👤";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// `local@domain.tld` with no whitespace and a single `@`
pub fn validate_email(email: &str) -> AuthResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )))
    }
}

fn require(field: &str, value: &str) -> AuthResult<()> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Kind of customer account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Individual customer
    #[default]
    Client,
    /// Business customer
    Company,
    /// Field technician
    Technician,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Client => write!(f, "client"),
            UserType::Company => write!(f, "company"),
            UserType::Technician => write!(f, "technician"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(UserType::Client),
            "company" => Ok(UserType::Company),
            "technician" => Ok(UserType::Technician),
            other => Err(format!(
                "unknown user type '{}' (expected client, company or technician)",
                other
            )),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Timestamp-derived unique id
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique key
    pub email: String,
    /// Stored as entered
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub user_type: UserType,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub avatar: String,
    /// Ids of service orders placed by this user
    #[serde(default)]
    pub services: Vec<i64>,
    /// Ids of calculation records made by this user
    #[serde(default)]
    pub calculations: Vec<i64>,
    /// Missing in older records, which counts as active
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Exact match on email, password and active flag
    pub fn accepts(&self, email: &str, password: &str) -> bool {
        self.is_active && self.email == email && self.password == password
    }
}

/// Sign-up form input
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub company: String,
    pub user_type: UserType,
    pub agree_terms: bool,
}

impl Registration {
    /// Check required fields, password confirmation and terms acceptance
    pub fn validate(&self) -> AuthResult<()> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
            ("phone", &self.phone),
        ];
        for (field, value) in required {
            require(field, value)?;
        }

        validate_email(&self.email)?;
        if self.password != self.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }
        if !self.agree_terms {
            return Err(AuthError::Validation(
                "You must accept the terms and conditions".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the stored account for this registration
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            phone: self.phone,
            company: self.company,
            user_type: self.user_type,
            registration_date: Utc::now(),
            avatar: DEFAULT_AVATAR.to_string(),
            services: Vec::new(),
            calculations: Vec::new(),
            is_active: true,
        }
    }
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub user_type: Option<UserType>,
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn password(mut self, value: impl Into<String>) -> Self {
        self.password = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    pub fn company(mut self, value: impl Into<String>) -> Self {
        self.company = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.user_type.is_none()
            && self.avatar.is_none()
    }

    /// Set fields follow the registration rules: required fields stay
    /// non-blank and the email must be well-formed
    pub fn validate(&self) -> AuthResult<()> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
            ("phone", &self.phone),
        ];
        for (field, value) in required {
            if let Some(value) = value {
                require(field, value)?;
            }
        }

        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Merge the set fields into `user`
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.password {
            user.password = v;
        }
        if let Some(v) = self.phone {
            user.phone = v;
        }
        if let Some(v) = self.company {
            user.company = v;
        }
        if let Some(v) = self.user_type {
            user.user_type = v;
        }
        if let Some(v) = self.avatar {
            user.avatar = v;
        }
    }
}

/// The active session: only a reference into the user list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i64,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            first_name: "Sara".to_string(),
            last_name: "Ali".to_string(),
            email: "sara@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            phone: "+966500000002".to_string(),
            agree_terms: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_registration_validation() {
        assert!(registration().validate().is_ok());

        let mut reg = registration();
        reg.confirm_password = "other".to_string();
        assert!(matches!(reg.validate(), Err(AuthError::Validation(_))));

        let mut reg = registration();
        reg.agree_terms = false;
        assert!(matches!(reg.validate(), Err(AuthError::Validation(_))));

        let mut reg = registration();
        reg.email = "   ".to_string();
        assert!(matches!(reg.validate(), Err(AuthError::Validation(_))));

        let mut reg = registration();
        reg.email = "sara.example.com".to_string();
        assert!(matches!(reg.validate(), Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("sara@example.com").is_ok());
        assert!(validate_email("a.b@mail.example.sa").is_ok());

        for bad in ["@", "a b@c", "a b@c.com", "sara@example", "sara@@example.com", "@example.com"] {
            assert!(
                matches!(validate_email(bad), Err(AuthError::Validation(_))),
                "{} should be rejected",
                bad
            );

            let mut reg = registration();
            reg.email = bad.to_string();
            assert!(reg.validate().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_profile_patch_validation() {
        assert!(ProfilePatch::new().validate().is_ok());
        assert!(ProfilePatch::new().company("").validate().is_ok());
        assert!(ProfilePatch::new().email("new@example.com").validate().is_ok());

        let blank = [
            ProfilePatch::new().first_name(""),
            ProfilePatch::new().last_name("  "),
            ProfilePatch::new().password(""),
            ProfilePatch::new().phone(""),
            ProfilePatch::new().email("a b@c"),
        ];
        for patch in blank {
            assert!(
                matches!(patch.validate(), Err(AuthError::Validation(_))),
                "{:?}",
                patch
            );
        }
    }

    #[test]
    fn test_user_accepts() {
        let mut user = registration().into_user(7);
        assert!(user.accepts("sara@example.com", "secret"));
        assert!(!user.accepts("sara@example.com", "wrong"));
        assert!(!user.accepts("SARA@example.com", "secret"));

        user.is_active = false;
        assert!(!user.accepts("sara@example.com", "secret"));
    }

    #[test]
    fn test_missing_active_flag_defaults_to_active() {
        let json = r#"{
            "id": 1,
            "firstName": "Ahmed",
            "lastName": "Mohammed",
            "email": "ahmed@example.com",
            "password": "123456",
            "phone": "+966500000001",
            "userType": "client",
            "registrationDate": "2024-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_active);
        assert!(user.services.is_empty());
    }

    #[test]
    fn test_profile_patch_apply() {
        let mut user = registration().into_user(1);
        let patch = ProfilePatch::new().phone("+1").company("Acme");
        assert!(!patch.is_empty());

        patch.apply(&mut user);
        assert_eq!(user.phone, "+1");
        assert_eq!(user.company, "Acme");
        assert_eq!(user.first_name, "Sara");
        assert!(ProfilePatch::new().is_empty());
    }
}
