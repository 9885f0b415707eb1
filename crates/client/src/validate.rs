//! Pure form validation.
//!
//! Same input always produces the same output and nothing here touches a
//! collaborator; controllers merge the returned messages into their form
//! state.

use validator::validate_email;

use crate::submission::ReportDraft;

/// Field errors for the login form
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LoginFieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginFieldErrors {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Field errors for the sign-up form
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SignUpFieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl SignUpFieldErrors {
    pub fn is_valid(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }
}

/// Field errors for the report draft
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ReportFieldErrors {
    pub image: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl ReportFieldErrors {
    pub fn is_valid(&self) -> bool {
        self.image.is_none() && self.description.is_none() && self.location.is_none()
    }
}

pub fn validate_email_field(email: &str) -> Option<String> {
    if email.trim().is_empty() {
        Some("Email is required".to_string())
    } else if !validate_email(email.trim()) {
        Some("Invalid email format".to_string())
    } else {
        None
    }
}

pub fn validate_password_field(password: &str) -> Option<String> {
    if password.trim().is_empty() {
        Some("Password is required".to_string())
    } else if password.len() < 6 {
        Some("Password must be at least 6 characters".to_string())
    } else {
        None
    }
}

pub fn validate_name_field(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        Some("Name is required".to_string())
    } else if name.len() < 2 {
        Some("Name must be at least 2 characters".to_string())
    } else {
        None
    }
}

pub fn validate_confirm_password_field(password: &str, confirm_password: &str) -> Option<String> {
    if confirm_password.trim().is_empty() {
        Some("Please confirm your password".to_string())
    } else if password != confirm_password {
        Some("Passwords do not match".to_string())
    } else {
        None
    }
}

pub fn validate_login(email: &str, password: &str) -> LoginFieldErrors {
    LoginFieldErrors {
        email: validate_email_field(email),
        password: validate_password_field(password),
    }
}

pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> SignUpFieldErrors {
    SignUpFieldErrors {
        name: validate_name_field(name),
        email: validate_email_field(email),
        password: validate_password_field(password),
        confirm_password: validate_confirm_password_field(password, confirm_password),
    }
}

pub fn validate_report(draft: &ReportDraft) -> ReportFieldErrors {
    ReportFieldErrors {
        image: draft
            .image
            .is_none()
            .then(|| "Please capture a photo".to_string()),
        description: draft
            .description
            .trim()
            .is_empty()
            .then(|| "Please add a description".to_string()),
        location: (draft.latitude.is_none() || draft.longitude.is_none())
            .then(|| "Please set location".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert_eq!(validate_email_field("user@example.com"), None);
        assert_eq!(
            validate_email_field("not-an-email"),
            Some("Invalid email format".to_string())
        );
        assert_eq!(
            validate_email_field("   "),
            Some("Email is required".to_string())
        );
    }

    #[test]
    fn password_minimum_length() {
        assert_eq!(
            validate_password_field("12345"),
            Some("Password must be at least 6 characters".to_string())
        );
        assert_eq!(validate_password_field("123456"), None);
        assert_eq!(
            validate_password_field(""),
            Some("Password is required".to_string())
        );
    }

    #[test]
    fn confirm_password_must_match() {
        assert_eq!(
            validate_confirm_password_field("hunter22", "hunter23"),
            Some("Passwords do not match".to_string())
        );
        assert_eq!(
            validate_confirm_password_field("hunter22", ""),
            Some("Please confirm your password".to_string())
        );
        assert_eq!(
            validate_confirm_password_field("hunter22", "hunter22"),
            None
        );
    }

    #[test]
    fn name_minimum_length() {
        assert_eq!(
            validate_name_field(""),
            Some("Name is required".to_string())
        );
        assert_eq!(
            validate_name_field("A"),
            Some("Name must be at least 2 characters".to_string())
        );
        assert_eq!(validate_name_field("Asha"), None);
    }

    #[test]
    fn report_draft_requires_image_description_location() {
        let errors = validate_report(&ReportDraft::default());
        assert_eq!(errors.image, Some("Please capture a photo".to_string()));
        assert_eq!(
            errors.description,
            Some("Please add a description".to_string())
        );
        assert_eq!(errors.location, Some("Please set location".to_string()));
        assert!(!errors.is_valid());
    }

    #[test]
    fn same_input_same_output() {
        let first = validate_sign_up("A", "x", "123", "124");
        let second = validate_sign_up("A", "x", "123", "124");
        assert_eq!(first, second);
    }
}
