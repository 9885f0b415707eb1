//! Login, sign-up and password-reset flows.

use std::sync::Arc;

use tokio::sync::watch;

use cleancity_auth::AbstractAuth;
use cleancity_result::{Error, Result};

use crate::validate::{validate_email_field, validate_login, validate_sign_up};

/// Draft credentials for the login screen
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub password_visible: bool,
}

/// Draft credentials for the sign-up screen
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name_error: Option<String>,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub confirm_password_error: Option<String>,
    pub password_visible: bool,
    pub confirm_password_visible: bool,
}

/// State of the login operation.
///
/// Success carries the signed-in user id, or the confirmation line for a
/// password reset.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum LoginState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

/// State of the sign-up operation
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum SignUpState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

/// Orchestrates credential flows against the auth collaborator
pub struct AuthController {
    auth: Arc<dyn AbstractAuth>,
    login_form: LoginForm,
    sign_up_form: SignUpForm,
    login_state: watch::Sender<LoginState>,
    sign_up_state: watch::Sender<SignUpState>,
}

impl AuthController {
    pub fn new(auth: Arc<dyn AbstractAuth>) -> Self {
        AuthController {
            auth,
            login_form: Default::default(),
            sign_up_form: Default::default(),
            login_state: watch::channel(Default::default()).0,
            sign_up_state: watch::channel(Default::default()).0,
        }
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    pub fn sign_up_form(&self) -> &SignUpForm {
        &self.sign_up_form
    }

    pub fn login_state(&self) -> watch::Receiver<LoginState> {
        self.login_state.subscribe()
    }

    pub fn sign_up_state(&self) -> watch::Receiver<SignUpState> {
        self.sign_up_state.subscribe()
    }

    pub fn current_login_state(&self) -> LoginState {
        self.login_state.borrow().clone()
    }

    pub fn current_sign_up_state(&self) -> SignUpState {
        self.sign_up_state.borrow().clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.current_identity().await.is_some()
    }

    // Login form edits clear the edited field's error

    pub fn on_email_change(&mut self, email: &str) {
        self.login_form.email = email.to_string();
        self.login_form.email_error = None;
    }

    pub fn on_password_change(&mut self, password: &str) {
        self.login_form.password = password.to_string();
        self.login_form.password_error = None;
    }

    pub fn toggle_password_visibility(&mut self) {
        self.login_form.password_visible = !self.login_form.password_visible;
    }

    // Sign-up form edits

    pub fn on_name_change(&mut self, name: &str) {
        self.sign_up_form.name = name.to_string();
        self.sign_up_form.name_error = None;
    }

    pub fn on_sign_up_email_change(&mut self, email: &str) {
        self.sign_up_form.email = email.to_string();
        self.sign_up_form.email_error = None;
    }

    pub fn on_sign_up_password_change(&mut self, password: &str) {
        self.sign_up_form.password = password.to_string();
        self.sign_up_form.password_error = None;
    }

    pub fn on_confirm_password_change(&mut self, confirm_password: &str) {
        self.sign_up_form.confirm_password = confirm_password.to_string();
        self.sign_up_form.confirm_password_error = None;
    }

    pub fn toggle_sign_up_password_visibility(&mut self) {
        self.sign_up_form.password_visible = !self.sign_up_form.password_visible;
    }

    pub fn toggle_confirm_password_visibility(&mut self) {
        self.sign_up_form.confirm_password_visible = !self.sign_up_form.confirm_password_visible;
    }

    /// Attempt to sign in with the drafted credentials.
    ///
    /// Invalid input surfaces as field errors without a collaborator call;
    /// the attempt itself reports through the login state channel.
    pub async fn login(&mut self) -> Result<()> {
        if matches!(*self.login_state.borrow(), LoginState::Loading) {
            return Err(create_error!(OperationInFlight));
        }

        let errors = validate_login(&self.login_form.email, &self.login_form.password);
        if !errors.is_valid() {
            self.login_form.email_error = errors.email;
            self.login_form.password_error = errors.password;
            return Ok(());
        }

        self.login_state.send_replace(LoginState::Loading);

        let attempt = self
            .auth
            .sign_in(self.login_form.email.trim(), &self.login_form.password)
            .await;

        match attempt {
            Ok(identity) => {
                self.login_state.send_replace(LoginState::Success(identity.id));
            }
            Err(error) => {
                self.login_state
                    .send_replace(LoginState::Error(login_error_message(&error)));
            }
        }

        Ok(())
    }

    /// Attempt to create an account with the drafted details.
    ///
    /// Setting the display name is part of the same attempt; a failure
    /// there reports the whole attempt as failed.
    pub async fn sign_up(&mut self) -> Result<()> {
        if matches!(*self.sign_up_state.borrow(), SignUpState::Loading) {
            return Err(create_error!(OperationInFlight));
        }

        let errors = validate_sign_up(
            &self.sign_up_form.name,
            &self.sign_up_form.email,
            &self.sign_up_form.password,
            &self.sign_up_form.confirm_password,
        );
        if !errors.is_valid() {
            self.sign_up_form.name_error = errors.name;
            self.sign_up_form.email_error = errors.email;
            self.sign_up_form.password_error = errors.password;
            self.sign_up_form.confirm_password_error = errors.confirm_password;
            return Ok(());
        }

        self.sign_up_state.send_replace(SignUpState::Loading);

        let attempt = self
            .auth
            .sign_up(self.sign_up_form.email.trim(), &self.sign_up_form.password)
            .await;

        match attempt {
            Ok(identity) => {
                let name = self.sign_up_form.name.trim();
                match self.auth.update_display_name(&identity.id, name).await {
                    Ok(()) => {
                        self.sign_up_state
                            .send_replace(SignUpState::Success(identity.id));
                    }
                    Err(error) => {
                        self.sign_up_state
                            .send_replace(SignUpState::Error(sign_up_error_message(&error)));
                    }
                }
            }
            Err(error) => {
                self.sign_up_state
                    .send_replace(SignUpState::Error(sign_up_error_message(&error)));
            }
        }

        Ok(())
    }

    /// Send a password reset email.
    ///
    /// Reports through the login state channel; Success carries a
    /// confirmation line instead of a user id.
    pub async fn reset_password(&mut self, email: &str) -> Result<()> {
        if matches!(*self.login_state.borrow(), LoginState::Loading) {
            return Err(create_error!(OperationInFlight));
        }

        if email.trim().is_empty() {
            self.login_state.send_replace(LoginState::Error(
                "Please enter your email address".to_string(),
            ));
            return Ok(());
        }

        if validate_email_field(email).is_some() {
            self.login_state.send_replace(LoginState::Error(
                "Please enter a valid email address".to_string(),
            ));
            return Ok(());
        }

        self.login_state.send_replace(LoginState::Loading);

        match self.auth.send_password_reset(email.trim()).await {
            Ok(()) => {
                self.login_state
                    .send_replace(LoginState::Success("Password reset email sent!".to_string()));
            }
            Err(_) => {
                self.login_state.send_replace(LoginState::Error(
                    "Failed to send reset email. Please try again.".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn reset_login_state(&mut self) {
        self.login_state.send_replace(LoginState::Idle);
    }

    pub fn reset_sign_up_state(&mut self) {
        self.sign_up_state.send_replace(SignUpState::Idle);
    }
}

/// Translate a sign-in failure into a short user-facing line
fn login_error_message(error: &Error) -> String {
    let message = error.to_string();

    if message.contains("password is invalid") {
        "Incorrect password. Please try again."
    } else if message.contains("no user record") {
        "No account found with this email."
    } else if message.contains("network") {
        "Network error. Please check your connection."
    } else if message.contains("too many requests") {
        "Too many attempts. Please try again later."
    } else {
        "Login failed. Please try again."
    }
    .to_string()
}

/// Translate a sign-up failure into a short user-facing line
fn sign_up_error_message(error: &Error) -> String {
    let message = error.to_string();

    if message.contains("email address is already in use") {
        "This email is already registered. Please login instead."
    } else if message.contains("email address is badly formatted") {
        "Invalid email format. Please check your email."
    } else if message.contains("password is invalid") {
        "Password must be at least 6 characters."
    } else if message.contains("network") {
        "Network error. Please check your connection."
    } else {
        "Sign up failed. Please try again."
    }
    .to_string()
}
