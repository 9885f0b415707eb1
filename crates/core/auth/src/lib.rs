#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate cleancity_result;

use std::collections::HashMap;
use std::sync::Arc;

use futures::lock::Mutex;

use cleancity_result::Result;

/// An authenticated identity as reported by the auth provider
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Identity {
    /// Opaque user id
    pub id: String,
    /// Display name, if one has been set
    pub display_name: Option<String>,
    /// Avatar URL, if one has been set
    pub avatar_url: Option<String>,
}

/// Managed authentication collaborator
#[async_trait]
pub trait AbstractAuth: Sync + Send {
    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Create a new account with email and password and sign it in
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Send a password reset email
    async fn send_password_reset(&self, email: &str) -> Result<()>;

    /// Set the display name on an existing identity
    async fn update_display_name(&self, user_id: &str, name: &str) -> Result<()>;

    /// Identity of the current session, if signed in
    async fn current_identity(&self) -> Option<Identity>;

    /// End the current session
    async fn sign_out(&self);
}

#[derive(Clone)]
struct Account {
    password: String,
    identity: Identity,
}

/// Reference implementation backed by an in-memory account map.
///
/// Failure messages use the provider's phrasing so that controller-side
/// message classification is exercised against realistic input.
#[derive(Clone, Default)]
pub struct ReferenceAuth {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    session: Arc<Mutex<Option<Identity>>>,
}

impl ReferenceAuth {
    pub fn new() -> Self {
        Default::default()
    }
}

#[async_trait]
impl AbstractAuth for ReferenceAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let accounts = self.accounts.lock().await;
        let account = accounts.get(email).ok_or_else(|| {
            create_error!(AuthFailed {
                message: "There is no user record corresponding to this identifier. \
                          The user may have been deleted."
                    .to_string()
            })
        })?;

        if account.password != password {
            return Err(create_error!(AuthFailed {
                message: "The password is invalid or the user does not have a password."
                    .to_string()
            }));
        }

        let identity = account.identity.clone();
        *self.session.lock().await = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(email) {
            return Err(create_error!(AuthFailed {
                message: "The email address is already in use by another account.".to_string()
            }));
        }

        let identity = Identity {
            id: ulid::Ulid::new().to_string(),
            display_name: None,
            avatar_url: None,
        };

        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );

        *self.session.lock().await = Some(identity.clone());
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        let accounts = self.accounts.lock().await;
        if accounts.contains_key(email) {
            Ok(())
        } else {
            Err(create_error!(AuthFailed {
                message: "There is no user record corresponding to this identifier. \
                          The user may have been deleted."
                    .to_string()
            }))
        }
    }

    async fn update_display_name(&self, user_id: &str, name: &str) -> Result<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .values_mut()
            .find(|account| account.identity.id == user_id)
            .ok_or_else(|| create_error!(NotFound))?;

        account.identity.display_name = Some(name.to_string());

        let mut session = self.session.lock().await;
        if let Some(identity) = session.as_mut() {
            if identity.id == user_id {
                identity.display_name = Some(name.to_string());
            }
        }

        Ok(())
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.session.lock().await.clone()
    }

    async fn sign_out(&self) {
        *self.session.lock().await = None;
    }
}
