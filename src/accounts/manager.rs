//! Account registration, login and logout
//!
//! Successful registration and login both hand back a fresh [`SessionData`]
//! for the account with the view counter reset; the caller stores it under
//! the visitor's token.

use crate::accounts::password::hash_password;
use crate::db::{Account, AccountRepository};
use crate::session::{SessionData, SessionStore, SessionToken};
use crate::{Error, Result};
use tracing::{debug, info};

/// Shortest password accepted at registration, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// An account together with the session established for it
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub account: Account,
    pub session: SessionData,
}

impl Authenticated {
    fn new(account: Account) -> Self {
        let session = SessionData::authenticated(&account);
        Self { account, session }
    }
}

#[derive(Debug, Clone)]
pub struct AccountManager {
    accounts: AccountRepository,
}

impl AccountManager {
    pub fn new(accounts: AccountRepository) -> Self {
        Self { accounts }
    }

    /// Create an account and log it in.
    ///
    /// Username and email are trimmed; the password is taken as given.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Authenticated> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(Error::validation("All fields are required"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.accounts.exists(username, email).await? {
            debug!(username = %username, "registration rejected, account exists");
            return Err(Error::conflict("Username or email already exists"));
        }

        let account = self
            .accounts
            .insert(username, email, &hash_password(password))
            .await?;

        info!(user_id = account.id, username = %account.username, "account registered");
        Ok(Authenticated::new(account))
    }

    /// Log in with a username or an email address in `identifier`
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Authenticated> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(Error::validation("Username and password are required"));
        }

        let account = self
            .accounts
            .find_by_credentials(identifier, &hash_password(password))
            .await?
            .ok_or_else(|| Error::authentication("Invalid username or password"))?;

        info!(user_id = account.id, username = %account.username, "login succeeded");
        Ok(Authenticated::new(account))
    }

    /// Drop everything stored for the visitor
    pub async fn logout(&self, sessions: &dyn SessionStore, token: &SessionToken) -> Result<()> {
        sessions.remove(token).await?;
        debug!("session cleared");
        Ok(())
    }

    pub fn repository(&self) -> &AccountRepository {
        &self.accounts
    }
}
