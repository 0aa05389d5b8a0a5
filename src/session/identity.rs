//! The identity collaborator: account creation and sign-in.

use crate::session::error::AuthError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Minimum password length accepted by [`MemoryIdentityProvider`].
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// An authenticated user as returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub display_name: String,
    pub email: String,
}

/// Creates accounts and authenticates users. The session only ever sees the
/// resulting [`Principal`] or an [`AuthError`].
pub trait IdentityProvider: Send + Sync {
    fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Principal, AuthError>;

    fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError>;
}

#[derive(Debug)]
struct Account {
    principal: Principal,
    password: String,
}

/// An in-process identity provider for demos and tests.
///
/// Accounts live only as long as the provider. Sign-in failures never reveal
/// whether the email is registered.
#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_ascii_lowercase()
    }

    fn is_valid_email(email: &str) -> bool {
        match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        }
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let email = Self::normalize_email(email);
        if username.trim().is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if !Self::is_valid_email(&email) {
            return Err(AuthError::InvalidEmail(email));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            });
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| AuthError::Unavailable("account store poisoned".to_string()))?;
        if accounts.contains_key(&email) {
            return Err(AuthError::EmailTaken(email));
        }
        let principal = Principal {
            uid: format!("user-{}", accounts.len() + 1),
            display_name: username.trim().to_string(),
            email: email.clone(),
        };
        accounts.insert(
            email,
            Account {
                principal: principal.clone(),
                password: password.to_string(),
            },
        );
        info!("Created account {}", principal.uid);
        Ok(principal)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let email = Self::normalize_email(email);
        let accounts = self
            .accounts
            .read()
            .map_err(|_| AuthError::Unavailable("account store poisoned".to_string()))?;
        match accounts.get(&email) {
            Some(account) if account.password == password => Ok(account.principal.clone()),
            _ => {
                debug!("Rejected sign-in attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_authenticate() -> Result<(), AuthError> {
        let provider = MemoryIdentityProvider::new();
        let created = provider.create_account("Ada", "Ada@Example.org ", "secret-pass")?;
        assert_eq!(created.display_name, "Ada");
        assert_eq!(created.email, "ada@example.org");

        let signed_in = provider.authenticate("ada@example.org", "secret-pass")?;
        assert_eq!(signed_in, created);
        Ok(())
    }

    #[test]
    fn test_failed_sign_in_does_not_reveal_account_existence() {
        let provider = MemoryIdentityProvider::new();
        provider
            .create_account("Ada", "ada@example.org", "secret-pass")
            .unwrap();

        let wrong_password = provider.authenticate("ada@example.org", "nope");
        let unknown_email = provider.authenticate("bob@example.org", "secret-pass");
        assert_eq!(wrong_password, Err(AuthError::InvalidCredentials));
        assert_eq!(unknown_email, wrong_password);
    }

    #[test]
    fn test_create_account_validation() {
        let provider = MemoryIdentityProvider::new();
        assert_eq!(
            provider.create_account(" ", "a@b.co", "secret-pass"),
            Err(AuthError::EmptyUsername)
        );
        assert_eq!(
            provider.create_account("Ada", "not-an-email", "secret-pass"),
            Err(AuthError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(
            provider.create_account("Ada", "a@b.co", "12345"),
            Err(AuthError::WeakPassword { min_length: 6 })
        );

        provider.create_account("Ada", "a@b.co", "123456").unwrap();
        assert_eq!(
            provider.create_account("Ada 2", "A@B.co", "abcdef"),
            Err(AuthError::EmailTaken("a@b.co".to_string()))
        );
    }
}
