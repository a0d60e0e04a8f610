//! Who is using the tool.
//!
//! The session controller never talks to the identity provider; callers
//! resolve the current [`User`] first and hand it to the session builder.

use crate::{
    db::Database,
    error::{GateError, Result},
    models::{SignIn, User},
};

/// Supplies the current user.
pub trait IdentityProvider {
    /// The signed-in user, if any.
    fn current_user(&self) -> Result<Option<User>>;

    /// Signs in as `email`, creating the account on first use.
    fn sign_in(&mut self, email: &str, name: Option<&str>) -> Result<SignIn>;

    /// Signs out. Signing out when nobody is signed in succeeds.
    fn sign_out(&mut self) -> Result<()>;
}

/// Accounts kept in the local database, keyed by email.
pub struct LocalIdentity {
    db: Database,
}

impl LocalIdentity {
    /// Creates an identity provider over an open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The signed-in user, or [`GateError::NotSignedIn`].
    pub fn require_user(&self) -> Result<User> {
        self.current_user()?.ok_or(GateError::NotSignedIn)
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> Result<Option<User>> {
        self.db.current_user()
    }

    fn sign_in(&mut self, email: &str, name: Option<&str>) -> Result<SignIn> {
        let email = normalize_email(email)?;
        let name = name.map(str::trim).filter(|name| !name.is_empty());
        let sign_in = self.db.sign_in_user(&email, name)?;
        log::info!(
            "Signed in as {} ({})",
            sign_in.user.email,
            if sign_in.is_new_user { "new account" } else { "returning" }
        );
        Ok(sign_in)
    }

    fn sign_out(&mut self) -> Result<()> {
        self.db.sign_out_user()
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(GateError::invalid_input("email").with_reason("must not be empty"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(GateError::invalid_input("email").with_reason("must look like name@host")),
    }
}
