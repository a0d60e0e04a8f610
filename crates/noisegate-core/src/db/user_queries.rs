//! Local accounts and the current sign-in.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{SignIn, User},
};

const SELECT_USER_BY_EMAIL_SQL: &str = "SELECT id, email, name FROM users WHERE email = ?1";
const INSERT_USER_SQL: &str = "INSERT INTO users (id, email, name, created_at, last_sign_in_at) \
     VALUES (?1, ?2, ?3, ?4, ?4)";
const TOUCH_USER_SQL: &str = "UPDATE users SET name = COALESCE(?2, name), last_sign_in_at = ?3 \
     WHERE id = ?1";
const SET_SESSION_SQL: &str = "INSERT INTO identity_session (slot, user_id, signed_in_at) \
     VALUES (1, ?1, ?2) \
     ON CONFLICT(slot) DO UPDATE SET user_id = excluded.user_id, signed_in_at = excluded.signed_in_at";
const SELECT_SESSION_USER_SQL: &str = "SELECT u.id, u.email, u.name FROM identity_session s \
     JOIN users u ON u.id = s.user_id WHERE s.slot = 1";
const CLEAR_SESSION_SQL: &str = "DELETE FROM identity_session";

impl super::Database {
    /// Finds or creates the account for `email` and records it as signed in.
    ///
    /// The account is new when this call created its row. A supplied name
    /// replaces the stored one; `None` keeps it.
    pub fn sign_in_user(&mut self, email: &str, name: Option<&str>) -> Result<SignIn> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let existing = tx
            .query_row(SELECT_USER_BY_EMAIL_SQL, params![email], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    name: row.get(2)?,
                })
            })
            .optional()
            .db_context("Failed to look up user")?;

        let (user, is_new_user) = match existing {
            Some(mut user) => {
                tx.execute(TOUCH_USER_SQL, params![user.id, name, now])
                    .db_context("Failed to update user")?;
                if let Some(name) = name {
                    user.name = Some(name.to_string());
                }
                (user, false)
            }
            None => {
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    email: email.to_string(),
                    name: name.map(str::to_string),
                };
                tx.execute(INSERT_USER_SQL, params![user.id, user.email, user.name, now])
                    .db_context("Failed to create user")?;
                (user, true)
            }
        };

        tx.execute(SET_SESSION_SQL, params![user.id, now])
            .db_context("Failed to record sign-in")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(SignIn { user, is_new_user })
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<User>> {
        self.connection
            .query_row(SELECT_SESSION_USER_SQL, [], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    name: row.get(2)?,
                })
            })
            .optional()
            .db_context("Failed to query current user")
    }

    /// Forgets the current sign-in. Signing out twice is not an error.
    pub fn sign_out_user(&self) -> Result<()> {
        self.connection
            .execute(CLEAR_SESSION_SQL, [])
            .db_context("Failed to clear sign-in")?;
        Ok(())
    }
}
