//! Staff user database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Role, User};

impl Database {
    /// Insert a new staff profile.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (uid, name, email, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                user.uid,
                user.name,
                user.email,
                user.role.as_str(),
                user.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a staff profile by account id.
    pub fn get_user(&self, uid: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT uid, name, email, role, created_at FROM users WHERE uid = ?",
                [uid],
                |row| {
                    Ok(UserRow {
                        uid: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        role: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

}

/// Intermediate row struct for database mapping.
struct UserRow {
    uid: String,
    name: String,
    email: String,
    role: String,
    created_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| DbError::Constraint(format!("Unknown role: {}", row.role)))?;

        Ok(User {
            uid: row.uid,
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }
}
