//! Credential vault and session ledger.
//!
//! The vault is the stand-in for the hosted identity service: it owns its own
//! SQLite file (separate from the records store), stores PBKDF2-SHA256
//! credential digests, and issues bearer session tokens with a fixed TTL.

use chrono::{DateTime, SecondsFormat, Utc};
use pbkdf2::pbkdf2_hmac;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::path::Path;
use thiserror::Error;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const KEY_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 32;

/// Sessions expire this many hours after sign-in.
pub const SESSION_TTL_HOURS: i64 = 12;

const VAULT_SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    uid TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    salt TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    uid TEXT NOT NULL REFERENCES accounts(uid) ON DELETE CASCADE,
    email TEXT NOT NULL,
    issued_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_uid ON sessions(uid);
CREATE INDEX IF NOT EXISTS idx_sessions_expiry ON sessions(expires_at);
"#;

/// Identity errors.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("an account already exists for {0}")]
    EmailTaken(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("identity store corrupted: {0}")]
    Corrupt(String),

    #[error("identity store error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// An authenticated principal: the stable account id plus its email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// A live sign-in. The `token` is the bearer value callers present on every
/// subsequent operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub uid: String,
    pub email: String,
    pub issued_at: String,
    pub expires_at: String,
}

impl Session {
    /// The identity this session authenticates.
    pub fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}

struct AccountRow {
    uid: String,
    email: String,
    password_hash: String,
    salt: String,
}

/// Credential vault backed by its own SQLite file.
pub struct CredentialVault {
    conn: Connection,
}

impl CredentialVault {
    /// Open (or create) a vault at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> IdentityResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;
        let vault = Self { conn };
        vault.initialize()?;
        Ok(vault)
    }

    /// Create an in-memory vault (for testing).
    pub fn open_in_memory() -> IdentityResult<Self> {
        let conn = Connection::open_in_memory()?;
        let vault = Self { conn };
        vault.initialize()?;
        Ok(vault)
    }

    fn initialize(&self) -> IdentityResult<()> {
        self.conn.execute_batch(VAULT_SCHEMA)?;
        Ok(())
    }

    /// Create an account and open a session for it.
    ///
    /// Password policy is the caller's job (see [`crate::validation`]); the
    /// vault only refuses duplicate emails.
    pub fn register(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let email = normalize_email(email);
        if self.lookup_account(&email)?.is_some() {
            return Err(IdentityError::EmailTaken(email));
        }

        let salt = generate_salt();
        let digest = derive_digest(password, &salt);
        let uid = uuid::Uuid::new_v4().to_string();

        self.conn.execute(
            r#"
            INSERT INTO accounts (uid, email, password_hash, salt, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![uid, email, hex::encode(digest), hex::encode(salt), now_ts()],
        )?;

        tracing::debug!(%email, "account registered");
        self.open_session(&uid, &email)
    }

    /// Verify credentials and open a session.
    ///
    /// Unknown emails and wrong passwords report the same error so the vault
    /// cannot be used to probe which addresses hold accounts.
    pub fn authenticate(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let email = normalize_email(email);
        let account = self
            .lookup_account(&email)?
            .ok_or(IdentityError::InvalidCredentials)?;

        let salt = hex::decode(&account.salt)
            .map_err(|e| IdentityError::Corrupt(format!("account salt for {email}: {e}")))?;
        let candidate = derive_digest(password, &salt);
        if hex::encode(candidate) != account.password_hash {
            tracing::warn!(%email, "failed sign-in attempt");
            return Err(IdentityError::InvalidCredentials);
        }

        self.open_session(&account.uid, &account.email)
    }

    /// Resolve a bearer token to its identity, or `None` when the token is
    /// unknown, signed out, or expired. Expired rows are removed on sight.
    pub fn session(&self, token: &str) -> IdentityResult<Option<Identity>> {
        let row = self
            .conn
            .query_row(
                "SELECT uid, email, expires_at FROM sessions WHERE token = ?",
                [token],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((uid, email, expires_at)) = row else {
            return Ok(None);
        };

        let expires = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|e| IdentityError::Corrupt(format!("session expiry: {e}")))?;
        if expires.with_timezone(&Utc) <= Utc::now() {
            self.conn
                .execute("DELETE FROM sessions WHERE token = ?", [token])?;
            return Ok(None);
        }

        Ok(Some(Identity { uid, email }))
    }

    /// End a session. Returns whether a live session was actually removed.
    pub fn end_session(&self, token: &str) -> IdentityResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?", [token])?;
        Ok(rows_affected > 0)
    }

    /// Drop every expired session row. Returns the number removed.
    pub fn purge_expired_sessions(&self) -> IdentityResult<usize> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM sessions WHERE expires_at <= ?", [now_ts()])?;
        Ok(rows_affected)
    }

    fn lookup_account(&self, email: &str) -> IdentityResult<Option<AccountRow>> {
        self.conn
            .query_row(
                "SELECT uid, email, password_hash, salt FROM accounts WHERE email = ?",
                [email],
                |row| {
                    Ok(AccountRow {
                        uid: row.get(0)?,
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                        salt: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    fn open_session(&self, uid: &str, email: &str) -> IdentityResult<Session> {
        let issued_at = now_ts();
        let expires_at = ts_after_hours(SESSION_TTL_HOURS);
        self.insert_session(uid, email, &issued_at, &expires_at)
    }

    fn insert_session(
        &self,
        uid: &str,
        email: &str,
        issued_at: &str,
        expires_at: &str,
    ) -> IdentityResult<Session> {
        let token = generate_token();
        self.conn.execute(
            r#"
            INSERT INTO sessions (token, uid, email, issued_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![token, uid, email, issued_at, expires_at],
        )?;

        Ok(Session {
            token,
            uid: uid.to_string(),
            email: email.to_string(),
            issued_at: issued_at.to_string(),
            expires_at: expires_at.to_string(),
        })
    }
}

/// Derive a credential digest from password + salt using PBKDF2-SHA256.
fn derive_digest(password: &str, salt: &[u8]) -> [u8; KEY_LENGTH] {
    let mut digest = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut digest);
    digest
}

/// Generate a cryptographically random salt.
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Generate an opaque bearer token (256 random bits, hex-encoded).
fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// RFC3339 UTC with fixed-width fractional seconds, so stored values sort
/// lexicographically in chronological order.
fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn ts_after_hours(hours: i64) -> String {
    (Utc::now() + chrono::Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Micros, true)
}
