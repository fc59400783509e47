//! Account and session management for the clinic desk.
//!
//! This crate keeps identity concerns out of the records store: accounts and
//! sessions live in their own SQLite file, passwords are stored as
//! PBKDF2-SHA256 digests, and every sign-in hands back a bearer [`Session`]
//! that the core crate checks before touching clinic data.
//!
//! [`validation`] holds the registration-form rules (email shape, password
//! length, name length) so front ends and the vault agree on what a
//! well-formed sign-up looks like.

pub mod validation;

mod vault;

pub use validation::{validate_registration, ValidationError};
pub use vault::{
    CredentialVault, Identity, IdentityError, IdentityResult, Session, KEY_LENGTH,
    PBKDF2_ITERATIONS, SALT_LENGTH, SESSION_TTL_HOURS,
};
