//! Staff onboarding and sign-in.
//!
//! Joins the credential vault (accounts, sessions) with the records store
//! (staff profiles). Registration is the only place the two are written
//! together, keyed by the vault's account id.

use thiserror::Error;

use clinic_desk_identity::{
    validate_registration, CredentialVault, IdentityError, Session, ValidationError,
};

use crate::db::{Database, DbError};
use crate::models::{Role, User};

/// Staff errors.
#[derive(Error, Debug)]
pub enum StaffError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("No staff profile for account {0}")]
    MissingProfile(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type StaffResult<T> = Result<T, StaffError>;

/// A successful registration or sign-in: the staff profile plus the live
/// session to present on later calls.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: User,
    pub session: Session,
}

/// Staff directory over the vault and the records store.
pub struct StaffDirectory<'a> {
    db: &'a Database,
    vault: &'a CredentialVault,
}

impl<'a> StaffDirectory<'a> {
    /// Create a directory over the given stores.
    pub fn new(db: &'a Database, vault: &'a CredentialVault) -> Self {
        Self { db, vault }
    }

    /// Register a staff member and sign them in.
    ///
    /// Runs the registration form rules first, then creates the vault
    /// account, then the profile row under the account's id.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: Role,
    ) -> StaffResult<SignIn> {
        validate_registration(name, email, password, confirm_password)?;

        let session = self.vault.register(email, password)?;
        let user = User::new(
            session.uid.clone(),
            name.trim().to_string(),
            session.email.clone(),
            role,
        );
        self.db.insert_user(&user)?;

        tracing::info!(role = %role, "staff registered");
        Ok(SignIn { user, session })
    }

    /// Sign a staff member in.
    pub fn sign_in(&self, email: &str, password: &str) -> StaffResult<SignIn> {
        let session = self.vault.authenticate(email, password)?;
        let user = self
            .db
            .get_user(&session.uid)?
            .ok_or_else(|| StaffError::MissingProfile(session.uid.clone()))?;

        Ok(SignIn { user, session })
    }

    /// Resolve a session token to its staff profile, or `None` when the
    /// session is unknown, signed out, or expired.
    pub fn current(&self, session_token: &str) -> StaffResult<Option<User>> {
        let Some(identity) = self.vault.session(session_token)? else {
            return Ok(None);
        };

        let user = self
            .db
            .get_user(&identity.uid)?
            .ok_or(StaffError::MissingProfile(identity.uid))?;
        Ok(Some(user))
    }

    /// End a session. Returns whether a live session was removed.
    pub fn sign_out(&self, session_token: &str) -> StaffResult<bool> {
        Ok(self.vault.end_session(session_token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Database, CredentialVault) {
        (
            Database::open_in_memory().unwrap(),
            CredentialVault::open_in_memory().unwrap(),
        )
    }

    #[test]
    fn test_register_creates_account_and_profile() {
        let (db, vault) = setup();
        let staff = StaffDirectory::new(&db, &vault);

        let signed = staff
            .register(
                "Noor Receptionist",
                "Noor@Clinic.Example",
                "letmein",
                "letmein",
                Role::Receptionist,
            )
            .unwrap();

        // Email lands normalized on both sides
        assert_eq!(signed.user.email, "noor@clinic.example");
        assert_eq!(signed.user.role, Role::Receptionist);

        let profile = db.get_user(&signed.user.uid).unwrap().unwrap();
        assert_eq!(profile.name, "Noor Receptionist");
    }

    #[test]
    fn test_register_validates_form_first() {
        let (db, vault) = setup();
        let staff = StaffDirectory::new(&db, &vault);

        let err = staff.register(
            "Noor",
            "not-an-email",
            "letmein",
            "letmein",
            Role::Receptionist,
        );
        assert!(matches!(err, Err(StaffError::Validation(_))));

        let mismatch = staff.register(
            "Noor",
            "noor@clinic.example",
            "letmein",
            "lemmein",
            Role::Receptionist,
        );
        assert!(matches!(mismatch, Err(StaffError::Validation(_))));
    }

    #[test]
    fn test_sign_in_roundtrip() {
        let (db, vault) = setup();
        let staff = StaffDirectory::new(&db, &vault);

        staff
            .register(
                "Dr. Ayesha Khan",
                "ayesha@clinic.example",
                "letmein",
                "letmein",
                Role::Doctor,
            )
            .unwrap();

        let signed = staff.sign_in("ayesha@clinic.example", "letmein").unwrap();
        assert_eq!(signed.user.role, Role::Doctor);

        let current = staff.current(&signed.session.token).unwrap().unwrap();
        assert_eq!(current.uid, signed.user.uid);
    }

    #[test]
    fn test_sign_out_invalidates_session() {
        let (db, vault) = setup();
        let staff = StaffDirectory::new(&db, &vault);

        let signed = staff
            .register(
                "Dr. Ayesha Khan",
                "ayesha@clinic.example",
                "letmein",
                "letmein",
                Role::Doctor,
            )
            .unwrap();

        assert!(staff.sign_out(&signed.session.token).unwrap());
        assert!(staff.current(&signed.session.token).unwrap().is_none());
        assert!(!staff.sign_out(&signed.session.token).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let (db, vault) = setup();
        let staff = StaffDirectory::new(&db, &vault);

        staff
            .register(
                "Dr. Ayesha Khan",
                "ayesha@clinic.example",
                "letmein",
                "letmein",
                Role::Doctor,
            )
            .unwrap();

        let err = staff.sign_in("ayesha@clinic.example", "wrong");
        assert!(matches!(
            err,
            Err(StaffError::Identity(IdentityError::InvalidCredentials))
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let (db, vault) = setup();
        let staff = StaffDirectory::new(&db, &vault);

        staff
            .register(
                "Dr. Ayesha Khan",
                "ayesha@clinic.example",
                "letmein",
                "letmein",
                Role::Doctor,
            )
            .unwrap();

        let err = staff.register(
            "Impostor",
            "ayesha@clinic.example",
            "lemmein2",
            "lemmein2",
            Role::Receptionist,
        );
        assert!(matches!(
            err,
            Err(StaffError::Identity(IdentityError::EmailTaken(_)))
        ));
    }
}
