//! Clinic-Desk Core Library
//!
//! Local-first front office for a small clinic: staff accounts, patient
//! records, the daily walk-in queue, prescriptions, and billing.
//!
//! # Architecture
//!
//! ```text
//!            Sign-in (session token)
//!                      │
//!              [StaffDirectory]──────[CredentialVault] (identity.sqlite3)
//!                      │
//!              role check (access)
//!                      │
//!        ┌─────────────┼──────────────┐
//!        ▼             ▼              ▼
//!    Patients     [TokenQueue]     Billing
//!    (records)    issue/advance    bills + payments
//!        │             │              │
//!        └─────────────┼──────────────┘
//!                      ▼
//!              [Database] (records.sqlite3)
//!                      │
//!                      ▼
//!            Exports: billing CSV/JSON, day sheet
//! ```
//!
//! # Core Principle
//!
//! **Queue numbers are handed out by the store, not the caller.** Token
//! issuance is transactional, so two desks can never hold the same number.
//!
//! # Modules
//!
//! - [`db`]: SQLite records store with FTS5 patient search
//! - [`models`]: Domain types (User, Patient, Token, Prescription, Bill)
//! - [`queue`]: Token lifecycle engine
//! - [`staff`]: Registration and sign-in over the credential vault
//! - [`access`]: Role-based action rules
//! - [`export`]: Billing extracts and the day sheet

pub mod access;
pub mod db;
pub mod export;
pub mod models;
pub mod queue;
pub mod staff;

// Re-export commonly used types
pub use clinic_desk_identity::{CredentialVault, Session};
pub use db::Database;
pub use export::{BillingBatch, BillingEntry, BillingExporter, DaySheet, DaySheetRow};
pub use models::{
    Bill, BillItem, BillStatus, Medication, Patient, Prescription, Role, Token, TokenStatus, User,
};
pub use queue::TokenQueue;
pub use staff::{SignIn, StaffDirectory};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use access::Action;
use models::local_day;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for ClinicError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => ClinicError::NotFound(what),
            db::DbError::Constraint(what) => ClinicError::InvalidInput(what),
            other => ClinicError::DatabaseError(other.to_string()),
        }
    }
}

impl From<queue::QueueError> for ClinicError {
    fn from(e: queue::QueueError) -> Self {
        match e {
            queue::QueueError::UnknownPatient(_) | queue::QueueError::UnknownToken(_) => {
                ClinicError::NotFound(e.to_string())
            }
            queue::QueueError::InvalidTransition { .. } => ClinicError::InvalidInput(e.to_string()),
            queue::QueueError::Db(db_err) => db_err.into(),
        }
    }
}

impl From<staff::StaffError> for ClinicError {
    fn from(e: staff::StaffError) -> Self {
        match e {
            staff::StaffError::Validation(v) => ClinicError::InvalidInput(v.to_string()),
            staff::StaffError::Identity(i) => match i {
                clinic_desk_identity::IdentityError::Storage(err) => {
                    ClinicError::DatabaseError(err.to_string())
                }
                other => ClinicError::AuthError(other.to_string()),
            },
            staff::StaffError::MissingProfile(uid) => {
                ClinicError::AuthError(format!("No staff profile for account {uid}"))
            }
            staff::StaffError::Db(db_err) => db_err.into(),
        }
    }
}

impl From<access::AccessError> for ClinicError {
    fn from(e: access::AccessError) -> Self {
        ClinicError::PermissionDenied(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(e: serde_json::Error) -> Self {
        ClinicError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the clinic stores at the given paths.
#[uniffi::export]
pub fn open_clinic(
    records_path: String,
    identity_path: String,
) -> Result<Arc<ClinicCore>, ClinicError> {
    let db = Database::open(&records_path)?;
    let vault = CredentialVault::open(&identity_path)
        .map_err(|e| ClinicError::DatabaseError(e.to_string()))?;
    Ok(Arc::new(ClinicCore {
        db: Arc::new(Mutex::new(db)),
        vault: Arc::new(Mutex::new(vault)),
    }))
}

/// Create in-memory clinic stores (for testing).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<ClinicCore>, ClinicError> {
    let db = Database::open_in_memory()?;
    let vault = CredentialVault::open_in_memory()
        .map_err(|e| ClinicError::DatabaseError(e.to_string()))?;
    Ok(Arc::new(ClinicCore {
        db: Arc::new(Mutex::new(db)),
        vault: Arc::new(Mutex::new(vault)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic handle for FFI.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
    vault: Arc<Mutex<CredentialVault>>,
}

/// Resolve the session and check the action before touching the stores.
fn authorized_user(
    db: &Database,
    vault: &CredentialVault,
    session_token: &str,
    action: Action,
) -> Result<User, ClinicError> {
    let staff = StaffDirectory::new(db, vault);
    let user = staff
        .current(session_token)?
        .ok_or_else(|| ClinicError::AuthError("Not signed in".to_string()))?;
    access::authorize(user.role, action)?;
    Ok(user)
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Staff Operations
    // =========================================================================

    /// Register a staff member and sign them in.
    pub fn register_staff(
        &self,
        name: String,
        email: String,
        password: String,
        confirm_password: String,
        role: String,
    ) -> Result<FfiSignIn, ClinicError> {
        let role = Role::parse(&role)
            .ok_or_else(|| ClinicError::InvalidInput(format!("Unknown role: {role}")))?;
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        let staff = StaffDirectory::new(&db, &vault);
        let signed = staff.register(&name, &email, &password, &confirm_password, role)?;
        Ok(signed.into())
    }

    /// Sign a staff member in.
    pub fn sign_in(&self, email: String, password: String) -> Result<FfiSignIn, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        let staff = StaffDirectory::new(&db, &vault);
        let signed = staff.sign_in(&email, &password)?;
        Ok(signed.into())
    }

    /// Resolve a session token to its staff profile, if still signed in.
    pub fn current_user(&self, session_token: String) -> Result<Option<FfiUser>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        let staff = StaffDirectory::new(&db, &vault);
        Ok(staff.current(&session_token)?.map(|u| u.into()))
    }

    /// End a session. Returns whether a live session was removed.
    pub fn sign_out(&self, session_token: String) -> Result<bool, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        let staff = StaffDirectory::new(&db, &vault);
        Ok(staff.sign_out(&session_token)?)
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a new patient.
    pub fn add_patient(
        &self,
        session_token: String,
        intake: FfiNewPatient,
    ) -> Result<FfiPatient, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManagePatients)?;

        let mut patient = Patient::new(
            intake.name,
            intake.phone,
            intake.age,
            intake.gender,
            intake.address,
        );
        patient.email = intake.email;
        patient.medical_history = intake.medical_history;

        db.insert_patient(&patient)?;
        Ok(patient.into())
    }

    /// Update a patient record. Stamps `last_visit` unless the record
    /// carries one.
    pub fn update_patient(
        &self,
        session_token: String,
        patient: FfiPatient,
    ) -> Result<FfiPatient, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManagePatients)?;

        let record: Patient = patient.into();
        if !db.update_patient(&record)? {
            return Err(ClinicError::NotFound(format!("patient {}", record.id)));
        }
        let updated = db
            .get_patient(&record.id)?
            .ok_or_else(|| ClinicError::NotFound(format!("patient {}", record.id)))?;
        Ok(updated.into())
    }

    /// Get a patient by id.
    pub fn get_patient(
        &self,
        session_token: String,
        patient_id: String,
    ) -> Result<Option<FfiPatient>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewPatients)?;
        Ok(db.get_patient(&patient_id)?.map(|p| p.into()))
    }

    /// List all patients, ordered by name.
    pub fn list_patients(&self, session_token: String) -> Result<Vec<FfiPatient>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewPatients)?;
        Ok(db.list_patients()?.into_iter().map(|p| p.into()).collect())
    }

    /// Search patients by name, phone, or email.
    pub fn search_patients(
        &self,
        session_token: String,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewPatients)?;
        let patients = db.search_patients(&query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Queue Operations
    // =========================================================================

    /// Issue the next queue token of the day to a patient.
    pub fn issue_token(
        &self,
        session_token: String,
        patient_id: String,
    ) -> Result<FfiToken, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::IssueToken)?;

        let queue = TokenQueue::new(&db);
        Ok(queue.issue(&patient_id)?.into())
    }

    /// Advance a token to the given status (`"consulting"` or `"completed"`).
    pub fn advance_token(
        &self,
        session_token: String,
        token_id: String,
        status: String,
    ) -> Result<FfiToken, ClinicError> {
        let next = TokenStatus::parse(&status)
            .ok_or_else(|| ClinicError::InvalidInput(format!("Unknown token status: {status}")))?;

        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::AdvanceToken)?;

        let queue = TokenQueue::new(&db);
        Ok(queue.advance(&token_id, next)?.into())
    }

    /// Get a token by id.
    pub fn get_token(
        &self,
        session_token: String,
        token_id: String,
    ) -> Result<Option<FfiToken>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewQueue)?;
        Ok(db.get_token(&token_id)?.map(|t| t.into()))
    }

    /// Every token issued today, in queue order.
    pub fn todays_tokens(&self, session_token: String) -> Result<Vec<FfiToken>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewQueue)?;

        let queue = TokenQueue::new(&db);
        Ok(queue.today()?.into_iter().map(|t| t.into()).collect())
    }

    /// Today's still-waiting tokens, in queue order.
    pub fn waiting_tokens(&self, session_token: String) -> Result<Vec<FfiToken>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewQueue)?;

        let queue = TokenQueue::new(&db);
        Ok(queue.waiting()?.into_iter().map(|t| t.into()).collect())
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Write a prescription. The prescribing doctor is the signed-in user.
    pub fn create_prescription(
        &self,
        session_token: String,
        draft: FfiNewPrescription,
    ) -> Result<FfiPrescription, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        let doctor = authorized_user(&db, &vault, &session_token, Action::WritePrescription)?;

        db.get_patient(&draft.patient_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("patient {}", draft.patient_id)))?;

        let mut prescription = Prescription::new(
            draft.patient_id,
            doctor.uid,
            doctor.name,
            draft.diagnosis,
            draft.medications.into_iter().map(|m| m.into()).collect(),
        );
        prescription.notes = draft.notes;

        db.insert_prescription(&prescription)?;
        Ok(prescription.into())
    }

    /// Rewrite a prescription's clinical content. Authorship stays with the
    /// original doctor.
    pub fn update_prescription(
        &self,
        session_token: String,
        prescription_id: String,
        diagnosis: String,
        medications: Vec<FfiMedication>,
        notes: Option<String>,
    ) -> Result<FfiPrescription, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::WritePrescription)?;

        let mut prescription = db
            .get_prescription(&prescription_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("prescription {prescription_id}")))?;
        prescription.diagnosis = diagnosis;
        prescription.medications = medications.into_iter().map(|m| m.into()).collect();
        prescription.notes = notes;

        if !db.update_prescription(&prescription)? {
            return Err(ClinicError::NotFound(format!(
                "prescription {prescription_id}"
            )));
        }
        Ok(prescription.into())
    }

    /// Get a prescription by id.
    pub fn get_prescription(
        &self,
        session_token: String,
        prescription_id: String,
    ) -> Result<Option<FfiPrescription>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewPrescriptions)?;
        Ok(db.get_prescription(&prescription_id)?.map(|p| p.into()))
    }

    /// A patient's prescriptions, newest first.
    pub fn patient_prescriptions(
        &self,
        session_token: String,
        patient_id: String,
    ) -> Result<Vec<FfiPrescription>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ViewPrescriptions)?;

        let prescriptions = db.list_prescriptions_for_patient(&patient_id)?;
        Ok(prescriptions.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Billing Operations
    // =========================================================================

    /// Raise a bill for a visit. The total is the sum of the items.
    pub fn create_bill(
        &self,
        session_token: String,
        draft: FfiNewBill,
    ) -> Result<FfiBill, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManageBilling)?;

        let patient = db
            .get_patient(&draft.patient_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("patient {}", draft.patient_id)))?;
        db.get_token(&draft.token_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("token {}", draft.token_id)))?;
        if let Some(prescription_id) = &draft.prescription_id {
            db.get_prescription(prescription_id)?
                .ok_or_else(|| ClinicError::NotFound(format!("prescription {prescription_id}")))?;
        }

        let mut bill = Bill::new(
            patient.id,
            patient.name,
            draft.token_id,
            draft.items.into_iter().map(|i| i.into()).collect(),
        );
        bill.prescription_id = draft.prescription_id;

        db.insert_bill(&bill)?;
        tracing::info!(total = bill.total_amount, "bill raised");
        Ok(bill.into())
    }

    /// Settle a bill. Paying twice is a no-op that keeps the original
    /// payment stamp.
    pub fn pay_bill(&self, session_token: String, bill_id: String) -> Result<FfiBill, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManageBilling)?;

        let bill = db.mark_bill_paid(&bill_id)?;
        tracing::info!(total = bill.total_amount, "bill settled");
        Ok(bill.into())
    }

    /// Get a bill by id.
    pub fn get_bill(
        &self,
        session_token: String,
        bill_id: String,
    ) -> Result<Option<FfiBill>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManageBilling)?;
        Ok(db.get_bill(&bill_id)?.map(|b| b.into()))
    }

    /// A patient's bills, newest first.
    pub fn patient_bills(
        &self,
        session_token: String,
        patient_id: String,
    ) -> Result<Vec<FfiBill>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManageBilling)?;

        let bills = db.list_bills_for_patient(&patient_id)?;
        Ok(bills.into_iter().map(|b| b.into()).collect())
    }

    /// Every unpaid bill, oldest first.
    pub fn unpaid_bills(&self, session_token: String) -> Result<Vec<FfiBill>, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManageBilling)?;

        let bills = db.list_unpaid_bills()?;
        Ok(bills.into_iter().map(|b| b.into()).collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export a day's billing as JSON. Defaults to today.
    pub fn export_billing_json(
        &self,
        session_token: String,
        day: Option<String>,
    ) -> Result<String, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManageBilling)?;

        let day = day.unwrap_or_else(local_day);
        let batch = BillingExporter::new(&db).export_for_day(&day)?;
        Ok(batch.to_json()?)
    }

    /// Export a day's billing as CSV. Defaults to today.
    pub fn export_billing_csv(
        &self,
        session_token: String,
        day: Option<String>,
    ) -> Result<String, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ManageBilling)?;

        let day = day.unwrap_or_else(local_day);
        let batch = BillingExporter::new(&db).export_for_day(&day)?;
        Ok(batch.to_csv())
    }

    /// Compile a day sheet as JSON. Defaults to today.
    pub fn day_sheet_json(
        &self,
        session_token: String,
        day: Option<String>,
    ) -> Result<String, ClinicError> {
        let vault = self.vault.lock()?;
        let db = self.db.lock()?;
        authorized_user(&db, &vault, &session_token, Action::ExportDaySheet)?;

        let day = day.unwrap_or_else(local_day);
        let sheet = DaySheet::compile(&db, &day)?;
        Ok(sheet.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe sign-in result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSignIn {
    pub user: FfiUser,
    pub session_token: String,
    pub expires_at: String,
}

impl From<SignIn> for FfiSignIn {
    fn from(signed: SignIn) -> Self {
        Self {
            user: signed.user.into(),
            session_token: signed.session.token,
            expires_at: signed.session.expires_at,
        }
    }
}

/// FFI-safe staff profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for FfiUser {
    fn from(user: User) -> Self {
        Self {
            uid: user.uid,
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

/// FFI-safe patient intake form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub name: String,
    pub phone: String,
    pub age: u32,
    pub gender: String,
    pub address: String,
    pub email: Option<String>,
    pub medical_history: Option<String>,
}

/// FFI-safe patient record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub age: u32,
    pub gender: String,
    pub address: String,
    pub medical_history: Option<String>,
    pub created_at: String,
    pub last_visit: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            phone: patient.phone,
            email: patient.email,
            age: patient.age,
            gender: patient.gender,
            address: patient.address,
            medical_history: patient.medical_history,
            created_at: patient.created_at,
            last_visit: patient.last_visit,
        }
    }
}

impl From<FfiPatient> for Patient {
    fn from(patient: FfiPatient) -> Self {
        Patient {
            id: patient.id,
            name: patient.name,
            phone: patient.phone,
            email: patient.email,
            age: patient.age,
            gender: patient.gender,
            address: patient.address,
            medical_history: patient.medical_history,
            created_at: patient.created_at,
            last_visit: patient.last_visit,
        }
    }
}

/// FFI-safe queue token.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiToken {
    pub id: String,
    pub day: String,
    pub number: u32,
    pub patient_id: String,
    pub patient_name: String,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl From<Token> for FfiToken {
    fn from(token: Token) -> Self {
        Self {
            id: token.id,
            day: token.day,
            number: token.number,
            patient_id: token.patient_id,
            patient_name: token.patient_name,
            status: token.status.as_str().to_string(),
            created_at: token.created_at,
            completed_at: token.completed_at,
        }
    }
}

/// FFI-safe medication line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

impl From<Medication> for FfiMedication {
    fn from(medication: Medication) -> Self {
        Self {
            name: medication.name,
            dosage: medication.dosage,
            frequency: medication.frequency,
            duration: medication.duration,
        }
    }
}

impl From<FfiMedication> for Medication {
    fn from(medication: FfiMedication) -> Self {
        Medication {
            name: medication.name,
            dosage: medication.dosage,
            frequency: medication.frequency,
            duration: medication.duration,
        }
    }
}

/// FFI-safe prescription draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPrescription {
    pub patient_id: String,
    pub diagnosis: String,
    pub medications: Vec<FfiMedication>,
    pub notes: Option<String>,
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub diagnosis: String,
    pub medications: Vec<FfiMedication>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Prescription> for FfiPrescription {
    fn from(prescription: Prescription) -> Self {
        Self {
            id: prescription.id,
            patient_id: prescription.patient_id,
            doctor_id: prescription.doctor_id,
            doctor_name: prescription.doctor_name,
            diagnosis: prescription.diagnosis,
            medications: prescription
                .medications
                .into_iter()
                .map(|m| m.into())
                .collect(),
            notes: prescription.notes,
            created_at: prescription.created_at,
        }
    }
}

/// FFI-safe bill charge line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBillItem {
    pub description: String,
    pub amount: f64,
}

impl From<BillItem> for FfiBillItem {
    fn from(item: BillItem) -> Self {
        Self {
            description: item.description,
            amount: item.amount,
        }
    }
}

impl From<FfiBillItem> for BillItem {
    fn from(item: FfiBillItem) -> Self {
        BillItem {
            description: item.description,
            amount: item.amount,
        }
    }
}

/// FFI-safe bill draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewBill {
    pub patient_id: String,
    pub token_id: String,
    pub prescription_id: Option<String>,
    pub items: Vec<FfiBillItem>,
}

/// FFI-safe bill.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBill {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub token_id: String,
    pub prescription_id: Option<String>,
    pub items: Vec<FfiBillItem>,
    pub total_amount: f64,
    pub status: String,
    pub created_at: String,
    pub paid_at: Option<String>,
}

impl From<Bill> for FfiBill {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id,
            patient_id: bill.patient_id,
            patient_name: bill.patient_name,
            token_id: bill.token_id,
            prescription_id: bill.prescription_id,
            items: bill.items.into_iter().map(|i| i.into()).collect(),
            total_amount: bill.total_amount,
            status: bill.status.as_str().to_string(),
            created_at: bill.created_at,
            paid_at: bill.paid_at,
        }
    }
}
