//! Patient record models.

use serde::{Deserialize, Serialize};

/// A clinic patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Record id (UUID)
    pub id: String,
    /// Full name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Contact email
    pub email: Option<String>,
    /// Age in years
    pub age: u32,
    /// Gender as given at registration
    pub gender: String,
    /// Home address
    pub address: String,
    /// Free-text medical history
    pub medical_history: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Most recent visit timestamp
    pub last_visit: Option<String>,
}

impl Patient {
    /// Create a new patient with the required intake fields.
    pub fn new(name: String, phone: String, age: u32, gender: String, address: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            phone,
            email: None,
            age,
            gender,
            address,
            medical_history: None,
            created_at: super::now_ts(),
            last_visit: None,
        }
    }

    /// Whether the patient has been seen before.
    pub fn is_returning(&self) -> bool {
        self.last_visit.is_some()
    }

    /// Stamp the most recent visit to now.
    pub fn record_visit(&mut self) {
        self.last_visit = Some(super::now_ts());
    }
}
