//! Prescription models.

use serde::{Deserialize, Serialize};

/// One medication line on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Medication name
    pub name: String,
    /// Dose per intake (e.g. "500mg")
    pub dosage: String,
    /// Intake frequency (e.g. "twice daily")
    pub frequency: String,
    /// Course length (e.g. "5 days")
    pub duration: String,
}

/// A prescription written during a consultation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Prescription id (UUID)
    pub id: String,
    /// Patient the prescription is for
    pub patient_id: String,
    /// Prescribing doctor's account id
    pub doctor_id: String,
    /// Prescribing doctor's name at write time
    pub doctor_name: String,
    /// Diagnosis text
    pub diagnosis: String,
    /// Medication lines
    pub medications: Vec<Medication>,
    /// Free-text notes for the patient
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Prescription {
    /// Create a new prescription.
    pub fn new(
        patient_id: String,
        doctor_id: String,
        doctor_name: String,
        diagnosis: String,
        medications: Vec<Medication>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            doctor_id,
            doctor_name,
            diagnosis,
            medications,
            notes: None,
            created_at: super::now_ts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_prescription() {
        let rx = Prescription::new(
            "p-1".into(),
            "d-1".into(),
            "Dr. Ayesha Khan".into(),
            "Seasonal flu".into(),
            vec![Medication {
                name: "Paracetamol".into(),
                dosage: "500mg".into(),
                frequency: "three times daily".into(),
                duration: "3 days".into(),
            }],
        );
        assert_eq!(rx.id.len(), 36);
        assert_eq!(rx.medications.len(), 1);
        assert!(rx.notes.is_none());
    }
}
