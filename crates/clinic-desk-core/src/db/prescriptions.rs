//! Prescription database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Medication, Prescription};

impl Database {
    /// Insert a new prescription.
    pub fn insert_prescription(&self, prescription: &Prescription) -> DbResult<()> {
        let medications_json = serde_json::to_string(&prescription.medications)?;

        self.conn.execute(
            r#"
            INSERT INTO prescriptions (
                id, patient_id, doctor_id, doctor_name, diagnosis,
                medications, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                prescription.id,
                prescription.patient_id,
                prescription.doctor_id,
                prescription.doctor_name,
                prescription.diagnosis,
                medications_json,
                prescription.notes,
                prescription.created_at,
            ],
        )?;
        Ok(())
    }

    /// Update a prescription's clinical content.
    pub fn update_prescription(&self, prescription: &Prescription) -> DbResult<bool> {
        let medications_json = serde_json::to_string(&prescription.medications)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE prescriptions SET
                diagnosis = ?2,
                medications = ?3,
                notes = ?4
            WHERE id = ?1
            "#,
            params![
                prescription.id,
                prescription.diagnosis,
                medications_json,
                prescription.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a prescription by id.
    pub fn get_prescription(&self, id: &str) -> DbResult<Option<Prescription>> {
        self.conn
            .query_row(
                r#"
                SELECT id, patient_id, doctor_id, doctor_name, diagnosis,
                       medications, notes, created_at
                FROM prescriptions
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(PrescriptionRow {
                        id: row.get(0)?,
                        patient_id: row.get(1)?,
                        doctor_id: row.get(2)?,
                        doctor_name: row.get(3)?,
                        diagnosis: row.get(4)?,
                        medications: row.get(5)?,
                        notes: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a patient's prescriptions, newest first.
    pub fn list_prescriptions_for_patient(&self, patient_id: &str) -> DbResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, doctor_id, doctor_name, diagnosis,
                   medications, notes, created_at
            FROM prescriptions
            WHERE patient_id = ?
            ORDER BY created_at DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(PrescriptionRow {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                doctor_id: row.get(2)?,
                doctor_name: row.get(3)?,
                diagnosis: row.get(4)?,
                medications: row.get(5)?,
                notes: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;

        let mut prescriptions = Vec::new();
        for row in rows {
            prescriptions.push(row?.try_into()?);
        }
        Ok(prescriptions)
    }
}

/// Intermediate row struct for database mapping.
struct PrescriptionRow {
    id: String,
    patient_id: String,
    doctor_id: String,
    doctor_name: String,
    diagnosis: String,
    medications: String,
    notes: Option<String>,
    created_at: String,
}

impl TryFrom<PrescriptionRow> for Prescription {
    type Error = DbError;

    fn try_from(row: PrescriptionRow) -> Result<Self, Self::Error> {
        let medications: Vec<Medication> = serde_json::from_str(&row.medications)?;

        Ok(Prescription {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            doctor_name: row.doctor_name,
            diagnosis: row.diagnosis,
            medications,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}
