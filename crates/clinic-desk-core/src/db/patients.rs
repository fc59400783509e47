//! Patient database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{now_ts, Patient};

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, name, phone, email, age, gender, address,
                medical_history, created_at, last_visit
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                patient.id,
                patient.name,
                patient.phone,
                patient.email,
                patient.age,
                patient.gender,
                patient.address,
                patient.medical_history,
                patient.created_at,
                patient.last_visit,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient.
    ///
    /// Updating counts as a visit: when the record carries no explicit
    /// `last_visit`, it is stamped to now.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let last_visit = patient.last_visit.clone().unwrap_or_else(now_ts);

        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                phone = ?3,
                email = ?4,
                age = ?5,
                gender = ?6,
                address = ?7,
                medical_history = ?8,
                last_visit = ?9
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.name,
                patient.phone,
                patient.email,
                patient.age,
                patient.gender,
                patient.address,
                patient.medical_history,
                last_visit,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, phone, email, age, gender, address,
                       medical_history, created_at, last_visit
                FROM patients
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(Patient {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        phone: row.get(2)?,
                        email: row.get(3)?,
                        age: row.get(4)?,
                        gender: row.get(5)?,
                        address: row.get(6)?,
                        medical_history: row.get(7)?,
                        created_at: row.get(8)?,
                        last_visit: row.get(9)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients, ordered by name.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, phone, email, age, gender, address,
                   medical_history, created_at, last_visit
            FROM patients
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Patient {
                id: row.get(0)?,
                name: row.get(1)?,
                phone: row.get(2)?,
                email: row.get(3)?,
                age: row.get(4)?,
                gender: row.get(5)?,
                address: row.get(6)?,
                medical_history: row.get(7)?,
                created_at: row.get(8)?,
                last_visit: row.get(9)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search patients by name, phone, or email.
    ///
    /// FTS5 (prefix matching, BM25) produces the candidate pool; candidates
    /// are then re-ranked by Jaro-Winkler similarity against the query so
    /// near-miss spellings surface above weak prefix hits.
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let escaped_query = escape_fts_query(query);
        if escaped_query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.name, p.phone, p.email, p.age, p.gender, p.address,
                   p.medical_history, p.created_at, p.last_visit,
                   bm25(patients_fts) as rank
            FROM patients p
            JOIN patients_fts fts ON p.rowid = fts.rowid
            WHERE patients_fts MATCH ?
            ORDER BY rank
            LIMIT ?
            "#,
        )?;

        // Overscan so the re-ranker has something to reorder
        let pool = (limit.max(1) * 3) as i64;
        let rows = stmt.query_map(params![escaped_query, pool], |row| {
            Ok(Patient {
                id: row.get(0)?,
                name: row.get(1)?,
                phone: row.get(2)?,
                email: row.get(3)?,
                age: row.get(4)?,
                gender: row.get(5)?,
                address: row.get(6)?,
                medical_history: row.get(7)?,
                created_at: row.get(8)?,
                last_visit: row.get(9)?,
            })
        })?;

        let mut candidates: Vec<Patient> = rows.collect::<Result<Vec<_>, _>>()?;

        let needle = query.trim().to_lowercase();
        candidates.sort_by(|a, b| {
            let score_a = match_score(&needle, a);
            let score_b = match_score(&needle, b);
            score_b
                .partial_cmp(&score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        candidates.truncate(limit);

        Ok(candidates)
    }

    /// Number of patient records on file.
    pub fn count_patients(&self) -> DbResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Best Jaro-Winkler similarity between the query and the patient's
/// searchable fields.
fn match_score(needle: &str, patient: &Patient) -> f64 {
    let name = strsim::jaro_winkler(needle, &patient.name.to_lowercase());
    let phone = strsim::jaro_winkler(needle, &patient.phone);
    let email = patient
        .email
        .as_deref()
        .map(|e| strsim::jaro_winkler(needle, &e.to_lowercase()))
        .unwrap_or(0.0);

    name.max(phone).max(email)
}

fn escape_fts_query(query: &str) -> String {
    // Remove special FTS5 operators and add wildcard for prefix matching
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    // Add prefix matching operator
    cleaned
        .split_whitespace()
        .map(|word| format!("{}*", word))
        .collect::<Vec<_>>()
        .join(" ")
}
