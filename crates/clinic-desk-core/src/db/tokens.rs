//! Queue token database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Token, TokenStatus};

impl Database {
    /// Issue the next token for a queue day.
    ///
    /// The per-day counter bump, the counter read, and the token insert all
    /// happen inside one IMMEDIATE transaction, so two desks issuing at the
    /// same moment cannot observe the same number. `UNIQUE (day, number)`
    /// backstops the invariant at the schema level.
    pub fn issue_token(&self, patient_id: &str, patient_name: &str, day: &str) -> DbResult<Token> {
        let tx = self.immediate_transaction()?;

        tx.execute(
            r#"
            INSERT INTO queue_counter (day, last_number) VALUES (?1, 1)
            ON CONFLICT(day) DO UPDATE SET last_number = last_number + 1
            "#,
            [day],
        )?;

        let number: u32 = tx.query_row(
            "SELECT last_number FROM queue_counter WHERE day = ?",
            [day],
            |row| row.get(0),
        )?;

        let token = Token::new(
            day.to_string(),
            number,
            patient_id.to_string(),
            patient_name.to_string(),
        );

        tx.execute(
            r#"
            INSERT INTO tokens (
                id, day, number, patient_id, patient_name,
                status, created_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                token.id,
                token.day,
                token.number,
                token.patient_id,
                token.patient_name,
                token.status.as_str(),
                token.created_at,
                token.completed_at,
            ],
        )?;

        tx.commit()?;
        Ok(token)
    }

    /// Get a token by id.
    pub fn get_token(&self, id: &str) -> DbResult<Option<Token>> {
        self.conn
            .query_row(
                r#"
                SELECT id, day, number, patient_id, patient_name,
                       status, created_at, completed_at
                FROM tokens
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(TokenRow {
                        id: row.get(0)?,
                        day: row.get(1)?,
                        number: row.get(2)?,
                        patient_id: row.get(3)?,
                        patient_name: row.get(4)?,
                        status: row.get(5)?,
                        created_at: row.get(6)?,
                        completed_at: row.get(7)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Overwrite a token's status.
    ///
    /// No transition checking happens here; [`crate::queue::TokenQueue::advance`]
    /// is the guarded path.
    pub fn set_token_status(
        &self,
        id: &str,
        status: TokenStatus,
        completed_at: Option<&str>,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE tokens SET status = ?2, completed_at = ?3 WHERE id = ?1",
            params![id, status.as_str(), completed_at],
        )?;
        Ok(rows_affected > 0)
    }

    /// List every token issued on a queue day, in queue order.
    pub fn list_tokens_for_day(&self, day: &str) -> DbResult<Vec<Token>> {
        self.query_tokens(
            r#"
            SELECT id, day, number, patient_id, patient_name,
                   status, created_at, completed_at
            FROM tokens
            WHERE day = ?
            ORDER BY number
            "#,
            day,
        )
    }

    /// List a day's still-waiting tokens, in queue order.
    pub fn list_waiting_tokens(&self, day: &str) -> DbResult<Vec<Token>> {
        self.query_tokens(
            r#"
            SELECT id, day, number, patient_id, patient_name,
                   status, created_at, completed_at
            FROM tokens
            WHERE day = ? AND status = 'waiting'
            ORDER BY number
            "#,
            day,
        )
    }

    fn query_tokens(&self, sql: &str, day: &str) -> DbResult<Vec<Token>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([day], |row| {
            Ok(TokenRow {
                id: row.get(0)?,
                day: row.get(1)?,
                number: row.get(2)?,
                patient_id: row.get(3)?,
                patient_name: row.get(4)?,
                status: row.get(5)?,
                created_at: row.get(6)?,
                completed_at: row.get(7)?,
            })
        })?;

        let mut tokens = Vec::new();
        for row in rows {
            tokens.push(row?.try_into()?);
        }
        Ok(tokens)
    }
}

/// Intermediate row struct for database mapping.
struct TokenRow {
    id: String,
    day: String,
    number: u32,
    patient_id: String,
    patient_name: String,
    status: String,
    created_at: String,
    completed_at: Option<String>,
}

impl TryFrom<TokenRow> for Token {
    type Error = DbError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        let status = TokenStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown token status: {}", row.status)))?;

        Ok(Token {
            id: row.id,
            day: row.day,
            number: row.number,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            status,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;

    fn setup_db() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new(
            "Alice Fernandes".into(),
            "555-0101".into(),
            34,
            "female".into(),
            "12 Harbour Road".into(),
        );
        db.insert_patient(&patient).unwrap();
        (db, patient.id)
    }

    #[test]
    fn test_issue_numbers_sequentially() {
        let (db, patient_id) = setup_db();

        let t1 = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        let t2 = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        let t3 = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();

        assert_eq!(t1.number, 1);
        assert_eq!(t2.number, 2);
        assert_eq!(t3.number, 3);
        assert_eq!(t1.status, TokenStatus::Waiting);
    }

    #[test]
    fn test_numbers_reset_each_day() {
        let (db, patient_id) = setup_db();

        db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        let next_day = db.issue_token(&patient_id, "Alice", "2026-08-26").unwrap();

        assert_eq!(next_day.number, 1);
    }

    #[test]
    fn test_get_token_roundtrip() {
        let (db, patient_id) = setup_db();

        let issued = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        let retrieved = db.get_token(&issued.id).unwrap().unwrap();
        assert_eq!(retrieved, issued);

        assert!(db.get_token("no-such-token").unwrap().is_none());
    }

    #[test]
    fn test_set_status() {
        let (db, patient_id) = setup_db();

        let token = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        db.set_token_status(&token.id, TokenStatus::Consulting, None)
            .unwrap();

        let retrieved = db.get_token(&token.id).unwrap().unwrap();
        assert_eq!(retrieved.status, TokenStatus::Consulting);
        assert!(retrieved.completed_at.is_none());
    }

    #[test]
    fn test_waiting_list_filters_and_orders() {
        let (db, patient_id) = setup_db();

        let t1 = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        let _t2 = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        let t3 = db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();

        db.set_token_status(&t1.id, TokenStatus::Consulting, None)
            .unwrap();

        let waiting = db.list_waiting_tokens("2026-08-25").unwrap();
        assert_eq!(waiting.len(), 2);
        assert_eq!(waiting[0].number, 2);
        assert_eq!(waiting[1].number, 3);
        assert_eq!(waiting[1].id, t3.id);
    }

    #[test]
    fn test_day_list_is_day_scoped() {
        let (db, patient_id) = setup_db();

        db.issue_token(&patient_id, "Alice", "2026-08-25").unwrap();
        db.issue_token(&patient_id, "Alice", "2026-08-26").unwrap();

        let today = db.list_tokens_for_day("2026-08-25").unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].day, "2026-08-25");
    }
}
