//! Token queue engine.
//!
//! Wraps the token tables with the front-office rules: tokens are issued
//! against real patient records, numbers come from the per-day counter, and
//! status only ever moves forward.

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{local_day, now_ts, Token, TokenStatus};

/// Queue errors.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("No patient record: {0}")]
    UnknownPatient(String),

    #[error("No such token: {0}")]
    UnknownToken(String),

    #[error("Token cannot move from {from} to {to}")]
    InvalidTransition { from: TokenStatus, to: TokenStatus },

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// The day's walk-in queue.
pub struct TokenQueue<'a> {
    db: &'a Database,
}

impl<'a> TokenQueue<'a> {
    /// Create a queue over the given database.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Issue the next token of the current local day to a patient.
    ///
    /// The patient name on the token is read from the patient record, not
    /// taken from the caller.
    pub fn issue(&self, patient_id: &str) -> QueueResult<Token> {
        let patient = self
            .db
            .get_patient(patient_id)?
            .ok_or_else(|| QueueError::UnknownPatient(patient_id.to_string()))?;

        let day = local_day();
        let token = self.db.issue_token(&patient.id, &patient.name, &day)?;
        tracing::info!(number = token.number, %day, "token issued");
        Ok(token)
    }

    /// Advance a token to its next status.
    ///
    /// Only forward moves are accepted (waiting -> consulting -> completed,
    /// with waiting -> completed allowed for walk-outs). Reaching completed
    /// stamps `completed_at`. The read and write share one IMMEDIATE
    /// transaction so concurrent advances cannot both pass the check.
    pub fn advance(&self, token_id: &str, next: TokenStatus) -> QueueResult<Token> {
        let tx = self.db.immediate_transaction()?;

        let token = self
            .db
            .get_token(token_id)?
            .ok_or_else(|| QueueError::UnknownToken(token_id.to_string()))?;

        if !token.status.can_advance_to(next) {
            return Err(QueueError::InvalidTransition {
                from: token.status,
                to: next,
            });
        }

        let completed_at = if next == TokenStatus::Completed {
            Some(now_ts())
        } else {
            None
        };
        self.db
            .set_token_status(token_id, next, completed_at.as_deref())?;
        tx.commit().map_err(DbError::from)?;

        tracing::info!(number = token.number, status = %next, "token advanced");
        Ok(Token {
            status: next,
            completed_at,
            ..token
        })
    }

    /// Get a token by id.
    pub fn get(&self, token_id: &str) -> QueueResult<Option<Token>> {
        Ok(self.db.get_token(token_id)?)
    }

    /// Every token issued today, in queue order.
    pub fn today(&self) -> QueueResult<Vec<Token>> {
        Ok(self.db.list_tokens_for_day(&local_day())?)
    }

    /// Today's still-waiting tokens, in queue order.
    pub fn waiting(&self) -> QueueResult<Vec<Token>> {
        Ok(self.db.list_waiting_tokens(&local_day())?)
    }
}
