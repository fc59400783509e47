//! End-of-day sheet.
//!
//! The one-page summary the front desk prints before closing: queue
//! counts, money in, money owed, and the full token list.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::db::{Database, DbResult};
use crate::models::{now_ts, TokenStatus};

/// One token line on the day sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySheetRow {
    /// Queue number
    pub number: u32,
    /// Patient name at issue time
    pub patient_name: String,
    /// Final status for the day
    pub status: String,
    /// Issue timestamp
    pub issued_at: String,
    /// Completion timestamp, when reached
    pub completed_at: Option<String>,
}

/// A compiled day sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySheet {
    /// Queue day, `YYYY-MM-DD` local
    pub day: String,
    /// Compilation timestamp
    pub generated_at: String,
    /// Patient records on file (all time)
    pub patients_on_file: u64,
    /// Tokens issued on the day
    pub tokens_issued: usize,
    /// Of those, still waiting
    pub waiting: usize,
    /// Of those, in the consulting room
    pub consulting: usize,
    /// Of those, completed
    pub completed: usize,
    /// Bills raised on the day
    pub bills_raised: usize,
    /// Sum of the day's bill totals
    pub total_billed: f64,
    /// Portion of `total_billed` already paid
    pub total_collected: f64,
    /// What is still owed from the day
    pub outstanding: f64,
    /// Token list in queue order
    pub rows: Vec<DaySheetRow>,
}

impl DaySheet {
    /// Compile the sheet for a queue day.
    pub fn compile(db: &Database, day: &str) -> DbResult<DaySheet> {
        let tokens = db.list_tokens_for_day(day)?;
        let bills = db.list_bills_for_day(day)?;

        let mut waiting = 0;
        let mut consulting = 0;
        let mut completed = 0;
        for token in &tokens {
            match token.status {
                TokenStatus::Waiting => waiting += 1,
                TokenStatus::Consulting => consulting += 1,
                TokenStatus::Completed => completed += 1,
            }
        }

        let total_billed: f64 = bills.iter().map(|b| b.total_amount).sum();
        let total_collected: f64 = bills
            .iter()
            .filter(|b| b.is_paid())
            .map(|b| b.total_amount)
            .sum();

        let rows = tokens
            .iter()
            .map(|token| DaySheetRow {
                number: token.number,
                patient_name: token.patient_name.clone(),
                status: token.status.as_str().to_string(),
                issued_at: token.created_at.clone(),
                completed_at: token.completed_at.clone(),
            })
            .collect();

        Ok(DaySheet {
            day: day.to_string(),
            generated_at: now_ts(),
            patients_on_file: db.count_patients()?,
            tokens_issued: tokens.len(),
            waiting,
            consulting,
            completed,
            bills_raised: bills.len(),
            total_billed,
            total_collected,
            outstanding: total_billed - total_collected,
            rows,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the token list to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("number,patient_name,status,issued_at,completed_at\n");

        // Lines
        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                row.number,
                escape_csv(&row.patient_name),
                escape_csv(&row.status),
                escape_csv(&row.issued_at),
                row.completed_at
                    .as_deref()
                    .map(escape_csv)
                    .unwrap_or_default(),
            ));
        }

        csv
    }
}
