//! Billing export for accounting handoff.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::db::{Database, DbResult};
use crate::models::{now_ts, Bill};

/// One exported charge line. Bills are flattened to one row per item so the
/// output drops straight into a spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingEntry {
    /// Bill id
    pub bill_id: String,
    /// Patient record id
    pub patient_id: String,
    /// Patient name at billing time
    pub patient_name: String,
    /// Visit token the bill covers
    pub token_id: String,
    /// Charge description
    pub description: String,
    /// Charge amount
    pub amount: f64,
    /// Payment status of the whole bill
    pub status: String,
    /// Bill creation timestamp
    pub created_at: String,
    /// Payment timestamp, when paid
    pub paid_at: Option<String>,
}

/// A billing extract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingBatch {
    /// Export timestamp
    pub exported_at: String,
    /// Flattened charge lines
    pub entries: Vec<BillingEntry>,
    /// Sum of the covered bills' totals
    pub total_billed: f64,
    /// Portion of `total_billed` already paid
    pub total_collected: f64,
}

impl BillingBatch {
    fn from_bills(bills: &[Bill]) -> Self {
        let mut entries = Vec::new();
        let mut total_billed = 0.0;
        let mut total_collected = 0.0;

        for bill in bills {
            total_billed += bill.total_amount;
            if bill.is_paid() {
                total_collected += bill.total_amount;
            }
            for item in &bill.items {
                entries.push(BillingEntry {
                    bill_id: bill.id.clone(),
                    patient_id: bill.patient_id.clone(),
                    patient_name: bill.patient_name.clone(),
                    token_id: bill.token_id.clone(),
                    description: item.description.clone(),
                    amount: item.amount,
                    status: bill.status.as_str().to_string(),
                    created_at: bill.created_at.clone(),
                    paid_at: bill.paid_at.clone(),
                });
            }
        }

        Self {
            exported_at: now_ts(),
            entries,
            total_billed,
            total_collected,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(
            "bill_id,patient_id,patient_name,token_id,description,amount,status,created_at,paid_at\n",
        );

        // Lines
        for entry in &self.entries {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                escape_csv(&entry.bill_id),
                escape_csv(&entry.patient_id),
                escape_csv(&entry.patient_name),
                escape_csv(&entry.token_id),
                escape_csv(&entry.description),
                entry.amount,
                escape_csv(&entry.status),
                escape_csv(&entry.created_at),
                entry.paid_at.as_deref().map(escape_csv).unwrap_or_default(),
            ));
        }

        csv
    }
}

/// Billing exporter.
pub struct BillingExporter<'a> {
    db: &'a Database,
}

impl<'a> BillingExporter<'a> {
    /// Create a new billing exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Export every bill raised on a local queue day.
    pub fn export_for_day(&self, day: &str) -> DbResult<BillingBatch> {
        let bills = self.db.list_bills_for_day(day)?;
        Ok(BillingBatch::from_bills(&bills))
    }

    /// Export a patient's billing history.
    pub fn export_for_patient(&self, patient_id: &str) -> DbResult<BillingBatch> {
        let bills = self.db.list_bills_for_patient(patient_id)?;
        Ok(BillingBatch::from_bills(&bills))
    }

    /// Export the outstanding ledger: every unpaid bill.
    pub fn export_unpaid(&self) -> DbResult<BillingBatch> {
        let bills = self.db.list_unpaid_bills()?;
        Ok(BillingBatch::from_bills(&bills))
    }
}
