//! Billing models.

use serde::{Deserialize, Serialize};

/// Bill payment status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Awaiting payment
    Pending,
    /// Settled in full
    Paid,
}

impl BillStatus {
    /// Canonical lowercase name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Paid => "paid",
        }
    }

    /// Parse the canonical lowercase name.
    pub fn parse(s: &str) -> Option<BillStatus> {
        match s {
            "pending" => Some(BillStatus::Pending),
            "paid" => Some(BillStatus::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One charge line on a bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillItem {
    /// What the charge is for
    pub description: String,
    /// Charge amount
    pub amount: f64,
}

/// A bill raised against a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    /// Bill id (UUID)
    pub id: String,
    /// Patient being billed
    pub patient_id: String,
    /// Patient name at billing time (denormalized for display)
    pub patient_name: String,
    /// Queue token for the visit this bill covers
    pub token_id: String,
    /// Prescription the charges came from, when there is one
    pub prescription_id: Option<String>,
    /// Charge lines
    pub items: Vec<BillItem>,
    /// Sum of the charge lines. Derived, never caller-supplied.
    pub total_amount: f64,
    /// Payment status
    pub status: BillStatus,
    /// Creation timestamp
    pub created_at: String,
    /// Set once, when the bill is first paid
    pub paid_at: Option<String>,
}

impl Bill {
    /// Create a pending bill. The total is computed from the items.
    pub fn new(
        patient_id: String,
        patient_name: String,
        token_id: String,
        items: Vec<BillItem>,
    ) -> Self {
        let total_amount = items.iter().map(|item| item.amount).sum();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            patient_name,
            token_id,
            prescription_id: None,
            items,
            total_amount,
            status: BillStatus::Pending,
            created_at: super::now_ts(),
            paid_at: None,
        }
    }

    /// Whether the bill has been settled.
    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }
}
