//! Billing database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{local_day_bounds, now_ts, Bill, BillItem, BillStatus};

impl Database {
    /// Insert a new bill.
    pub fn insert_bill(&self, bill: &Bill) -> DbResult<()> {
        let items_json = serde_json::to_string(&bill.items)?;

        self.conn.execute(
            r#"
            INSERT INTO bills (
                id, patient_id, patient_name, token_id, prescription_id,
                items, total_amount, status, created_at, paid_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                bill.id,
                bill.patient_id,
                bill.patient_name,
                bill.token_id,
                bill.prescription_id,
                items_json,
                bill.total_amount,
                bill.status.as_str(),
                bill.created_at,
                bill.paid_at,
            ],
        )?;
        Ok(())
    }

    /// Get a bill by id.
    pub fn get_bill(&self, id: &str) -> DbResult<Option<Bill>> {
        self.conn
            .query_row(
                r#"
                SELECT id, patient_id, patient_name, token_id, prescription_id,
                       items, total_amount, status, created_at, paid_at
                FROM bills
                WHERE id = ?
                "#,
                [id],
                |row| {
                    Ok(BillRow {
                        id: row.get(0)?,
                        patient_id: row.get(1)?,
                        patient_name: row.get(2)?,
                        token_id: row.get(3)?,
                        prescription_id: row.get(4)?,
                        items: row.get(5)?,
                        total_amount: row.get(6)?,
                        status: row.get(7)?,
                        created_at: row.get(8)?,
                        paid_at: row.get(9)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Settle a bill.
    ///
    /// Paying stamps `paid_at` exactly once; paying an already-paid bill is
    /// a no-op that returns the bill with its original `paid_at`. Payment is
    /// the only status change a bill can undergo, so there is no way back to
    /// pending.
    pub fn mark_bill_paid(&self, id: &str) -> DbResult<Bill> {
        let tx = self.immediate_transaction()?;

        let bill = self
            .get_bill(id)?
            .ok_or_else(|| DbError::NotFound(format!("bill {id}")))?;

        if bill.is_paid() {
            tx.commit()?;
            return Ok(bill);
        }

        let paid_at = now_ts();
        tx.execute(
            "UPDATE bills SET status = 'paid', paid_at = ?2 WHERE id = ?1",
            params![id, paid_at],
        )?;
        tx.commit()?;

        Ok(Bill {
            status: BillStatus::Paid,
            paid_at: Some(paid_at),
            ..bill
        })
    }

    /// List a patient's bills, newest first.
    pub fn list_bills_for_patient(&self, patient_id: &str) -> DbResult<Vec<Bill>> {
        self.query_bills(
            r#"
            SELECT id, patient_id, patient_name, token_id, prescription_id,
                   items, total_amount, status, created_at, paid_at
            FROM bills
            WHERE patient_id = ?
            ORDER BY created_at DESC
            "#,
            params![patient_id],
        )
    }

    /// List every unpaid bill, oldest first.
    pub fn list_unpaid_bills(&self) -> DbResult<Vec<Bill>> {
        self.query_bills(
            r#"
            SELECT id, patient_id, patient_name, token_id, prescription_id,
                   items, total_amount, status, created_at, paid_at
            FROM bills
            WHERE status = 'pending'
            ORDER BY created_at
            "#,
            params![],
        )
    }

    /// List bills raised during a local queue day, in issue order.
    pub fn list_bills_for_day(&self, day: &str) -> DbResult<Vec<Bill>> {
        let (start, end) = local_day_bounds(day)
            .ok_or_else(|| DbError::Constraint(format!("Not a queue day: {day}")))?;

        self.query_bills(
            r#"
            SELECT id, patient_id, patient_name, token_id, prescription_id,
                   items, total_amount, status, created_at, paid_at
            FROM bills
            WHERE created_at >= ?1 AND created_at < ?2
            ORDER BY created_at
            "#,
            params![start, end],
        )
    }

    fn query_bills(&self, sql: &str, params: impl rusqlite::Params) -> DbResult<Vec<Bill>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(BillRow {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                patient_name: row.get(2)?,
                token_id: row.get(3)?,
                prescription_id: row.get(4)?,
                items: row.get(5)?,
                total_amount: row.get(6)?,
                status: row.get(7)?,
                created_at: row.get(8)?,
                paid_at: row.get(9)?,
            })
        })?;

        let mut bills = Vec::new();
        for row in rows {
            bills.push(row?.try_into()?);
        }
        Ok(bills)
    }
}

/// Intermediate row struct for database mapping.
struct BillRow {
    id: String,
    patient_id: String,
    patient_name: String,
    token_id: String,
    prescription_id: Option<String>,
    items: String,
    total_amount: f64,
    status: String,
    created_at: String,
    paid_at: Option<String>,
}

impl TryFrom<BillRow> for Bill {
    type Error = DbError;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        let items: Vec<BillItem> = serde_json::from_str(&row.items)?;
        let status = BillStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown bill status: {}", row.status)))?;

        Ok(Bill {
            id: row.id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            token_id: row.token_id,
            prescription_id: row.prescription_id,
            items,
            total_amount: row.total_amount,
            status,
            created_at: row.created_at,
            paid_at: row.paid_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{local_day, Patient};

    fn setup_db() -> (Database, String, String) {
        let db = Database::open_in_memory().unwrap();

        let patient = Patient::new(
            "Alice Fernandes".into(),
            "555-0101".into(),
            34,
            "female".into(),
            "12 Harbour Road".into(),
        );
        db.insert_patient(&patient).unwrap();

        let token = db
            .issue_token(&patient.id, &patient.name, &local_day())
            .unwrap();

        (db, patient.id, token.id)
    }

    fn visit_bill(patient_id: &str, token_id: &str) -> Bill {
        Bill::new(
            patient_id.into(),
            "Alice Fernandes".into(),
            token_id.into(),
            vec![
                BillItem {
                    description: "Consultation".into(),
                    amount: 300.0,
                },
                BillItem {
                    description: "Dressing".into(),
                    amount: 120.0,
                },
            ],
        )
    }

    #[test]
    fn test_insert_and_get() {
        let (db, patient_id, token_id) = setup_db();

        let bill = visit_bill(&patient_id, &token_id);
        db.insert_bill(&bill).unwrap();

        let retrieved = db.get_bill(&bill.id).unwrap().unwrap();
        assert_eq!(retrieved.items.len(), 2);
        assert_eq!(retrieved.total_amount, 420.0);
        assert_eq!(retrieved.status, BillStatus::Pending);
    }

    #[test]
    fn test_mark_paid_stamps_once() {
        let (db, patient_id, token_id) = setup_db();

        let bill = visit_bill(&patient_id, &token_id);
        db.insert_bill(&bill).unwrap();

        let paid = db.mark_bill_paid(&bill.id).unwrap();
        assert_eq!(paid.status, BillStatus::Paid);
        let stamp = paid.paid_at.clone().unwrap();

        // Re-pay is a no-op and keeps the original stamp
        let again = db.mark_bill_paid(&bill.id).unwrap();
        assert_eq!(again.paid_at, Some(stamp));
    }

    #[test]
    fn test_mark_paid_unknown_bill() {
        let (db, _, _) = setup_db();
        let err = db.mark_bill_paid("no-such-bill");
        assert!(matches!(err, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_unpaid_list_oldest_first() {
        let (db, patient_id, token_id) = setup_db();

        let mut older = visit_bill(&patient_id, &token_id);
        older.created_at = "2026-03-01T08:00:00.000000Z".into();
        let mut newer = visit_bill(&patient_id, &token_id);
        newer.created_at = "2026-03-02T08:00:00.000000Z".into();
        let settled = visit_bill(&patient_id, &token_id);

        db.insert_bill(&newer).unwrap();
        db.insert_bill(&older).unwrap();
        db.insert_bill(&settled).unwrap();
        db.mark_bill_paid(&settled.id).unwrap();

        let unpaid = db.list_unpaid_bills().unwrap();
        assert_eq!(unpaid.len(), 2);
        assert_eq!(unpaid[0].id, older.id);
        assert_eq!(unpaid[1].id, newer.id);
    }

    #[test]
    fn test_patient_bills_newest_first() {
        let (db, patient_id, token_id) = setup_db();

        let mut older = visit_bill(&patient_id, &token_id);
        older.created_at = "2026-03-01T08:00:00.000000Z".into();
        let mut newer = visit_bill(&patient_id, &token_id);
        newer.created_at = "2026-03-02T08:00:00.000000Z".into();

        db.insert_bill(&older).unwrap();
        db.insert_bill(&newer).unwrap();

        let bills = db.list_bills_for_patient(&patient_id).unwrap();
        assert_eq!(bills[0].id, newer.id);
        assert_eq!(bills[1].id, older.id);
    }

    #[test]
    fn test_day_listing_keeps_to_day() {
        let (db, patient_id, token_id) = setup_db();

        let today_bill = visit_bill(&patient_id, &token_id);
        let mut old_bill = visit_bill(&patient_id, &token_id);
        old_bill.created_at = "2020-01-01T08:00:00.000000Z".into();

        db.insert_bill(&today_bill).unwrap();
        db.insert_bill(&old_bill).unwrap();

        let todays = db.list_bills_for_day(&local_day()).unwrap();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].id, today_bill.id);

        assert!(db.list_bills_for_day("nonsense").is_err());
    }
}
