//! Billing export and day-sheet integration tests.

use clinic_desk_core::db::Database;
use clinic_desk_core::export::{BillingExporter, DaySheet};
use clinic_desk_core::models::{local_day, Bill, BillItem, Patient, TokenStatus};
use clinic_desk_core::queue::TokenQueue;
use proptest::prelude::*;

fn seeded() -> (Database, Patient, String) {
    let db = Database::open_in_memory().unwrap();
    let patient = Patient::new(
        "Alice Fernandes".to_string(),
        "98765 43210".to_string(),
        34,
        "female".to_string(),
        "12 Clinic Road".to_string(),
    );
    db.insert_patient(&patient).unwrap();
    let token = TokenQueue::new(&db).issue(&patient.id).unwrap();
    (db, patient, token.id)
}

fn charge(description: &str, amount: f64) -> BillItem {
    BillItem {
        description: description.to_string(),
        amount,
    }
}

fn raise_bill(db: &Database, patient: &Patient, token_id: &str, items: Vec<BillItem>) -> Bill {
    let bill = Bill::new(
        patient.id.clone(),
        patient.name.clone(),
        token_id.to_string(),
        items,
    );
    db.insert_bill(&bill).unwrap();
    bill
}

#[test]
fn test_day_batch_flattens_bill_items() {
    let (db, patient, token_id) = seeded();
    raise_bill(
        &db,
        &patient,
        &token_id,
        vec![charge("Consultation", 500.0), charge("Dressing", 150.0)],
    );
    raise_bill(&db, &patient, &token_id, vec![charge("Follow-up", 300.0)]);

    let batch = BillingExporter::new(&db)
        .export_for_day(&local_day())
        .unwrap();

    assert_eq!(batch.entries.len(), 3);
    assert_eq!(batch.total_billed, 950.0);
    assert_eq!(batch.total_collected, 0.0);
}

#[test]
fn test_collections_require_payment() {
    let (db, patient, token_id) = seeded();
    let settled = raise_bill(&db, &patient, &token_id, vec![charge("Consultation", 500.0)]);
    raise_bill(&db, &patient, &token_id, vec![charge("Follow-up", 300.0)]);

    db.mark_bill_paid(&settled.id).unwrap();

    let batch = BillingExporter::new(&db)
        .export_for_day(&local_day())
        .unwrap();

    assert_eq!(batch.total_billed, 800.0);
    assert_eq!(batch.total_collected, 500.0);

    let statuses: Vec<&str> = batch.entries.iter().map(|e| e.status.as_str()).collect();
    assert!(statuses.contains(&"paid"));
    assert!(statuses.contains(&"pending"));
}

#[test]
fn test_unpaid_export_skips_settled_bills() {
    let (db, patient, token_id) = seeded();
    let settled = raise_bill(&db, &patient, &token_id, vec![charge("Consultation", 500.0)]);
    let owed = raise_bill(&db, &patient, &token_id, vec![charge("Lab work", 900.0)]);

    db.mark_bill_paid(&settled.id).unwrap();

    let batch = BillingExporter::new(&db).export_unpaid().unwrap();
    assert_eq!(batch.entries.len(), 1);
    assert_eq!(batch.entries[0].bill_id, owed.id);
    assert_eq!(batch.total_billed, 900.0);
    assert_eq!(batch.total_collected, 0.0);
}

#[test]
fn test_patient_history_export() {
    let (db, patient, token_id) = seeded();
    raise_bill(&db, &patient, &token_id, vec![charge("Consultation", 500.0)]);
    raise_bill(&db, &patient, &token_id, vec![charge("Follow-up", 300.0)]);

    let batch = BillingExporter::new(&db)
        .export_for_patient(&patient.id)
        .unwrap();
    assert_eq!(batch.entries.len(), 2);

    let none = BillingExporter::new(&db)
        .export_for_patient("no-such-patient")
        .unwrap();
    assert!(none.entries.is_empty());
}

#[test]
fn test_day_sheet_summarizes_queue_and_cash() {
    let (db, patient, first_token) = seeded();
    let queue = TokenQueue::new(&db);
    let second = queue.issue(&patient.id).unwrap();
    queue.issue(&patient.id).unwrap();

    queue.advance(&first_token, TokenStatus::Completed).unwrap();
    queue.advance(&second.id, TokenStatus::Consulting).unwrap();

    let settled = raise_bill(&db, &patient, &first_token, vec![charge("Consultation", 500.0)]);
    raise_bill(&db, &patient, &second.id, vec![charge("Consultation", 500.0)]);
    db.mark_bill_paid(&settled.id).unwrap();

    let sheet = DaySheet::compile(&db, &local_day()).unwrap();

    assert_eq!(sheet.tokens_issued, 3);
    assert_eq!(sheet.waiting, 1);
    assert_eq!(sheet.consulting, 1);
    assert_eq!(sheet.completed, 1);
    assert_eq!(sheet.bills_raised, 2);
    assert_eq!(sheet.total_billed, 1000.0);
    assert_eq!(sheet.total_collected, 500.0);
    assert_eq!(sheet.outstanding, 500.0);
    assert_eq!(sheet.patients_on_file, 1);

    // Rows stay in queue order with their final statuses.
    let numbers: Vec<u32> = sheet.rows.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(sheet.rows[0].status, "completed");
    assert!(sheet.rows[0].completed_at.is_some());
    assert_eq!(sheet.rows[2].status, "waiting");
}

#[test]
fn test_day_sheet_for_quiet_day() {
    let (db, _, _) = seeded();

    let sheet = DaySheet::compile(&db, "2020-01-01").unwrap();

    assert_eq!(sheet.tokens_issued, 0);
    assert_eq!(sheet.bills_raised, 0);
    assert_eq!(sheet.outstanding, 0.0);
    assert!(sheet.rows.is_empty());
    assert_eq!(sheet.to_csv().lines().count(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Whole-number amounts keep f64 sums exact.
    #[test]
    fn prop_bill_total_is_sum_of_items(amounts in prop::collection::vec(0u32..5_000, 0..8)) {
        let items: Vec<BillItem> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| charge(&format!("Line {i}"), *amount as f64))
            .collect();
        let bill = Bill::new(
            "p1".to_string(),
            "Some One".to_string(),
            "t1".to_string(),
            items,
        );
        let expected: f64 = amounts.iter().map(|a| *a as f64).sum();
        prop_assert_eq!(bill.total_amount, expected);
    }

    #[test]
    fn prop_batch_keeps_one_csv_line_per_charge(
        per_bill in prop::collection::vec(prop::collection::vec(1u32..5_000, 1..4), 1..5),
    ) {
        let (db, patient, token_id) = seeded();
        let mut item_count = 0usize;
        let mut billed = 0u64;
        for amounts in &per_bill {
            let items: Vec<BillItem> = amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| charge(&format!("Line {i}"), *amount as f64))
                .collect();
            item_count += items.len();
            billed += amounts.iter().map(|a| u64::from(*a)).sum::<u64>();
            raise_bill(&db, &patient, &token_id, items);
        }

        let batch = BillingExporter::new(&db).export_for_day(&local_day()).unwrap();
        prop_assert_eq!(batch.entries.len(), item_count);
        prop_assert_eq!(batch.total_billed, billed as f64);
        prop_assert_eq!(batch.total_collected, 0.0);
        prop_assert_eq!(batch.to_csv().lines().count(), item_count + 1);
    }
}
