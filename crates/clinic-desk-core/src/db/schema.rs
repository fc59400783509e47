//! SQLite schema definition.

/// Complete database schema for the clinic records store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Staff Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    uid TEXT PRIMARY KEY,                        -- vault account id
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL CHECK (role IN ('doctor', 'receptionist')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL,
    address TEXT NOT NULL,
    medical_history TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    last_visit TEXT
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- FTS5 virtual table for patient lookup by name, phone, or email
CREATE VIRTUAL TABLE IF NOT EXISTS patients_fts USING fts5(
    name,
    phone,
    email,
    content='patients',
    content_rowid='rowid'
);

-- Triggers to keep FTS5 in sync with main table
CREATE TRIGGER IF NOT EXISTS patients_ai AFTER INSERT ON patients BEGIN
    INSERT INTO patients_fts(rowid, name, phone, email)
    VALUES (new.rowid, new.name, new.phone, new.email);
END;

CREATE TRIGGER IF NOT EXISTS patients_ad AFTER DELETE ON patients BEGIN
    INSERT INTO patients_fts(patients_fts, rowid, name, phone, email)
    VALUES ('delete', old.rowid, old.name, old.phone, old.email);
END;

CREATE TRIGGER IF NOT EXISTS patients_au AFTER UPDATE ON patients BEGIN
    INSERT INTO patients_fts(patients_fts, rowid, name, phone, email)
    VALUES ('delete', old.rowid, old.name, old.phone, old.email);
    INSERT INTO patients_fts(rowid, name, phone, email)
    VALUES (new.rowid, new.name, new.phone, new.email);
END;

-- ============================================================================
-- Queue Tokens
-- ============================================================================

-- One counter row per queue day; bumped inside the issue transaction
CREATE TABLE IF NOT EXISTS queue_counter (
    day TEXT PRIMARY KEY,                        -- YYYY-MM-DD local
    last_number INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    day TEXT NOT NULL,
    number INTEGER NOT NULL,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    patient_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'waiting'
        CHECK (status IN ('waiting', 'consulting', 'completed')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    completed_at TEXT,
    UNIQUE (day, number)
);

CREATE INDEX IF NOT EXISTS idx_tokens_day ON tokens(day);
CREATE INDEX IF NOT EXISTS idx_tokens_status ON tokens(status);
CREATE INDEX IF NOT EXISTS idx_tokens_patient ON tokens(patient_id);

-- ============================================================================
-- Prescriptions
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescriptions (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    doctor_id TEXT NOT NULL REFERENCES users(uid),
    doctor_name TEXT NOT NULL,
    diagnosis TEXT NOT NULL,
    medications TEXT NOT NULL DEFAULT '[]',      -- JSON array of Medication
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_patient ON prescriptions(patient_id);
CREATE INDEX IF NOT EXISTS idx_prescriptions_doctor ON prescriptions(doctor_id);

-- ============================================================================
-- Bills
-- ============================================================================

CREATE TABLE IF NOT EXISTS bills (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    patient_name TEXT NOT NULL,
    token_id TEXT NOT NULL REFERENCES tokens(id),
    prescription_id TEXT REFERENCES prescriptions(id),
    items TEXT NOT NULL DEFAULT '[]',            -- JSON array of BillItem
    total_amount REAL NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'paid')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    paid_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_bills_patient ON bills(patient_id);
CREATE INDEX IF NOT EXISTS idx_bills_status ON bills(status);
CREATE INDEX IF NOT EXISTS idx_bills_token ON bills(token_id);
"#;
