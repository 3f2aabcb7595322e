use crate::error::ApiError;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub capacity: i64,
    pub created_at: String,
}

/// A registration that already passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewHospital {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub capacity: i64,
}

/// SQLite-backed registry. Each call opens its own connection so the
/// handle is cheap to clone into request handlers.
#[derive(Clone, Debug)]
pub struct HospitalStore {
    db_path: Arc<PathBuf>,
}

impl HospitalStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS hospitals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                phone TEXT NOT NULL,
                capacity INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self {
            db_path: Arc::new(db_path),
        })
    }

    pub fn insert(&self, hospital: &NewHospital) -> Result<Hospital, ApiError> {
        let conn = Connection::open(&*self.db_path)?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        conn.execute(
            "INSERT INTO hospitals (name, address, phone, capacity, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                hospital.name,
                hospital.address,
                hospital.phone,
                hospital.capacity,
                created_at,
            ],
        )?;

        Ok(Hospital {
            id: conn.last_insert_rowid(),
            name: hospital.name.clone(),
            address: hospital.address.clone(),
            phone: hospital.phone.clone(),
            capacity: hospital.capacity,
            created_at,
        })
    }

    pub fn list(&self) -> Result<Vec<Hospital>, ApiError> {
        let conn = Connection::open(&*self.db_path)?;
        let mut stmt = conn.prepare(
            "SELECT id, name, address, phone, capacity, created_at
             FROM hospitals
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], map_row)?;

        let mut hospitals = Vec::new();
        for row in rows {
            hospitals.push(row?);
        }
        Ok(hospitals)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Hospital> {
    Ok(Hospital {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        capacity: row.get(4)?,
        created_at: row.get(5)?,
    })
}
