//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that lexical order
//! is chronological. Dates are stored as `YYYY-MM-DD`. Stages are stored as
//! their snake_case key.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use intake_core::{
  AdmissionId, AdmissionRecord, Employee, EmployeeId, Facility, FacilityId,
  Stage,
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Stage ───────────────────────────────────────────────────────────────────

pub fn encode_stage(stage: Stage) -> String { stage.as_ref().to_owned() }

pub fn decode_stage(s: &str) -> Result<Stage> { Ok(Stage::parse(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every admissions SELECT, matching [`RawAdmission`].
pub const ADMISSION_COLUMNS: &str = "id, student_name, parent_name, \
  student_phone, parent_phone, email, date_of_birth, address, facility_id, \
  first_contact_date, stage, assigned_to, notes, created_at";

/// Raw strings read directly from an `admissions` row.
pub struct RawAdmission {
  pub id:                 String,
  pub student_name:       String,
  pub parent_name:        Option<String>,
  pub student_phone:      Option<String>,
  pub parent_phone:       Option<String>,
  pub email:              Option<String>,
  pub date_of_birth:      Option<String>,
  pub address:            Option<String>,
  pub facility_id:        Option<String>,
  pub first_contact_date: Option<String>,
  pub stage:              String,
  pub assigned_to:        Option<String>,
  pub notes:              Option<String>,
  pub created_at:         String,
}

impl RawAdmission {
  /// Read a row selected with [`ADMISSION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      student_name:       row.get(1)?,
      parent_name:        row.get(2)?,
      student_phone:      row.get(3)?,
      parent_phone:       row.get(4)?,
      email:              row.get(5)?,
      date_of_birth:      row.get(6)?,
      address:            row.get(7)?,
      facility_id:        row.get(8)?,
      first_contact_date: row.get(9)?,
      stage:              row.get(10)?,
      assigned_to:        row.get(11)?,
      notes:              row.get(12)?,
      created_at:         row.get(13)?,
    })
  }

  pub fn into_record(self) -> Result<AdmissionRecord> {
    Ok(AdmissionRecord {
      id:                 AdmissionId(self.id),
      student_name:       self.student_name,
      parent_name:        self.parent_name,
      student_phone:      self.student_phone,
      parent_phone:       self.parent_phone,
      email:              self.email,
      date_of_birth:      self
        .date_of_birth
        .as_deref()
        .map(decode_date)
        .transpose()?,
      address:            self.address,
      facility_id:        self.facility_id.map(FacilityId),
      first_contact_date: self
        .first_contact_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      stage:              decode_stage(&self.stage)?,
      assigned_to:        self.assigned_to.map(EmployeeId),
      notes:              self.notes,
      created_at:         decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `facilities` or `employees` row.
pub struct RawNamed {
  pub id:   String,
  pub name: String,
}

impl RawNamed {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, name: row.get(1)? })
  }

  pub fn into_facility(self) -> Facility {
    Facility { id: FacilityId(self.id), name: self.name }
  }

  pub fn into_employee(self) -> Employee {
    Employee { id: EmployeeId(self.id), name: self.name }
  }
}
