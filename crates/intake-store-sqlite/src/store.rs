//! [`SqliteStore`]: the SQLite implementation of [`AdmissionRepository`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;

use intake_core::{
  AdmissionId, AdmissionRecord, AdmissionRepository, Employee, EmployeeId,
  Facility, FacilityId, NewAdmission, Stage,
};

use crate::{
  encode::{
    ADMISSION_COLUMNS, RawAdmission, RawNamed, encode_date, encode_dt,
    encode_stage,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An admissions store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`AdmissionRecord`] into the `admissions` table.
  async fn insert_admission(&self, record: &AdmissionRecord) -> Result<()> {
    let id                 = record.id.0.clone();
    let student_name       = record.student_name.clone();
    let parent_name        = record.parent_name.clone();
    let student_phone      = record.student_phone.clone();
    let parent_phone       = record.parent_phone.clone();
    let email              = record.email.clone();
    let date_of_birth      = record.date_of_birth.map(encode_date);
    let address            = record.address.clone();
    let facility_id        = record.facility_id.as_ref().map(|f| f.0.clone());
    let first_contact_date = record.first_contact_date.map(encode_date);
    let stage              = encode_stage(record.stage);
    let assigned_to        = record.assigned_to.as_ref().map(|e| e.0.clone());
    let notes              = record.notes.clone();
    let created_at         = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admissions (
             id, student_name, parent_name, student_phone, parent_phone,
             email, date_of_birth, address, facility_id, first_contact_date,
             stage, assigned_to, notes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            id,
            student_name,
            parent_name,
            student_phone,
            parent_phone,
            email,
            date_of_birth,
            address,
            facility_id,
            first_contact_date,
            stage,
            assigned_to,
            notes,
            created_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a row into one of the `(id, name)` reference tables.
  async fn insert_named(
    &self,
    table: &'static str,
    id: String,
    name: String,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO {table} (id, name) VALUES (?1, ?2)"),
          rusqlite::params![id, name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn facility_exists(&self, id: &FacilityId) -> Result<bool> {
    let id = id.0.clone();
    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM facilities WHERE id = ?1)",
          rusqlite::params![id],
          |row| row.get::<_, bool>(0),
        )?)
      })
      .await?;
    Ok(exists)
  }

  async fn list_named(&self, table: &'static str) -> Result<Vec<RawNamed>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT id, name FROM {table} ORDER BY name, id"))?;
        let rows = stmt
          .query_map([], RawNamed::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(raws)
  }
}

fn require_name(name: String) -> Result<String> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(intake_core::Error::BlankField("name").into());
  }
  Ok(trimmed.to_owned())
}

// ─── AdmissionRepository impl ────────────────────────────────────────────────

impl AdmissionRepository for SqliteStore {
  type Error = Error;

  // ── Admissions ────────────────────────────────────────────────────────────

  async fn list_admissions(&self) -> Result<Vec<AdmissionRecord>> {
    let raws: Vec<RawAdmission> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ADMISSION_COLUMNS} FROM admissions ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map([], RawAdmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAdmission::into_record).collect()
  }

  async fn get_admission(
    &self,
    id: &AdmissionId,
  ) -> Result<Option<AdmissionRecord>> {
    let id_str = id.0.clone();

    let raw: Option<RawAdmission> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ADMISSION_COLUMNS} FROM admissions WHERE id = ?1"),
            rusqlite::params![id_str],
            RawAdmission::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAdmission::into_record).transpose()
  }

  async fn create_admission(&self, input: NewAdmission) -> Result<AdmissionRecord> {
    input.validate()?;
    if let Some(facility) = &input.facility_id {
      if !self.facility_exists(facility).await? {
        return Err(intake_core::Error::UnknownFacility(facility.clone()).into());
      }
    }
    // Stored timestamps keep microseconds; stamp at the same precision so the
    // returned record equals every later read.
    let created_at = Utc::now().trunc_subsecs(6);
    let record = input.into_record(AdmissionId::generate(), created_at);
    self.insert_admission(&record).await?;
    tracing::debug!(id = %record.id, stage = %record.stage, "admission created");
    Ok(record)
  }

  async fn update_admission_stage(
    &self,
    id: &AdmissionId,
    stage: Stage,
  ) -> Result<AdmissionRecord> {
    let id_str    = id.0.clone();
    let stage_str = encode_stage(stage);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE admissions SET stage = ?2 WHERE id = ?1",
          rusqlite::params![id_str, stage_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::AdmissionNotFound(id.clone()));
    }

    self
      .get_admission(id)
      .await?
      .ok_or_else(|| Error::AdmissionNotFound(id.clone()))
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn list_facilities(&self) -> Result<Vec<Facility>> {
    let raws = self.list_named("facilities").await?;
    Ok(raws.into_iter().map(RawNamed::into_facility).collect())
  }

  async fn create_facility(&self, name: String) -> Result<Facility> {
    let facility = Facility { id: FacilityId::generate(), name: require_name(name)? };
    self
      .insert_named("facilities", facility.id.0.clone(), facility.name.clone())
      .await?;
    Ok(facility)
  }

  async fn list_employees(&self) -> Result<Vec<Employee>> {
    let raws = self.list_named("employees").await?;
    Ok(raws.into_iter().map(RawNamed::into_employee).collect())
  }

  async fn create_employee(&self, name: String) -> Result<Employee> {
    let employee = Employee { id: EmployeeId::generate(), name: require_name(name)? };
    self
      .insert_named("employees", employee.id.0.clone(), employee.name.clone())
      .await?;
    Ok(employee)
  }
}
