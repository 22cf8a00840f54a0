//! Demo data for an empty store: two campuses, two staff members and a
//! handful of inquiries spread across the pipeline.

use chrono::NaiveDate;
use intake_core::{AdmissionRepository, NewAdmission, Stage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
  #[error("store already holds {0} admissions; refusing to seed")]
  AlreadyPopulated(usize),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// What [`seed_demo`] inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
  pub facilities: usize,
  pub employees:  usize,
  pub admissions: usize,
}

struct DemoInquiry {
  student:  &'static str,
  parent:   &'static str,
  phone:    &'static str,
  stage:    Stage,
  campus:   usize,
  assignee: Option<usize>,
  contact:  (i32, u32, u32),
}

const CAMPUSES: [&str; 2] = ["North campus", "Riverside"];
const STAFF: [&str; 2] = ["Mai Nguyen", "Quang Le"];

const INQUIRIES: [DemoInquiry; 6] = [
  DemoInquiry {
    student:  "An Pham",
    parent:   "Hoa Pham",
    phone:    "0901 234 567",
    stage:    Stage::InitialContact,
    campus:   0,
    assignee: Some(0),
    contact:  (2024, 9, 2),
  },
  DemoInquiry {
    student:  "Binh Tran",
    parent:   "Lan Tran",
    phone:    "0912 888 777",
    stage:    Stage::TrialLesson,
    campus:   1,
    assignee: Some(1),
    contact:  (2024, 8, 19),
  },
  DemoInquiry {
    student:  "Chi Vo",
    parent:   "Tuan Vo",
    phone:    "0933 111 222",
    stage:    Stage::Consultation,
    campus:   0,
    assignee: None,
    contact:  (2024, 9, 5),
  },
  DemoInquiry {
    student:  "Dung Ho",
    parent:   "Thu Ho",
    phone:    "0987 654 321",
    stage:    Stage::ClosedWon,
    campus:   1,
    assignee: Some(0),
    contact:  (2024, 7, 30),
  },
  DemoInquiry {
    student:  "Em Do",
    parent:   "Nam Do",
    phone:    "0977 000 111",
    stage:    Stage::ClosedLost,
    campus:   0,
    assignee: Some(1),
    contact:  (2024, 8, 2),
  },
  DemoInquiry {
    student:  "Giang Bui",
    parent:   "Ha Bui",
    phone:    "0966 555 444",
    stage:    Stage::InitialContact,
    campus:   1,
    assignee: None,
    contact:  (2024, 9, 10),
  },
];

fn store_err<E>(e: E) -> SeedError
where
  E: std::error::Error + Send + Sync + 'static,
{
  SeedError::Store(Box::new(e))
}

/// Insert the demo data set. Refuses to touch a store that already holds
/// admissions.
pub async fn seed_demo<S>(store: &S) -> Result<SeedSummary, SeedError>
where
  S: AdmissionRepository,
{
  let existing = store.list_admissions().await.map_err(store_err)?.len();
  if existing > 0 {
    return Err(SeedError::AlreadyPopulated(existing));
  }

  let mut facilities = Vec::with_capacity(CAMPUSES.len());
  for name in CAMPUSES {
    facilities.push(store.create_facility(name.to_owned()).await.map_err(store_err)?);
  }
  let mut employees = Vec::with_capacity(STAFF.len());
  for name in STAFF {
    employees.push(store.create_employee(name.to_owned()).await.map_err(store_err)?);
  }

  for inquiry in &INQUIRIES {
    let (y, m, d) = inquiry.contact;
    let input = NewAdmission {
      parent_name: Some(inquiry.parent.to_owned()),
      parent_phone: Some(inquiry.phone.to_owned()),
      facility_id: Some(facilities[inquiry.campus].id.clone()),
      first_contact_date: NaiveDate::from_ymd_opt(y, m, d),
      stage: Some(inquiry.stage),
      assigned_to: inquiry.assignee.map(|i| employees[i].id.clone()),
      ..NewAdmission::new(inquiry.student)
    };
    store.create_admission(input).await.map_err(store_err)?;
  }

  tracing::info!(
    facilities = facilities.len(),
    employees = employees.len(),
    admissions = INQUIRIES.len(),
    "demo data seeded"
  );
  Ok(SeedSummary {
    facilities: facilities.len(),
    employees:  employees.len(),
    admissions: INQUIRIES.len(),
  })
}
