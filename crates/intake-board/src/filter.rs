//! Search and facility filtering over admission records.
//!
//! Both predicates are independent, so the order they are applied in never
//! changes the result.

use std::{convert::Infallible, str::FromStr};

use intake_core::{AdmissionRecord, FacilityId};
use serde::Deserialize;

/// Which facility the board is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FacilityFilter {
  #[default]
  All,
  Only(FacilityId),
}

impl FacilityFilter {
  pub fn matches(&self, record: &AdmissionRecord) -> bool {
    match self {
      Self::All => true,
      Self::Only(id) => record.facility_id.as_ref() == Some(id),
    }
  }

  pub fn is_all(&self) -> bool { matches!(self, Self::All) }
}

impl FromStr for FacilityFilter {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self::from(s.to_owned()))
  }
}

impl From<String> for FacilityFilter {
  fn from(s: String) -> Self {
    match s.as_str() {
      "all" => Self::All,
      _ => Self::Only(FacilityId(s)),
    }
  }
}

/// Case-insensitive substring match on the student or parent name, or a
/// partial match on either phone number. An empty query matches everything.
pub fn matches_search(record: &AdmissionRecord, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  let needle = query.to_lowercase();
  let name_hit = |name: &str| name.to_lowercase().contains(&needle);
  let phone_hit = |phone: &str| phone.contains(query);

  name_hit(&record.student_name)
    || record.parent_name.as_deref().is_some_and(name_hit)
    || record.student_phone.as_deref().is_some_and(phone_hit)
    || record.parent_phone.as_deref().is_some_and(phone_hit)
}

/// The active search text and facility restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
  pub search:   String,
  pub facility: FacilityFilter,
}

impl Filters {
  pub fn matches(&self, record: &AdmissionRecord) -> bool {
    matches_search(record, &self.search) && self.facility.matches(record)
  }

  pub fn is_active(&self) -> bool {
    !self.search.is_empty() || !self.facility.is_all()
  }

  /// Records passing both filters, in input order.
  pub fn apply<'a, I>(&self, records: I) -> Vec<&'a AdmissionRecord>
  where
    I: IntoIterator<Item = &'a AdmissionRecord>,
  {
    records.into_iter().filter(|r| self.matches(r)).collect()
  }
}
