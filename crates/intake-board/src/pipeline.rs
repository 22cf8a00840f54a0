//! Status bucketing: partition records into the fixed pipeline columns.

use intake_core::{AdmissionRecord, Stage};

/// Records whose stage equals `stage`, in input order.
pub fn bucket<'a, I>(records: I, stage: Stage) -> Vec<&'a AdmissionRecord>
where
  I: IntoIterator<Item = &'a AdmissionRecord>,
{
  records.into_iter().filter(|r| r.stage == stage).collect()
}

/// One `(stage, records)` pair per column, in [`Stage::ALL`] order.
pub fn columns<'a>(
  records: &[&'a AdmissionRecord],
) -> [(Stage, Vec<&'a AdmissionRecord>); 5] {
  Stage::ALL.map(|stage| (stage, bucket(records.iter().copied(), stage)))
}

/// Number of records per stage, in [`Stage::ALL`] order.
pub fn stage_counts<'a, I>(records: I) -> [(Stage, usize); 5]
where
  I: IntoIterator<Item = &'a AdmissionRecord>,
{
  let mut counts = Stage::ALL.map(|stage| (stage, 0));
  for record in records {
    counts[record.stage.column()].1 += 1;
  }
  counts
}
