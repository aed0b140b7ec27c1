use super::{ComparisonRecord, Status, SummaryRecord};
use crate::config::FieldSet;

/// Count SAME and DIFFERENT per field, in field-set order.
pub fn summarize(records: &[ComparisonRecord], fields: &FieldSet) -> Vec<SummaryRecord> {
    fields
        .iter()
        .map(|field| {
            let mut summary = SummaryRecord {
                prompt: field.to_owned(),
                same: 0,
                different: 0,
            };
            for status in records.iter().filter_map(|r| r.status(field)) {
                match status {
                    Status::Same => summary.same += 1,
                    Status::Different => summary.different += 1,
                }
            }
            summary
        })
        .collect()
}
