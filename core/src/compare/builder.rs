use super::field::compare_values;
use super::pairing::Pairing;
use super::{ComparisonRecord, FieldResult};
use crate::config::{Environments, FieldSet};

/// Compare every configured field for every matched pair.
///
/// Records follow the pairing order and each record lists fields in field-set
/// order. A field missing from a row is compared as an empty value.
pub fn build_comparison(
    pairing: &Pairing<'_>,
    fields: &FieldSet,
    envs: &Environments,
) -> Vec<ComparisonRecord> {
    pairing
        .pairs
        .iter()
        .map(|pair| {
            let results = fields
                .iter()
                .map(|field| {
                    let outcome = compare_values(
                        pair.baseline.value(field),
                        pair.candidate.value(field),
                        envs,
                    );
                    FieldResult {
                        field: field.to_owned(),
                        status: outcome.status,
                        detail: outcome.detail,
                    }
                })
                .collect();

            ComparisonRecord {
                case_id: pair.identity.case_id.clone(),
                attachment_id: pair.identity.attachment_id.clone(),
                fields: results,
            }
        })
        .collect()
}
