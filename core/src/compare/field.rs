use super::normalize::normalize_value;
use super::Status;
use crate::config::Environments;
use crate::diff::unified_diff;

/// Outcome of comparing one field between the two environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldComparison {
    pub status: Status,
    /// Empty when `status` is `Same`, otherwise a unified diff from the
    /// baseline to the candidate.
    pub detail: String,
}

/// Compare a baseline value with a candidate value.
///
/// Both sides are normalized first; absent values count as empty.
pub fn compare_values(
    baseline: Option<&str>,
    candidate: Option<&str>,
    envs: &Environments,
) -> FieldComparison {
    let old = normalize_value(baseline);
    let new = normalize_value(candidate);

    if old == new {
        return FieldComparison {
            status: Status::Same,
            detail: String::new(),
        };
    }

    let mut detail = unified_diff(&old, &new, &envs.baseline, &envs.candidate);
    if detail.is_empty() {
        // Texts differ but split into identical lines (trailing newline, CRLF).
        detail = format!(
            "--- {}\n+++ {}\n@@ line terminators differ @@",
            envs.baseline, envs.candidate
        );
    }

    FieldComparison {
        status: Status::Different,
        detail,
    }
}
