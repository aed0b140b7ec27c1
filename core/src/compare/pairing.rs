use crate::config::Environments;
use crate::model::{Identity, Row};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// The baseline and candidate rows of one case/attachment.
#[derive(Debug, Clone)]
pub struct MatchedPair<'a> {
    pub identity: Identity,
    pub baseline: &'a Row,
    pub candidate: &'a Row,
}

/// Data-quality findings raised while pairing rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The group lacks a row for one (or both) of the paired environments.
    MissingSide {
        case_id: String,
        attachment_id: String,
        missing: Vec<String>,
    },
    /// More than one row exists for the same identity and environment; the
    /// first one was used.
    DuplicateRow {
        case_id: String,
        attachment_id: String,
        environment: String,
        count: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingSide {
                case_id,
                attachment_id,
                missing,
            } => write!(
                f,
                "Skipping case {case_id} / {attachment_id}: missing {} row",
                missing.join(" and ")
            ),
            Diagnostic::DuplicateRow {
                case_id,
                attachment_id,
                environment,
                count,
            } => write!(
                f,
                "Case {case_id} / {attachment_id} has {count} {environment} rows; using the first"
            ),
        }
    }
}

/// Result of pairing a batch: matched pairs in first-seen group order, plus
/// everything that was skipped or ambiguous.
#[derive(Debug, Clone, Default)]
pub struct Pairing<'a> {
    pub pairs: Vec<MatchedPair<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
struct Group<'a> {
    identity: Identity,
    baseline: Vec<&'a Row>,
    candidate: Vec<&'a Row>,
}

/// Group rows by case/attachment and pick the baseline and candidate row of
/// each group.
///
/// Groups missing either side are dropped. When an environment has several
/// rows for the same identity the first one wins. Both cases are logged and
/// reported as diagnostics. Rows tagged with any other environment are
/// ignored.
pub fn match_pairs<'a>(rows: &'a [Row], envs: &Environments) -> Pairing<'a> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<Identity, usize> = HashMap::new();

    for row in rows {
        let identity = row.identity();
        let slot = *index.entry(identity.clone()).or_insert_with(|| {
            groups.push(Group {
                identity,
                baseline: Vec::new(),
                candidate: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        if row.environment == envs.baseline {
            group.baseline.push(row);
        } else if row.environment == envs.candidate {
            group.candidate.push(row);
        }
    }

    let mut pairing = Pairing::default();
    for group in groups {
        for (environment, side) in [
            (&envs.baseline, &group.baseline),
            (&envs.candidate, &group.candidate),
        ] {
            if side.len() > 1 {
                let diagnostic = Diagnostic::DuplicateRow {
                    case_id: group.identity.case_id.clone(),
                    attachment_id: group.identity.attachment_id.clone(),
                    environment: environment.clone(),
                    count: side.len(),
                };
                log::warn!("[pairing] {diagnostic}");
                pairing.diagnostics.push(diagnostic);
            }
        }

        match (group.baseline.first(), group.candidate.first()) {
            (Some(&baseline), Some(&candidate)) => pairing.pairs.push(MatchedPair {
                identity: group.identity,
                baseline,
                candidate,
            }),
            (baseline, candidate) => {
                let mut missing = Vec::new();
                if baseline.is_none() {
                    missing.push(envs.baseline.clone());
                }
                if candidate.is_none() {
                    missing.push(envs.candidate.clone());
                }
                let diagnostic = Diagnostic::MissingSide {
                    case_id: group.identity.case_id,
                    attachment_id: group.identity.attachment_id,
                    missing,
                };
                log::warn!("[pairing] {diagnostic}");
                pairing.diagnostics.push(diagnostic);
            }
        }
    }

    log::debug!(
        "[pairing] {} row(s) -> {} matched pair(s), {} diagnostic(s)",
        rows.len(),
        pairing.pairs.len(),
        pairing.diagnostics.len()
    );
    pairing
}
