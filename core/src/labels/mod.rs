//! Manual correctness labels.
//!
//! Labels are human judgements layered on top of a comparison report. They
//! are kept in an explicit store keyed by case/attachment/field and never
//! feed back into the engine.

pub mod central;
pub mod storage;

use crate::config::Environments;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Correct,
    Acceptable,
    Wrong,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Correct, Label::Acceptable, Label::Wrong];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Correct => "Correct",
            Label::Acceptable => "Acceptable",
            Label::Wrong => "Wrong",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown label '{s}' (expected correct, acceptable or wrong)"))
    }
}

/// Address of one labelled cell: a field of one case/attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelKey {
    pub case_id: String,
    pub attachment_id: String,
    pub field: String,
}

impl LabelKey {
    pub fn new(
        case_id: impl Into<String>,
        attachment_id: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            attachment_id: attachment_id.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.case_id, self.attachment_id, self.field)
    }
}

/// A reviewer's judgement of one field, with the raw values it was made on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(flatten)]
    pub key: LabelKey,
    pub label: Label,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub acceptable_reason: String,
    #[serde(default)]
    pub standard_response: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub baseline: String,
    #[serde(default)]
    pub candidate: String,
}

impl Annotation {
    pub fn new(key: LabelKey, label: Label) -> Self {
        Self {
            key,
            label,
            acceptable_reason: String::new(),
            standard_response: String::new(),
            remark: String::new(),
            baseline: String::new(),
            candidate: String::new(),
        }
    }
}

/// Validation progress over all field comparisons of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub validated: usize,
    pub remaining: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.validated as f64 / self.total as f64
        }
    }
}

/// All annotations for one input batch, in the order they were first made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStore {
    /// Display path of the batch these labels belong to.
    pub batch: String,
    /// Incremented on every save; used to detect concurrent writers.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl LabelStore {
    pub fn new(batch: impl Into<String>) -> Self {
        Self {
            batch: batch.into(),
            version: 0,
            updated_at: String::new(),
            annotations: Vec::new(),
        }
    }

    pub fn get(&self, key: &LabelKey) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.key == key)
    }

    /// Insert or replace the annotation for its key.
    ///
    /// The acceptable reason is only kept for `Acceptable` labels.
    pub fn set(&mut self, mut annotation: Annotation) {
        if annotation.label != Label::Acceptable {
            annotation.acceptable_reason.clear();
        }
        match self.annotations.iter_mut().find(|a| a.key == annotation.key) {
            Some(existing) => *existing = annotation,
            None => self.annotations.push(annotation),
        }
    }

    /// Remove an annotation. Returns whether one existed.
    pub fn clear(&mut self, key: &LabelKey) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| &a.key != key);
        self.annotations.len() != before
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn progress(&self, total: usize) -> Progress {
        let validated = self.annotations.len().min(total);
        Progress {
            validated,
            remaining: total - validated,
            total,
        }
    }

    pub fn label_counts(&self) -> Vec<(Label, usize)> {
        Label::ALL
            .into_iter()
            .map(|label| {
                let count = self.annotations.iter().filter(|a| a.label == label).count();
                (label, count)
            })
            .collect()
    }

    /// Bump the version and timestamp before writing to disk.
    pub fn prepare_for_save(&mut self) {
        self.version += 1;
        self.updated_at = central::now_iso8601();
    }

    /// Export annotations as a validation-results CSV.
    pub fn write_csv<W: Write>(&self, out: W, envs: &Environments) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(out);
        let baseline_column = format!("{} Result", envs.baseline);
        let candidate_column = format!("{} Result", envs.candidate);
        writer.write_record([
            "Case/Attachment ID",
            "Prompt",
            baseline_column.as_str(),
            candidate_column.as_str(),
            "Label",
            "Acceptable Reason",
            "Standard Response",
            "Remark",
        ])?;
        for a in &self.annotations {
            let identity = format!("{} | {}", a.key.case_id, a.key.attachment_id);
            writer.write_record([
                identity.as_str(),
                a.key.field.as_str(),
                a.baseline.as_str(),
                a.candidate.as_str(),
                a.label.as_str(),
                a.acceptable_reason.as_str(),
                a.standard_response.as_str(),
                a.remark.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(field: &str) -> LabelKey {
        LabelKey::new("100", "a.pdf", field)
    }

    #[test]
    fn test_label_from_str_is_case_insensitive() {
        assert_eq!("correct".parse::<Label>().unwrap(), Label::Correct);
        assert_eq!("ACCEPTABLE".parse::<Label>().unwrap(), Label::Acceptable);
        assert!("maybe".parse::<Label>().is_err());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut store = LabelStore::new("batch.csv");
        store.set(Annotation::new(key("A"), Label::Wrong));
        store.set(Annotation::new(key("B"), Label::Correct));
        store.set(Annotation::new(key("A"), Label::Correct));

        assert_eq!(store.len(), 2);
        assert_eq!(store.annotations[0].key.field, "A");
        assert_eq!(store.get(&key("A")).unwrap().label, Label::Correct);
    }

    #[test]
    fn test_acceptable_reason_only_kept_for_acceptable() {
        let mut store = LabelStore::new("batch.csv");
        let mut annotation = Annotation::new(key("A"), Label::Wrong);
        annotation.acceptable_reason = "rounding".to_owned();
        store.set(annotation.clone());
        assert!(store.get(&key("A")).unwrap().acceptable_reason.is_empty());

        annotation.label = Label::Acceptable;
        store.set(annotation);
        assert_eq!(store.get(&key("A")).unwrap().acceptable_reason, "rounding");
    }

    #[test]
    fn test_clear() {
        let mut store = LabelStore::new("batch.csv");
        store.set(Annotation::new(key("A"), Label::Wrong));
        assert!(store.clear(&key("A")));
        assert!(!store.clear(&key("A")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_progress() {
        let mut store = LabelStore::new("batch.csv");
        store.set(Annotation::new(key("A"), Label::Wrong));
        let progress = store.progress(4);
        assert_eq!(progress.validated, 1);
        assert_eq!(progress.remaining, 3);
        assert!((progress.fraction() - 0.25).abs() < f64::EPSILON);
        assert_eq!(store.progress(0).remaining, 0);
    }

    #[test]
    fn test_label_counts() {
        let mut store = LabelStore::new("batch.csv");
        store.set(Annotation::new(key("A"), Label::Wrong));
        store.set(Annotation::new(key("B"), Label::Wrong));
        assert_eq!(
            store.label_counts(),
            vec![
                (Label::Correct, 0),
                (Label::Acceptable, 0),
                (Label::Wrong, 2)
            ]
        );
    }

    #[test]
    fn test_write_csv_uses_environment_names() {
        let mut store = LabelStore::new("batch.csv");
        let mut annotation = Annotation::new(key("Response"), Label::Acceptable);
        annotation.baseline = "{}".to_owned();
        annotation.acceptable_reason = "same meaning".to_owned();
        store.set(annotation);

        let mut buf = Vec::new();
        store.write_csv(&mut buf, &Environments::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Case/Attachment ID,Prompt,NPR Result,Sandbox Result,Label,Acceptable Reason,Standard Response,Remark"
        );
        assert_eq!(
            lines.next().unwrap(),
            "100 | a.pdf,Response,{},,Acceptable,same meaning,,"
        );
    }

    #[test]
    fn test_store_json_roundtrip_flattens_key() {
        let mut store = LabelStore::new("batch.csv");
        store.set(Annotation::new(key("A"), Label::Correct));
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["annotations"][0]["case_id"], "100");
        assert_eq!(json["annotations"][0]["label"], "correct");
        let back: LabelStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }
}
