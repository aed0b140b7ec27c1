use serde::{Deserialize, Serialize};

/// One `@@` block of a unified diff.
///
/// Starts are the numbers printed in the header: 1-based, except that an
/// empty range reports the line before it (so `-0,0` for an empty text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    #[serde(rename = "oldStart")]
    pub old_start: u32,
    #[serde(rename = "oldCount")]
    pub old_count: u32,
    #[serde(rename = "newStart")]
    pub new_start: u32,
    #[serde(rename = "newCount")]
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// `@@ -a,b +c,d @@`, with the count omitted for single-line ranges.
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(self.old_start, self.old_count),
            format_range(self.new_start, self.new_count)
        )
    }

    pub fn added(&self) -> usize {
        self.count(LineType::Added)
    }

    pub fn removed(&self) -> usize {
        self.count(LineType::Removed)
    }

    fn count(&self, line_type: LineType) -> usize {
        self.lines
            .iter()
            .filter(|l| l.line_type == line_type)
            .count()
    }
}

fn format_range(start: u32, count: u32) -> String {
    if count == 1 {
        start.to_string()
    } else {
        format!("{start},{count}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub content: String,
    #[serde(rename = "oldLineNumber")]
    pub old_line_number: Option<u32>,
    #[serde(rename = "newLineNumber")]
    pub new_line_number: Option<u32>,
}

impl DiffLine {
    /// The line as it appears in a unified diff body.
    pub fn render(&self) -> String {
        format!("{}{}", self.line_type.prefix(), self.content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Context,
    Added,
    Removed,
}

impl LineType {
    pub fn prefix(self) -> char {
        match self {
            LineType::Context => ' ',
            LineType::Added => '+',
            LineType::Removed => '-',
        }
    }
}
