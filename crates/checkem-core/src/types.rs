use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// One flagged condition. Every diagnostic counts as exactly one error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Mapping key (or metadata field) the condition is reported against;
    /// `None` for file-level failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn keyed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            message: message.into(),
        }
    }

    pub fn file_level(message: impl Into<String>) -> Self {
        Self {
            key: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{key}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Diagnostics of a single mapping file, in rule-engine order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn new(file: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            file: file.into(),
            diagnostics,
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Header line followed by one tab-indented line per diagnostic.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.file);
        out.push('\n');
        for d in &self.diagnostics {
            out.push('\t');
            out.push_str(&d.to_string());
            out.push('\n');
        }
        out
    }
}

/// All file reports of a run, in file-enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub board: String,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.files.iter().map(FileReport::error_count).sum()
    }

    /// Process status: the total clamped to `0..=255`.
    pub fn exit_code(&self) -> i32 {
        clamp_exit_code(self.total())
    }
}

pub fn clamp_exit_code(total: usize) -> i32 {
    total.min(255) as i32
}
