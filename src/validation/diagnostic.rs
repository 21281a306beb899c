//! Diagnostics raised while exporting and validating scenes.
//!
//! A diagnostic carries a code and a readable message. Checks that measure
//! something also attach what they measured: the entity at fault, the
//! measured value and the limit it broke.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// The project entity a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Atlas(String),
    Font(String),
    Scene(String),
    /// A node inside a scene.
    Node { scene: String, id: String },
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Atlas(name) => write!(f, "atlas '{}'", name),
            Subject::Font(family) => write!(f, "font '{}'", family),
            Subject::Scene(name) => write!(f, "scene '{}'", name),
            Subject::Node { scene, id } => write!(f, "node '{}' in scene '{}'", id, scene),
        }
    }
}

/// A measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Count(usize),
    /// Pixel extent of a packed page.
    Extent { width: u32, height: u32 },
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Count(n) => write!(f, "{}", n),
            Measure::Extent { width, height } => write!(f, "{}x{}", width, height),
        }
    }
}

/// A measured value and the limit it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excess {
    pub measured: Measure,
    pub limit: Measure,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code, e.g. `guiport::validate::atlas-size`.
    pub code: String,
    pub message: String,
    pub help: Option<String>,
    pub subject: Option<Subject>,
    pub excess: Option<Excess>,
}

impl Diagnostic {
    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            help: None,
            subject: None,
            excess: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn about(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Record the measured value and the limit it exceeds.
    pub fn exceeding(mut self, measured: Measure, limit: Measure) -> Self {
        self.excess = Some(Excess { measured, limit });
        self
    }

    /// One-line context, e.g. `atlas 'ui': 512x100 over a limit of 256x256`.
    pub fn context(&self) -> Option<String> {
        match (&self.subject, &self.excess) {
            (Some(subject), Some(excess)) => Some(format!(
                "{}: {} over a limit of {}",
                subject, excess.measured, excess.limit
            )),
            (Some(subject), None) => Some(subject.to_string()),
            (None, Some(excess)) => Some(format!("{} over a limit of {}", excess.measured, excess.limit)),
            (None, None) => None,
        }
    }
}

/// Diagnostics collected from a walk or a set of checks, in report order.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.push(Diagnostic::error(code, message));
    }

    pub fn warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.push(Diagnostic::warning(code, message));
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics raised against one entity.
    pub fn about<'a>(&'a self, subject: &'a Subject) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics
            .iter()
            .filter(move |d| d.subject.as_ref() == Some(subject))
    }
}
