use miette::Diagnostic;
use thiserror::Error;

/// Main error type for guiport operations
#[derive(Error, Diagnostic, Debug)]
pub enum GuiportError {
    #[error("IO error: {0}")]
    #[diagnostic(code(guiport::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(guiport::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(guiport::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(guiport::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Export error: {message}")]
    #[diagnostic(code(guiport::export))]
    Export {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A post-processing invariant was broken. Indicates a traversal bug,
    /// never bad input.
    #[error("Internal consistency error: {message}")]
    #[diagnostic(
        code(guiport::consistency),
        help("This is a bug in guiport; please report it with the input document")
    )]
    Consistency { message: String },
}

impl GuiportError {
    /// Whether this error must abort a whole batch instead of one root.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GuiportError::Consistency { .. })
    }
}

pub type Result<T> = std::result::Result<T, GuiportError>;
