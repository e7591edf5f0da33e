#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failure reported by a [`TemplateRenderer`](crate::materialize::TemplateRenderer).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Template(#[from] tera::Error),

    #[error("'{0}' must be a relative path inside its directory")]
    UnsafePath(String),
}

#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error("Resource unavailable: {path}: {reason}")]
    #[diagnostic(help("Check that the manifest and template directory exist and are readable"))]
    ResourceUnavailable { path: PathBuf, reason: String },

    #[error("Failed to render manifest {path}")]
    #[diagnostic(help("Check the Tera syntax in the manifest file"))]
    ManifestRender {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to materialize '{name}'")]
    #[diagnostic(help("Every manifest entry must name a file in the template directory"))]
    MaterializationFailed {
        name: String,
        #[source]
        source: RenderError,
    },

    #[error("Failed to register {path} with the project: {reason}")]
    RegistrationFailed { path: PathBuf, reason: String },

    #[error("File '{file}' is not part of the project")]
    ProjectFileMissing { file: String },

    #[error("Failed to parse symbols file {path}")]
    #[diagnostic(help("Symbols files are TOML with a [symbols] table"))]
    SymbolsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid symbol definition '{input}'")]
    #[diagnostic(help("Symbols are passed as -d KEY=VALUE"))]
    InvalidSymbol { input: String },

    #[error("Required symbol '{name}' is not defined")]
    MissingSymbol { name: String },

    #[error("Output directory already exists: {path}")]
    #[diagnostic(help("Use --overwrite to scaffold into a non-empty directory"))]
    OutputExists { path: PathBuf },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    /// Process exit code reported for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::Io { .. } => 1,
            Self::ResourceUnavailable { .. } | Self::ManifestRender { .. } => 2,
            Self::MaterializationFailed { .. } => 3,
            Self::RegistrationFailed { .. } | Self::ProjectFileMissing { .. } => 4,
            Self::SymbolsParse { .. } | Self::InvalidSymbol { .. } | Self::MissingSymbol { .. } => 5,
            Self::OutputExists { .. } => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
