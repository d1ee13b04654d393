//! ATT&CK matrix selection and version handling

use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a matrix name outside the known set is given
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid matrix {0:?}. Valid matrices are: [enterprise, ics, mobile]")]
pub struct ConfigError(pub String);

/// The three ATT&CK domains published in the MITRE CTI repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Matrix {
    Enterprise,
    Ics,
    Mobile,
}

impl Matrix {
    /// Short name as used in CLI values and dataset file names
    pub fn name(&self) -> &'static str {
        match self {
            Matrix::Enterprise => "enterprise",
            Matrix::Ics => "ics",
            Matrix::Mobile => "mobile",
        }
    }

    /// File stem of the matrix bundle, e.g. "enterprise-attack"
    pub fn file_stem(&self) -> String {
        format!("{}-attack", self.name())
    }

    /// URL of the matrix bundle in the MITRE CTI repository
    pub fn url(&self) -> String {
        format!(
            "https://raw.githubusercontent.com/mitre/cti/master/{0}/{0}.json",
            self.file_stem()
        )
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Matrix {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enterprise" => Ok(Matrix::Enterprise),
            "ics" => Ok(Matrix::Ics),
            "mobile" => Ok(Matrix::Mobile),
            other => Err(ConfigError(other.to_string())),
        }
    }
}

/// Normalize a version string to carry a leading "v" ("10.1" -> "v10.1")
pub fn normalize_version(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}
