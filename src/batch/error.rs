use std::fmt;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::envi::ConvertError;
use crate::readers::ReadError;

/// Errors that abort the whole run.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    FileList { path: PathBuf, source: std::io::Error },
    OutputFolder { path: PathBuf, source: std::io::Error },
    Driver(ConvertError),
    WriteOutput { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "Invalid configuration: {}", e),
            RunError::FileList { path, source } => {
                write!(f, "The file list at {} could not be read: {}", path.display(), source)
            }
            RunError::OutputFolder { path, source } => write!(
                f,
                "The output folder {} is not writable: {}",
                path.display(),
                source
            ),
            RunError::Driver(e) => write!(f, "{}", e),
            RunError::WriteOutput { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RunError {}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> RunError {
        RunError::Config(err)
    }
}

/// Errors that only affect one input file; the batch carries on.
#[derive(Debug)]
pub enum FileError {
    Read(ReadError),
    Convert(ConvertError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Read(e) => write!(f, "{}", e),
            FileError::Convert(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FileError {}

impl From<ReadError> for FileError {
    fn from(err: ReadError) -> FileError {
        FileError::Read(err)
    }
}

impl From<ConvertError> for FileError {
    fn from(err: ConvertError) -> FileError {
        FileError::Convert(err)
    }
}
