pub mod error;
pub mod output;
pub mod record;
pub mod runner;

pub use error::{FileError, RunError};
pub use output::{write_lines, write_outputs, write_report};
pub use record::{BatchReport, ConvertedFileRecord, MISSING, ReportSummary};
pub use runner::{BatchOutcome, BatchRunner, prepare_output_folder};
