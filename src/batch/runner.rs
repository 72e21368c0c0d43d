use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::error::{FileError, RunError};
use super::output::write_outputs;
use super::record::{BatchReport, ConvertedFileRecord};
use crate::config::Config;
use crate::date_extract::extract_date_from_path;
use crate::envi::EnviConverter;
use crate::readers::{GeoTiffReader, RasterReader, is_geotiff_extension, read_file_list};

/// Result of a completed run: the per-file records plus the two list files written.
#[derive(Debug)]
pub struct BatchOutcome {
    pub report: BatchReport,
    pub file_list_path: PathBuf,
    pub time_vector_path: PathBuf,
}

#[derive(Debug)]
pub struct BatchRunner {
    config: Config,
}

impl BatchRunner {
    pub fn new(config: Config) -> Self {
        BatchRunner { config }
    }

    /// Converts every listed file in order and then writes the file list and time vector.
    ///
    /// A file that fails to convert or carries no date is recorded and the loop moves on; only
    /// problems with the list file, the output folder or the ENVI driver end the run early.
    pub fn process(&self) -> Result<BatchOutcome, RunError> {
        let inputs =
            read_file_list(self.config.file_list()).map_err(|source| RunError::FileList {
                path: self.config.file_list().to_path_buf(),
                source,
            })?;
        info!(count = inputs.len(), list = %self.config.file_list().display(), "read file list");

        prepare_output_folder(self.config.output_folder())?;

        let converter = EnviConverter::new(self.config.output_folder(), self.config.output_dtype())
            .map_err(RunError::Driver)?;

        let mut seen_outputs = HashSet::new();
        let mut report = BatchReport::default();

        for input in inputs {
            if let Some(output) = converter.output_path(&input)
                && !seen_outputs.insert(output.clone())
            {
                warn!(
                    input = %input.display(),
                    output = %output.display(),
                    "output name repeats an earlier input and will overwrite it"
                );
            }

            let record = self.process_file(&converter, input);
            if let Ok(output) = &record.output {
                println!("✓ Converted {} -> {}", record.input.display(), output.display());
            }
            report.records.push(record);
        }

        let (file_list_path, time_vector_path) = write_outputs(&report, &self.config)?;

        Ok(BatchOutcome {
            report,
            file_list_path,
            time_vector_path,
        })
    }

    fn process_file(&self, converter: &EnviConverter, input: PathBuf) -> ConvertedFileRecord {
        let date = extract_date_from_path(&input, self.config.date_pattern());
        if let Err(e) = &date {
            warn!(path = %input.display(), error = %e, "date extraction failed");
        }

        let output = convert_file(converter, &input);
        if let Err(e) = &output {
            warn!(path = %input.display(), error = %e, "conversion failed");
        }

        ConvertedFileRecord {
            input,
            output,
            date,
        }
    }
}

// The source dataset is dropped, and its handle closed, when this returns.
fn convert_file(converter: &EnviConverter, input: &Path) -> Result<PathBuf, FileError> {
    if !is_geotiff_extension(input) {
        warn!(path = %input.display(), "input does not have a .tif extension, trying anyway");
    }

    let source = GeoTiffReader::new(input).read_raster()?;
    let output = converter.convert(&source)?;
    Ok(output)
}

/// Creates the output folder if needed and checks that files can be created in it.
pub fn prepare_output_folder(path: &Path) -> Result<(), RunError> {
    let to_run_error = |source| RunError::OutputFolder {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(path).map_err(to_run_error)?;
    NamedTempFile::new_in(path).map_err(to_run_error)?;
    Ok(())
}
