use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::RunError;
use super::record::BatchReport;
use crate::config::{Config, ConfigError};

/// Writes `lines`, each terminated by `\n`, to `path`.
///
/// The content goes to a temporary file next to `path` which is then renamed over it, so
/// readers see either the previous file or the complete new one.
pub fn write_lines<P, I, S>(path: P, lines: I) -> io::Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Writes the ENVI file list and the time vector for a finished batch and returns their paths.
pub fn write_outputs(report: &BatchReport, config: &Config) -> Result<(PathBuf, PathBuf), RunError> {
    // Both files are rendered up front so a bad time format cannot leave only one written.
    let time_lines = report
        .time_lines(config.time_format())
        .map_err(|_| ConfigError::TimeFormat(config.time_format().to_string()))?;

    let list_path = config.file_list_output_path();
    write_lines(&list_path, report.output_lines()).map_err(|source| RunError::WriteOutput {
        path: list_path.clone(),
        source,
    })?;

    let time_path = config.time_vector_path();
    write_lines(&time_path, &time_lines).map_err(|source| {
        RunError::WriteOutput {
            path: time_path.clone(),
            source,
        }
    })?;

    Ok((list_path, time_path))
}

pub fn write_report<P: AsRef<Path>>(report: &BatchReport, path: P) -> Result<(), RunError> {
    let path = path.as_ref();
    let to_run_error = |source| RunError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(&report.summary())
        .map_err(|e| to_run_error(io::Error::other(e)))?;
    write_lines(path, [json]).map_err(to_run_error)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    Ok(std::fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_lines_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("time_vector.txt");

        write_lines(&path, ["2021-01-01", "2021-02-15", "2021-03-01"]).unwrap();
        write_lines(&path, ["2021-01-01", "2021-02-15"]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "2021-01-01\n2021-02-15\n");
        assert_eq!(read_lines(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_write_lines_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filelist_output.txt");

        write_lines(&path, Vec::<String>::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_no_temporary_files_left() {
        let dir = tempdir().unwrap();
        write_lines(dir.path().join("a.txt"), ["x"]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_folder_fails() {
        let dir = tempdir().unwrap();
        let result = write_lines(dir.path().join("missing").join("a.txt"), ["x"]);
        assert!(result.is_err());
    }
}
