use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads the list of rasters to convert, one path per line.
///
/// Lines are trimmed and blank lines are dropped, so hand-edited lists with empty separators do
/// not produce spurious entries. The returned order is the order of every output of the run.
pub fn read_file_list<P: AsRef<Path>>(path: P) -> io::Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_file_list(&contents))
}

pub fn parse_file_list(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
