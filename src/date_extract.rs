use chrono::{NaiveDate, NaiveTime};
use std::fmt::{self, Write};
use std::path::Path;

use crate::config::DatePattern;

#[derive(Debug, Clone, PartialEq)]
pub enum DateError {
    NoFileName,
    NoMatch { filename: String, regex: String },
    Invalid {
        token: String,
        format: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::NoFileName => write!(f, "path has no file name"),
            DateError::NoMatch { filename, regex } => {
                write!(f, "no date matching '{}' in filename '{}'", regex, filename)
            }
            DateError::Invalid {
                token,
                format,
                source,
            } => write!(
                f,
                "date token '{}' does not parse with '{}': {}",
                token, format, source
            ),
        }
    }
}

impl std::error::Error for DateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DateError::Invalid { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Finds the first match of the pattern's regex in `filename` and parses it as a calendar date.
///
/// Only the first match is considered, so `a_20210101_20210131.tif` yields the start date.
pub fn extract_date(filename: &str, pattern: &DatePattern) -> Result<NaiveDate, DateError> {
    let token = pattern
        .regex()
        .find(filename)
        .ok_or_else(|| DateError::NoMatch {
            filename: filename.to_string(),
            regex: pattern.regex().as_str().to_string(),
        })?
        .as_str();

    NaiveDate::parse_from_str(token, pattern.format()).map_err(|source| DateError::Invalid {
        token: token.to_string(),
        format: pattern.format().to_string(),
        source,
    })
}

/// Same as [`extract_date`], applied to the file name part of `path` only.
pub fn extract_date_from_path(path: &Path, pattern: &DatePattern) -> Result<NaiveDate, DateError> {
    let filename = path
        .file_name()
        .ok_or(DateError::NoFileName)?
        .to_string_lossy();
    extract_date(&filename, pattern)
}

/// Formats `date` as midnight of that day, so time-of-day fields such as `%H:%M` are accepted.
///
/// Fails for fields a naive datetime cannot supply, e.g. the `%z` offset.
pub fn format_date(date: &NaiveDate, time_format: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", date.and_time(NaiveTime::MIN).format(time_format))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatePattern;

    #[test]
    fn test_extract_default_pattern() {
        let pattern = DatePattern::default();

        assert_eq!(
            extract_date("scene_20210101.tif", &pattern).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        assert_eq!(
            extract_date("NDVI.20210215.v2.tif", &pattern).unwrap(),
            NaiveDate::from_ymd_opt(2021, 2, 15).unwrap()
        );
    }

    #[test]
    fn test_first_match_wins() {
        let pattern = DatePattern::default();
        assert_eq!(
            extract_date("composite_20210101_20210131.tif", &pattern).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_no_match() {
        let pattern = DatePattern::default();
        let err = extract_date("scene_2021.tif", &pattern).unwrap_err();
        assert!(matches!(err, DateError::NoMatch { .. }));
    }

    #[test]
    fn test_invalid_calendar_date() {
        let pattern = DatePattern::default();
        let err = extract_date("scene_20211301.tif", &pattern).unwrap_err();
        assert!(matches!(err, DateError::Invalid { ref token, .. } if token == "20211301"));

        let err = extract_date("scene_20210230.tif", &pattern).unwrap_err();
        assert!(matches!(err, DateError::Invalid { .. }));
    }

    #[test]
    fn test_custom_pattern() {
        let pattern = DatePattern::new(r"\d{4}-\d{2}-\d{2}", "%Y-%m-%d").unwrap();
        assert_eq!(
            extract_date("S2A_2023-07-04_B04.tif", &pattern).unwrap(),
            NaiveDate::from_ymd_opt(2023, 7, 4).unwrap()
        );

        let doy = DatePattern::new(r"\d{7}", "%Y%j").unwrap();
        assert_eq!(
            extract_date("MOD13Q1.A2021046.tif", &doy).unwrap(),
            NaiveDate::from_ymd_opt(2021, 2, 15).unwrap()
        );
    }

    #[test]
    fn test_only_file_name_is_searched() {
        let pattern = DatePattern::default();
        let path = Path::new("/data/20200101/scene.tif");
        assert!(matches!(
            extract_date_from_path(path, &pattern),
            Err(DateError::NoMatch { .. })
        ));

        let path = Path::new("/data/20200101/scene_20210215.tif");
        assert_eq!(
            extract_date_from_path(path, &pattern).unwrap(),
            NaiveDate::from_ymd_opt(2021, 2, 15).unwrap()
        );
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2021, 2, 15).unwrap();
        assert_eq!(format_date(&date, "%Y-%m-%d").unwrap(), "2021-02-15");
        assert_eq!(format_date(&date, "%Y%j").unwrap(), "2021046");
        assert_eq!(
            format_date(&date, "%Y-%m-%dT%H:%M:%S").unwrap(),
            "2021-02-15T00:00:00"
        );
        assert!(format_date(&date, "%Y-%m-%d %z").is_err());
    }
}
