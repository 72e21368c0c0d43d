use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use regex::Regex;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::date_extract::format_date;

pub mod error;
pub use error::ConfigError;

pub mod dtype;
pub use dtype::OutputDType;

/// Eight contiguous digits, e.g. `scene_20210101.tif`.
pub const DEFAULT_DATE_REGEX: &str = r"\d{8}";
pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d";
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_FILE_LIST_NAME: &str = "filelist_output.txt";
pub const DEFAULT_TIME_VECTOR_NAME: &str = "time_vector.txt";

/// How a date is located in, and parsed from, an input filename.
#[derive(Debug, Clone)]
pub struct DatePattern {
    regex: Regex,
    format: String,
}

impl DatePattern {
    pub fn new(regex: &str, format: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(regex)?;
        if !is_valid_strftime(format) {
            return Err(ConfigError::DateFormat(format.to_string()));
        }

        Ok(DatePattern {
            regex,
            format: format.to_string(),
        })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Default for DatePattern {
    fn default() -> Self {
        DatePattern {
            regex: Regex::new(DEFAULT_DATE_REGEX).expect("default date regex compiles"),
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

fn is_valid_strftime(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

// The time vector is formatted from dates, so the format must render a sample date and stay on
// one line.
fn is_valid_time_format(format: &str) -> bool {
    is_valid_strftime(format)
        && format_date(&NaiveDate::MIN, format).is_ok_and(|line| !line.contains(['\n', '\r']))
}

fn is_plain_file_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.file_name().is_some_and(|f| f == path.as_os_str())
}

/// Optional overrides read from a JSON file, e.g.
///
/// ```json
/// { "date_regex": "\\d{8}", "date_format": "%Y%m%d", "time_format": "%Y%j" }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Settings {
    output_dtype: Option<OutputDType>,
    date_regex: Option<Regex>,
    date_format: Option<String>,
    time_format: Option<String>,
    file_list_name: Option<String>,
    time_vector_name: Option<String>,
}

// Deserializes the settings through a helper so the regex and the chrono formats are validated
// once, when the file is loaded.
impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct SettingsHelper {
            output_dtype: Option<OutputDType>,
            date_regex: Option<String>,
            date_format: Option<String>,
            time_format: Option<String>,
            file_list_name: Option<String>,
            time_vector_name: Option<String>,
        }

        let helper = SettingsHelper::deserialize(deserializer)?;

        let date_regex = helper
            .date_regex
            .map(|re| Regex::new(&re))
            .transpose()
            .map_err(|e| D::Error::custom(ConfigError::DateRegex(e)))?;

        if let Some(format) = &helper.date_format
            && !is_valid_strftime(format)
        {
            return Err(D::Error::custom(ConfigError::DateFormat(format.clone())));
        }

        if let Some(format) = &helper.time_format
            && !is_valid_time_format(format)
        {
            return Err(D::Error::custom(ConfigError::TimeFormat(format.clone())));
        }

        for name in [&helper.file_list_name, &helper.time_vector_name]
            .into_iter()
            .flatten()
        {
            if !is_plain_file_name(name) {
                return Err(D::Error::custom(ConfigError::OutputName(name.clone())));
            }
        }

        Ok(Settings {
            output_dtype: helper.output_dtype,
            date_regex,
            date_format: helper.date_format,
            time_format: helper.time_format,
            file_list_name: helper.file_list_name,
            time_vector_name: helper.time_vector_name,
        })
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let settings: Settings = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(settings)
    }
}

/// Everything a single conversion run needs. Built once and passed down the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    file_list: PathBuf,
    output_folder: PathBuf,
    output_dtype: OutputDType,
    date_pattern: DatePattern,
    time_format: String,
    file_list_name: String,
    time_vector_name: String,
}

impl Config {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(file_list: P, output_folder: Q) -> Self {
        Self {
            file_list: file_list.into(),
            output_folder: output_folder.into(),
            output_dtype: OutputDType::default(),
            date_pattern: DatePattern::default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            file_list_name: DEFAULT_FILE_LIST_NAME.to_string(),
            time_vector_name: DEFAULT_TIME_VECTOR_NAME.to_string(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        if let Some(dtype) = settings.output_dtype {
            self.output_dtype = dtype;
        }
        if let Some(regex) = settings.date_regex {
            self.date_pattern.regex = regex;
        }
        if let Some(format) = settings.date_format {
            self.date_pattern.format = format;
        }
        if let Some(format) = settings.time_format {
            self.time_format = format;
        }
        if let Some(name) = settings.file_list_name {
            self.file_list_name = name;
        }
        if let Some(name) = settings.time_vector_name {
            self.time_vector_name = name;
        }
        self
    }

    pub fn with_output_dtype(mut self, output_dtype: OutputDType) -> Self {
        self.output_dtype = output_dtype;
        self
    }

    pub fn with_date_regex(mut self, regex: &str) -> Result<Self, ConfigError> {
        self.date_pattern.regex = Regex::new(regex)?;
        Ok(self)
    }

    pub fn with_date_format(mut self, format: &str) -> Result<Self, ConfigError> {
        if !is_valid_strftime(format) {
            return Err(ConfigError::DateFormat(format.to_string()));
        }
        self.date_pattern.format = format.to_string();
        Ok(self)
    }

    pub fn with_time_format(mut self, format: &str) -> Result<Self, ConfigError> {
        if !is_valid_time_format(format) {
            return Err(ConfigError::TimeFormat(format.to_string()));
        }
        self.time_format = format.to_string();
        Ok(self)
    }

    pub fn file_list(&self) -> &Path {
        &self.file_list
    }

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    pub fn output_dtype(&self) -> OutputDType {
        self.output_dtype
    }

    pub fn date_pattern(&self) -> &DatePattern {
        &self.date_pattern
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    pub fn file_list_output_path(&self) -> PathBuf {
        self.output_folder.join(&self.file_list_name)
    }

    pub fn time_vector_path(&self) -> PathBuf {
        self.output_folder.join(&self.time_vector_name)
    }
}
