//! Reader for the plain-text `.hdr` file that accompanies an ENVI raw cube.
//!
//! Only the fields needed to check a conversion are interpreted.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub enum HeaderError {
    Io(std::io::Error),
    MissingMagic,
    MissingField(&'static str),
    InvalidNumber { field: &'static str, value: String },
    Unterminated(String),
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Io(e) => write!(f, "I/O error: {}", e),
            HeaderError::MissingMagic => write!(f, "header does not start with 'ENVI'"),
            HeaderError::MissingField(field) => write!(f, "header has no '{}' field", field),
            HeaderError::InvalidNumber { field, value } => {
                write!(f, "header field '{}' is not a number: '{}'", field, value)
            }
            HeaderError::Unterminated(field) => {
                write!(f, "header field '{}' has an unterminated '{{'", field)
            }
        }
    }
}

impl std::error::Error for HeaderError {}

impl From<std::io::Error> for HeaderError {
    fn from(err: std::io::Error) -> HeaderError {
        HeaderError::Io(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnviHeader {
    pub samples: usize,
    pub lines: usize,
    pub bands: usize,
    pub data_type: u8,
    pub interleave: String,
    pub map_info: Option<String>,
    pub coordinate_system_string: Option<String>,
    pub data_ignore_value: Option<f64>,
}

impl EnviHeader {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HeaderError> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }
}

impl FromStr for EnviHeader {
    type Err = HeaderError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fields = parse_fields(text)?;

        let samples = required(&fields, "samples")?;
        let lines = required(&fields, "lines")?;
        let bands = required(&fields, "bands")?;
        let data_type = required(&fields, "data type")?;

        let data_ignore_value = fields
            .get("data ignore value")
            .map(|v| {
                v.parse::<f64>().map_err(|_| HeaderError::InvalidNumber {
                    field: "data ignore value",
                    value: v.clone(),
                })
            })
            .transpose()?;

        Ok(EnviHeader {
            samples,
            lines,
            bands,
            data_type,
            interleave: fields
                .get("interleave")
                .map(|v| v.to_ascii_lowercase())
                .unwrap_or_else(|| "bsq".to_string()),
            map_info: fields.get("map info").cloned(),
            coordinate_system_string: fields.get("coordinate system string").cloned(),
            data_ignore_value,
        })
    }
}

fn required<T: FromStr>(
    fields: &BTreeMap<String, String>,
    name: &'static str,
) -> Result<T, HeaderError> {
    let value = fields.get(name).ok_or(HeaderError::MissingField(name))?;
    value.parse().map_err(|_| HeaderError::InvalidNumber {
        field: name,
        value: value.clone(),
    })
}

// `key = value` pairs, where a value opened with `{` runs until the matching `}` and may span
// several lines. Keys are lowercased, braces are stripped from values.
fn parse_fields(text: &str) -> Result<BTreeMap<String, String>, HeaderError> {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim() == "ENVI" => {}
        _ => return Err(HeaderError::MissingMagic),
    }

    let mut fields = BTreeMap::new();
    while let Some(line) = lines.next() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let mut value = value.trim().to_string();

        if value.starts_with('{') {
            while !value.contains('}') {
                let next = lines
                    .next()
                    .ok_or_else(|| HeaderError::Unterminated(key.clone()))?;
                value.push('\n');
                value.push_str(next.trim());
            }
            let end = value.rfind('}').unwrap_or(value.len());
            value = value[1..end].trim().to_string();
        }

        fields.insert(key, value);
    }

    Ok(fields)
}
