use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// Pixel type written to every ENVI output of a run.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputDType {
    #[serde(rename = "uint8")]
    #[value(name = "uint8")]
    UInt8,
    #[serde(rename = "int16")]
    #[value(name = "int16")]
    Int16,
    #[default]
    #[serde(rename = "float32")]
    #[value(name = "float32")]
    Float32,
}

impl OutputDType {
    /// Numeric code used by the `data type` field of an ENVI header.
    pub fn envi_code(&self) -> u8 {
        match self {
            OutputDType::UInt8 => 1,
            OutputDType::Int16 => 2,
            OutputDType::Float32 => 4,
        }
    }

    /// Whether `value` survives a round trip through this type unchanged.
    pub fn can_represent(&self, value: f64) -> bool {
        match self {
            OutputDType::UInt8 => value.fract() == 0.0 && (0.0..=255.0).contains(&value),
            OutputDType::Int16 => {
                value.fract() == 0.0 && (i16::MIN as f64..=i16::MAX as f64).contains(&value)
            }
            OutputDType::Float32 => value.is_nan() || (value as f32) as f64 == value,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputDType::UInt8 => "uint8",
            OutputDType::Int16 => "int16",
            OutputDType::Float32 => "float32",
        }
    }
}

impl fmt::Display for OutputDType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let dtypes: Vec<OutputDType> =
            serde_json::from_str(r#"["uint8", "int16", "float32"]"#).unwrap();
        assert_eq!(
            dtypes,
            vec![OutputDType::UInt8, OutputDType::Int16, OutputDType::Float32]
        );
        assert!(serde_json::from_str::<OutputDType>(r#""float64""#).is_err());
        assert_eq!(OutputDType::Int16.to_string(), "int16");
    }

    #[test]
    fn test_default_is_float32() {
        assert_eq!(OutputDType::default(), OutputDType::Float32);
    }

    #[test]
    fn test_envi_codes() {
        assert_eq!(OutputDType::UInt8.envi_code(), 1);
        assert_eq!(OutputDType::Int16.envi_code(), 2);
        assert_eq!(OutputDType::Float32.envi_code(), 4);
    }

    #[test]
    fn test_can_represent() {
        assert!(OutputDType::UInt8.can_represent(0.0));
        assert!(!OutputDType::UInt8.can_represent(-9999.0));
        assert!(OutputDType::Int16.can_represent(-9999.0));
        assert!(!OutputDType::Int16.can_represent(0.5));
        assert!(OutputDType::Float32.can_represent(f64::NAN));
        assert!(OutputDType::Float32.can_represent(-3.4e38_f32 as f64));
    }
}
