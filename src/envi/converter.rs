use gdal::errors::GdalError;
use gdal::raster::{Buffer, GdalType};
use gdal::{Dataset, Driver, DriverManager};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::header::{EnviHeader, HeaderError};
use crate::config::OutputDType;
use crate::readers::RasterDataset;

/// Rows copied per read/write call, bounding memory for large scenes.
const STRIP_ROWS: usize = 512;

pub const ENVI_EXTENSION: &str = "img";

#[derive(Debug)]
pub enum ConvertError {
    Driver(GdalError),
    NoFileName(PathBuf),
    Create { path: PathBuf, source: GdalError },
    Georeference(GdalError),
    Band { band: usize, source: GdalError },
    Header(HeaderError),
    HeaderMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    NoDataMismatch { expected: Option<f64>, found: f64 },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Driver(e) => write!(f, "ENVI driver not available: {}", e),
            ConvertError::NoFileName(path) => {
                write!(f, "cannot derive an output name from {}", path.display())
            }
            ConvertError::Create { path, source } => {
                write!(f, "unable to create ENVI file {}: {}", path.display(), source)
            }
            ConvertError::Georeference(e) => write!(f, "failed to copy georeferencing: {}", e),
            ConvertError::Band { band, source } => {
                write!(f, "failed to copy band {}: {}", band, source)
            }
            ConvertError::Header(e) => write!(f, "invalid ENVI header: {}", e),
            ConvertError::HeaderMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "ENVI header '{}' is {}, expected {}",
                field, found, expected
            ),
            ConvertError::NoDataMismatch { expected, found } => match expected {
                Some(expected) => write!(
                    f,
                    "ENVI header 'data ignore value' is {}, expected {}",
                    found, expected
                ),
                None => write!(
                    f,
                    "ENVI header 'data ignore value' is {}, expected none",
                    found
                ),
            },
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<HeaderError> for ConvertError {
    fn from(err: HeaderError) -> ConvertError {
        ConvertError::Header(err)
    }
}

/// `<output_folder>/<input stem>.img`. Deterministic, so a rerun overwrites the previous output.
pub fn envi_output_path(input: &Path, output_folder: &Path) -> Option<PathBuf> {
    let stem = input.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ENVI_EXTENSION);
    Some(output_folder.join(name))
}

/// The ENVI driver replaces the raw file's extension with `.hdr`.
pub fn header_path(envi_path: &Path) -> PathBuf {
    envi_path.with_extension("hdr")
}

pub struct EnviConverter {
    driver: Driver,
    output_folder: PathBuf,
    output_dtype: OutputDType,
}

impl EnviConverter {
    pub fn new<P: Into<PathBuf>>(
        output_folder: P,
        output_dtype: OutputDType,
    ) -> Result<Self, ConvertError> {
        let driver = DriverManager::get_driver_by_name("ENVI").map_err(ConvertError::Driver)?;

        Ok(Self {
            driver,
            output_folder: output_folder.into(),
            output_dtype,
        })
    }

    pub fn output_path(&self, input: &Path) -> Option<PathBuf> {
        envi_output_path(input, &self.output_folder)
    }

    /// Writes `source` as an ENVI cube of the configured type and returns the path of the raw file.
    ///
    /// Samples are cast by GDAL's raster I/O: float to integer conversions round to the nearest
    /// value and saturate at the bounds of the target type.
    ///
    /// On failure the raw file and header are removed, so no partial or stale cube is left under
    /// the output name.
    pub fn convert(&self, source: &RasterDataset) -> Result<PathBuf, ConvertError> {
        let output_path = self
            .output_path(source.path())
            .ok_or_else(|| ConvertError::NoFileName(source.path().to_path_buf()))?;

        match self.write(&output_path, source) {
            Ok(()) => {
                debug!(path = %output_path.display(), "ENVI file written");
                Ok(output_path)
            }
            Err(e) => {
                remove_outputs(&output_path);
                Err(e)
            }
        }
    }

    fn write(&self, output_path: &Path, source: &RasterDataset) -> Result<(), ConvertError> {
        {
            let mut target = self.create(output_path, source)?;

            if let Some(geo_transform) = &source.geo_transform {
                target
                    .set_geo_transform(geo_transform)
                    .map_err(ConvertError::Georeference)?;
            }
            if !source.projection.is_empty() {
                target
                    .set_projection(&source.projection)
                    .map_err(ConvertError::Georeference)?;
            }

            match self.output_dtype {
                OutputDType::UInt8 => copy_bands::<u8>(source, &target, self.output_dtype)?,
                OutputDType::Int16 => copy_bands::<i16>(source, &target, self.output_dtype)?,
                OutputDType::Float32 => copy_bands::<f32>(source, &target, self.output_dtype)?,
            }
            // dropping the target closes it and flushes the header
        }

        let header = EnviHeader::from_file(header_path(output_path))?;
        self.check_header(&header, source)
    }

    fn create(&self, path: &Path, source: &RasterDataset) -> Result<Dataset, ConvertError> {
        let (width, height, bands) = (source.width, source.height, source.band_count);
        let created = match self.output_dtype {
            OutputDType::UInt8 => self
                .driver
                .create_with_band_type::<u8, _>(path, width, height, bands),
            OutputDType::Int16 => self
                .driver
                .create_with_band_type::<i16, _>(path, width, height, bands),
            OutputDType::Float32 => self
                .driver
                .create_with_band_type::<f32, _>(path, width, height, bands),
        };

        created.map_err(|source| ConvertError::Create {
            path: path.to_path_buf(),
            source,
        })
    }

    fn check_header(&self, header: &EnviHeader, source: &RasterDataset) -> Result<(), ConvertError> {
        let checks = [
            ("samples", source.width, header.samples),
            ("lines", source.height, header.lines),
            ("bands", source.band_count, header.bands),
            (
                "data type",
                self.output_dtype.envi_code() as usize,
                header.data_type as usize,
            ),
        ];

        for (field, expected, found) in checks {
            if expected != found {
                return Err(ConvertError::HeaderMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }

        // One ignore value per cube; GDAL writes the first band's nodata.
        if let Some(found) = header.data_ignore_value {
            let expected = source
                .no_data
                .first()
                .copied()
                .flatten()
                .filter(|v| self.output_dtype.can_represent(*v));
            let same = expected.is_some_and(|v| v == found || (v.is_nan() && found.is_nan()));
            if !same {
                return Err(ConvertError::NoDataMismatch { expected, found });
            }
        }

        Ok(())
    }
}

fn remove_outputs(output_path: &Path) {
    for path in [output_path.to_path_buf(), header_path(output_path)] {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed partial output"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial output"),
        }
    }
}

fn copy_bands<T: GdalType + Copy>(
    source: &RasterDataset,
    target: &Dataset,
    output_dtype: OutputDType,
) -> Result<(), ConvertError> {
    let width = source.width;

    for index in 1..=source.band_count {
        let band_err = |source| ConvertError::Band {
            band: index,
            source,
        };

        let src_band = source.dataset.rasterband(index).map_err(band_err)?;
        let mut tgt_band = target.rasterband(index).map_err(band_err)?;

        if let Some(no_data) = source.no_data.get(index - 1).copied().flatten() {
            if output_dtype.can_represent(no_data) {
                tgt_band
                    .set_no_data_value(Some(no_data))
                    .map_err(band_err)?;
            } else {
                warn!(
                    path = %source.path.display(),
                    band = index,
                    no_data,
                    dtype = %output_dtype,
                    "nodata value not representable in output type, dropped"
                );
            }
        }

        let mut row = 0;
        while row < source.height {
            let rows = STRIP_ROWS.min(source.height - row);
            let window = (0, row as isize);
            let mut buffer: Buffer<T> = src_band
                .read_as::<T>(window, (width, rows), (width, rows), None)
                .map_err(band_err)?;
            tgt_band
                .write(window, (width, rows), &mut buffer)
                .map_err(band_err)?;
            row += rows;
        }
    }

    Ok(())
}
