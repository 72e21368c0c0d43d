use gdal::errors::GdalError;
use gdal::{Dataset, GeoTransform};
use std::fmt;
use std::path::{Path, PathBuf};

pub trait RasterReader {
    fn read_raster(&self) -> Result<RasterDataset, ReadError>;
}

#[derive(Debug)]
pub enum ReadError {
    Open { path: PathBuf, source: GdalError },
    NoBands,
    BandSize {
        band: usize,
        size: (usize, usize),
        expected: (usize, usize),
    },
    Gdal(GdalError),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Open { path, source } => {
                write!(f, "unable to open raster {}: {}", path.display(), source)
            }
            ReadError::NoBands => write!(f, "unsupported band layout: raster has no bands"),
            ReadError::BandSize {
                band,
                size,
                expected,
            } => write!(
                f,
                "unsupported band layout: band {} is {}x{}, dataset is {}x{}",
                band, size.0, size.1, expected.0, expected.1
            ),
            ReadError::Gdal(e) => write!(f, "GDAL error: {}", e),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<GdalError> for ReadError {
    fn from(err: GdalError) -> ReadError {
        ReadError::Gdal(err)
    }
}

/// An opened source raster together with the metadata that has to survive the conversion.
/// Dropping it closes the underlying GDAL handle.
pub struct RasterDataset {
    pub path: PathBuf,
    pub dataset: Dataset,
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geo_transform: Option<GeoTransform>,
    pub projection: String,
    pub no_data: Vec<Option<f64>>,
}

impl RasterDataset {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_georeference(&self) -> bool {
        self.geo_transform.is_some() || !self.projection.is_empty()
    }
}

impl fmt::Debug for RasterDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterDataset")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("band_count", &self.band_count)
            .field("geo_transform", &self.geo_transform)
            .field("no_data", &self.no_data)
            .finish()
    }
}

impl fmt::Display for RasterDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Path: {}\nWidth: {}\nHeight: {}\nBands: {}\nGeoreferenced: {}",
            self.path.display(),
            self.width,
            self.height,
            self.band_count,
            self.has_georeference(),
        )
    }
}
