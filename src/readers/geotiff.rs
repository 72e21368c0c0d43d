use super::{RasterDataset, RasterReader, ReadError};
use gdal::Dataset;
use std::path::PathBuf;

pub struct GeoTiffReader {
    pub path: PathBuf,
}

impl GeoTiffReader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl RasterReader for GeoTiffReader {
    fn read_raster(&self) -> Result<RasterDataset, ReadError> {
        let dataset = Dataset::open(&self.path).map_err(|source| ReadError::Open {
            path: self.path.clone(),
            source,
        })?;

        let (width, height) = dataset.raster_size();
        let band_count = dataset.raster_count();
        if band_count == 0 {
            return Err(ReadError::NoBands);
        }

        // Every band is written into a single ENVI cube, so they must share the dataset's grid.
        let mut no_data = Vec::with_capacity(band_count);
        for index in 1..=band_count {
            let band = dataset.rasterband(index)?;
            let size = band.size();
            if size != (width, height) {
                return Err(ReadError::BandSize {
                    band: index,
                    size,
                    expected: (width, height),
                });
            }
            no_data.push(band.no_data_value());
        }

        let geo_transform = dataset.geo_transform().ok();
        let projection = dataset.projection();

        Ok(RasterDataset {
            path: self.path.clone(),
            dataset,
            width,
            height,
            band_count,
            geo_transform,
            projection,
            no_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GEO_TRANSFORM, write_geotiff, write_simple_geotiff};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene_20210101.tif");
        write_geotiff(&path, 2, 2, &[vec![1.0; 4], vec![2.0; 4]], Some(0.0));

        let raster = GeoTiffReader::new(&path).read_raster().unwrap();
        assert_eq!((raster.width, raster.height), (2, 2));
        assert_eq!(raster.band_count, 2);
        assert_eq!(raster.geo_transform, Some(GEO_TRANSFORM));
        assert!(raster.projection.contains("WGS 84"));
        assert_eq!(raster.no_data, vec![Some(0.0), Some(0.0)]);
        assert!(raster.has_georeference());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = GeoTiffReader::new(dir.path().join("missing.tif")).read_raster();
        assert!(matches!(result, Err(ReadError::Open { .. })));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt_20210101.tif");
        fs::write(&path, b"definitely not a tiff").unwrap();

        let result = GeoTiffReader::new(&path).read_raster();
        assert!(matches!(result, Err(ReadError::Open { .. })));
    }

    #[test]
    fn test_dataset_without_bands() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty_20210101.vrt");
        fs::write(
            &path,
            r#"<VRTDataset rasterXSize="2" rasterYSize="2"></VRTDataset>"#,
        )
        .unwrap();

        let result = GeoTiffReader::new(&path).read_raster();
        assert!(matches!(result, Err(ReadError::NoBands)));
    }

    #[test]
    fn test_display() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.tif");
        write_simple_geotiff(&path);

        let raster = GeoTiffReader::new(&path).read_raster().unwrap();
        let text = raster.to_string();
        assert!(text.contains("Width: 4"));
        assert!(text.contains("Height: 3"));
        assert!(text.contains("Bands: 1"));
    }
}
