use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::DriverManager;
use std::path::Path;

pub const GEO_TRANSFORM: [f64; 6] = [10.0, 0.5, 0.0, 50.0, 0.0, -0.5];

/// Writes a small float32 GeoTIFF in EPSG:4326, one `Vec` of `width * height` samples per band.
pub fn write_geotiff(
    path: &Path,
    width: usize,
    height: usize,
    bands: &[Vec<f32>],
    no_data: Option<f64>,
) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = driver
        .create_with_band_type::<f32, _>(path, width, height, bands.len())
        .unwrap();

    dataset.set_geo_transform(&GEO_TRANSFORM).unwrap();
    let srs = SpatialRef::from_epsg(4326).unwrap();
    dataset.set_projection(&srs.to_wkt().unwrap()).unwrap();

    for (index, values) in bands.iter().enumerate() {
        assert_eq!(values.len(), width * height);
        let mut band = dataset.rasterband(index + 1).unwrap();
        if let Some(no_data) = no_data {
            band.set_no_data_value(Some(no_data)).unwrap();
        }
        let mut buffer = Buffer::new((width, height), values.clone());
        band.write((0, 0), (width, height), &mut buffer).unwrap();
    }
}

/// A 4x3 single band raster with values 0..12.
pub fn write_simple_geotiff(path: &Path) {
    let values: Vec<f32> = (0..12).map(|v| v as f32).collect();
    write_geotiff(path, 4, 3, &[values], None);
}
