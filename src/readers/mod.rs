pub mod file_list;
pub mod geotiff;
pub mod types;
pub mod utils;

pub use file_list::read_file_list;
pub use geotiff::GeoTiffReader;
pub use types::{RasterDataset, RasterReader, ReadError};
pub use utils::is_geotiff_extension;
