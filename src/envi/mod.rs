pub mod converter;
pub mod header;

pub use converter::{ConvertError, EnviConverter, envi_output_path, header_path};
pub use header::{EnviHeader, HeaderError};
