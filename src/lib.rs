pub mod batch;
pub mod config;
pub mod date_extract;
pub mod envi;
pub mod readers;

#[cfg(test)]
mod test_support;
