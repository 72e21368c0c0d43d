use std::path::PathBuf;

use clap::Parser;
use geotiff2envi::config::OutputDType;

/// GeoTIFF to ENVI conversion tool.
///
/// Converts every GeoTIFF named in FILE_LIST_PATH to an ENVI raster in OUTPUT_FOLDER and writes
/// the list of produced files plus a time vector parsed from the input filenames.
#[derive(Parser, Debug)]
#[command(name = "geotiff2envi", version, about)]
pub struct Cli {
    /// Text file with one GeoTIFF path per line (e.g. `ls -d $PWD/*.tif > filelist_input.txt`).
    pub file_list_path: PathBuf,

    /// Folder for the ENVI files and the output lists, created if absent.
    pub output_folder: PathBuf,

    /// Data type of the output ENVI files [default: float32].
    #[arg(long = "output_dtype", visible_alias = "output-dtype", value_enum)]
    pub output_dtype: Option<OutputDType>,

    /// JSON file with date pattern, time format and output name overrides.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Regular expression locating the date token in each filename [default: \d{8}].
    #[arg(long)]
    pub date_regex: Option<String>,

    /// chrono format of the matched date token [default: %Y%m%d].
    #[arg(long)]
    pub date_format: Option<String>,

    /// chrono format of the time vector lines, `%Y%j` gives YYYYDOY [default: %Y-%m-%d].
    #[arg(long)]
    pub time_format: Option<String>,

    /// Also write a JSON report of every converted and failed file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Exit with a non-zero status when any file failed.
    #[arg(long)]
    pub strict: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
