use std::path::PathBuf;

/// All file paths for one pipeline run. Built once in `main` and passed
/// down explicitly; nothing reads configuration from globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub details_path: PathBuf,
    pub estimates_path: PathBuf,
    pub crosswalk_path: PathBuf,
    pub out_path: PathBuf,
    pub zip1_path: PathBuf,
    pub zip2_path: PathBuf,
}

impl Config {
    /// Creates a config with the three input paths and the fixed output
    /// file names.
    pub fn new(details: PathBuf, estimates: PathBuf, crosswalk: PathBuf) -> Self {
        Config {
            details_path: details,
            estimates_path: estimates,
            crosswalk_path: crosswalk,
            out_path: PathBuf::from("out.csv"),
            zip1_path: PathBuf::from("zip1.csv"),
            zip2_path: PathBuf::from("zip2.csv"),
        }
    }
}
