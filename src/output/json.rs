//! JSON link-map writer
//!
//! Writes the link map as a single pretty-printed JSON object to a timestamped file.

use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::state::LinkMap;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// strftime pattern for output file names
const FILE_NAME_FORMAT: &str = "krawl_%h-%m-%d_%H-%M-%S.json";

/// Builds the output file name for a run finished at `timestamp`
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use krawler::output::output_file_name;
///
/// let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(output_file_name(&timestamp), "krawl_Mar-03-09_14-05-07.json");
/// ```
pub fn output_file_name(timestamp: &DateTime<Local>) -> String {
    timestamp.format(FILE_NAME_FORMAT).to_string()
}

/// Writes link maps as JSON files into a directory
#[derive(Debug, Clone)]
pub struct JsonFileOutput {
    directory: PathBuf,
}

impl JsonFileOutput {
    /// Creates a writer targeting `directory`
    ///
    /// The directory is created on first write if it does not exist.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Writes the link map to `path`, pretty-printed with a two-space indent
    pub fn write_to(&self, link_map: &LinkMap, path: &Path) -> OutputResult<()> {
        fs::create_dir_all(&self.directory)?;

        let file = File::create(path).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, link_map)?;
        writer.flush().map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

impl OutputHandler for JsonFileOutput {
    fn write_link_map(&self, link_map: &LinkMap) -> OutputResult<PathBuf> {
        let path = self.directory.join(output_file_name(&Local::now()));
        self.write_to(link_map, &path)?;
        tracing::info!("Link map written to {}", path.display());
        Ok(path)
    }
}
