//! JSON readers and writers.
//!
//! The stream functions are generic over `Read`/`Write` so tests can use
//! byte buffers; [`load`] and [`save`] wrap them for files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DatasetError;

/// File name of the network description.
pub const NETWORK_FILE: &str = "network.json";
/// File name of the level series.
pub const HISTORY_FILE: &str = "historical_data.json";
/// File name of the ticket list.
pub const TICKET_FILE: &str = "transport_tickets.json";
/// File name of the unreported-drain list.
pub const DRAIN_FILE: &str = "unreported_drains.json";
/// File name of the detailed courier schedules.
pub const SCHEDULE_FILE: &str = "courier_schedules.json";

/// Decode one JSON document.
pub fn read_json<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, DatasetError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Encode one pretty-printed JSON document followed by a newline.
pub fn write_json<T: Serialize, W: Write>(mut writer: W, value: &T) -> Result<(), DatasetError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a JSON file.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::File {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(file)
}

/// Write a JSON file, replacing any existing one.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), DatasetError> {
    let file = File::create(path).map_err(|source| DatasetError::File {
        path: path.to_path_buf(),
        source,
    })?;
    write_json(BufWriter::new(file), value)
}

/// Locations of the dataset files inside one directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetPaths {
    dir: PathBuf,
}

impl DatasetPaths {
    /// Files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory itself.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `network.json`.
    pub fn network(&self) -> PathBuf {
        self.dir.join(NETWORK_FILE)
    }

    /// `historical_data.json`.
    pub fn history(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    /// `transport_tickets.json`.
    pub fn tickets(&self) -> PathBuf {
        self.dir.join(TICKET_FILE)
    }

    /// `unreported_drains.json`.
    pub fn drains(&self) -> PathBuf {
        self.dir.join(DRAIN_FILE)
    }

    /// `courier_schedules.json`.
    pub fn schedules(&self) -> PathBuf {
        self.dir.join(SCHEDULE_FILE)
    }

    /// Whether a history already exists to continue from.
    pub fn has_history(&self) -> bool {
        self.history().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::DateRange;

    #[test]
    fn stream_round_trip() {
        let range = DateRange {
            start: Some("2024-10-30T00:00:00Z".into()),
            end: None,
        };
        let mut buf = Vec::new();
        write_json(&mut buf, &range).unwrap();
        assert!(buf.ends_with(b"}\n"));
        let back: DateRange = read_json(buf.as_slice()).unwrap();
        assert_eq!(back, range);
    }

    #[test]
    fn truncated_document_is_a_json_error() {
        match read_json::<DateRange, _>(&b"{\"start\": "[..]) {
            Err(DatasetError::Json(_)) => {}
            other => panic!("expected Json, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_names_the_path() {
        let paths = DatasetPaths::new("/definitely/not/here");
        match load::<DateRange>(&paths.history()) {
            Err(DatasetError::File { path, .. }) => assert_eq!(path, paths.history()),
            other => panic!("expected File, got {other:?}"),
        }
        assert!(!paths.has_history());
    }
}
