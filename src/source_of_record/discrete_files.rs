use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::source_of_record::{SourceError, SourceOfRecord};

/// Reads a directory in which every file holds exactly one serialized record.
///
/// The source is strictly read-only: it never creates, rewrites, or deletes
/// record files. A file that cannot be opened or deserialized fails the whole
/// bulk read, since a partial record set would silently hide records from the
/// cache for the life of the process. Entries that are not regular files
/// (subdirectories, sockets) are ignored.
pub struct DiscreteFileSource<Value, Format>
where
    Value: DeserializeOwned,
    Format: DiscreteFileDeserializer<Value>,
{
    record_directory: PathBuf,
    phantom_format: PhantomData<Format>,
    phantom_value: PhantomData<Value>,
}

impl<Value, Format> DiscreteFileSource<Value, Format>
where
    Value: DeserializeOwned,
    Format: DiscreteFileDeserializer<Value>,
{
    pub fn new(record_directory: PathBuf) -> Self {
        DiscreteFileSource {
            record_directory,
            phantom_format: Default::default(),
            phantom_value: Default::default(),
        }
    }
}

impl<Value, Format> SourceOfRecord<Value> for DiscreteFileSource<Value, Format>
where
    Value: DeserializeOwned,
    Format: DiscreteFileDeserializer<Value>,
{
    fn retrieve_all(&self) -> Result<Vec<Value>, SourceError> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.record_directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let file = File::open(entry.path())?;
            records.push(Format::deserialize(BufReader::new(file))?);
        }

        Ok(records)
    }
}

/// Abstracts away the on-disk format of individual record files.
///
/// Buffered reads are used because a discrete-file layout implies a fair
/// amount of I/O sys-calls per bulk read.
pub trait DiscreteFileDeserializer<Value>
where
    Value: DeserializeOwned,
{
    fn deserialize(buffered_reader: BufReader<File>) -> Result<Value, SourceError>;
}

pub struct JsonFormat;

impl<Value: DeserializeOwned> DiscreteFileDeserializer<Value> for JsonFormat {
    fn deserialize(buffered_reader: BufReader<File>) -> Result<Value, SourceError> {
        Ok(serde_json::from_reader(buffered_reader)?)
    }
}

pub struct BincodeFormat;

impl<Value: DeserializeOwned> DiscreteFileDeserializer<Value> for BincodeFormat {
    fn deserialize(buffered_reader: BufReader<File>) -> Result<Value, SourceError> {
        Ok(bincode::deserialize_from(buffered_reader)?)
    }
}

pub type DiscreteFileSourceJson<Value> = DiscreteFileSource<Value, JsonFormat>;
pub type DiscreteFileSourceBincode<Value> = DiscreteFileSource<Value, BincodeFormat>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Region {
        id: String,
        display_name: String,
    }

    fn make_region(id: &str, display_name: &str) -> Region {
        Region {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    fn write_json_records(directory: &TempDir, regions: &[Region]) {
        for region in regions {
            let path = directory.path().join(format!("{}.json", region.id));
            fs::write(path, serde_json::to_vec(region).unwrap()).unwrap();
        }
    }

    #[test]
    fn loads_every_json_record_file() {
        let directory = TempDir::new().unwrap();
        write_json_records(
            &directory,
            &[make_region("eu", "Europe"), make_region("ap", "Asia Pacific")],
        );

        let source: DiscreteFileSourceJson<Region> =
            DiscreteFileSource::new(directory.path().to_path_buf());
        let mut records = source.retrieve_all().unwrap();
        records.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(
            records,
            vec![make_region("ap", "Asia Pacific"), make_region("eu", "Europe")]
        );
    }

    #[test]
    fn loads_bincode_record_files() {
        let directory = TempDir::new().unwrap();
        let region = make_region("us", "United States");
        fs::write(
            directory.path().join("us.bin"),
            bincode::serialize(&region).unwrap(),
        )
        .unwrap();

        let source: DiscreteFileSourceBincode<Region> =
            DiscreteFileSource::new(directory.path().to_path_buf());

        assert_eq!(source.retrieve_all().unwrap(), vec![region]);
    }

    #[test]
    fn malformed_file_fails_the_whole_read() {
        let directory = TempDir::new().unwrap();
        write_json_records(&directory, &[make_region("eu", "Europe")]);
        fs::write(directory.path().join("broken.json"), b"not json").unwrap();

        let source: DiscreteFileSourceJson<Region> =
            DiscreteFileSource::new(directory.path().to_path_buf());

        assert!(source.retrieve_all().is_err());
    }

    #[test]
    fn missing_directory_fails_the_read() {
        let source: DiscreteFileSourceJson<Region> =
            DiscreteFileSource::new(PathBuf::from("/nonexistent/records"));

        assert!(source.retrieve_all().is_err());
    }

    #[test]
    fn subdirectories_are_ignored() {
        let directory = TempDir::new().unwrap();
        write_json_records(&directory, &[make_region("eu", "Europe")]);
        fs::create_dir(directory.path().join("archive")).unwrap();

        let source: DiscreteFileSourceJson<Region> =
            DiscreteFileSource::new(directory.path().to_path_buf());

        assert_eq!(source.retrieve_all().unwrap().len(), 1);
    }
}
