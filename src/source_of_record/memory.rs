use crate::source_of_record::{SourceError, SourceOfRecord};

/// A fixed record set held directly in memory.
///
/// Useful as the backing source in tests and for record sets small enough to
/// compile into the binary.
#[derive(Default)]
pub struct InMemorySource<Value> {
    records: Vec<Value>,
}

impl<Value> InMemorySource<Value> {
    pub fn new(records: Vec<Value>) -> Self {
        InMemorySource { records }
    }
}

impl<Value: Clone> SourceOfRecord<Value> for InMemorySource<Value> {
    fn retrieve_all(&self) -> Result<Vec<Value>, SourceError> {
        Ok(self.records.clone())
    }
}
