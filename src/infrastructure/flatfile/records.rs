use crate::domain::entities::document::Document;

/// Ordered document list, positionally aligned with the similarity index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Document>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(records: Vec<Document>) -> Self {
        Self { records }
    }

    pub fn append(&mut self, record: Document) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[Document] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Document> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Keeps only records for which `predicate` is false, preserving the
    /// relative order of survivors. Returns how many were removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Document) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|r| !predicate(r));
        before - self.records.len()
    }
}
