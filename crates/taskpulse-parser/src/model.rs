use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One data row of the export, addressable both by header name and by position.
///
/// Headers are shared between every record of a table. A row may carry more values
/// than there are headers (trailing unnamed cells) or fewer (short rows); name lookups
/// only see the cells that line up with a header, positional lookups see everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RawRecord {
    pub fn new(headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self { headers, values }
    }

    /// Value of the first column named exactly `header`.
    pub fn get(&self, header: &str) -> Option<&str> {
        let index = self.headers.iter().position(|h| h == header)?;
        self.value_at(index)
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Header/value pairs in source order, stopping at the shorter of the two.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (header, value) in self.iter() {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone)]
pub struct TabularData {
    pub headers: Arc<[String]>,
    pub records: Vec<RawRecord>,
}

impl TabularData {
    pub fn empty() -> Self {
        Self {
            headers: Arc::from(Vec::new()),
            records: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}
