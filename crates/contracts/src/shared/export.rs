use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Cell of a flat export record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlatValue {
    Number(f64),
    Text(String),
    Empty,
}

impl FlatValue {
    /// Text as written into a spreadsheet cell
    pub fn to_cell(&self) -> String {
        match self {
            FlatValue::Number(n) => n.to_string(),
            FlatValue::Text(s) => s.clone(),
            FlatValue::Empty => String::new(),
        }
    }
}

/// One spreadsheet row: column name and value pairs in column order.
///
/// Serializes as a JSON object whose key order is the column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    pub fields: Vec<(String, FlatValue)>,
}

impl FlatRecord {
    pub fn push(&mut self, column: impl Into<String>, value: FlatValue) {
        self.fields.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&FlatValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for FlatRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
