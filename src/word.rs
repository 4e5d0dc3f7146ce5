use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One vocabulary entry. The shape is defined per language; only the source
/// and target properties are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordRecord(Map<String, Value>);

impl WordRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The prompt text stored under `source_field`
    pub fn prompt(&self, source_field: &str) -> Option<&str> {
        self.0.get(source_field).and_then(Value::as_str)
    }

    /// Case-folded accepted answers stored under `target_field`.
    ///
    /// A bare string counts as a single answer; any other shape has none.
    pub fn accepted_answers(&self, target_field: &str) -> Vec<String> {
        match self.0.get(target_field) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_lowercase)
                .collect(),
            Some(Value::String(value)) => vec![value.to_lowercase()],
            _ => Vec::new(),
        }
    }
}

impl From<Value> for WordRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}
