use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single named value of a view row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewCell {
    pub name: String,
    pub value: Value,
}

/// A row read from a view, keeping the view's column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub cells: Vec<ViewCell>,
}

impl ViewRow {
    pub fn new(cells: Vec<ViewCell>) -> Self {
        Self { cells }
    }

    pub fn push<S: Into<String>>(&mut self, name: S, value: Value) {
        self.cells.push(ViewCell { name: name.into(), value });
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at a column position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index).map(|c| &c.value)
    }

    /// Value of the first column with the given name
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.cells.iter().find(|c| c.name == name).map(|c| &c.value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.name.as_str())
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.cells.into_iter().map(|c| (c.name, c.value)).collect()
    }
}

/// Converts a cell to an integer, truncating fractional values.
/// Numeric strings are accepted; NULL, booleans and other text are not.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_f64))
        }
        _ => None,
    }
}

fn truncate_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}
