use serde::{Deserialize, Serialize};

/// A named, colored category nodes can reference through `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl LegendEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Color if one is set
    pub fn color(&self) -> Option<&str> {
        (!self.color.is_empty()).then_some(self.color.as_str())
    }

    /// Case-insensitive color comparison
    pub fn matches_color(&self, color: &str) -> bool {
        self.color().is_some_and(|own| own.eq_ignore_ascii_case(color))
    }
}

/// Look up an entry by id
pub fn find_entry<'a>(legend: &'a [LegendEntry], id: &str) -> Option<&'a LegendEntry> {
    legend.iter().find(|entry| entry.id == id)
}
