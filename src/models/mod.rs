use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Page ───────────────────────────────────────────────────────────────────

/// Structured snapshot of one assignment-list page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The marked container holding the assignment table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_list: Option<Container>,
    /// Summary table read by the completion-percentage widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Table>,
}

impl Page {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ─── Container ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Container {
    pub fn first_table_mut(&mut self) -> Option<&mut Table> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Heading(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Heading(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading(Heading),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

// ─── Table ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<Row>,
    /// `None` when the table has no body element at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Row>>,
}

impl Table {
    /// Copy of this table with the same head and an empty body.
    pub fn empty_copy(&self) -> Self {
        Self {
            head: self.head.clone(),
            body: Some(Vec::new()),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.head.iter().chain(self.body.iter().flatten())
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.head.iter_mut().chain(self.body.iter_mut().flatten())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl Row {
    #[cfg(test)]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.style.is_hidden()
    }

    /// Numbering cell, if the row carries one.
    pub fn num_cell_mut(&mut self) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.has_class("num"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// `th` rather than `td`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub header: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl Cell {
    #[cfg(test)]
    pub fn td(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn th(text: impl Into<String>) -> Self {
        Self {
            header: true,
            text: text.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

// ─── Inline style ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub important: bool,
}

/// Inline `style` declarations keyed by CSS property name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<String, StyleValue>);

impl Style {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn set(&mut self, property: &str, value: &str) {
        self.insert(property, value, false);
    }

    /// Equivalent of `style.setProperty(property, value, "important")`.
    pub fn set_important(&mut self, property: &str, value: &str) {
        self.insert(property, value, true);
    }

    pub fn insert(&mut self, property: &str, value: &str, important: bool) {
        self.0.insert(
            property.to_string(),
            StyleValue {
                value: value.to_string(),
                important,
            },
        );
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(|v| v.value.as_str())
    }

    pub fn remove(&mut self, property: &str) {
        self.0.remove(property);
    }

    pub fn is_hidden(&self) -> bool {
        self.get("display") == Some("none")
    }

    pub fn is_struck(&self) -> bool {
        self.get("text-decoration") == Some("line-through")
    }

    /// Serialized form for an HTML `style` attribute.
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(prop, v)| {
                if v.important {
                    format!("{prop}: {} !important", v.value)
                } else {
                    format!("{prop}: {}", v.value)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
