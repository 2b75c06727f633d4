use crate::error::{DocumentError, Result};
use crate::seed::{DEFAULT_CATEGORIES, DEFAULT_STORES, DEFAULT_UNITS};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Named top-level sections of the shopping list document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Categories,
    Units,
    Stores,
    Products,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Categories,
        Section::Units,
        Section::Stores,
        Section::Products,
    ];

    /// Key of the section inside the root object.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Section::Categories => "Categories",
            Section::Units => "Units",
            Section::Stores => "Stores",
            Section::Products => "Products",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.key() == key)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// In-memory form of the whole document.
///
/// Known sections are kept as node lists; any other top-level keys are carried
/// through untouched so a rewrite never drops data this crate does not model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sections: BTreeMap<Section, Vec<Value>>,
    extra: Map<String, Value>,
}

impl Document {
    /// Document with no sections at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fresh document with default taxonomies and an empty product list.
    #[must_use]
    pub fn seeded() -> Self {
        let mut doc = Self::empty();
        doc.set_names(Section::Categories, DEFAULT_CATEGORIES);
        doc.set_names(Section::Units, DEFAULT_UNITS);
        doc.set_names(Section::Stores, DEFAULT_STORES);
        doc.ensure_section(Section::Products);
        doc
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| DocumentError::FormatError(format!("invalid JSON: {err}")))?;
        let Value::Object(root) = value else {
            return Err(DocumentError::FormatError(
                "document root must be an object".to_string(),
            ));
        };

        let mut doc = Self::empty();
        for (key, value) in root {
            match Section::from_key(&key) {
                Some(section) => match value {
                    Value::Array(nodes) => {
                        doc.sections.insert(section, nodes);
                    }
                    other => {
                        return Err(DocumentError::FormatError(format!(
                            "section {section} must be an array, found {}",
                            kind_of(&other)
                        )));
                    }
                },
                None => {
                    doc.extra.insert(key, value);
                }
            }
        }
        Ok(doc)
    }

    pub fn to_vec_pretty(&self) -> Result<Vec<u8>> {
        let mut root = Map::new();
        for (section, nodes) in &self.sections {
            root.insert(section.key().to_string(), Value::Array(nodes.clone()));
        }
        for (key, value) in &self.extra {
            root.insert(key.clone(), value.clone());
        }
        serde_json::to_vec_pretty(&Value::Object(root))
            .map_err(|err| DocumentError::FormatError(format!("serialize document: {err}")))
    }

    #[must_use]
    pub fn has_section(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    /// Nodes of a section, if it has been materialized.
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&[Value]> {
        self.sections.get(&section).map(Vec::as_slice)
    }

    /// Returns the section's nodes, attaching an empty section first if absent.
    pub fn ensure_section(&mut self, section: Section) -> &mut Vec<Value> {
        self.sections.entry(section).or_default()
    }

    /// Replaces a section with a list of plain string entries.
    pub fn set_names<S: AsRef<str>>(&mut self, section: Section, names: &[S]) {
        let nodes = self.ensure_section(section);
        nodes.clear();
        nodes.extend(names.iter().map(|name| Value::String(name.as_ref().to_string())));
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn seeded_document_has_all_sections() {
        let doc = Document::seeded();
        for section in Section::ALL {
            assert!(doc.has_section(section), "missing {section}");
        }
        assert_eq!(doc.section(Section::Products).map(<[Value]>::len), Some(0));
        assert_eq!(
            doc.section(Section::Units).and_then(|nodes| nodes.first()),
            Some(&json!("pcs"))
        );
    }

    #[test]
    fn ensure_section_is_idempotent() {
        let mut doc = Document::empty();
        doc.ensure_section(Section::Stores).push(json!("Lidl"));
        doc.ensure_section(Section::Stores);
        assert_eq!(doc.section(Section::Stores), Some(&[json!("Lidl")][..]));
    }

    #[test]
    fn unknown_keys_survive_a_rewrite() {
        let raw = br#"{"Categories":["Dairy"],"Version":"legacy","Products":[]}"#;
        let doc = Document::from_slice(raw).unwrap();
        let bytes = doc.to_vec_pretty().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["Version"], json!("legacy"));
        assert_eq!(value["Categories"], json!(["Dairy"]));
        assert!(value.get("Units").is_none());
    }

    #[test]
    fn rejects_non_object_root() {
        let err = Document::from_slice(b"[1, 2]").unwrap_err();
        assert!(err.is_format(), "unexpected error: {err:?}");
    }

    #[test]
    fn rejects_section_of_wrong_shape() {
        let err = Document::from_slice(br#"{"Products": {"Id": "x"}}"#).unwrap_err();
        assert!(err.to_string().contains("Products"), "{err}");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Document::from_slice(b"<ShoppingList>").unwrap_err().is_format());
    }
}
