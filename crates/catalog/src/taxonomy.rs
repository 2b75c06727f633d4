use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use shoplist_document::{
    DocumentStore, Section, DEFAULT_CATEGORIES, DEFAULT_STORES, DEFAULT_UNITS,
};
use std::fmt;

/// Marker strings older documents stored in place of the "type a new one" entry.
const LEGACY_REQUEST_NEW_MARKERS: &[&str] = &["Inne...", "Other..."];

/// Case-insensitive name comparison used for taxonomy entries, store filters
/// and category grouping.
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// True for strings older documents used as the "type a new one" marker.
#[must_use]
pub fn is_request_new_marker(name: &str) -> bool {
    LEGACY_REQUEST_NEW_MARKERS
        .iter()
        .any(|marker| same_name(marker, name.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    Categories,
    Units,
    Stores,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 3] = [Taxonomy::Categories, Taxonomy::Units, Taxonomy::Stores];

    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Taxonomy::Categories => Section::Categories,
            Taxonomy::Units => Section::Units,
            Taxonomy::Stores => Section::Stores,
        }
    }

    /// Entries used when the document cannot be read.
    #[must_use]
    pub const fn defaults(self) -> &'static [&'static str] {
        match self {
            Taxonomy::Categories => DEFAULT_CATEGORIES,
            Taxonomy::Units => DEFAULT_UNITS,
            Taxonomy::Stores => DEFAULT_STORES,
        }
    }

    /// Singular noun for prompts and messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Taxonomy::Categories => "category",
            Taxonomy::Units => "unit",
            Taxonomy::Stores => "store",
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable entry of a materialized taxonomy list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyChoice {
    Predefined(String),
    /// Ask the user for a new entry.
    RequestNew,
}

/// Ordered, case-insensitively distinct names of one taxonomy.
///
/// The materialized list always ends with exactly one
/// [`TaxonomyChoice::RequestNew`]; [`TaxonomyList::choices`] yields it last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyList {
    taxonomy: Taxonomy,
    names: Vec<String>,
}

impl TaxonomyList {
    /// Builds a list from raw names, dropping blanks, legacy markers and
    /// case-insensitive duplicates (first spelling wins).
    pub fn from_names<I, S>(taxonomy: Taxonomy, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            taxonomy,
            names: Vec::new(),
        };
        for name in names {
            list.push_name(name.as_ref());
        }
        list
    }

    #[must_use]
    pub fn defaults(taxonomy: Taxonomy) -> Self {
        Self::from_names(taxonomy, taxonomy.defaults())
    }

    #[must_use]
    pub const fn taxonomy(&self) -> Taxonomy {
        self.taxonomy
    }

    /// Real entries, without the trailing request-new choice.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn choices(&self) -> impl Iterator<Item = TaxonomyChoice> + '_ {
        self.names
            .iter()
            .cloned()
            .map(TaxonomyChoice::Predefined)
            .chain(std::iter::once(TaxonomyChoice::RequestNew))
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|existing| same_name(existing, name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Inserts `name` before the request-new choice. Returns false for blanks,
    /// markers and names already present.
    pub fn push_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || is_request_new_marker(name) || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }
}

/// Reads and grows the category, unit and store lists.
///
/// Each call reloads the document; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct TaxonomyManager {
    store: DocumentStore,
}

impl TaxonomyManager {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Loads a taxonomy, falling back to its defaults when the document cannot
    /// be read or parsed. Never fails, so data entry stays possible.
    #[must_use]
    pub fn load(&self, taxonomy: Taxonomy) -> TaxonomyList {
        match self.try_load(taxonomy) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("Using default {taxonomy} list: {err}");
                TaxonomyList::defaults(taxonomy)
            }
        }
    }

    /// Loads a taxonomy through `load_or_create`, propagating errors.
    pub fn try_load(&self, taxonomy: Taxonomy) -> Result<TaxonomyList> {
        let mut doc = self.store.load_or_create()?;
        let nodes = doc.ensure_section(taxonomy.section());
        Ok(TaxonomyList::from_names(
            taxonomy,
            nodes.iter().filter_map(Value::as_str),
        ))
    }

    /// Adds `name` before the request-new choice unless it is blank or already
    /// present (case-insensitively), then rewrites the whole section.
    /// Returns whether the name was added.
    ///
    /// The section is rewritten from the normalized list, so stored entries
    /// that are not strings, blank, legacy markers or case-duplicates are
    /// dropped from the document on a successful add.
    pub fn add_if_absent(&self, taxonomy: Taxonomy, name: &str) -> Result<bool> {
        let mut doc = self.store.load_or_create()?;
        let nodes = doc.ensure_section(taxonomy.section());
        let stored = nodes.len();
        let mut list = TaxonomyList::from_names(taxonomy, nodes.iter().filter_map(Value::as_str));
        if !list.push_name(name) {
            return Ok(false);
        }

        let dropped = stored + 1 - list.names().len();
        if dropped > 0 {
            log::debug!("Dropping {dropped} invalid or duplicate {taxonomy} entries");
        }
        doc.set_names(taxonomy.section(), list.names());
        self.store.save(&doc)?;
        log::debug!("Added {taxonomy} '{}'", name.trim());
        Ok(true)
    }
}
