use crate::error::{CatalogError, Result};
use crate::prompt::{resolve_choice, ValuePrompt};
use crate::record::Record;
use crate::repository::RecordRepository;
use crate::taxonomy::{Taxonomy, TaxonomyChoice, TaxonomyList, TaxonomyManager};

/// Add/edit workflow for a single record.
///
/// Holds the record being edited together with the taxonomy lists offered to
/// the user, and refreshes a list whenever the user teaches it a new entry.
#[derive(Debug, Clone)]
pub struct RecordEditor {
    record: Record,
    units: TaxonomyList,
    categories: TaxonomyList,
    stores: TaxonomyList,
}

impl RecordEditor {
    /// Editor for a brand-new record. Blank unit, category and store are
    /// prefilled with the first entry of their lists.
    #[must_use]
    pub fn create(taxonomies: &TaxonomyManager) -> Self {
        let mut editor = Self::edit(Record::new(), taxonomies);
        editor.fill_blank(Taxonomy::Units);
        editor.fill_blank(Taxonomy::Categories);
        editor.fill_blank(Taxonomy::Stores);
        editor
    }

    /// Editor over an existing record, left exactly as stored.
    #[must_use]
    pub fn edit(record: Record, taxonomies: &TaxonomyManager) -> Self {
        Self {
            record,
            units: taxonomies.load(Taxonomy::Units),
            categories: taxonomies.load(Taxonomy::Categories),
            stores: taxonomies.load(Taxonomy::Stores),
        }
    }

    /// Preselects a store, e.g. the one the catalog is currently filtered by.
    #[must_use]
    pub fn with_store(mut self, store: &str) -> Self {
        if !store.trim().is_empty() {
            self.record.store = store.trim().to_string();
        }
        self
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    #[must_use]
    pub fn list(&self, taxonomy: Taxonomy) -> &TaxonomyList {
        match taxonomy {
            Taxonomy::Units => &self.units,
            Taxonomy::Categories => &self.categories,
            Taxonomy::Stores => &self.stores,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.record.set_name(name);
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.record.quantity = quantity;
    }

    pub fn set_optional(&mut self, optional: bool) {
        self.record.optional = optional;
    }

    /// Applies a taxonomy choice to the matching field. `RequestNew` goes
    /// through `prompt`; a cancelled prompt keeps the current value.
    pub fn choose(
        &mut self,
        taxonomy: Taxonomy,
        choice: TaxonomyChoice,
        taxonomies: &TaxonomyManager,
        prompt: &mut dyn ValuePrompt,
    ) -> Result<()> {
        let learning = choice == TaxonomyChoice::RequestNew;
        let previous = self.field(taxonomy).clone();
        let value = resolve_choice(taxonomies, taxonomy, choice, &previous, prompt)?;
        if learning && value != previous {
            let list = taxonomies.load(taxonomy);
            match taxonomy {
                Taxonomy::Units => self.units = list,
                Taxonomy::Categories => self.categories = list,
                Taxonomy::Stores => self.stores = list,
            }
        }
        *self.field_mut(taxonomy) = value;
        Ok(())
    }

    #[must_use]
    pub fn can_save(&self) -> bool {
        !self.record.name.trim().is_empty()
    }

    /// Upserts the record. Blank category and store fall back to the first
    /// entry of their lists.
    pub fn save(mut self, repository: &dyn RecordRepository) -> Result<Record> {
        if !self.can_save() {
            return Err(CatalogError::MissingName);
        }
        self.fill_blank(Taxonomy::Categories);
        self.fill_blank(Taxonomy::Stores);
        repository.save(&self.record)?;
        Ok(self.record)
    }

    /// Drops the record from storage, if it was ever saved.
    pub fn discard(self, repository: &dyn RecordRepository) -> Result<()> {
        repository.delete(&self.record.id)
    }

    fn fill_blank(&mut self, taxonomy: Taxonomy) {
        if !self.field(taxonomy).trim().is_empty() {
            return;
        }
        if let Some(first) = self.list(taxonomy).first().map(str::to_string) {
            *self.field_mut(taxonomy) = first;
        }
    }

    fn field(&self, taxonomy: Taxonomy) -> &String {
        match taxonomy {
            Taxonomy::Units => &self.record.unit,
            Taxonomy::Categories => &self.record.category,
            Taxonomy::Stores => &self.record.store,
        }
    }

    fn field_mut(&mut self, taxonomy: Taxonomy) -> &mut String {
        match taxonomy {
            Taxonomy::Units => &mut self.record.unit,
            Taxonomy::Categories => &mut self.record.category,
            Taxonomy::Stores => &mut self.record.store,
        }
    }
}
