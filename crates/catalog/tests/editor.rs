use shoplist_catalog::{
    CatalogError, DocumentRepository, PromptRequest, RecordEditor, RecordRepository, Taxonomy,
    TaxonomyChoice, TaxonomyManager, ValuePrompt,
};
use shoplist_document::DocumentStore;
use tempfile::TempDir;

struct Answer(Option<&'static str>);

impl ValuePrompt for Answer {
    fn ask(&mut self, _request: &PromptRequest) -> Option<String> {
        self.0.map(str::to_string)
    }
}

fn setup(tmp: &TempDir) -> (TaxonomyManager, DocumentRepository) {
    let store = DocumentStore::new(tmp.path().join("ShoppingList.json"));
    (
        TaxonomyManager::new(store.clone()),
        DocumentRepository::new(store),
    )
}

#[test]
fn new_record_is_prefilled_from_first_entries() {
    let tmp = TempDir::new().unwrap();
    let (taxonomies, _) = setup(&tmp);

    let editor = RecordEditor::create(&taxonomies);

    let record = editor.record();
    assert_eq!(record.unit, "pcs");
    assert_eq!(record.category, "Dairy");
    assert_eq!(record.store, "Biedronka");
}

#[test]
fn preselected_store_is_kept() {
    let tmp = TempDir::new().unwrap();
    let (taxonomies, _) = setup(&tmp);

    let editor = RecordEditor::create(&taxonomies).with_store("Lidl");

    assert_eq!(editor.record().store, "Lidl");
}

#[test]
fn blank_name_cannot_be_saved() {
    let tmp = TempDir::new().unwrap();
    let (taxonomies, repo) = setup(&tmp);
    let mut editor = RecordEditor::create(&taxonomies);
    editor.set_name("   ");

    assert!(!editor.can_save());
    let err = editor.save(&repo).unwrap_err();
    assert!(matches!(err, CatalogError::MissingName));
    assert!(repo.load_all().unwrap().is_empty());
}

#[test]
fn save_fills_blank_category_and_store() {
    let tmp = TempDir::new().unwrap();
    let (taxonomies, repo) = setup(&tmp);
    let mut record = shoplist_catalog::Record::new();
    record.set_name("Milk");
    let mut editor = RecordEditor::edit(record, &taxonomies);
    editor.set_quantity(2.0);

    let saved = editor.save(&repo).unwrap();

    assert_eq!(saved.category, "Dairy");
    assert_eq!(saved.store, "Biedronka");
    assert_eq!(repo.load(&saved.id).unwrap(), saved);
}

#[test]
fn request_new_updates_field_and_offered_list() {
    let tmp = TempDir::new().unwrap();
    let (taxonomies, _) = setup(&tmp);
    let mut editor = RecordEditor::create(&taxonomies);

    editor
        .choose(
            Taxonomy::Units,
            TaxonomyChoice::RequestNew,
            &taxonomies,
            &mut Answer(Some("crate")),
        )
        .unwrap();

    assert_eq!(editor.record().unit, "crate");
    assert!(editor.list(Taxonomy::Units).contains("crate"));
    assert_eq!(
        editor.list(Taxonomy::Units).choices().last(),
        Some(TaxonomyChoice::RequestNew)
    );
}

#[test]
fn cancelled_request_new_restores_previous_value() {
    let tmp = TempDir::new().unwrap();
    let (taxonomies, _) = setup(&tmp);
    let mut editor = RecordEditor::create(&taxonomies);
    editor
        .choose(
            Taxonomy::Stores,
            TaxonomyChoice::Predefined("Auchan".to_string()),
            &taxonomies,
            &mut Answer(None),
        )
        .unwrap();

    editor
        .choose(
            Taxonomy::Stores,
            TaxonomyChoice::RequestNew,
            &taxonomies,
            &mut Answer(None),
        )
        .unwrap();

    assert_eq!(editor.record().store, "Auchan");
}

#[test]
fn discard_removes_a_saved_record() {
    let tmp = TempDir::new().unwrap();
    let (taxonomies, repo) = setup(&tmp);
    let mut editor = RecordEditor::create(&taxonomies);
    editor.set_name("Chips");
    let saved = editor.save(&repo).unwrap();

    RecordEditor::edit(saved.clone(), &taxonomies)
        .discard(&repo)
        .unwrap();

    assert_eq!(repo.find(&saved.id).unwrap(), None);
}
