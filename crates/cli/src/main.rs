use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use shoplist_catalog::{
    DocumentRepository, Record, RecordEditor, Taxonomy, TaxonomyChoice, TaxonomyManager,
};
use shoplist_document::{resolve_document_path, CancellationToken, DocumentStore};
use shoplist_views::{ShoppingSession, StoreFilter};
use std::path::{Path, PathBuf};

use crate::flags::{TaxonomyFlag, REQUEST_NEW_ARG};
use crate::prompt::{PresetAnswer, TerminalPrompt};

mod flags;
mod lookup;
mod prompt;
mod render;

#[derive(Parser)]
#[command(name = "shoplist")]
#[command(about = "Shopping list catalog with per-store views", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Shopping list document (overrides SHOPLIST_DATA_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Print JSON on stdout instead of text (implies --quiet)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the location of the shopping list document
    Path,

    /// Add a product to the catalog
    Add(AddArgs),

    /// Change fields of a product
    Edit(EditArgs),

    /// Show every field of a product
    Show(IdArgs),

    /// Products still to buy, in category order
    List,

    /// Every product grouped by category
    Catalog(CatalogArgs),

    /// Mark a product as purchased
    Purchase(IdArgs),

    /// Put a purchased product back on the list
    Unpurchase(IdArgs),

    /// Flip the purchased flag
    Toggle(IdArgs),

    /// Increment, decrement or set the quantity
    Quantity(QuantityArgs),

    /// Remove a product
    Delete(IdArgs),

    /// Inspect or extend the category, unit and store lists
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyCommand,
    },

    /// Replace the document with the content of FILE
    Import(TransferArgs),

    /// Copy the document to FILE
    Export(TransferArgs),
}

#[derive(Args)]
struct IdArgs {
    /// Product id, or any unique prefix of it
    id: String,
}

/// Taxonomy values: an existing entry, a new name (learned on the fly), or
/// `+` to be asked interactively.
#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    quantity: Option<f64>,

    #[arg(long)]
    unit: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    store: Option<String>,
}

#[derive(Args)]
struct AddArgs {
    name: String,

    #[command(flatten)]
    fields: FieldArgs,

    /// Mark the product as optional
    #[arg(long)]
    optional: bool,
}

#[derive(Args)]
struct EditArgs {
    /// Product id, or any unique prefix of it
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[command(flatten)]
    fields: FieldArgs,

    #[arg(long, value_name = "BOOL")]
    optional: Option<bool>,
}

#[derive(Args)]
struct CatalogArgs {
    /// Only products for this store ("all" for every store)
    #[arg(long)]
    store: Option<String>,
}

#[derive(Args)]
struct QuantityArgs {
    /// Product id, or any unique prefix of it
    id: String,

    #[command(flatten)]
    change: QuantityChange,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct QuantityChange {
    /// Increase by BY (default 1)
    #[arg(long, value_name = "BY", num_args = 0..=1, default_missing_value = "1")]
    inc: Option<f64>,

    /// Decrease by BY (default 1); never goes below 0
    #[arg(long, value_name = "BY", num_args = 0..=1, default_missing_value = "1")]
    dec: Option<f64>,

    /// Set an exact quantity
    #[arg(long, value_name = "Q")]
    set: Option<f64>,
}

#[derive(Subcommand)]
enum TaxonomyCommand {
    /// Print every entry of a list
    List { kind: TaxonomyFlag },

    /// Append an entry unless it is already present (case-insensitive)
    Add { kind: TaxonomyFlag, name: String },
}

#[derive(Args)]
struct TransferArgs {
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let path = resolve_document_path(cli.data_file.as_deref());
    log::debug!("Using shopping list at {path:?}");
    let store = DocumentStore::new(path);
    let json = cli.json;

    match cli.command {
        Commands::Path => emit(json, &json!({ "path": store.path() }), || {
            println!("{}", store.path().display());
        })?,
        Commands::Add(args) => run_add(&store, args, json)?,
        Commands::Edit(args) => run_edit(&store, args, json)?,
        Commands::Show(args) => {
            let record = lookup::find_by_prefix(&repository(&store), &args.id)?;
            emit(json, &record, || render::print_record_details(&record))?;
        }
        Commands::List => {
            let view = session(&store).active_list()?;
            emit(json, &view, || render::print_active_list(&view))?;
        }
        Commands::Catalog(args) => {
            let filter = StoreFilter::parse(args.store.as_deref());
            let view = session(&store).catalog(filter)?;
            emit(json, &view, || render::print_catalog(&view))?;
        }
        Commands::Purchase(args) => {
            mutate(&store, &args.id, json, |session, id| session.set_purchased(id, true))?;
        }
        Commands::Unpurchase(args) => {
            mutate(&store, &args.id, json, |session, id| session.set_purchased(id, false))?;
        }
        Commands::Toggle(args) => {
            mutate(&store, &args.id, json, |session, id| session.toggle_purchased(id))?;
        }
        Commands::Quantity(args) => run_quantity(&store, args, json)?,
        Commands::Delete(args) => {
            let mut session = session(&store);
            let record = lookup::find_by_prefix(session.repository(), &args.id)?;
            session.delete(&record.id)?;
            emit(json, &json!({ "deleted": record.id }), || {
                println!("Deleted {}", render::record_line(&record));
            })?;
        }
        Commands::Taxonomy { action } => run_taxonomy(&store, action, json)?,
        Commands::Import(args) => run_import(&store, &args.file, json).await?,
        Commands::Export(args) => run_export(&store, &args.file, json).await?,
    }

    Ok(())
}

fn repository(store: &DocumentStore) -> DocumentRepository {
    DocumentRepository::new(store.clone())
}

fn session(store: &DocumentStore) -> ShoppingSession<DocumentRepository> {
    ShoppingSession::new(repository(store), TaxonomyManager::new(store.clone()))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

fn emit_record(json: bool, record: &Record) -> Result<()> {
    emit(json, record, || println!("{}", render::record_line(record)))
}

fn run_add(store: &DocumentStore, args: AddArgs, json: bool) -> Result<()> {
    let taxonomies = TaxonomyManager::new(store.clone());
    let mut editor = RecordEditor::create(&taxonomies);
    editor.set_name(&args.name);
    editor.set_optional(args.optional);
    apply_fields(&mut editor, &args.fields, &taxonomies)?;

    let record = editor
        .save(&repository(store))
        .context("Failed to add product")?;
    log::info!("Added {} ({})", record.name, record.id);
    emit_record(json, &record)
}

fn run_edit(store: &DocumentStore, args: EditArgs, json: bool) -> Result<()> {
    let taxonomies = TaxonomyManager::new(store.clone());
    let repository = repository(store);
    let record = lookup::find_by_prefix(&repository, &args.id)?;

    let mut editor = RecordEditor::edit(record, &taxonomies);
    if let Some(name) = &args.name {
        editor.set_name(name);
    }
    if let Some(optional) = args.optional {
        editor.set_optional(optional);
    }
    apply_fields(&mut editor, &args.fields, &taxonomies)?;

    let record = editor
        .save(&repository)
        .context("Failed to save product")?;
    emit_record(json, &record)
}

fn apply_fields(
    editor: &mut RecordEditor,
    fields: &FieldArgs,
    taxonomies: &TaxonomyManager,
) -> Result<()> {
    if let Some(quantity) = fields.quantity {
        editor.set_quantity(checked_quantity(quantity)?);
    }
    let choices = [
        (Taxonomy::Units, &fields.unit),
        (Taxonomy::Categories, &fields.category),
        (Taxonomy::Stores, &fields.store),
    ];
    for (taxonomy, value) in choices {
        if let Some(value) = value {
            apply_choice(editor, taxonomy, value, taxonomies)?;
        }
    }
    Ok(())
}

fn apply_choice(
    editor: &mut RecordEditor,
    taxonomy: Taxonomy,
    value: &str,
    taxonomies: &TaxonomyManager,
) -> Result<()> {
    let value = value.trim();
    if value == REQUEST_NEW_ARG {
        editor.choose(taxonomy, TaxonomyChoice::RequestNew, taxonomies, &mut TerminalPrompt)?;
        return Ok(());
    }

    let list = editor.list(taxonomy);
    match list.position(value) {
        Some(index) => {
            let name = list.names()[index].clone();
            editor.choose(
                taxonomy,
                TaxonomyChoice::Predefined(name),
                taxonomies,
                &mut TerminalPrompt,
            )?;
        }
        None => {
            log::info!("Adding new {} {value:?}", taxonomy.label());
            editor.choose(
                taxonomy,
                TaxonomyChoice::RequestNew,
                taxonomies,
                &mut PresetAnswer(value.to_string()),
            )?;
        }
    }
    Ok(())
}

fn checked_quantity(quantity: f64) -> Result<f64> {
    if !quantity.is_finite() || quantity < 0.0 {
        bail!("Quantity must be a non-negative number, got {quantity}");
    }
    Ok(quantity)
}

fn mutate<F>(store: &DocumentStore, id: &str, json: bool, change: F) -> Result<()>
where
    F: FnOnce(
        &mut ShoppingSession<DocumentRepository>,
        &str,
    ) -> shoplist_catalog::Result<Option<Record>>,
{
    let mut session = session(store);
    let record = lookup::find_by_prefix(session.repository(), id)?;
    match change(&mut session, &record.id)? {
        Some(record) => emit_record(json, &record),
        None => bail!("Product {} disappeared while updating", record.id),
    }
}

fn run_quantity(store: &DocumentStore, args: QuantityArgs, json: bool) -> Result<()> {
    let QuantityChange { inc, dec, set } = args.change;
    let inc = inc.map(checked_quantity).transpose()?;
    let dec = dec.map(checked_quantity).transpose()?;
    let set = set.map(checked_quantity).transpose()?;
    mutate(store, &args.id, json, |session, id| {
        match (inc, dec, set) {
            (Some(by), _, _) => session.adjust_quantity(id, by),
            (_, Some(by), _) => session.adjust_quantity(id, -by),
            (_, _, Some(quantity)) => session.set_quantity(id, quantity),
            (None, None, None) => Ok(None),
        }
    })
}

fn run_taxonomy(store: &DocumentStore, action: TaxonomyCommand, json: bool) -> Result<()> {
    let taxonomies = TaxonomyManager::new(store.clone());
    match action {
        TaxonomyCommand::List { kind } => {
            let list = taxonomies.load(kind.as_domain());
            emit(json, &list, || render::print_taxonomy(&list))
        }
        TaxonomyCommand::Add { kind, name } => {
            let taxonomy = kind.as_domain();
            let added = taxonomies
                .add_if_absent(taxonomy, &name)
                .with_context(|| format!("Failed to add {} {name:?}", taxonomy.label()))?;
            let name = name.trim();
            emit(
                json,
                &json!({ "taxonomy": taxonomy, "name": name, "added": added }),
                || {
                    if added {
                        println!("Added {} {name}", taxonomy.label());
                    } else {
                        println!("{name} is already listed (or not a valid name)");
                    }
                },
            )
        }
    }
}

/// Token cancelled by the first Ctrl-C while a transfer runs.
fn cancel_on_ctrl_c() -> (CancellationToken, tokio::task::JoinHandle<()>) {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling transfer");
            token.cancel();
        }
    });
    (cancel, watcher)
}

async fn run_import(store: &DocumentStore, file: &Path, json: bool) -> Result<()> {
    let mut source = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let (cancel, watcher) = cancel_on_ctrl_c();
    let copied = store.replace_with(&mut source, &cancel).await;
    watcher.abort();
    let copied = copied.with_context(|| format!("Failed to import {}", file.display()))?;

    emit(
        json,
        &json!({ "imported": copied, "from": file, "into": store.path() }),
        || println!("Imported {copied} bytes into {}", store.path().display()),
    )
}

async fn run_export(store: &DocumentStore, file: &Path, json: bool) -> Result<()> {
    let (cancel, watcher) = cancel_on_ctrl_c();
    let copied = store.export_to_path(file, &cancel).await;
    watcher.abort();
    let copied = copied.with_context(|| format!("Failed to export to {}", file.display()))?;

    emit(
        json,
        &json!({ "exported": copied, "from": store.path(), "to": file }),
        || println!("Exported {copied} bytes to {}", file.display()),
    )
}
