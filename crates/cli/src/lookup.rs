use anyhow::{bail, Result};
use shoplist_catalog::{Record, RecordRepository};

/// Resolves a full id or a unique id prefix to the stored record.
///
/// An exact id match wins over prefix matches.
pub(crate) fn find_by_prefix(repository: &dyn RecordRepository, prefix: &str) -> Result<Record> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        bail!("Record id must not be empty");
    }
    let records = repository.load_all()?;
    pick(records, prefix)
}

fn pick(records: Vec<Record>, prefix: &str) -> Result<Record> {
    let mut matches: Vec<Record> = records
        .into_iter()
        .filter(|record| record.id.starts_with(prefix))
        .collect();
    if let Some(exact) = matches.iter().position(|record| record.id == prefix) {
        return Ok(matches.swap_remove(exact));
    }
    match matches.len() {
        0 => bail!("No record with id {prefix}"),
        1 => Ok(matches.remove(0)),
        n => bail!("Id prefix {prefix} is ambiguous ({n} records match)"),
    }
}
