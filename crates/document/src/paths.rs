use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "shoplist";
pub const DOCUMENT_FILE_NAME: &str = "ShoppingList.json";

/// Environment override for the document location.
pub const DATA_FILE_ENV: &str = "SHOPLIST_DATA_FILE";

#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[must_use]
pub fn default_document_path() -> PathBuf {
    default_data_dir().join(DOCUMENT_FILE_NAME)
}

/// Resolves the document path: explicit override, then `SHOPLIST_DATA_FILE`,
/// then the per-user data directory.
#[must_use]
pub fn resolve_document_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var_os(DATA_FILE_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => default_document_path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/elsewhere/list.json");
        assert_eq!(resolve_document_path(Some(path)), path);
    }

    #[test]
    fn default_path_ends_with_document_name() {
        let path = default_document_path();
        assert!(path.ends_with(Path::new(APP_DIR_NAME).join(DOCUMENT_FILE_NAME)));
    }
}
