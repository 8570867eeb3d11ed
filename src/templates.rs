//! SQL template resources.
//!
//! Inspections address their SQL by logical name; this module resolves a name
//! to raw template text. Built-in templates are compiled into the binary; a
//! template directory can be supplied to override them, in which case a
//! template named `index_health/unused_indexes` is read from
//! `<dir>/index_health/unused_indexes.sql`.

use std::path::{Path, PathBuf};

use crate::{
    cache::{cache_template, get_cached},
    error::{AppResult, template_not_found, template_read_error}
};

/// Templates compiled into the binary, keyed by `<group>/<name>`
static BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "index_health/bloated_indexes",
        include_str!("../sql/index_health/bloated_indexes.sql")
    ),
    (
        "index_health/duplicated_indexes",
        include_str!("../sql/index_health/duplicated_indexes.sql")
    ),
    (
        "index_health/foreign_keys_without_index",
        include_str!("../sql/index_health/foreign_keys_without_index.sql")
    ),
    (
        "index_health/indexes_with_null_values",
        include_str!("../sql/index_health/indexes_with_null_values.sql")
    ),
    (
        "index_health/intersected_indexes",
        include_str!("../sql/index_health/intersected_indexes.sql")
    ),
    (
        "index_health/invalid_indexes",
        include_str!("../sql/index_health/invalid_indexes.sql")
    ),
    (
        "index_health/unused_indexes",
        include_str!("../sql/index_health/unused_indexes.sql")
    ),
    (
        "index_health/bloated_tables",
        include_str!("../sql/index_health/bloated_tables.sql")
    ),
    (
        "index_health/tables_with_missing_indexes",
        include_str!("../sql/index_health/tables_with_missing_indexes.sql")
    ),
    (
        "index_health/tables_without_primary_key",
        include_str!("../sql/index_health/tables_without_primary_key.sql")
    ),
];

/// Resolves template names to raw SQL text
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    dir: Option<PathBuf>
}

impl TemplateStore {
    /// Create a store backed by the built-in templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store reading templates from a directory instead
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            dir: Some(dir)
        }
    }

    /// Read the raw SQL text for a template name like `index_health/unused_indexes`
    pub fn read(&self, name: &str) -> AppResult<String> {
        match &self.dir {
            Some(dir) => self.read_from_dir(dir, name),
            None => BUILTIN_TEMPLATES
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, text)| (*text).to_string())
                .ok_or_else(|| template_not_found(name))
        }
    }

    fn read_from_dir(&self, dir: &Path, name: &str) -> AppResult<String> {
        let path = dir.join(format!("{name}.sql"));
        let key = path.display().to_string();

        if let Some(text) = get_cached(&key) {
            return Ok(text);
        }

        if !path.exists() {
            return Err(template_not_found(&key));
        }

        let text = std::fs::read_to_string(&path).map_err(|e| template_read_error(&key, e))?;
        cache_template(&key, text.clone());
        Ok(text)
    }
}
