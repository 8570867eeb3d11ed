//! Inspection catalog.
//!
//! An inspection is a named, parameterized diagnostic SQL query plus its
//! metadata. Definitions are declared once, in a single explicit list (no
//! registration side effects), and collected into a [`Registry`] whose
//! iteration order is the declaration order — that order is the default
//! execution order and is stable across runs of the same build.

mod index_health;

use indexmap::IndexMap;

use crate::error::{AppResult, duplicate_alias_error};

/// Immutable description of one inspection kind
#[derive(Debug, Clone)]
pub struct InspectionDefinition {
    /// Short unique key to address the inspection
    pub alias:          String,
    /// Human-friendly title
    pub title:          String,
    /// One-line description shown by the `inspections` listing
    pub description:    String,
    /// Template group, i.e. the subdirectory the template lives in
    pub template_group: Option<String>,
    /// Template file name without extension
    pub template_name:  String,
    /// Default parameter values keyed by logical name
    pub default_params: IndexMap<String, String>,
    /// Logical parameter name to SQL placeholder name
    pub param_aliases:  IndexMap<String, String>
}

impl InspectionDefinition {
    /// Template resource name, `<group>/<name>` or just `<name>`
    pub fn template_path(&self) -> String {
        match &self.template_group {
            Some(group) => format!("{}/{}", group, self.template_name),
            None => self.template_name.clone()
        }
    }
}

/// Process-wide catalog of inspection definitions
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: Vec<InspectionDefinition>
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in inspection, in declaration order
    pub fn builtin() -> AppResult<Self> {
        let mut registry = Self::new();
        for definition in index_health::definitions() {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Add a definition. A duplicate alias is a configuration error.
    pub fn register(&mut self, definition: InspectionDefinition) -> AppResult<()> {
        if self.definitions.iter().any(|d| d.alias == definition.alias) {
            return Err(duplicate_alias_error(&definition.alias));
        }
        self.definitions.push(definition);
        Ok(())
    }

    /// All definitions in registration order
    pub fn all(&self) -> &[InspectionDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
