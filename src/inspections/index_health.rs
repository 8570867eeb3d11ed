//! Built-in index health inspections.
//!
//! Checks adapted from the pg-index-health SQL collection:
//! <https://github.com/mfvanek/pg-index-health-sql>

use indexmap::IndexMap;

use super::InspectionDefinition;

const GROUP: &str = "index_health";

/// Every index health definition, in its default execution order
pub(super) fn definitions() -> Vec<InspectionDefinition> {
    vec![
        bloat_check(
            "idx_bloat",
            "Bloating indexes",
            "Reveals bloated indexes.",
            "bloated_indexes"
        ),
        schema_check(
            "idx_dub",
            "Duplicated indexes",
            "Reveals duplicated/identical indexes.",
            "duplicated_indexes"
        ),
        schema_check(
            "idx_fk",
            "Foreign keys without indexes",
            "Reveals foreign keys without indexes.",
            "foreign_keys_without_index"
        ),
        schema_check(
            "idx_nulls",
            "Indexes with NULLs",
            "Reveals indexes with NULL values.",
            "indexes_with_null_values"
        ),
        schema_check(
            "idx_intersect",
            "Intersecting indexes",
            "Reveals partially identical (intersected) indexes.",
            "intersected_indexes"
        ),
        schema_check(
            "idx_invalid",
            "Invalid indexes",
            "Reveals invalid/broken indexes.",
            "invalid_indexes"
        ),
        schema_check(
            "idx_unused",
            "Unused indexes",
            "Reveals unused indexes.",
            "unused_indexes"
        ),
        bloat_check(
            "tbl_bloat",
            "Bloating tables",
            "Reveals bloated tables.",
            "bloated_tables"
        ),
        schema_check(
            "tbl_noindex",
            "Tables lacking indexes",
            "Reveals tables with missing indexes.",
            "tables_with_missing_indexes"
        ),
        schema_check(
            "tbl_nopk",
            "Tables without Primary Key",
            "Reveals tables missing primary keys.",
            "tables_without_primary_key"
        ),
    ]
}

/// Check parameterized by target schema only
fn schema_check(alias: &str, title: &str, description: &str, template: &str) -> InspectionDefinition {
    InspectionDefinition {
        alias:          alias.to_string(),
        title:          title.to_string(),
        description:    description.to_string(),
        template_group: Some(GROUP.to_string()),
        template_name:  template.to_string(),
        default_params: IndexMap::from([(String::from("schema"), String::from("public"))]),
        param_aliases:  IndexMap::from([(
            String::from("schema"),
            String::from("schema_name_param")
        )])
    }
}

/// Check parameterized by target schema and a bloat percentage threshold
fn bloat_check(alias: &str, title: &str, description: &str, template: &str) -> InspectionDefinition {
    let mut definition = schema_check(alias, title, description, template);
    definition
        .default_params
        .insert(String::from("bloat_min"), String::from("50"));
    definition.param_aliases.insert(
        String::from("bloat_min"),
        String::from("bloat_percentage_threshold")
    );
    definition
}
