// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::{fs, sync::Mutex};

use async_trait::async_trait;
use indexmap::IndexMap;
use pg_analyse::{
    analyser::{Analyser, CellValue, Executor, InspectionRun, TableData},
    args::{ArgumentOverrides, parse_args_string},
    error::{AppError, AppResult},
    inspections::{InspectionDefinition, Registry},
    templates::TemplateStore
};
use tempfile::TempDir;

/// Executor that records every call and fails for one marked relation
struct ScriptedExecutor {
    calls: Mutex<Vec<(String, Vec<String>)>>
}

impl ScriptedExecutor {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new())
        }
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn query(&self, sql: &str, params: &[String]) -> AppResult<TableData> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        if sql.contains("broken_relation") {
            return Err(AppError::service(String::from(
                "relation \"broken_relation\" does not exist"
            )));
        }

        Ok(TableData {
            columns: vec![String::from("value")],
            rows:    vec![vec![CellValue::Int(1)]]
        })
    }
}

fn schema_definition(alias: &str) -> InspectionDefinition {
    InspectionDefinition {
        alias:          alias.to_string(),
        title:          format!("Check {alias}"),
        description:    String::new(),
        template_group: None,
        template_name:  alias.to_string(),
        default_params: IndexMap::from([(String::from("schema"), String::from("public"))]),
        param_aliases:  IndexMap::from([(
            String::from("schema"),
            String::from("schema_name_param")
        )])
    }
}

fn analyser_over(dir: &TempDir, registry: Registry) -> Analyser {
    Analyser::new("")
        .unwrap()
        .with_registry(registry)
        .with_templates(TemplateStore::with_dir(dir.path().to_path_buf()))
}

fn assert_result_xor_errors(run: &InspectionRun) {
    assert_ne!(
        run.result.is_some(),
        !run.errors.is_empty(),
        "{}: result and errors must be mutually exclusive",
        run.alias
    );
}

#[tokio::test]
async fn test_failing_inspection_does_not_abort_the_batch() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("first.sql"),
        "select * from broken_relation where s = :schema_name_param"
    )
    .unwrap();
    fs::write(
        dir.path().join("second.sql"),
        "select 1 where s = :schema_name_param"
    )
    .unwrap();

    let mut registry = Registry::new();
    registry.register(schema_definition("first")).unwrap();
    registry.register(schema_definition("second")).unwrap();

    let executor = ScriptedExecutor::new();
    let runs = analyser_over(&dir, registry)
        .run_with(&executor, &[], &ArgumentOverrides::new())
        .await;

    assert_eq!(runs.len(), 2);

    assert!(runs[0].failed());
    assert!(runs[0].result.is_none());
    assert!(runs[0].errors[0].contains("broken_relation"));

    assert!(!runs[1].failed());
    assert_eq!(runs[1].result.as_ref().unwrap().rows.len(), 1);

    for run in &runs {
        assert_result_xor_errors(run);
    }
}

#[tokio::test]
async fn test_missing_template_is_captured_per_inspection() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("present.sql"),
        "select 1 where s = :schema_name_param"
    )
    .unwrap();

    let mut registry = Registry::new();
    registry.register(schema_definition("ghost")).unwrap();
    registry.register(schema_definition("present")).unwrap();

    let executor = ScriptedExecutor::new();
    let runs = analyser_over(&dir, registry)
        .run_with(&executor, &[], &ArgumentOverrides::new())
        .await;

    assert_eq!(runs.len(), 2);
    assert!(runs[0].errors[0].contains("ghost"));
    assert!(!runs[1].failed());

    // The ghost inspection never reached the executor
    assert_eq!(executor.calls().len(), 1);
}

#[tokio::test]
async fn test_filtering_limits_the_run_to_requested_aliases() {
    let analyser = Analyser::new("").unwrap();
    let executor = ScriptedExecutor::new();

    let runs = analyser
        .run_with(
            &executor,
            &[String::from("idx_unused")],
            &ArgumentOverrides::new()
        )
        .await;

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].alias, "idx_unused");
    assert!(!runs[0].failed());
}

#[tokio::test]
async fn test_unknown_filter_alias_is_silently_omitted() {
    let analyser = Analyser::new("").unwrap();
    let executor = ScriptedExecutor::new();

    let runs = analyser
        .run_with(
            &executor,
            &[String::from("no_such_inspection")],
            &ArgumentOverrides::new()
        )
        .await;

    assert!(runs.is_empty());
}

#[tokio::test]
async fn test_overrides_reach_the_driver_as_bound_parameters() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bloated_indexes.sql"),
        "SELECT 1 WHERE :schema_name_param != '' AND :bloat_percentage_threshold > 0"
    )
    .unwrap();

    let mut definition = schema_definition("idx_bloat");
    definition.template_name = String::from("bloated_indexes");
    definition
        .default_params
        .insert(String::from("bloat_min"), String::from("50"));
    definition.param_aliases.insert(
        String::from("bloat_min"),
        String::from("bloat_percentage_threshold")
    );

    let mut registry = Registry::new();
    registry.register(definition).unwrap();

    let executor = ScriptedExecutor::new();
    let overrides = parse_args_string("idx_bloat:bloat_min=70");
    let runs = analyser_over(&dir, registry)
        .run_with(&executor, &[], &overrides)
        .await;

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "SELECT 1 WHERE $1 != '' AND $2 > 0");
    assert_eq!(
        calls[0].1,
        vec![String::from("public"), String::from("70")]
    );

    assert_eq!(
        runs[0].arguments.get("bloat_min"),
        Some(&String::from("70"))
    );
    assert_eq!(
        runs[0].arguments.get("schema"),
        Some(&String::from("public"))
    );
}

#[tokio::test]
async fn test_identical_inputs_produce_identical_output() {
    let analyser = Analyser::new("").unwrap();
    let executor = ScriptedExecutor::new();
    let only = [String::from("idx_bloat"), String::from("tbl_nopk")];
    let overrides = parse_args_string("idx_bloat:bloat_min=20");

    let first = analyser.run_with(&executor, &only, &overrides).await;
    let second = analyser.run_with(&executor, &only, &overrides).await;

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.alias, b.alias);
        assert_eq!(a.arguments, b.arguments);
        assert_eq!(a.errors, b.errors);
        assert_eq!(a.result, b.result);
    }
}

#[tokio::test]
async fn test_builtin_registry_runs_in_registration_order() {
    let analyser = Analyser::new("").unwrap();
    let executor = ScriptedExecutor::new();

    let runs = analyser
        .run_with(&executor, &[], &ArgumentOverrides::new())
        .await;

    let aliases: Vec<&str> = runs.iter().map(|r| r.alias.as_str()).collect();
    assert_eq!(aliases.first(), Some(&"idx_bloat"));
    assert_eq!(aliases.last(), Some(&"tbl_nopk"));
    assert_eq!(runs.len(), analyser.registry().len());
}
