//! Analysis orchestration.
//!
//! The [`Analyser`] runs the registered inspections against one PostgreSQL
//! connection, strictly sequentially, and captures a per-inspection outcome:
//! either a tabular result or the error that prevented one. A failing
//! inspection never aborts the batch; only a failure to establish the
//! connection is fatal.
//!
//! The driver sits behind the [`Executor`] trait so the orchestration can be
//! exercised without a server.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use tokio_postgres::{
    Client, NoTls, Row,
    types::{ToSql, Type}
};

use crate::{
    args::{ArgumentOverrides, resolve_arguments},
    binder::bind,
    error::{AppResult, column_decode_error, connection_error, sql_execution_error},
    inspections::{InspectionDefinition, Registry},
    templates::TemplateStore
};

/// A single result cell, decoded by column type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String)
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v)
        }
    }
}

/// Tabular inspection result: columns in driver order, rows aligned to them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows:    Vec<Vec<CellValue>>
}

/// Outcome of one executed inspection.
///
/// Exactly one of the two holds: a populated `result` with no errors, or no
/// `result` with at least one error.
#[derive(Debug, Clone)]
pub struct InspectionRun {
    pub alias:     String,
    pub title:     String,
    pub arguments: IndexMap<String, String>,
    pub errors:    Vec<String>,
    pub result:    Option<TableData>
}

impl InspectionRun {
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Executes driver-ready SQL with bound text parameters
#[async_trait]
pub trait Executor {
    async fn query(&self, sql: &str, params: &[String]) -> AppResult<TableData>;
}

/// [`Executor`] over one tokio-postgres connection
pub struct PgExecutor {
    client: Client
}

#[async_trait]
impl Executor for PgExecutor {
    async fn query(&self, sql: &str, params: &[String]) -> AppResult<TableData> {
        // All parameters travel as text; templates cast where they need
        // numerics, the same way untyped literals are coerced.
        let types = vec![Type::TEXT; params.len()];
        let statement = self
            .client
            .prepare_typed(sql, &types)
            .await
            .map_err(sql_execution_error)?;

        let refs: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        let rows = self
            .client
            .query(&statement, &refs)
            .await
            .map_err(sql_execution_error)?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            decoded.push(decode_row(row)?);
        }

        Ok(TableData {
            columns,
            rows: decoded
        })
    }
}

fn decode_row(row: &Row) -> AppResult<Vec<CellValue>> {
    let columns = row.columns();
    let mut values = Vec::with_capacity(columns.len());

    for (idx, column) in columns.iter().enumerate() {
        let ty = column.type_();
        let value = match *ty {
            Type::BOOL => row
                .try_get::<_, Option<bool>>(idx)
                .map(|v| v.map(CellValue::Bool).unwrap_or(CellValue::Null)),
            Type::INT2 => row
                .try_get::<_, Option<i16>>(idx)
                .map(|v| v.map(|v| CellValue::Int(v as i64)).unwrap_or(CellValue::Null)),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(idx)
                .map(|v| v.map(|v| CellValue::Int(v as i64)).unwrap_or(CellValue::Null)),
            Type::INT8 => row
                .try_get::<_, Option<i64>>(idx)
                .map(|v| v.map(CellValue::Int).unwrap_or(CellValue::Null)),
            Type::OID => row
                .try_get::<_, Option<u32>>(idx)
                .map(|v| v.map(|v| CellValue::Int(v as i64)).unwrap_or(CellValue::Null)),
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(idx)
                .map(|v| v.map(|v| CellValue::Float(v as f64)).unwrap_or(CellValue::Null)),
            Type::FLOAT8 => row
                .try_get::<_, Option<f64>>(idx)
                .map(|v| v.map(CellValue::Float).unwrap_or(CellValue::Null)),
            _ => row
                .try_get::<_, Option<String>>(idx)
                .map(|v| v.map(CellValue::Text).unwrap_or(CellValue::Null))
        }
        .map_err(|e| column_decode_error(ty, e))?;

        values.push(value);
    }

    Ok(values)
}

/// Performs the analysis running known inspections
pub struct Analyser {
    dsn:      String,
    registry: Registry,
    store:    TemplateStore
}

impl Analyser {
    /// Analyser over the built-in inspection catalog
    pub fn new(dsn: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            dsn:      dsn.into(),
            registry: Registry::builtin()?,
            store:    TemplateStore::new()
        })
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_templates(mut self, store: TemplateStore) -> Self {
        self.store = store;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run analysis over one freshly opened connection.
    ///
    /// `only` limits the run to the named inspection aliases (empty = all);
    /// `overrides` supplies per-alias argument overrides. The connection is
    /// released when the run completes regardless of individual outcomes.
    pub async fn run(
        &self,
        only: &[String],
        overrides: &ArgumentOverrides
    ) -> AppResult<Vec<InspectionRun>> {
        let (client, connection) = tokio_postgres::connect(&self.dsn, NoTls)
            .await
            .map_err(connection_error)?;
        let connection_task = tokio::spawn(async move {
            let _ = connection.await;
        });

        let executor = PgExecutor {
            client
        };
        let runs = self.run_with(&executor, only, overrides).await;

        drop(executor);
        connection_task.abort();
        Ok(runs)
    }

    /// Run analysis against an already established [`Executor`].
    ///
    /// Iterates the registry in registration order; any per-inspection
    /// failure is captured in that inspection's `errors` and the batch
    /// continues.
    pub async fn run_with<E: Executor + ?Sized>(
        &self,
        executor: &E,
        only: &[String],
        overrides: &ArgumentOverrides
    ) -> Vec<InspectionRun> {
        let mut runs = Vec::new();

        for definition in self.registry.all() {
            if !only.is_empty() && !only.iter().any(|alias| alias == &definition.alias) {
                continue;
            }

            let arguments = resolve_arguments(
                &definition.default_params,
                overrides.get(definition.alias.as_str())
            );
            let outcome = self.execute_one(executor, definition, &arguments).await;

            let mut run = InspectionRun {
                alias: definition.alias.clone(),
                title: definition.title.clone(),
                arguments,
                errors: Vec::new(),
                result: None
            };
            match outcome {
                Ok(table) => run.result = Some(table),
                Err(e) => run.errors.push(e.to_string())
            }
            runs.push(run);
        }

        runs
    }

    async fn execute_one<E: Executor + ?Sized>(
        &self,
        executor: &E,
        definition: &InspectionDefinition,
        arguments: &IndexMap<String, String>
    ) -> AppResult<TableData> {
        let template = self.store.read(&definition.template_path())?;
        let bound = bind(&template, &definition.param_aliases, arguments)?;
        executor.query(&bound.sql, &bound.params).await
    }
}
