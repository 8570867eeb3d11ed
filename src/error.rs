pub use masterror::{AppError, AppResult};

/// Create template read error for a missing SQL resource
pub fn template_not_found(path: &str) -> AppError {
    AppError::internal(format!("Template not found: '{}'", path))
}

/// Create template read error for an unreadable SQL resource
pub fn template_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read template '{}': {}", path, source))
}

/// Create bind error for a placeholder with no bound value
pub fn unbound_placeholder_error(name: &str) -> AppError {
    AppError::internal(format!("No value bound for placeholder ':{}'", name))
}

/// Create SQL execution error with the driver's message text
pub fn sql_execution_error(err: tokio_postgres::Error) -> AppError {
    let msg = if let Some(db_err) = err.as_db_error() {
        format!("SQL execution failed: {}", db_err.message())
    } else {
        format!("SQL execution failed: {}", err)
    };
    AppError::service(msg)
}

/// Create decode error for a column the result model cannot represent
pub fn column_decode_error(ty: &tokio_postgres::types::Type, err: tokio_postgres::Error) -> AppError {
    AppError::internal(format!("Unsupported column type {}: {}", ty, err))
}

/// Create connection error, fatal to the whole run
pub fn connection_error(err: tokio_postgres::Error) -> AppError {
    AppError::service(format!("Failed to connect to PostgreSQL: {}", err))
}

/// Create unknown formatter error listing known aliases
pub fn unknown_formatter_error(alias: &str, known: &[&str]) -> AppError {
    AppError::bad_request(format!(
        "Unknown formatter '{}' (known: {})",
        alias,
        known.join(", ")
    ))
}

/// Create registry configuration error
pub fn duplicate_alias_error(alias: &str) -> AppError {
    AppError::bad_request(format!(
        "Inspection alias '{}' is registered more than once",
        alias
    ))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}
