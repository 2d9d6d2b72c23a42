//! SQL debug logging.
//!
//! Every generated statement is logged on the `jobly.sql` target at `debug`
//! level before it is executed.

/// Statements longer than this (in bytes) are truncated in log output.
pub const MAX_LOGGED_SQL_BYTES: usize = 200;

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

pub(crate) fn trace_sql(sql: &str, param_count: usize) {
    if !tracing::enabled!(target: "jobly.sql", tracing::Level::DEBUG) {
        return;
    }
    let shown = truncate_sql_bytes(sql, MAX_LOGGED_SQL_BYTES);
    if shown.len() < sql.len() {
        tracing::debug!(target: "jobly.sql", param_count, sql = %format_args!("{shown}..."));
    } else {
        tracing::debug!(target: "jobly.sql", param_count, sql = %shown);
    }
}
