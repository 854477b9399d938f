use crate::sqlite_transaction::backend;

use sdb_auth::{QueryResponse, StoreError, StoreResult, Variables};
use sdb_core::TrustContext;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, warn};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

const ID_PARAM: &str = "$id";

/// Tables holding signing material and principals. Statements may not name them.
const CATALOG_TABLES: [&str; 7] = [
    "namespace_tokens",
    "namespace_users",
    "database_tokens",
    "database_users",
    "scopes",
    "scope_tokens",
    "_sqlx_migrations",
];

/// Run scope connect statements on the connection of an open catalog
/// transaction.
///
/// Statements are separated by `;`. Each must be a query (`SELECT`, `WITH`
/// or `VALUES`) that names no catalog or SQLite schema table. The connection
/// is switched to `query_only` for the duration, so nothing can be written
/// even through a query with side effects. `$id` is bound from the `id`
/// variable, rendered as `table:id` for record references. Every row comes
/// back as a JSON object keyed by column name.
pub(crate) async fn execute(
    conn: &mut SqliteConnection,
    ctx: &TrustContext,
    query: &str,
    vars: &Variables,
) -> StoreResult<Vec<QueryResponse>> {
    if !ctx.selected.has_namespace() || !ctx.selected.has_database() {
        return Err(StoreError::query("statement needs a selected namespace and database"));
    }

    let statements = split_statements(query).collect::<Vec<_>>();
    for statement in &statements {
        check_statement(statement)?;
    }

    debug!(
        "Executing {} statement(s) as {} in {}/{}",
        statements.len(),
        ctx.kind,
        ctx.selected.ns,
        ctx.selected.db
    );

    sqlx::query("PRAGMA query_only = ON")
        .execute(&mut *conn)
        .await
        .map_err(backend)?;

    let outcome = run_statements(conn, &statements, vars).await;

    if let Err(e) = sqlx::query("PRAGMA query_only = OFF")
        .execute(&mut *conn)
        .await
    {
        warn!("Failed to leave query_only mode: {e}");
        return Err(backend(e));
    }

    outcome
}

async fn run_statements(
    conn: &mut SqliteConnection,
    statements: &[&str],
    vars: &Variables,
) -> StoreResult<Vec<QueryResponse>> {
    let id = vars.get("id").and_then(bind_value);
    let mut responses = Vec::with_capacity(statements.len());

    for statement in statements {
        let (sql, uses_id) = bind_id_param(statement);

        let mut prepared = sqlx::query(&sql);
        if uses_id {
            prepared = prepared.bind(id.clone());
        }

        let rows = prepared
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| StoreError::query(e.to_string()))?;

        let result = rows.iter().map(row_to_json).collect::<StoreResult<_>>()?;
        responses.push(QueryResponse { result });
    }

    Ok(responses)
}

/// Reject anything but a plain query, and any mention of a catalog table
#[track_caller]
fn check_statement(statement: &str) -> StoreResult<()> {
    let mut words = statement
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase);

    let first = words.next().unwrap_or_default();
    if !matches!(first.as_str(), "select" | "with" | "values") {
        return Err(StoreError::query(format!(
            "only queries may run here, found '{first}'"
        )));
    }

    for word in words {
        if CATALOG_TABLES.contains(&word.as_str()) || word.starts_with("sqlite_") {
            return Err(StoreError::query(format!("statement may not read '{word}'")));
        }
    }

    Ok(())
}

fn split_statements(query: &str) -> impl Iterator<Item = &str> {
    query.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Rewrite `$id` to the positional `?1`. Longer names such as `$identity`
/// are left alone.
fn bind_id_param(statement: &str) -> (String, bool) {
    let mut sql = String::with_capacity(statement.len());
    let mut uses_id = false;
    let mut rest = statement;

    while let Some(pos) = rest.find(ID_PARAM) {
        let after = &rest[pos + ID_PARAM.len()..];
        let continues = after
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');

        sql.push_str(&rest[..pos]);
        if continues {
            sql.push_str(ID_PARAM);
        } else {
            sql.push_str("?1");
            uses_id = true;
        }
        rest = after;
    }
    sql.push_str(rest);

    (sql, uses_id)
}

fn bind_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn row_to_json(row: &SqliteRow) -> StoreResult<Value> {
    let mut object = Map::new();

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index).map_err(backend)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(index).map_err(backend)?),
                "REAL" => Value::from(row.try_get::<f64, _>(index).map_err(backend)?),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get(index).map_err(backend)?;
                    Value::String(STANDARD.encode(bytes))
                }
                _ => Value::String(row.try_get::<String, _>(index).map_err(backend)?),
            }
        };

        object.insert(column.name().to_string(), value);
    }

    Ok(Value::Object(object))
}
