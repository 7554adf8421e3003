use regex::Regex;
use serde_json::{Number, Value};
use sqlx::postgres::PgRow;
use sqlx::types::BigDecimal;
use sqlx::{Column, Postgres, QueryBuilder, Row, TypeInfo, ValueRef};
use std::sync::LazyLock;

use crate::errors::{QueryError, query::QueryResult};
use crate::models::{ClusterColumn, ClusterFilter, ClusterKind, Projection, ViewCell, ViewRow};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]{0,62}$").expect("identifier pattern is valid"));

/// Checks that a schema or view name is a plain lowercase identifier, so it
/// can be pushed into SQL text without quoting.
pub fn validate_identifier(identifier: &str) -> QueryResult<&str> {
    if IDENTIFIER.is_match(identifier) {
        Ok(identifier)
    } else {
        Err(QueryError::invalid_identifier(identifier))
    }
}

/// `schema.view`, or just `view` without a schema. Both parts are validated.
pub fn qualified_name(schema: Option<&str>, view: &str) -> QueryResult<String> {
    let view = validate_identifier(view)?;
    match schema {
        Some(schema) => Ok(format!("{}.{}", validate_identifier(schema)?, view)),
        None => Ok(view.to_string()),
    }
}

/// Rejects filters on columns the view kind does not carry
pub fn ensure_filter_columns(kind: ClusterKind, filter: &ClusterFilter, view: &str) -> QueryResult<()> {
    for (column, _) in filter.active() {
        ensure_column(kind, column, view)?;
    }
    Ok(())
}

fn ensure_column(kind: ClusterKind, column: ClusterColumn, view: &str) -> QueryResult<()> {
    if kind.has_column(column) {
        Ok(())
    } else {
        Err(QueryError::ColumnNotInView {
            column: column.name(),
            view: view.to_string(),
        })
    }
}

/// Pushes the select list for a projection over a cluster view
pub fn apply_projection(
    query: &mut QueryBuilder<Postgres>,
    kind: ClusterKind,
    projection: &Projection,
    view: &str,
) -> QueryResult<()> {
    match projection {
        Projection::All => push_select_list(query, kind.columns()),
        Projection::Columns(columns) => {
            for column in columns {
                ensure_column(kind, *column, view)?;
            }
            if columns.is_empty() {
                push_select_list(query, kind.columns());
            } else {
                push_select_list(query, columns);
            }
        }
        Projection::Count(column) => {
            ensure_column(kind, *column, view)?;
            query.push("COUNT(");
            query.push(column.name());
            query.push(") AS count");
        }
    }
    Ok(())
}

fn push_select_list(query: &mut QueryBuilder<Postgres>, columns: &[ClusterColumn]) {
    let mut separated = query.separated(", ");
    for column in columns {
        separated.push(column.select_expr());
    }
}

/// Appends one WHERE clause holding `col > low AND col < high` for every
/// active range. Nothing is pushed when no range is set.
pub fn apply_range_filters(query: &mut QueryBuilder<Postgres>, filter: &ClusterFilter) {
    for (i, (column, range)) in filter.active().into_iter().enumerate() {
        if range.is_reversed() {
            tracing::debug!("Reversed range {} on {} matches no rows", range, column);
        }
        query.push(if i == 0 { " WHERE " } else { " AND " });
        query.push(column.name());
        query.push(" > ");
        query.push_bind(range.low);
        query.push(" AND ");
        query.push(column.name());
        query.push(" < ");
        query.push_bind(range.high);
    }
}

/// Applies an optional row limit to a query builder
pub fn apply_limit(query: &mut QueryBuilder<Postgres>, limit: Option<i64>) {
    if let Some(limit) = limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }
}

/// Escapes LIKE wildcards so the input only matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Decodes one cell into a JSON value according to its Postgres type.
///
/// Types without a JSON counterpart (geometry, dates, ...) are returned as
/// the uppercase hex of their binary value, so geometry reads as hex EWKB.
pub fn decode_cell(row: &PgRow, index: usize) -> QueryResult<Value> {
    let type_name = row.column(index).type_info().name().to_string();

    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name.as_str() {
        "INT2" => Value::from(row.try_get::<i16, _>(index)?),
        "INT4" => Value::from(row.try_get::<i32, _>(index)?),
        "INT8" => Value::from(row.try_get::<i64, _>(index)?),
        "FLOAT4" => float_value(row.try_get::<f32, _>(index)? as f64),
        "FLOAT8" => float_value(row.try_get::<f64, _>(index)?),
        "NUMERIC" => {
            let decimal = row.try_get::<BigDecimal, _>(index)?.to_string();
            match decimal.parse::<Number>() {
                Ok(number) => Value::Number(number),
                Err(_) => Value::String(decimal),
            }
        }
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => Value::String(row.try_get::<String, _>(index)?),
        "BOOL" => Value::Bool(row.try_get::<bool, _>(index)?),
        "JSON" | "JSONB" => row.try_get::<Value, _>(index)?,
        _ => Value::String(hex::encode_upper(row.try_get_unchecked::<Vec<u8>, _>(index)?)),
    };
    Ok(value)
}

/// JSON has no NaN or infinities; those are kept as strings ("NaN", "inf", "-inf")
fn float_value(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(number) => Value::Number(number),
        None => Value::String(value.to_string()),
    }
}

/// Maps a database row to a ViewRow, keeping column order
pub fn map_row_to_view_row(row: &PgRow) -> QueryResult<ViewRow> {
    let cells = row
        .columns()
        .iter()
        .map(|column| {
            Ok(ViewCell {
                name: column.name().to_string(),
                value: decode_cell(row, column.ordinal())?,
            })
        })
        .collect::<QueryResult<Vec<_>>>()?;
    Ok(ViewRow::new(cells))
}
