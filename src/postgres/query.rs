use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tokio_postgres::Statement;
use tokio_postgres::types::{FromSql, Type};

use crate::error::SqlSugarError;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Extracts a `SqlValue` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `SqlSugarError` if the column cannot be read as any supported type.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<SqlValue, SqlSugarError> {
    let type_name = row.columns()[idx].type_().name();

    let value = match type_name {
        "int2" => row.try_get::<_, Option<i16>>(idx)?.map(|v| SqlValue::Int(i64::from(v))),
        "int4" => row.try_get::<_, Option<i32>>(idx)?.map(|v| SqlValue::Int(i64::from(v))),
        "int8" => row.try_get::<_, Option<i64>>(idx)?.map(SqlValue::Int),
        "float4" => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| SqlValue::Float(f64::from(v))),
        "float8" => row.try_get::<_, Option<f64>>(idx)?.map(SqlValue::Float),
        "bool" => row.try_get::<_, Option<bool>>(idx)?.map(SqlValue::Bool),
        "timestamp" => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(SqlValue::Timestamp),
        "timestamptz" => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|v| SqlValue::Timestamp(v.naive_utc())),
        "date" => row
            .try_get::<_, Option<NaiveDate>>(idx)?
            .map(|d| SqlValue::Timestamp(d.and_time(chrono::NaiveTime::MIN))),
        "json" | "jsonb" => row.try_get::<_, Option<Value>>(idx)?.map(SqlValue::Json),
        "bytea" => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(SqlValue::Blob),
        "numeric" => row
            .try_get::<_, Option<Numeric>>(idx)?
            .map(|n| numeric_value(n.0)),
        "uuid" => row.try_get::<_, Option<Uuid>>(idx)?.map(|u| SqlValue::Text(u.0)),
        _ => row
            .try_get::<_, Option<String>>(idx)
            .map_err(|e| {
                SqlSugarError::ExecutionError(format!(
                    "unsupported postgres column type '{type_name}': {e}"
                ))
            })?
            .map(SqlValue::Text),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}

type BoxError = Box<dyn Error + Sync + Send>;

/// A `numeric` cell in its exact decimal text form.
struct Numeric(String);

impl<'a> FromSql<'a> for Numeric {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        decode_numeric(raw).map(Numeric)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}

/// A `uuid` cell in hyphenated lowercase form.
struct Uuid(String);

impl<'a> FromSql<'a> for Uuid {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        if raw.len() != 16 {
            return Err(format!("uuid must be 16 bytes, got {}", raw.len()).into());
        }
        let mut text = String::with_capacity(36);
        for (i, byte) in raw.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                text.push('-');
            }
            let _ = write!(text, "{byte:02x}");
        }
        Ok(Uuid(text))
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::UUID
    }
}

fn read_u16(raw: &[u8], offset: usize) -> Result<u16, BoxError> {
    raw.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| "truncated numeric value".into())
}

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// Decode the binary `numeric` wire format: digit count, weight, sign and
/// display scale, then base-10000 digits, most significant first.
fn decode_numeric(raw: &[u8]) -> Result<String, BoxError> {
    let ndigits = usize::from(read_u16(raw, 0)?);
    let weight = i32::from(i16::from_be_bytes(read_u16(raw, 2)?.to_be_bytes()));
    let sign = read_u16(raw, 4)?;
    let dscale = usize::from(read_u16(raw, 6)?);
    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        _ => {}
    }
    let digits = (0..ndigits)
        .map(|i| read_u16(raw, 8 + 2 * i))
        .collect::<Result<Vec<u16>, _>>()?;
    let digit = |group: i32| -> u16 {
        usize::try_from(group)
            .ok()
            .and_then(|g| digits.get(g).copied())
            .unwrap_or(0)
    };

    let mut text = String::new();
    if sign == NUMERIC_NEG {
        text.push('-');
    }
    if weight < 0 {
        text.push('0');
    } else {
        let _ = write!(text, "{}", digit(0));
        for group in 1..=weight {
            let _ = write!(text, "{:04}", digit(group));
        }
    }
    if dscale > 0 {
        let mut fraction = String::with_capacity(dscale + 4);
        let mut group = weight + 1;
        while fraction.len() < dscale {
            let _ = write!(fraction, "{:04}", digit(group));
            group += 1;
        }
        fraction.truncate(dscale);
        text.push('.');
        text.push_str(&fraction);
    }
    Ok(text)
}

/// Integral values that fit become `Int`, other finite values `Float`; the
/// rest keep their decimal text.
fn numeric_value(text: String) -> SqlValue {
    let (int_part, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if fraction.bytes().all(|b| b == b'0') {
        return match int_part.parse::<i64>() {
            Ok(i) => SqlValue::Int(i),
            Err(_) => SqlValue::Text(text),
        };
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => SqlValue::Float(f),
        _ => SqlValue::Text(text),
    }
}

/// Build a result set using statement metadata for column names.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set(
    stmt: &Statement,
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet, SqlSugarError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
