use std::error::Error;

use chrono::NaiveDateTime;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::types::{SqlValue, TIMESTAMP_FORMAT};

type BoxError = Box<dyn Error + Sync + Send>;

/// Largest magnitude an `f64` holds exactly as an integer (2^53).
const F64_EXACT_INT: i64 = 1 << 53;
/// Largest magnitude an `f32` holds exactly as an integer (2^24).
const F32_EXACT_INT: i64 = 1 << 24;

/// Borrow parameters in the form `tokio_postgres` binds.
#[must_use]
pub fn as_refs(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

fn is_text(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    )
}

fn mismatch(value: &SqlValue, ty: &Type) -> BoxError {
    let variant = match value {
        SqlValue::Int(_) => "Int",
        SqlValue::Float(_) => "Float",
        SqlValue::Text(_) => "Text",
        SqlValue::Bool(_) => "Bool",
        SqlValue::Timestamp(_) => "Timestamp",
        SqlValue::Null => "Null",
        SqlValue::Json(_) => "Json",
        SqlValue::Blob(_) => "Blob",
    };
    format!("cannot bind {variant} as {ty}").into()
}

fn int_to_sql(i: i64, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(i)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(i)?.to_sql(ty, out),
        Type::INT8 => i.to_sql(ty, out),
        #[allow(clippy::cast_precision_loss)]
        Type::FLOAT8 if i.abs() <= F64_EXACT_INT => (i as f64).to_sql(ty, out),
        #[allow(clippy::cast_precision_loss)]
        Type::FLOAT4 if i.abs() <= F32_EXACT_INT => (i as f32).to_sql(ty, out),
        Type::BOOL if i == 0 || i == 1 => (i == 1).to_sql(ty, out),
        _ if is_text(ty) => i.to_string().to_sql(ty, out),
        _ => Err(format!("cannot bind Int {i} as {ty} without loss").into()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_sql(f: f64, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT8 => f.to_sql(ty, out),
        Type::FLOAT4 => (f as f32).to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8
            if f.fract() == 0.0 && f.abs() <= F64_EXACT_INT as f64 =>
        {
            int_to_sql(f as i64, ty, out)
        }
        _ if is_text(ty) => f.to_string().to_sql(ty, out),
        _ => Err(format!("cannot bind Float {f} as {ty} without loss").into()),
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
    let trimmed = s.trim();
    match *ty {
        _ if is_text(ty) => s.to_sql(ty, out),
        Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(trimmed.parse::<i64>()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => float_to_sql(trimmed.parse::<f64>()?, ty, out),
        Type::BOOL => match trimmed.to_ascii_lowercase().as_str() {
            "t" | "true" | "1" | "yes" | "on" => true.to_sql(ty, out),
            "f" | "false" | "0" | "no" | "off" => false.to_sql(ty, out),
            _ => Err(format!("cannot bind Text '{s}' as {ty}").into()),
        },
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::TIMESTAMP | Type::TIMESTAMPTZ | Type::DATE => {
            let parsed = SqlValue::Text(s.to_string())
                .as_timestamp()
                .ok_or_else(|| format!("cannot bind Text '{s}' as {ty}"))?;
            timestamp_to_sql(parsed, ty, out)
        }
        _ => Err(mismatch(&SqlValue::Text(String::new()), ty)),
    }
}

fn timestamp_to_sql(
    dt: NaiveDateTime,
    ty: &Type,
    out: &mut bytes::BytesMut,
) -> Result<IsNull, BoxError> {
    match *ty {
        Type::TIMESTAMP => dt.to_sql(ty, out),
        Type::TIMESTAMPTZ => dt.and_utc().to_sql(ty, out),
        Type::DATE => dt.date().to_sql(ty, out),
        _ if is_text(ty) => dt.format(TIMESTAMP_FORMAT).to_string().to_sql(ty, out),
        _ => Err(mismatch(&SqlValue::Timestamp(dt), ty)),
    }
}

/// Values are converted to the column's type only when no information is lost;
/// any other combination is an encoding error rather than reinterpreted bytes.
impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Int(i) => int_to_sql(*i, ty, out),
            SqlValue::Float(f) => float_to_sql(*f, ty, out),
            SqlValue::Text(s) => text_to_sql(s, ty, out),
            SqlValue::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => int_to_sql(i64::from(*b), ty, out),
                _ if is_text(ty) => b.to_string().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            SqlValue::Timestamp(dt) => timestamp_to_sql(*dt, ty, out),
            SqlValue::Json(value) => match *ty {
                Type::JSON | Type::JSONB => value.to_sql(ty, out),
                _ if is_text(ty) => value.to_string().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            SqlValue::Blob(bytes) => match *ty {
                Type::BYTEA => bytes.to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use tokio_postgres::types::FromSql;

    use super::*;

    fn encode(value: &SqlValue, ty: &Type) -> Result<bytes::BytesMut, BoxError> {
        let mut buf = bytes::BytesMut::new();
        value.to_sql_checked(ty, &mut buf)?;
        Ok(buf)
    }

    #[test]
    fn int_widens_to_float_columns() {
        let buf = encode(&SqlValue::Int(5), &Type::FLOAT8).unwrap();
        assert_eq!(f64::from_sql(&Type::FLOAT8, &buf).unwrap(), 5.0);
        let buf = encode(&SqlValue::Int(-7), &Type::FLOAT4).unwrap();
        assert_eq!(f32::from_sql(&Type::FLOAT4, &buf).unwrap(), -7.0);
        assert!(encode(&SqlValue::Int(F64_EXACT_INT + 1), &Type::FLOAT8).is_err());
    }

    #[test]
    fn int_narrows_with_range_check() {
        let buf = encode(&SqlValue::Int(1234), &Type::INT4).unwrap();
        assert_eq!(i32::from_sql(&Type::INT4, &buf).unwrap(), 1234);
        let buf = encode(&SqlValue::Int(-3), &Type::INT2).unwrap();
        assert_eq!(i16::from_sql(&Type::INT2, &buf).unwrap(), -3);
        assert!(encode(&SqlValue::Int(i64::from(i32::MAX) + 1), &Type::INT4).is_err());
    }

    #[test]
    fn float_binds_to_integers_only_when_integral() {
        let buf = encode(&SqlValue::Float(42.0), &Type::INT8).unwrap();
        assert_eq!(i64::from_sql(&Type::INT8, &buf).unwrap(), 42);
        assert!(encode(&SqlValue::Float(4.5), &Type::INT8).is_err());
    }

    #[test]
    fn text_parses_into_numeric_columns() {
        let buf = encode(&SqlValue::Text("1234".into()), &Type::INT4).unwrap();
        assert_eq!(i32::from_sql(&Type::INT4, &buf).unwrap(), 1234);
        let buf = encode(&SqlValue::Text("2.5".into()), &Type::FLOAT8).unwrap();
        assert_eq!(f64::from_sql(&Type::FLOAT8, &buf).unwrap(), 2.5);
        let buf = encode(&SqlValue::Text("true".into()), &Type::BOOL).unwrap();
        assert!(bool::from_sql(&Type::BOOL, &buf).unwrap());
        assert!(encode(&SqlValue::Text("abcd".into()), &Type::INT4).is_err());
    }

    #[test]
    fn numbers_render_into_text_columns() {
        let buf = encode(&SqlValue::Int(7), &Type::TEXT).unwrap();
        assert_eq!(String::from_sql(&Type::TEXT, &buf).unwrap(), "7");
    }

    #[test]
    fn unrelated_types_are_rejected() {
        let err = encode(&SqlValue::Blob(vec![1, 2]), &Type::INT4).unwrap_err();
        assert_eq!(err.to_string(), "cannot bind Blob as int4");
        assert!(encode(&SqlValue::Bool(true), &Type::FLOAT8).is_err());
        assert!(encode(&SqlValue::Json(serde_json::json!({"a": 1})), &Type::INT8).is_err());
        assert!(encode(&SqlValue::Null, &Type::INT4).is_ok());
    }
}
