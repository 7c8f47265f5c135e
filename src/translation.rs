use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::SqlSugarError;
use crate::query_builder::BoundParams;
use crate::types::SqlValue;

/// Placeholder syntax a driver accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Bare `?` in binding order (MySQL-style drivers).
    Question,
    /// SQLite-style numbered placeholders like `?1`.
    Sqlite,
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
}

impl PlaceholderStyle {
    fn write(self, out: &mut String, index: usize) {
        match self {
            PlaceholderStyle::Question => out.push('?'),
            PlaceholderStyle::Sqlite => {
                out.push('?');
                out.push_str(&index.to_string());
            }
            PlaceholderStyle::Postgres => {
                out.push('$');
                out.push_str(&index.to_string());
            }
        }
    }
}

/// SQL in the driver's placeholder syntax plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Translated<'a> {
    pub sql: Cow<'a, str>,
    pub params: Vec<SqlValue>,
}

/// Rewrite `?`, `?N`, `$N` and `:name` placeholders into `style`.
///
/// Quoted strings, quoted identifiers, comments and dollar-quoted blocks are left
/// untouched. Named parameters are resolved to positions (numbered styles bind
/// each distinct name once; `Question` repeats the value per occurrence). `::`
/// casts are never treated as placeholders. With the `Question` style a
/// backslash inside a single-quoted string escapes the next character, as in
/// MySQL; the numbered styles follow standard SQL, where it does not.
///
/// # Errors
/// Returns `SqlSugarError::ParameterError` when placeholders and parameters do
/// not line up.
pub fn translate_placeholders<'a>(
    sql: &'a str,
    params: &BoundParams,
    style: PlaceholderStyle,
) -> Result<Translated<'a>, SqlSugarError> {
    let named: Option<HashMap<&str, &SqlValue>> = match params {
        BoundParams::Named(pairs) => {
            let mut map = HashMap::with_capacity(pairs.len());
            for (name, value) in pairs {
                if map.insert(name.as_str(), value).is_some() {
                    return Err(SqlSugarError::ParameterError(format!(
                        "named parameter :{name} is bound more than once"
                    )));
                }
            }
            Some(map)
        }
        BoundParams::Positional(_) => None,
    };

    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut state = State::Normal;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    let mut bare_count = 0;
    let mut max_explicit = 0;
    let mut name_order: Vec<&str> = Vec::new();
    let mut named_values: Vec<SqlValue> = Vec::new();
    let mut order: Vec<usize> = Vec::new();

    while idx < bytes.len() {
        let b = bytes[idx];
        // (start, end, replacement index) of a placeholder token to rewrite
        let mut token: Option<(usize, usize, usize)> = None;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::BacktickQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b':' if bytes.get(idx + 1) == Some(&b':') => {
                    idx += 1;
                }
                b':' => {
                    if let (Some(values), Some(end)) = (&named, scan_ident(bytes, idx + 1)) {
                        let name = &sql[idx + 1..end];
                        let value = values.get(name).ok_or_else(|| {
                            SqlSugarError::ParameterError(format!(
                                "no value bound for named parameter :{name}"
                            ))
                        })?;
                        let seen = name_order.iter().position(|n| *n == name);
                        if seen.is_none() {
                            name_order.push(name);
                        }
                        let position = match (style, seen) {
                            (PlaceholderStyle::Question, _) | (_, None) => {
                                named_values.push((*value).clone());
                                named_values.len()
                            }
                            (_, Some(pos)) => pos + 1,
                        };
                        token = Some((idx, end, position));
                    }
                }
                b'$' => {
                    if let Some(end) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(&sql[idx..=end]);
                        idx = end;
                    } else if let Some((end, n)) = scan_digits(bytes, idx + 1) {
                        max_explicit = max_explicit.max(n);
                        token = Some((idx, end, n));
                    }
                }
                b'?' => {
                    if let Some((end, n)) = scan_digits(bytes, idx + 1) {
                        max_explicit = max_explicit.max(n);
                        token = Some((idx, end, n));
                    } else {
                        if named.is_some() {
                            return Err(SqlSugarError::ParameterError(
                                "positional `?` placeholder used with named parameters".into(),
                            ));
                        }
                        bare_count += 1;
                        token = Some((idx, idx + 1, bare_count));
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\\' && style == PlaceholderStyle::Question {
                    idx += 1; // backslash escape
                } else if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::BacktickQuoted => {
                if b == b'`' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(tag) => {
                if bytes[idx..].starts_with(tag.as_bytes()) {
                    state = State::Normal;
                    idx += tag.len() - 1;
                }
            }
        }

        if let Some((start, end, index)) = token {
            order.push(index);
            let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
            buf.push_str(&sql[copied..start]);
            style.write(buf, index);
            copied = end;
            idx = end;
        } else {
            idx += 1;
        }
    }

    if named.is_some() {
        if max_explicit > 0 {
            return Err(SqlSugarError::ParameterError(
                "numbered placeholder used with named parameters".into(),
            ));
        }
        check_all_names_used(params, &name_order)?;
    } else if order.contains(&0) {
        return Err(SqlSugarError::ParameterError(
            "placeholder numbers start at 1".into(),
        ));
    }

    let params = match params {
        BoundParams::Named(_) => named_values,
        BoundParams::Positional(values) => {
            if bare_count > 0 && max_explicit > 0 {
                return Err(SqlSugarError::ParameterError(
                    "cannot mix `?` with numbered placeholders".into(),
                ));
            }
            let expected = bare_count.max(max_explicit);
            if expected != values.len() {
                return Err(SqlSugarError::ParameterError(format!(
                    "statement has {expected} placeholder(s) but {} value(s) were bound",
                    values.len()
                )));
            }
            if style == PlaceholderStyle::Question {
                order.iter().map(|&i| values[i - 1].clone()).collect()
            } else {
                values.clone()
            }
        }
    };

    let sql = match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    };
    Ok(Translated { sql, params })
}

fn check_all_names_used(params: &BoundParams, used: &[&str]) -> Result<(), SqlSugarError> {
    if let BoundParams::Named(pairs) = params {
        if let Some((unused, _)) = pairs.iter().find(|(k, _)| !used.contains(&k.as_str())) {
            return Err(SqlSugarError::ParameterError(format!(
                "named parameter :{unused} does not appear in the statement"
            )));
        }
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum State<'a> {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    BacktickQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(&'a str),
}

fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start {
        return None;
    }
    std::str::from_utf8(&bytes[start..idx])
        .ok()
        .and_then(|digits| digits.parse().ok())
        .map(|n| (idx, n))
}

fn scan_ident(bytes: &[u8], start: usize) -> Option<usize> {
    let first = *bytes.get(start)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let mut idx = start + 1;
    while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_') {
        idx += 1;
    }
    Some(idx)
}

/// Index of the closing `$` of a `$tag$` opener starting at `start`.
fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<usize> {
    let mut idx = start + 1;
    if bytes.get(idx).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }
    (idx < bytes.len()).then_some(idx)
}
