//! Dot-path access into heterogeneous JSON records.
//!
//! A path is a list of segments separated by `.`. A backslash directly in
//! front of a dot (`\.`) makes the dot part of the key instead of a
//! separator, so `"a\.b.c"` addresses `data["a.b"]["c"]`. Numeric segments
//! index arrays; every other segment is an object key.

use serde_json::{Map, Value};

use crate::error::PathError;

/// Split a path on unescaped dots.
///
/// `\.` becomes a literal dot inside the segment; any other backslash is
/// kept as-is. The empty path has no segments and addresses the root.
pub fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'.') => {
                chars.next();
                current.push('.');
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    segments.push(current);
    segments
}

/// Join segments back into a path, escaping dots inside segments.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref().replace('.', "\\."))
        .collect::<Vec<_>>()
        .join(".")
}

/// Parse a segment as an array index.
///
/// Only plain ASCII digits in canonical form qualify, so `"01"` is a key
/// and not index 1.
pub fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

/// Resolve `path` against `data`.
///
/// Returns `None` as soon as a segment is missing or an intermediate value
/// is `null` or a scalar. Never panics on malformed input.
pub fn extract<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    walk(data, split_path(path))
}

/// Like [`extract`], but yields an owned value with `null` for missing data.
pub fn extract_or_null(data: &Value, path: &str) -> Value {
    extract(data, path).cloned().unwrap_or(Value::Null)
}

fn walk<I>(root: &Value, segments: I) -> Option<&Value>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut current = root;
    for segment in segments {
        let segment = segment.as_ref();
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate objects on the way.
///
/// `null` intermediates are replaced by objects. A numeric segment on an
/// array overwrites that slot, or appends when it equals the array length.
pub fn inject(data: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let segments = split_path(path);
    if segments.is_empty() {
        return Err(PathError::Empty);
    }

    let mut current = data;
    for depth in 0..segments.len() {
        current = descend(current, &segments[..=depth])?;
    }
    *current = value;
    Ok(())
}

/// Step into the last segment of `at`, creating it when absent.
fn descend<'a>(current: &'a mut Value, at: &[String]) -> Result<&'a mut Value, PathError> {
    let segment = &at[at.len() - 1];
    if current.is_null() {
        *current = Value::Object(Map::new());
    }

    match current {
        Value::Object(map) => Ok(map.entry(segment.clone()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = parse_index(segment).ok_or_else(|| PathError::NotAnIndex {
                path: join_path(at),
            })?;
            let len = items.len();
            if index == len {
                items.push(Value::Null);
            }
            items.get_mut(index).ok_or(PathError::IndexOutOfBounds {
                path: join_path(at),
                index,
                len,
            })
        }
        _ => Err(PathError::NotAContainer {
            path: join_path(&at[..at.len() - 1]),
        }),
    }
}
