//! Serializer: walk a value tree and emit libconfig-formatted text.
//!
//! Output is deterministic for a given tree but makes no attempt to
//! reproduce the whitespace or comments of whatever input the tree came
//! from. Groups, lists, and arrays open their bracket on the line after
//! `key =`, nest by four spaces, and every group entry ends with `;`.

use std::fmt::Write;

use crate::error::SerializeError;
use crate::value::{Group, Value};

/// Bounds outside which an integer gets an `L` suffix.
const SMALL_INT_MIN: i64 = i32::MIN as i64;
const SMALL_INT_MAX: i64 = i32::MAX as i64;

/// Indentation per nesting level.
const INDENT: usize = 4;

/// Serialize a root value to libconfig text.
///
/// The root must be a [`Value::Group`]; handing any other kind over is a
/// contract violation reported as [`SerializeError::RootNotGroup`].
pub fn serialize(root: &Value) -> Result<String, SerializeError> {
    match root {
        Value::Group(group) => Ok(serialize_group(group)),
        other => Err(SerializeError::RootNotGroup {
            kind: other.kind_name(),
        }),
    }
}

/// Serialize a group as a top-level document (no enclosing braces).
pub fn serialize_group(group: &Group) -> String {
    let mut out = String::new();
    dump_group(group, &mut out, 0);
    out
}

fn dump_group(group: &Group, out: &mut String, indent: usize) {
    for (key, value) in group.iter() {
        dump_value(Some(key), value, out, indent);
        out.push_str(";\n");
    }
}

fn dump_collection(values: &[Value], out: &mut String, indent: usize) {
    for (i, value) in values.iter().enumerate() {
        dump_value(None, value, out, indent);
        if i + 1 < values.len() {
            out.push_str(",\n");
        }
    }
}

/// Emit one value, with `key = ` prefix when `key` is given (group entry)
/// and bare otherwise (array/list element).
fn dump_value(key: Option<&str>, value: &Value, out: &mut String, indent: usize) {
    let spaces = " ".repeat(indent);

    // Blocks put their opening bracket on the line after `key =`.
    let prefix = match key {
        Some(key) => format!("{key} = "),
        None => String::new(),
    };
    let block_prefix = match key {
        Some(key) => format!("{key} =\n{spaces}"),
        None => String::new(),
    };

    match value {
        Value::Group(group) => {
            let _ = write!(out, "{spaces}{block_prefix}{{\n");
            dump_group(group, out, indent + INDENT);
            let _ = write!(out, "{spaces}}}");
        }
        Value::List(values) => {
            let _ = write!(out, "{spaces}{block_prefix}(\n");
            dump_collection(values, out, indent + INDENT);
            let _ = write!(out, "\n{spaces})");
        }
        Value::Array(values) => {
            let _ = write!(out, "{spaces}{block_prefix}[\n");
            dump_collection(values, out, indent + INDENT);
            let _ = write!(out, "\n{spaces}]");
        }
        Value::Str(s) => {
            let _ = write!(out, "{spaces}{prefix}{}", dump_string(s));
        }
        Value::Bool(b) => {
            let _ = write!(out, "{spaces}{prefix}{b}");
        }
        Value::Int(n) => {
            let _ = write!(out, "{spaces}{prefix}{}", dump_int(i64::from(*n)));
        }
        Value::Int64(n) => {
            let _ = write!(out, "{spaces}{prefix}{}", dump_int(*n));
        }
        Value::Float(f) => {
            let _ = write!(out, "{spaces}{prefix}{}", dump_float(*f));
        }
    }
}

/// Stringize an integer, appending `L` when it exceeds the 32-bit range.
fn dump_int(n: i64) -> String {
    if (SMALL_INT_MIN..=SMALL_INT_MAX).contains(&n) {
        n.to_string()
    } else {
        format!("{n}L")
    }
}

/// Format a float so it re-tokenizes as a float.
fn dump_float(f: f64) -> String {
    let s = f.to_string();
    if s.chars().all(|c| c.is_ascii_digit() || c == '-') {
        format!("{s}.0")
    } else {
        s
    }
}

/// Quote and escape a string.
///
/// `\`, `"`, form feed, newline, carriage return, and tab get backslash
/// escapes; all other control characters (0x00-0x1F, 0x7F) are rendered as
/// `\xHH`.
fn dump_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
