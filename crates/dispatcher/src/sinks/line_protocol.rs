//! InfluxDB line protocol encoding
//!
//! `measurement,tag=v,... field=v,... <unix seconds>`, one line per point.
//! Tags and fields come out sorted by key. Integers carry an `i` suffix,
//! strings are double quoted. Backslashes in names, tag keys and values
//! are escaped; line breaks never reach the encoder.

use std::fmt::Write;

use contracts::{Batch, FieldValue, MetricPoint};

/// Encode a whole batch, newline separated
pub fn encode(batch: &Batch) -> String {
    let mut out = String::new();
    for point in batch {
        if !out.is_empty() {
            out.push('\n');
        }
        encode_point(point, &mut out);
    }
    out
}

/// Append one point to `out` (no trailing newline)
pub fn encode_point(point: &MetricPoint, out: &mut String) {
    escape_into(out, point.measurement().as_str(), &[',', ' ', '\\']);

    for (key, value) in point.tags() {
        out.push(',');
        escape_into(out, key, &[',', '=', ' ', '\\']);
        out.push('=');
        escape_into(out, value, &[',', '=', ' ', '\\']);
    }

    out.push(' ');
    for (i, (key, value)) in point.fields().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        escape_into(out, key, &[',', '=', ' ', '\\']);
        out.push('=');
        match value {
            FieldValue::Integer(v) => {
                let _ = write!(out, "{v}i");
            }
            FieldValue::Float(v) => {
                let _ = write!(out, "{v}");
            }
            FieldValue::Text(v) => {
                out.push('"');
                escape_into(out, v, &['"', '\\']);
                out.push('"');
            }
        }
    }

    let _ = write!(out, " {}", point.timestamp().timestamp());
}

fn escape_into(out: &mut String, s: &str, special: &[char]) {
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
