//! Writer for the engine's brace-delimited property text.
//!
//! The grammar is a sequence of `key: value` lines and `key { ... }`
//! blocks. Strings are quoted unless the key names an enum constant, numbers
//! are written with up to three decimals and vectors become `x y z w`
//! blocks.

use crate::types::{round_value, Vector4};

/// Keys whose values are enum constants and are written unquoted.
pub const CONSTANT_KEYS: [&str; 12] = [
    "type",
    "blend_mode",
    "xanchor",
    "yanchor",
    "pivot",
    "adjust_mode",
    "size_mode",
    "clipping_mode",
    "adjust_reference",
    "outer_bounds",
    "pie_bounds",
    "custom_type",
];

const INDENT: &str = "  ";

/// How vector blocks are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VectorMode {
    /// All four components.
    #[default]
    Full,
    /// Components that are exactly zero are left out.
    OmitZero,
}

pub fn is_constant_key(key: &str) -> bool {
    CONSTANT_KEYS.contains(&key)
}

/// Format a number rounded to three decimals, always with a decimal point.
pub fn format_number(value: f64) -> String {
    let value = round_value(value);
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Quote and escape a string value.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Accumulates property text.
#[derive(Debug, Default)]
pub struct PropertyWriter {
    out: String,
    depth: usize,
    vectors: VectorMode,
}

impl PropertyWriter {
    pub fn new(vectors: VectorMode) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            vectors,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// A string field, quoted unless `key` is a constant key.
    pub fn string(&mut self, key: &str, value: &str) {
        if is_constant_key(key) {
            self.line(&format!("{}: {}", key, value));
        } else {
            self.line(&format!("{}: {}", key, quote(value)));
        }
    }

    pub fn number(&mut self, key: &str, value: f64) {
        self.line(&format!("{}: {}", key, format_number(value)));
    }

    pub fn integer(&mut self, key: &str, value: i64) {
        self.line(&format!("{}: {}", key, value));
    }

    pub fn boolean(&mut self, key: &str, value: bool) {
        self.line(&format!("{}: {}", key, value));
    }

    pub fn vector(&mut self, key: &str, value: Vector4) {
        let mode = self.vectors;
        self.block(key, |w| {
            for (name, component) in value.components() {
                if mode == VectorMode::OmitZero && round_value(component) == 0.0 {
                    continue;
                }
                w.number(name, component);
            }
        });
    }

    /// A nested `key { ... }` block.
    pub fn block(&mut self, key: &str, body: impl FnOnce(&mut Self)) {
        self.line(&format!("{} {{", key));
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line("}");
    }

    pub fn finish(self) -> String {
        self.out
    }
}
