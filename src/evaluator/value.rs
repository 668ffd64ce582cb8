use std::cmp::Ordering;
use std::fmt;

/// The four runtime types. Mirrors `ast::LiteralType` one-to-one but lives
/// on the value side of the house, since literals and runtime values are
/// kept as distinct concepts throughout the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Num,
    Str,
    Bool,
    Null,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Num => "num",
            DataType::Str => "str",
            DataType::Bool => "bool",
            DataType::Null => "null",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Num(_) => DataType::Num,
            Value::Str(_) => DataType::Str,
            Value::Bool(_) => DataType::Bool,
            Value::Null => DataType::Null,
        }
    }

    /// Ordering across same-typed values, used by the four relational
    /// comparison operators. `num` is numeric, `str` is lexicographic,
    /// `bool` follows `false < true`; `null` has no ordering.
    pub fn partial_cmp_same_type(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Null, Value::Null) => None,
            _ => None,
        }
    }

    /// `to_str` built-in semantics: integral numbers render without a
    /// trailing `.0`, everything else renders its natural form.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => {
                if n.floor() == *n {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Value::Bool(b) => {
                if *b {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
            Value::Null => "null".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_drop_trailing_zero() {
        assert_eq!(Value::Num(120.0).to_display_string(), "120");
        assert_eq!(Value::Num(0.5).to_display_string(), "0.5");
    }

    #[test]
    fn bool_and_null_render_as_keywords() {
        assert_eq!(Value::Bool(true).to_display_string(), "true");
        assert_eq!(Value::Null.to_display_string(), "null");
    }
}
