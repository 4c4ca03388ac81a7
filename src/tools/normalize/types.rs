use serde::Serialize;

/// A raw field value after loose-literal coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Loose {
    Bool(bool),
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

/// One coercion attempt, tried in [`COERCION_ORDER`](super::COERCION_ORDER).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Bool,
    Null,
    Int,
    Float,
}

impl Coercion {
    pub(super) fn attempt(self, raw: &str) -> Option<Loose> {
        match self {
            Coercion::Bool => match raw {
                "true" => Some(Loose::Bool(true)),
                "false" => Some(Loose::Bool(false)),
                _ => None,
            },
            Coercion::Null => (raw == "null").then_some(Loose::Null),
            Coercion::Int => raw.trim().parse().ok().map(Loose::Int),
            Coercion::Float => raw.trim().parse().ok().map(Loose::Float),
        }
    }
}

impl Loose {
    pub fn is_null(&self) -> bool {
        matches!(self, Loose::Null)
    }

    /// Integers as-is; integral floats are accepted too.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(n) => Some(*n),
            Loose::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Int(n) => Some(*n as f64),
            Loose::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<bool> for Loose {
    fn from(value: bool) -> Self {
        Loose::Bool(value)
    }
}

impl From<i64> for Loose {
    fn from(value: i64) -> Self {
        Loose::Int(value)
    }
}

impl From<f64> for Loose {
    fn from(value: f64) -> Self {
        Loose::Float(value)
    }
}

impl From<&str> for Loose {
    fn from(value: &str) -> Self {
        Loose::Str(value.to_string())
    }
}
