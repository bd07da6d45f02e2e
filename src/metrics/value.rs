use serde::Serialize;
use std::fmt;

/// A typed metric value.
///
/// The variant is decided by the raw text alone: a decimal point means float,
/// otherwise integer, and anything that fails to parse is kept verbatim.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Coerce a raw textual cell into a typed scalar.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        let parsed = if trimmed.contains('.') {
            // an overflowing exponent parses to infinity, which is not a metric
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Float)
        } else {
            trimmed.parse::<i64>().ok().map(Self::Int)
        };
        parsed.unwrap_or_else(|| Self::Text(raw.to_string()))
    }

    /// Numeric view of the value; text has none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // keep a decimal point so the text coerces back to a float
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v}.0"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}
