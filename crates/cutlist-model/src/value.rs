use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar value held by one sheet cell.
///
/// The enum uses an explicit `{type, value}` tagged layout so grids and
/// catalogs serialize with a stable schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScalarValue {
    /// Empty / unset cell.
    Empty,
    /// IEEE-754 double precision number.
    Number(f64),
    /// Plain string.
    String(String),
    /// Boolean.
    Boolean(bool),
}

impl Default for ScalarValue {
    fn default() -> Self {
        ScalarValue::Empty
    }
}

impl ScalarValue {
    /// Returns true if the value is [`ScalarValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, ScalarValue::Empty)
    }

    /// Numeric interpretation of the value, if it has one.
    ///
    /// Numbers pass through; strings must parse as a float after trimming.
    /// Strings with a comma decimal separator (`"1500,5"`) are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            ScalarValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// The trimmed string form, used for token and name matching.
    pub fn trimmed(&self) -> String {
        self.to_string().trim().to_string()
    }
}

impl fmt::Display for ScalarValue {
    /// String form of the value as a user would see it in a cell.
    ///
    /// Integer-valued floats render without a fractional part, so the
    /// whole-number validation rule only fires on genuine decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Empty => Ok(()),
            ScalarValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            ScalarValue::String(s) => f.write_str(s),
            ScalarValue::Boolean(b) => f.write_str(if *b { "1" } else { "" }),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_is_strict() {
        assert_eq!(ScalarValue::Number(2900.0).as_number(), Some(2900.0));
        assert_eq!(ScalarValue::from(" 2900 ").as_number(), Some(2900.0));
        assert_eq!(ScalarValue::from("1500.5").as_number(), Some(1500.5));
        // Comma decimals do not parse; the row is treated as non-numeric.
        assert_eq!(ScalarValue::from("1500,5").as_number(), None);
        assert_eq!(ScalarValue::from("abc").as_number(), None);
        assert_eq!(ScalarValue::Empty.as_number(), None);
    }

    #[test]
    fn display_drops_integral_fraction() {
        assert_eq!(ScalarValue::Number(1500.0).to_string(), "1500");
        assert_eq!(ScalarValue::Number(1500.5).to_string(), "1500.5");
        assert_eq!(ScalarValue::from("1500,5").to_string(), "1500,5");
        assert_eq!(ScalarValue::Empty.to_string(), "");
    }
}
