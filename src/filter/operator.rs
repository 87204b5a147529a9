use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical operators that join filter primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    /// Text inserted into the expression buffer, surrounding spaces included
    pub fn as_text(self) -> &'static str {
        match self {
            Operator::And => " and ",
            Operator::Or => " or ",
            Operator::Not => " not ",
        }
    }

    /// Resolve one of the accepted spellings of an operator
    ///
    /// `concate`/`and`/`&&`, `alternate`/`or`/`||` and `negate`/`not`/`!`
    /// are recognised; anything else yields `None`.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias.trim().to_ascii_lowercase().as_str() {
            "concate" | "and" | "&&" => Some(Operator::And),
            "alternate" | "or" | "||" => Some(Operator::Or),
            "negate" | "not" | "!" => Some(Operator::Not),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text().trim())
    }
}

/// Error for a string that names no operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_alias(s).ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_spellings_resolve() {
        for alias in ["concate", "and", "&&", "AND"] {
            assert_eq!(Operator::from_alias(alias), Some(Operator::And), "{}", alias);
        }
        for alias in ["alternate", "or", "||"] {
            assert_eq!(Operator::from_alias(alias), Some(Operator::Or), "{}", alias);
        }
        for alias in ["negate", "not", "!"] {
            assert_eq!(Operator::from_alias(alias), Some(Operator::Not), "{}", alias);
        }
    }

    #[test]
    fn test_unknown_spelling() {
        assert_eq!(Operator::from_alias("xor"), None);
        assert_eq!(Operator::from_alias(""), None);
        assert!("nand".parse::<Operator>().is_err());
    }

    #[test]
    fn test_display_is_bare_keyword() {
        assert_eq!(Operator::Or.to_string(), "or");
        assert_eq!(Operator::Not.as_text(), " not ");
    }
}
