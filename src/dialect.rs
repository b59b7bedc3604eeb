//! Dialect catalog.
//!
//! The closed set of dialects sqlport converts between. Each dialect carries
//! its identifier quote style, its pagination idiom and the built-in function
//! names it supports natively. Pure data: nothing here mutates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectType {
    Tibero,
    Mysql,
    Postgresql,
    Oracle,
}

/// How a dialect limits result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationIdiom {
    /// `LIMIT n OFFSET m`
    Limit,
    /// `OFFSET m ROWS FETCH FIRST n ROWS ONLY`
    FetchFirst,
}

const TIBERO_FUNCTIONS: &[&str] = &[
    "ABS", "ADD_MONTHS", "AVG", "CEIL", "COALESCE", "CONCAT", "COUNT", "DECODE", "FLOOR",
    "GREATEST", "INITCAP", "INSTR", "LAST_DAY", "LEAST", "LENGTH", "LISTAGG", "LOWER", "LPAD",
    "LTRIM", "MAX", "MIN", "MOD", "MONTHS_BETWEEN", "NVL", "NVL2", "REPLACE", "ROUND", "RPAD",
    "RTRIM", "SUBSTR", "SUM", "SYSDATE", "SYSTIMESTAMP", "TO_CHAR", "TO_DATE", "TO_NUMBER",
    "TRIM", "TRUNC", "UPPER",
];

const ORACLE_FUNCTIONS: &[&str] = &[
    "ABS", "ADD_MONTHS", "AVG", "CEIL", "COALESCE", "CONCAT", "COUNT", "DECODE", "FLOOR",
    "GREATEST", "INITCAP", "INSTR", "LAST_DAY", "LEAST", "LENGTH", "LISTAGG", "LOWER", "LPAD",
    "LTRIM", "MAX", "MIN", "MOD", "MONTHS_BETWEEN", "NVL", "NVL2", "REGEXP_LIKE",
    "REGEXP_REPLACE", "REPLACE", "ROUND", "RPAD", "RTRIM", "SUBSTR", "SUM", "SYSDATE",
    "SYSTIMESTAMP", "TO_CHAR", "TO_DATE", "TO_NUMBER", "TRIM", "TRUNC", "UPPER",
];

const MYSQL_FUNCTIONS: &[&str] = &[
    "ABS", "AVG", "CEIL", "CHAR_LENGTH", "COALESCE", "CONCAT", "CONCAT_WS", "COUNT",
    "CURDATE", "CURRENT_DATE", "CURRENT_TIMESTAMP", "DATE_ADD", "DATE_FORMAT", "DATE_SUB",
    "FLOOR", "GREATEST", "GROUP_CONCAT", "IF", "IFNULL", "INSTR", "LCASE", "LEAST", "LENGTH",
    "LOCATE", "LOWER", "LPAD", "LTRIM", "MAX", "MIN", "MOD", "NOW", "RAND", "REPLACE", "ROUND", "RPAD",
    "RTRIM", "STR_TO_DATE", "SUBSTR", "SUBSTRING", "SUM", "TRIM", "TRUNCATE", "UCASE", "UPPER",
];

const POSTGRESQL_FUNCTIONS: &[&str] = &[
    "ABS", "AVG", "CEIL", "COALESCE", "CONCAT", "COUNT", "CURRENT_DATE", "CURRENT_TIMESTAMP",
    "DATE_TRUNC", "FLOOR", "GREATEST", "INITCAP", "LEAST", "LENGTH", "LOWER", "LPAD", "LTRIM",
    "MAX", "MIN", "MOD", "NOW", "RANDOM", "REPLACE", "ROUND", "RPAD", "RTRIM", "STRING_AGG",
    "STRPOS", "SUBSTR", "SUBSTRING", "SUM", "TO_CHAR", "TO_DATE", "TO_NUMBER", "TO_TIMESTAMP",
    "TRIM", "TRUNC", "UPPER",
];

impl DialectType {
    /// Every dialect, in catalog order.
    pub const ALL: [DialectType; 4] = [
        DialectType::Tibero,
        DialectType::Mysql,
        DialectType::Postgresql,
        DialectType::Oracle,
    ];

    /// Character used to quote identifiers.
    pub fn quote_char(&self) -> char {
        match self {
            DialectType::Mysql => '`',
            DialectType::Tibero | DialectType::Postgresql | DialectType::Oracle => '"',
        }
    }

    /// Quote a possibly dotted identifier in this dialect's style.
    pub fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        name.split('.')
            .map(|part| {
                let escaped = part.replace(q, &format!("{q}{q}"));
                format!("{q}{escaped}{q}")
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn pagination(&self) -> PaginationIdiom {
        match self {
            DialectType::Mysql | DialectType::Postgresql => PaginationIdiom::Limit,
            DialectType::Tibero | DialectType::Oracle => PaginationIdiom::FetchFirst,
        }
    }

    /// Whether the dialect has the `ROWNUM` pseudo-column.
    pub fn has_rownum(&self) -> bool {
        matches!(self, DialectType::Tibero | DialectType::Oracle)
    }

    /// Built-in function names the dialect supports natively (upper case).
    pub fn supported_functions(&self) -> &'static [&'static str] {
        match self {
            DialectType::Tibero => TIBERO_FUNCTIONS,
            DialectType::Mysql => MYSQL_FUNCTIONS,
            DialectType::Postgresql => POSTGRESQL_FUNCTIONS,
            DialectType::Oracle => ORACLE_FUNCTIONS,
        }
    }

    /// Case-insensitive membership test against [`supported_functions`](Self::supported_functions).
    pub fn supports_function(&self, name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        self.supported_functions().contains(&upper.as_str())
    }

    pub fn name(&self) -> &'static str {
        match self {
            DialectType::Tibero => "TIBERO",
            DialectType::Mysql => "MYSQL",
            DialectType::Postgresql => "POSTGRESQL",
            DialectType::Oracle => "ORACLE",
        }
    }
}

impl fmt::Display for DialectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tibero" => Ok(DialectType::Tibero),
            "mysql" | "mariadb" => Ok(DialectType::Mysql),
            "postgresql" | "postgres" | "pg" => Ok(DialectType::Postgresql),
            "oracle" => Ok(DialectType::Oracle),
            other => Err(ConvertError::UnknownDialect(other.to_string())),
        }
    }
}

/// Ordered (source, target) key for rule lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialectPair {
    pub source: DialectType,
    pub target: DialectType,
}

impl DialectPair {
    pub fn new(source: DialectType, target: DialectType) -> Self {
        Self { source, target }
    }

    /// Same-dialect pairs are no-ops and never reach a registry.
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for DialectPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_styles() {
        assert_eq!(DialectType::Mysql.quote_identifier("users"), "`users`");
        assert_eq!(DialectType::Tibero.quote_identifier("users"), "\"users\"");
        assert_eq!(
            DialectType::Postgresql.quote_identifier("hr.emp"),
            "\"hr\".\"emp\""
        );
        assert_eq!(DialectType::Oracle.quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Tibero".parse::<DialectType>().unwrap(), DialectType::Tibero);
        assert_eq!("postgres".parse::<DialectType>().unwrap(), DialectType::Postgresql);
        assert!("sqlite".parse::<DialectType>().is_err());
    }

    #[test]
    fn test_supported_functions_case_insensitive() {
        assert!(DialectType::Postgresql.supports_function("to_char"));
        assert!(!DialectType::Mysql.supports_function("NVL"));
        assert!(DialectType::Tibero.supports_function("Decode"));
    }

    #[test]
    fn test_identity_pair() {
        assert!(DialectPair::new(DialectType::Oracle, DialectType::Oracle).is_identity());
        assert!(!DialectPair::new(DialectType::Oracle, DialectType::Tibero).is_identity());
    }
}
