//! # sqlport
//!
//! Advisory SQL dialect rewriter for migrations between Tibero, Oracle,
//! MySQL and PostgreSQL.
//!
//! sqlport converts one statement at a time. Pagination, built-in function
//! names, column types and identifier quoting are rewritten by deterministic
//! rules; anything it cannot rewrite faithfully is left in place and reported
//! as a warning, and every rule that changed the output is listed in the
//! result's audit trail.
//!
//! ## Quick Example
//!
//! ```
//! use sqlport::prelude::*;
//!
//! let result = sqlport::convert(
//!     "SELECT SYSDATE FROM emp FETCH FIRST 10 ROWS ONLY",
//!     DialectType::Tibero,
//!     DialectType::Postgresql,
//! )
//! .unwrap();
//! assert_eq!(result.converted_sql, "SELECT CURRENT_TIMESTAMP FROM emp LIMIT 10");
//! ```
//!
//! ## Conversion paths
//!
//! | Source            | Select statements             | `CREATE TABLE`      |
//! |-------------------|-------------------------------|---------------------|
//! | Tibero, Oracle    | tree rewrite, then re-printed | synthesized         |
//! | MySQL, PostgreSQL | regex rule pipeline on text   | synthesized         |
//!
//! Any other statement is returned exactly as written.

pub mod ast;
pub mod config;
pub mod context;
pub mod converter;
pub mod dialect;
pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod printer;
pub mod registry;
pub mod types;

pub mod prelude {
    pub use crate::ast::{DataType, ParsedStatement, Statement, StatementKind};
    pub use crate::config::Config;
    pub use crate::converter::DialectConverter;
    pub use crate::dialect::{DialectPair, DialectType};
    pub use crate::error::*;
    pub use crate::orchestrator::Orchestrator;
    pub use crate::parser::parse;
    pub use crate::printer::ToSql;
    pub use crate::types::*;
}

use dialect::DialectType;
use error::ConvertResult;
use types::{ConversionOptions, ConversionResult};

/// Parse and convert one statement with default options.
///
/// # Example
///
/// ```
/// use sqlport::dialect::DialectType;
///
/// let result = sqlport::convert(
///     "SELECT DECODE(x, 1, 'a', 'b') FROM t",
///     DialectType::Tibero,
///     DialectType::Mysql,
/// )
/// .unwrap();
/// assert!(result.has_errors());
/// ```
pub fn convert(sql: &str, source: DialectType, target: DialectType) -> ConvertResult<ConversionResult> {
    orchestrator::Orchestrator::global().convert_sql(sql, source, target, &ConversionOptions::default())
}
