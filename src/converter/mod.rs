//! Dialect converters.
//!
//! One implementation per source dialect behind [`DialectConverter`]. The
//! Oracle-family converters rewrite the statement tree; the MySQL and
//! PostgreSQL converters run regex text pipelines. All four share the
//! `CREATE TABLE` synthesis.

pub mod datatypes;
pub mod ddl;
pub mod functions;
pub mod mysql;
pub mod oracle;
pub mod postgresql;
mod select;
pub mod text_rules;
pub mod tibero;

pub use mysql::MysqlConverter;
pub use oracle::OracleConverter;
pub use postgresql::PostgresqlConverter;
pub use tibero::TiberoConverter;

use crate::ast::{DataType, ParsedStatement, Select, Statement, StatementKind};
use crate::context::ConversionContext;
use crate::dialect::{DialectPair, DialectType};
use crate::types::{ConversionOptions, ConversionResult};

/// Converts statements written in one source dialect.
///
/// Implementations hold no per-call state and are shared between threads.
pub trait DialectConverter: Send + Sync {
    /// The source dialect this converter reads.
    fn dialect_type(&self) -> DialectType;

    fn quote_char(&self) -> char {
        self.dialect_type().quote_char()
    }

    fn supported_functions(&self) -> &'static [&'static str] {
        self.dialect_type().supported_functions()
    }

    /// Map a column type into `target`. Unknown types are returned unchanged.
    fn map_data_type(&self, source_type: &DataType, target: DialectType) -> DataType {
        datatypes::map_data_type(self.dialect_type(), target, source_type)
    }

    /// Whether this converter handles the pair at all.
    ///
    /// Total over the dialect set. Individual constructs that cannot be
    /// converted are reported as warnings by [`convert`](Self::convert).
    fn can_convert(&self, _kind: StatementKind, _target: DialectType) -> bool {
        true
    }

    /// Produce target text for a select statement.
    fn rewrite_select(
        &self,
        stmt: &ParsedStatement,
        select: &Select,
        ctx: &mut ConversionContext<'_>,
    ) -> String;

    /// Convert one statement. Never fails; problems become warnings.
    fn convert(
        &self,
        stmt: &ParsedStatement,
        target: DialectType,
        options: &ConversionOptions,
    ) -> ConversionResult {
        let pair = DialectPair::new(self.dialect_type(), target);
        if pair.is_identity() {
            return ConversionResult::unchanged(stmt.sql.clone());
        }

        let mut ctx = ConversionContext::new(pair, options);
        let sql = match &stmt.statement {
            Statement::Select(select) => self.rewrite_select(stmt, select, &mut ctx),
            Statement::CreateTable(table) => {
                ddl::synthesize(table, &mut ctx, |dt| self.map_data_type(dt, target))
            }
            Statement::Other => return ConversionResult::unchanged(stmt.sql.clone()),
        };
        ctx.finish(sql)
    }
}
