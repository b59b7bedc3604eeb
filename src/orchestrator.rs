//! Converter selection and the conversion entry points.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

use crate::ast::ParsedStatement;
use crate::converter::{
    DialectConverter, MysqlConverter, OracleConverter, PostgresqlConverter, TiberoConverter,
};
use crate::dialect::DialectType;
use crate::error::{ConvertError, ConvertResult};
use crate::parser;
use crate::types::{ConversionOptions, ConversionResult, ConversionWarning, WarningKind};

static GLOBAL: Lazy<Orchestrator> = Lazy::new(Orchestrator::new);

/// Picks the converter for a source dialect and runs it.
///
/// The dialect table is built once; afterwards the orchestrator is read-only
/// and can serve concurrent calls.
pub struct Orchestrator {
    converters: HashMap<DialectType, Box<dyn DialectConverter>>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        let mut converters: HashMap<DialectType, Box<dyn DialectConverter>> = HashMap::new();
        converters.insert(DialectType::Tibero, Box::new(TiberoConverter));
        converters.insert(DialectType::Mysql, Box::new(MysqlConverter));
        converters.insert(DialectType::Postgresql, Box::new(PostgresqlConverter));
        converters.insert(DialectType::Oracle, Box::new(OracleConverter));
        Self { converters }
    }

    /// Process-wide shared instance.
    pub fn global() -> &'static Orchestrator {
        &GLOBAL
    }

    pub fn converter(&self, source: DialectType) -> Option<&dyn DialectConverter> {
        self.converters.get(&source).map(|c| c.as_ref())
    }

    /// Convert a parsed statement. Always returns a result.
    pub fn convert(
        &self,
        stmt: &ParsedStatement,
        source: DialectType,
        target: DialectType,
        options: &ConversionOptions,
    ) -> ConversionResult {
        if source == target {
            return ConversionResult::unchanged(stmt.sql.clone());
        }
        let Some(converter) = self.converter(source) else {
            let mut result = ConversionResult::unchanged(stmt.sql.clone());
            result.warnings.push(ConversionWarning::error(
                WarningKind::UnsupportedConstruct,
                format!("no converter registered for {}", source),
            ));
            return result;
        };

        debug!(%source, %target, kind = ?stmt.kind(), "converter selected");
        converter.convert(stmt, target, options)
    }

    /// Parse and convert one statement.
    pub fn convert_sql(
        &self,
        sql: &str,
        source: DialectType,
        target: DialectType,
        options: &ConversionOptions,
    ) -> ConvertResult<ConversionResult> {
        let stmt = parser::parse(sql)?;
        Ok(self.convert(&stmt, source, target, options))
    }

    /// Split a script on `;` and convert each statement independently.
    pub fn convert_script(
        &self,
        script: &str,
        source: DialectType,
        target: DialectType,
        options: &ConversionOptions,
    ) -> ConvertResult<Vec<ConversionResult>> {
        let statements = parser::split_statements(script);
        if statements.is_empty() {
            return Err(ConvertError::EmptyInput);
        }
        statements
            .iter()
            .map(|sql| self.convert_sql(sql, source, target, options))
            .collect()
    }
}
