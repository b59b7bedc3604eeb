//! PostgreSQL source converter.

use super::select::select_uses_operator;
use super::text_rules::rewrite_select_text;
use super::DialectConverter;
use crate::ast::{BinaryOp, ParsedStatement, Select};
use crate::context::ConversionContext;
use crate::dialect::DialectType;
use crate::types::{ConversionWarning, WarningKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresqlConverter;

impl PostgresqlConverter {
    fn ilike_advisory(select: &Select, ctx: &mut ConversionContext<'_>) {
        if !select_uses_operator(select, BinaryOp::ILike) {
            return;
        }
        let target = ctx.pair.target;
        let warning = if target == DialectType::Mysql {
            ConversionWarning::info(
                WarningKind::PartialSupport,
                "ILIKE rewritten to LIKE; case-insensitivity depends on the column collation",
            )
        } else {
            ConversionWarning::warning(
                WarningKind::SyntaxDifference,
                format!("ILIKE is not available in {}", target),
            )
            .suggest("UPPER(a) LIKE UPPER(b)")
        };
        ctx.warn(warning);
    }
}

impl DialectConverter for PostgresqlConverter {
    fn dialect_type(&self) -> DialectType {
        DialectType::Postgresql
    }

    fn rewrite_select(
        &self,
        stmt: &ParsedStatement,
        select: &Select,
        ctx: &mut ConversionContext<'_>,
    ) -> String {
        let sql = rewrite_select_text(&stmt.sql, select, ctx);
        Self::ilike_advisory(select, ctx);
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::{ConversionOptions, Severity};

    #[test]
    fn test_to_tibero_pagination() {
        let stmt = parse("SELECT a FROM t ORDER BY a LIMIT 10").unwrap();
        let result = PostgresqlConverter.convert(&stmt, DialectType::Tibero, &ConversionOptions::default());
        assert_eq!(result.converted_sql, "SELECT a FROM t ORDER BY a FETCH FIRST 10 ROWS ONLY");
        assert_eq!(result.applied_rules, vec!["LIMIT n → FETCH FIRST n ROWS ONLY".to_string()]);
    }

    #[test]
    fn test_ilike_to_oracle_is_warned() {
        let stmt = parse("SELECT a FROM t WHERE a ILIKE 'x%'").unwrap();
        let result = PostgresqlConverter.convert(&stmt, DialectType::Oracle, &ConversionOptions::default());
        assert!(result.converted_sql.contains("ILIKE"));
        assert_eq!(result.max_severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_offset_only_to_mysql() {
        let stmt = parse("SELECT a FROM t OFFSET 5").unwrap();
        let result = PostgresqlConverter.convert(&stmt, DialectType::Mysql, &ConversionOptions::default());
        assert!(result.warnings.iter().any(|w| w.message.contains("OFFSET without LIMIT")));
    }
}
