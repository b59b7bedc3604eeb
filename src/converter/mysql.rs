//! MySQL source converter.

use super::select::select_uses_operator;
use super::text_rules::rewrite_select_text;
use super::DialectConverter;
use crate::ast::{BinaryOp, ParsedStatement, Select};
use crate::context::ConversionContext;
use crate::dialect::DialectType;
use crate::types::{ConversionWarning, WarningKind};

/// Rewrites MySQL selects with the text rule pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlConverter;

impl DialectConverter for MysqlConverter {
    fn dialect_type(&self) -> DialectType {
        DialectType::Mysql
    }

    fn rewrite_select(
        &self,
        stmt: &ParsedStatement,
        select: &Select,
        ctx: &mut ConversionContext<'_>,
    ) -> String {
        let sql = rewrite_select_text(&stmt.sql, select, ctx);

        // `||` is OR under the default sql_mode; every other dialect concatenates.
        if select_uses_operator(select, BinaryOp::Concat) {
            ctx.warn(
                ConversionWarning::warning(
                    WarningKind::SyntaxDifference,
                    format!("|| means OR in MySQL but string concatenation in {}", ctx.pair.target),
                )
                .suggest("use OR, or CONCAT(a, b) if PIPES_AS_CONCAT was enabled"),
            );
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::{ConversionOptions, Severity};
    use pretty_assertions::assert_eq;

    fn convert(sql: &str, target: DialectType) -> crate::types::ConversionResult {
        let stmt = parse(sql).unwrap();
        MysqlConverter.convert(&stmt, target, &ConversionOptions::default())
    }

    #[test]
    fn test_to_postgres() {
        let result = convert("SELECT IFNULL(`a`, 0) FROM `t` LIMIT 5, 10", DialectType::Postgresql);
        assert_eq!(result.converted_sql, "SELECT COALESCE(\"a\", 0) FROM \"t\" LIMIT 10 OFFSET 5");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_group_concat_is_reported() {
        let result = convert("SELECT GROUP_CONCAT(name) FROM t", DialectType::Oracle);
        assert_eq!(result.converted_sql, "SELECT GROUP_CONCAT(name) FROM t");
        let error = result
            .warnings
            .iter()
            .find(|w| w.severity == Severity::Error)
            .unwrap();
        assert!(error.suggestion.as_deref().unwrap().contains("LISTAGG"));
    }

    #[test]
    fn test_now_with_precision_is_not_renamed() {
        let result = convert("SELECT NOW(3), NOW() FROM t", DialectType::Oracle);
        assert_eq!(result.converted_sql, "SELECT NOW(3), SYSDATE FROM t");
        let error = result
            .warnings
            .iter()
            .find(|w| w.severity == Severity::Error)
            .unwrap();
        assert_eq!(error.kind, crate::types::WarningKind::UnsupportedFunction);
        assert!(error.message.starts_with("NOW with arguments"));
        assert!(result.applied_rules.iter().any(|r| r.starts_with("NOW: manual conversion")));
        assert!(result.applied_rules.contains(&"NOW → SYSDATE".to_string()));
    }

    #[test]
    fn test_pipes_warning() {
        let result = convert("SELECT a || b FROM t", DialectType::Postgresql);
        assert!(result.warnings.iter().any(|w| w.message.contains("||")));
    }

    #[test]
    fn test_unmodelled_statement_passes_through() {
        let sql = "INSERT INTO t VALUES (IFNULL(a, 1))";
        let result = convert(sql, DialectType::Postgresql);
        assert_eq!(result.converted_sql, sql);
        assert!(result.applied_rules.is_empty());
    }
}
