//! Tibero source converter.

use super::select::rewrite_select;
use super::DialectConverter;
use crate::ast::{ParsedStatement, Select};
use crate::context::ConversionContext;
use crate::dialect::DialectType;

/// Tibero is Oracle-compatible; selects go through the tree rewrite.
#[derive(Debug, Default, Clone, Copy)]
pub struct TiberoConverter;

impl DialectConverter for TiberoConverter {
    fn dialect_type(&self) -> DialectType {
        DialectType::Tibero
    }

    fn rewrite_select(
        &self,
        _stmt: &ParsedStatement,
        select: &Select,
        ctx: &mut ConversionContext<'_>,
    ) -> String {
        rewrite_select(select, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::{ConversionOptions, Severity, WarningKind};

    #[test]
    fn test_decode_left_in_place_for_mysql() {
        let stmt = parse("SELECT DECODE(x, 1, 'a', 'b') FROM t").unwrap();
        let result = TiberoConverter.convert(&stmt, DialectType::Mysql, &ConversionOptions::default());
        assert!(result.converted_sql.contains("DECODE("));
        assert!(result.warnings.iter().any(|w| {
            w.severity == Severity::Error && w.kind == WarningKind::UnsupportedFunction
        }));
    }

    #[test]
    fn test_identity() {
        let sql = "select  nvl(a,0)  from t";
        let stmt = parse(sql).unwrap();
        let result = TiberoConverter.convert(&stmt, DialectType::Tibero, &ConversionOptions::default());
        assert_eq!(result.converted_sql, sql);
        assert!(result.warnings.is_empty());
        assert!(result.applied_rules.is_empty());
    }

    #[test]
    fn test_can_convert_is_total() {
        for target in DialectType::ALL {
            assert!(TiberoConverter.can_convert(crate::ast::StatementKind::Other, target));
        }
    }
}
