use super::select::rewrite_select;
use super::DialectConverter;
use crate::ast::{ParsedStatement, Select};
use crate::context::ConversionContext;
use crate::dialect::DialectType;

#[derive(Debug, Default, Clone, Copy)]
pub struct OracleConverter;

impl DialectConverter for OracleConverter {
    fn dialect_type(&self) -> DialectType {
        DialectType::Oracle
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
