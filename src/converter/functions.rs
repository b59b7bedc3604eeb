//! Built-in function mapping tables and the expression walk that applies them.

use once_cell::sync::Lazy;
use tracing::trace;

use crate::ast::{is_niladic_keyword, Expr, FunctionCall, Select};
use crate::context::ConversionContext;
use crate::dialect::{DialectPair, DialectType};
use crate::registry::RuleRegistry;
use crate::types::{ConversionWarning, WarningKind};

/// What happens to a source function in the target dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionAction {
    /// Same arity, same meaning, different name.
    Rename(&'static str),
    /// Renamed with a known narrowing of semantics.
    Approximate {
        target: &'static str,
        note: &'static str,
    },
    /// No single-function equivalent; left as-is and reported.
    Unsupported { suggestion: &'static str },
    /// Already available in the target under the same name.
    Native,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionMapping {
    /// Upper-case source name.
    pub source: &'static str,
    pub action: FunctionAction,
}

use FunctionAction::*;

const fn map(source: &'static str, action: FunctionAction) -> FunctionMapping {
    FunctionMapping { source, action }
}

const CASE_SUGGESTION: &str = "rewrite as CASE WHEN ... THEN ... ELSE ... END";

const ORACLE_TO_MYSQL: &[FunctionMapping] = &[
    map("SYSDATE", Rename("NOW")),
    map("SYSTIMESTAMP", Rename("NOW")),
    map("NVL", Approximate { target: "IFNULL", note: "IFNULL result type follows MySQL coercion rules" }),
    map("NVL2", Unsupported { suggestion: "CASE WHEN x IS NOT NULL THEN a ELSE b END" }),
    map("DECODE", Unsupported { suggestion: CASE_SUGGESTION }),
    map("TO_CHAR", Unsupported { suggestion: "DATE_FORMAT(date, format) with MySQL format specifiers" }),
    map("TO_DATE", Approximate { target: "STR_TO_DATE", note: "STR_TO_DATE uses MySQL format specifiers; check the format argument" }),
    map("TO_NUMBER", Unsupported { suggestion: "CAST(x AS DECIMAL(p,s))" }),
    map("LISTAGG", Unsupported { suggestion: "GROUP_CONCAT(expr ORDER BY ... SEPARATOR ',')" }),
    map("SUBSTR", Native),
    map("INSTR", Native),
];

const ORACLE_TO_POSTGRESQL: &[FunctionMapping] = &[
    map("SYSDATE", Rename("CURRENT_TIMESTAMP")),
    map("SYSTIMESTAMP", Rename("CURRENT_TIMESTAMP")),
    map("NVL", Approximate { target: "COALESCE", note: "COALESCE requires both arguments to share a type" }),
    map("NVL2", Unsupported { suggestion: "CASE WHEN x IS NOT NULL THEN a ELSE b END" }),
    map("DECODE", Unsupported { suggestion: CASE_SUGGESTION }),
    map("TO_CHAR", Native),
    map("TO_DATE", Native),
    map("TO_NUMBER", Native),
    map("SUBSTR", Native),
    map("INSTR", Approximate { target: "STRPOS", note: "STRPOS takes no start position or occurrence arguments" }),
    map("LISTAGG", Approximate { target: "STRING_AGG", note: "WITHIN GROUP ordering becomes ORDER BY inside STRING_AGG" }),
];

const MYSQL_TO_POSTGRESQL: &[FunctionMapping] = &[
    map("IFNULL", Rename("COALESCE")),
    map("RAND", Rename("RANDOM")),
    map("LCASE", Rename("LOWER")),
    map("UCASE", Rename("UPPER")),
    map("CHAR_LENGTH", Rename("LENGTH")),
    map("NOW", Native),
    map("IF", Unsupported { suggestion: CASE_SUGGESTION }),
    map("GROUP_CONCAT", Unsupported { suggestion: "STRING_AGG(expr, ',')" }),
    map("DATE_FORMAT", Unsupported { suggestion: "TO_CHAR(date, format) with PostgreSQL format patterns" }),
];

const MYSQL_TO_ORACLE: &[FunctionMapping] = &[
    map("IFNULL", Rename("NVL")),
    map("NOW", Approximate { target: "SYSDATE", note: "SYSDATE has no fractional seconds" }),
    map("LCASE", Rename("LOWER")),
    map("UCASE", Rename("UPPER")),
    map("SUBSTRING", Rename("SUBSTR")),
    map("CHAR_LENGTH", Rename("LENGTH")),
    map("IF", Unsupported { suggestion: CASE_SUGGESTION }),
    map("GROUP_CONCAT", Unsupported { suggestion: "LISTAGG(expr, ',') WITHIN GROUP (ORDER BY ...)" }),
    map("DATE_FORMAT", Unsupported { suggestion: "TO_CHAR(date, format) with Oracle format models" }),
    map("RAND", Unsupported { suggestion: "DBMS_RANDOM.VALUE" }),
];

const POSTGRESQL_TO_MYSQL: &[FunctionMapping] = &[
    map("RANDOM", Rename("RAND")),
    map("STRPOS", Approximate { target: "LOCATE", note: "LOCATE takes the needle first; swap the arguments" }),
    map("STRING_AGG", Unsupported { suggestion: "GROUP_CONCAT(expr SEPARATOR ',')" }),
    map("TO_CHAR", Unsupported { suggestion: "DATE_FORMAT(date, format) with MySQL format specifiers" }),
    map("DATE_TRUNC", Unsupported { suggestion: "DATE_FORMAT or DATE(x) depending on the unit" }),
    map("COALESCE", Native),
];

const POSTGRESQL_TO_ORACLE: &[FunctionMapping] = &[
    map("NOW", Approximate { target: "SYSDATE", note: "SYSDATE has no fractional seconds" }),
    map("STRING_AGG", Approximate { target: "LISTAGG", note: "LISTAGG needs WITHIN GROUP (ORDER BY ...)" }),
    map("SUBSTRING", Rename("SUBSTR")),
    map("STRPOS", Rename("INSTR")),
    map("RANDOM", Unsupported { suggestion: "DBMS_RANDOM.VALUE" }),
    map("DATE_TRUNC", Unsupported { suggestion: "TRUNC(date, 'unit')" }),
    map("TO_CHAR", Native),
];

static FUNCTION_MAPPINGS: Lazy<RuleRegistry<FunctionMapping>> = Lazy::new(|| {
    use DialectType::*;
    let mut reg = RuleRegistry::new();
    for family in [Tibero, Oracle] {
        reg.register_all(DialectPair::new(family, Mysql), ORACLE_TO_MYSQL.iter().cloned());
        reg.register_all(DialectPair::new(family, Postgresql), ORACLE_TO_POSTGRESQL.iter().cloned());
        reg.register_all(DialectPair::new(Mysql, family), MYSQL_TO_ORACLE.iter().cloned());
        reg.register_all(DialectPair::new(Postgresql, family), POSTGRESQL_TO_ORACLE.iter().cloned());
    }
    reg.register_all(DialectPair::new(Mysql, Postgresql), MYSQL_TO_POSTGRESQL.iter().cloned());
    reg.register_all(DialectPair::new(Postgresql, Mysql), POSTGRESQL_TO_MYSQL.iter().cloned());
    reg
});

pub fn function_registry() -> &'static RuleRegistry<FunctionMapping> {
    &FUNCTION_MAPPINGS
}

/// Look up a function by name, case-insensitively.
pub fn lookup(pair: DialectPair, name: &str) -> Option<&'static FunctionMapping> {
    let upper = name.to_ascii_uppercase();
    FUNCTION_MAPPINGS.find(pair, |m| m.source == upper)
}

/// Callback for the expression walk.
pub(crate) trait ExprVisitor {
    fn visit_call(&mut self, call: &mut FunctionCall);

    /// Nodes the walk does not descend into.
    fn visit_other(&mut self, _expr: &Expr) {}
}

/// Pre-order walk over function calls and binary expressions.
///
/// Only `Function` and `Binary` nodes are descended. Every other node kind,
/// including `Nested`, `Not` and `InList`, is handed to `visit_other` and its
/// children are not visited.
pub(crate) fn walk_expr<V: ExprVisitor>(expr: &mut Expr, visitor: &mut V) {
    match expr {
        Expr::Function(call) => {
            visitor.visit_call(call);
            for arg in &mut call.args {
                walk_expr(arg, visitor);
            }
        }
        Expr::Binary(binary) => {
            walk_expr(&mut binary.left, visitor);
            walk_expr(&mut binary.right, visitor);
        }
        other => visitor.visit_other(other),
    }
}

/// Walk the select-item list and the filter predicate.
pub(crate) fn walk_select<V: ExprVisitor>(select: &mut Select, visitor: &mut V) {
    for item in &mut select.items {
        walk_expr(&mut item.expr, visitor);
    }
    if let Some(filter) = &mut select.filter {
        walk_expr(filter, visitor);
    }
}

/// Applies the pair's function table to each call.
///
/// With `rename` off the tree is only inspected: renames are left to the
/// text rules and only the warnings and non-rename rule entries are recorded.
pub(crate) struct FunctionRewriter<'c, 'a> {
    ctx: &'c mut ConversionContext<'a>,
    rename: bool,
}

impl<'c, 'a> FunctionRewriter<'c, 'a> {
    pub fn rewrite(ctx: &'c mut ConversionContext<'a>) -> Self {
        Self { ctx, rename: true }
    }

    pub fn inspect(ctx: &'c mut ConversionContext<'a>) -> Self {
        Self { ctx, rename: false }
    }
}

impl ExprVisitor for FunctionRewriter<'_, '_> {
    fn visit_call(&mut self, call: &mut FunctionCall) {
        let source = call.name.to_ascii_uppercase();
        let target = self.ctx.pair.target;
        let Some(mapping) = lookup(self.ctx.pair, &source) else {
            trace!(function = %source, "not in mapping table, passed through");
            return;
        };

        if let Rename(to) | Approximate { target: to, .. } = &mapping.action {
            if is_niladic_keyword(to) && !call.args.is_empty() {
                self.ctx.warn(
                    ConversionWarning::error(
                        WarningKind::UnsupportedFunction,
                        format!("{} with arguments has no {} equivalent; {} takes none", source, target, to),
                    )
                    .suggest(format!("drop the arguments and use {}", to)),
                );
                self.ctx
                    .rule(format!("{}: manual conversion required for {}", source, target));
                return;
            }
        }

        match &mapping.action {
            Rename(to) => {
                if self.rename {
                    call.rename(to);
                    self.ctx.rule(format!("{} → {}", source, to));
                }
            }
            Approximate { target: to, note } => {
                if self.rename {
                    call.rename(to);
                    self.ctx.rule(format!("{} → {} (approximate)", source, to));
                }
                self.ctx.warn(ConversionWarning::info(
                    WarningKind::PartialSupport,
                    format!("{} mapped to {}: {}", source, to, note),
                ));
            }
            Unsupported { suggestion } => {
                self.ctx.warn(
                    ConversionWarning::error(
                        WarningKind::UnsupportedFunction,
                        format!("{} has no direct {} equivalent", source, target),
                    )
                    .suggest(*suggestion),
                );
                self.ctx
                    .rule(format!("{}: manual conversion required for {}", source, target));
            }
            Native => {
                self.ctx.unchanged(format!("{} is native in {}", source, target));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConversionOptions, Severity};

    fn pair(source: DialectType, target: DialectType) -> DialectPair {
        DialectPair::new(source, target)
    }

    #[test]
    fn test_registry_builds() {
        assert!(!function_registry().is_empty());
        assert_eq!(function_registry().pairs().count(), 10);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let m = lookup(pair(DialectType::Tibero, DialectType::Mysql), "sysdate").unwrap();
        assert_eq!(m.action, Rename("NOW"));
    }

    #[test]
    fn test_oracle_family_pairs_have_no_table() {
        assert!(lookup(pair(DialectType::Tibero, DialectType::Oracle), "NVL").is_none());
        assert!(lookup(pair(DialectType::Oracle, DialectType::Tibero), "DECODE").is_none());
    }

    #[test]
    fn test_every_rename_target_is_native_in_target() {
        for source in DialectType::ALL {
            for target in DialectType::ALL {
                for m in function_registry().rules(pair(source, target)) {
                    let to = match m.action {
                        Rename(to) | Approximate { target: to, .. } => to,
                        _ => continue,
                    };
                    assert!(target.supports_function(to), "{} → {} in {}", m.source, to, target);
                }
            }
        }
    }

    #[test]
    fn test_rewriter_renames_nested_calls() {
        let opts = ConversionOptions::default();
        let mut ctx = ConversionContext::new(pair(DialectType::Tibero, DialectType::Postgresql), &opts);
        let mut expr = Expr::Function(FunctionCall::new(
            "NVL",
            vec![
                Expr::Function(FunctionCall::new("LISTAGG", vec![Expr::ident("a")])),
                Expr::String("none".into()),
            ],
        ));
        walk_expr(&mut expr, &mut FunctionRewriter::rewrite(&mut ctx));
        match &expr {
            Expr::Function(outer) => {
                assert_eq!(outer.name, "COALESCE");
                assert!(matches!(&outer.args[0], Expr::Function(inner) if inner.name == "STRING_AGG"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(ctx.applied_rules().len(), 2);
    }

    #[test]
    fn test_unsupported_is_left_and_reported() {
        let opts = ConversionOptions::default();
        let mut ctx = ConversionContext::new(pair(DialectType::Tibero, DialectType::Mysql), &opts);
        let mut expr = Expr::Function(FunctionCall::new("decode", vec![Expr::ident("x")]));
        walk_expr(&mut expr, &mut FunctionRewriter::rewrite(&mut ctx));
        assert!(matches!(&expr, Expr::Function(c) if c.name == "decode"));
        assert_eq!(ctx.warnings()[0].severity, Severity::Error);
        assert_eq!(ctx.warnings()[0].kind, WarningKind::UnsupportedFunction);
        assert!(ctx.warnings()[0].suggestion.is_some());
    }

    #[test]
    fn test_other_nodes_are_not_descended() {
        let opts = ConversionOptions::default();
        let mut ctx = ConversionContext::new(pair(DialectType::Tibero, DialectType::Mysql), &opts);
        let mut expr = Expr::Nested(Box::new(Expr::Function(FunctionCall::new("NVL", vec![]))));
        walk_expr(&mut expr, &mut FunctionRewriter::rewrite(&mut ctx));
        assert!(ctx.applied_rules().is_empty());
    }

    #[test]
    fn test_inspect_mode_does_not_rename() {
        let opts = ConversionOptions::default();
        let mut ctx = ConversionContext::new(pair(DialectType::Mysql, DialectType::Postgresql), &opts);
        let mut expr = Expr::Function(FunctionCall::new("IFNULL", vec![]));
        walk_expr(&mut expr, &mut FunctionRewriter::inspect(&mut ctx));
        assert!(matches!(&expr, Expr::Function(c) if c.name == "IFNULL"));
        assert!(ctx.applied_rules().is_empty());
    }
}
