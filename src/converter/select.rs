//! Tree rewrite of select statements.
//!
//! Steps run in a fixed order; the function rewrite and the row-numbering
//! check assume pagination has already been normalized to the target idiom.

use tracing::debug;

use super::functions::{walk_select, ExprVisitor, FunctionRewriter};
use super::text_rules::swap_quotes;
use crate::ast::{BinaryOp, Expr, FunctionCall, Pagination, Select};
use crate::context::ConversionContext;
use crate::dialect::{DialectType, PaginationIdiom};
use crate::printer::ToSql;
use crate::types::{ConversionWarning, WarningKind};

/// Rewrite a select by mutating a copy of its tree, then print it.
pub(crate) fn rewrite_select(select: &Select, ctx: &mut ConversionContext<'_>) -> String {
    let mut select = select.clone();
    debug!(pair = %ctx.pair, "rewriting select tree");

    rewrite_pagination(&mut select, ctx);
    walk_select(&mut select, &mut FunctionRewriter::rewrite(ctx));
    requote_identifiers(&mut select, ctx);
    quoting_advisory(ctx);
    rownum_advisory(&mut select, ctx);
    partial_support_advisories(&select, ctx);

    select.to_sql()
}

/// Convert the pagination clause to the target idiom.
pub(crate) fn rewrite_pagination(select: &mut Select, ctx: &mut ConversionContext<'_>) {
    let source = ctx.pair.source;
    let target = ctx.pair.target;

    if source.pagination() == target.pagination() {
        ctx.unchanged("pagination syntax unchanged");
        return;
    }

    let page = &mut select.pagination;
    if page.fetch.is_none() && page.limit.is_none() {
        ctx.warn(
            ConversionWarning::warning(
                WarningKind::SyntaxDifference,
                format!(
                    "no FETCH FIRST clause; ROWNUM pagination in the WHERE clause is not rewritten for {}",
                    target
                ),
            )
            .suggest("rewrite manually as LIMIT n OFFSET m"),
        );
        if let Some(offset) = page.offset {
            lone_offset(page, offset, target, ctx);
        }
        return;
    }

    match target.pagination() {
        PaginationIdiom::Limit => {
            if let Some(n) = page.fetch.take() {
                page.limit = Some(n);
                ctx.rule(format!("FETCH FIRST {n} ROWS ONLY → LIMIT {n}"));
            }
        }
        PaginationIdiom::FetchFirst => {
            if let Some(n) = page.limit.take() {
                page.fetch = Some(n);
                ctx.rule(format!("LIMIT {n} → FETCH FIRST {n} ROWS ONLY"));
            }
        }
    }
    if let Some(offset) = page.offset {
        ctx.unchanged(format!("OFFSET {offset} kept"));
    }
}

/// An offset with no row count: fix its spelling for the target.
fn lone_offset(page: &mut Pagination, offset: u64, target: DialectType, ctx: &mut ConversionContext<'_>) {
    let rows = target.pagination() == PaginationIdiom::FetchFirst;
    if page.offset_rows != rows {
        page.offset_rows = rows;
        if rows {
            ctx.rule(format!("OFFSET {offset} → OFFSET {offset} ROWS"));
        } else {
            ctx.rule(format!("OFFSET {offset} ROWS → OFFSET {offset}"));
        }
    }
    if target == DialectType::Mysql {
        ctx.warn(offset_without_limit());
    }
}

pub(crate) fn offset_without_limit() -> ConversionWarning {
    ConversionWarning::warning(
        WarningKind::SyntaxDifference,
        "MySQL does not accept OFFSET without LIMIT",
    )
    .suggest("LIMIT 18446744073709551615 OFFSET m")
}

fn requote_expr<F: FnMut(&mut String)>(expr: &mut Expr, swap: &mut F) {
    match expr {
        Expr::Identifier(name) | Expr::Star(Some(name)) => swap(name),
        Expr::Function(call) => {
            for arg in &mut call.args {
                requote_expr(arg, swap);
            }
        }
        Expr::Binary(b) => {
            requote_expr(&mut b.left, swap);
            requote_expr(&mut b.right, swap);
        }
        Expr::Nested(inner) | Expr::Not(inner) | Expr::Negate(inner) => requote_expr(inner, swap),
        Expr::IsNull { expr, .. } => requote_expr(expr, swap),
        Expr::InList { expr, list, .. } => {
            requote_expr(expr, swap);
            for item in list {
                requote_expr(item, swap);
            }
        }
        _ => {}
    }
}

/// Quoted names are stored in double quotes; switch them to the target's quote.
pub(crate) fn requote_identifiers(select: &mut Select, ctx: &mut ConversionContext<'_>) {
    let to = ctx.pair.target.quote_char();
    if to == '"' {
        return;
    }

    let mut count = 0;
    let mut swap = |name: &mut String| {
        if name.contains('"') {
            let (out, n) = swap_quotes(name, '"', to);
            *name = out;
            count += n;
        }
    };

    for item in &mut select.items {
        requote_expr(&mut item.expr, &mut swap);
        if let Some(alias) = &mut item.alias {
            swap(alias);
        }
    }
    let tables = select.from.iter_mut().chain(select.joins.iter_mut().map(|j| &mut j.table));
    for table in tables {
        swap(&mut table.name);
        if let Some(alias) = &mut table.alias {
            swap(alias);
        }
    }
    let exprs = select
        .joins
        .iter_mut()
        .filter_map(|j| j.on.as_mut())
        .chain(select.filter.as_mut())
        .chain(select.group_by.iter_mut())
        .chain(select.having.as_mut())
        .chain(select.order_by.iter_mut().map(|o| &mut o.expr));
    for expr in exprs {
        requote_expr(expr, &mut swap);
    }

    if count > 0 {
        ctx.rule(format!("{count} quoted identifier(s) requoted"));
    }
}

/// Identifier quoting differs between the pair; names are requoted above.
pub(crate) fn quoting_advisory(ctx: &mut ConversionContext<'_>) {
    let source = ctx.pair.source;
    let target = ctx.pair.target;
    if source.quote_char() == target.quote_char() {
        return;
    }
    ctx.warn(ConversionWarning::info(
        WarningKind::SyntaxDifference,
        format!(
            "{} quotes identifiers with {} instead of {}; check names that relied on quoting",
            target,
            target.quote_char(),
            source.quote_char()
        ),
    ));
}

#[derive(Default)]
struct RownumScan {
    found: bool,
}

impl ExprVisitor for RownumScan {
    fn visit_call(&mut self, _call: &mut FunctionCall) {}

    fn visit_other(&mut self, expr: &Expr) {
        if let Expr::Identifier(name) = expr {
            self.found |= name.eq_ignore_ascii_case("ROWNUM");
        }
    }
}

/// Flag `ROWNUM` references for targets without the pseudo-column.
pub(crate) fn rownum_advisory(select: &mut Select, ctx: &mut ConversionContext<'_>) {
    let target = ctx.pair.target;
    if !ctx.pair.source.has_rownum() {
        return;
    }

    let mut scan = RownumScan::default();
    walk_select(select, &mut scan);
    if !scan.found {
        return;
    }

    if target.has_rownum() {
        ctx.unchanged("ROWNUM kept");
        return;
    }
    let suggestion = match target {
        DialectType::Mysql => "use LIMIT n, or ROW_NUMBER() OVER (ORDER BY ...) on MySQL 8",
        _ => "use LIMIT n, or ROW_NUMBER() OVER (ORDER BY ...)",
    };
    ctx.warn(
        ConversionWarning::warning(
            WarningKind::UnsupportedConstruct,
            format!("ROWNUM is not available in {}", target),
        )
        .suggest(suggestion),
    );
}

fn uses_operator(expr: &Expr, op: BinaryOp) -> bool {
    match expr {
        Expr::Binary(b) => b.op == op || uses_operator(&b.left, op) || uses_operator(&b.right, op),
        Expr::Function(call) => call.args.iter().any(|a| uses_operator(a, op)),
        Expr::Nested(inner) | Expr::Not(inner) | Expr::Negate(inner) => uses_operator(inner, op),
        _ => false,
    }
}

/// Whether any select item or the filter uses `op`.
pub(crate) fn select_uses_operator(select: &Select, op: BinaryOp) -> bool {
    select.items.iter().any(|i| uses_operator(&i.expr, op))
        || select.filter.as_ref().is_some_and(|f| uses_operator(f, op))
}

/// Constructs that convert but may behave differently in the target.
pub(crate) fn partial_support_advisories(select: &Select, ctx: &mut ConversionContext<'_>) {
    let source = ctx.pair.source;
    let target = ctx.pair.target;

    let from_dual = select
        .from
        .iter()
        .any(|t| t.name.eq_ignore_ascii_case("DUAL"));
    if from_dual && target == DialectType::Postgresql {
        ctx.warn(
            ConversionWarning::info(
                WarningKind::PartialSupport,
                "PostgreSQL has no DUAL table",
            )
            .suggest("drop the FROM DUAL clause"),
        );
    }

    if source.has_rownum()
        && target == DialectType::Mysql
        && select_uses_operator(select, BinaryOp::Concat)
    {
        ctx.warn(
            ConversionWarning::info(
                WarningKind::PartialSupport,
                "|| is logical OR in MySQL unless PIPES_AS_CONCAT is set",
            )
            .suggest("CONCAT(a, b)"),
        );
    }
}
