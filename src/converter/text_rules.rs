//! Text rule pipelines for MySQL and PostgreSQL sources.
//!
//! Each pair's pipeline runs, in order: function renames generated from the
//! function table, pagination rewrites, identifier requoting, and any
//! pair-specific operator substitutions. The tree is consulted only for
//! warnings; the output is the source text with the rules applied.

use once_cell::sync::Lazy;
use regex::Captures;
use tracing::debug;

use super::functions::{function_registry, walk_select, FunctionAction, FunctionRewriter};
use super::select::{offset_without_limit, partial_support_advisories};
use crate::ast::{is_niladic_keyword, Select};
use crate::context::ConversionContext;
use crate::dialect::{DialectPair, DialectType, PaginationIdiom};
use crate::registry::{RuleRegistry, TextRule};

fn limit_comma_to_limit_offset(caps: &Captures<'_>) -> String {
    format!("LIMIT {} OFFSET {}", &caps[2], &caps[1])
}

fn limit_comma_to_fetch(caps: &Captures<'_>) -> String {
    format!("OFFSET {} ROWS FETCH FIRST {} ROWS ONLY", &caps[1], &caps[2])
}

fn limit_offset_to_fetch(caps: &Captures<'_>) -> String {
    format!("OFFSET {} ROWS FETCH FIRST {} ROWS ONLY", &caps[2], &caps[1])
}

fn limit_to_fetch(caps: &Captures<'_>) -> String {
    format!("FETCH FIRST {} ROWS ONLY", &caps[1])
}

fn fetch_to_limit(caps: &Captures<'_>) -> String {
    match caps.get(1) {
        Some(offset) => format!("LIMIT {} OFFSET {}", &caps[2], offset.as_str()),
        None => format!("LIMIT {}", &caps[2]),
    }
}

/// Swap identifier quotes outside string literals.
fn requote(input: &str, from: char, to: char, log: &mut Vec<String>) -> String {
    let (out, count) = swap_quotes(input, from, to);
    if count > 0 {
        log.push(format!("{count} quoted identifier(s) requoted"));
    }
    out
}

/// Re-quote every `from`-quoted identifier with `to`, returning the count.
pub(crate) fn swap_quotes(input: &str, from: char, to: char) -> (String, usize) {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut count = 0usize;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\'' {
                in_string = false;
            }
            continue;
        }
        if c == '\'' {
            in_string = true;
            out.push(c);
            continue;
        }
        if c != from {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            if c == from {
                if chars.peek() == Some(&from) {
                    chars.next();
                    name.push(from);
                    continue;
                }
                closed = true;
                break;
            }
            name.push(c);
        }
        if !closed {
            out.push(from);
            out.push_str(&name);
            break;
        }
        out.push(to);
        out.push_str(&name.replace(to, &format!("{to}{to}")));
        out.push(to);
        count += 1;
    }
    (out, count)
}

fn backticks_to_double_quotes(input: &str, log: &mut Vec<String>) -> String {
    requote(input, '`', '"', log)
}

fn double_quotes_to_backticks(input: &str, log: &mut Vec<String>) -> String {
    requote(input, '"', '`', log)
}

/// Rename rules generated from the function table.
fn function_rename_rules(pair: DialectPair) -> Result<Vec<TextRule>, regex::Error> {
    let mut rules = Vec::new();
    for mapping in function_registry().rules(pair) {
        let to = match mapping.action {
            FunctionAction::Rename(to) | FunctionAction::Approximate { target: to, .. } => to,
            FunctionAction::Unsupported { .. } | FunctionAction::Native => continue,
        };
        let from = regex::escape(mapping.source);
        let label = format!("{} → {}", mapping.source, to);
        let rule = if is_niladic_keyword(to) {
            TextRule::replace(label, &format!(r"(?i)\b{from}\s*\(\s*\)"), to)?
        } else {
            TextRule::replace(label, &format!(r"(?i)\b{from}\s*\("), format!("{to}("))?
        };
        rules.push(rule);
    }
    Ok(rules)
}

fn pagination_rules(pair: DialectPair) -> Result<Vec<TextRule>, regex::Error> {
    let source = pair.source;
    let target = pair.target;
    let mut rules = Vec::new();

    if source == DialectType::Mysql {
        let comma = r"(?i)\bLIMIT\s+(\d+)\s*,\s*(\d+)";
        rules.push(match target.pagination() {
            PaginationIdiom::Limit => {
                TextRule::dynamic("LIMIT m, n → LIMIT n OFFSET m", comma, limit_comma_to_limit_offset)?
            }
            PaginationIdiom::FetchFirst => TextRule::dynamic(
                "LIMIT m, n → OFFSET m ROWS FETCH FIRST n ROWS ONLY",
                comma,
                limit_comma_to_fetch,
            )?,
        });
    }

    match (source.pagination(), target.pagination()) {
        (PaginationIdiom::Limit, PaginationIdiom::FetchFirst) => {
            rules.push(TextRule::dynamic(
                "LIMIT n OFFSET m → OFFSET m ROWS FETCH FIRST n ROWS ONLY",
                r"(?i)\bLIMIT\s+(\d+)\s+OFFSET\s+(\d+)",
                limit_offset_to_fetch,
            )?);
            rules.push(TextRule::dynamic(
                "LIMIT n → FETCH FIRST n ROWS ONLY",
                r"(?i)\bLIMIT\s+(\d+)",
                limit_to_fetch,
            )?);
        }
        (_, PaginationIdiom::Limit) if target == DialectType::Mysql => {
            rules.push(TextRule::dynamic(
                "FETCH FIRST n ROWS ONLY → LIMIT n",
                r"(?i)(?:\bOFFSET\s+(\d+)\s+ROWS?\s+)?\bFETCH\s+(?:FIRST|NEXT)\s+(\d+)\s+ROWS?\s+ONLY",
                fetch_to_limit,
            )?);
        }
        _ => {}
    }
    Ok(rules)
}

fn build_registry() -> Result<RuleRegistry<TextRule>, regex::Error> {
    let mut reg = RuleRegistry::new();
    for source in [DialectType::Mysql, DialectType::Postgresql] {
        for target in DialectType::ALL {
            let pair = DialectPair::new(source, target);
            if pair.is_identity() {
                continue;
            }
            reg.register_all(pair, function_rename_rules(pair)?);
            reg.register_all(pair, pagination_rules(pair)?);

            match (source.quote_char(), target.quote_char()) {
                ('`', '"') => {
                    reg.register(pair, TextRule::transform("`identifier` → \"identifier\"", backticks_to_double_quotes));
                }
                ('"', '`') => {
                    reg.register(pair, TextRule::transform("\"identifier\" → `identifier`", double_quotes_to_backticks));
                }
                _ => {}
            }
        }
    }
    reg.register(
        DialectPair::new(DialectType::Postgresql, DialectType::Mysql),
        TextRule::replace("ILIKE → LIKE", r"(?i)\bILIKE\b", "LIKE")?,
    );
    Ok(reg)
}

static TEXT_RULES: Lazy<RuleRegistry<TextRule>> =
    Lazy::new(|| build_registry().expect("built-in text rule patterns must compile"));

pub fn text_registry() -> &'static RuleRegistry<TextRule> {
    &TEXT_RULES
}

/// Rewrite a select through the pair's text pipeline.
pub(crate) fn rewrite_select_text(sql: &str, select: &Select, ctx: &mut ConversionContext<'_>) -> String {
    debug!(pair = %ctx.pair, rules = TEXT_RULES.rules(ctx.pair).len(), "running text rules");
    let converted = TEXT_RULES.apply(ctx.pair, sql, ctx.audit_log());

    let mut scratch = select.clone();
    walk_select(&mut scratch, &mut FunctionRewriter::inspect(ctx));

    let page = &select.pagination;
    if ctx.pair.target == DialectType::Mysql
        && page.offset.is_some()
        && page.limit.is_none()
        && page.fetch.is_none()
    {
        ctx.warn(offset_without_limit());
    }

    partial_support_advisories(select, ctx);
    converted
}
