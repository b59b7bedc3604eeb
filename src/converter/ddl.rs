//! `CREATE TABLE` synthesis.
//!
//! Target DDL is built from the parsed column and index lists rather than by
//! editing the source text, so every identifier gets the target's quotes.

use crate::ast::{ColumnDef, CreateTable, DataType};
use crate::context::ConversionContext;
use crate::types::{ConversionWarning, WarningKind};

/// Constraint tokens split into those reproduced and those discarded.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Constraints {
    pub kept: Vec<String>,
    pub discarded: Vec<String>,
}

/// Fold a column's specification tokens.
///
/// `NOT` followed by `NULL` becomes `NOT NULL`, a lone `NULL` is dropped,
/// `DEFAULT ...` is kept verbatim. Inline `PRIMARY KEY` is dropped here since
/// the parser already recorded it as an index. Everything else is discarded.
pub fn extract_constraints(specs: &[String]) -> Constraints {
    let mut out = Constraints::default();
    let mut i = 0;
    while i < specs.len() {
        let token = &specs[i];
        let upper = token.to_ascii_uppercase();
        let next = specs.get(i + 1).map(|n| n.to_ascii_uppercase());

        if upper == "NOT" && next.as_deref() == Some("NULL") {
            out.kept.push("NOT NULL".to_string());
            i += 2;
        } else if upper == "PRIMARY" && next.as_deref() == Some("KEY") {
            i += 2;
        } else if upper == "NULL" {
            i += 1;
        } else if upper.starts_with("DEFAULT") {
            out.kept.push(token.clone());
            i += 1;
        } else {
            out.discarded.push(token.clone());
            i += 1;
        }
    }
    out
}

fn column_line<F>(column: &ColumnDef, indent: &str, map_type: &F, ctx: &mut ConversionContext<'_>) -> String
where
    F: Fn(&DataType) -> DataType,
{
    let target = ctx.pair.target;
    let mapped = map_type(&column.data_type);
    if mapped != column.data_type {
        ctx.rule(format!("{}: {} → {}", column.name, column.data_type, mapped));
    }

    if let Some(scale) = column.data_type.scale {
        if mapped.precision.is_none() || mapped.scale.is_none() {
            ctx.warn(ConversionWarning::info(
                WarningKind::PartialSupport,
                format!(
                    "column {}: scale {} of {} not reproduced in {}",
                    column.name, scale, column.data_type, mapped
                ),
            ));
        }
    }

    let constraints = extract_constraints(&column.specs);
    if !constraints.discarded.is_empty() {
        ctx.warn(ConversionWarning::info(
            WarningKind::UnsupportedConstruct,
            format!(
                "column {}: '{}' not reproduced",
                column.name,
                constraints.discarded.join(" ")
            ),
        ));
    }

    let mut line = format!("{}{} {}", indent, target.quote_identifier(&column.name), mapped);
    for constraint in &constraints.kept {
        line.push(' ');
        line.push_str(constraint);
    }
    line
}

/// Build target DDL for a table.
pub(crate) fn synthesize<F>(table: &CreateTable, ctx: &mut ConversionContext<'_>, map_type: F) -> String
where
    F: Fn(&DataType) -> DataType,
{
    let target = ctx.pair.target;
    let indent = " ".repeat(ctx.options.ddl_indent);

    let mut defs: Vec<String> = Vec::new();
    for column in &table.columns {
        defs.push(column_line(column, &indent, &map_type, ctx));
    }

    if let Some(pk) = table.indexes.iter().find(|idx| idx.is_primary_key()) {
        let cols: Vec<String> = pk
            .columns
            .iter()
            .map(|c| target.quote_identifier(c))
            .collect();
        defs.push(format!("{}PRIMARY KEY ({})", indent, cols.join(", ")));
    }

    for index in table.indexes.iter().filter(|idx| !idx.is_primary_key()) {
        let label = match &index.name {
            Some(name) => format!("{} {}", index.kind, name),
            None => format!("{} ({})", index.kind, index.columns.join(", ")),
        };
        ctx.warn(ConversionWarning::info(
            WarningKind::UnsupportedConstruct,
            format!("{} on {} not reproduced", label, table.name),
        ));
    }

    if !table.options.is_empty() {
        ctx.warn(ConversionWarning::info(
            WarningKind::UnsupportedConstruct,
            format!("table options '{}' dropped", table.options.join(" ")),
        ));
    }

    ctx.rule(format!("CREATE TABLE synthesized for {}", target));

    format!(
        "CREATE TABLE {} (\n{}\n)",
        target.quote_identifier(&table.name),
        defs.join(",\n")
    )
}
