//! SQL parser using nom.
//!
//! Parses the subset of SQL the converters model into a [`Statement`] tree:
//!
//! ```text
//! SELECT [DISTINCT] items [FROM refs [joins]] [WHERE e] [GROUP BY ..] [HAVING e]
//!        [ORDER BY ..] [LIMIT n [OFFSET m] | LIMIT m, n]
//!        [OFFSET m ROWS] [FETCH FIRST|NEXT n ROWS ONLY]
//!
//! CREATE TABLE name ( column type[(p[,s])] specs..., [CONSTRAINT c] PRIMARY KEY (..), ... ) options
//! ```
//!
//! Anything outside the subset, including a select the grammar cannot fully
//! consume, becomes [`Statement::Other`] and is later passed through verbatim.
//! Quoted identifiers in a select are kept, re-wrapped in double quotes;
//! `CREATE TABLE` names lose their quotes since synthesis re-quotes them.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace1, not_line_ending, satisfy},
    combinator::{eof, map, map_res, not, opt, recognize, value, verify},
    error::{Error as NomError, ErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use tracing::trace;

use crate::ast::*;
use crate::error::{ConvertError, ConvertResult};

type Res<'a, T> = IResult<&'a str, T>;

/// Words that can never be a bare identifier or alias.
const RESERVED: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CROSS", "DESC", "DISTINCT", "ELSE",
    "END", "EXCEPT", "EXISTS", "FETCH", "FROM", "FULL", "GROUP", "HAVING", "ILIKE", "IN",
    "INNER", "INTERSECT", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "MINUS", "NOT", "NULL",
    "OFFSET", "ON", "OR", "ORDER", "OUTER", "RIGHT", "SELECT", "THEN", "UNION", "WHEN",
    "WHERE", "WITH",
];

/// Second words of multi-word type names.
const TYPE_SUFFIXES: &[&str] = &["PRECISION", "VARYING", "RAW"];

/// Parse one SQL statement.
///
/// Fails only when there is no statement at all; unmodelled SQL is returned
/// as [`Statement::Other`].
pub fn parse(sql: &str) -> ConvertResult<ParsedStatement> {
    let trimmed = sql.trim().trim_end_matches(';').trim();
    if trimmed.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let statement = if let Ok((_, select)) = select_statement(trimmed) {
        Statement::Select(Box::new(select))
    } else if let Some(table) = create_table(trimmed) {
        Statement::CreateTable(table)
    } else {
        trace!("statement not modelled, keeping source text");
        Statement::Other
    };

    Ok(ParsedStatement {
        sql: sql.to_string(),
        statement,
    })
}

/// Parse a `TYPE[(p[,s])]` string such as `NUMBER(10,2)`.
pub fn parse_data_type(input: &str) -> ConvertResult<DataType> {
    let trimmed = input.trim();
    match terminated(data_type, preceded(sp, eof))(trimmed) {
        Ok((_, dt)) => Ok(dt),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ConvertError::parse(
            trimmed.len() - e.input.len(),
            format!("Invalid data type: '{}'", trimmed),
        )),
        Err(nom::Err::Incomplete(_)) => Err(ConvertError::parse(
            trimmed.len(),
            "Incomplete data type".to_string(),
        )),
    }
}

/// Split a script into statements on `;`, ignoring semicolons inside quotes
/// and comments. Empty statements are dropped.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                current.push(' ');
            }
            ';' => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }

    let stmt = current.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
    statements
}

// ---------------------------------------------------------------------------
// Lexical helpers
// ---------------------------------------------------------------------------

fn fail(input: &str, kind: ErrorKind) -> nom::Err<NomError<&str>> {
    nom::Err::Error(NomError::new(input, kind))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '#'
}

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(word))
}

fn comment(input: &str) -> Res<'_, &str> {
    alt((
        recognize(pair(tag("--"), not_line_ending)),
        recognize(tuple((tag("/*"), take_until("*/"), tag("*/")))),
    ))(input)
}

/// Skip whitespace and comments.
fn sp(input: &str) -> Res<'_, ()> {
    value((), many0(alt((multispace1, comment))))(input)
}

/// A case-insensitive keyword on a word boundary.
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    move |input: &'a str| {
        let (input, _) = sp(input)?;
        let (rest, word) = tag_no_case(kw)(input)?;
        let (rest, _) = not(satisfy(is_ident_char))(rest)?;
        Ok((rest, word))
    }
}

/// A punctuation symbol, after optional whitespace.
fn sym<'a>(s: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    move |input: &'a str| {
        let (input, _) = sp(input)?;
        tag(s)(input)
    }
}

fn bare_word(input: &str) -> Res<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)
}

/// Quoted text with the quote character doubled as escape.
fn quoted<'a>(q: char) -> impl Fn(&'a str) -> Res<'a, String> {
    move |input: &'a str| {
        let (mut rest, _) = char(q)(input)?;
        let mut out = String::new();
        loop {
            let Some(idx) = rest.find(q) else {
                return Err(fail(rest, ErrorKind::Char));
            };
            out.push_str(&rest[..idx]);
            let after = &rest[idx + q.len_utf8()..];
            match after.strip_prefix(q) {
                Some(stripped) => {
                    out.push(q);
                    rest = stripped;
                }
                None => return Ok((after, out)),
            }
        }
    }
}

/// One identifier part, without leading whitespace.
fn ident_part(input: &str) -> Res<'_, String> {
    alt((
        quoted('"'),
        quoted('`'),
        map(verify(bare_word, |w: &str| !is_reserved(w)), String::from),
    ))(input)
}

/// Like [`ident_part`], but a quoted name keeps canonical double quotes.
fn select_ident_part(input: &str) -> Res<'_, String> {
    let requoted = |name: String| format!("\"{}\"", name.replace('"', "\"\""));
    alt((
        map(quoted('"'), requoted),
        map(quoted('`'), requoted),
        map(verify(bare_word, |w: &str| !is_reserved(w)), String::from),
    ))(input)
}

fn identifier(input: &str) -> Res<'_, String> {
    preceded(sp, ident_part)(input)
}

fn dotted<'a>(input: &'a str, part: fn(&'a str) -> Res<'a, String>) -> Res<'a, Vec<String>> {
    let (mut input, first) = preceded(sp, part)(input)?;
    let mut parts = vec![first];
    while let Ok((rest, next)) = preceded(char('.'), part)(input) {
        parts.push(next);
        input = rest;
    }
    Ok((input, parts))
}

/// Dotted name: `schema.table`, `t.col`.
fn path(input: &str) -> Res<'_, Vec<String>> {
    dotted(input, ident_part)
}

fn select_path(input: &str) -> Res<'_, Vec<String>> {
    dotted(input, select_ident_part)
}

fn unsigned(input: &str) -> Res<'_, u64> {
    preceded(sp, map_res(digit1, |s: &str| s.parse::<u64>()))(input)
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

fn expr(input: &str) -> Res<'_, Expr> {
    or_expr(input)
}

fn or_expr(input: &str) -> Res<'_, Expr> {
    let (mut input, mut left) = and_expr(input)?;
    while let Ok((rest, _)) = keyword("OR")(input) {
        let (rest, right) = and_expr(rest)?;
        left = Expr::binary(left, BinaryOp::Or, right);
        input = rest;
    }
    Ok((input, left))
}

fn and_expr(input: &str) -> Res<'_, Expr> {
    let (mut input, mut left) = not_expr(input)?;
    while let Ok((rest, _)) = keyword("AND")(input) {
        let (rest, right) = not_expr(rest)?;
        left = Expr::binary(left, BinaryOp::And, right);
        input = rest;
    }
    Ok((input, left))
}

fn not_expr(input: &str) -> Res<'_, Expr> {
    if let Ok((rest, _)) = keyword("NOT")(input) {
        let (rest, inner) = not_expr(rest)?;
        return Ok((rest, Expr::Not(Box::new(inner))));
    }
    comparison(input)
}

fn comparison_op(input: &str) -> Res<'_, BinaryOp> {
    preceded(
        sp,
        alt((
            value(BinaryOp::NotEq, tag("<>")),
            value(BinaryOp::NotEq, tag("!=")),
            value(BinaryOp::LtEq, tag("<=")),
            value(BinaryOp::GtEq, tag(">=")),
            value(BinaryOp::Eq, tag("=")),
            value(BinaryOp::Lt, tag("<")),
            value(BinaryOp::Gt, tag(">")),
        )),
    )(input)
}

fn comparison(input: &str) -> Res<'_, Expr> {
    let (input, left) = additive(input)?;

    if let Ok((rest, _)) = keyword("IS")(input) {
        let (rest, negated) = opt(keyword("NOT"))(rest)?;
        let (rest, _) = keyword("NULL")(rest)?;
        return Ok((
            rest,
            Expr::IsNull {
                expr: Box::new(left),
                negated: negated.is_some(),
            },
        ));
    }

    let (after_not, negated) = match keyword("NOT")(input) {
        Ok((rest, _)) => (rest, true),
        Err(_) => (input, false),
    };

    if let Ok((rest, _)) = keyword("IN")(after_not) {
        let (rest, list) = delimited(sym("("), separated_list1(sym(","), expr), sym(")"))(rest)?;
        return Ok((
            rest,
            Expr::InList {
                expr: Box::new(left),
                list,
                negated,
            },
        ));
    }

    if let Ok((rest, _)) = keyword("LIKE")(after_not) {
        let (rest, right) = additive(rest)?;
        let op = if negated { BinaryOp::NotLike } else { BinaryOp::Like };
        return Ok((rest, Expr::binary(left, op, right)));
    }

    if negated {
        return Err(fail(input, ErrorKind::Tag));
    }

    if let Ok((rest, _)) = keyword("ILIKE")(input) {
        let (rest, right) = additive(rest)?;
        return Ok((rest, Expr::binary(left, BinaryOp::ILike, right)));
    }

    if let Ok((rest, op)) = comparison_op(input) {
        let (rest, right) = additive(rest)?;
        return Ok((rest, Expr::binary(left, op, right)));
    }

    Ok((input, left))
}

fn additive_op(input: &str) -> Res<'_, BinaryOp> {
    preceded(
        sp,
        alt((
            value(BinaryOp::Concat, tag("||")),
            value(BinaryOp::Plus, tag("+")),
            value(BinaryOp::Minus, tag("-")),
        )),
    )(input)
}

fn additive(input: &str) -> Res<'_, Expr> {
    let (mut input, mut left) = multiplicative(input)?;
    while let Ok((rest, op)) = additive_op(input) {
        let (rest, right) = multiplicative(rest)?;
        left = Expr::binary(left, op, right);
        input = rest;
    }
    Ok((input, left))
}

fn multiplicative_op(input: &str) -> Res<'_, BinaryOp> {
    preceded(
        sp,
        alt((
            value(BinaryOp::Multiply, tag("*")),
            value(BinaryOp::Divide, tag("/")),
            value(BinaryOp::Modulo, tag("%")),
        )),
    )(input)
}

fn multiplicative(input: &str) -> Res<'_, Expr> {
    let (mut input, mut left) = unary(input)?;
    while let Ok((rest, op)) = multiplicative_op(input) {
        let (rest, right) = unary(rest)?;
        left = Expr::binary(left, op, right);
        input = rest;
    }
    Ok((input, left))
}

fn unary(input: &str) -> Res<'_, Expr> {
    if let Ok((rest, _)) = sym("-")(input) {
        let (rest, inner) = unary(rest)?;
        return Ok((rest, Expr::Negate(Box::new(inner))));
    }
    primary(input)
}

fn primary(input: &str) -> Res<'_, Expr> {
    let (input, _) = sp(input)?;
    alt((
        map(delimited(char('('), expr, sym(")")), |e| Expr::Nested(Box::new(e))),
        map(quoted('\''), Expr::String),
        number,
        parameter,
        value(Expr::Null, keyword("NULL")),
        value(Expr::Star(None), char('*')),
        path_expr,
    ))(input)
}

fn number(input: &str) -> Res<'_, Expr> {
    map(
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        |s: &str| Expr::Number(s.to_string()),
    )(input)
}

fn parameter(input: &str) -> Res<'_, Expr> {
    map(
        alt((
            tag("?"),
            recognize(pair(char(':'), bare_word)),
            recognize(pair(char('$'), digit1)),
        )),
        |s: &str| Expr::Parameter(s.to_string()),
    )(input)
}

/// Identifier, `t.*`, function call, or bare keyword function.
fn path_expr(input: &str) -> Res<'_, Expr> {
    let (input, parts) = select_path(input)?;
    let name = parts.join(".");

    if let Ok((rest, _)) = tag::<_, _, NomError<&str>>(".*")(input) {
        return Ok((rest, Expr::Star(Some(name))));
    }

    if let Ok((rest, _)) = sym("(")(input) {
        return function_args(rest, name);
    }

    if parts.len() == 1 && is_niladic_keyword(&name) {
        let mut call = FunctionCall::new(name, vec![]);
        call.bare = true;
        return Ok((input, Expr::Function(call)));
    }

    Ok((input, Expr::Identifier(name)))
}

fn function_args(input: &str, name: String) -> Res<'_, Expr> {
    if let Ok((rest, _)) = sym(")")(input) {
        return Ok((rest, Expr::Function(FunctionCall::new(name, vec![]))));
    }
    if let Ok((rest, _)) = pair(sym("*"), sym(")"))(input) {
        return Ok((
            rest,
            Expr::Function(FunctionCall::new(name, vec![Expr::Star(None)])),
        ));
    }

    let (input, distinct) = opt(keyword("DISTINCT"))(input)?;
    let (input, args) = separated_list1(sym(","), expr)(input)?;
    let (input, _) = sym(")")(input)?;

    let mut call = FunctionCall::new(name, args);
    call.distinct = distinct.is_some();
    Ok((input, Expr::Function(call)))
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

fn alias(input: &str) -> Res<'_, Option<String>> {
    opt(preceded(opt(keyword("AS")), preceded(sp, select_ident_part)))(input)
}

fn select_item(input: &str) -> Res<'_, SelectItem> {
    let (input, expr) = expr(input)?;
    let (input, alias) = alias(input)?;
    Ok((input, SelectItem { expr, alias }))
}

fn table_ref(input: &str) -> Res<'_, TableRef> {
    let (input, parts) = select_path(input)?;
    let (input, alias) = alias(input)?;
    Ok((
        input,
        TableRef {
            name: parts.join("."),
            alias,
        },
    ))
}

fn join_kind(input: &str) -> Res<'_, JoinKind> {
    alt((
        value(JoinKind::Inner, pair(opt(keyword("INNER")), keyword("JOIN"))),
        value(
            JoinKind::Left,
            tuple((keyword("LEFT"), opt(keyword("OUTER")), keyword("JOIN"))),
        ),
        value(
            JoinKind::Right,
            tuple((keyword("RIGHT"), opt(keyword("OUTER")), keyword("JOIN"))),
        ),
        value(
            JoinKind::Full,
            tuple((keyword("FULL"), opt(keyword("OUTER")), keyword("JOIN"))),
        ),
        value(JoinKind::Cross, pair(keyword("CROSS"), keyword("JOIN"))),
    ))(input)
}

fn join(input: &str) -> Res<'_, Join> {
    let (input, kind) = join_kind(input)?;
    let (input, table) = table_ref(input)?;
    let (input, on) = opt(preceded(keyword("ON"), expr))(input)?;
    Ok((input, Join { kind, table, on }))
}

fn order_item(input: &str) -> Res<'_, OrderBy> {
    let (input, expr) = expr(input)?;
    let (input, dir) = opt(alt((
        value(true, keyword("DESC")),
        value(false, keyword("ASC")),
    )))(input)?;
    Ok((
        input,
        OrderBy {
            expr,
            descending: dir.unwrap_or(false),
        },
    ))
}

fn rows_keyword(input: &str) -> Res<'_, &str> {
    alt((keyword("ROWS"), keyword("ROW")))(input)
}

fn fetch_clause(input: &str) -> Res<'_, u64> {
    let (input, _) = keyword("FETCH")(input)?;
    let (input, _) = alt((keyword("FIRST"), keyword("NEXT")))(input)?;
    let (input, count) = opt(unsigned)(input)?;
    let (input, _) = rows_keyword(input)?;
    let (input, _) = keyword("ONLY")(input)?;
    Ok((input, count.unwrap_or(1)))
}

fn pagination(input: &str) -> Res<'_, Pagination> {
    let mut page = Pagination::default();

    if let Ok((rest, _)) = keyword("LIMIT")(input) {
        let (rest, first) = unsigned(rest)?;
        // MySQL `LIMIT offset, count`
        if let Ok((rest, _)) = sym(",")(rest) {
            let (rest, count) = unsigned(rest)?;
            page.offset = Some(first);
            page.limit = Some(count);
            return Ok((rest, page));
        }
        let (rest, offset) = opt(preceded(keyword("OFFSET"), unsigned))(rest)?;
        page.limit = Some(first);
        page.offset = offset;
        return Ok((rest, page));
    }

    let (input, offset) = opt(pair(
        preceded(keyword("OFFSET"), unsigned),
        opt(rows_keyword),
    ))(input)?;
    let (input, fetch) = opt(fetch_clause)(input)?;
    if let Some((m, rows)) = offset {
        page.offset = Some(m);
        page.offset_rows = rows.is_some();
    }
    page.fetch = fetch;
    Ok((input, page))
}

fn select_statement(input: &str) -> Res<'_, Select> {
    let (input, _) = keyword("SELECT")(input)?;
    let (input, distinct) = opt(keyword("DISTINCT"))(input)?;
    let (input, items) = separated_list1(sym(","), select_item)(input)?;
    let (input, from) = opt(preceded(
        keyword("FROM"),
        separated_list1(sym(","), table_ref),
    ))(input)?;
    let (input, joins) = many0(join)(input)?;
    let (input, filter) = opt(preceded(keyword("WHERE"), expr))(input)?;
    let (input, group_by) = opt(preceded(
        pair(keyword("GROUP"), keyword("BY")),
        separated_list1(sym(","), expr),
    ))(input)?;
    let (input, having) = opt(preceded(keyword("HAVING"), expr))(input)?;
    let (input, order_by) = opt(preceded(
        pair(keyword("ORDER"), keyword("BY")),
        separated_list1(sym(","), order_item),
    ))(input)?;
    let (input, pagination) = pagination(input)?;
    let (input, _) = sp(input)?;
    let (input, _) = eof(input)?;

    Ok((
        input,
        Select {
            distinct: distinct.is_some(),
            items,
            from: from.unwrap_or_default(),
            joins,
            filter,
            group_by: group_by.unwrap_or_default(),
            having,
            order_by: order_by.unwrap_or_default(),
            pagination,
        },
    ))
}

// ---------------------------------------------------------------------------
// CREATE TABLE
// ---------------------------------------------------------------------------

fn create_table_head(input: &str) -> Res<'_, String> {
    let (input, _) = keyword("CREATE")(input)?;
    let (input, _) = opt(pair(keyword("GLOBAL"), keyword("TEMPORARY")))(input)?;
    let (input, _) = keyword("TABLE")(input)?;
    let (input, _) = opt(tuple((keyword("IF"), keyword("NOT"), keyword("EXISTS"))))(input)?;
    let (input, parts) = path(input)?;
    let (input, _) = sym("(")(input)?;
    Ok((input, parts.join(".")))
}

fn create_table(input: &str) -> Option<CreateTable> {
    let (rest, name) = create_table_head(input).ok()?;
    let close = closing_paren(rest)?;
    let body = &rest[..close];
    let tail = rest[close + 1..].trim();

    let mut columns = Vec::new();
    let mut indexes = Vec::new();
    for element in split_top_level(body, ',') {
        let element = element.trim();
        if element.is_empty() {
            return None;
        }
        if let Some(index) = index_element(element) {
            indexes.push(index);
            continue;
        }
        let column = column_def(element)?;
        if has_inline_primary_key(&column.specs) {
            indexes.push(IndexDef {
                kind: "PRIMARY KEY".to_string(),
                name: None,
                columns: vec![column.name.clone()],
            });
        }
        columns.push(column);
    }

    Some(CreateTable {
        name,
        columns,
        indexes,
        options: spec_tokens(tail),
    })
}

fn index_kind(input: &str) -> Res<'_, &'static str> {
    alt((
        value("PRIMARY KEY", pair(keyword("PRIMARY"), keyword("KEY"))),
        value("FOREIGN KEY", pair(keyword("FOREIGN"), keyword("KEY"))),
        value(
            "UNIQUE",
            terminated(keyword("UNIQUE"), opt(alt((keyword("KEY"), keyword("INDEX"))))),
        ),
        value("KEY", keyword("KEY")),
        value("INDEX", keyword("INDEX")),
        value("CHECK", keyword("CHECK")),
    ))(input)
}

fn index_column(input: &str) -> Res<'_, String> {
    terminated(identifier, opt(alt((keyword("ASC"), keyword("DESC")))))(input)
}

fn index_def(input: &str) -> Res<'_, IndexDef> {
    let (input, constraint) = opt(preceded(keyword("CONSTRAINT"), identifier))(input)?;
    let (input, kind) = index_kind(input)?;
    let (input, index_name) = opt(identifier)(input)?;
    let (input, columns) = opt(delimited(
        sym("("),
        separated_list1(sym(","), index_column),
        sym(")"),
    ))(input)?;
    if columns.is_none() && kind != "CHECK" {
        return Err(fail(input, ErrorKind::Verify));
    }
    Ok((
        input,
        IndexDef {
            kind: kind.to_string(),
            name: constraint.or(index_name),
            columns: columns.unwrap_or_default(),
        },
    ))
}

/// Table-level constraint or index. `None` when the element is a column.
fn index_element(element: &str) -> Option<IndexDef> {
    index_def(element).ok().map(|(_, index)| index)
}

/// Leading integer of a type argument; `100 BYTE` gives 100, `*` gives none.
fn type_arg(input: &str) -> Res<'_, Option<u32>> {
    map(
        preceded(sp, take_while1(|c: char| c != ',' && c != ')')),
        |s: &str| {
            s.split_whitespace()
                .next()
                .and_then(|t| t.parse::<u32>().ok())
        },
    )(input)
}

fn data_type(input: &str) -> Res<'_, DataType> {
    let (input, _) = sp(input)?;
    let (input, first) = bare_word(input)?;
    let (input, second) = opt(preceded(
        sp,
        verify(bare_word, |w: &str| {
            TYPE_SUFFIXES.iter().any(|s| s.eq_ignore_ascii_case(w))
        }),
    ))(input)?;
    let (input, args) = opt(delimited(
        sym("("),
        separated_list1(sym(","), type_arg),
        sym(")"),
    ))(input)?;

    let mut name = first.to_ascii_uppercase();
    if let Some(word) = second {
        name.push(' ');
        name.push_str(&word.to_ascii_uppercase());
    }
    let args = args.unwrap_or_default();
    Ok((
        input,
        DataType {
            name,
            precision: args.first().copied().flatten(),
            scale: args.get(1).copied().flatten(),
        },
    ))
}

fn column_def(element: &str) -> Option<ColumnDef> {
    let (rest, name) = identifier(element).ok()?;
    let (rest, data_type) = data_type(rest).ok()?;
    Some(ColumnDef {
        name,
        data_type,
        specs: spec_tokens(rest),
    })
}

fn has_inline_primary_key(specs: &[String]) -> bool {
    specs.windows(2).any(|w| {
        w[0].eq_ignore_ascii_case("PRIMARY") && w[1].eq_ignore_ascii_case("KEY")
    })
}

/// Split specification text into whitespace-separated tokens at paren depth
/// zero. `DEFAULT` is joined with the value that follows it.
pub(crate) fn spec_tokens(text: &str) -> Vec<String> {
    let mut raw = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    raw.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        raw.push(current);
    }

    let mut tokens = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter();
    while let Some(token) = iter.next() {
        if token.eq_ignore_ascii_case("DEFAULT") {
            match iter.next() {
                Some(value) => tokens.push(format!("{} {}", token, value)),
                None => tokens.push(token),
            }
        } else {
            tokens.push(token);
        }
    }
    tokens
}

/// Index of the `)` closing an already-consumed `(`.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `sep` outside quotes and parentheses.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(sql: &str) -> Select {
        match parse(sql).unwrap().statement {
            Statement::Select(s) => *s,
            other => panic!("expected select, got {:?}", other),
        }
    }

    fn create(sql: &str) -> CreateTable {
        match parse(sql).unwrap().statement {
            Statement::CreateTable(t) => t,
            other => panic!("expected create table, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_select() {
        let s = select("SELECT a, b FROM t");
        assert_eq!(s.items.len(), 2);
        assert_eq!(s.from[0].name, "t");
        assert!(s.pagination.is_empty());
    }

    #[test]
    fn test_fetch_first() {
        let s = select("SELECT a FROM t FETCH FIRST 10 ROWS ONLY");
        assert_eq!(s.pagination.fetch, Some(10));
        assert_eq!(s.pagination.limit, None);
    }

    #[test]
    fn test_offset_then_fetch() {
        let s = select("select a from t offset 5 rows fetch next 10 rows only");
        assert_eq!(s.pagination.offset, Some(5));
        assert_eq!(s.pagination.fetch, Some(10));
    }

    #[test]
    fn test_mysql_limit_comma() {
        let s = select("SELECT a FROM t LIMIT 5, 10");
        assert_eq!(s.pagination.offset, Some(5));
        assert_eq!(s.pagination.limit, Some(10));
    }

    #[test]
    fn test_limit_offset() {
        let s = select("SELECT a FROM t LIMIT 10 OFFSET 5;");
        assert_eq!(s.pagination.limit, Some(10));
        assert_eq!(s.pagination.offset, Some(5));
    }

    #[test]
    fn test_bare_sysdate_is_function() {
        let s = select("SELECT SYSDATE FROM dual");
        match &s.items[0].expr {
            Expr::Function(call) => {
                assert_eq!(call.name, "SYSDATE");
                assert!(call.bare);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_function_args_and_alias() {
        let s = select("SELECT DECODE(x, 1, 'a', 'b') AS label, COUNT(*) cnt FROM t");
        assert_eq!(s.items[0].alias.as_deref(), Some("label"));
        assert_eq!(s.items[1].alias.as_deref(), Some("cnt"));
        match &s.items[0].expr {
            Expr::Function(call) => assert_eq!(call.args.len(), 4),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_where_precedence() {
        let s = select("SELECT a FROM t WHERE x = 1 OR y = 2 AND NVL(z, 0) > 3");
        match s.filter.unwrap() {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinaryOp::Or);
                assert!(matches!(*b.right, Expr::Binary(ref r) if r.op == BinaryOp::And));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_quoted_select_identifiers_keep_double_quotes() {
        let s = select("SELECT \"first name\", `age` FROM \"hr\".emp e");
        assert_eq!(s.items[0].expr, Expr::ident("\"first name\""));
        assert_eq!(s.items[1].expr, Expr::ident("\"age\""));
        assert_eq!(s.from[0].name, "\"hr\".emp");
        assert_eq!(s.from[0].alias.as_deref(), Some("e"));
    }

    #[test]
    fn test_create_table_names_are_unquoted() {
        let Statement::CreateTable(t) = parse("CREATE TABLE \"Emp\" (`id` INT)").unwrap().statement else {
            panic!("not a create table");
        };
        assert_eq!(t.name, "Emp");
        assert_eq!(t.columns[0].name, "id");
    }

    #[test]
    fn test_lone_offset_remembers_rows_keyword() {
        let s = select("SELECT a FROM t OFFSET 5 ROWS");
        assert_eq!(s.pagination.offset, Some(5));
        assert!(s.pagination.offset_rows);
        let s = select("SELECT a FROM t OFFSET 5");
        assert!(!s.pagination.offset_rows);
    }

    #[test]
    fn test_joins_group_order() {
        let s = select(
            "SELECT d.name, COUNT(e.id) FROM dept d LEFT OUTER JOIN emp e ON e.dept_id = d.id \
             WHERE e.salary IS NOT NULL GROUP BY d.name HAVING COUNT(e.id) > 1 ORDER BY d.name DESC",
        );
        assert_eq!(s.joins.len(), 1);
        assert_eq!(s.joins[0].kind, JoinKind::Left);
        assert_eq!(s.group_by.len(), 1);
        assert!(s.having.is_some());
        assert!(s.order_by[0].descending);
    }

    #[test]
    fn test_in_list_and_like() {
        let s = select("SELECT a FROM t WHERE a IN (1, 2) AND b NOT LIKE 'x%' AND c ILIKE 'y'");
        assert!(s.filter.is_some());
    }

    #[test]
    fn test_comments_are_skipped() {
        let s = select("SELECT a -- first\n, b /* second */ FROM t");
        assert_eq!(s.items.len(), 2);
    }

    #[test]
    fn test_unmodelled_is_other() {
        for sql in [
            "UPDATE t SET a = 1",
            "SELECT a FROM t UNION SELECT b FROM u",
            "SELECT CASE WHEN a = 1 THEN 'x' END FROM t",
            "SELECT a FROM (SELECT a FROM t)",
        ] {
            assert_eq!(parse(sql).unwrap().kind(), StatementKind::Other, "{}", sql);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse("  ; "), Err(ConvertError::EmptyInput)));
    }

    #[test]
    fn test_keeps_source_text() {
        let sql = "select  a from t";
        assert_eq!(parse(sql).unwrap().sql, sql);
    }

    #[test]
    fn test_create_table_columns_and_pk() {
        let t = create(
            "CREATE TABLE emp (\n  id NUMBER(10) NOT NULL,\n  name VARCHAR2(100) DEFAULT 'n/a',\n  \
             salary NUMBER(10,2) NULL,\n  CONSTRAINT pk_emp PRIMARY KEY (id)\n) TABLESPACE users",
        );
        assert_eq!(t.name, "emp");
        assert_eq!(t.columns.len(), 3);
        assert_eq!(t.columns[0].data_type, DataType::sized("NUMBER", 10));
        assert_eq!(t.columns[0].specs, vec!["NOT", "NULL"]);
        assert_eq!(t.columns[1].specs, vec!["DEFAULT 'n/a'"]);
        assert_eq!(t.columns[2].data_type, DataType::with_scale("NUMBER", 10, 2));
        assert_eq!(t.indexes.len(), 1);
        assert!(t.indexes[0].is_primary_key());
        assert_eq!(t.indexes[0].name.as_deref(), Some("pk_emp"));
        assert_eq!(t.options, vec!["TABLESPACE", "users"]);
    }

    #[test]
    fn test_create_table_inline_pk_and_keys() {
        let t = create(
            "CREATE TABLE `users` (`id` INT PRIMARY KEY AUTO_INCREMENT, `key` VARCHAR(20), \
             UNIQUE KEY uk_key (`key`), KEY idx_id (id)) ENGINE=InnoDB",
        );
        assert_eq!(t.columns.len(), 2);
        assert_eq!(t.columns[1].name, "key");
        assert_eq!(t.indexes.len(), 3);
        assert!(t.indexes[0].is_primary_key());
        assert_eq!(t.indexes[0].columns, vec!["id"]);
        assert_eq!(t.indexes[1].kind, "UNIQUE");
        assert_eq!(t.indexes[2].kind, "KEY");
    }

    #[test]
    fn test_multi_word_and_odd_type_args() {
        let t = create("CREATE TABLE t (a DOUBLE PRECISION, b VARCHAR2(100 BYTE), c NUMBER(*,2))");
        assert_eq!(t.columns[0].data_type, DataType::new("DOUBLE PRECISION"));
        assert_eq!(t.columns[1].data_type, DataType::sized("VARCHAR2", 100));
        assert_eq!(t.columns[2].data_type.precision, None);
        assert_eq!(t.columns[2].data_type.scale, Some(2));
    }

    #[test]
    fn test_parse_data_type() {
        assert_eq!(
            parse_data_type("number(10, 2)").unwrap(),
            DataType::with_scale("NUMBER", 10, 2)
        );
        assert!(parse_data_type("NUMBER(10").is_err());
    }

    #[test]
    fn test_split_statements() {
        let script = "SELECT ';' FROM t; -- note;\nSELECT b FROM u;;\n/* ; */ CREATE TABLE x (a INT)";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0], "SELECT ';' FROM t");
        assert_eq!(stmts[2], "CREATE TABLE x (a INT)");
    }

    #[test]
    fn test_spec_tokens_default_joined() {
        assert_eq!(
            spec_tokens("NOT NULL DEFAULT SYSDATE CHECK (a > 0)"),
            vec!["NOT", "NULL", "DEFAULT SYSDATE", "CHECK", "(a > 0)"]
        );
    }
}
