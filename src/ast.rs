//! Statement tree.
//!
//! The parsed shape of one SQL statement, as produced by [`crate::parser`]
//! and consumed by the converters. Only select queries and `CREATE TABLE`
//! are modelled; every other statement is kept as [`Statement::Other`].

use serde::{Deserialize, Serialize};

/// A statement together with its verbatim source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub sql: String,
    pub statement: Statement,
}

impl ParsedStatement {
    pub fn kind(&self) -> StatementKind {
        self.statement.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Select(Box<Select>),
    CreateTable(CreateTable),
    /// Anything the tree does not model.
    Other,
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::CreateTable(_) => StatementKind::CreateTable,
            Statement::Other => StatementKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Select,
    CreateTable,
    Other,
}

/// A simple select body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Select {
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: Vec<TableRef>,
    #[serde(default)]
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
    #[serde(default)]
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub expr: Expr,
    pub descending: bool,
}

/// Row-limiting sub-clause.
///
/// `limit` and `fetch` are mutually exclusive in parsed input: MySQL and
/// PostgreSQL write `LIMIT n`, Tibero and Oracle write `FETCH FIRST n ROWS ONLY`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub fetch: Option<u64>,
    /// A lone offset is written `OFFSET m ROWS` rather than `OFFSET m`.
    #[serde(default)]
    pub offset_rows: bool,
}

impl Pagination {
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none() && self.fetch.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Function(FunctionCall),
    Binary(BinaryExpr),
    /// Column or pseudo-column reference, possibly dotted.
    Identifier(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal, unescaped.
    String(String),
    Null,
    /// `*` or `t.*`
    Star(Option<String>),
    /// Bind parameter as written (`?`, `:name`, `$1`).
    Parameter(String),
    Nested(Box<Expr>),
    Not(Box<Expr>),
    Negate(Box<Expr>),
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    #[serde(default)]
    pub distinct: bool,
    /// Written without parentheses (`SYSDATE`, `CURRENT_TIMESTAMP`).
    #[serde(default)]
    pub bare: bool,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
            distinct: false,
            bare: false,
        }
    }

    /// Rename in place, fixing up whether the new name is written bare.
    pub fn rename(&mut self, name: &str) {
        self.bare = self.args.is_empty() && is_niladic_keyword(name);
        self.name = name.to_string();
    }
}

/// Functions that SQL writes without parentheses.
pub const NILADIC_KEYWORDS: &[&str] = &[
    "SYSDATE",
    "SYSTIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "LOCALTIMESTAMP",
];

pub fn is_niladic_keyword(name: &str) -> bool {
    NILADIC_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    ILike,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concat,
}

impl BinaryOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::ILike => "ILIKE",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Concat => "||",
        }
    }
}

/// `CREATE TABLE` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub indexes: Vec<IndexDef>,
    /// Trailing table options as written (`ENGINE=InnoDB`, `TABLESPACE x`).
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    /// Specification tokens after the type, e.g. `["NOT", "NULL", "DEFAULT 0"]`.
    pub specs: Vec<String>,
}

/// A scalar type name with optional precision and scale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    pub name: String,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl DataType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            precision: None,
            scale: None,
        }
    }

    pub fn sized(name: impl Into<String>, precision: u32) -> Self {
        Self {
            precision: Some(precision),
            ..Self::new(name)
        }
    }

    pub fn with_scale(name: impl Into<String>, precision: u32, scale: u32) -> Self {
        Self {
            precision: Some(precision),
            scale: Some(scale),
            ..Self::new(name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Index type as written: `PRIMARY KEY`, `UNIQUE`, `KEY`, ...
    pub kind: String,
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl IndexDef {
    pub fn is_primary_key(&self) -> bool {
        let normalized = self
            .kind
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        normalized.contains("PRIMARY KEY")
    }
}
