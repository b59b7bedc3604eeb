//! Scalar data-type mapping.
//!
//! Case-insensitive on the source type name. Types missing from a pair's
//! table pass through unchanged so they stay visible for manual review.

use once_cell::sync::Lazy;

use crate::ast::DataType;
use crate::dialect::{DialectPair, DialectType};
use crate::registry::RuleRegistry;

/// What happens to the source precision and scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPolicy {
    /// Copy precision and scale verbatim, including their absence.
    Thread,
    /// Copy, defaulting the precision when the source gave none.
    ThreadOrDefault(u32),
    /// Target type takes no parameters.
    Drop,
    /// Target parameters are fixed by the mapping.
    Fixed(u32, Option<u32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub source: &'static str,
    pub target: &'static str,
    pub params: ParamPolicy,
}

impl TypeMapping {
    pub fn apply(&self, source: &DataType) -> DataType {
        let (precision, scale) = match self.params {
            ParamPolicy::Thread => (source.precision, source.scale),
            ParamPolicy::ThreadOrDefault(default) => {
                (Some(source.precision.unwrap_or(default)), source.scale)
            }
            ParamPolicy::Drop => (None, None),
            ParamPolicy::Fixed(p, s) => (Some(p), s),
        };
        DataType {
            name: self.target.to_string(),
            precision,
            scale,
        }
    }
}

use ParamPolicy::*;

const fn ty(source: &'static str, target: &'static str, params: ParamPolicy) -> TypeMapping {
    TypeMapping {
        source,
        target,
        params,
    }
}

const ORACLE_TO_MYSQL: &[TypeMapping] = &[
    ty("NUMBER", "DECIMAL", Thread),
    ty("VARCHAR2", "VARCHAR", ThreadOrDefault(255)),
    ty("NVARCHAR2", "VARCHAR", ThreadOrDefault(255)),
    ty("CHAR", "CHAR", ThreadOrDefault(1)),
    ty("NCHAR", "CHAR", ThreadOrDefault(1)),
    ty("DATE", "DATETIME", Drop),
    ty("TIMESTAMP", "DATETIME", Thread),
    ty("CLOB", "LONGTEXT", Drop),
    ty("NCLOB", "LONGTEXT", Drop),
    ty("LONG", "LONGTEXT", Drop),
    ty("BLOB", "LONGBLOB", Drop),
    ty("LONG RAW", "LONGBLOB", Drop),
    ty("RAW", "VARBINARY", ThreadOrDefault(255)),
    ty("FLOAT", "DOUBLE", Drop),
    ty("BINARY_FLOAT", "FLOAT", Drop),
    ty("BINARY_DOUBLE", "DOUBLE", Drop),
    ty("INTEGER", "INT", Drop),
];

const ORACLE_TO_POSTGRESQL: &[TypeMapping] = &[
    ty("NUMBER", "NUMERIC", Thread),
    ty("VARCHAR2", "VARCHAR", ThreadOrDefault(255)),
    ty("NVARCHAR2", "VARCHAR", ThreadOrDefault(255)),
    ty("CHAR", "CHAR", ThreadOrDefault(1)),
    ty("NCHAR", "CHAR", ThreadOrDefault(1)),
    ty("DATE", "TIMESTAMP", Drop),
    ty("CLOB", "TEXT", Drop),
    ty("NCLOB", "TEXT", Drop),
    ty("LONG", "TEXT", Drop),
    ty("BLOB", "BYTEA", Drop),
    ty("RAW", "BYTEA", Drop),
    ty("LONG RAW", "BYTEA", Drop),
    ty("FLOAT", "DOUBLE PRECISION", Drop),
    ty("BINARY_FLOAT", "REAL", Drop),
    ty("BINARY_DOUBLE", "DOUBLE PRECISION", Drop),
];

const MYSQL_TO_POSTGRESQL: &[TypeMapping] = &[
    ty("INT", "INTEGER", Drop),
    ty("INTEGER", "INTEGER", Drop),
    ty("TINYINT", "SMALLINT", Drop),
    ty("SMALLINT", "SMALLINT", Drop),
    ty("MEDIUMINT", "INTEGER", Drop),
    ty("BIGINT", "BIGINT", Drop),
    ty("DATETIME", "TIMESTAMP", Thread),
    ty("DOUBLE", "DOUBLE PRECISION", Drop),
    ty("FLOAT", "REAL", Drop),
    ty("DECIMAL", "NUMERIC", Thread),
    ty("TINYTEXT", "TEXT", Drop),
    ty("MEDIUMTEXT", "TEXT", Drop),
    ty("LONGTEXT", "TEXT", Drop),
    ty("BLOB", "BYTEA", Drop),
    ty("MEDIUMBLOB", "BYTEA", Drop),
    ty("LONGBLOB", "BYTEA", Drop),
    ty("VARBINARY", "BYTEA", Drop),
];

const MYSQL_TO_ORACLE: &[TypeMapping] = &[
    ty("INT", "NUMBER", Fixed(10, None)),
    ty("INTEGER", "NUMBER", Fixed(10, None)),
    ty("BIGINT", "NUMBER", Fixed(19, None)),
    ty("MEDIUMINT", "NUMBER", Fixed(7, None)),
    ty("SMALLINT", "NUMBER", Fixed(5, None)),
    ty("TINYINT", "NUMBER", Fixed(3, None)),
    ty("DECIMAL", "NUMBER", Thread),
    ty("VARCHAR", "VARCHAR2", ThreadOrDefault(255)),
    ty("TEXT", "CLOB", Drop),
    ty("MEDIUMTEXT", "CLOB", Drop),
    ty("LONGTEXT", "CLOB", Drop),
    ty("BLOB", "BLOB", Drop),
    ty("LONGBLOB", "BLOB", Drop),
    ty("DATETIME", "TIMESTAMP", Thread),
    ty("DOUBLE", "BINARY_DOUBLE", Drop),
    ty("FLOAT", "BINARY_FLOAT", Drop),
];

const POSTGRESQL_TO_MYSQL: &[TypeMapping] = &[
    ty("INTEGER", "INT", Drop),
    ty("INT4", "INT", Drop),
    ty("INT8", "BIGINT", Drop),
    ty("SERIAL", "INT", Drop),
    ty("BIGSERIAL", "BIGINT", Drop),
    ty("TEXT", "LONGTEXT", Drop),
    ty("BYTEA", "LONGBLOB", Drop),
    ty("TIMESTAMP", "DATETIME", Thread),
    ty("BOOLEAN", "TINYINT", Fixed(1, None)),
    ty("NUMERIC", "DECIMAL", Thread),
    ty("DOUBLE PRECISION", "DOUBLE", Drop),
    ty("REAL", "FLOAT", Drop),
    ty("CHARACTER VARYING", "VARCHAR", ThreadOrDefault(255)),
    ty("UUID", "CHAR", Fixed(36, None)),
    ty("JSONB", "JSON", Drop),
];

const POSTGRESQL_TO_ORACLE: &[TypeMapping] = &[
    ty("INTEGER", "NUMBER", Fixed(10, None)),
    ty("INT4", "NUMBER", Fixed(10, None)),
    ty("BIGINT", "NUMBER", Fixed(19, None)),
    ty("INT8", "NUMBER", Fixed(19, None)),
    ty("SMALLINT", "NUMBER", Fixed(5, None)),
    ty("SERIAL", "NUMBER", Fixed(10, None)),
    ty("BIGSERIAL", "NUMBER", Fixed(19, None)),
    ty("NUMERIC", "NUMBER", Thread),
    ty("VARCHAR", "VARCHAR2", ThreadOrDefault(255)),
    ty("CHARACTER VARYING", "VARCHAR2", ThreadOrDefault(255)),
    ty("TEXT", "CLOB", Drop),
    ty("BYTEA", "BLOB", Drop),
    ty("BOOLEAN", "NUMBER", Fixed(1, None)),
    ty("DOUBLE PRECISION", "BINARY_DOUBLE", Drop),
    ty("REAL", "BINARY_FLOAT", Drop),
    ty("UUID", "VARCHAR2", Fixed(36, None)),
];

static TYPE_MAPPINGS: Lazy<RuleRegistry<TypeMapping>> = Lazy::new(|| {
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

pub fn type_registry() -> &'static RuleRegistry<TypeMapping> {
    &TYPE_MAPPINGS
}

/// Map a source type into the target dialect.
pub fn map_data_type(source: DialectType, target: DialectType, data_type: &DataType) -> DataType {
    let pair = DialectPair::new(source, target);
    let name = data_type.name.to_ascii_uppercase();
    match TYPE_MAPPINGS.find(pair, |m| m.source == name) {
        Some(mapping) => mapping.apply(data_type),
        None => data_type.clone(),
    }
}
