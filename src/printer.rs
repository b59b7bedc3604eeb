//! Canonical SQL printer for the statement tree.
//!
//! Re-serializes a (possibly rewritten) tree. Output is normalized: keywords
//! upper case, single spaces, identifiers bare as the parser left them.

use std::fmt;

use crate::ast::*;

/// Trait for converting tree nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

impl ToSql for ParsedStatement {
    /// Selects are re-printed; everything else is returned as written.
    fn to_sql(&self) -> String {
        match &self.statement {
            Statement::Select(select) => select.to_sql(),
            Statement::CreateTable(_) | Statement::Other => self.sql.clone(),
        }
    }
}

impl ToSql for Select {
    fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        let items: Vec<String> = self.items.iter().map(ToSql::to_sql).collect();
        sql.push_str(&items.join(", "));

        if !self.from.is_empty() {
            sql.push_str(" FROM ");
            let tables: Vec<String> = self.from.iter().map(ToSql::to_sql).collect();
            sql.push_str(&tables.join(", "));
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.to_sql());
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            let exprs: Vec<String> = self.group_by.iter().map(ToSql::to_sql).collect();
            sql.push_str(&exprs.join(", "));
        }

        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(&having.to_sql());
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let orders: Vec<String> = self
                .order_by
                .iter()
                .map(|o| {
                    if o.descending {
                        format!("{} DESC", o.expr.to_sql())
                    } else {
                        o.expr.to_sql()
                    }
                })
                .collect();
            sql.push_str(&orders.join(", "));
        }

        sql.push_str(&self.pagination.to_sql());
        sql
    }
}

impl ToSql for SelectItem {
    fn to_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {}", self.expr.to_sql(), alias),
            None => self.expr.to_sql(),
        }
    }
}

impl ToSql for TableRef {
    fn to_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} {}", self.name, alias),
            None => self.name.clone(),
        }
    }
}

impl ToSql for Join {
    fn to_sql(&self) -> String {
        let kw = match self.kind {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        };
        match &self.on {
            Some(on) => format!("{} {} ON {}", kw, self.table.to_sql(), on.to_sql()),
            None => format!("{} {}", kw, self.table.to_sql()),
        }
    }
}

impl ToSql for Pagination {
    /// Leading space included; empty when there is no pagination.
    fn to_sql(&self) -> String {
        let mut sql = String::new();
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {}", n));
            if let Some(m) = self.offset {
                sql.push_str(&format!(" OFFSET {}", m));
            }
            return sql;
        }
        if let Some(m) = self.offset {
            if self.fetch.is_some() || self.offset_rows {
                sql.push_str(&format!(" OFFSET {} ROWS", m));
            } else {
                sql.push_str(&format!(" OFFSET {}", m));
            }
        }
        if let Some(n) = self.fetch {
            sql.push_str(&format!(" FETCH FIRST {} ROWS ONLY", n));
        }
        sql
    }
}

impl ToSql for Expr {
    fn to_sql(&self) -> String {
        match self {
            Expr::Function(call) => call.to_sql(),
            Expr::Binary(b) => format!(
                "{} {} {}",
                b.left.to_sql(),
                b.op.as_sql(),
                b.right.to_sql()
            ),
            Expr::Identifier(name) => name.clone(),
            Expr::Number(n) => n.clone(),
            Expr::String(s) => format!("'{}'", s.replace('\'', "''")),
            Expr::Null => "NULL".to_string(),
            Expr::Star(None) => "*".to_string(),
            Expr::Star(Some(table)) => format!("{}.*", table),
            Expr::Parameter(p) => p.clone(),
            Expr::Nested(inner) => format!("({})", inner.to_sql()),
            Expr::Not(inner) => format!("NOT {}", inner.to_sql()),
            Expr::Negate(inner) => format!("-{}", inner.to_sql()),
            Expr::IsNull { expr, negated } => {
                if *negated {
                    format!("{} IS NOT NULL", expr.to_sql())
                } else {
                    format!("{} IS NULL", expr.to_sql())
                }
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                let values: Vec<String> = list.iter().map(ToSql::to_sql).collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", expr.to_sql(), op, values.join(", "))
            }
        }
    }
}

impl ToSql for FunctionCall {
    fn to_sql(&self) -> String {
        if self.bare && self.args.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.args.iter().map(ToSql::to_sql).collect();
        if self.distinct {
            format!("{}(DISTINCT {})", self.name, args.join(", "))
        } else {
            format!("{}({})", self.name, args.join(", "))
        }
    }
}

impl ToSql for DataType {
    fn to_sql(&self) -> String {
        match (self.precision, self.scale) {
            (Some(p), Some(s)) => format!("{}({},{})", self.name, p, s),
            (Some(p), None) => format!("{}({})", self.name, p),
            _ => self.name.clone(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_limit_style() {
        let p = Pagination {
            limit: Some(10),
            offset: Some(5),
            fetch: None,
            offset_rows: false,
        };
        assert_eq!(p.to_sql(), " LIMIT 10 OFFSET 5");
    }

    #[test]
    fn test_lone_offset_forms() {
        let mut p = Pagination {
            offset: Some(5),
            ..Default::default()
        };
        assert_eq!(p.to_sql(), " OFFSET 5");
        p.offset_rows = true;
        assert_eq!(p.to_sql(), " OFFSET 5 ROWS");
    }

    #[test]
    fn test_pagination_fetch_style() {
        let p = Pagination {
            limit: None,
            offset: Some(5),
            fetch: Some(10),
            offset_rows: false,
        };
        assert_eq!(p.to_sql(), " OFFSET 5 ROWS FETCH FIRST 10 ROWS ONLY");
    }

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(Expr::String("it's".into()).to_sql(), "'it''s'");
    }

    #[test]
    fn test_bare_function() {
        let mut call = FunctionCall::new("SYSDATE", vec![]);
        call.bare = true;
        assert_eq!(call.to_sql(), "SYSDATE");
        call.bare = false;
        assert_eq!(call.to_sql(), "SYSDATE()");
    }

    #[test]
    fn test_quoted_names_print_as_stored() {
        let select = Select {
            items: vec![SelectItem {
                expr: Expr::ident("\"first name\""),
                alias: None,
            }],
            from: vec![TableRef {
                name: "\"Emp\"".into(),
                alias: None,
            }],
            ..Default::default()
        };
        assert_eq!(select.to_sql(), "SELECT \"first name\" FROM \"Emp\"");
    }

    #[test]
    fn test_data_type_params() {
        assert_eq!(DataType::with_scale("DECIMAL", 10, 2).to_string(), "DECIMAL(10,2)");
        assert_eq!(DataType::sized("VARCHAR", 255).to_string(), "VARCHAR(255)");
        assert_eq!(DataType::new("TEXT").to_string(), "TEXT");
    }

    #[test]
    fn test_select_round_shape() {
        let select = Select {
            items: vec![SelectItem {
                expr: Expr::Function(FunctionCall::new("COUNT", vec![Expr::Star(None)])),
                alias: Some("n".into()),
            }],
            from: vec![TableRef {
                name: "emp".into(),
                alias: Some("e".into()),
            }],
            filter: Some(Expr::binary(
                Expr::ident("e.dept"),
                BinaryOp::Eq,
                Expr::Number("10".into()),
            )),
            order_by: vec![OrderBy {
                expr: Expr::ident("n"),
                descending: true,
            }],
            ..Default::default()
        };
        assert_eq!(
            select.to_sql(),
            "SELECT COUNT(*) AS n FROM emp e WHERE e.dept = 10 ORDER BY n DESC"
        );
    }
}
