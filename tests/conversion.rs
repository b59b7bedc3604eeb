use pretty_assertions::assert_eq;
use sqlport::prelude::*;

fn convert_with(sql: &str, source: DialectType, target: DialectType, options: &ConversionOptions) -> ConversionResult {
    Orchestrator::global()
        .convert_sql(sql, source, target, options)
        .expect("statement should parse")
}

fn convert(sql: &str, source: DialectType, target: DialectType) -> ConversionResult {
    convert_with(sql, source, target, &ConversionOptions::default())
}

#[test]
fn test_identity_is_untouched_for_every_dialect() {
    let statements = [
        "SELECT NVL(a, 0) FROM t WHERE ROWNUM <= 5",
        "SELECT IFNULL(`a`, 0) FROM t LIMIT 5, 10",
        "CREATE TABLE t (id NUMBER(10) NOT NULL)",
        "DELETE FROM t WHERE a = 1",
    ];
    for dialect in DialectType::ALL {
        for sql in statements {
            let result = convert(sql, dialect, dialect);
            assert_eq!(result.converted_sql, sql);
            assert!(result.warnings.is_empty(), "{dialect}: {sql}");
            assert!(result.applied_rules.is_empty(), "{dialect}: {sql}");
        }
    }
}

#[test]
fn test_fetch_first_to_limit_keeps_offset() {
    let result = convert(
        "SELECT a FROM t ORDER BY a OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY",
        DialectType::Tibero,
        DialectType::Mysql,
    );
    assert_eq!(result.converted_sql, "SELECT a FROM t ORDER BY a LIMIT 10 OFFSET 20");
    assert!(result.applied_rules.contains(&"FETCH FIRST 10 ROWS ONLY → LIMIT 10".to_string()));
    assert!(result.applied_rules.contains(&"OFFSET 20 kept".to_string()));
}

#[test]
fn test_mysql_comma_limit_to_fetch_first() {
    let result = convert("SELECT a FROM t LIMIT 20, 10", DialectType::Mysql, DialectType::Tibero);
    assert_eq!(result.converted_sql, "SELECT a FROM t OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY");
}

#[test]
fn test_limit_to_fetch_first_for_oracle() {
    let result = convert("SELECT a FROM t LIMIT 3", DialectType::Postgresql, DialectType::Oracle);
    assert_eq!(result.converted_sql, "SELECT a FROM t FETCH FIRST 3 ROWS ONLY");
}

#[test]
fn test_decode_is_reported_not_rewritten() {
    let result = convert(
        "SELECT DECODE(status, 1, 'on', 'off') FROM t",
        DialectType::Tibero,
        DialectType::Postgresql,
    );
    assert_eq!(result.converted_sql, "SELECT DECODE(status, 1, 'on', 'off') FROM t");
    assert!(result.has_errors());

    let error = result
        .warnings
        .iter()
        .find(|w| w.severity == Severity::Error)
        .unwrap();
    assert_eq!(error.kind, WarningKind::UnsupportedFunction);
    assert!(error.suggestion.as_deref().unwrap().contains("CASE"));
}

#[test]
fn test_sysdate_per_target() {
    let to_pg = convert("SELECT SYSDATE FROM t", DialectType::Oracle, DialectType::Postgresql);
    assert_eq!(to_pg.converted_sql, "SELECT CURRENT_TIMESTAMP FROM t");

    let to_mysql = convert("SELECT SYSDATE FROM t", DialectType::Oracle, DialectType::Mysql);
    assert_eq!(to_mysql.converted_sql, "SELECT NOW() FROM t");

    let back = convert("SELECT NOW() FROM t", DialectType::Mysql, DialectType::Oracle);
    assert_eq!(back.converted_sql, "SELECT SYSDATE FROM t");
}

#[test]
fn test_number_type_parameters() {
    let converter = Orchestrator::global().converter(DialectType::Tibero).unwrap();
    let cases = [
        ("NUMBER(10,2)", "DECIMAL(10,2)"),
        ("NUMBER(10)", "DECIMAL(10)"),
        ("NUMBER", "DECIMAL"),
        ("number(5)", "DECIMAL(5)"),
    ];
    for (source, expected) in cases {
        let parsed = sqlport::parser::parse_data_type(source).unwrap();
        assert_eq!(converter.map_data_type(&parsed, DialectType::Mysql).to_string(), expected);
    }
}

#[test]
fn test_create_table_structure() {
    let result = convert(
        "CREATE TABLE emp (id NUMBER(10) NOT NULL, salary NUMBER(10,2), name VARCHAR2(100), note CLOB, PRIMARY KEY (id))",
        DialectType::Tibero,
        DialectType::Mysql,
    );
    assert_eq!(
        result.converted_sql,
        "CREATE TABLE `emp` (\n    `id` DECIMAL(10) NOT NULL,\n    `salary` DECIMAL(10,2),\n    `name` VARCHAR(100),\n    `note` LONGTEXT,\n    PRIMARY KEY (`id`)\n)"
    );

    let lines: Vec<&str> = result.converted_sql.lines().collect();
    assert_eq!(lines.len(), 4 + 1 + 2);
    assert!(
        result
            .applied_rules
            .iter()
            .any(|r| r.starts_with("CREATE TABLE synthesized"))
    );
}

#[test]
fn test_primary_key_keeps_declared_column_order() {
    let result = convert(
        "CREATE TABLE link (a NUMBER(10) NOT NULL, b NUMBER(10) NOT NULL, note VARCHAR2(20), CONSTRAINT link_pk PRIMARY KEY (b, a))",
        DialectType::Oracle,
        DialectType::Postgresql,
    );
    let lines: Vec<&str> = result.converted_sql.lines().collect();
    assert_eq!(
        lines,
        vec![
            "CREATE TABLE \"link\" (",
            "    \"a\" NUMERIC(10) NOT NULL,",
            "    \"b\" NUMERIC(10) NOT NULL,",
            "    \"note\" VARCHAR(20),",
            "    PRIMARY KEY (\"b\", \"a\")",
            ")",
        ]
    );
}

#[test]
fn test_missing_pagination_gets_manual_rewrite_warning() {
    let result = convert("SELECT a FROM t", DialectType::Tibero, DialectType::Mysql);
    let warning = result
        .warnings
        .iter()
        .find(|w| w.severity == Severity::Warning)
        .unwrap();
    assert!(warning.suggestion.as_deref().unwrap().contains("LIMIT n OFFSET m"));
}

#[test]
fn test_lone_offset_prints_bare_for_limit_dialects() {
    let result = convert("SELECT a FROM t OFFSET 5 ROWS", DialectType::Tibero, DialectType::Mysql);
    assert_eq!(result.converted_sql, "SELECT a FROM t OFFSET 5");
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.message == "MySQL does not accept OFFSET without LIMIT")
    );
}

#[test]
fn test_quoted_identifiers_survive_conversion() {
    let to_pg = convert("SELECT \"first name\" FROM \"Emp\"", DialectType::Tibero, DialectType::Postgresql);
    assert_eq!(to_pg.converted_sql, "SELECT \"first name\" FROM \"Emp\"");

    let to_mysql = convert("SELECT \"first name\" FROM \"Emp\"", DialectType::Tibero, DialectType::Mysql);
    assert_eq!(to_mysql.converted_sql, "SELECT `first name` FROM `Emp`");
}

#[test]
fn test_create_table_to_postgres_quotes_with_double_quotes() {
    let result = convert(
        "CREATE TABLE `orders` (`id` INT NOT NULL, `total` DECIMAL(12,2) DEFAULT 0, PRIMARY KEY (`id`)) ENGINE=InnoDB",
        DialectType::Mysql,
        DialectType::Postgresql,
    );
    assert!(result.converted_sql.starts_with("CREATE TABLE \"orders\" (\n"));
    assert!(result.converted_sql.contains("    \"id\" INTEGER NOT NULL,\n"));
    assert!(result.converted_sql.contains("    \"total\" NUMERIC(12,2) DEFAULT 0,\n"));
    assert!(result.converted_sql.ends_with("    PRIMARY KEY (\"id\")\n)"));
    assert!(result.warnings.iter().any(|w| w.message.contains("ENGINE")));
}

#[test]
fn test_steps_run_in_order() {
    let result = convert(
        "SELECT SYSDATE FROM t WHERE ROWNUM <= 5 FETCH FIRST 5 ROWS ONLY",
        DialectType::Tibero,
        DialectType::Mysql,
    );
    assert_eq!(result.converted_sql, "SELECT NOW() FROM t WHERE ROWNUM <= 5 LIMIT 5");

    let pagination = result
        .applied_rules
        .iter()
        .position(|r| r.starts_with("FETCH FIRST"))
        .unwrap();
    let function = result
        .applied_rules
        .iter()
        .position(|r| r.contains("SYSDATE"))
        .unwrap();
    assert!(pagination < function);

    let quoting = result
        .warnings
        .iter()
        .position(|w| w.severity == Severity::Info && w.message.contains("quotes identifiers"))
        .unwrap();
    let rownum = result
        .warnings
        .iter()
        .position(|w| w.message.contains("ROWNUM is not available"))
        .unwrap();
    assert!(quoting < rownum);
}

#[test]
fn test_info_can_be_suppressed() {
    let options = ConversionOptions::default().include_info(false);
    let result = convert_with("SELECT a FROM t", DialectType::Tibero, DialectType::Mysql, &options);
    assert!(result.warnings.iter().all(|w| w.severity != Severity::Info));
}

#[test]
fn test_other_statements_pass_through() {
    let sql = "UPDATE emp SET hired = SYSDATE WHERE id = 1";
    let result = convert(sql, DialectType::Tibero, DialectType::Postgresql);
    assert_eq!(result.converted_sql, sql);
    assert!(result.warnings.is_empty());
    assert!(result.applied_rules.is_empty());
}

#[test]
fn test_mysql_backticks_become_double_quotes() {
    let result = convert("SELECT `id` FROM `users` LIMIT 5", DialectType::Mysql, DialectType::Postgresql);
    assert_eq!(result.converted_sql, "SELECT \"id\" FROM \"users\" LIMIT 5");
    assert!(result.applied_rules.contains(&"2 quoted identifier(s) requoted".to_string()));
}

#[test]
fn test_script_splits_statements() {
    let results = Orchestrator::global()
        .convert_script(
            "SELECT SYSDATE FROM dual;\n-- trailing; comment\nSELECT NVL(a, 0) FROM t;",
            DialectType::Tibero,
            DialectType::Mysql,
            &ConversionOptions::default(),
        )
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].converted_sql, "SELECT NOW() FROM dual");
    assert_eq!(results[1].converted_sql, "SELECT IFNULL(a, 0) FROM t");
}

#[test]
fn test_result_serializes_to_json() {
    let result = convert("SELECT DECODE(a, 1, 2) FROM t", DialectType::Oracle, DialectType::Mysql);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["converted_sql"], "SELECT DECODE(a, 1, 2) FROM t");
    assert!(json["warnings"].as_array().unwrap().len() >= 1);
}
