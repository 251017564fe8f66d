//! Integration tests for the qb module.

use crate::error::OrmError;
use crate::qb::{
    Expr, Insert, Period, Placeholder, Statement, TableRef, delete, insert, join, select,
};
use crate::value::Value;

#[test]
fn test_select_without_clauses_has_no_keywords() {
    let statements: Vec<Statement> = vec![
        select("expenses").into(),
        select("expenses").columns(&["amount"]).into(),
        join(
            TableRef::new("expenses", "e"),
            TableRef::new("expense_categories", "ec"),
            "e.cat_id=ec.id",
        )
        .into(),
    ];

    for stmt in statements {
        let built = stmt.build().unwrap();
        assert!(!built.sql.contains("WHERE"), "{}", built.sql);
        assert!(!built.sql.contains("ORDER BY"), "{}", built.sql);
        assert!(!built.sql.contains("LIMIT"), "{}", built.sql);
        assert!(!built.sql.ends_with(' '), "{:?}", built.sql);
        assert!(built.params.is_empty());
    }
}

#[test]
fn test_categories_listing_sql() {
    let sql = select("expense_categories")
        .filter(Expr::raw("id != 1"))
        .order_by("cat_name")
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM expense_categories WHERE id != 1 ORDER BY cat_name ");
}

#[test]
fn test_insert_format_placeholders() {
    let built = insert("expenses")
        .set("amount", 12.5f64)
        .set("cat_id", 3i64)
        .build_with(Placeholder::Format)
        .unwrap();
    assert_eq!(built.sql, "INSERT INTO expenses (amount, cat_id) VALUES (%s, %s)");
    assert_eq!(built.params, vec![Value::Float(12.5), Value::Int(3)]);
}

#[test]
fn test_insert_placeholder_count_matches_values() {
    for n in 1..=6 {
        let mut qb = Insert::new("t");
        for i in 0..n {
            qb = qb.set(&format!("c{i}"), i as i64);
        }
        let built = qb.build().unwrap();
        assert_eq!(built.sql.matches('$').count(), n);
        assert_eq!(built.params.len(), n);
        let expected: Vec<Value> = (0..n).map(|i| Value::Int(i as i64)).collect();
        assert_eq!(built.params, expected);

        let formatted = qb.build_with(Placeholder::Format).unwrap();
        assert_eq!(formatted.sql.matches("%s").count(), n);
    }
}

#[test]
fn test_delete_raw_filter() {
    let sql = delete("expense_categories", Expr::raw("cat_name='Food'"))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "DELETE FROM expense_categories WHERE cat_name='Food'");
}

#[test]
fn test_interval_report_sql() {
    let sql = join(
        TableRef::new("expenses", "e"),
        TableRef::new("expense_categories", "ec"),
        "e.cat_id=ec.id",
    )
    .columns(&["e.creation_timestamp::date", "e.amount", "ec.cat_name"])
    .filter(Expr::since("e.creation_timestamp", Period::Day))
    .to_sql()
    .unwrap();

    assert_eq!(
        sql,
        "SELECT e.creation_timestamp::date, e.amount, ec.cat_name \
         FROM expenses AS e JOIN expense_categories AS ec ON e.cat_id=ec.id \
         WHERE e.creation_timestamp > now() - interval '1 day'"
    );
}

#[test]
fn test_filter_params_numbered_in_order() {
    let built = select("expenses")
        .filter(Expr::gte("amount", 10i64))
        .and_where(Expr::eq("cat_id", 2i64))
        .and_where(Expr::ilike("cat_description", "%lunch%"))
        .limit(10)
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT * FROM expenses WHERE amount >= $1 AND cat_id = $2 AND cat_description ILIKE $3 LIMIT 10"
    );
    assert_eq!(
        built.params,
        vec![Value::Int(10), Value::Int(2), Value::from("%lunch%")]
    );
}

#[test]
fn test_user_text_is_never_interpolated() {
    let hostile = "x'; DROP TABLE expenses; --";
    let built = delete("expense_categories", Expr::eq("cat_name", hostile))
        .build()
        .unwrap();
    assert!(!built.sql.contains("DROP"));
    assert_eq!(built.params, vec![Value::from(hostile)]);
}

#[test]
fn test_statement_dispatch() {
    let stmt: Statement = insert("expense_categories").set("cat_name", "Food").into();
    assert!(!stmt.is_read());
    assert_eq!(stmt.kind(), "insert");

    let stmt: Statement = select("expense_categories").into();
    assert!(stmt.is_read());
    assert_eq!(stmt.build().unwrap().sql, "SELECT * FROM expense_categories");
}

#[test]
fn test_and_where_keeps_raw_filter_intact() {
    let built = select("t")
        .filter(Expr::raw("a = 1 OR b = 2"))
        .and_where(Expr::eq("c", 3i64))
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM t WHERE (a = 1 OR b = 2) AND c = $1");
    assert_eq!(built.params, vec![Value::Int(3)]);
}

#[test]
fn test_delete_statement_has_no_invented_clause() {
    let stmt: Statement = delete("t", Expr::eq("id", 7i64)).into();
    assert_eq!(stmt.build().unwrap().sql, "DELETE FROM t WHERE id = $1");
    assert_eq!(stmt.kind(), "delete");

    let empty: Statement = delete("t", Expr::and(vec![])).into();
    assert!(matches!(empty.build(), Err(OrmError::Validation(_))));
}

#[test]
fn test_statement_kinds() {
    let join_stmt: Statement = join(TableRef::new("a", "x"), TableRef::new("b", "y"), "x.id=y.id").into();
    assert_eq!(join_stmt.kind(), "join_select");
    assert!(join_stmt.is_read());
    assert_eq!(Statement::from(select("a")).kind(), "select");
}
