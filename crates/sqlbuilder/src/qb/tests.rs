//! Integration tests for the qb module.

use crate::qb::*;

fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

#[test]
fn test_select_basic() {
    let mut b = select(Dialect::Generic);
    b.from("users").unwrap();
    let query = b.build().unwrap();
    assert_eq!(query.statement(), "SELECT * FROM users");
    assert!(query.params().is_empty());
}

#[test]
fn test_and_chain() {
    let c = eq("A", 1).and().eq("B", 2).and().eq("C", 3);
    let mut params = ParamList::new();
    c.collect_params(&mut params).unwrap();

    assert_eq!(c.to_sql(Dialect::Generic).unwrap(), "A = ? AND B = ? AND C = ?");
    assert_eq!(
        params.into_vec(),
        vec![
            Param::Value(Value::Int(1)),
            Param::Value(Value::Int(2)),
            Param::Value(Value::Int(3)),
        ]
    );
}

#[test]
fn test_mixed_chain_keeps_precedence() {
    let c = eq("a", 1).and().eq("b", 2).or().eq("c", 3);
    assert_eq!(c.to_sql(Dialect::Generic).unwrap(), "(a = ? AND b = ?) OR c = ?");

    let c = eq("a", 1).and().condition(eq("b", 2).or().eq("c", 3));
    assert_eq!(c.to_sql(Dialect::Generic).unwrap(), "a = ? AND (b = ? OR c = ?)");
}

#[test]
fn test_not_wraps_compound_only() {
    assert_eq!(not(is_null("a")).to_sql(Dialect::Generic).unwrap(), "NOT a IS NULL");
    assert_eq!(
        not(eq("a", 1).or().eq("b", 2)).to_sql(Dialect::Generic).unwrap(),
        "NOT (a = ? OR b = ?)"
    );
    assert_eq!(not(and_all(vec![])).to_sql(Dialect::Generic).unwrap(), "");
}

#[test]
fn test_select_with_conditions() {
    let mut b = select(Dialect::Postgres);
    b.from("users")
        .unwrap()
        .where_(eq("status", "active").and().gt("age", 18))
        .limit(10);
    let query = b.build().unwrap();

    assert_eq!(
        query.statement(),
        "SELECT * FROM users WHERE status = ? AND age > ? LIMIT 10 OFFSET 0"
    );
    assert_eq!(
        query.resolved_values(),
        vec![Some(Value::from("active")), Some(Value::Int(18))]
    );
}

#[test]
fn test_in_subquery_splices_params() {
    let mut sub = select(Dialect::Generic);
    sub.select(["user_id"])
        .unwrap()
        .from("orders")
        .unwrap()
        .where_(gt("total", 100));

    let mut b = select(Dialect::Generic);
    b.from("users")
        .unwrap()
        .where_(eq("status", "active"))
        .where_(in_subquery("id", sub))
        .where_(lt("age", 65));
    let query = b.build().unwrap();

    assert_eq!(
        query.statement(),
        r#"SELECT * FROM users WHERE status = ? AND id IN (SELECT "user_id" FROM orders WHERE total > ?) AND age < ?"#
    );
    assert_eq!(
        query.resolved_values(),
        vec![
            Some(Value::from("active")),
            Some(Value::Int(100)),
            Some(Value::Int(65)),
        ]
    );
    assert_eq!(placeholders(query.statement()), query.param_count());
}

#[test]
fn test_exists_and_comparison_subquery() {
    let mut sub = select(Dialect::Generic);
    sub.from("orders")
        .unwrap()
        .where_(eq("orders.user_id", col("users.id")));

    let mut max_total = select(Dialect::Generic);
    max_total.select(["total"]).unwrap().from("limits").unwrap();

    let mut b = select(Dialect::Generic);
    b.from("users")
        .unwrap()
        .where_(exists(sub).and().gt("score", max_total));
    assert_eq!(
        b.to_sql().unwrap(),
        r#"SELECT * FROM users WHERE EXISTS (SELECT * FROM orders WHERE orders.user_id = users.id) AND score > (SELECT "total" FROM limits)"#
    );
}

#[test]
fn test_any_all_between() {
    let mut b = select(Dialect::Generic);
    b.from("products")
        .unwrap()
        .where_(eq("category", any(["a", "b"]).unwrap()))
        .where_(between("price", 10, 20))
        .where_(not_between("stock", 0, 5));
    let query = b.build().unwrap();
    assert_eq!(
        query.statement(),
        "SELECT * FROM products WHERE category = ANY (?, ?) AND price BETWEEN ? AND ? AND stock NOT BETWEEN ? AND ?"
    );
    assert_eq!(query.param_count(), 6);
}

#[test]
fn test_named_params_bind_every_occurrence() {
    let mut registry = ParamRegistry::new();
    let name = registry.param("name").unwrap();
    let min = registry.param("min").unwrap();

    let mut b = select(Dialect::Generic);
    b.from("users")
        .unwrap()
        .where_(eq("first_name", &name).or().eq("last_name", &name))
        .where_(geq("age", min));
    let mut query = b.build().unwrap();

    assert_eq!(query.binding_keys(), vec!["name", "min"]);
    assert_eq!(
        query.populated_statement(),
        "SELECT * FROM users WHERE (first_name = ? OR last_name = ?) AND age >= ?"
    );

    query.set_parameter("name", "Ann").unwrap();
    assert_eq!(
        query.populated_statement(),
        "SELECT * FROM users WHERE (first_name = 'Ann' OR last_name = 'Ann') AND age >= ?"
    );
    query.set_parameter("min", 21).unwrap();
    assert_eq!(
        query.populated_statement(),
        "SELECT * FROM users WHERE (first_name = 'Ann' OR last_name = 'Ann') AND age >= 21"
    );
    // repeated rendering is stable
    assert_eq!(query.populated_statement(), query.populated_statement());
}

#[test]
fn test_binding_positions_follow_stream() {
    let mut registry = ParamRegistry::new();
    let id = registry.param("id").unwrap();

    let mut sub = select(Dialect::Generic);
    sub.select(["owner"])
        .unwrap()
        .from("pets")
        .unwrap()
        .where_(eq("id", &id));

    let mut b = select(Dialect::Generic);
    b.from("users")
        .unwrap()
        .where_(eq("kind", "x"))
        .where_(in_subquery("id", sub))
        .where_(neq("id", &id));
    let query = b.build().unwrap();

    let positions: Vec<usize> = query
        .params()
        .iter()
        .filter_map(|p| match p {
            Param::Binding(binding) => Some(binding.position),
            Param::Value(_) => None,
        })
        .collect();
    assert_eq!(positions, vec![1, 2]);
}

#[test]
fn test_duplicate_key() {
    let mut registry = ParamRegistry::new();
    registry.param("id").unwrap();
    assert!(registry.param("id").unwrap_err().is_duplicate_key());
    assert!(registry.param(" ").unwrap_err().is_empty_value());
}

#[test]
fn test_case_in_condition() {
    let label = case()
        .when_then(gt("score", 90), "gold")
        .otherwise("none")
        .end()
        .unwrap();
    let mut b = select(Dialect::Generic);
    b.from("players")
        .unwrap()
        .where_(Condition::compare(label, CompareOp::Neq, "none"));
    let query = b.build().unwrap();
    assert_eq!(
        query.statement(),
        "SELECT * FROM players WHERE CASE WHEN score > ? THEN ? ELSE ? END <> ?"
    );
    assert_eq!(
        query.populated_statement(),
        "SELECT * FROM players WHERE CASE WHEN score > 90 THEN 'gold' ELSE 'none' END <> 'none'"
    );
}

#[test]
fn test_null_values_render_as_null() {
    let mut b = select(Dialect::Generic);
    b.from("users")
        .unwrap()
        .where_(eq("deleted_at", Option::<i64>::None));
    let query = b.build().unwrap();
    assert_eq!(query.populated_statement(), "SELECT * FROM users WHERE deleted_at = NULL");
}

#[test]
fn test_mssql_paging() {
    let mut b = select(Dialect::MsSql);
    b.from("users")
        .unwrap()
        .order_by(["id"])
        .unwrap()
        .asc()
        .unwrap()
        .limit(10)
        .offset(20);
    assert_eq!(
        b.to_sql().unwrap(),
        "SELECT * FROM users ORDER BY id ASC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn test_where_opt() {
    let filter: Option<Condition> = None;
    let mut b = select(Dialect::Generic);
    b.from("users")
        .unwrap()
        .where_opt(filter)
        .where_opt(Some(is_not_null("email")));
    assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users WHERE email IS NOT NULL");
}

#[test]
fn test_builder_is_reusable() {
    let mut b = select(Dialect::Generic);
    b.from("users").unwrap().where_(eq("a", 1));
    let first = b.build().unwrap();
    b.where_(eq("b", 2));
    let second = b.build().unwrap();
    assert_eq!(first.statement(), "SELECT * FROM users WHERE a = ?");
    assert_eq!(second.statement(), "SELECT * FROM users WHERE a = ? AND b = ?");
}
