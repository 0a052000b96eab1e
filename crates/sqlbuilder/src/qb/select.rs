//! SELECT statement builder.

use crate::config::BuilderConfig;
use crate::dialect::Dialect;
use crate::error::{BuildResult, BuilderError, require_non_blank};
use crate::monitor;
use crate::qb::condition::Condition;
use crate::qb::operand::BuildCtx;
use crate::qb::param::ParamList;
use crate::qb::query::Query;
use std::collections::BTreeSet;

const MULTIPLE_ORDER_DIRECTIONS: &str =
    "order direction can only be set once; multiple calls of asc() or desc() are not allowed";

/// Sort direction of the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub const fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Kind of JOIN clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub const fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
        }
    }
}

#[derive(Clone, Debug)]
struct SelectColumn {
    name: String,
    alias: Option<String>,
}

#[derive(Clone, Debug)]
struct TableRef {
    /// Table name as given by the caller.
    name: String,
    /// Schema-qualified name as rendered.
    qualified: String,
    alias: Option<String>,
}

impl TableRef {
    fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} {}", self.qualified, alias),
            None => self.qualified.clone(),
        }
    }
}

#[derive(Clone, Debug)]
struct JoinClause {
    kind: JoinKind,
    table: TableRef,
    on: Condition,
}

/// Accumulates the clauses of one SELECT statement.
///
/// Fallible mutators validate their arguments immediately and return the
/// builder for chaining:
///
/// ```ignore
/// use sqlbuilder::qb::*;
///
/// let query = SelectBuilder::new(Dialect::Postgres)
///     .select(["id", "name"])?
///     .from("users")?
///     .where_(eq("status", "active").and().gt("age", 18))
///     .order_by(["name"])?
///     .asc()?
///     .limit(20)
///     .build()?;
/// assert_eq!(
///     query.statement(),
///     r#"SELECT "id", "name" FROM users WHERE status = ? AND age > ? ORDER BY name ASC LIMIT 20 OFFSET 0"#
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct SelectBuilder {
    config: BuilderConfig,
    columns: Vec<SelectColumn>,
    distinct: bool,
    tables: Vec<TableRef>,
    joins: Vec<JoinClause>,
    conditions: Vec<Condition>,
    group_columns: Vec<String>,
    order_columns: Vec<String>,
    order_direction: Option<OrderDirection>,
    limit: Option<u64>,
    offset: u64,
}

impl SelectBuilder {
    /// Create a builder for `dialect` with default configuration.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_config(BuilderConfig::new(dialect))
    }

    /// Create a builder whose tables are qualified with `schema`.
    pub fn with_schema(dialect: Dialect, schema: &str) -> Self {
        Self::with_config(BuilderConfig::new(dialect).with_schema(schema))
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    // ==================== SELECT columns ====================

    /// Append columns; each is quoted by the dialect.
    ///
    /// Dotted columns are quoted per segment and get no implicit alias, so
    /// `u.name` renders as `"u"."name"` and its result label is `name`. Use
    /// [`select_as`](Self::select_as) to keep the qualified label.
    pub fn select<I, S>(&mut self, columns: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = collect_non_blank(columns, "columns", "column")?;
        self.columns.extend(
            columns
                .into_iter()
                .map(|name| SelectColumn { name, alias: None }),
        );
        Ok(self)
    }

    /// Append one column with an alias: `"column" AS "alias"`.
    ///
    /// A blank alias selects the column without one.
    pub fn select_as(&mut self, column: &str, alias: &str) -> BuildResult<&mut Self> {
        require_non_blank(column, "column")?;
        let alias = (!alias.trim().is_empty()).then(|| alias.to_string());
        self.columns.push(SelectColumn {
            name: column.to_string(),
            alias,
        });
        Ok(self)
    }

    /// Append columns and switch to `SELECT DISTINCT`.
    pub fn select_distinct<I, S>(&mut self, columns: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select(columns)?;
        self.distinct = true;
        Ok(self)
    }

    /// Switch to `SELECT DISTINCT`.
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    // ==================== FROM ====================

    /// Add a table.
    pub fn from(&mut self, table: &str) -> BuildResult<&mut Self> {
        require_non_blank(table, "table")?;
        self.tables.push(self.table_ref(table, None));
        Ok(self)
    }

    /// Add a table with an alias; a blank alias behaves like [`from`](Self::from).
    pub fn from_as(&mut self, table: &str, alias: &str) -> BuildResult<&mut Self> {
        if alias.trim().is_empty() {
            return self.from(table);
        }
        require_non_blank(table, "table")?;
        self.tables.push(self.table_ref(table, Some(alias)));
        Ok(self)
    }

    /// Add several tables at once.
    pub fn from_tables<I, S>(&mut self, tables: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tables = collect_non_blank(tables, "tables", "table")?;
        for table in tables {
            self.tables.push(self.table_ref(&table, None));
        }
        Ok(self)
    }

    fn table_ref(&self, table: &str, alias: Option<&str>) -> TableRef {
        TableRef {
            name: table.to_string(),
            qualified: self.config.qualify_table(table),
            alias: alias.map(str::to_string),
        }
    }

    // ==================== JOIN ====================

    /// Add `JOIN table ON condition`.
    pub fn join(&mut self, table: &str, on: Condition) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Inner, table, None, on)
    }

    /// Add `JOIN table alias ON condition`.
    pub fn join_as(&mut self, table: &str, alias: &str, on: Condition) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Inner, table, Some(alias), on)
    }

    /// Add `LEFT JOIN table ON condition`.
    pub fn left_join(&mut self, table: &str, on: Condition) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Left, table, None, on)
    }

    /// Add `LEFT JOIN table alias ON condition`.
    pub fn left_join_as(
        &mut self,
        table: &str,
        alias: &str,
        on: Condition,
    ) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Left, table, Some(alias), on)
    }

    /// Add `RIGHT JOIN table ON condition`.
    pub fn right_join(&mut self, table: &str, on: Condition) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Right, table, None, on)
    }

    pub fn right_join_as(
        &mut self,
        table: &str,
        alias: &str,
        on: Condition,
    ) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Right, table, Some(alias), on)
    }

    /// Add `FULL OUTER JOIN table ON condition`.
    pub fn full_join(&mut self, table: &str, on: Condition) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Full, table, None, on)
    }

    pub fn full_join_as(
        &mut self,
        table: &str,
        alias: &str,
        on: Condition,
    ) -> BuildResult<&mut Self> {
        self.push_join(JoinKind::Full, table, Some(alias), on)
    }

    fn push_join(
        &mut self,
        kind: JoinKind,
        table: &str,
        alias: Option<&str>,
        on: Condition,
    ) -> BuildResult<&mut Self> {
        require_non_blank(table, "table")?;
        let alias = alias.filter(|a| !a.trim().is_empty());
        let table = self.table_ref(table, alias);
        self.joins.push(JoinClause { kind, table, on });
        Ok(self)
    }

    // ==================== WHERE ====================

    /// Add a WHERE condition; multiple calls are ANDed together at build time.
    pub fn where_(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    /// Add a WHERE condition if one is given.
    pub fn where_opt(&mut self, condition: Option<Condition>) -> &mut Self {
        if let Some(condition) = condition {
            self.conditions.push(condition);
        }
        self
    }

    // ==================== Grouping & ordering ====================

    /// Append GROUP BY columns.
    pub fn group_by<I, S>(&mut self, columns: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = collect_non_blank(columns, "columns", "column")?;
        self.group_columns.extend(columns);
        Ok(self)
    }

    /// Append ORDER BY columns. Without [`asc`](Self::asc) the direction is DESC.
    pub fn order_by<I, S>(&mut self, columns: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = collect_non_blank(columns, "columns", "column")?;
        self.order_columns.extend(columns);
        Ok(self)
    }

    /// Sort ascending. Only one of `asc()`/`desc()` may be called per builder.
    pub fn asc(&mut self) -> BuildResult<&mut Self> {
        self.set_direction(OrderDirection::Asc)
    }

    /// Sort descending. Only one of `asc()`/`desc()` may be called per builder.
    pub fn desc(&mut self) -> BuildResult<&mut Self> {
        self.set_direction(OrderDirection::Desc)
    }

    fn set_direction(&mut self, direction: OrderDirection) -> BuildResult<&mut Self> {
        if self.order_direction.is_some() {
            return Err(BuilderError::invalid_state(MULTIPLE_ORDER_DIRECTIONS));
        }
        self.order_direction = Some(direction);
        Ok(self)
    }

    // ==================== Paging ====================

    /// Maximum number of rows; values below 1 mean no limit.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = u64::try_from(limit).ok().filter(|&n| n >= 1);
        self
    }

    /// Rows to skip before the limit applies; values below 1 mean 0.
    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = u64::try_from(offset).unwrap_or(0);
        self
    }

    // ==================== Build ====================

    /// Assemble the statement text and its parameter stream.
    pub(crate) fn build_parts(&self) -> BuildResult<(String, ParamList)> {
        if self.tables.is_empty() {
            return Err(BuilderError::invalid_state(
                "a table to select from must be specified",
            ));
        }

        let dialect = self.config.dialect;
        let mut params = ParamList::new();
        let mut known_tables: BTreeSet<String> = BTreeSet::new();
        for table in &self.tables {
            remember_table(&mut known_tables, table);
        }

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            let columns: Vec<String> = self
                .columns
                .iter()
                .map(|c| match &c.alias {
                    Some(alias) => {
                        format!("{} AS {}", dialect.quote(&c.name), dialect.quote(alias))
                    }
                    None => dialect.quote(&c.name),
                })
                .collect();
            sql.push_str(&columns.join(", "));
        }

        sql.push_str(" FROM ");
        let tables: Vec<String> = self.tables.iter().map(TableRef::render).collect();
        sql.push_str(&tables.join(", "));

        // JOINs, each ON seeing the tables introduced so far
        for join in &self.joins {
            remember_table(&mut known_tables, &join.table);
            let ctx = BuildCtx {
                dialect,
                known_tables: &known_tables,
            };
            sql.push(' ');
            sql.push_str(join.kind.as_sql());
            sql.push(' ');
            sql.push_str(&join.table.render());
            let on = join.on.build(&ctx, &mut params)?;
            if !on.is_empty() {
                sql.push_str(" ON ");
                sql.push_str(&on);
            }
        }

        // WHERE
        if !self.conditions.is_empty() {
            let ctx = BuildCtx {
                dialect,
                known_tables: &known_tables,
            };
            let where_sql = match self.conditions.as_slice() {
                [single] => single.build(&ctx, &mut params)?,
                many => Condition::all(many.to_vec()).build(&ctx, &mut params)?,
            };
            if !where_sql.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&where_sql);
            }
        }

        if !self.group_columns.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_columns.join(", "));
        }

        if !self.order_columns.is_empty() {
            let direction = self.order_direction.unwrap_or(OrderDirection::Desc);
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_columns.join(", "));
            sql.push(' ');
            sql.push_str(direction.as_sql());
        }

        if let Some(limit) = self.limit {
            if let Some(paging) = dialect.apply_paging(limit, self.offset) {
                sql.push(' ');
                sql.push_str(&paging);
            }
        }

        Ok((sql, params))
    }

    /// Build the immutable [`Query`].
    pub fn build(&self) -> BuildResult<Query> {
        match self.build_parts() {
            Ok((sql, params)) => {
                let query = Query::new(sql, params.into_vec(), self.config.dialect);
                monitor::query_built(&self.config, &query);
                Ok(query)
            }
            Err(err) => {
                monitor::build_failed(&self.config, &err);
                Err(err)
            }
        }
    }

    /// Get the prepared SQL string (for debugging).
    pub fn to_sql(&self) -> BuildResult<String> {
        Ok(self.build_parts()?.0)
    }
}

fn remember_table(known: &mut BTreeSet<String>, table: &TableRef) {
    known.insert(table.qualified.clone());
    known.insert(table.name.clone());
}

/// Collect a non-empty list of non-blank strings, or fail before touching any state.
fn collect_non_blank<I, S>(items: I, list_name: &str, item_name: &str) -> BuildResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items
        .into_iter()
        .map(|s| {
            let s = s.as_ref();
            require_non_blank(s, item_name).map(|_| s.to_string())
        })
        .collect::<BuildResult<_>>()?;
    if items.is_empty() {
        return Err(BuilderError::empty(list_name));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::{and_all, col, eq, gt, in_list, or_all};

    fn generic() -> SelectBuilder {
        SelectBuilder::new(Dialect::Generic)
    }

    #[test]
    fn test_simple_select() {
        let mut b = generic();
        b.from("users").unwrap();
        assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users");
    }

    #[test]
    fn test_select_with_columns() {
        let mut b = generic();
        b.select(["id", "name"]).unwrap().from("users").unwrap();
        assert_eq!(b.to_sql().unwrap(), r#"SELECT "id", "name" FROM users"#);
    }

    #[test]
    fn test_select_as() {
        let mut b = generic();
        b.select_as("u.id", "user_id")
            .unwrap()
            .from_as("users", "u")
            .unwrap();
        assert_eq!(
            b.to_sql().unwrap(),
            r#"SELECT "u"."id" AS "user_id" FROM users u"#
        );
    }

    #[test]
    fn test_dotted_select_column_has_no_implicit_alias() {
        let mut b = generic();
        b.select(["u.name"]).unwrap().from_as("users", "u").unwrap();
        assert_eq!(b.to_sql().unwrap(), r#"SELECT "u"."name" FROM users u"#);
    }

    #[test]
    fn test_distinct() {
        let mut b = generic();
        b.select_distinct(["city"]).unwrap().from("users").unwrap();
        assert_eq!(b.to_sql().unwrap(), r#"SELECT DISTINCT "city" FROM users"#);
    }

    #[test]
    fn test_blank_alias_falls_back() {
        let mut b = generic();
        b.from_as("users", " ").unwrap();
        assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users");
    }

    #[test]
    fn test_schema_qualifies_tables_and_joins() {
        let mut b = SelectBuilder::with_schema(Dialect::Postgres, "app");
        b.from_as("users", "u")
            .unwrap()
            .join_as("orders", "o", eq("o.user_id", col("u.id")))
            .unwrap();
        assert_eq!(
            b.to_sql().unwrap(),
            "SELECT * FROM app.users u JOIN app.orders o ON o.user_id = u.id"
        );
    }

    #[test]
    fn test_multiple_where_calls_are_anded() {
        let mut b = generic();
        b.from("users")
            .unwrap()
            .where_(eq("a", 1).or().eq("b", 2))
            .where_(gt("c", 3));
        assert_eq!(
            b.to_sql().unwrap(),
            "SELECT * FROM users WHERE (a = ? OR b = ?) AND c > ?"
        );
    }

    #[test]
    fn test_empty_where_condition_is_skipped() {
        let mut b = generic();
        b.from("users").unwrap().where_(or_all(vec![]));
        assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users");
    }

    #[test]
    fn test_join_params_precede_where_params() {
        let mut b = generic();
        b.from_as("users", "u")
            .unwrap()
            .left_join_as("orders", "o", eq("o.user_id", col("u.id")).and().gt("o.total", 100))
            .unwrap()
            .where_(in_list("u.status", ["a", "b"]).unwrap());
        let query = b.build().unwrap();
        assert_eq!(
            query.statement(),
            "SELECT * FROM users u LEFT JOIN orders o ON o.user_id = u.id AND o.total > ? WHERE u.status IN (?, ?)"
        );
        assert_eq!(query.param_count(), 3);
    }

    #[test]
    fn test_outer_joins() {
        let mut b = generic();
        b.from_as("a", "x")
            .unwrap()
            .right_join_as("b", "y", eq("y.a_id", col("x.id")))
            .unwrap()
            .full_join("c", and_all(vec![]))
            .unwrap();
        assert_eq!(
            b.to_sql().unwrap(),
            "SELECT * FROM a x RIGHT JOIN b y ON y.a_id = x.id FULL OUTER JOIN c"
        );
    }

    #[test]
    fn test_group_and_order() {
        let mut b = generic();
        b.select(["city"])
            .unwrap()
            .from("users")
            .unwrap()
            .group_by(["city"])
            .unwrap()
            .order_by(["city"])
            .unwrap();
        assert_eq!(
            b.to_sql().unwrap(),
            r#"SELECT "city" FROM users GROUP BY city ORDER BY city DESC"#
        );
        b.asc().unwrap();
        assert!(b.to_sql().unwrap().ends_with("ORDER BY city ASC"));
    }

    #[test]
    fn test_direction_only_once() {
        let mut b = generic();
        b.desc().unwrap();
        assert!(b.asc().unwrap_err().is_invalid_state());
        assert!(b.desc().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_paging_clamps() {
        let mut b = generic();
        b.from("users").unwrap().limit(10).offset(-5);
        assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users LIMIT 10 OFFSET 0");
        b.limit(0).offset(20);
        assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users");
    }

    #[test]
    fn test_db2_paging_is_omitted() {
        let mut b = SelectBuilder::new(Dialect::Db2);
        b.from("users").unwrap().limit(10);
        assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users");
    }

    #[test]
    fn test_empty_arguments_fail() {
        let mut b = generic();
        assert!(b.select(Vec::<&str>::new()).unwrap_err().is_empty_value());
        assert!(b.select(["id", " "]).unwrap_err().is_empty_value());
        assert!(b.select_as("", "x").unwrap_err().is_empty_value());
        assert!(b.from("").unwrap_err().is_empty_value());
        assert!(
            b.from_tables(Vec::<String>::new())
                .unwrap_err()
                .is_empty_value()
        );
        assert!(b.join(" ", eq("a", 1)).unwrap_err().is_empty_value());
        assert!(
            b.group_by(Vec::<&str>::new())
                .unwrap_err()
                .is_empty_value()
        );
        assert!(b.order_by([""]).unwrap_err().is_empty_value());
        // a failed call leaves the builder untouched
        b.from("users").unwrap();
        assert_eq!(b.to_sql().unwrap(), "SELECT * FROM users");
    }

    #[test]
    fn test_build_without_table() {
        let b = generic();
        assert!(b.build().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_h2_strips_schema_qualified_table_first() {
        let mut b = SelectBuilder::with_schema(Dialect::H2, "app");
        b.from("users")
            .unwrap()
            .join("app", eq("app.users.id", col("app.x")))
            .unwrap();
        assert_eq!(
            b.to_sql().unwrap(),
            "SELECT * FROM app.users JOIN app.app ON id = x"
        );
    }

    #[test]
    fn test_h2_strips_known_tables_in_join() {
        let mut b = SelectBuilder::new(Dialect::H2);
        b.from("users")
            .unwrap()
            .join("orders", eq("orders.user_id", col("users.id")))
            .unwrap()
            .where_(eq("items.sku", "x"));
        assert_eq!(
            b.to_sql().unwrap(),
            "SELECT * FROM users JOIN orders ON user_id = id WHERE items.sku = ?"
        );
    }
}
