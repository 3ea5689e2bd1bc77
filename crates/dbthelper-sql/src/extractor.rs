//! Regex-based dependency extraction from raw SQL
//!
//! This is deliberately naive: it looks at whatever token follows `from` or
//! `join` and treats it as a referenced relation. No parsing happens, so
//! malformed SQL never errors, it just contributes fewer (or odd) parents.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--.*").expect("valid line comment regex"));

static PARENT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:join|from)\s").expect("valid parent keyword regex"));

static CTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\S+)\sas\W*\(").expect("valid cte regex"));

/// Table-generating functions that show up after `from` but are not relations
const TABLE_FUNCTIONS: &[&str] = &["generate_series"];

/// Characters removed from every extracted parent
const WRAPPING_CHARS: &[char] = &['[', ']', ')', '"'];

/// Normalize SQL for matching
///
/// Lowercases, strips block and line comments, and collapses every
/// whitespace run (newlines included) into a single space. Comment stripping
/// repeats until nothing changes, so the result is a fixed point:
/// `clean_sql(&clean_sql(x)) == clean_sql(x)`.
pub fn clean_sql(sql: &str) -> String {
    let mut current = sql.to_lowercase();

    loop {
        let without_blocks = BLOCK_COMMENT.replace_all(&current, "");
        let stripped = LINE_COMMENT.replace_all(&without_blocks, "").into_owned();
        if stripped == current {
            break;
        }
        current = stripped;
    }

    current.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Raw tokens following `from` / `join` in cleaned SQL
///
/// The keyword is only looked at, never consumed: a captured token can
/// itself be the keyword for the token after it, and the keyword may be the
/// tail of a longer identifier (`valid_from from t` yields `from` and `t`).
/// Tokens mentioning a known table function are dropped.
pub fn extract_parents(cleaned: &str) -> BTreeSet<String> {
    PARENT_KEYWORD
        .find_iter(cleaned)
        .map(|keyword| {
            let rest = &cleaned[keyword.end()..];
            rest.find(char::is_whitespace).map_or(rest, |end| &rest[..end])
        })
        .filter(|candidate| !candidate.is_empty())
        .filter(|candidate| !TABLE_FUNCTIONS.iter().any(|f| candidate.contains(f)))
        .map(str::to_string)
        .collect()
}

/// Names of common table expressions (`<name> as (`) in cleaned SQL
pub fn extract_ctes(cleaned: &str) -> BTreeSet<String> {
    CTES.captures_iter(cleaned)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Direct parents referenced by a SQL model
pub fn sql_parents(sql: &str) -> BTreeSet<String> {
    let cleaned = clean_sql(sql);
    let ctes = extract_ctes(&cleaned);

    extract_parents(&cleaned)
        .into_iter()
        .filter(|candidate| !ctes.contains(candidate))
        // Subqueries: `from (select ...`
        .filter(|candidate| !candidate.starts_with('('))
        .map(|candidate| candidate.replace(WRAPPING_CHARS, ""))
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn clean_strips_comments_and_whitespace() {
        let sql = "SELECT *\n  FROM Users -- trailing\n/* block\n comment */ JOIN orders";
        assert_eq!(clean_sql(sql), "select * from users join orders");
    }

    #[test]
    fn clean_block_comment_is_non_greedy() {
        let sql = "/* a */ select 1 /* b */ from t";
        assert_eq!(clean_sql(sql), "select 1 from t");
    }

    #[test]
    fn clean_is_idempotent() {
        let samples = [
            "select a -- x\nfrom b",
            "//**/*x*/ select 1",
            "-/**/- hidden\nfrom t",
            "  WITH x AS (\n select 1 )\tselect * from x  ",
            "",
            "select id, dbt_valid_from from customers_snapshot",
            "x_join join t",
            "a_from from t",
            "from from t",
            "FROM/* x */FROM\tt -- from u",
        ];

        for sample in samples {
            let once = clean_sql(sample);
            assert_eq!(clean_sql(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn parents_after_from_and_join() {
        let cleaned = clean_sql("select * from users u join orders o on u.id = o.user_id");
        assert_eq!(extract_parents(&cleaned), set(&["orders", "users"]));
    }

    #[test]
    fn keyword_is_not_consumed_by_previous_token() {
        let cases: &[(&str, &[&str])] = &[
            ("select id, dbt_valid_from from customers_snapshot", &["customers_snapshot", "from"]),
            ("select a.id, a.valid_from\nfrom accounts a", &["accounts", "from"]),
            ("select x_join join t", &["join", "t"]),
            ("select a_from from t", &["from", "t"]),
            ("select * from from t", &["from", "t"]),
            ("select * from a join b on true", &["a", "b"]),
            ("select * fromage", &[]),
        ];

        for (sql, expected) in cases {
            assert_eq!(extract_parents(&clean_sql(sql)), set(expected), "for {:?}", sql);
        }
    }

    #[test]
    fn keyword_at_end_yields_nothing() {
        assert!(extract_parents("select 1 from ").is_empty());
        assert!(extract_parents("select 1 from").is_empty());
    }

    #[test]
    fn sql_parents_keep_table_after_from_suffixed_column() {
        let parents = sql_parents("select id, dbt_valid_from from customers_snapshot");
        assert!(parents.contains("customers_snapshot"));
    }

    #[test]
    fn parents_skip_generate_series() {
        let cleaned = clean_sql("select d from generate_series(1, 10) as d join days on true");
        assert_eq!(extract_parents(&cleaned), set(&["days"]));
    }

    #[test]
    fn ctes_are_collected() {
        let cleaned = clean_sql("with a as (select 1), b as ( select 2 ) select * from b");
        assert_eq!(extract_ctes(&cleaned), set(&["a", "b"]));
    }

    #[test]
    fn sql_parents_exclude_ctes() {
        let sql = "with recent as (select * from orders)\nselect * from recent join users on true";
        assert_eq!(sql_parents(sql), set(&["orders", "users"]));
    }

    #[test]
    fn sql_parents_strip_brackets_and_quotes() {
        let sql = r#"select * from [dbo].[users] join "analytics"."orders" on 1 = 1"#;
        assert_eq!(sql_parents(sql), set(&["analytics.orders", "dbo.users"]));
    }

    #[test]
    fn sql_parents_drop_subqueries() {
        let sql = "select * from (select id from accounts) t";
        assert_eq!(sql_parents(sql), set(&["accounts"]));
    }

    #[test]
    fn sql_parents_ignore_commented_references() {
        let sql = "select * from live_table -- join dead_table\n/* from old_table */";
        assert_eq!(sql_parents(sql), set(&["live_table"]));
    }

    #[test]
    fn empty_input_yields_no_parents() {
        assert!(sql_parents("").is_empty());
        assert!(sql_parents("select 1").is_empty());
    }
}
