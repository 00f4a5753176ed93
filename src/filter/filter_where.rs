use serde_json::{json, Value};

use super::types::{Visibility, WorkFilter, YearScope};

/// Builds the WHERE clause of a works listing with positional `$n` parameters.
pub struct FilterWhere {
    param_values: Vec<Value>,
    conditions: Vec<String>,
}

impl FilterWhere {
    fn new() -> Self {
        Self {
            param_values: vec![],
            conditions: vec![],
        }
    }

    /// `current_year` anchors the `recent` / `previous` year scopes.
    pub fn generate(filter: &WorkFilter, current_year: i32) -> (String, Vec<Value>) {
        let mut filter_where = Self::new();
        filter_where.build(filter, current_year);

        let where_clause = if filter_where.conditions.is_empty() {
            "1=1".to_string()
        } else {
            filter_where.conditions.join(" AND ")
        };
        (where_clause, filter_where.param_values)
    }

    fn build(&mut self, filter: &WorkFilter, current_year: i32) {
        if filter.visibility == Visibility::ActiveOnly {
            self.conditions.push("w.\"is_active\" = TRUE".to_string());
        }

        if let Some(category_id) = filter.category_id {
            let p = self.param(json!(category_id));
            self.conditions.push(format!("w.\"category_id\" = {}", p));
        }

        if let Some(search) = filter.search.as_deref() {
            let p = self.param(json!(Self::like_pattern(search)));
            self.conditions.push(format!(
                "(w.\"title\" ILIKE {p} ESCAPE '\\' OR w.\"description\" ILIKE {p} ESCAPE '\\')"
            ));
        }

        if let Some(scope) = filter.year {
            let p = self.param(json!(current_year));
            let op = match scope {
                YearScope::Recent => "=",
                YearScope::Previous => "<",
            };
            self.conditions.push(format!(
                "EXTRACT(YEAR FROM w.\"event_date\")::bigint {} {}",
                op, p
            ));
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }

    /// Substring pattern in which `%`, `_` and `\` match literally.
    pub fn like_pattern(term: &str) -> String {
        let mut escaped = String::with_capacity(term.len() + 2);
        escaped.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_listing_only_sees_active() {
        let (sql, params) = FilterWhere::generate(&WorkFilter::public(), 2026);
        assert_eq!(sql, "w.\"is_active\" = TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn admin_listing_without_filters_is_unrestricted() {
        let (sql, params) = FilterWhere::generate(&WorkFilter::admin(), 2026);
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn category_and_recent_year_bind_in_order() {
        let filter = WorkFilter {
            category_id: Some(5),
            year: Some(YearScope::Recent),
            ..WorkFilter::public()
        };
        let (sql, params) = FilterWhere::generate(&filter, 2026);

        assert!(sql.contains("w.\"category_id\" = $1"));
        assert!(sql.contains("EXTRACT(YEAR FROM w.\"event_date\")::bigint = $2"));
        assert_eq!(params, vec![json!(5), json!(2026)]);
    }

    #[test]
    fn previous_year_is_strictly_earlier() {
        let filter = WorkFilter {
            year: Some(YearScope::Previous),
            ..WorkFilter::public()
        };
        let (sql, _) = FilterWhere::generate(&filter, 2026);
        assert!(sql.ends_with("::bigint < $1"));
    }

    #[test]
    fn search_covers_title_and_description_with_one_param() {
        let filter = WorkFilter {
            search: Some("logo".to_string()),
            ..WorkFilter::admin()
        };
        let (sql, params) = FilterWhere::generate(&filter, 2026);

        assert!(sql.contains("w.\"title\" ILIKE $1"));
        assert!(sql.contains("w.\"description\" ILIKE $1"));
        assert_eq!(params, vec![json!("%logo%")]);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(FilterWhere::like_pattern("100%_off"), "%100\\%\\_off%");
        assert_eq!(FilterWhere::like_pattern("a\\b"), "%a\\\\b%");
    }
}
