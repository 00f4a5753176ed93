use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, Pagination, SqlResult, WorkFilter};

/// Column list for a works row joined with its category name.
pub const WORK_SELECT: &str = "w.id, w.title, w.category_id, c.name AS category_name, \
     w.description, w.event_date, w.thumbnail_image, w.content_images, \
     w.is_active, w.view_count, w.created_at, w.updated_at";

const WORK_FROM: &str = "works w LEFT JOIN work_categories c ON c.id = w.category_id";

/// A paginated, filtered works listing rendered to parameterized SQL.
pub struct Filter {
    where_data: WorkFilter,
    order_data: Vec<FilterOrderInfo>,
    pagination: Option<Pagination>,
    current_year: i32,
}

impl Filter {
    pub fn works(where_data: WorkFilter, current_year: i32) -> Self {
        Self {
            where_data,
            order_data: FilterOrder::works(),
            pagination: None,
            current_year,
        }
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, self.current_year);
        let order_clause = FilterOrder::generate(&self.order_data)?;
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT {}", WORK_SELECT),
            format!("FROM {}", WORK_FROM),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, self.current_year);
        SqlResult {
            query: format!("SELECT COUNT(*) AS count FROM works w WHERE {}", where_clause),
            params,
        }
    }

    fn build_limit_clause(&self) -> String {
        match self.pagination {
            Some(p) => format!("LIMIT {} OFFSET {}", p.limit, p.offset()),
            None => String::new(),
        }
    }
}
