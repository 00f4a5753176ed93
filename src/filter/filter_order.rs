use super::error::FilterError;
use super::types::FilterOrderInfo;

pub struct FilterOrder;

impl FilterOrder {
    /// Listing order for works. The trailing id makes the order total, so
    /// consecutive pages never overlap or skip rows.
    pub fn works() -> Vec<FilterOrderInfo> {
        vec![
            FilterOrderInfo::desc("w.event_date"),
            FilterOrderInfo::desc("w.created_at"),
            FilterOrderInfo::desc("w.id"),
        ]
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> Result<String, FilterError> {
        if infos.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(infos.len());
        for info in infos {
            parts.push(format!("{} {}", Self::quote_column(&info.column)?, info.sort.to_sql()));
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }

    /// Quote `column` or `alias.column`, rejecting anything that is not a plain identifier.
    fn quote_column(column: &str) -> Result<String, FilterError> {
        let (alias, name) = match column.split_once('.') {
            Some((alias, name)) => (Some(alias), name),
            None => (None, column),
        };

        for part in alias.into_iter().chain(std::iter::once(name)) {
            let valid = part
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(FilterError::InvalidColumn(column.to_string()));
            }
        }

        Ok(match alias {
            Some(alias) => format!("{}.\"{}\"", alias, name),
            None => format!("\"{}\"", name),
        })
    }
}
