// foodshare-core/src/domain/filter.rs

use crate::domain::report::Cell;

/// Selection value meaning "no filter" in the browsing views.
pub const ALL: &str = "All";

/// Conjunction of equality predicates with bound values.
///
/// Column expressions are `&'static str` so only code can name them; callers
/// only ever contribute values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    conditions: Vec<&'static str>,
    params: Vec<Cell>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = ?` unless the value is absent, blank or "All".
    pub fn eq(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim)
            && !v.is_empty()
            && !v.eq_ignore_ascii_case(ALL)
        {
            self.conditions.push(column);
            self.params.push(Cell::from(v));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// `" WHERE a = ? AND b = ?"`, or an empty string.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        let predicates: Vec<String> = self
            .conditions
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect();
        format!(" WHERE {}", predicates.join(" AND "))
    }

    pub fn params(&self) -> &[Cell] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Cell> {
        self.params
    }
}
