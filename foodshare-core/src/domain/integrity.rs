// foodshare-core/src/domain/integrity.rs

use serde::Serialize;

use crate::domain::schema::TableName;

pub const SAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Reference,
    Uniqueness,
}

/// One post-load rule. `violations_sql` selects the offending ids.
#[derive(Debug, Clone)]
pub struct IntegrityRule {
    pub name: String,
    pub table: TableName,
    pub kind: CheckKind,
    pub violations_sql: String,
}

impl IntegrityRule {
    fn reference(
        table: TableName,
        column: &str,
        parent: TableName,
    ) -> IntegrityRule {
        let pk = table.primary_key();
        let parent_pk = parent.primary_key();
        IntegrityRule {
            name: format!("{}.{} -> {}", table, column, parent),
            table,
            kind: CheckKind::Reference,
            violations_sql: format!(
                "SELECT child.{pk} FROM {table} child \
                 LEFT JOIN {parent} parent ON child.{column} = parent.{parent_pk} \
                 WHERE parent.{parent_pk} IS NULL",
                pk = pk,
                table = table.name(),
                parent = parent.name(),
                column = column,
                parent_pk = parent_pk,
            ),
        }
    }

    fn unique_key(table: TableName) -> IntegrityRule {
        let pk = table.primary_key();
        IntegrityRule {
            name: format!("{}.{} unique", table, pk),
            table,
            kind: CheckKind::Uniqueness,
            violations_sql: format!(
                "SELECT {pk} FROM {table} GROUP BY {pk} HAVING COUNT(*) > 1",
                pk = pk,
                table = table.name(),
            ),
        }
    }

    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM ({}) violations", self.violations_sql)
    }

    pub fn sample_sql(&self) -> String {
        format!(
            "SELECT * FROM ({}) violations ORDER BY 1 LIMIT {}",
            self.violations_sql, SAMPLE_LIMIT
        )
    }
}

/// Reference rules first, then one uniqueness rule per table.
pub fn rules() -> Vec<IntegrityRule> {
    let mut rules = vec![
        IntegrityRule::reference(TableName::FoodListings, "provider_id", TableName::Providers),
        IntegrityRule::reference(TableName::Claims, "food_id", TableName::FoodListings),
        IntegrityRule::reference(TableName::Claims, "receiver_id", TableName::Receivers),
    ];
    rules.extend(TableName::LOAD_ORDER.into_iter().map(IntegrityRule::unique_key));
    rules
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityFinding {
    pub check: String,
    pub table: TableName,
    pub kind: CheckKind,
    pub violations: i64,
    pub sample_ids: Vec<i64>,
}

impl IntegrityFinding {
    pub fn passed(&self) -> bool {
        self.violations == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntegrityReport {
    pub findings: Vec<IntegrityFinding>,
    /// Rules that could not run (missing table, engine error).
    pub skipped: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.findings.iter().all(IntegrityFinding::passed)
    }

    pub fn violations(&self) -> impl Iterator<Item = &IntegrityFinding> {
        self.findings.iter().filter(|f| !f.passed())
    }

    pub fn total_violations(&self) -> i64 {
        self.findings.iter().map(|f| f.violations).sum()
    }
}
