use crate::table::Table;

use super::TABLE_NAME;

/// A canned query offered next to the SQL editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    pub label: &'static str,
    pub sql: String,
}

/// Starter queries for the bound table. The group-by template uses the
/// table's first column, or a placeholder when none is known.
pub fn templates(table: Option<&Table>) -> Vec<QueryTemplate> {
    let group_column = table
        .and_then(|t| t.column_names().first().map(|c| quote_ident(c)))
        .unwrap_or_else(|| "column_name".to_string());

    vec![
        QueryTemplate {
            label: "Preview",
            sql: format!("SELECT * FROM {TABLE_NAME} LIMIT 100"),
        },
        QueryTemplate {
            label: "Describe",
            sql: format!("DESCRIBE {TABLE_NAME}"),
        },
        QueryTemplate {
            label: "Count Rows",
            sql: format!("SELECT COUNT(*) AS total_rows FROM {TABLE_NAME}"),
        },
        QueryTemplate {
            label: "Group By",
            sql: format!(
                "SELECT {group_column}, COUNT(*) AS total\nFROM {TABLE_NAME}\nGROUP BY {group_column}\nORDER BY total DESC"
            ),
        },
    ]
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
