#![allow(dead_code)]

use std::path::Path;

use quarry::conf::Config;
use quarry::session::Session;
use quarry::table::Table;

/// Reads a file from disk into a fresh session with default settings.
pub async fn session_from_file(path: &Path) -> Session {
    let bytes = tokio::fs::read(path).await.unwrap();
    let mut session = Session::new(&Config::default());
    let name = path.file_name().unwrap().to_str().unwrap();
    session.upload(&bytes, name).unwrap();
    session
}

/// Column-wise rendered cells, for comparing tables loaded from different sources.
pub fn cells(table: &Table) -> Vec<Vec<Option<String>>> {
    table
        .column_names()
        .into_iter()
        .map(|name| table.display_values(name).unwrap())
        .collect()
}
