mod common;

use rstest::rstest;

use common::{cells, session_from_file};
use quarry::core::{ColumnKind, QuarryError};
use quarry::loader::TableLoader;
use quarry::testutil::{PEOPLE_CSV, people_table, sequence_csv, sequence_table, write_temp_file};

const MIXED_CSV: &str = "\
name,when,active,note
ann,2024-01-05,true,\"plain\"
bob,2024-02-29 13:45:00,false,\"has, comma\"
cy,,TRUE,\"two
lines\"
dee,2023-12-31,,\"say \"\"hi\"\"\"
";

#[tokio::test]
async fn test_people_file_matches_fixture() {
    let (_dir, path) = write_temp_file("people.csv", PEOPLE_CSV.as_bytes());
    let session = session_from_file(&path).await;
    assert_eq!(session.table(), Some(&people_table()));
    assert_eq!(session.dataset_name(), Some("people.csv"));
}

#[test]
fn test_sequence_csv_matches_fixture() {
    let loader = TableLoader::default();
    let table = loader.load(sequence_csv(30).as_bytes(), "seq.csv").unwrap();
    assert_eq!(table, sequence_table(30));
}

#[test]
fn test_mixed_kinds_are_inferred() {
    let table = TableLoader::default()
        .load(MIXED_CSV.as_bytes(), "mixed.csv")
        .unwrap();
    assert_eq!(
        table.kinds(),
        &[
            ColumnKind::Text,
            ColumnKind::Datetime,
            ColumnKind::Boolean,
            ColumnKind::Text
        ]
    );
    assert_eq!(table.null_count("when").unwrap(), 1);
    assert_eq!(table.null_count("active").unwrap(), 1);
    assert_eq!(
        table.display_values("note").unwrap()[2].as_deref(),
        Some("two\nlines")
    );
}

#[rstest]
#[case::people(PEOPLE_CSV)]
#[case::mixed(MIXED_CSV)]
#[case::header_only("a,b\n")]
fn test_export_then_load_round_trips(#[case] csv: &str) {
    let loader = TableLoader::default();
    let table = loader.load(csv.as_bytes(), "input.csv").unwrap();
    let exported = table.to_csv_bytes().unwrap();
    let reloaded = loader.load(&exported, "output.csv").unwrap();

    assert_eq!(reloaded.column_names(), table.column_names());
    assert_eq!(reloaded.num_rows(), table.num_rows());
    assert_eq!(cells(&reloaded), cells(&table));
}

#[rstest]
#[case::ragged("a,b\n1,2\n3\n")]
#[case::too_wide("a,b\n1,2,3\n")]
#[case::empty("")]
fn test_malformed_csv_is_parse_error(#[case] csv: &str) {
    let err = TableLoader::default().load(csv.as_bytes(), "bad.csv");
    assert!(matches!(err, Err(QuarryError::Parse(_))), "got {err:?}");
}

#[rstest]
#[case::xlsx("members.xlsx", include_bytes!("data/members.xlsx").as_slice())]
#[case::ods("members.ods", include_bytes!("data/members.ods").as_slice())]
fn test_spreadsheet_first_sheet(#[case] name: &str, #[case] bytes: &[u8]) {
    let table = TableLoader::default().load(bytes, name).unwrap();

    assert_eq!(table.column_names(), vec!["id", "name", "joined", "score"]);
    assert_eq!(
        table.kinds(),
        &[
            ColumnKind::Integer,
            ColumnKind::Text,
            ColumnKind::Datetime,
            ColumnKind::Float
        ]
    );
    assert_eq!(table.num_rows(), 3);
    assert_eq!(
        table.display_values("name").unwrap(),
        vec![Some("ann".to_string()), None, Some("cy".to_string())]
    );
    assert_eq!(
        table.display_values("joined").unwrap(),
        vec![
            Some("2024-01-01T00:00:00".to_string()),
            Some("2024-02-01T12:00:00".to_string()),
            None
        ]
    );
    assert_eq!(
        table.display_values("score").unwrap(),
        vec![Some("2.5".to_string()), None, Some("4.0".to_string())]
    );
}
