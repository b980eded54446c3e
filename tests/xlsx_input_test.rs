use anyhow::Result;
use secret_santa::adapters::{parse_participants, parse_prior_assignments, Table};
use secret_santa::domain::model::ColumnNames;
use secret_santa::{AssignmentRow, CliConfig, DrawPipeline, DrawRunner, LocalStorage};
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> Result<Table> {
    let path = fixture(name);
    let data = std::fs::read(&path)?;
    Ok(Table::from_bytes(path.to_str().unwrap(), &data)?)
}

#[test]
fn test_xlsx_roster_headers_and_rows() -> Result<()> {
    let table = read_fixture("Employee-List.xlsx")?;

    assert_eq!(
        table.headers(),
        &["Employee_Name", "Employee_EmailID", "Employee_ID"]
    );
    assert_eq!(table.rows().len(), 4);
    assert_eq!(table.rows()[0], vec!["Alice", "alice@example.com", "1001"]);

    // 整數值的數字儲存格不帶小數點，非整數照原樣
    let ids: Vec<&str> = table.rows().iter().map(|r| r[2].as_str()).collect();
    assert_eq!(ids, vec!["1001", "1002", "1003", "7.5"]);

    Ok(())
}

#[test]
fn test_xlsx_empty_sheet_is_empty_table() -> Result<()> {
    let table = read_fixture("empty.xlsx")?;

    assert_eq!(table, Table::default());
    assert!(table.headers().is_empty());
    assert!(table.rows().is_empty());

    Ok(())
}

#[test]
fn test_xlsx_participants_and_previous_results() -> Result<()> {
    let columns = ColumnNames::default();

    let roster = read_fixture("Employee-List.xlsx")?;
    let participants = parse_participants(&roster, "Employee-List.xlsx", &columns)?;
    let names: Vec<&str> = participants.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol", "Dave"]);
    assert_eq!(participants[3].address(), "dave@example.com");

    let results = read_fixture("Secret-Santa-Game-Result-2023.xlsx")?;
    let prior =
        parse_prior_assignments(&results, "Secret-Santa-Game-Result-2023.xlsx", &columns)?;
    assert_eq!(prior.len(), 4);
    assert_eq!(prior.receiver_for("Alice"), Some("Bob"));
    assert_eq!(prior.receiver_for("Bob"), Some("Carol"));
    assert_eq!(prior.receiver_for("Carol"), Some("Dave"));
    assert_eq!(prior.receiver_for("Dave"), Some("Alice"));

    Ok(())
}

#[tokio::test]
async fn test_draw_from_xlsx_inputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("output");

    let config = CliConfig {
        participants: fixture("Employee-List.xlsx").to_str().unwrap().to_string(),
        previous: Some(
            fixture("Secret-Santa-Game-Result-2023.xlsx")
                .to_str()
                .unwrap()
                .to_string(),
        ),
        output_path: output_dir.to_str().unwrap().to_string(),
        output_formats: vec!["csv".to_string()],
        output_name: Some("Secret-Santa-Assignments-2024".to_string()),
        max_attempts: 1000,
        seed: Some(11),
        timeout_seconds: None,
        verbose: false,
        log_file: None,
    };
    let runner = DrawRunner::new(DrawPipeline::new(LocalStorage::default(), config));
    runner.run().await?;

    let mut reader = csv::Reader::from_path(output_dir.join("Secret-Santa-Assignments-2024.csv"))?;
    let rows = reader
        .deserialize::<AssignmentRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let givers: Vec<&str> = rows.iter().map(|r| r.giver_name.as_str()).collect();
    assert_eq!(givers, vec!["Alice", "Bob", "Carol", "Dave"]);

    let last_year = [
        ("Alice", "Bob"),
        ("Bob", "Carol"),
        ("Carol", "Dave"),
        ("Dave", "Alice"),
    ];
    for row in &rows {
        assert_ne!(row.giver_name, row.receiver_name);
        assert!(!last_year.contains(&(row.giver_name.as_str(), row.receiver_name.as_str())));
    }

    Ok(())
}
