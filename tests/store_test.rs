use serde_json::{Value, json};
use tempfile::TempDir;
use vakt::store::{LogReader, LogWriter};

fn record(n: usize) -> Value {
    json!({
        "timestamp": format!("2025-01-10T12:00:{:02}.000Z", n),
        "method": "GET",
        "endpoint": format!("/e{n}"),
        "statusCode": 200,
        "latencyMs": 5,
    })
}

fn prefix(temp: &TempDir) -> String {
    temp.path().join("observability").to_str().unwrap().to_string()
}

async fn seed(prefix: &str, max_entries: usize, count: usize) {
    let writer = LogWriter::new(prefix, max_entries);
    for n in 1..=count {
        writer.append(&record(n)).await.unwrap();
    }
}

#[tokio::test]
async fn writes_up_to_cap_stay_in_one_file() {
    let temp = TempDir::new().unwrap();
    seed(&prefix(&temp), 5, 5).await;

    let files: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(files.len(), 1);

    let content = std::fs::read_to_string(temp.path().join("observability_1.log")).unwrap();
    assert_eq!(content.lines().count(), 5);
}

#[tokio::test]
async fn write_past_cap_advances_to_file_two_with_count_one() {
    let temp = TempDir::new().unwrap();
    seed(&prefix(&temp), 5, 6).await;

    let second = std::fs::read_to_string(temp.path().join("observability_2.log")).unwrap();
    assert_eq!(second.lines().count(), 1);
}

#[tokio::test]
async fn read_all_is_newest_first_across_files() {
    let temp = TempDir::new().unwrap();
    let prefix = prefix(&temp);
    seed(&prefix, 2, 5).await;
    assert!(temp.path().join("observability_3.log").exists());

    let reader = LogReader::new(&prefix);
    let logs = reader.read_all().await;

    assert_eq!(logs.len(), 5);
    let endpoints: Vec<_> = logs.iter().map(|e| e.endpoint.as_str()).collect();
    assert_eq!(endpoints, ["/e5", "/e4", "/e3", "/e2", "/e1"]);
}

#[tokio::test]
async fn read_paginated_returns_exact_window() {
    let temp = TempDir::new().unwrap();
    let prefix = prefix(&temp);
    seed(&prefix, 2, 5).await;

    let reader = LogReader::new(&prefix);
    let page = reader.read_paginated(2, 2).await;

    let endpoints: Vec<_> = page.iter().map(|e| e.endpoint.as_str()).collect();
    assert_eq!(endpoints, ["/e3", "/e2"]);
}

#[tokio::test]
async fn read_paginated_past_end_is_empty() {
    let temp = TempDir::new().unwrap();
    let prefix = prefix(&temp);
    seed(&prefix, 2, 5).await;

    let reader = LogReader::new(&prefix);
    assert!(reader.read_paginated(4, 2).await.is_empty());
}

#[tokio::test]
async fn non_positive_page_params_fall_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let prefix = prefix(&temp);
    seed(&prefix, 10, 5).await;

    let reader = LogReader::new(&prefix);
    let logs = reader.read_paginated(0, 0).await;
    assert_eq!(logs.len(), 5);
    assert_eq!(logs[0].endpoint, "/e5");
}

#[tokio::test]
async fn malformed_lines_are_skipped() {
    let temp = TempDir::new().unwrap();
    let prefix = prefix(&temp);
    let path = temp.path().join("observability_1.log");
    let body = format!(
        "{}\nnot json at all\n{}\n",
        record(1).to_string(),
        record(2).to_string()
    );
    std::fs::write(&path, body).unwrap();

    let reader = LogReader::new(&prefix);
    let logs = reader.read_all().await;
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].endpoint, "/e2");
}

#[tokio::test]
async fn empty_directory_reads_empty() {
    let temp = TempDir::new().unwrap();
    let reader = LogReader::new(&prefix(&temp));
    assert!(reader.read_all().await.is_empty());
    assert!(reader.read_paginated(1, 10).await.is_empty());
}

#[tokio::test]
async fn restart_resumes_at_highest_index() {
    let temp = TempDir::new().unwrap();
    let prefix = prefix(&temp);
    seed(&prefix, 2, 3).await;

    // A new writer over the same directory continues file 2 and then
    // rotates to file 3, never restarting from file 1.
    seed(&prefix, 2, 2).await;

    let first = std::fs::read_to_string(temp.path().join("observability_1.log")).unwrap();
    let second = std::fs::read_to_string(temp.path().join("observability_2.log")).unwrap();
    let third = std::fs::read_to_string(temp.path().join("observability_3.log")).unwrap();
    assert_eq!(first.lines().count(), 2);
    assert_eq!(second.lines().count(), 2);
    assert_eq!(third.lines().count(), 1);
}

#[tokio::test]
async fn free_form_records_round_trip() {
    let temp = TempDir::new().unwrap();
    let prefix = prefix(&temp);
    let writer = LogWriter::new(&prefix, 10);
    writer
        .append(&json!({
            "timestamp": "2025-01-10T12:00:00.000Z",
            "service": "worker",
            "event": "tick",
        }))
        .await
        .unwrap();

    let reader = LogReader::new(&prefix);
    let logs = reader.read_all().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].extra["service"], "worker");
    assert_eq!(logs[0].status_code, 0);
}
