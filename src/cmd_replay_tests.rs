use super::*;
use paramscope_core::parse_har;

const HAR: &str = r#"{
  "log": {
    "version": "1.2",
    "entries": [
      {
        "request": {"method": "OPTIONS", "url": "https://h/api/login", "headers": []},
        "response": {"status": 204, "statusText": "", "headers": []}
      },
      {
        "request": {"method": "GET", "url": "https://h/", "headers": []},
        "response": {
          "status": 200, "statusText": "OK",
          "headers": [{"name": "Content-Type", "value": "text/html"}],
          "content": {"size": 900, "mimeType": "text/html", "text": "<html></html>"}
        }
      },
      {
        "request": {
          "method": "POST", "url": "https://h/api/login",
          "headers": [{"name": "Cookie", "value": "sid=1"}],
          "postData": {"mimeType": "application/json", "text": "{\"user\":\"a\",\"pw\":\"b\"}"}
        },
        "response": {
          "status": 200, "statusText": "OK", "headers": [],
          "content": {"size": 11, "mimeType": "application/json", "text": "{\"ok\":true}"}
        }
      },
      {
        "request": {"method": "GET", "url": "https://h/ajax/feed?page=2", "headers": []},
        "response": {"status": 200, "statusText": "OK", "headers": [], "content": {"size": 2048}}
      }
    ]
  }
}"#;

async fn run(search: Option<&str>, select: Option<usize>) -> String {
    let exchanges = parse_har(HAR).unwrap();
    let out = replay(exchanges, search.map(str::to_string), select, Vec::new())
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_replay_lists_relevant_only() {
    let out = run(None, None).await;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("POST"));
    assert!(lines[0].ends_with("/api/login"));
    assert!(lines[1].contains("2KB"));
    assert!(lines[1].ends_with("/ajax/feed"));
}

#[tokio::test]
async fn test_replay_select_shows_details() {
    let out = run(None, Some(1)).await;
    assert!(out.contains("== Request Payload ==\nuser:a\npw:b\n"));
    assert!(out.contains("  Cookie: sid=1"));
    assert!(out.contains("== Response Preview (JSON) ==\n{\n  \"ok\": true\n}"));
    assert!(out.contains("== Response ==\n{\"ok\":true}\n"));
}

#[tokio::test]
async fn test_replay_search_then_select() {
    let out = run(Some("ajax"), Some(1)).await;
    assert!(out.contains("-- 1 matching \"ajax\" --"));
    assert!(out.contains("== Query String ==\n  page: 2\n"));
    assert!(out.contains(crate::render::NO_CONTENT));
}

#[tokio::test]
async fn test_replay_select_out_of_range() {
    let out = run(None, Some(9)).await;
    assert!(out.contains("No row 9 (2 shown)"));
    let out = run(None, Some(0)).await;
    assert!(out.contains("No row 0 (2 shown)"));
}

#[tokio::test]
async fn test_run_replay_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.har");
    std::fs::write(&path, HAR).unwrap();
    assert!(run_replay(&path, None, None).await.is_ok());
    assert!(run_replay(&dir.path().join("missing.har"), None, None).await.is_err());
}
