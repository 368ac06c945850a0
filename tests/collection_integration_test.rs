use ruprobe::collection::RequestTemplate;
use ruprobe::http::{Client, Method};
use ruprobe::runner::{CollectionRunner, RunSummary};
use ruprobe::session::Session;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn collection_file(base_url: &str) -> String {
    json!({
        "collections": {
            "users": [
                {
                    "name": "list",
                    "method": "GET",
                    "url": "{{$base}}/users",
                    "headers": {"Accept": "application/json"},
                    "params": {},
                    "body": "",
                    "auth": ["", ""],
                    "test_assertions": [
                        {"type": "status_code", "expected": "200"},
                        {"type": "json_path", "expected": "[0].name == Alice"}
                    ]
                },
                {
                    "name": "missing",
                    "method": "GET",
                    "url": "{{$base}}/missing",
                    "test_assertions": [{"type": "status_code", "expected": 200}]
                }
            ]
        },
        "environment_variables": {"base": base_url}
    })
    .to_string()
}

/// 导出文件可以原样导入
#[test]
fn test_export_import_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("export.json");

    let mut session = Session::new();
    session.set_variable("host", "api.test");
    session.collections.create_collection("c").unwrap();
    let mut template = RequestTemplate::new("create", Method::Post, "{{$host}}/items");
    template.body = r#"{"a": 1}"#.to_string();
    session.collections.save_to_active(template).unwrap();
    session.export_to_file(&file).unwrap();

    let mut restored = Session::new();
    restored.import_from_file(&file).unwrap();

    assert_eq!(restored.export_all(), session.export_all());
    assert_eq!(restored.collections.active(), Some("c"));
}

/// 导入失败时不修改任何状态
#[test]
fn test_import_is_atomic() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("broken.json");
    fs::write(
        &file,
        r#"{
            "collections": {
                "good": [{"name": "a", "url": "x"}],
                "bad": [{"name": "b", "url": "y", "test_assertions": [{"type": "header_value", "expected": "no colon"}]}]
            },
            "environment_variables": {"k": "v"}
        }"#,
    )
    .unwrap();

    let mut session = Session::new();
    assert!(session.import_from_file(&file).is_err());
    assert!(session.collections.is_empty());
    assert!(session.environment.is_empty());
}

#[test]
fn test_import_later_file_wins() {
    let mut session = Session::new();
    session
        .import_all(r#"{"collections": {"c": [{"name": "a", "url": "x"}]}, "environment_variables": {"k": "1"}}"#)
        .unwrap();
    session
        .import_all(r#"{"collections": {"c": [{"name": "b", "url": "y"}]}, "environment_variables": {"k": "2"}}"#)
        .unwrap();

    let names: Vec<_> = session
        .collections
        .get("c")
        .unwrap()
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, vec!["b"]);
    assert_eq!(session.environment.get("k"), Some("2"));
}

#[tokio::test]
async fn test_run_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Alice"}])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut session = Session::new();
    session.import_all(&collection_file(&mock_server.uri())).unwrap();

    let runner = CollectionRunner::new(Client::new().unwrap());
    let entries = runner.run_collection(&mut session, "users").await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].request.name, "list");
    assert!(entries[0].assertion_results.iter().all(|r| r.passed));
    assert_eq!(entries[1].response.status_code, Some(404));

    let summary = RunSummary::from_entries(&entries);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total_assertions, 3);
    assert_eq!(summary.failed_assertions, 1);

    // 运行结果同样进入历史，最新的在前
    assert_eq!(session.history.len(), 2);
    assert_eq!(session.history.get(0).unwrap().request.name, "missing");
}

#[tokio::test]
async fn test_run_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = Session::new();
    session.import_all(&collection_file(&mock_server.uri())).unwrap();

    let runner = CollectionRunner::new(Client::new().unwrap());
    let entry = runner.run_one(&mut session, "users", 1).await.unwrap();
    assert!(entry.assertion_results[0].passed);

    assert!(runner.run_one(&mut session, "users", 5).await.is_err());
    assert!(runner.run_collection(&mut session, "nope").await.is_err());
}
