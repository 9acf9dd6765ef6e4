use assert_cmd::Command;
use serde_json::json;

fn shelf(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", config_dir).env_remove("SHELF_ENV");
    cmd
}

#[test]
fn check_reports_record_count() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("books.json");
    let books = json!([
        { "book_id": "1", "title": "Go in Action" },
        { "book_id": "2", "title": "Docker Deep Dive" }
    ]);
    std::fs::write(&data_file, books.to_string()).unwrap();

    let assert = shelf(dir.path())
        .args(["check", "--data-file"])
        .arg(&data_file)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.starts_with("2 books"), "{stdout}");
}

#[test]
fn check_treats_missing_file_as_empty() {
    let dir = tempfile::tempdir().unwrap();

    let assert = shelf(dir.path())
        .args(["check", "--data-file"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.starts_with("0 books"), "{stdout}");
}

#[test]
fn check_fails_on_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("books.json");
    let books = json!([{ "book_id": "1" }, { "book_id": "1" }]);
    std::fs::write(&data_file, books.to_string()).unwrap();

    let assert = shelf(dir.path())
        .args(["check", "--data-file"])
        .arg(&data_file)
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("duplicate book ids: 1"), "{stderr}");
}

#[test]
fn check_fails_on_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("books.json");
    std::fs::write(&data_file, "[{").unwrap();

    shelf(dir.path())
        .args(["check", "--data-file"])
        .arg(&data_file)
        .assert()
        .failure();
}
