// ABOUTME: Integration tests for the pagekind CLI binary.
// ABOUTME: Tests HTML file classification, fetch mode, and batch mode with persisted output.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const ARTICLE: &str = "<html><body><p>The quick brown fox jumps over the lazy dog</p></body></html>";
const CLOSE_CALL: &str = r#"<p>Balanced enough prose to read as content</p><a href="/more">More</a>"#;

fn pagekind_cmd() -> Command {
    Command::cargo_bin("pagekind").unwrap()
}

fn index_page() -> String {
    let links: String = ["Home", "About", "Blog", "News", "Contact", "Shop", "Events", "Careers", "Press", "Help"]
        .iter()
        .map(|label| format!(r#"<a href="/{0}">{0}</a>"#, label))
        .collect();
    format!("<html><body><div>{}</div><p>Hello world</p></body></html>", links)
}

#[test]
fn classify_html_file_content_page() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("article.html");
    fs::write(&html_path, ARTICLE).unwrap();

    pagekind_cmd()
        .arg("--html")
        .arg(&html_path)
        .assert()
        .success()
        .stdout(predicate::str::diff("content page\n"));
}

#[test]
fn classify_html_file_list_page() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("index.html");
    fs::write(&html_path, index_page()).unwrap();

    pagekind_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/section/")
        .assert()
        .success()
        .stdout(predicate::str::diff("https://example.com/section/: list page\n"));
}

#[test]
fn home_url_flips_close_call() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, CLOSE_CALL).unwrap();

    pagekind_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("http://example.com/2019/story.html")
        .assert()
        .success()
        .stdout(predicate::str::contains("content page"));

    pagekind_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("http://example.com/home/")
        .assert()
        .success()
        .stdout(predicate::str::contains("list page"));

    pagekind_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("http://example.com/home/")
        .arg("--home-bonus")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("content page"));
}

#[test]
fn json_output_includes_scores() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, CLOSE_CALL).unwrap();

    let output = pagekind_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["label"], "content_page");
    assert_eq!(report["scores"]["text_text"], 30.0);
    assert_eq!(report["scores"]["link_link"], 3.0);
    assert_eq!(report["link_nodes"], 1);
}

#[test]
fn empty_html_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("empty.html");
    fs::write(&html_path, "").unwrap();

    pagekind_cmd()
        .arg("--html")
        .arg(&html_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("document is empty"));
}

#[test]
fn no_input_fails() {
    pagekind_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("provide --html FILE"));
}

#[test]
fn conflicting_modes_fail() {
    pagekind_cmd()
        .arg("--html")
        .arg("page.html")
        .arg("http://example.com/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn fetch_mode_classifies_urls() {
    let server = MockServer::start();

    let article = server.mock(|when, then| {
        when.method(GET).path("/story");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(ARTICLE);
    });
    let index = server.mock(|when, then| {
        when.method(GET).path("/section/");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(index_page());
    });

    let story_url = server.url("/story");
    let index_url = server.url("/section/");

    pagekind_cmd()
        .arg(&story_url)
        .arg(&index_url)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{}: content page", story_url)))
        .stdout(predicate::str::contains(format!("{}: list page", index_url)));

    article.assert();
    index.assert();
}

#[test]
fn fetch_mode_reports_decode_failure() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/latin");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(b"<p>caf\xe9 au lait with enough words</p>".to_vec());
    });

    pagekind_cmd()
        .arg(server.url("/latin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed decoding html"));
}

#[test]
fn batch_mode_persists_predictions_and_errors() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/story");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(ARTICLE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/section/");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(index_page());
    });
    server.mock(|when, then| {
        when.method(GET).path("/blank");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body("   ");
    });

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("urls.txt");
    let predict = temp_dir.path().join("predict.txt");
    let errors = temp_dir.path().join("errors.txt");

    let story_url = server.url("/story");
    let index_url = server.url("/section/");
    let blank_url = server.url("/blank");
    fs::write(
        &input,
        format!(
            "http://skipped.invalid/\t1\n{}\t2\nnot a url\t3\n{}\t4\n{}\t5\n",
            story_url, blank_url, index_url
        ),
    )
    .unwrap();

    pagekind_cmd()
        .arg("--input")
        .arg(&input)
        .arg("--skip")
        .arg("1")
        .arg("--batch-size")
        .arg("2")
        .arg("--output")
        .arg(&predict)
        .arg("--error-log")
        .arg(&errors)
        .assert()
        .success()
        .stdout(predicate::str::contains("processed 4 urls: 2 classified, 2 failed"));

    assert_eq!(
        fs::read_to_string(&predict).unwrap(),
        format!("{}: content page\n{}: list page\n", story_url, index_url)
    );

    let log = fs::read_to_string(&errors).unwrap();
    assert!(log.contains("not a url: invalid url\t"));
    assert!(log.contains(&format!("{}: failed parsing html\tdocument is empty", blank_url)));
    assert!(!log.contains("skipped.invalid"));
}
