//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tutorkit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("tutorkit").unwrap()
}

const CURRICULUM: &str = r#"{
    "title": "Security Basics",
    "chapters": [
        {
            "id": "chapter-1",
            "title": "Passwords",
            "short_title": "Passwords",
            "sections": [
                {
                    "id": "1.1",
                    "title": "Why Length Matters",
                    "content": [
                        {"kind": "heading", "text": "Length beats complexity", "level": 2},
                        {"kind": "paragraph", "text": "Every extra character multiplies the search space."},
                        {"kind": "list", "items": ["use 12+ characters", "avoid reuse"]}
                    ]
                },
                {
                    "id": "1.2",
                    "title": "Managers",
                    "content": [
                        {"kind": "paragraph", "text": "A manager remembers so you do not have to."}
                    ]
                }
            ]
        }
    ]
}"#;

/// Write a curriculum and a mock-provider config into a temp dir.
fn workspace_with(mock_response: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("curriculum.json"), CURRICULUM).unwrap();
    std::fs::write(
        dir.path().join("tutorkit.toml"),
        format!(
            r#"
default_provider = "mock"

[providers.mock]
type = "mock"
response = '{mock_response}'
"#
        ),
    )
    .unwrap();
    dir
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("curriculum.json"), CURRICULUM).unwrap();
    dir
}

#[test]
fn help_output() {
    tutorkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("security-awareness curriculum"));
}

#[test]
fn version_output() {
    tutorkit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tutorkit"));
}

#[test]
fn validate_clean_curriculum() {
    let dir = workspace();
    tutorkit()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 chapters, 2 sections"))
        .stdout(predicate::str::contains("Curriculum valid"));
}

#[test]
fn validate_reports_diagnostic_nodes() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("curriculum.json"),
        r#"{
            "title": "Broken",
            "chapters": [
                {"id": "c1", "title": "A", "sections": [
                    {"id": "s1", "title": "One", "content": [{"kind": "hologram"}]}
                ]}
            ]
        }"#,
    )
    .unwrap();

    tutorkit()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("unsupported content kind"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_missing_curriculum_fails() {
    let dir = TempDir::new().unwrap();
    tutorkit()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn show_lists_chapter_sections() {
    let dir = workspace();
    tutorkit()
        .current_dir(dir.path())
        .args(["show", "chapter-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1  Why Length Matters"))
        .stdout(predicate::str::contains("1.2  Managers"));
}

#[test]
fn show_renders_a_section() {
    let dir = workspace();
    tutorkit()
        .current_dir(dir.path())
        .args(["show", "chapter-1", "1.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Length beats complexity"))
        .stdout(predicate::str::contains("multiplies the search space"))
        .stdout(predicate::str::contains("- use 12+ characters"));
}

#[test]
fn show_unknown_chapter_fails() {
    let dir = workspace();
    tutorkit()
        .current_dir(dir.path())
        .args(["show", "chapter-9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no chapter chapter-9"));
}

#[test]
fn status_shows_progress_table() {
    let dir = workspace();
    tutorkit()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Passwords"))
        .stdout(predicate::str::contains("0/2"))
        .stdout(predicate::str::contains("not started"))
        .stdout(predicate::str::contains("Overall: 0/2"));
}

#[test]
fn master_toggles_and_persists() {
    let dir = workspace();

    tutorkit()
        .current_dir(dir.path())
        .args(["master", "chapter-1", "1.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked chapter-1/1.1 as mastered"));

    // The flag survives into a fresh invocation.
    tutorkit()
        .current_dir(dir.path())
        .args(["show", "chapter-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Why Length Matters [mastered]"));

    tutorkit()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2"))
        .stdout(predicate::str::contains("in progress"));

    // Toggling again clears it.
    tutorkit()
        .current_dir(dir.path())
        .args(["master", "chapter-1", "1.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared mastery for chapter-1/1.1"));
}

#[test]
fn master_unknown_section_fails() {
    let dir = workspace();
    tutorkit()
        .current_dir(dir.path())
        .args(["master", "chapter-1", "9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no section chapter-1/9.9"));
}

#[test]
fn enrich_prints_takeaways() {
    let dir = workspace_with(r#"{"key_takeaways": ["Length wins", "Never reuse"]}"#);
    tutorkit()
        .current_dir(dir.path())
        .args(["enrich", "chapter-1", "1.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Key takeaways:"))
        .stdout(predicate::str::contains("- Length wins"))
        .stdout(predicate::str::contains("- Never reuse"));
}

#[test]
fn enrich_scenario_kind() {
    let dir = workspace_with(
        r#"{"practical_scenario": {"description": "A colleague asks for your password.", "guidance": "Decline politely."}}"#,
    );
    tutorkit()
        .current_dir(dir.path())
        .args(["enrich", "chapter-1", "1.1", "--kind", "scenario"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Practical scenario:"))
        .stdout(predicate::str::contains("Decline politely."));
}

#[test]
fn enrich_rejects_unknown_kind() {
    let dir = workspace_with("{}");
    tutorkit()
        .current_dir(dir.path())
        .args(["enrich", "chapter-1", "1.1", "--kind", "essay"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown artifact kind"));
}

#[test]
fn enrich_fails_on_malformed_response() {
    let dir = workspace_with("Sure! Here are some takeaways...");
    tutorkit()
        .current_dir(dir.path())
        .args(["enrich", "chapter-1", "1.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("generation failed"));
}

#[test]
fn enrich_without_provider_fails() {
    // No tutorkit.toml: show/status/master still work, but enrich needs a provider.
    let dir = workspace();
    tutorkit()
        .current_dir(dir.path())
        .env_remove("TUTORKIT_GEMINI_KEY")
        .env("HOME", dir.path())
        .args(["enrich", "chapter-1", "1.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn ask_prints_the_answer() {
    let dir = workspace_with("Aim for at least twelve characters.");
    tutorkit()
        .current_dir(dir.path())
        .args(["ask", "chapter-1", "1.1", "How long should a password be?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at least twelve characters"));
}
