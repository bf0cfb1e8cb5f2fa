//! Integration tests for the `reorder` CLI.
//!
//! Each test copies the fixture tree into a temp directory, runs `reorder`
//! as a subprocess there, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

fn reorder_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_reorder"))
}

/// Copy the fixture tree into `root` as `tree.json`.
fn create_test_tree(root: &Path) -> PathBuf {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/home.json");
    let path = root.join("tree.json");
    fs::copy(&fixture, &path).unwrap();
    path
}

/// Run `reorder` with the given args in the given directory, returning (stdout, stderr, success).
fn run_reorder(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(reorder_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run reorder");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `reorder` expecting success, return stdout.
fn run_reorder_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_reorder(dir, args);
    if !success {
        panic!(
            "reorder {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `reorder` expecting failure, return stderr.
fn run_reorder_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_reorder(dir, args);
    if success {
        panic!("reorder {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

/// Child ids of `parent` in the saved tree (`None` = the root list).
fn saved_children(path: &Path, parent: Option<&str>) -> Vec<String> {
    let doc: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    fn find<'a>(tasks: &'a [Value], id: &str) -> Option<&'a Value> {
        tasks.iter().find_map(|t| {
            if t["_id"] == id {
                Some(t)
            } else {
                find(t["subtasks"].as_array().map_or(&[][..], |v| v.as_slice()), id)
            }
        })
    }
    let tasks = doc["tasks"].as_array().unwrap();
    let list = match parent {
        None => tasks.as_slice(),
        Some(id) => find(tasks, id)
            .and_then(|t| t["subtasks"].as_array())
            .map_or(&[][..], |v| v.as_slice()),
    };
    list.iter()
        .map(|t| t["_id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_show_outline() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());

    let out = run_reorder_ok(tmp.path(), &["show", "tree.json"]);
    assert_eq!(
        out,
        "== Home (p1) ==\n[ ] A Groceries\n  [ ] B Milk\n    [ ] D Oat milk\n  [x] C Bread\n[ ] E Laundry\n"
    );
}

#[test]
fn test_show_json_is_the_document() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());

    let out = run_reorder_ok(tmp.path(), &["show", "tree.json", "--json"]);
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["_id"], "p1");
    assert_eq!(parsed["tasks"][0]["subtasks"][1]["_id"], "C");
    assert_eq!(parsed["tasks"][0]["subtasks"][1]["isDone"], true);
}

#[test]
fn test_last_tree_is_remembered() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());

    run_reorder_ok(tmp.path(), &["show", "tree.json"]);
    let out = run_reorder_ok(tmp.path(), &["show"]);
    assert!(out.contains("Groceries"));
    assert!(tmp.path().join(".reorder-state.json").exists());
}

#[test]
fn test_no_tree_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_reorder_err(tmp.path(), &["show"]);
    assert!(err.contains("error: no tree file given"));
}

#[test]
fn test_check_valid_and_invalid() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_tree(tmp.path());

    let out = run_reorder_ok(tmp.path(), &["check", "tree.json"]);
    assert!(out.contains("✓ tree is valid"));

    let broken = fs::read_to_string(&path)
        .unwrap()
        .replace(r#""parentId": "B""#, r#""parentId": "A""#);
    fs::write(&path, broken).unwrap();
    let out = run_reorder_ok(tmp.path(), &["check", "tree.json", "--json"]);
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["valid"], false);
    assert_eq!(parsed["errors"][0]["type"], "parent_mismatch");
    assert_eq!(parsed["errors"][0]["task_id"], "D");
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

#[test]
fn test_mv_after_sibling() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_tree(tmp.path());

    let out = run_reorder_ok(tmp.path(), &["mv", "B", "C", "--tree", "tree.json"]);
    assert_eq!(out, "moved B: A[0] -> A[1]\n  C -> A[0]\n  B -> A[1]\n");
    assert_eq!(saved_children(&path, Some("A")), vec!["C", "B"]);
    // Subtree travels along
    assert_eq!(saved_children(&path, Some("B")), vec!["D"]);
}

#[test]
fn test_mv_into_container() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_tree(tmp.path());

    let out = run_reorder_ok(tmp.path(), &["mv", "B", "@E", "--tree", "tree.json", "--json"]);
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["intent"]["itemId"], "B");
    assert_eq!(parsed["intent"]["oldParentId"], "A");
    assert_eq!(parsed["intent"]["newParentId"], "E");
    assert_eq!(parsed["applied"], true);
    assert_eq!(saved_children(&path, Some("E")), vec!["B"]);
    assert_eq!(saved_children(&path, Some("A")), vec!["C"]);
}

#[test]
fn test_mv_into_own_subtree_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_tree(tmp.path());
    let before = fs::read_to_string(&path).unwrap();

    let err = run_reorder_err(tmp.path(), &["mv", "A", "D", "--tree", "tree.json"]);
    assert!(err.contains("cannot drop A on D"));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_mv_unknown_item_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());

    let err = run_reorder_err(tmp.path(), &["mv", "Z", "C", "--tree", "tree.json"]);
    assert!(err.contains("item not found: Z"));
}

#[test]
fn test_mv_noop() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());

    let out = run_reorder_ok(tmp.path(), &["mv", "E", "@root", "--tree", "tree.json"]);
    assert_eq!(out, "E is already there\n");
}

#[test]
fn test_mv_noop_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());

    let out = run_reorder_ok(
        tmp.path(),
        &["--json", "mv", "C", "B", "--offset", "0.9", "--tree", "tree.json"],
    );
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert!(parsed["intent"].is_null());
    assert_eq!(parsed["applied"], false);
    assert_eq!(parsed["updates"].as_array().unwrap().len(), 0);
}

#[test]
fn test_mv_dry_run_leaves_file_alone() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_tree(tmp.path());
    let before = fs::read_to_string(&path).unwrap();

    let out = run_reorder_ok(
        tmp.path(),
        &["mv", "E", "A", "--offset", "0.1", "--tree", "tree.json", "--dry-run"],
    );
    assert_eq!(out, "would move E: root[1] -> root[0]\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_policy_override_and_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());

    // Midpoint: the lower half of B is where C already is
    let out = run_reorder_ok(
        tmp.path(),
        &["mv", "C", "B", "--offset", "0.9", "--tree", "tree.json", "--dry-run"],
    );
    assert_eq!(out, "C is already there\n");

    let out = run_reorder_ok(
        tmp.path(),
        &[
            "mv", "C", "B", "--offset", "0.9", "--tree", "tree.json", "--dry-run", "--policy",
            "before",
        ],
    );
    assert_eq!(out, "would move C: A[1] -> A[0]\n");

    let out = run_reorder_ok(tmp.path(), &["config", "--set-policy", "before"]);
    assert!(out.contains("policy: before"));
    let config = fs::read_to_string(tmp.path().join("reorder.toml")).unwrap();
    assert!(config.contains("policy = \"before\""));

    let out = run_reorder_ok(tmp.path(), &["mv", "C", "B", "--offset", "0.9", "--dry-run"]);
    assert_eq!(out, "would move C: A[1] -> A[0]\n");
}

#[test]
fn test_config_rejects_bad_threshold() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_reorder_err(tmp.path(), &["config", "--threshold", "2"]);
    assert!(err.contains("threshold 2 outside"));
    assert!(!tmp.path().join("reorder.toml").exists());
}

#[test]
fn test_undo_and_history() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_tree(tmp.path());
    let original = saved_children(&path, Some("A"));

    run_reorder_ok(tmp.path(), &["mv", "B", "C", "--tree", "tree.json"]);
    let history = run_reorder_ok(tmp.path(), &["history"]);
    assert!(history.contains("B: A[0] -> A[1]"));

    let out = run_reorder_ok(tmp.path(), &["undo"]);
    assert!(out.starts_with("undid B: A[0] -> A[1]\n"));
    assert_eq!(saved_children(&path, Some("A")), original);

    let err = run_reorder_err(tmp.path(), &["undo"]);
    assert!(err.contains("nothing to undo"));
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[test]
fn test_replay_reports_each_gesture() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());
    fs::write(
        tmp.path().join("drag.txt"),
        "start B\nover D\nover C 0.8\ndrop C\n",
    )
    .unwrap();

    let out = run_reorder_ok(tmp.path(), &["replay", "drag.txt", "--tree", "tree.json"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("started"));
    assert!(lines[1].ends_with("invalid target"));
    assert!(lines[2].ends_with("valid target"));
    assert!(lines[3].ends_with("would move B: A[0] -> A[1]"));
}

#[test]
fn test_replay_apply_saves_and_records() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_tree(tmp.path());
    fs::write(
        tmp.path().join("drag.txt"),
        "start E\nover A 0.2\ndrop A\nstart D\nover @root\ndrop @root\n",
    )
    .unwrap();

    let out = run_reorder_ok(
        tmp.path(),
        &["replay", "drag.txt", "--tree", "tree.json", "--apply", "--json"],
    );
    let steps: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(steps.as_array().unwrap().len(), 6);
    assert_eq!(steps[2]["outcome"], "moved");
    assert_eq!(steps[2]["intent"]["newIndex"], 0);
    assert_eq!(saved_children(&path, None), vec!["E", "A", "D"]);

    let history: Value =
        serde_json::from_str(&run_reorder_ok(tmp.path(), &["history", "--json"])).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[test]
fn test_replay_parse_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_tree(tmp.path());
    fs::write(tmp.path().join("drag.txt"), "start B\nwiggle C\n").unwrap();

    let err = run_reorder_err(tmp.path(), &["replay", "drag.txt", "--tree", "tree.json"]);
    assert!(err.contains("line 2: unknown gesture 'wiggle'"));
}
