use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn podtrust(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("podtrust").expect("binary should compile");
    cmd.env_remove("RUST_LOG")
        .env_remove("PODTRUST_ANALYSIS_KEY")
        .arg("--root")
        .arg(root);
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("fixture should write");
    path
}

const HYDERABAD_USER: &str = r#"{
  "techStack": ["React", "Node.js"],
  "location": { "cityName": "Hyderabad" }
}"#;

const PODS: &str = r#"[
  {
    "id": "hyd",
    "name": "Campus Marketplace",
    "description": "Buy and sell textbooks",
    "creatorName": "Asha",
    "skillsNeeded": ["React", "Node.js", "MongoDB"],
    "teamSize": 4,
    "memberCount": 1,
    "city": "hyderabad",
    "location": null,
    "createdAt": "2024-03-01T10:00:00Z"
  },
  {
    "id": "ber",
    "name": "Data Notebook",
    "description": "Shared notebooks for analysts",
    "creatorName": "Jonas",
    "skillsNeeded": ["Python", "Pandas"],
    "teamSize": 3,
    "memberCount": 2,
    "city": "Berlin",
    "location": null,
    "createdAt": "2024-05-01T10:00:00Z"
  }
]"#;

#[test]
fn match_ranks_same_city_pod_first() {
    let dir = TempDir::new().expect("temp dir should be created");
    let user = write(&dir, "user.json", HYDERABAD_USER);
    let pods = write(&dir, "pods.json", PODS);

    podtrust(dir.path())
        .arg("match")
        .arg("--user")
        .arg(&user)
        .arg("--pods")
        .arg(&pods)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""matchScore": 87"#))
        .stdout(predicate::str::contains(r#""matchScore": 18"#));
}

#[test]
fn match_markdown_lists_pod_names() {
    let dir = TempDir::new().expect("temp dir should be created");
    let user = write(&dir, "user.json", HYDERABAD_USER);
    let pods = write(&dir, "pods.json", PODS);

    podtrust(dir.path())
        .arg("match")
        .arg("--user")
        .arg(&user)
        .arg("--pods")
        .arg(&pods)
        .args(["--format", "md"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Campus Marketplace"));
}

#[test]
fn match_city_filter_drops_other_cities() {
    let dir = TempDir::new().expect("temp dir should be created");
    let user = write(&dir, "user.json", HYDERABAD_USER);
    let pods = write(&dir, "pods.json", PODS);

    podtrust(dir.path())
        .arg("match")
        .arg("--user")
        .arg(&user)
        .arg("--pods")
        .arg(&pods)
        .args(["--city", "Berlin"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Data Notebook"))
        .stdout(predicate::str::contains("Campus Marketplace").not());
}

#[test]
fn match_radius_without_coordinates_exits_with_code_2() {
    let dir = TempDir::new().expect("temp dir should be created");
    let user = write(&dir, "user.json", HYDERABAD_USER);
    let pods = write(&dir, "pods.json", PODS);

    podtrust(dir.path())
        .arg("match")
        .arg("--user")
        .arg(&user)
        .arg("--pods")
        .arg(&pods)
        .args(["--within-km", "25"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn malformed_pods_file_exits_with_code_2() {
    let dir = TempDir::new().expect("temp dir should be created");
    let user = write(&dir, "user.json", HYDERABAD_USER);
    let pods = write(&dir, "pods.json", "[{ \"id\": ");

    podtrust(dir.path())
        .arg("match")
        .arg("--user")
        .arg(&user)
        .arg("--pods")
        .arg(&pods)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("json error"));
}

#[test]
fn invalid_config_stops_before_matching() {
    let dir = TempDir::new().expect("temp dir should be created");
    write(
        &dir,
        "podtrust.toml",
        r#"
[matching]
location_weight = 0.9
tech_weight = 0.4
"#,
    );
    let user = write(&dir, "user.json", HYDERABAD_USER);
    let pods = write(&dir, "pods.json", PODS);

    podtrust(dir.path())
        .arg("match")
        .arg("--user")
        .arg(&user)
        .arg("--pods")
        .arg(&pods)
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight"));
}

#[test]
fn quiz_show_caps_questions_at_seven() {
    let dir = TempDir::new().expect("temp dir should be created");

    let output = podtrust(dir.path())
        .args(["quiz", "show", "--skill", "Django", "--seed", "3"])
        .output()
        .expect("quiz show should run");
    assert!(output.status.success());

    let body: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("quiz show should print json");
    assert_eq!(body["language"], "python");
    let questions = body["questions"]
        .as_array()
        .expect("questions should be a list");
    assert_eq!(questions.len(), 7);
    assert!(questions.iter().all(|q| q.get("answer").is_none()));
}

#[test]
fn quiz_submit_without_answers_is_not_passed() {
    let dir = TempDir::new().expect("temp dir should be created");

    podtrust(dir.path())
        .args(["quiz", "submit", "--skill", "React", "--seed", "1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""passed": false"#))
        .stdout(predicate::str::contains(r#""required": 5"#));
}

#[test]
fn quiz_submit_with_extra_answers_exits_with_code_2() {
    let dir = TempDir::new().expect("temp dir should be created");

    podtrust(dir.path())
        .args([
            "quiz",
            "submit",
            "--skill",
            "React",
            "--answers",
            "0,0,0,0,0,0,0,0,0",
        ])
        .assert()
        .code(2);
}

const PYTHON_SOLUTION: &str = "def sum_even_numbers(numbers):
    total = 0
    for n in numbers:
        if n % 2 == 0:
            total += n
    return total
";

#[test]
fn coding_test_accepts_structured_python() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(&dir, "solution.py", PYTHON_SOLUTION);

    podtrust(dir.path())
        .args(["coding-test", "--language", "python", "--file"])
        .arg(&file)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""passed": true"#));
}

#[test]
fn coding_test_rejects_hardcoded_python() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(&dir, "solution.py", "def sum_even_numbers(numbers):\n    return 12\n");

    podtrust(dir.path())
        .args(["coding-test", "--language", "python", "--file"])
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("hardcoded"));
}

#[test]
fn coding_test_rejects_unsupported_language() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(&dir, "solution.rb", "def sum_even_numbers(n) end");

    podtrust(dir.path())
        .args(["coding-test", "--language", "ruby", "--file"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported coding test language"));
}

#[test]
fn coding_test_without_node_is_runtime_failure() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(
        &dir,
        "solution.js",
        "function sumEvenNumbers(numbers) {\n  let total = 0;\n  for (const n of numbers) {\n    if (n % 2 === 0) total += n;\n  }\n  return total;\n}\n",
    );

    podtrust(dir.path())
        .args(["coding-test", "--language", "javascript", "--node", "/nonexistent/node", "--file"])
        .arg(&file)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("cannot start"));
}

#[test]
fn certificate_without_credentials_is_runtime_failure() {
    let dir = TempDir::new().expect("temp dir should be created");
    let image = dir.path().join("cert.png");
    fs::write(&image, [0x89, 0x50, 0x4e, 0x47]).expect("image should write");

    podtrust(dir.path())
        .args(["certificate", "--skills", "Docker", "--image"])
        .arg(&image)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("PODTRUST_ANALYSIS_KEY"));
}

#[test]
fn normalize_empty_file_is_fully_human() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(&dir, "notes.txt", "   \n");

    podtrust(dir.path())
        .args(["normalize", "--file"])
        .arg(&file)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""aiPercent": 0"#))
        .stdout(predicate::str::contains(r#""humanPercent": 100"#))
        .stdout(predicate::str::contains("empty_content"));
}

#[test]
fn normalize_binary_file_counts_as_empty() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = dir.path().join("logo.png");
    fs::write(&file, [0x89, 0x50, 0x00, 0x47]).expect("binary should write");

    podtrust(dir.path())
        .args(["normalize", "--file"])
        .arg(&file)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""humanPercent": 100"#));
}

#[test]
fn normalize_without_credentials_falls_back_to_human() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(
        &dir,
        "app.js",
        "export function greet(name) {\n  return `Hello, ${name}!`;\n}\n",
    );

    podtrust(dir.path())
        .args(["normalize", "--file"])
        .arg(&file)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""humanPercent": 100"#))
        .stdout(predicate::str::contains("fallback"));
}

#[test]
fn normalize_rescales_manual_split() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(&dir, "notes.txt", "anything");

    podtrust(dir.path())
        .args(["normalize", "--ai", "70", "--human", "20", "--file"])
        .arg(&file)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""aiPercent": 78"#))
        .stdout(predicate::str::contains(r#""humanPercent": 22"#))
        .stdout(predicate::str::contains("manual"));
}

const CONTRIBUTIONS: &str = r#"[
  { "fileId": "f1", "podId": "pod-a", "userId": "zoe", "aiPercent": 20, "humanPercent": 80 },
  { "fileId": "f2", "podId": "pod-a", "userId": "amir", "aiPercent": 0, "humanPercent": 100 },
  { "fileId": "f3", "podId": "pod-a", "userId": "amir", "aiPercent": 60, "humanPercent": 40 },
  { "fileId": "f4", "podId": "pod-b", "userId": "amir", "aiPercent": 100, "humanPercent": 0 }
]"#;

#[test]
fn aggregate_pod_scope_reports_per_user() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(&dir, "contributions.json", CONTRIBUTIONS);

    let output = podtrust(dir.path())
        .args(["aggregate", "--pod", "pod-a", "--contributions"])
        .arg(&file)
        .output()
        .expect("aggregate should run");
    assert!(output.status.success());

    let body: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("aggregate should print json");
    assert_eq!(body["totalFiles"], 3);
    assert_eq!(body["avgAi"], 27);
    assert_eq!(body["avgHuman"], 73);
    assert_eq!(body["perUser"][0]["userId"], "amir");
    assert_eq!(body["perUser"][0]["totalFiles"], 2);
}

#[test]
fn aggregate_unknown_user_uses_human_default() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(&dir, "contributions.json", CONTRIBUTIONS);

    podtrust(dir.path())
        .args(["aggregate", "--user", "nobody", "--contributions"])
        .arg(&file)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""totalFiles": 0"#))
        .stdout(predicate::str::contains(r#""avgHuman": 100"#));
}

#[test]
fn aggregate_rejects_unnormalized_records() {
    let dir = TempDir::new().expect("temp dir should be created");
    let file = write(
        &dir,
        "contributions.json",
        r#"[{ "fileId": "f1", "podId": "pod-a", "userId": "zoe", "aiPercent": 200, "humanPercent": 7 }]"#,
    );

    podtrust(dir.path())
        .args(["aggregate", "--contributions"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must sum to 100"));
}

#[test]
fn coding_test_run_limit_comes_from_config() {
    let dir = TempDir::new().expect("temp dir should be created");
    write(
        &dir,
        "podtrust.toml",
        r#"
[verification]
run_timeout_secs = 0
"#,
    );
    let file = write(&dir, "solution.py", PYTHON_SOLUTION);

    podtrust(dir.path())
        .args(["coding-test", "--language", "python", "--file"])
        .arg(&file)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("run_timeout_secs"));
}
