use predicates::prelude::*;

use super::common::{SAMPLE_MANIFEST, TestEnv};

#[test]
fn list_marks_install_state() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.write_record("core-database", "D1 5\n");
  env.write_record("core-server", "OLD 8 core-database\n");

  env
    .fpm_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("* core-database"))
    .stdout(predicate::str::contains("! core-server"))
    .stdout(predicate::str::contains("  extra-music"));
}

#[test]
fn list_filters_by_state() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.write_record("core-database", "D1 5\n");
  env.write_record("core-server", "OLD 8\n");

  env
    .fpm_cmd()
    .args(["list", "updates"])
    .assert()
    .success()
    .stdout(predicate::str::contains("core-server"))
    .stdout(predicate::str::contains("core-database").not());

  env
    .fpm_cmd()
    .args(["list", "available"])
    .assert()
    .success()
    .stdout(predicate::str::contains("extra-music"))
    .stdout(predicate::str::contains("core-server").not());
}

#[test]
fn list_long_shows_titles() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);

  env
    .fpm_cmd()
    .args(["list", "--long"])
    .assert()
    .success()
    .stdout(predicate::str::contains("extra-music (Music)"));
}

#[test]
fn list_json_output_is_valid() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);

  let output = env.fpm_cmd().args(["list", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let components = value.as_array().unwrap();
  assert_eq!(components.len(), 4);
  assert_eq!(components[0]["id"], "core-base");
  assert_eq!(components[0]["state"], "not_installed");
}

#[test]
fn list_empty_catalog_explains() {
  let mut env = TestEnv::new();
  env.serve_manifest("");

  env
    .fpm_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("No components found"));
}

#[test]
fn info_shows_component_details() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);

  env
    .fpm_cmd()
    .args(["info", "extra-music"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Soundtracks"))
    .stdout(predicate::str::contains("2023-11-14T22:13:20Z"))
    .stdout(predicate::str::contains("core-server"))
    .stdout(predicate::str::contains("Required: No"))
    .stdout(predicate::str::contains("Downloaded: No"))
    .stdout(predicate::str::contains("Up-to-date").not());
}

#[test]
fn info_json_includes_state() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.write_record("core-server", "OLD 8\n");

  let output = env.fpm_cmd().args(["info", "core-server", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["state"], "stale");
  assert_eq!(value["previous_install_size"], 8);
  assert_eq!(value["dependencies"][0], "core-database");
}

#[test]
fn info_unknown_component_fails() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);

  env
    .fpm_cmd()
    .args(["info", "core"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn truncated_manifest_is_fatal() {
  let mut env = TestEnv::new();
  let xml = r#"<list url="http://127.0.0.1:1/repo"><category id="core"><component id="a"/>"#;
  let _mock = env.server.mock("GET", "/components.xml").with_body(xml).create();

  env
    .fpm_cmd()
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Error fetching components"))
    .stdout(predicate::str::contains("core-a").not());
}
