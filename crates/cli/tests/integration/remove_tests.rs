use predicates::prelude::*;

use super::common::{SAMPLE_MANIFEST, TestEnv};

#[test]
fn remove_deletes_files_record_and_empty_directories() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.write_file("Server/bin/server", "srv");
  env.write_file("Server/keep/user.cfg", "mine");
  env.write_record("core-server", "S1 10 core-database\nServer/bin/server\n");
  env.write_file("Data/db.sqlite", "db");
  env.write_record("core-database", "D1 5\nData/db.sqlite\n");

  env
    .fpm_cmd()
    .args(["remove", "core-server", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1 component(s) will be removed"))
    .stdout(predicate::str::contains("Successfully removed 1 component(s)"));

  let root = env.root_path();
  assert!(!root.join("Server/bin").exists());
  assert!(root.join("Server/keep/user.cfg").exists());
  assert!(env.read_record("core-server").is_none());

  // Dependencies are left alone.
  assert!(root.join("Data/db.sqlite").exists());
  assert!(env.read_record("core-database").is_some());
}

#[test]
fn remove_never_installed_component_is_notice_only() {
  let mut env = TestEnv::new();
  env.serve_manifest(r#"<component id="foo" hash="F" install-size="3"/>"#);
  env.write_file("untouched.txt", "x");

  env
    .fpm_cmd()
    .args(["remove", "foo", "--yes"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Component foo is not downloaded and will be skipped"))
    .stdout(predicate::str::contains("No components to remove"));

  assert!(env.root_path().join("untouched.txt").exists());
  assert!(!env.root_path().join("Components").exists());
}

#[test]
fn remove_requires_an_argument() {
  let env = TestEnv::new();

  env.fpm_cmd().arg("remove").assert().failure();
}

#[test]
fn remove_refuses_paths_outside_root() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  std::fs::write(env.temp.path().join("outside.txt"), "precious").unwrap();
  env.write_record("core-database", "D1 5\n../outside.txt\n");

  env
    .fpm_cmd()
    .args(["remove", "core-database", "--yes"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Refused to delete ../outside.txt"));

  assert!(env.temp.path().join("outside.txt").exists());
  assert!(env.read_record("core-database").is_none());
}
