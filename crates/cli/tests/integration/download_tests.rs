use predicates::prelude::*;

use super::common::{SAMPLE_MANIFEST, TestEnv};

#[test]
fn download_installs_closure_and_writes_records() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.serve_archive("core-database", &[("db.sqlite", "db")]);
  env.serve_archive("core-server", &[("bin/server", "srv"), ("conf/server.ini", "ini")]);

  env
    .fpm_cmd()
    .args(["download", "core-server", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("2 component(s) will be downloaded"))
    .stdout(predicate::str::contains("Successfully downloaded 2 component(s)"));

  let root = env.root_path();
  assert_eq!(std::fs::read_to_string(root.join("Server/bin/server")).unwrap(), "srv");
  assert_eq!(std::fs::read_to_string(root.join("Data/db.sqlite")).unwrap(), "db");

  let record = env.read_record("core-server").unwrap();
  assert_eq!(
    record.lines().collect::<Vec<_>>(),
    vec!["S1 10 core-database", "Server/bin/server", "Server/conf/server.ini"]
  );
}

#[test]
fn download_skips_installed_components() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.write_record("core-database", "D1 5\n");
  env.serve_archive("core-server", &[("bin/server", "srv")]);

  env
    .fpm_cmd()
    .args(["download", "core-server", "-y"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1 component(s) will be downloaded"));
}

#[test]
fn download_unknown_target_reports_notice() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);

  env
    .fpm_cmd()
    .args(["download", "nonexistent", "--yes"])
    .assert()
    .success()
    .stderr(predicate::str::contains(
      "Component or category nonexistent does not exist and will be skipped",
    ))
    .stdout(predicate::str::contains("No components to download"));
}

#[test]
fn download_requires_confirmation_when_not_interactive() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);

  env
    .fpm_cmd()
    .args(["download", "extra"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("non-interactive"));

  assert!(env.read_record("extra-music").is_none());
}

#[test]
fn download_failure_continues_and_exits_nonzero() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.serve_archive("core-database", &[("db.sqlite", "db")]);

  env
    .fpm_cmd()
    .args(["download", "core-server", "--yes"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to download core-server"))
    .stderr(predicate::str::contains("1 component(s) failed"));

  assert!(env.read_record("core-server").is_none());
  assert!(env.read_record("core-database").is_some());
}

#[test]
fn unreachable_source_is_fatal() {
  let env = TestEnv::new();
  env.write_settings("http://127.0.0.1:1/components.xml");

  env
    .fpm_cmd()
    .args(["download", "--yes"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Error fetching components"));
}
