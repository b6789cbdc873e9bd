use predicates::prelude::*;

use super::common::{SAMPLE_MANIFEST, TestEnv};

#[test]
fn update_on_empty_tree_downloads_required_components() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.serve_archive("core-database", &[("db.sqlite", "db")]);
  env.serve_archive("core-server", &[("bin/server", "srv")]);

  env
    .fpm_cmd()
    .args(["update", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("3 component(s) will be downloaded"))
    .stdout(predicate::str::contains("nothing to install"))
    .stdout(predicate::str::contains("extra-music").not());

  // Zero-size components never get a record.
  assert!(env.read_record("core-base").is_none());
  assert!(env.read_record("core-database").is_some());
  assert!(env.read_record("core-server").is_some());
  assert!(env.read_record("extra-music").is_none());
}

#[test]
fn update_replaces_stale_component() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.serve_archive("core-server", &[("bin/server", "new")]);
  env.write_file("Server/bin/server", "old");
  env.write_file("Server/legacy.dll", "old");
  env.write_record("core-server", "OLD 4 core-database\nServer/bin/server\nServer/legacy.dll\n");
  env.write_record("core-database", "D1 5\n");

  env
    .fpm_cmd()
    .args(["update", "core-server", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1 component(s) will be updated"))
    .stdout(predicate::str::contains("Estimated changed size: 6 B"));

  let root = env.root_path();
  assert_eq!(std::fs::read_to_string(root.join("Server/bin/server")).unwrap(), "new");
  assert!(!root.join("Server/legacy.dll").exists());
  assert!(env.read_record("core-server").unwrap().starts_with("S1 10 core-database\n"));
}

#[test]
fn update_current_component_is_notice_only() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.write_record("core-server", "S1 10\n");

  env
    .fpm_cmd()
    .args(["update", "core-server", "--yes"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Component core-server is already up-to-date"))
    .stdout(predicate::str::contains("No components to update"));
}

#[test]
fn update_downloads_missing_dependency_of_stale_component() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.serve_archive("core-server", &[("bin/server", "new")]);
  env.serve_archive("core-database", &[("db.sqlite", "db")]);
  env.write_record("core-server", "OLD 10\n");

  env
    .fpm_cmd()
    .args(["update", "core-server", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("1 component(s) will be updated"))
    .stdout(predicate::str::contains("1 component(s) will be downloaded"))
    .stdout(predicate::str::contains("and downloaded 1 component(s)"));

  assert!(env.read_record("core-database").is_some());
}

#[test]
fn update_summary_counts_only_successful_reinstalls() {
  let mut env = TestEnv::new();
  env.serve_manifest(SAMPLE_MANIFEST);
  env.serve_missing_archive("core-server");
  env.write_file("Server/bin/server", "old");
  env.write_record("core-server", "OLD 4 core-database\nServer/bin/server\n");
  env.write_record("core-database", "D1 5\n");

  env
    .fpm_cmd()
    .args(["update", "core-server", "--yes"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("1 component(s) will be updated"))
    .stdout(predicate::str::contains("Successfully updated 0 component(s)"))
    .stderr(predicate::str::contains("Failed to download core-server"))
    .stderr(predicate::str::contains("HTTP 404"))
    .stderr(predicate::str::contains("1 component(s) failed"));

  assert!(env.read_record("core-server").is_none());
}
