//! Shared test helpers for CLI integration tests.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A small catalog: three required components and one optional one.
pub const SAMPLE_MANIFEST: &str = r#"
  <category id="core">
    <component id="base" title="Base" install-size="0"/>
    <component id="database" title="Database" hash="D1" path="Data" install-size="5" download-size="3"/>
    <component id="server" title="Server" hash="S1" path="Server" install-size="10" download-size="4"
      depends="core-database"/>
  </category>
  <category id="extra">
    <component id="music" title="Music" description="Soundtracks" hash="M1" path="Music" install-size="7"
      depends="core-server" date-modified="1700000000"/>
  </category>
"#;

/// Build a zip archive from `(name, contents)` pairs.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
  let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
  for (name, contents) in entries {
    writer.start_file(*name, SimpleFileOptions::default()).unwrap();
    writer.write_all(contents.as_bytes()).unwrap();
  }
  writer.finish().unwrap().into_inner()
}

/// Isolated test environment.
///
/// Each test gets its own install root, settings file and component server.
pub struct TestEnv {
  pub temp: TempDir,
  pub server: mockito::ServerGuard,
  mocks: Vec<mockito::Mock>,
}

impl TestEnv {
  /// Create an environment whose settings point at a fresh local server.
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
      server: mockito::Server::new(),
      mocks: Vec::new(),
    };
    env.write_settings(&env.source_url());
    env
  }

  /// Install root (isolated per test).
  pub fn root_path(&self) -> PathBuf {
    let p = self.temp.path().join("root");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn config_path(&self) -> PathBuf {
    self.temp.path().join("fpm.cfg")
  }

  pub fn source_url(&self) -> String {
    format!("{}/components.xml", self.server.url())
  }

  pub fn write_settings(&self, source_url: &str) {
    let content = format!("{}\n{}\n", self.root_path().display(), source_url);
    std::fs::write(self.config_path(), content).unwrap();
  }

  /// Serve a manifest whose root wraps `body`.
  pub fn serve_manifest(&mut self, body: &str) {
    let xml = format!(r#"<list url="{}/repo">{}</list>"#, self.server.url(), body);
    let mock = self.server.mock("GET", "/components.xml").with_body(xml).create();
    self.mocks.push(mock);
  }

  /// Serve the archive for component `id`.
  pub fn serve_archive(&mut self, id: &str, entries: &[(&str, &str)]) {
    let mock = self
      .server
      .mock("GET", format!("/repo/{}.zip", id).as_str())
      .with_body(zip_archive(entries))
      .create();
    self.mocks.push(mock);
  }

  /// Answer requests for component `id`'s archive with HTTP 404.
  pub fn serve_missing_archive(&mut self, id: &str) {
    let mock = self
      .server
      .mock("GET", format!("/repo/{}.zip", id).as_str())
      .with_status(404)
      .create();
    self.mocks.push(mock);
  }

  /// Write a file relative to the install root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root_path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Pretend `id` was installed with `record` as its installation record.
  pub fn write_record(&self, id: &str, record: &str) {
    self.write_file(&format!("Components/{}", id), record);
  }

  pub fn read_record(&self, id: &str) -> Option<String> {
    std::fs::read_to_string(self.root_path().join("Components").join(id)).ok()
  }

  /// Get a pre-configured Command for the fpm binary.
  ///
  /// `FPM_CONFIG` points at the isolated settings file.
  pub fn fpm_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("fpm");
    cmd.env("FPM_CONFIG", self.config_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
