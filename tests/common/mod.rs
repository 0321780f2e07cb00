//! Shared fixtures for integration tests
//!
//! A [`SiteFixture`] lays out a site on disk: config records, file
//! descriptors with their blobs, and a temp directory for artifacts.

#![allow(dead_code)]

use sitepack::config::loader::parse_config;
use sitepack::config::SitepackConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LOGO: &str = "11111111-1111-4111-8111-111111111111";
pub const HERO: &str = "22222222-2222-4222-8222-222222222222";
pub const MANUAL: &str = "33333333-3333-4333-8333-333333333333";

pub struct SiteFixture {
    pub root: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("config")).unwrap();
        fs::create_dir_all(root.path().join("files")).unwrap();
        fs::create_dir_all(root.path().join("tmp")).unwrap();
        Self { root }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    pub fn files_dir(&self) -> PathBuf {
        self.root.path().join("files")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.path().join("tmp")
    }

    pub fn sync_dir(&self) -> PathBuf {
        self.root.path().join("sync")
    }

    /// Write `<name>.yml` into the config directory
    pub fn add_config(&self, name: &str, yaml: &str) -> &Self {
        fs::write(self.config_dir().join(format!("{name}.yml")), yaml).unwrap();
        self
    }

    /// Write a file descriptor and its blob
    pub fn add_file(&self, uuid: &str, filename: &str, bytes: &[u8]) -> &Self {
        let descriptor = format!(
            "uuid: {uuid}\nfilename: {filename}\ncreated: 1700000000\nfilemime: application/octet-stream\nfilesize: {}\n",
            bytes.len()
        );
        fs::write(self.files_dir().join(format!("{uuid}.yml")), descriptor).unwrap();
        fs::write(self.files_dir().join(filename), bytes).unwrap();
        self
    }

    /// A config record whose content depends on the given files
    pub fn add_config_with_files(&self, name: &str, files: &[&str]) -> &Self {
        let mut yaml = format!("label: {name}\ndependencies:\n  content:\n");
        for uuid in files {
            yaml.push_str(&format!("    - 'file:file:{uuid}'\n"));
        }
        self.add_config(name, &yaml)
    }

    /// A package definition record; `members` is the settings JSON object
    pub fn add_package(&self, id: &str, members: &str) -> &Self {
        let yaml = format!(
            "type: site_package\nlabel: {id}\nsettings: '{}'\n",
            members.replace('\'', "''")
        );
        self.add_config(&format!("sitepack.package.{id}"), &yaml)
    }

    pub fn config_toml(&self, chunk_size: usize) -> String {
        format!(
            r#"
[site]
name = "Test Site"

[source]
config_dir = "{}"
files_dir = "{}"

[export]
full_export_limit = {chunk_size}
temp_dir = "{}"
sync_directory = "{}"
"#,
            self.config_dir().display(),
            self.files_dir().display(),
            self.temp_dir().display(),
            self.sync_dir().display(),
        )
    }

    pub fn config(&self, chunk_size: usize) -> SitepackConfig {
        parse_config(&self.config_toml(chunk_size)).unwrap()
    }

    /// Write the configuration file and return its path
    pub fn write_config_file(&self, chunk_size: usize) -> PathBuf {
        let path = self.root.path().join("sitepack.toml");
        fs::write(&path, self.config_toml(chunk_size)).unwrap();
        path
    }
}

/// Read one member of a `.tar.gz` artifact as text
pub fn read_member(artifact: &Path, member: &str) -> Option<String> {
    use std::io::Read;

    let file = fs::File::open(artifact).unwrap();
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        if entry.path().unwrap().to_string_lossy() == member {
            let mut text = String::new();
            entry.read_to_string(&mut text).unwrap();
            return Some(text);
        }
    }
    None
}
