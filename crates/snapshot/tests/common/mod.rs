//! Scratch git repositories for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Directory (ignored by git) where tests place generated descriptors
pub const ARTIFACTS_DIR: &str = "artifacts";

/// A throwaway repository with a committed `src/lib.txt`
pub struct TestRepo {
    _temp: TempDir,
    root: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        // Match what `git rev-parse --show-toplevel` prints on macOS (/private/var/...)
        let root = fs::canonicalize(temp.path()).unwrap().join("repo");
        fs::create_dir_all(root.join("src")).unwrap();

        git(&root, &["init", "--quiet"]);
        git(&root, &["config", "user.name", "Test User"]);
        git(&root, &["config", "user.email", "test@example.com"]);
        git(&root, &["config", "commit.gpgsign", "false"]);

        fs::write(root.join(".gitignore"), format!("{ARTIFACTS_DIR}/\n")).unwrap();
        fs::write(root.join("src/lib.txt"), "version one\n").unwrap();
        git(&root, &["add", "."]);
        git(&root, &["commit", "--quiet", "-m", "initial"]);

        Self { _temp: temp, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Overwrite `path`, commit, and return the new commit id
    pub fn commit_file(&self, path: &str, contents: &str, message: &str) -> String {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
        git(&self.root, &["add", "."]);
        git(&self.root, &["commit", "--quiet", "-m", message]);
        self.head()
    }

    pub fn head(&self) -> String {
        git(&self.root, &["rev-parse", "HEAD"])
    }

    pub fn tag(&self, name: &str) {
        git(&self.root, &["tag", name]);
    }

    pub fn branch(&self, name: &str) {
        git(&self.root, &["branch", name]);
    }

    /// Write a generated project descriptor that references the repository root
    pub fn write_descriptor(&self, name: &str) -> PathBuf {
        let dir = self.root.join(ARTIFACTS_DIR).join(name);
        fs::create_dir_all(&dir).unwrap();
        let descriptor = dir.join("Bench.csproj");
        fs::write(&descriptor, descriptor_text(&self.root)).unwrap();
        descriptor
    }

    /// `git status --porcelain` of the working tree
    pub fn status(&self) -> String {
        git(&self.root, &["status", "--porcelain"])
    }
}

pub fn descriptor_text(root: &Path) -> String {
    let root = root.display();
    format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n    <ProjectReference Include=\"{root}/src/Lib.csproj\" />\n  </ItemGroup>\n  <PropertyGroup>\n    <Optimize>true</Optimize>\n  </PropertyGroup>\n  <Import Project=\"{root}/Directory.Build.props\" />\n</Project>\n"
    )
}

/// Run git in `dir` and return trimmed stdout, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Relative paths and contents of every file under `dir`, skipping `.git`
pub fn tree_contents(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    collect(dir, dir, &mut files);
    files.sort();
    files
}

fn collect(base: &Path, dir: &Path, files: &mut Vec<(PathBuf, Vec<u8>)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if entry.file_name() == ".git" {
            continue;
        }
        if path.is_dir() {
            collect(base, &path, files);
        } else {
            let relative = path.strip_prefix(base).unwrap().to_path_buf();
            files.push((relative, fs::read(&path).unwrap()));
        }
    }
}
