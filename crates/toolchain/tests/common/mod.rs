//! Fake host pipeline pieces and a scratch repository

#![allow(dead_code)]

use async_trait::async_trait;
use gitbench_toolchain::{
    ArtifactsPaths, BenchmarkCase, BuildPartition, GenerateResult, Generator, Toolchain,
    ValidationError,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Writes `<root>/<program>/<program>.csproj` referencing `source_root`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorGenerator {
    pub source_root: PathBuf,
    pub fail: bool,
}

impl DescriptorGenerator {
    pub fn new(source_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            fail: false,
        }
    }

    pub fn failing(source_root: &Path) -> Self {
        Self {
            fail: true,
            ..Self::new(source_root)
        }
    }
}

#[async_trait]
impl Generator for DescriptorGenerator {
    async fn generate_project(
        &self,
        partition: &BuildPartition,
        root_artifacts_dir: &Path,
    ) -> GenerateResult {
        let dir = root_artifacts_dir.join(&partition.program_name);
        let paths = ArtifactsPaths {
            build_artifacts_directory_path: dir.clone(),
            binaries_directory_path: dir.join("bin"),
            project_file_path: dir.join(format!("{}.csproj", partition.program_name)),
            program_name: partition.program_name.clone(),
        };

        if self.fail {
            return GenerateResult::failure(
                paths,
                vec![dir],
                std::io::Error::other("template missing"),
            );
        }

        fs::create_dir_all(&paths.binaries_directory_path).unwrap();
        fs::write(&paths.project_file_path, descriptor_text(&self.source_root)).unwrap();
        GenerateResult::success(paths, vec![dir])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FakeBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FakeExecutor;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FakeToolchain {
    pub name: String,
    pub generator: DescriptorGenerator,
    pub in_process: bool,
    builder: FakeBuilder,
    executor: FakeExecutor,
}

impl FakeToolchain {
    pub fn new(name: &str, generator: DescriptorGenerator) -> Self {
        Self {
            name: name.to_string(),
            generator,
            in_process: false,
            builder: FakeBuilder,
            executor: FakeExecutor,
        }
    }
}

impl Toolchain for FakeToolchain {
    type Generator = DescriptorGenerator;
    type Builder = FakeBuilder;
    type Executor = FakeExecutor;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn generator(&self) -> &Self::Generator {
        &self.generator
    }

    fn builder(&self) -> &Self::Builder {
        &self.builder
    }

    fn executor(&self) -> &Self::Executor {
        &self.executor
    }

    fn is_in_process(&self) -> bool {
        self.in_process
    }

    fn validate(&self, case: &BenchmarkCase) -> Vec<ValidationError> {
        if case.name.is_empty() {
            vec![ValidationError {
                is_critical: true,
                message: "benchmark has no name".to_string(),
                benchmark: None,
            }]
        } else {
            Vec::new()
        }
    }
}

pub fn descriptor_text(root: &Path) -> String {
    format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n    <ProjectReference Include=\"{}/src/Lib.csproj\" />\n  </ItemGroup>\n</Project>\n",
        root.display()
    )
}

pub fn partition(program_name: &str) -> BuildPartition {
    BuildPartition {
        program_name: program_name.to_string(),
        cases: Vec::new(),
    }
}

/// A repository with `src/lib.txt` committed and `artifacts/` ignored
pub struct TestRepo {
    _temp: TempDir,
    root: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap().join("repo");
        fs::create_dir_all(root.join("src")).unwrap();

        git(&root, &["init", "--quiet"]);
        git(&root, &["config", "user.name", "Test User"]);
        git(&root, &["config", "user.email", "test@example.com"]);
        git(&root, &["config", "commit.gpgsign", "false"]);
        fs::write(root.join(".gitignore"), "artifacts/\n").unwrap();
        fs::write(root.join("src/lib.txt"), "version one\n").unwrap();
        git(&root, &["add", "."]);
        git(&root, &["commit", "--quiet", "-m", "initial"]);

        Self { _temp: temp, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifacts(&self) -> PathBuf {
        self.root.join("artifacts")
    }

    pub fn commit_file(&self, path: &str, contents: &str) -> String {
        fs::write(self.root.join(path), contents).unwrap();
        git(&self.root, &["commit", "--quiet", "-am", "update"]);
        git(&self.root, &["rev-parse", "HEAD"])
    }

    pub fn tag(&self, name: &str) {
        git(&self.root, &["tag", name]);
    }
}

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
