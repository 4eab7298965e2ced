//! Benchmark jobs and the git-aware job description users configure.

use crate::runtime::{Runtime, RuntimeMoniker, ToolchainDescriptor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Unroll factor the host uses when a job does not set one
pub const DEFAULT_UNROLL_FACTOR: u32 = 16;

/// Git reference used when a job does not name one
pub const DEFAULT_GIT_REFERENCE: &str = "HEAD";

/// Run characteristics; `None` leaves the host's default in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RunSettings {
    /// Number of separate benchmark processes
    pub launch_count: Option<u32>,
    /// Warmup iterations per process
    pub warmup_count: Option<u32>,
    /// Measured iterations per process
    pub iteration_count: Option<u32>,
    /// Invocations per iteration
    pub invocation_count: Option<u64>,
    /// Invocations unrolled into one loop body
    pub unroll_factor: Option<u32>,
}

impl RunSettings {
    /// Unroll factor in effect, falling back to the host default
    #[must_use]
    pub fn resolved_unroll_factor(&self) -> u32 {
        self.unroll_factor.unwrap_or(DEFAULT_UNROLL_FACTOR)
    }
}

/// A fully described benchmark job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Job {
    /// Job id shown in reports
    pub id: Option<String>,
    /// Run characteristics
    pub run: RunSettings,
    /// Whether this job is the comparison baseline
    pub baseline: bool,
    /// Runtime to run on; `None` means the host process runtime
    pub runtime: Option<Runtime>,
    /// Explicit toolchain; `None` derives one from the runtime
    pub toolchain: Option<ToolchainDescriptor>,
    /// Git reference the job's sources are taken from
    pub git_reference: Option<String>,
}

impl Job {
    /// Empty job with an optional id
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Set the launch count
    #[must_use]
    pub const fn with_launch_count(mut self, count: u32) -> Self {
        self.run.launch_count = Some(count);
        self
    }

    /// Set the warmup count
    #[must_use]
    pub const fn with_warmup_count(mut self, count: u32) -> Self {
        self.run.warmup_count = Some(count);
        self
    }

    /// Set the iteration count
    #[must_use]
    pub const fn with_iteration_count(mut self, count: u32) -> Self {
        self.run.iteration_count = Some(count);
        self
    }

    /// Set the invocation count
    #[must_use]
    pub const fn with_invocation_count(mut self, count: u64) -> Self {
        self.run.invocation_count = Some(count);
        self
    }

    /// Set the unroll factor
    #[must_use]
    pub const fn with_unroll_factor(mut self, factor: u32) -> Self {
        self.run.unroll_factor = Some(factor);
        self
    }

    /// Mark as baseline
    #[must_use]
    pub const fn as_baseline(mut self) -> Self {
        self.baseline = true;
        self
    }

    /// Run on `runtime`
    #[must_use]
    pub const fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build with an explicit toolchain
    #[must_use]
    pub fn with_toolchain(mut self, toolchain: ToolchainDescriptor) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    /// Toolchain this job builds with: the explicit one if set, otherwise
    /// the runtime's, otherwise whatever the host picks.
    pub fn resolved_toolchain(&self) -> Result<ToolchainDescriptor> {
        if let Some(toolchain) = &self.toolchain {
            return Ok(toolchain.clone());
        }
        self.runtime
            .as_ref()
            .map_or_else(|| Ok(ToolchainDescriptor::host_default()), Runtime::toolchain)
    }

    /// Take sources from `reference`.
    ///
    /// The toolchain is resolved and pinned at this point so the job keeps
    /// building with it once it is wrapped for git awareness.
    pub fn with_git_reference(mut self, reference: impl Into<String>) -> Result<Self> {
        self.toolchain = Some(self.resolved_toolchain()?);
        self.git_reference = Some(reference.into());
        Ok(self)
    }
}

/// User-facing description of a job that runs against a git reference.
///
/// Deserializes from a `[[job]]` table:
///
/// ```toml
/// [[job]]
/// git-reference = "v1.2.0"
/// runtime = "net8.0"
/// invocation-count = 100
/// baseline = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GitJob {
    /// Branch, tag, commit or symbolic reference
    pub git_reference: String,
    /// Target runtime
    pub runtime: RuntimeMoniker,
    /// Launch count, host default when unset
    pub launch_count: Option<u32>,
    /// Warmup count, host default when unset
    pub warmup_count: Option<u32>,
    /// Iteration count, host default when unset
    pub iteration_count: Option<u32>,
    /// Invocation count, host default when unset
    pub invocation_count: Option<u64>,
    /// Job id
    pub id: Option<String>,
    /// Whether this job is the baseline
    pub baseline: bool,
}

impl Default for GitJob {
    fn default() -> Self {
        Self {
            git_reference: DEFAULT_GIT_REFERENCE.to_string(),
            runtime: RuntimeMoniker::HostProcess,
            launch_count: None,
            warmup_count: None,
            iteration_count: None,
            invocation_count: None,
            id: None,
            baseline: false,
        }
    }
}

impl GitJob {
    /// Job against `reference` with every other setting at its default
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            git_reference: reference.into(),
            ..Self::default()
        }
    }

    /// Build the job
    pub fn into_job(self) -> Result<Job> {
        let mut job = Job::new(self.id);

        if let Some(count) = self.launch_count {
            job = job.with_launch_count(count);
        }
        if let Some(count) = self.warmup_count {
            job = job.with_warmup_count(count);
        }
        if let Some(count) = self.iteration_count {
            job = job.with_iteration_count(count);
        }
        if let Some(count) = self.invocation_count {
            job = job.with_invocation_count(count);
            // A partial unrolled loop cannot be expressed
            if count % u64::from(job.run.resolved_unroll_factor()) != 0 {
                job = job.with_unroll_factor(1);
            }
        }
        if self.baseline {
            job = job.as_baseline();
        }
        if self.runtime != RuntimeMoniker::HostProcess {
            job = job.with_runtime(self.runtime.runtime()?);
        }

        job.with_git_reference(self.git_reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ToolchainKind;

    #[test]
    fn test_default_git_job() {
        let job = GitJob::default().into_job().unwrap();

        assert_eq!(job.git_reference.as_deref(), Some("HEAD"));
        assert_eq!(job.run, RunSettings::default());
        assert!(job.runtime.is_none());
        assert!(!job.baseline);
        assert_eq!(job.toolchain, Some(ToolchainDescriptor::host_default()));
    }

    #[test]
    fn test_counts_applied_only_when_set() {
        let job = GitJob {
            warmup_count: Some(3),
            iteration_count: Some(10),
            ..GitJob::new("main")
        }
        .into_job()
        .unwrap();

        assert_eq!(job.run.launch_count, None);
        assert_eq!(job.run.warmup_count, Some(3));
        assert_eq!(job.run.iteration_count, Some(10));
        assert_eq!(job.run.invocation_count, None);
    }

    #[test]
    fn test_invocation_count_not_divisible_by_unroll_factor() {
        let job = GitJob {
            invocation_count: Some(100),
            ..GitJob::default()
        }
        .into_job()
        .unwrap();

        assert_eq!(job.run.invocation_count, Some(100));
        assert_eq!(job.run.unroll_factor, Some(1));
    }

    #[test]
    fn test_invocation_count_divisible_by_unroll_factor() {
        let job = GitJob {
            invocation_count: Some(64),
            ..GitJob::default()
        }
        .into_job()
        .unwrap();

        assert_eq!(job.run.unroll_factor, None);
        assert_eq!(job.run.resolved_unroll_factor(), DEFAULT_UNROLL_FACTOR);
    }

    #[test]
    fn test_runtime_pins_toolchain() {
        let job = GitJob {
            runtime: RuntimeMoniker::Net80,
            baseline: true,
            id: Some("net8".to_string()),
            ..GitJob::new("v2.0")
        }
        .into_job()
        .unwrap();

        assert!(job.baseline);
        assert_eq!(job.id.as_deref(), Some("net8"));
        assert_eq!(job.runtime.unwrap().moniker, RuntimeMoniker::Net80);
        let toolchain = job.toolchain.unwrap();
        assert_eq!(toolchain.kind, ToolchainKind::CsProjCore);
        assert_eq!(toolchain.target_framework.as_deref(), Some("net8.0"));
    }

    #[test]
    fn test_plain_mono_job_uses_roslyn() {
        let job = GitJob {
            runtime: RuntimeMoniker::Mono,
            ..GitJob::default()
        }
        .into_job()
        .unwrap();

        assert_eq!(job.toolchain.unwrap().kind, ToolchainKind::Roslyn);
    }

    #[test]
    fn test_explicit_toolchain_wins() {
        let explicit = ToolchainDescriptor::new(ToolchainKind::NativeAot, Some("net9.0"));
        let job = Job::new(None)
            .with_runtime(RuntimeMoniker::Net60.runtime().unwrap())
            .with_toolchain(explicit.clone())
            .with_git_reference("main")
            .unwrap();

        assert_eq!(job.toolchain, Some(explicit));
        assert_eq!(job.git_reference.as_deref(), Some("main"));
    }

    #[test]
    fn test_git_job_from_toml() {
        let job: GitJob = toml::from_str(
            r#"
            git-reference = "v1.2.0"
            runtime = "netcoreapp3.1"
            invocation-count = 32
            "#,
        )
        .unwrap();

        assert_eq!(job.git_reference, "v1.2.0");
        assert_eq!(job.runtime, RuntimeMoniker::NetCoreApp31);
        assert_eq!(job.invocation_count, Some(32));
        assert!(job.launch_count.is_none());
        assert!(!job.baseline);
    }

    #[test]
    fn test_git_job_toml_defaults() {
        let job: GitJob = toml::from_str("").unwrap();
        assert_eq!(job, GitJob::default());
    }

    #[test]
    fn test_git_job_rejects_unknown_keys() {
        assert!(toml::from_str::<GitJob>("git-ref = \"main\"").is_err());
    }

    #[test]
    fn test_unknown_runtime_in_toml() {
        let error = toml::from_str::<GitJob>("runtime = \"net10.0\"").unwrap_err();
        assert!(error.to_string().contains("Unknown runtime moniker"));
    }
}
