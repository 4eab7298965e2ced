//! Toolchain decorator that swaps in a [`GitAwareGenerator`]

use crate::generator::GitAwareGenerator;
use crate::pipeline::{BenchmarkCase, Toolchain, ValidationError};
use gitbench_snapshot::Materializer;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Suffix appended to the wrapped toolchain's name
pub const GIT_AWARE_SUFFIX: &str = " (Git aware)";

/// A [`Toolchain`] whose generator builds the sources of a git reference.
///
/// Everything except the generator is forwarded to the wrapped toolchain.
#[derive(Debug, Clone)]
pub struct GitAwareToolchain<T: Toolchain> {
    inner: T,
    generator: GitAwareGenerator<T::Generator>,
}

impl<T> GitAwareToolchain<T>
where
    T: Toolchain,
    T::Generator: Clone,
{
    /// Wrap `inner` to build `git_reference`
    pub fn new(inner: T, git_reference: impl Into<String>, materializer: Materializer) -> Self {
        let generator =
            GitAwareGenerator::new(inner.generator().clone(), git_reference, materializer);
        Self { inner, generator }
    }
}

impl<T: Toolchain> GitAwareToolchain<T> {
    /// The configured git reference
    #[must_use]
    pub fn git_reference(&self) -> &str {
        self.generator.git_reference()
    }

    /// The wrapped toolchain
    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Toolchain> Toolchain for GitAwareToolchain<T> {
    type Generator = GitAwareGenerator<T::Generator>;
    type Builder = T::Builder;
    type Executor = T::Executor;

    fn name(&self) -> String {
        format!("{}{GIT_AWARE_SUFFIX}", self.inner.name())
    }

    fn generator(&self) -> &Self::Generator {
        &self.generator
    }

    fn builder(&self) -> &Self::Builder {
        self.inner.builder()
    }

    fn executor(&self) -> &Self::Executor {
        self.inner.executor()
    }

    fn is_in_process(&self) -> bool {
        self.inner.is_in_process()
    }

    fn validate(&self, case: &BenchmarkCase) -> Vec<ValidationError> {
        self.inner.validate(case)
    }
}

impl<T: Toolchain + PartialEq> PartialEq for GitAwareToolchain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.git_reference() == other.git_reference()
    }
}

impl<T: Toolchain + Eq> Eq for GitAwareToolchain<T> {}

impl<T: Toolchain + Hash> Hash for GitAwareToolchain<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
        self.git_reference().hash(state);
    }
}

impl<T: Toolchain> fmt::Display for GitAwareToolchain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Wrap any toolchain for git awareness
pub trait GitAware: Toolchain + Sized {
    /// Build the sources of `git_reference` with this toolchain
    fn git_aware(
        self,
        git_reference: impl Into<String>,
        materializer: Materializer,
    ) -> GitAwareToolchain<Self>;
}

impl<T> GitAware for T
where
    T: Toolchain,
    T::Generator: Clone,
{
    fn git_aware(
        self,
        git_reference: impl Into<String>,
        materializer: Materializer,
    ) -> GitAwareToolchain<Self> {
        GitAwareToolchain::new(self, git_reference, materializer)
    }
}
