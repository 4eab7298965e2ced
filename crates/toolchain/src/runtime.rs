//! Runtime monikers and the runtime and toolchain tables behind them.
//!
//! A [`RuntimeMoniker`] is the short name users write in configuration
//! (`net8.0`, `mono6.0`, `nativeaot9.0`). [`RuntimeMoniker::runtime`] maps it
//! to the [`Runtime`] a benchmark process runs on, and
//! [`RuntimeMoniker::toolchain`] to the [`ToolchainDescriptor`] that builds
//! for that runtime.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named target runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuntimeMoniker {
    /// Whatever runtime the host process uses
    #[default]
    HostProcess,
    /// .NET Framework 4.6.1
    Net461,
    /// .NET Framework 4.6.2
    Net462,
    /// .NET Framework 4.7
    Net47,
    /// .NET Framework 4.7.1
    Net471,
    /// .NET Framework 4.7.2
    Net472,
    /// .NET Framework 4.8
    Net48,
    /// .NET Framework 4.8.1
    Net481,
    /// .NET Core 2.0
    NetCoreApp20,
    /// .NET Core 2.1
    NetCoreApp21,
    /// .NET Core 2.2
    NetCoreApp22,
    /// .NET Core 3.0
    NetCoreApp30,
    /// .NET Core 3.1
    NetCoreApp31,
    /// .NET 5.0 (also accepted as `netcoreapp5.0`)
    Net50,
    /// .NET 6.0
    Net60,
    /// .NET 7.0
    Net70,
    /// .NET 8.0
    Net80,
    /// .NET 9.0
    Net90,
    /// Mono, unversioned
    Mono,
    /// Mono with .NET 6.0
    Mono60,
    /// Mono with .NET 7.0
    Mono70,
    /// Mono with .NET 8.0
    Mono80,
    /// Mono with .NET 9.0
    Mono90,
    /// NativeAOT 6.0
    NativeAot60,
    /// NativeAOT 7.0
    NativeAot70,
    /// NativeAOT 8.0
    NativeAot80,
    /// NativeAOT 9.0
    NativeAot90,
}

/// Family a runtime belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeFamily {
    /// .NET Framework
    Clr,
    /// .NET Core and .NET 5+
    Core,
    /// Mono
    Mono,
    /// Ahead-of-time compiled .NET
    NativeAot,
}

/// A concrete runtime a benchmark process can run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Runtime {
    /// Runtime family
    pub family: RuntimeFamily,
    /// Moniker this runtime was looked up from
    pub moniker: RuntimeMoniker,
    /// Display name
    pub name: &'static str,
    /// MSBuild target framework, empty for plain Mono
    pub target_framework: &'static str,
}

/// Build toolchain families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolchainKind {
    /// SDK-style project targeting .NET Framework
    CsProjClassicNet,
    /// SDK-style project targeting .NET Core / .NET
    CsProjCore,
    /// NativeAOT publish
    NativeAot,
    /// Mono running on a .NET SDK
    Mono,
    /// In-memory Roslyn compilation
    Roslyn,
    /// Left to the host to decide
    HostDefault,
}

/// Which toolchain builds a job, and for which framework
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolchainDescriptor {
    /// Toolchain family
    pub kind: ToolchainKind,
    /// Target framework, when the toolchain needs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_framework: Option<String>,
}

impl RuntimeMoniker {
    /// Every moniker, in table order
    pub const ALL: [Self; 27] = [
        Self::HostProcess,
        Self::Net461,
        Self::Net462,
        Self::Net47,
        Self::Net471,
        Self::Net472,
        Self::Net48,
        Self::Net481,
        Self::NetCoreApp20,
        Self::NetCoreApp21,
        Self::NetCoreApp22,
        Self::NetCoreApp30,
        Self::NetCoreApp31,
        Self::Net50,
        Self::Net60,
        Self::Net70,
        Self::Net80,
        Self::Net90,
        Self::Mono,
        Self::Mono60,
        Self::Mono70,
        Self::Mono80,
        Self::Mono90,
        Self::NativeAot60,
        Self::NativeAot70,
        Self::NativeAot80,
        Self::NativeAot90,
    ];

    /// Canonical spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HostProcess => "host",
            Self::Net461 => "net461",
            Self::Net462 => "net462",
            Self::Net47 => "net47",
            Self::Net471 => "net471",
            Self::Net472 => "net472",
            Self::Net48 => "net48",
            Self::Net481 => "net481",
            Self::NetCoreApp20 => "netcoreapp2.0",
            Self::NetCoreApp21 => "netcoreapp2.1",
            Self::NetCoreApp22 => "netcoreapp2.2",
            Self::NetCoreApp30 => "netcoreapp3.0",
            Self::NetCoreApp31 => "netcoreapp3.1",
            Self::Net50 => "net5.0",
            Self::Net60 => "net6.0",
            Self::Net70 => "net7.0",
            Self::Net80 => "net8.0",
            Self::Net90 => "net9.0",
            Self::Mono => "mono",
            Self::Mono60 => "mono6.0",
            Self::Mono70 => "mono7.0",
            Self::Mono80 => "mono8.0",
            Self::Mono90 => "mono9.0",
            Self::NativeAot60 => "nativeaot6.0",
            Self::NativeAot70 => "nativeaot7.0",
            Self::NativeAot80 => "nativeaot8.0",
            Self::NativeAot90 => "nativeaot9.0",
        }
    }

    /// Runtime this moniker runs on.
    ///
    /// The host process has no fixed runtime and is rejected.
    pub fn runtime(self) -> Result<Runtime> {
        use RuntimeFamily::{Clr, Core, Mono, NativeAot};

        let (family, name, target_framework) = match self {
            Self::HostProcess => return Err(Error::unsupported(self, "runtime")),
            Self::Net461 => (Clr, ".NET Framework 4.6.1", "net461"),
            Self::Net462 => (Clr, ".NET Framework 4.6.2", "net462"),
            Self::Net47 => (Clr, ".NET Framework 4.7", "net47"),
            Self::Net471 => (Clr, ".NET Framework 4.7.1", "net471"),
            Self::Net472 => (Clr, ".NET Framework 4.7.2", "net472"),
            Self::Net48 => (Clr, ".NET Framework 4.8", "net48"),
            Self::Net481 => (Clr, ".NET Framework 4.8.1", "net481"),
            Self::NetCoreApp20 => (Core, ".NET Core 2.0", "netcoreapp2.0"),
            Self::NetCoreApp21 => (Core, ".NET Core 2.1", "netcoreapp2.1"),
            Self::NetCoreApp22 => (Core, ".NET Core 2.2", "netcoreapp2.2"),
            Self::NetCoreApp30 => (Core, ".NET Core 3.0", "netcoreapp3.0"),
            Self::NetCoreApp31 => (Core, ".NET Core 3.1", "netcoreapp3.1"),
            Self::Net50 => (Core, ".NET 5.0", "net5.0"),
            Self::Net60 => (Core, ".NET 6.0", "net6.0"),
            Self::Net70 => (Core, ".NET 7.0", "net7.0"),
            Self::Net80 => (Core, ".NET 8.0", "net8.0"),
            Self::Net90 => (Core, ".NET 9.0", "net9.0"),
            Self::Mono => (Mono, "Mono", ""),
            Self::Mono60 => (Mono, "Mono with .NET 6.0", "net6.0"),
            Self::Mono70 => (Mono, "Mono with .NET 7.0", "net7.0"),
            Self::Mono80 => (Mono, "Mono with .NET 8.0", "net8.0"),
            Self::Mono90 => (Mono, "Mono with .NET 9.0", "net9.0"),
            Self::NativeAot60 => (NativeAot, "NativeAOT 6.0", "net6.0"),
            Self::NativeAot70 => (NativeAot, "NativeAOT 7.0", "net7.0"),
            Self::NativeAot80 => (NativeAot, "NativeAOT 8.0", "net8.0"),
            Self::NativeAot90 => (NativeAot, "NativeAOT 9.0", "net9.0"),
        };

        Ok(Runtime {
            family,
            moniker: self,
            name,
            target_framework,
        })
    }

    /// Toolchain that builds for this moniker.
    ///
    /// Plain `mono` and the host process have no entry.
    pub fn toolchain(self) -> Result<ToolchainDescriptor> {
        let kind = match self {
            Self::HostProcess | Self::Mono => return Err(Error::unsupported(self, "toolchain")),
            Self::Net461
            | Self::Net462
            | Self::Net47
            | Self::Net471
            | Self::Net472
            | Self::Net48
            | Self::Net481 => ToolchainKind::CsProjClassicNet,
            Self::NetCoreApp20
            | Self::NetCoreApp21
            | Self::NetCoreApp22
            | Self::NetCoreApp30
            | Self::NetCoreApp31
            | Self::Net50
            | Self::Net60
            | Self::Net70
            | Self::Net80
            | Self::Net90 => ToolchainKind::CsProjCore,
            Self::Mono60 | Self::Mono70 | Self::Mono80 | Self::Mono90 => ToolchainKind::Mono,
            Self::NativeAot60 | Self::NativeAot70 | Self::NativeAot80 | Self::NativeAot90 => {
                ToolchainKind::NativeAot
            }
        };

        let runtime = self.runtime()?;
        Ok(ToolchainDescriptor::new(kind, Some(runtime.target_framework)))
    }
}

impl fmt::Display for RuntimeMoniker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeMoniker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "netcoreapp5.0" {
            return Ok(Self::Net50);
        }
        if wanted == "hostprocess" {
            return Ok(Self::HostProcess);
        }
        Self::ALL
            .into_iter()
            .find(|moniker| moniker.as_str() == wanted)
            .ok_or_else(|| Error::unknown_moniker(s))
    }
}

impl TryFrom<String> for RuntimeMoniker {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RuntimeMoniker> for String {
    fn from(moniker: RuntimeMoniker) -> Self {
        moniker.as_str().to_string()
    }
}

impl Runtime {
    /// Toolchain that builds for this runtime.
    ///
    /// Plain Mono compiles in memory with Roslyn; every other runtime uses
    /// its moniker's toolchain.
    pub fn toolchain(&self) -> Result<ToolchainDescriptor> {
        match self.moniker {
            RuntimeMoniker::Mono => Ok(ToolchainDescriptor::new(ToolchainKind::Roslyn, None)),
            moniker => moniker.toolchain(),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl ToolchainDescriptor {
    /// Create a descriptor
    pub fn new(kind: ToolchainKind, target_framework: Option<&str>) -> Self {
        Self {
            kind,
            target_framework: target_framework.map(str::to_string),
        }
    }

    /// The toolchain the host picks when nothing is pinned
    #[must_use]
    pub const fn host_default() -> Self {
        Self {
            kind: ToolchainKind::HostDefault,
            target_framework: None,
        }
    }

    /// Display name, e.g. `CsProjCore(net8.0)`
    #[must_use]
    pub fn name(&self) -> String {
        let family = match self.kind {
            ToolchainKind::CsProjClassicNet => "CsProjClassicNet",
            ToolchainKind::CsProjCore => "CsProjCore",
            ToolchainKind::NativeAot => "NativeAot",
            ToolchainKind::Mono => "Mono",
            ToolchainKind::Roslyn => "Roslyn",
            ToolchainKind::HostDefault => "Default",
        };
        match &self.target_framework {
            Some(framework) => format!("{family}({framework})"),
            None => family.to_string(),
        }
    }
}

impl fmt::Display for ToolchainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
