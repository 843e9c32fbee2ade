//! Collection orchestration: identity, probe fan-out, config-file fields.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::identity::Identity;
use crate::parsers;
use crate::probe::Probe;
use crate::report::{self, Report, Session};

/// Single funnel for environment lookups. Production uses the process
/// environment; tests swap in a map so assembly is hermetic.
pub type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// An [`EnvLookup`] backed by a fixed map.
pub fn env_from_map(map: HashMap<String, String>) -> EnvLookup {
    Box::new(move |key| map.get(key).cloned())
}

/// The seven inspection commands, one handle per probe kind.
///
/// Handles are plain data: tests point them at stub executables without
/// touching the parsers.
#[derive(Debug, Clone)]
pub struct ProbeSet {
    pub gpu: Probe,
    pub cpu: Probe,
    pub screens: Probe,
    pub partitions: Probe,
    pub architecture: Probe,
    pub libc6: Probe,
    pub hwcap: Probe,
}

impl Default for ProbeSet {
    fn default() -> Self {
        Self {
            gpu: Probe::new("gpu", "lspci", &["-n"]),
            cpu: Probe::new("cpu", "lscpu", &["-J"]),
            screens: Probe::new("screens", "xrandr", &[]),
            partitions: Probe::new("partitions", "df", &[]),
            architecture: Probe::new("architecture", "dpkg", &["--print-architecture"]),
            libc6: Probe::new("libc6", "dpkg", &["--status", "libc6"]),
            hwcap: Probe::new(
                "hwcap",
                "/lib/x86_64-linux-gnu/ld-linux-x86-64.so.2",
                &["--help"],
            ),
        }
    }
}

/// Assembles the canonical document for one host.
///
/// Collection reads probes and a handful of files under `root` and never
/// writes anything: cache state belongs to the delivery engine.
pub struct Collector {
    root: PathBuf,
    env: EnvLookup,
    probes: ProbeSet,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
            env: Box::new(|key| std::env::var(key).ok()),
            probes: ProbeSet::default(),
        }
    }

    /// Resolve filesystem reads against another root, for tests and chroots.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    pub fn with_probes(mut self, probes: ProbeSet) -> Self {
        self.probes = probes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn env(&self, key: &str) -> Option<String> {
        (self.env)(key)
    }

    pub fn identity(&self) -> Result<Identity> {
        Identity::from_os_release(&self.root)
    }

    /// Where receipts and the pending report live: `XDG_CACHE_HOME`, with
    /// `~/.cache` as the usual fallback.
    pub fn cache_root(&self) -> PathBuf {
        if let Some(dir) = self.env("XDG_CACHE_HOME").filter(|dir| !dir.is_empty()) {
            return PathBuf::from(dir);
        }
        match self.env("HOME").filter(|home| !home.is_empty()) {
            Some(home) => PathBuf::from(home).join(".cache"),
            None => PathBuf::from(".cache"),
        }
    }

    /// Run all probes and assemble the document.
    pub async fn assemble(&self) -> Result<Report> {
        let identity = self.identity()?;
        debug!(
            distribution = identity.distribution,
            version = identity.version,
            "assembling report"
        );

        let (gpu, cpu, screens, partitions, architecture, libc6, hwcap) = tokio::join!(
            self.probes.gpu.run(),
            self.probes.cpu.run(),
            self.probes.screens.run(),
            self.probes.partitions.run(),
            self.probes.architecture.run(),
            self.probes.libc6.run(),
            self.probes.hwcap.run(),
        );

        let (oem, bios) = report::read_dmi(&self.root);

        Ok(Report {
            version: identity.version,
            oem,
            bios,
            cpu: parsers::parse_lscpu(&cpu),
            gpu: parsers::parse_lspci(&gpu),
            screens: parsers::parse_xrandr(&screens),
            partitions: parsers::parse_df(&partitions),
            architecture: parsers::parse_architecture(&architecture),
            libc6: parsers::parse_libc6_version(&libc6),
            hwcap: parsers::parse_hwcaps(&hwcap),
            autologin: report::read_autologin(&self.root),
            livepatch: report::read_livepatch(&self.root),
            session: Session {
                de: self.env("XDG_CURRENT_DESKTOP").unwrap_or_default(),
                name: self.env("XDG_SESSION_DESKTOP").unwrap_or_default(),
                session_type: self.env("XDG_SESSION_TYPE").unwrap_or_default(),
            },
            language: report::language(self.env("LANGUAGE"), self.env("LANG")),
            timezone: report::read_timezone(&self.root),
        })
    }

    /// Assemble and serialize to the canonical wire form.
    pub async fn collect(&self) -> Result<String> {
        let report = self.assemble().await?;
        Ok(serde_json::to_string(&report)?)
    }
}
