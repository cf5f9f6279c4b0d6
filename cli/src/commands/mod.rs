// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the SwarmPilot CLI

pub mod config;
pub mod roster;
pub mod run;
pub mod stop;

pub use self::config::ConfigCommand;
pub use self::roster::RosterCommand;
pub use self::run::RunArgs;
pub use self::stop::StopArgs;

use anyhow::{Context, Result};
use std::path::PathBuf;
use swarmpilot_core::domain::roster::Roster;
use swarmpilot_core::domain::swarm_config::SwarmConfigManifest;
use swarmpilot_core::infrastructure::RosterParser;

/// Load, override and validate configuration
pub(crate) fn load_config(config_override: Option<PathBuf>) -> Result<SwarmConfigManifest> {
    let config = SwarmConfigManifest::load_or_default(config_override)
        .context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

/// The `--roster` flag wins over `spec.roster` from configuration
pub(crate) fn resolve_roster_path(
    explicit: Option<PathBuf>,
    config: &SwarmConfigManifest,
) -> Result<PathBuf> {
    explicit
        .or_else(|| config.spec.roster.clone())
        .context("No roster given. Pass --roster or set spec.roster in the configuration")
}

pub(crate) fn load_roster(
    explicit: Option<PathBuf>,
    config: &SwarmConfigManifest,
) -> Result<(PathBuf, Roster)> {
    let path = resolve_roster_path(explicit, config)?;
    let roster = RosterParser::parse_file(&path, config.spec.control.default_epsilon)
        .with_context(|| format!("Failed to load roster {:?}", path))?;
    Ok((path, roster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_roster_flag_overrides_config() {
        let mut config = SwarmConfigManifest::default();
        config.spec.roster = Some(PathBuf::from("from-config.txt"));

        let path = resolve_roster_path(Some(PathBuf::from("flag.txt")), &config).unwrap();
        assert_eq!(path, PathBuf::from("flag.txt"));

        let path = resolve_roster_path(None, &config).unwrap();
        assert_eq!(path, PathBuf::from("from-config.txt"));

        config.spec.roster = None;
        assert!(resolve_roster_path(None, &config).is_err());
    }

    #[test]
    fn test_load_roster_uses_default_epsilon() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 10.0.0.1:3.0,4.0").unwrap();

        let mut config = SwarmConfigManifest::default();
        config.spec.control.default_epsilon = 0.25;

        let (_, roster) = load_roster(Some(file.path().to_path_buf()), &config).unwrap();
        assert_eq!(roster.robots()[0].epsilon, 0.25);
    }
}
