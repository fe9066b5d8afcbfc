//! Game configuration loaded from TOML.

use std::{
    fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use maze_chase_core::{AdversaryColor, DEFAULT_SUB_CELL_UNITS};
use maze_chase_credits::DEFAULT_NODE_PORT;
use maze_chase_system_clock::DEFAULT_TICKS_PER_SECOND;
use serde::Deserialize;

/// Settings shaping a game. Missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) ticks_per_second: u32,
    pub(crate) sub_cell_units: u32,
    pub(crate) adversary_count: usize,
    pub(crate) adversary_colors: Vec<String>,
    pub(crate) seed: u64,
    pub(crate) maze: Option<PathBuf>,
    pub(crate) nem: NemConfig,
}

/// Node used to look up the player's hearts.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct NemConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) test_mode: bool,
    pub(crate) mijin: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            sub_cell_units: DEFAULT_SUB_CELL_UNITS,
            adversary_count: 4,
            adversary_colors: ["#ff0000", "#00ff00", "#0000ff", "#ff7700"]
                .map(str::to_owned)
                .to_vec(),
            seed: 0,
            maze: None,
            nem: NemConfig::default(),
        }
    }
}

impl Default for NemConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_NODE_PORT,
            test_mode: true,
            mijin: false,
        }
    }
}

impl GameConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    pub(crate) fn ticks_per_second(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.ticks_per_second).context("ticks_per_second must be positive")
    }

    pub(crate) fn sub_cell_units(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.sub_cell_units).context("sub_cell_units must be positive")
    }

    pub(crate) fn colors(&self) -> Result<Vec<AdversaryColor>> {
        let mut colors = Vec::with_capacity(self.adversary_colors.len());
        for value in &self.adversary_colors {
            let Some(color) = AdversaryColor::from_hex(value) else {
                bail!("invalid adversary color `{value}`; expected #rrggbb");
            };
            colors.push(color);
        }
        Ok(colors)
    }
}
