//! Frame-indexed direction scripts such as `0:right,12:up`.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use maze_chase_core::Direction;

/// Directions the player requests at given frames.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct IntentScript {
    intents: BTreeMap<u64, Direction>,
}

impl IntentScript {
    pub(crate) fn parse(source: &str) -> Result<Self> {
        let mut intents = BTreeMap::new();
        for entry in source.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let Some((frame, direction)) = entry.split_once(':') else {
                bail!("script entry `{entry}` must look like <frame>:<direction>");
            };
            let frame: u64 = frame
                .trim()
                .parse()
                .with_context(|| format!("invalid frame in script entry `{entry}`"))?;
            let Some(direction) = Direction::parse(direction) else {
                bail!("unknown direction in script entry `{entry}`");
            };
            if intents.insert(frame, direction).is_some() {
                bail!("frame {frame} is scripted twice");
            }
        }
        Ok(Self { intents })
    }

    pub(crate) fn intent_at(&self, frame: u64) -> Option<Direction> {
        self.intents.get(&frame).copied()
    }
}
