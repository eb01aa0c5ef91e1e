//! Behavior-tree driven player.

use std::collections::BTreeMap;

use behavior_tree::{Behavior, NodeSpec, Status};
use tracing::{debug, info};

use tactics_core::rng::derive_seed;
use tactics_core::{EndTurnCommand, ExecuteError, PcgRng, PlayerId, UnitId};

use crate::controller::GridController;
use crate::error::{Result, RuntimeError};

use super::context::AiContext;
use super::leaf::AiLeaf;

/// Plays every turn of one player with a single tree description.
///
/// The tree is ticked once per playable unit, in id order; the turn is then
/// ended. Random nodes draw from a generator seeded from the match seed,
/// the turn number and the unit, so replaying a match replays its AI.
#[derive(Debug)]
pub struct AiPlayer {
    player: PlayerId,
    tree: NodeSpec<AiLeaf>,
    seed: Option<u64>,
    counters: BTreeMap<String, u32>,
}

impl AiPlayer {
    pub fn new(player: PlayerId, tree: NodeSpec<AiLeaf>) -> Result<Self> {
        tree.validate()?;
        Ok(Self {
            player,
            tree,
            seed: None,
            counters: BTreeMap::new(),
        })
    }

    /// Loads the tree description from JSON.
    pub fn from_json(player: PlayerId, source: &str) -> Result<Self> {
        let tree = serde_json::from_str(source).map_err(RuntimeError::Config)?;
        Self::new(player, tree)
    }

    /// Overrides the match seed from [`crate::RuntimeConfig`].
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn tree(&self) -> &NodeSpec<AiLeaf> {
        &self.tree
    }

    /// Acts with every playable unit, then ends the turn.
    pub fn play_turn(&mut self, controller: &mut GridController) -> Result<()> {
        let turn = controller.turn().cloned().ok_or(ExecuteError::NoTurn)?;
        if turn.player != self.player {
            return Err(ExecuteError::NotCurrentPlayer {
                actor: self.player,
                current: turn.player,
            }
            .into());
        }
        let seed = self.seed.unwrap_or(controller.config().seed);
        info!(target: "tactics::ai", player = %self.player, turn = turn.turn, "ai turn");

        let units: Vec<UnitId> = turn.playable.iter().copied().collect();
        for unit in units {
            if controller.is_over() {
                return Ok(());
            }
            if controller.board().unit(unit).is_none() {
                continue;
            }
            let rng = PcgRng::new(derive_seed(seed, turn.turn, unit.0));
            let mut ctx = AiContext::new(unit, controller, rng, &mut self.counters);
            let status = self.tree.tick(&mut ctx);
            debug!(
                target: "tactics::ai",
                unit = %unit,
                success = status == Status::Success,
                "tree ticked"
            );
        }

        if controller.is_over() {
            return Ok(());
        }
        controller.execute_ai(EndTurnCommand::new(self.player).into())?;
        Ok(())
    }

    /// Forgets turn counters of units that no longer exist.
    pub fn prune(&mut self, controller: &GridController) {
        let board = controller.board();
        self.counters.retain(|key, _| {
            key.split_once('/')
                .and_then(|(unit, _)| unit.parse().ok())
                .is_some_and(|raw| board.unit(UnitId(raw)).is_some())
        });
    }
}
