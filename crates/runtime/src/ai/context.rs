//! Blackboard handed to behavior trees while one unit acts.
//!
//! An [`AiContext`] borrows the controller for the length of a single tree
//! tick. Leaves read the board through it and perform their effects by
//! executing commands through the controller's AI entry point, so the AI
//! goes through exactly the same validation as a human player.

use std::collections::BTreeMap;
use std::time::Duration;

use behavior_tree::TreeContext;
use tactics_core::{Board, Command, ExecuteError, GameConfig, PcgRng, RandomSource, Unit, UnitId};

use crate::controller::GridController;

pub struct AiContext<'a> {
    /// The unit the tree is ticked for.
    pub unit: UnitId,

    controller: &'a mut GridController,
    rng: PcgRng,

    /// Turn counters of the owning player, shared across ticks.
    counters: &'a mut BTreeMap<String, u32>,
    pacing: bool,
}

impl<'a> AiContext<'a> {
    pub fn new(
        unit: UnitId,
        controller: &'a mut GridController,
        rng: PcgRng,
        counters: &'a mut BTreeMap<String, u32>,
    ) -> Self {
        let pacing = controller.config().ai_pacing;
        Self {
            unit,
            controller,
            rng,
            counters,
            pacing,
        }
    }

    pub fn board(&self) -> &Board {
        self.controller.board()
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.controller.config().game
    }

    /// The acting unit, or `None` once it has been destroyed.
    pub fn actor(&self) -> Option<&Unit> {
        self.controller.board().unit(self.unit)
    }

    pub fn controller(&self) -> &GridController {
        self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GridController {
        self.controller
    }

    pub fn execute(&mut self, command: Command) -> Result<(), ExecuteError> {
        self.controller.execute_ai(command)
    }
}

impl TreeContext for AiContext<'_> {
    fn random_unit(&mut self) -> f32 {
        self.rng.next_unit()
    }

    fn turn_counter(&mut self, key: &str) -> &mut u32 {
        self.counters
            .entry(format!("{}/{key}", self.unit.0))
            .or_default()
    }

    fn pace(&mut self, delay: Duration) {
        if self.pacing && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
