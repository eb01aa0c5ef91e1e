//! Match driver.
//!
//! [`Game`] pairs a [`GridController`] with the AI players of a match and
//! runs their turns until someone else has to act: a human through the
//! controller's input handlers or a remote peer through the network
//! bridge.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use tactics_core::{ExecuteError, GameResult, Payload, PlayerId, PlayerKind};

use crate::ai::AiPlayer;
use crate::controller::GridController;
use crate::error::{Result, RuntimeError};

/// Why [`Game::step`] returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A local human player has the turn.
    AwaitingHuman(PlayerId),
    /// The turn belongs to a peer; feed its payloads to [`Game::receive`].
    AwaitingRemote(PlayerId),
    /// The AI turn budget of one step ran out; call `step` again.
    Yielded(PlayerId),
    Ended(GameResult),
}

#[derive(Debug)]
pub struct Game {
    controller: GridController,
    ai: BTreeMap<PlayerId, AiPlayer>,
}

impl Game {
    pub fn new(controller: GridController) -> Self {
        Self {
            controller,
            ai: BTreeMap::new(),
        }
    }

    /// Attaches an AI to the player it was built for, replacing any
    /// previous one.
    pub fn with_ai(mut self, ai: AiPlayer) -> Self {
        self.ai.insert(ai.player(), ai);
        self
    }

    pub fn controller(&self) -> &GridController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GridController {
        &mut self.controller
    }

    pub fn into_controller(self) -> GridController {
        self.controller
    }

    /// Starts the match and plays AI turns up to the first human or remote
    /// turn.
    pub fn start(&mut self) -> Result<StepOutcome> {
        self.controller.start()?;
        self.step()
    }

    /// Replays a peer's command, then continues with any AI turns it hands
    /// control to.
    pub fn receive(&mut self, payload: &Payload) -> Result<StepOutcome> {
        self.controller.receive(payload)?;
        self.step()
    }

    /// Plays consecutive AI turns, at most
    /// [`crate::RuntimeConfig::max_ai_turns_per_step`] of them.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let budget = self.controller.config().max_ai_turns_per_step;
        let mut played = 0;
        loop {
            if let Some(result) = self.controller.result() {
                return Ok(StepOutcome::Ended(result.clone()));
            }
            let player = self
                .controller
                .current_player()
                .ok_or(ExecuteError::NoTurn)?;

            match self.controller.players().kind_of(player) {
                Some(PlayerKind::Human) => return Ok(StepOutcome::AwaitingHuman(player)),
                Some(PlayerKind::Remote) => return Ok(StepOutcome::AwaitingRemote(player)),
                Some(PlayerKind::Ai) if played >= budget => {
                    warn!(target: "tactics::game", %player, played, "ai turn budget exhausted");
                    return Ok(StepOutcome::Yielded(player));
                }
                Some(PlayerKind::Ai) => {
                    let ai = self
                        .ai
                        .get_mut(&player)
                        .ok_or(RuntimeError::AiNotSet(player))?;
                    ai.play_turn(&mut self.controller)?;
                    ai.prune(&self.controller);
                    played += 1;
                    debug!(target: "tactics::game", %player, played, "ai turn played");
                }
                None => return Err(RuntimeError::UnknownPlayer(player)),
            }
        }
    }
}
