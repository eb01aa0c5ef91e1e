//! Interaction state machine and execution funnel.
//!
//! [`GridController`] owns the board for the length of a match. Input from
//! the presentation layer is routed through [`GridState`]; commands from
//! humans, AI players and remote peers all end up in one private funnel
//! that authorizes them against the current [`TurnContext`], executes them
//! through [`CommandEngine`], publishes the resulting events, records them
//! for undo and network replay, and advances the turn or ends the match.

mod log;
mod state;

pub use log::{Invocation, LogEntry};
pub use state::{GridState, GridStateKind};

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info, trace, warn};

use tactics_core::{
    Board, Command, CommandEngine, CommandError, Coord, DominationCondition, EndCondition,
    EndTurnCommand, ExecuteError, GameEvent, GameResult, PathCacheSet, PathError, Payload,
    PlayerId, PlayerKind, PlayerRegistry, SequentialTurnResolver, TurnContext, TurnResolver,
    Unit, UnitId,
};

use crate::ability::{Ability, AbilityContext, AbilityResponse, default_abilities};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, ListenerId, ListenerScope, Listeners};
use crate::presenter::{NullPresenter, Presenter, present};

pub struct GridController {
    config: RuntimeConfig,
    board: Board,
    players: PlayerRegistry,
    resolver: Box<dyn TurnResolver>,
    end_conditions: Vec<Box<dyn EndCondition>>,

    turn: Option<TurnContext>,
    state: GridState,
    started: bool,

    abilities: BTreeMap<UnitId, Vec<Box<dyn Ability>>>,
    paths: PathCacheSet,

    presenter: Box<dyn Presenter>,
    bus: EventBus,
    listeners: Listeners,

    log: Vec<LogEntry>,
    outbox: VecDeque<Payload>,
}

impl GridController {
    /// Wraps a prepared board. Players take turns in id order and the match
    /// ends by domination unless configured otherwise.
    pub fn new(board: Board, players: PlayerRegistry, config: RuntimeConfig) -> Self {
        let mut controller = Self {
            paths: PathCacheSet::new(config.game.path_algorithm),
            bus: EventBus::with_capacity(config.event_buffer_size),
            config,
            board,
            players,
            resolver: Box::new(SequentialTurnResolver),
            end_conditions: vec![Box::new(DominationCondition)],
            turn: None,
            state: GridState::BlockInput,
            started: false,
            abilities: BTreeMap::new(),
            presenter: Box::new(NullPresenter),
            listeners: Listeners::new(),
            log: Vec::new(),
            outbox: VecDeque::new(),
        };
        if controller.config.default_abilities {
            let units: Vec<UnitId> = controller.board.units().map(Unit::id).collect();
            for unit in units {
                controller.install_default_abilities(unit);
            }
        }
        controller
    }

    pub fn with_resolver(mut self, resolver: impl TurnResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Adds a condition next to the ones already installed.
    pub fn with_end_condition(mut self, condition: impl EndCondition + 'static) -> Self {
        self.end_conditions.push(Box::new(condition));
        self
    }

    /// Replaces every installed end condition.
    pub fn with_end_conditions(mut self, conditions: Vec<Box<dyn EndCondition>>) -> Self {
        self.end_conditions = conditions;
        self
    }

    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    // ===== accessors =====

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn turn(&self) -> Option<&TurnContext> {
        self.turn.as_ref()
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn.as_ref().map(|turn| turn.player)
    }

    pub fn current_player_kind(&self) -> Option<PlayerKind> {
        self.current_player()
            .and_then(|player| self.players.kind_of(player))
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn result(&self) -> Option<&GameResult> {
        match &self.state {
            GridState::GameEnded { result } => Some(result),
            _ => None,
        }
    }

    /// Commands executed so far, oldest first.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // ===== abilities =====

    pub fn abilities_of(&self, unit: UnitId) -> &[Box<dyn Ability>] {
        self.abilities.get(&unit).map_or(&[], Vec::as_slice)
    }

    pub fn add_ability(&mut self, unit: UnitId, ability: impl Ability + 'static) -> Result<()> {
        if self.board.unit(unit).is_none() {
            return Err(RuntimeError::UnknownUnit(unit));
        }
        self.abilities
            .entry(unit)
            .or_default()
            .push(Box::new(ability));
        Ok(())
    }

    pub fn set_abilities(&mut self, unit: UnitId, abilities: Vec<Box<dyn Ability>>) -> Result<()> {
        if self.board.unit(unit).is_none() {
            return Err(RuntimeError::UnknownUnit(unit));
        }
        self.abilities.insert(unit, abilities);
        Ok(())
    }

    fn install_default_abilities(&mut self, unit: UnitId) {
        if let Some(placed) = self.board.unit(unit)
            && !self.abilities.contains_key(&unit)
        {
            self.abilities
                .insert(unit, default_abilities(&self.board, placed));
        }
    }

    // ===== listeners =====

    pub fn subscribe(
        &mut self,
        scope: ListenerScope,
        callback: impl FnMut(&GameEvent) + Send + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(scope, callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ===== paths =====

    /// Makes sure the path cache of `unit` matches the current board.
    pub fn prime_paths(&mut self, unit: UnitId) -> std::result::Result<(), PathError> {
        self.paths.ensure(&self.board, unit).map(|_| ())
    }

    pub fn paths(&self) -> &PathCacheSet {
        &self.paths
    }

    // ===== lifecycle =====

    /// Publishes the setup events and hands the first turn out.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }
        self.started = true;
        info!(
            target: "tactics::controller",
            players = self.players.len(),
            units = self.board.units().count(),
            "game starting"
        );

        self.publish(GameEvent::GameInitialized);
        self.flush_events();
        self.publish(GameEvent::GameStarted);

        if self.check_end() {
            return Ok(());
        }
        let first = self
            .resolver
            .resolve_start(&self.board, &self.players)
            .ok_or(RuntimeError::NoPlayableTurn)?;
        self.begin_turn(first, false);
        Ok(())
    }

    // ===== input =====

    pub fn on_unit_clicked(&mut self, unit: UnitId) {
        match self.state.kind() {
            GridStateKind::AwaitInput => self.try_select(unit),
            GridStateKind::UnitSelected => {
                let responses = self.dispatch(|ability, ctx, presenter| {
                    ability.on_unit_clicked(ctx, presenter, unit)
                });
                self.resolve_responses(responses, Some(unit));
            }
            kind => trace!(target: "tactics::controller", state = %kind, %unit, "click ignored"),
        }
    }

    pub fn on_cell_clicked(&mut self, cell: Coord) {
        match self.state.kind() {
            GridStateKind::AwaitInput => {
                if let Some(unit) = self.playable_unit_at(cell) {
                    self.try_select(unit);
                }
            }
            GridStateKind::UnitSelected => {
                let responses = self.dispatch(|ability, ctx, presenter| {
                    ability.on_cell_clicked(ctx, presenter, cell)
                });
                let clicked = self.playable_unit_at(cell);
                self.resolve_responses(responses, clicked);
            }
            kind => trace!(target: "tactics::controller", state = %kind, %cell, "click ignored"),
        }
    }

    pub fn on_cell_highlighted(&mut self, cell: Coord) {
        match self.state.kind() {
            GridStateKind::AwaitInput => self.presenter.mark_cell_highlighted(cell),
            GridStateKind::UnitSelected => {
                self.dispatch(|ability, ctx, presenter| {
                    ability.on_cell_highlighted(ctx, presenter, cell);
                    AbilityResponse::Ignored
                });
            }
            _ => {}
        }
    }

    pub fn on_cell_dehighlighted(&mut self, cell: Coord) {
        match self.state.kind() {
            GridStateKind::AwaitInput => self.presenter.unmark_cell(cell),
            GridStateKind::UnitSelected => {
                self.dispatch(|ability, ctx, presenter| {
                    ability.on_cell_dehighlighted(ctx, presenter, cell);
                    AbilityResponse::Ignored
                });
            }
            _ => {}
        }
    }

    pub fn on_unit_highlighted(&mut self, unit: UnitId) {
        if self.state.kind() == GridStateKind::UnitSelected {
            self.dispatch(|ability, ctx, presenter| {
                ability.on_unit_highlighted(ctx, presenter, unit);
                AbilityResponse::Ignored
            });
        }
    }

    pub fn on_unit_dehighlighted(&mut self, unit: UnitId) {
        if self.state.kind() == GridStateKind::UnitSelected {
            self.dispatch(|ability, ctx, presenter| {
                ability.on_unit_dehighlighted(ctx, presenter, unit);
                AbilityResponse::Ignored
            });
        }
    }

    /// Ends the current human turn. A no-op outside human input states.
    pub fn end_turn(&mut self) -> std::result::Result<(), ExecuteError> {
        if !matches!(
            self.state.kind(),
            GridStateKind::AwaitInput | GridStateKind::UnitSelected
        ) {
            debug!(target: "tactics::controller", state = %self.state.kind(), "end turn ignored");
            return Ok(());
        }
        let player = self.current_player().ok_or(ExecuteError::NoTurn)?;
        self.execute_human(EndTurnCommand::new(player).into())
    }

    fn playable_unit_at(&self, cell: Coord) -> Option<UnitId> {
        let turn = self.turn.as_ref()?;
        self.board
            .units_at(cell)
            .map(Unit::id)
            .find(|unit| turn.is_playable(*unit))
    }

    fn try_select(&mut self, unit: UnitId) {
        let selectable = self.board.unit(unit).is_some()
            && self
                .turn
                .as_ref()
                .is_some_and(|turn| turn.is_playable(unit));
        if selectable {
            self.make_transition(GridState::UnitSelected {
                unit,
                active: Vec::new(),
            });
        }
    }

    /// Forwards an input event to every active ability of the selected unit.
    fn dispatch<F>(&mut self, mut handler: F) -> Vec<AbilityResponse>
    where
        F: FnMut(&mut dyn Ability, &AbilityContext<'_>, &mut dyn Presenter) -> AbilityResponse,
    {
        let GridState::UnitSelected { unit, active } = &self.state else {
            return Vec::new();
        };
        let (Some(selected), Ok(paths), Some(abilities)) = (
            self.board.unit(*unit),
            self.paths.get(*unit),
            self.abilities.get_mut(unit),
        ) else {
            return Vec::new();
        };
        let ctx = AbilityContext {
            unit: selected,
            board: &self.board,
            paths,
            config: &self.config.game,
            input_mode: self.config.input_mode,
        };

        let mut responses = Vec::with_capacity(active.len());
        for index in active {
            if let Some(ability) = abilities.get_mut(*index) {
                responses.push(handler(ability.as_mut(), &ctx, self.presenter.as_mut()));
            }
        }
        responses
    }

    /// The first command wins; any consumption keeps the selection. A click
    /// no ability wanted switches the selection to `clicked` when that is
    /// another playable unit, and drops it otherwise.
    fn resolve_responses(&mut self, responses: Vec<AbilityResponse>, clicked: Option<UnitId>) {
        let mut consumed = false;
        for response in responses {
            match response {
                AbilityResponse::Execute(command) => {
                    if let Err(error) = self.execute_human(command) {
                        debug!(target: "tactics::controller", %error, "human command rejected");
                    }
                    return;
                }
                AbilityResponse::Consumed => consumed = true,
                AbilityResponse::Ignored => {}
            }
        }
        if consumed {
            return;
        }
        let switch = clicked.filter(|unit| {
            Some(*unit) != self.state.selected_unit()
                && self
                    .turn
                    .as_ref()
                    .is_some_and(|turn| turn.is_playable(*unit))
        });
        match switch {
            Some(unit) => self.try_select(unit),
            None => self.make_transition(GridState::AwaitInput),
        }
    }

    // ===== state machine =====

    fn make_transition(&mut self, next: GridState) {
        if self.state.is_terminal() {
            debug!(target: "tactics::controller", to = %next.kind(), "game ended; transition ignored");
            return;
        }
        let previous = std::mem::replace(&mut self.state, GridState::BlockInput);
        trace!(target: "tactics::controller", from = %previous.kind(), to = %next.kind(), "transition");
        self.exit_state(previous);
        match next {
            GridState::UnitSelected { unit, .. } => self.enter_selection(unit),
            other => self.state = other,
        }
    }

    fn exit_state(&mut self, state: GridState) {
        if let GridState::UnitSelected { unit, .. } = state {
            if let Some(abilities) = self.abilities.get_mut(&unit) {
                for ability in abilities.iter_mut() {
                    ability.clean_up(self.presenter.as_mut());
                }
            }
            self.presenter.mark_unit_deselected(unit);
        }
    }

    fn enter_selection(&mut self, unit: UnitId) {
        if let Err(error) = self.paths.ensure(&self.board, unit) {
            warn!(target: "tactics::controller", %unit, %error, "cannot select unit");
            self.state = GridState::AwaitInput;
            return;
        }
        let (Some(selected), Ok(paths)) = (self.board.unit(unit), self.paths.get(unit)) else {
            self.state = GridState::AwaitInput;
            return;
        };
        let ctx = AbilityContext {
            unit: selected,
            board: &self.board,
            paths,
            config: &self.config.game,
            input_mode: self.config.input_mode,
        };

        let mut active = Vec::new();
        let abilities = self.abilities.entry(unit).or_default();
        for (index, ability) in abilities.iter_mut().enumerate() {
            ability.on_selected(&ctx);
            if ability.can_perform(&ctx) {
                active.push(index);
            }
        }
        if active.is_empty() {
            self.presenter.mark_unit_finished(unit);
        } else {
            self.presenter.mark_unit_selected(unit);
            for index in &active {
                abilities[*index].display(&ctx, self.presenter.as_mut());
            }
        }
        debug!(target: "tactics::controller", %unit, active = active.len(), "unit selected");
        self.state = GridState::UnitSelected { unit, active };
    }

    // ===== execution =====

    pub fn execute_human(&mut self, command: Command) -> std::result::Result<(), ExecuteError> {
        self.ability_used(command, Invocation::Human)
    }

    pub fn execute_ai(&mut self, command: Command) -> std::result::Result<(), ExecuteError> {
        self.ability_used(command, Invocation::Ai)
    }

    /// Replays a command received from a peer. It is not echoed back to
    /// the outbox.
    pub fn execute_network(&mut self, command: Command) -> std::result::Result<(), ExecuteError> {
        self.ability_used(command, Invocation::Network)
    }

    fn authorize(&self, command: &Command) -> std::result::Result<(), ExecuteError> {
        if self.state.is_terminal() {
            return Err(ExecuteError::GameEnded);
        }
        let turn = self.turn.as_ref().ok_or(ExecuteError::NoTurn)?;
        let actor = command.actor();
        let player = actor
            .player(&self.board)
            .ok_or(ExecuteError::UnknownActor(command.name()))?;
        if player != turn.player {
            return Err(ExecuteError::NotCurrentPlayer {
                actor: player,
                current: turn.player,
            });
        }
        if let Some(unit) = actor.unit()
            && !turn.is_playable(unit)
        {
            return Err(ExecuteError::UnitNotPlayable(unit));
        }
        Ok(())
    }

    fn ability_used(
        &mut self,
        command: Command,
        invocation: Invocation,
    ) -> std::result::Result<(), ExecuteError> {
        if let Err(error) = self.authorize(&command) {
            warn!(
                target: "tactics::controller",
                command = command.name(),
                %invocation,
                %error,
                "command refused"
            );
            return Err(error);
        }
        let acting_unit = command.actor().unit();
        if invocation == Invocation::Human {
            self.make_transition(GridState::BlockInput);
        }

        let turn = self.turn.as_ref().map_or(0, |turn| turn.turn);
        let executed = CommandEngine::new(&mut self.board, &self.config.game).execute(&command);
        let undo = match executed {
            Ok(undo) => undo,
            Err(error) => {
                if invocation == Invocation::Human {
                    self.after_human_action(acting_unit);
                }
                return Err(error);
            }
        };

        self.paths.invalidate_all();
        self.flush_events();
        info!(target: "tactics::controller", command = command.name(), %invocation, turn, "command executed");

        if invocation != Invocation::Network {
            self.outbox.push_back(command.serialize());
        }
        let ends_turn = command.ends_turn();
        self.log.push(LogEntry {
            command,
            invocation,
            turn,
            undo,
        });

        if ends_turn {
            self.advance_turn(invocation == Invocation::Network);
            return Ok(());
        }
        if self.check_end() {
            return Ok(());
        }
        if invocation == Invocation::Human {
            self.after_human_action(acting_unit);
        }
        Ok(())
    }

    fn after_human_action(&mut self, unit: Option<UnitId>) {
        let reselect = unit.filter(|unit| {
            self.board.unit(*unit).is_some()
                && self
                    .turn
                    .as_ref()
                    .is_some_and(|turn| turn.is_playable(*unit))
        });
        match reselect {
            Some(unit) => self.make_transition(GridState::UnitSelected {
                unit,
                active: Vec::new(),
            }),
            None => self.make_transition(GridState::AwaitInput),
        }
    }

    /// Reverts the most recent command of the current turn.
    ///
    /// Undo is local: a payload still waiting in the outbox is withdrawn,
    /// one already sent is not.
    pub fn undo_last(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(ExecuteError::GameEnded.into());
        }
        let entry = self.log.last().ok_or(RuntimeError::NothingToUndo)?;
        if !entry.is_undoable() {
            return Err(CommandError::NotUndoable(entry.command.name()).into());
        }
        if self.turn.as_ref().map(|turn| turn.turn) != Some(entry.turn) {
            return Err(RuntimeError::UndoAcrossTurn);
        }
        CommandEngine::new(&mut self.board, &self.config.game).undo(&entry.undo)?;

        if let Some(entry) = self.log.pop() {
            if self.outbox.back() == Some(&entry.command.serialize()) {
                self.outbox.pop_back();
            }
            info!(target: "tactics::controller", command = entry.command.name(), "command undone");
        }
        self.paths.invalidate_all();
        self.abilities
            .retain(|unit, _| self.board.unit(*unit).is_some());
        self.flush_events();

        if let Some(unit) = self.state.selected_unit() {
            self.make_transition(GridState::UnitSelected {
                unit,
                active: Vec::new(),
            });
        }
        Ok(())
    }

    // ===== turns =====

    fn advance_turn(&mut self, network: bool) {
        self.make_transition(GridState::BlockInput);
        let Some(previous) = self.turn.clone() else {
            return;
        };

        self.notify_turn_end(&previous);
        self.publish(GameEvent::TurnEnded {
            context: previous.clone(),
            network,
        });
        self.turn = None;

        if self.check_end() {
            return;
        }
        match self
            .resolver
            .resolve_next(&previous, &self.board, &self.players)
        {
            Some(next) => self.begin_turn(next, network),
            None => self.finish(GameResult::default()),
        }
    }

    fn begin_turn(&mut self, context: TurnContext, network: bool) {
        self.board.begin_turn(context.playable.iter().copied());
        self.paths.invalidate_all();
        self.notify_turn_start(&context);
        info!(
            target: "tactics::controller",
            player = %context.player,
            turn = context.turn,
            playable = context.playable.len(),
            "turn started"
        );

        let player = context.player;
        self.turn = Some(context.clone());
        self.publish(GameEvent::TurnStarted { context, network });

        if self.check_end() {
            return;
        }
        if self.players.kind_of(player) == Some(PlayerKind::Human) {
            self.make_transition(GridState::AwaitInput);
        }
    }

    fn notify_turn_start(&mut self, context: &TurnContext) {
        for unit in self.board.units_of(context.player) {
            if let Some(abilities) = self.abilities.get_mut(&unit.id()) {
                for ability in abilities.iter_mut() {
                    ability.on_turn_start(unit);
                }
            }
        }
    }

    fn notify_turn_end(&mut self, context: &TurnContext) {
        for unit in self.board.units_of(context.player) {
            if let Some(abilities) = self.abilities.get_mut(&unit.id()) {
                for ability in abilities.iter_mut() {
                    ability.on_turn_end(unit);
                }
            }
        }
    }

    fn check_end(&mut self) -> bool {
        let result = self
            .end_conditions
            .iter()
            .find_map(|condition| condition.check(&self.board, &self.players));
        match result {
            Some(result) => {
                self.finish(result);
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, result: GameResult) {
        if self.state.is_terminal() {
            return;
        }
        info!(
            target: "tactics::controller",
            winners = ?result.winners,
            losers = ?result.losers,
            "game ended"
        );
        self.make_transition(GridState::GameEnded {
            result: result.clone(),
        });
        self.publish(GameEvent::GameEnded { result });
    }

    // ===== events and network =====

    fn flush_events(&mut self) {
        for event in self.board.drain_events() {
            match &event {
                GameEvent::UnitDestroyed { unit, .. } => {
                    self.abilities.remove(unit);
                    self.paths.invalidate(*unit);
                }
                GameEvent::UnitPlaced { unit, .. } | GameEvent::UnitRestored { unit }
                    if self.config.default_abilities =>
                {
                    self.install_default_abilities(*unit);
                }
                _ => {}
            }
            self.publish(event);
        }
    }

    fn publish(&mut self, event: GameEvent) {
        present(self.presenter.as_mut(), &event);
        self.listeners.notify(&event);
        self.bus.publish(event);
    }

    /// Deserializes a peer's command against the local board and replays it.
    pub fn receive(&mut self, payload: &Payload) -> Result<()> {
        let command = Command::deserialize(payload, &self.board)?;
        debug!(target: "tactics::network", command = command.name(), "payload received");
        self.execute_network(command)?;
        Ok(())
    }

    /// Payloads of locally executed commands, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<Payload> {
        self.outbox.drain(..).collect()
    }

    pub fn pending_outbox(&self) -> usize {
        self.outbox.len()
    }
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("state", &self.state.kind())
            .field("turn", &self.turn)
            .field("units", &self.board.units().count())
            .field("log", &self.log.len())
            .finish()
    }
}
