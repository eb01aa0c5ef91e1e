//! Decision and execution of AI action leaves.
//!
//! Every action works in two stages: score the legal candidates with a
//! freshly initialized scorer, then execute the command for the best one
//! through the controller's AI entry point. Ties go to the first candidate
//! in coordinate (cells) or id (units) order.

use behavior_tree::Status;
use tracing::{debug, trace};

use tactics_core::combat::targets_in_range;
use tactics_core::{
    AttackCommand, Board, CaptureCommand, Command, Coord, HealCommand, MoveCommand, PathCache,
    PathError, SpawnCommand, Unit, UnitTemplate,
};

use super::context::AiContext;
use super::evaluator::{PositionScorer, TargetScorer, WeightedPosition, WeightedTarget};

fn execute(ctx: &mut AiContext<'_>, command: Command) -> Status {
    let name = command.name();
    match ctx.execute(command) {
        Ok(()) => {
            debug!(target: "tactics::ai", unit = %ctx.unit, command = name, "ai command executed");
            Status::Success
        }
        Err(error) => {
            debug!(target: "tactics::ai", unit = %ctx.unit, command = name, %error, "ai command failed");
            Status::Failure
        }
    }
}

// ============================================================================
// Move
// ============================================================================

pub(crate) fn move_unit(ctx: &mut AiContext<'_>, evaluators: &[WeightedPosition]) -> Status {
    let Some(unit) = ctx.actor().cloned() else {
        return Status::Failure;
    };
    if unit.movement_points <= 0.0 || !ctx.board().rules_for(&unit).can_move(&unit) {
        return Status::Failure;
    }
    let id = unit.id();
    if let Err(error) = ctx.controller_mut().prime_paths(id) {
        debug!(target: "tactics::ai", unit = %id, %error, "no path graph");
        return Status::Failure;
    }

    let mut scorer = PositionScorer::new(evaluators);
    let path = {
        let board = ctx.board();
        scorer.initialize(&unit, board, ctx.game_config());
        ctx.controller()
            .paths()
            .get(id)
            .and_then(|paths| choose_path(board, paths, &unit, &scorer))
    };

    match path {
        Ok(Some(path)) => execute(ctx, MoveCommand::new(id, path).into()),
        Ok(None) => {
            trace!(target: "tactics::ai", unit = %id, "no cell beats staying put");
            Status::Failure
        }
        Err(error) => {
            debug!(target: "tactics::ai", unit = %id, %error, "path query failed");
            Status::Failure
        }
    }
}

/// Two-pass move selection.
///
/// The first pass finds the best cell the unit could ever stand on,
/// ignoring movement points. The second walks the path toward that goal
/// and stops at the best scoring cell still affordable this turn, so a
/// distant goal still pulls the unit in its direction.
fn choose_path(
    board: &Board,
    paths: &PathCache,
    unit: &Unit,
    scorer: &PositionScorer,
) -> Result<Option<Vec<Coord>>, PathError> {
    let rules = board.rules_for(unit);
    let origin = unit.cell();
    let stay = scorer.score(origin, unit, board);
    let movable = |coord: Coord| {
        board
            .cell(coord)
            .is_some_and(|cell| rules.is_cell_movable_to(unit, board, cell))
    };

    let mut candidates: Vec<Coord> = paths
        .reachable(board)?
        .into_iter()
        .map(|(coord, _)| coord)
        .filter(|coord| *coord != origin && movable(*coord))
        .collect();
    candidates.sort();

    let mut goal: Option<(Coord, f32)> = None;
    for coord in candidates {
        let score = scorer.score(coord, unit, board);
        if goal.is_none_or(|(_, best)| score > best) {
            goal = Some((coord, score));
        }
    }
    let Some((goal, goal_score)) = goal.filter(|(_, score)| *score > stay) else {
        return Ok(None);
    };
    trace!(target: "tactics::ai", unit = %unit.id(), %goal, score = goal_score, "move goal");

    let path = paths.find_path(board, goal)?;
    let mut spent = 0.0;
    let mut previous = origin;
    let mut best: Option<(usize, f32)> = None;
    for (index, step) in path.iter().copied().enumerate() {
        let Some(cost) = paths.graph().edge_cost(previous, step) else {
            break;
        };
        spent += cost;
        if spent > unit.movement_points {
            break;
        }
        previous = step;
        if !movable(step) {
            continue;
        }
        let score = scorer.score(step, unit, board);
        if score > best.map_or(stay, |(_, best)| best) {
            best = Some((index, score));
        }
    }

    Ok(best.map(|(index, _)| path[..=index].to_vec()))
}

// ============================================================================
// Attack
// ============================================================================

pub(crate) fn attack(ctx: &mut AiContext<'_>, evaluators: &[WeightedTarget]) -> Status {
    let Some(unit) = ctx.actor().cloned() else {
        return Status::Failure;
    };
    if unit.action_points == 0 {
        return Status::Failure;
    }

    let mut scorer = TargetScorer::new(evaluators);
    let command = {
        let board = ctx.board();
        scorer.initialize(&unit, board, ctx.game_config());
        let mut best: Option<(&Unit, f32)> = None;
        for target in targets_in_range(board, &unit, unit.cell())
            .into_iter()
            .filter_map(|id| board.unit(id))
        {
            let score = scorer.score(target, &unit, board);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((target, score));
            }
        }
        best.map(|(target, _)| {
            AttackCommand::resolve(board, ctx.game_config(), unit.id(), target.id())
        })
    };

    match command {
        Some(Ok(command)) => execute(ctx, command.into()),
        Some(Err(error)) => {
            debug!(target: "tactics::ai", unit = %unit.id(), %error, "attack not resolvable");
            Status::Failure
        }
        None => Status::Failure,
    }
}

// ============================================================================
// Capture
// ============================================================================

pub(crate) fn capture(ctx: &mut AiContext<'_>) -> Status {
    let Some(unit) = ctx.actor() else {
        return Status::Failure;
    };
    let board = ctx.board();
    let structure = board
        .units_at(unit.cell())
        .find(|other| other.is_enemy_of(unit) && board.rules_for(other).is_capturable(other))
        .map(Unit::id);

    match structure {
        Some(structure) => {
            let command = CaptureCommand::new(ctx.unit, structure);
            execute(ctx, command.into())
        }
        None => Status::Failure,
    }
}

// ============================================================================
// Spawn
// ============================================================================

pub(crate) fn spawn(
    ctx: &mut AiContext<'_>,
    template: &UnitTemplate,
    evaluators: &[WeightedPosition],
) -> Status {
    let Some(spawner) = ctx.actor().cloned() else {
        return Status::Failure;
    };

    let mut scorer = PositionScorer::new(evaluators);
    let command = {
        let board = ctx.board();
        let config = ctx.game_config();
        let preview = template.instantiate(board.next_unit_id(), spawner.player, spawner.cell());
        scorer.initialize(&preview, board, config);

        let mut cells: Vec<Coord> = std::iter::once(spawner.cell())
            .chain(board.neighbours(spawner.cell()).map(|cell| cell.coord()))
            .collect();
        cells.sort();

        let mut best: Option<(SpawnCommand, f32)> = None;
        for cell in cells {
            let command = SpawnCommand::next(board, spawner.id(), cell, template.clone());
            if Command::from(command.clone())
                .transition()
                .pre_validate(board, config)
                .is_err()
            {
                continue;
            }
            let score = scorer.score(cell, &preview, board);
            if best.as_ref().is_none_or(|(_, top)| score > *top) {
                best = Some((command, score));
            }
        }
        best.map(|(command, _)| command)
    };

    match command {
        Some(command) => execute(ctx, command.into()),
        None => Status::Failure,
    }
}

// ============================================================================
// Heal
// ============================================================================

pub(crate) fn heal(ctx: &mut AiContext<'_>, amount: i32) -> Status {
    let Some(healer) = ctx.actor() else {
        return Status::Failure;
    };
    let board = ctx.board();
    let config = ctx.game_config();

    let mut best: Option<(HealCommand, f32)> = None;
    for ally in board.units_of(healer.player) {
        let command = HealCommand::new(healer.id(), ally.id(), amount);
        if Command::from(command.clone())
            .transition()
            .pre_validate(board, config)
            .is_err()
        {
            continue;
        }
        let ratio = ally.health as f32 / ally.stats.max_health.max(1) as f32;
        if best.as_ref().is_none_or(|(_, lowest)| ratio < *lowest) {
            best = Some((command, ratio));
        }
    }

    match best {
        Some((command, _)) => execute(ctx, command.into()),
        None => Status::Failure,
    }
}
