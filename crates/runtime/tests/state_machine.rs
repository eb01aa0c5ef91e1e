use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tactics_core::{
    Board, Coord, ExecuteError, GameEvent, GameResult, Player, PlayerId, PlayerKind,
    PlayerRegistry, RectangularGenerator, UnitId, UnitStats, UnitTemplate, UnitTurnResolver,
};
use tactics_runtime::{
    GridController, GridState, GridStateKind, ListenerScope, RuntimeConfig, RuntimeError, Topic,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn hotseat() -> PlayerRegistry {
    PlayerRegistry::new()
        .with(Player::new(PlayerId(0), PlayerKind::Human, "blue"))
        .with(Player::new(PlayerId(1), PlayerKind::Human, "red"))
}

fn board_with(red_at: Coord) -> (Board, UnitId, UnitId) {
    let mut board = RectangularGenerator::new(5, 5).generate();
    let soldier = UnitTemplate::new("soldier", UnitStats::default());
    let blue = board.spawn(&soldier, PlayerId(0), Coord::new(0, 0)).unwrap();
    let red = board.spawn(&soldier, PlayerId(1), red_at).unwrap();
    (board, blue, red)
}

fn started(board: Board) -> GridController {
    init_tracing();
    let mut controller = GridController::new(board, hotseat(), RuntimeConfig::default());
    controller.start().unwrap();
    controller
}

#[test]
fn first_player_receives_input() {
    let (board, blue, _) = board_with(Coord::new(4, 4));
    let controller = started(board);

    assert_eq!(controller.state(), &GridState::AwaitInput);
    assert_eq!(controller.current_player(), Some(PlayerId(0)));
    let turn = controller.turn().unwrap();
    assert_eq!(turn.turn, 1);
    assert!(turn.is_playable(blue));
}

#[test]
fn move_keeps_the_unit_selected() {
    let (board, blue, _) = board_with(Coord::new(4, 4));
    let mut controller = started(board);

    controller.on_unit_clicked(blue);
    assert_eq!(controller.state().selected_unit(), Some(blue));

    controller.on_cell_clicked(Coord::new(0, 2));

    let unit = controller.board().unit(blue).unwrap();
    assert_eq!(unit.cell(), Coord::new(0, 2));
    assert_eq!(unit.movement_points, 1.0);
    assert_eq!(controller.state().kind(), GridStateKind::UnitSelected);
    assert_eq!(controller.state().selected_unit(), Some(blue));
    assert_eq!(controller.log().len(), 1);
    assert_eq!(controller.pending_outbox(), 1);
}

#[test]
fn click_no_ability_wants_drops_selection() {
    let (board, blue, red) = board_with(Coord::new(4, 4));
    let mut controller = started(board);

    controller.on_unit_clicked(red);
    assert_eq!(controller.state(), &GridState::AwaitInput);

    controller.on_unit_clicked(blue);
    controller.on_cell_clicked(Coord::new(4, 3));

    assert_eq!(controller.state(), &GridState::AwaitInput);
    assert_eq!(controller.board().unit(blue).unwrap().cell(), Coord::ORIGIN);
    assert!(controller.log().is_empty());
}

#[test]
fn clicks_on_units_not_playable_leave_the_state_alone() {
    let (board, _, red) = board_with(Coord::new(4, 4));
    let mut controller = started(board);

    controller.on_unit_clicked(red);
    assert_eq!(controller.state(), &GridState::AwaitInput);
    assert_eq!(controller.state().selected_unit(), None);

    controller.on_cell_clicked(Coord::new(4, 4));
    assert_eq!(controller.state(), &GridState::AwaitInput);

    controller.on_unit_clicked(UnitId(99));
    assert_eq!(controller.state(), &GridState::AwaitInput);
    assert!(controller.log().is_empty());
}

#[test]
fn clicking_another_own_unit_switches_selection() {
    let (mut board, blue, red) = board_with(Coord::new(4, 4));
    let soldier = UnitTemplate::new("soldier", UnitStats::default());
    let second = board.spawn(&soldier, PlayerId(0), Coord::new(2, 2)).unwrap();
    let mut controller = started(board);

    controller.on_unit_clicked(blue);
    controller.on_unit_clicked(second);
    assert_eq!(controller.state().kind(), GridStateKind::UnitSelected);
    assert_eq!(controller.state().selected_unit(), Some(second));

    // The occupied cell is no move target, so the click selects its unit.
    controller.on_cell_clicked(Coord::ORIGIN);
    assert_eq!(controller.state().selected_unit(), Some(blue));

    // Enemies out of reach are not selectable.
    controller.on_unit_clicked(red);
    assert_eq!(controller.state(), &GridState::AwaitInput);
    assert!(controller.log().is_empty());
}

#[test]
fn end_turn_fires_turn_events_in_order() {
    let (board, _, red) = board_with(Coord::new(4, 4));
    let mut controller = started(board);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    controller.subscribe(ListenerScope::Topic(Topic::Turn), move |event| {
        if let GameEvent::TurnStarted { context, .. } | GameEvent::TurnEnded { context, .. } =
            event
        {
            let started = matches!(event, GameEvent::TurnStarted { .. });
            sink.lock().unwrap().push((started, context.player, context.turn));
        }
    });

    controller.end_turn().unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(false, PlayerId(0), 1), (true, PlayerId(1), 2)]
    );
    assert_eq!(controller.current_player(), Some(PlayerId(1)));
    assert!(controller.turn().unwrap().is_playable(red));
    assert_eq!(controller.state(), &GridState::AwaitInput);
}

#[test]
fn lethal_attack_ends_the_game() {
    let (mut board, blue, red) = board_with(Coord::new(1, 0));
    board.modify_health(red, -8).unwrap();
    let mut controller = started(board);

    controller.on_unit_clicked(blue);
    controller.on_unit_clicked(red);

    assert!(controller.board().unit(red).is_none());
    let expected = GameResult {
        winners: BTreeSet::from([PlayerId(0)]),
        losers: BTreeSet::from([PlayerId(1)]),
    };
    assert_eq!(controller.result(), Some(&expected));
    assert!(controller.is_over());

    // Terminal: input and turn changes are ignored, commands are refused.
    controller.end_turn().unwrap();
    controller.on_unit_clicked(blue);
    assert_eq!(controller.state().kind(), GridStateKind::GameEnded);
    assert!(matches!(
        controller.undo_last(),
        Err(RuntimeError::Execute(ExecuteError::GameEnded))
    ));
}

#[test]
fn undo_reverts_the_last_move() {
    let (board, blue, _) = board_with(Coord::new(4, 4));
    let mut controller = started(board);

    controller.on_unit_clicked(blue);
    controller.on_cell_clicked(Coord::new(1, 1));
    controller.undo_last().unwrap();

    let unit = controller.board().unit(blue).unwrap();
    assert_eq!(unit.cell(), Coord::ORIGIN);
    assert_eq!(unit.movement_points, 3.0);
    assert!(controller.log().is_empty());
    assert_eq!(controller.pending_outbox(), 0);
    assert_eq!(controller.state().selected_unit(), Some(blue));
    controller.board().check_occupancy().unwrap();

    assert!(matches!(
        controller.undo_last(),
        Err(RuntimeError::NothingToUndo)
    ));
}

#[test]
fn end_turn_cannot_be_undone() {
    let (board, _, _) = board_with(Coord::new(4, 4));
    let mut controller = started(board);

    controller.end_turn().unwrap();

    assert!(matches!(
        controller.undo_last(),
        Err(RuntimeError::Command(tactics_core::CommandError::NotUndoable("end_turn")))
    ));
    assert_eq!(controller.current_player(), Some(PlayerId(1)));
}

#[test]
fn unit_turns_refill_only_the_acting_unit() {
    let (mut board, blue, red) = board_with(Coord::new(4, 4));
    let soldier = UnitTemplate::new("soldier", UnitStats::default());
    let second = board.spawn(&soldier, PlayerId(0), Coord::new(2, 2)).unwrap();
    board.unit_mut(second).unwrap().movement_points = 0.0;
    init_tracing();
    let mut controller = GridController::new(board, hotseat(), RuntimeConfig::default())
        .with_resolver(UnitTurnResolver);
    controller.start().unwrap();

    let turn = controller.turn().unwrap();
    assert!(turn.is_playable(blue));
    assert!(!turn.is_playable(second));
    assert_eq!(controller.board().unit(second).unwrap().movement_points, 0.0);

    controller.end_turn().unwrap();
    assert!(controller.turn().unwrap().is_playable(red));
    assert_eq!(controller.board().unit(second).unwrap().movement_points, 0.0);

    controller.end_turn().unwrap();
    assert!(controller.turn().unwrap().is_playable(second));
    assert_eq!(controller.board().unit(second).unwrap().movement_points, 3.0);
}
