use behavior_tree::NodeSpec;
use tactics_core::{
    Board, Command, Coord, EndTurnCommand, Player, PlayerId, PlayerKind, PlayerRegistry,
    RectangularGenerator, UnitId, UnitKind, UnitStats, UnitTemplate,
};
use tactics_runtime::ai::presets;
use tactics_runtime::{
    AiLeaf, AiPlayer, Game, GridController, Invocation, PositionEvaluatorSpec, RuntimeConfig,
    RuntimeError, StepOutcome, WeightedPosition,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn soldier() -> UnitTemplate {
    UnitTemplate::new("soldier", UnitStats::default())
}

fn against(opponent: PlayerKind) -> PlayerRegistry {
    PlayerRegistry::new()
        .with(Player::new(PlayerId(0), PlayerKind::Ai, "machine"))
        .with(Player::new(PlayerId(1), opponent, "opponent"))
}

fn game(board: Board, opponent: PlayerKind, tree: NodeSpec<AiLeaf>) -> Game {
    init_tracing();
    let controller = GridController::new(board, against(opponent), RuntimeConfig::default());
    Game::new(controller).with_ai(AiPlayer::new(PlayerId(0), tree).unwrap())
}

#[test]
fn move_walks_toward_an_unreachable_goal() {
    let mut board = RectangularGenerator::new(8, 3).generate();
    let ai = board.spawn(&soldier(), PlayerId(0), Coord::new(0, 0)).unwrap();
    board.spawn(&soldier(), PlayerId(1), Coord::new(7, 0)).unwrap();
    let tree = NodeSpec::leaf(AiLeaf::move_with(vec![WeightedPosition::new(
        PositionEvaluatorSpec::Distance,
        1.0,
    )]));
    let mut game = game(board, PlayerKind::Human, tree);

    let outcome = game.start().unwrap();

    assert_eq!(outcome, StepOutcome::AwaitingHuman(PlayerId(1)));
    let controller = game.controller();
    let unit = controller.board().unit(ai).unwrap();
    // (6, 0) scores best but costs 6; three points reach (3, 0) on the way.
    assert_eq!(unit.cell(), Coord::new(3, 0));
    assert_eq!(unit.movement_points, 0.0);

    let invocations: Vec<_> = controller
        .log()
        .iter()
        .map(|entry| (entry.command.name(), entry.invocation))
        .collect();
    assert_eq!(
        invocations,
        vec![("move", Invocation::Ai), ("end_turn", Invocation::Ai)]
    );
}

#[test]
fn move_detours_around_walls() {
    let mut board = RectangularGenerator::new(6, 3)
        .with_obstacle(Coord::new(1, 0))
        .with_obstacle(Coord::new(1, 1))
        .generate();
    let ai = board.spawn(&soldier(), PlayerId(0), Coord::new(0, 1)).unwrap();
    board.spawn(&soldier(), PlayerId(1), Coord::new(5, 1)).unwrap();
    let tree = NodeSpec::leaf(AiLeaf::move_with(vec![WeightedPosition::new(
        PositionEvaluatorSpec::Distance,
        1.0,
    )]));
    let mut game = game(board, PlayerKind::Human, tree);

    game.start().unwrap();

    // The only way out goes through (0, 2); three points end on (2, 2).
    let unit = game.controller().board().unit(ai).unwrap();
    assert_eq!(unit.cell(), Coord::new(2, 2));
}

#[test]
fn aggressive_ai_finishes_a_wounded_enemy() {
    let mut board = RectangularGenerator::new(4, 4).generate();
    board.spawn(&soldier(), PlayerId(0), Coord::new(0, 0)).unwrap();
    let enemy = board.spawn(&soldier(), PlayerId(1), Coord::new(1, 0)).unwrap();
    board.modify_health(enemy, -8).unwrap();
    let mut game = game(board, PlayerKind::Human, presets::aggressive());

    let outcome = game.start().unwrap();

    match outcome {
        StepOutcome::Ended(result) => {
            assert!(result.winners.contains(&PlayerId(0)));
            assert!(result.losers.contains(&PlayerId(1)));
        }
        other => panic!("expected the game to end, got {other:?}"),
    }
    assert!(game.controller().board().unit(enemy).is_none());
}

#[test]
fn spawner_waits_for_its_turn_delay() {
    let barracks = UnitTemplate::new("barracks", UnitStats::default())
        .with_kind(UnitKind::Structure { capturable: false });
    let mut board = RectangularGenerator::new(5, 5).generate();
    let spawner = board.spawn(&barracks, PlayerId(0), Coord::new(0, 0)).unwrap();
    board.spawn(&soldier(), PlayerId(1), Coord::new(4, 4)).unwrap();
    let mut game = game(board, PlayerKind::Remote, presets::spawner(soldier(), 1));

    assert_eq!(
        game.start().unwrap(),
        StepOutcome::AwaitingRemote(PlayerId(1))
    );
    assert_eq!(game.controller().board().units_of(PlayerId(0)).count(), 1);

    let end_turn = Command::from(EndTurnCommand::new(PlayerId(1))).serialize();
    assert_eq!(
        game.receive(&end_turn).unwrap(),
        StepOutcome::AwaitingRemote(PlayerId(1))
    );

    let board = game.controller().board();
    let recruits: Vec<_> = board
        .units_of(PlayerId(0))
        .filter(|unit| unit.id() != spawner)
        .collect();
    assert_eq!(recruits.len(), 1);
    // Ties toward the enemy go to the lowest coordinate.
    assert_eq!(recruits[0].cell(), Coord::new(0, 1));
    assert_eq!(recruits[0].id(), UnitId(2));
}

#[test]
fn ai_player_must_be_attached() {
    let mut board = RectangularGenerator::new(3, 3).generate();
    board.spawn(&soldier(), PlayerId(0), Coord::new(0, 0)).unwrap();
    board.spawn(&soldier(), PlayerId(1), Coord::new(2, 2)).unwrap();
    let controller = GridController::new(board, against(PlayerKind::Human), RuntimeConfig::default());
    let mut game = Game::new(controller);

    assert!(matches!(
        game.start(),
        Err(RuntimeError::AiNotSet(PlayerId(0)))
    ));
}

#[test]
fn trees_load_from_json() {
    let source = r#"{
        "sequence": [
            { "leaf": { "kind": "has_movement_points" } },
            { "leaf": { "kind": "move", "evaluators": [ { "evaluator": "distance" } ] } }
        ]
    }"#;
    let ai = AiPlayer::from_json(PlayerId(0), source).unwrap();
    assert_eq!(ai.tree().leaves().len(), 2);

    let empty = AiPlayer::from_json(PlayerId(0), r#"{ "selector": [] }"#);
    assert!(matches!(empty, Err(RuntimeError::Tree(_))));
}
