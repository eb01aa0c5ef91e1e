use tactics_core::combat::damage_between;
use tactics_core::pathfinding::path_cost;
use tactics_core::{
    AttackCommand, Board, CaptureCommand, Command, CommandEngine, Coord, GameConfig, MoveCommand,
    PathAlgorithm, PathCache, PlayerId, RectangularGenerator, SpawnCommand, UnitId, UnitKind,
    UnitStats, UnitTemplate,
};

fn soldier() -> UnitTemplate {
    UnitTemplate::new("soldier", UnitStats::default())
}

fn structure(name: &str, capturable: bool) -> UnitTemplate {
    UnitTemplate::new(name, UnitStats::default()).with_kind(UnitKind::Structure { capturable })
}

fn open_field() -> (Board, UnitId) {
    let mut board = RectangularGenerator::new(5, 5).generate();
    let walker = board.spawn(&soldier(), PlayerId(0), Coord::ORIGIN).unwrap();
    (board, walker)
}

fn assert_occupancy(board: &Board) {
    board.check_occupancy().unwrap();
    for cell in board.cells() {
        assert_eq!(
            cell.is_taken(),
            board.blocking_unit_at(cell.coord()).is_some(),
            "occupancy of {}",
            cell.coord()
        );
    }
}

#[test]
fn corner_to_corner_path_on_open_grid() {
    let (board, walker) = open_field();
    let unit = board.unit(walker).unwrap();

    for algorithm in [PathAlgorithm::Dijkstra, PathAlgorithm::AStar] {
        let cache = PathCache::build(&board, walker, algorithm).unwrap();
        let path = cache.find_path(&board, Coord::new(4, 4)).unwrap();

        assert_eq!(path.len(), 8, "{algorithm:?}");
        assert_eq!(path.last(), Some(&Coord::new(4, 4)));
        assert_eq!(path_cost(&board, unit, &path), Some(8.0));
        assert_eq!(cache.cost_to(&board, Coord::new(4, 4)).unwrap(), Some(8.0));
    }
}

#[test]
fn path_avoids_blocked_centre() {
    let mut obstacle = RectangularGenerator::new(5, 5)
        .with_obstacle(Coord::new(2, 2))
        .generate();
    let walker = obstacle.spawn(&soldier(), PlayerId(0), Coord::ORIGIN).unwrap();

    let (mut occupied, other) = open_field();
    occupied.spawn(&soldier(), PlayerId(1), Coord::new(2, 2)).unwrap();

    for (board, unit) in [(&obstacle, walker), (&occupied, other)] {
        for algorithm in [PathAlgorithm::Dijkstra, PathAlgorithm::AStar] {
            let cache = PathCache::build(board, unit, algorithm).unwrap();
            let path = cache.find_path(board, Coord::new(4, 4)).unwrap();

            assert_eq!(path.len(), 8);
            assert!(!path.contains(&Coord::new(2, 2)));
        }
    }
}

#[test]
fn enclosed_destination_has_no_path() {
    let (mut board, walker) = open_field();
    board.spawn(&soldier(), PlayerId(1), Coord::new(3, 4)).unwrap();
    board.spawn(&soldier(), PlayerId(1), Coord::new(4, 3)).unwrap();

    for algorithm in [PathAlgorithm::Dijkstra, PathAlgorithm::AStar] {
        let cache = PathCache::build(&board, walker, algorithm).unwrap();
        assert!(cache.find_path(&board, Coord::new(4, 4)).unwrap().is_empty());
        assert_eq!(cache.cost_to(&board, Coord::new(4, 4)).unwrap(), None);
    }
}

#[test]
fn occupancy_holds_through_a_command_sequence() {
    let mut board = RectangularGenerator::new(5, 5).generate();
    let runner = board.spawn(&soldier(), PlayerId(0), Coord::new(0, 0)).unwrap();
    let striker = board.spawn(&soldier(), PlayerId(0), Coord::new(3, 0)).unwrap();
    let victim = board.spawn(&soldier(), PlayerId(1), Coord::new(4, 0)).unwrap();
    let town = board
        .spawn(&structure("town", true), PlayerId(1), Coord::new(0, 2))
        .unwrap();
    let barracks = board
        .spawn(&structure("barracks", false), PlayerId(0), Coord::new(4, 4))
        .unwrap();
    board.modify_health(victim, -8).unwrap();
    let config = GameConfig::default();

    let spawn = SpawnCommand::next(&board, barracks, Coord::new(4, 3), soldier());
    let recruit = spawn.unit;
    let attack = AttackCommand::resolve(&board, &config, striker, victim).unwrap();
    let commands: Vec<Command> = vec![
        MoveCommand::new(runner, vec![Coord::new(0, 1), Coord::new(0, 2)]).into(),
        CaptureCommand::new(runner, town).into(),
        attack.into(),
        spawn.into(),
        MoveCommand::new(striker, vec![Coord::new(4, 0)]).into(),
    ];

    let mut engine = CommandEngine::new(&mut board, &config);
    for command in &commands {
        engine.execute(command).unwrap();
    }

    assert_occupancy(&board);
    assert!(board.unit(victim).is_none());
    assert_eq!(board.unit(town).unwrap().player, PlayerId(0));
    assert_eq!(board.unit(recruit).unwrap().cell(), Coord::new(4, 3));
    assert!(board.cell(Coord::new(0, 2)).unwrap().is_taken());
    assert!(!board.cell(Coord::new(3, 0)).unwrap().is_taken());
    assert!(board.cell(Coord::new(4, 0)).unwrap().is_taken());
}

#[test]
fn damage_never_drops_below_one() {
    let board = RectangularGenerator::new(2, 1).generate();
    let config = GameConfig::default();
    for attack in 0..6 {
        for defence in [0, attack, attack + 4] {
            let attacker = UnitTemplate::new(
                "attacker",
                UnitStats {
                    attack_factor: attack,
                    ..UnitStats::default()
                },
            )
            .instantiate(UnitId(0), PlayerId(0), Coord::new(0, 0));
            let defender = UnitTemplate::new(
                "defender",
                UnitStats {
                    defence_factor: defence,
                    ..UnitStats::default()
                },
            )
            .instantiate(UnitId(1), PlayerId(1), Coord::new(1, 0));

            let damage = damage_between(&board, &attacker, &defender, config.minimum_damage);
            assert!(damage >= 1, "attack {attack} defence {defence}");
            assert_eq!(damage, (attack - defence).max(1));
        }
    }
}

#[test]
fn replayed_commands_have_identical_effects() {
    let build = || {
        let mut board = RectangularGenerator::new(4, 4).generate();
        let ours = board.spawn(&soldier(), PlayerId(0), Coord::new(0, 0)).unwrap();
        let theirs = board.spawn(&soldier(), PlayerId(1), Coord::new(2, 1)).unwrap();
        (board, ours, theirs)
    };
    let (mut local, ours, theirs) = build();
    let (mut remote, _, _) = build();
    let config = GameConfig::default();

    let moved: Command = MoveCommand::new(ours, vec![Coord::new(1, 0), Coord::new(1, 1)]).into();
    let attack: Command = {
        let mut engine = CommandEngine::new(&mut local, &config);
        engine.execute(&moved).unwrap();
        AttackCommand::resolve(&local, &config, ours, theirs)
            .unwrap()
            .into()
    };
    CommandEngine::new(&mut local, &config)
        .execute(&attack)
        .unwrap();

    for command in [&moved, &attack] {
        let replayed = Command::deserialize(&command.serialize(), &remote).unwrap();
        assert_eq!(&replayed, command);
        CommandEngine::new(&mut remote, &config)
            .execute(&replayed)
            .unwrap();
    }

    for id in [ours, theirs] {
        assert_eq!(local.unit(id), remote.unit(id));
    }
    assert_eq!(remote.unit(theirs).unwrap().health, 8);
}
