use std::cell::RefCell;
use std::rc::Rc;

use battleship::{
    fleet_from_lengths, fleet_from_types, AttackOutcome, Coord, FleetSpec, GameConfig, GameError,
    GameEvent, GameManager, GameState, Orientation, Player, Ship, ShipCoordinate, Strategy,
    CLASSIC_FLEET,
};

use Orientation::{Horizontal, Vertical};

const LAYOUT: [ShipCoordinate; 3] = [(1, 1, Vertical), (4, 1, Horizontal), (6, 6, Horizontal)];

fn humans() -> GameManager {
    GameManager::new([
        Player::human("Player 1").unwrap(),
        Player::human("Player 2").unwrap(),
    ])
}

fn three_ships() -> Vec<Ship> {
    fleet_from_lengths(&[2, 3, 4]).unwrap()
}

fn single_ship_at_1_1() -> Option<FleetSpec> {
    Some(FleetSpec::at(
        vec![Ship::new(1).unwrap()],
        vec![(1, 1, Vertical)],
    ))
}

fn classic() -> Option<FleetSpec> {
    Some(FleetSpec::random(fleet_from_types(&CLASSIC_FLEET).unwrap()))
}

fn record_events(manager: &mut GameManager) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    manager
        .events()
        .subscribe(move |e| sink.borrow_mut().push(e.clone()));
    log
}

#[test]
fn test_new_manager_defaults() {
    let manager = humans();
    assert_eq!(manager.state(), GameState::Initialization);
    assert_eq!(manager.turn(), 0);
    assert!(manager.current_player().is_none());
    assert!(manager.winner().is_none());
    assert_eq!(manager.players()[1].name(), "Player 2");
}

#[test]
fn test_initialize_ships_validation() {
    let mut manager = humans();
    assert_eq!(
        manager.initialize_ships(2, three_ships(), None).unwrap_err(),
        GameError::InvalidPlayerIndex(2)
    );
    assert_eq!(
        manager.initialize_ships(0, Vec::new(), None).unwrap_err(),
        GameError::EmptyShipList
    );
    assert_eq!(
        manager.initialize_ships(0, three_ships(), Some(&[])).unwrap_err(),
        GameError::EmptyCoordinateList
    );
    assert_eq!(
        manager
            .initialize_ships(0, three_ships(), Some(&LAYOUT[..2]))
            .unwrap_err(),
        GameError::CoordinateCountMismatch {
            ships: 3,
            coordinates: 2
        }
    );
}

#[test]
fn test_initialize_ships_at_coordinates() {
    let mut manager = humans();
    for player in 0..2 {
        let placements = manager
            .initialize_ships(player, three_ships(), Some(&LAYOUT))
            .unwrap();
        assert_eq!(placements.len(), 3);
        let board = manager.player(player).unwrap().board();
        assert_eq!(board.ship_at(1, 1).unwrap().length(), 2);
        assert_eq!(board.ship_at(4, 1).unwrap().length(), 3);
        assert_eq!(board.ship_at(6, 6).unwrap().length(), 4);
    }
}

#[test]
fn test_initialize_ships_clamps_to_edge() {
    let mut manager = humans();
    let placements = manager
        .initialize_ships(0, vec![Ship::new(3).unwrap()], Some(&[(9, 9, Vertical)]))
        .unwrap();
    assert_eq!(placements[0].start, Coord::new(7, 9));
}

#[test]
fn test_failed_layout_keeps_previous_board() {
    let mut manager = humans();
    manager
        .initialize_ships(0, three_ships(), Some(&LAYOUT))
        .unwrap();
    let overlapping = [(0, 0, Horizontal), (0, 1, Vertical)];
    assert_eq!(
        manager
            .initialize_ships(0, fleet_from_lengths(&[3, 2]).unwrap(), Some(&overlapping))
            .unwrap_err(),
        GameError::OccupiedCell { row: 0, col: 1 }
    );
    let board = manager.player(0).unwrap().board();
    assert_eq!(board.ship_count(), 3);
    assert!(board.ship_at(0, 0).is_none());
}

#[test]
fn test_random_initialization() {
    let mut manager = GameManager::with_config(
        [
            Player::human("Player 1").unwrap(),
            Player::human("Player 2").unwrap(),
        ],
        GameConfig::with_seed(2024),
    );
    let events = record_events(&mut manager);
    let placements = manager
        .initialize_ships(1, fleet_from_types(&CLASSIC_FLEET).unwrap(), None)
        .unwrap();
    assert_eq!(placements.len(), 5);
    let board = manager.player(1).unwrap().board();
    assert_eq!(board.ship_count(), 5);
    assert_eq!(board.occupied().len(), 17);
    assert_eq!(board.ship(0).unwrap().name(), Some("Carrier"));
    assert_eq!(events.borrow().len(), 5);
    assert!(events
        .borrow()
        .iter()
        .all(|e| matches!(e, GameEvent::ShipPlaced { player: 1, .. })));
}

#[test]
fn test_randomize_keeps_ship_lengths() {
    let mut manager = humans();
    manager
        .initialize_ships(0, three_ships(), Some(&LAYOUT))
        .unwrap();
    manager.randomize_ships(0).unwrap();
    let lengths: Vec<usize> = manager
        .player(0)
        .unwrap()
        .board()
        .ships()
        .map(Ship::length)
        .collect();
    assert_eq!(lengths, vec![2, 3, 4]);
    assert_eq!(
        manager.randomize_ships(1).unwrap_err(),
        GameError::EmptyShipList
    );
}

#[test]
fn test_play_turn_requires_started_game() {
    let mut manager = humans();
    assert_eq!(
        manager.play_turn(1, 1).unwrap_err(),
        GameError::GameNotInProgress
    );
    assert_eq!(
        manager.switch_turn().unwrap_err(),
        GameError::GameNotInProgress
    );
}

#[test]
fn test_start_game_validation() {
    let mut manager = humans();
    assert_eq!(
        manager
            .start_game(5, [single_ship_at_1_1(), single_ship_at_1_1()])
            .unwrap_err(),
        GameError::InvalidPlayerIndex(5)
    );
    assert_eq!(
        manager
            .start_game(0, [single_ship_at_1_1(), None])
            .unwrap_err(),
        GameError::EmptyShipList
    );
    assert_eq!(manager.state(), GameState::Initialization);
    assert_eq!(manager.player(0).unwrap().board().ship_count(), 0);
}

#[test]
fn test_bad_second_fleet_leaves_both_boards_untouched() {
    let mut manager = humans();
    let events = record_events(&mut manager);
    let touching = Some(FleetSpec::at(
        fleet_from_lengths(&[1, 1]).unwrap(),
        vec![(0, 0, Vertical), (0, 1, Vertical)],
    ));
    assert_eq!(
        manager
            .start_game(0, [single_ship_at_1_1(), touching])
            .unwrap_err(),
        GameError::AdjacentShip { row: 0, col: 0 }
    );
    assert_eq!(manager.state(), GameState::Initialization);
    assert_eq!(manager.player(0).unwrap().board().ship_count(), 0);
    assert_eq!(manager.player(1).unwrap().board().ship_count(), 0);
    assert!(events.borrow().is_empty());

    // a mismatched coordinate list is caught before anything is placed too
    let short = Some(FleetSpec::at(three_ships(), LAYOUT[..1].to_vec()));
    assert_eq!(
        manager.start_game(0, [single_ship_at_1_1(), short]).unwrap_err(),
        GameError::CoordinateCountMismatch {
            ships: 3,
            coordinates: 1
        }
    );
    assert_eq!(manager.player(0).unwrap().board().ship_count(), 0);
    assert!(events.borrow().is_empty());
}

#[test]
fn test_start_game_reuses_initialized_fleet() {
    let mut manager = humans();
    manager
        .initialize_ships(1, three_ships(), Some(&LAYOUT))
        .unwrap();
    manager.start_game(1, [single_ship_at_1_1(), None]).unwrap();
    assert_eq!(manager.state(), GameState::InProgress);
    assert_eq!(manager.current_player_index(), Some(1));
    assert_eq!(manager.turn(), 1);
    assert_eq!(manager.player(1).unwrap().board().ship_count(), 3);
}

#[test]
fn test_single_shot_wins() {
    let mut manager = humans();
    let events = record_events(&mut manager);
    let records = manager
        .start_game(0, [single_ship_at_1_1(), single_ship_at_1_1()])
        .unwrap();
    assert!(records.is_empty());
    assert_eq!(manager.state(), GameState::InProgress);
    assert_eq!(manager.turn(), 1);
    assert_eq!(manager.current_player().unwrap().name(), "Player 1");

    let records = manager.play_turn(1, 1).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AttackOutcome::Hit);
    assert_eq!(records[0].target, 1);
    assert_eq!(manager.state(), GameState::GameOver);
    assert_eq!(manager.winner().unwrap().name(), "Player 1");
    assert_eq!(manager.turn(), 1);

    assert_eq!(
        manager.play_turn(1, 1).unwrap_err(),
        GameError::GameNotInProgress
    );

    let events = events.borrow();
    let tail = &events[events.len() - 3..];
    assert_eq!(
        tail,
        &[
            GameEvent::AttackResolved {
                attacker: 0,
                target: 1,
                coord: Coord::new(1, 1),
                outcome: AttackOutcome::Hit,
            },
            GameEvent::StateChanged {
                old: GameState::InProgress,
                new: GameState::GameOver,
            },
            GameEvent::GameOver {
                winner: "Player 1".to_string(),
            },
        ]
    );
}

#[test]
fn test_start_sequence_events() {
    let mut manager = humans();
    let events = record_events(&mut manager);
    manager
        .start_game(1, [single_ship_at_1_1(), single_ship_at_1_1()])
        .unwrap();
    let events = events.borrow();
    assert!(matches!(events[0], GameEvent::ShipPlaced { player: 0, .. }));
    assert!(matches!(events[1], GameEvent::ShipPlaced { player: 1, .. }));
    assert_eq!(
        events[2],
        GameEvent::StateChanged {
            old: GameState::Initialization,
            new: GameState::InProgress,
        }
    );
    assert_eq!(
        events[3],
        GameEvent::TurnChanged {
            previous: None,
            next: 1,
            turn: 1,
        }
    );
}

#[test]
fn test_switch_turn_alternates() {
    let mut manager = humans();
    manager
        .start_game(0, [single_ship_at_1_1(), single_ship_at_1_1()])
        .unwrap();
    let mut expected = 0;
    for turn in 1..=6 {
        assert_eq!(manager.current_player_index(), Some(expected));
        assert_eq!(manager.turn(), turn);
        manager.switch_turn().unwrap();
        expected = 1 - expected;
    }
}

#[test]
fn test_miss_passes_turn_and_repeat_is_rejected() {
    let mut manager = humans();
    manager
        .start_game(0, [single_ship_at_1_1(), single_ship_at_1_1()])
        .unwrap();
    let records = manager.play_turn(5, 5).unwrap();
    assert_eq!(records[0].outcome, AttackOutcome::Miss);
    assert_eq!(manager.current_player_index(), Some(1));
    assert_eq!(manager.turn(), 2);

    manager.play_turn(5, 5).unwrap();
    assert_eq!(manager.current_player_index(), Some(0));
    assert_eq!(
        manager.play_turn(5, 5).unwrap_err(),
        GameError::AlreadyAttacked { row: 5, col: 5 }
    );
    assert_eq!(manager.current_player_index(), Some(0));
    assert_eq!(manager.turn(), 3);
    assert_eq!(
        manager.play_turn(10, 0).unwrap_err(),
        GameError::OutOfBounds { row: 10, col: 0 }
    );
}

#[test]
fn test_setup_is_locked_after_start() {
    let mut manager = humans();
    manager
        .start_game(0, [single_ship_at_1_1(), single_ship_at_1_1()])
        .unwrap();
    assert_eq!(
        manager
            .initialize_ships(0, three_ships(), Some(&LAYOUT))
            .unwrap_err(),
        GameError::GameAlreadyStarted
    );
    assert_eq!(
        manager.move_ship(0, 0, 5, 5, Vertical).unwrap_err(),
        GameError::GameAlreadyStarted
    );
    assert_eq!(
        manager
            .start_game(0, [single_ship_at_1_1(), single_ship_at_1_1()])
            .unwrap_err(),
        GameError::GameAlreadyStarted
    );
}

#[test]
fn test_move_ship_before_start() {
    let mut manager = humans();
    manager
        .initialize_ships(0, three_ships(), Some(&LAYOUT))
        .unwrap();
    let events = record_events(&mut manager);

    let moved = manager.move_ship(0, 0, 9, 9, Horizontal).unwrap();
    assert_eq!(moved.start, Coord::new(9, 8));
    assert!(manager.player(0).unwrap().board().ship_at(1, 1).is_none());

    // next to the length-3 ship on row 4
    let err = manager.move_ship(0, 0, 5, 1, Horizontal).unwrap_err();
    assert_eq!(err, GameError::AdjacentShip { row: 4, col: 1 });
    assert_eq!(
        manager.player(0).unwrap().board().placement(0).unwrap().start,
        Coord::new(9, 8)
    );
    assert_eq!(
        manager.move_ship(0, 9, 0, 0, Vertical).unwrap_err(),
        GameError::UnknownShip(9)
    );

    let events = events.borrow();
    assert_eq!(
        events[0],
        GameEvent::ShipMoved {
            player: 0,
            ship: 0,
            start: Coord::new(9, 8),
            orientation: Horizontal,
        }
    );
    assert!(matches!(events[1], GameEvent::MoveRejected { player: 0, ship: 0, .. }));
}

#[test]
fn test_automated_opponent_replies_immediately() {
    let mut manager = GameManager::with_config(
        [
            Player::human("Player").unwrap(),
            Player::automated("Computer", Strategy::Hunt).unwrap(),
        ],
        GameConfig::with_seed(99),
    );
    let records = manager.start_game(0, [classic(), classic()]).unwrap();
    assert!(records.is_empty());

    let records = manager.play_turn(0, 0).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].attacker, 0);
    assert_eq!(records[1].attacker, 1);
    assert_eq!(manager.current_player_index(), Some(0));
    assert_eq!(manager.turn(), 3);
    assert_eq!(manager.player(1).unwrap().history().len(), 1);
}

#[test]
fn test_automated_first_player_moves_on_start() {
    let mut manager = GameManager::with_config(
        [
            Player::automated("Computer", Strategy::Random).unwrap(),
            Player::human("Player").unwrap(),
        ],
        GameConfig::with_seed(5),
    );
    let records = manager.start_game(0, [classic(), classic()]).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].attacker, 0);
    assert_eq!(manager.current_player_index(), Some(1));
    assert_eq!(manager.turn(), 2);
}

#[test]
fn test_strategy_change_through_manager() {
    let mut manager = humans();
    manager.set_player_strategy(1, Strategy::Tracking).unwrap();
    assert_eq!(
        manager.player(1).unwrap().strategy(),
        Some(Strategy::Tracking)
    );
    assert_eq!(
        manager.set_player_strategy(3, Strategy::Random).unwrap_err(),
        GameError::InvalidPlayerIndex(3)
    );
    assert_eq!(
        manager.set_player_name(0, "").unwrap_err(),
        GameError::InvalidName
    );
}
