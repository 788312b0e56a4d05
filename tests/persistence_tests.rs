//! Snapshots and the store seam.
//!
//! A game saved mid-round and loaded again must carry on exactly as the
//! original would have, random rolls included.

use dice_duel::core::GameId;
use dice_duel::error::ErrorKind;
use dice_duel::{ActionRequest, Game, GameBuilder, GameStore, MemoryStore, Phase};

fn new_game(id: u64) -> Game {
    GameBuilder::new()
        .id(GameId::new(id))
        .button("Left", "4 6 8 12 20")
        .button("Right", "4 6 10 12 20")
        .seed(17)
        .build()
        .unwrap()
}

/// Take the first legal capture, or pass, or surrender, for whoever moves.
fn play_one(game: &mut Game) -> bool {
    let player = game.active_player();
    let opponent = player.next(2);
    let own = game.active_dice(player).len() as i64;
    let theirs = game.active_dice(opponent).len() as i64;

    for a in 0..own {
        for d in 0..theirs {
            let request = ActionRequest::new(player, "submitTurn")
                .with("attackType", "Power")
                .with("attackerIdx", vec![a])
                .with("defenderIdx", vec![d]);
            if game.process(&request).ok {
                return true;
            }
        }
    }
    let pass = ActionRequest::new(player, "submitTurn").with("attackType", "Pass");
    if game.process(&pass).ok {
        return true;
    }
    let surrender = ActionRequest::new(player, "submitTurn").with("attackType", "Surrender");
    game.process(&surrender).ok
}

#[test]
fn test_bytes_round_trip() {
    let game = new_game(1);
    let bytes = game.to_bytes().unwrap();
    let loaded = Game::from_bytes(&bytes).unwrap();
    assert_eq!(loaded.to_bytes().unwrap(), bytes);
    assert_eq!(loaded.phase(), game.phase());
    assert_eq!(loaded.active_player(), game.active_player());
}

#[test]
fn test_loaded_game_continues_identically() {
    let mut original = new_game(2);
    for _ in 0..3 {
        if original.phase() != Phase::AwaitAction {
            break;
        }
        assert!(play_one(&mut original));
    }

    let mut copy = Game::from_bytes(&original.to_bytes().unwrap()).unwrap();
    for _ in 0..10 {
        if original.phase() != Phase::AwaitAction {
            break;
        }
        assert!(play_one(&mut original));
        assert!(play_one(&mut copy));
        assert_eq!(copy.to_bytes().unwrap(), original.to_bytes().unwrap());
    }
}

#[test]
fn test_corrupt_snapshot_is_malformed() {
    let err = Game::from_bytes(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn test_memory_store() {
    let mut store = MemoryStore::new();
    assert!(store.is_empty());

    let mut game = new_game(7);
    store.save_game(&game).unwrap();
    assert_eq!(store.len(), 1);

    assert!(play_one(&mut game));
    let stale = store.load_game(GameId::new(7)).unwrap();
    assert_eq!(stale.timestamp(), 0);

    store.save_game(&game).unwrap();
    let fresh = store.load_game(GameId::new(7)).unwrap();
    assert_eq!(fresh.timestamp(), game.timestamp());
    assert_eq!(store.len(), 1);

    let missing = store.load_game(GameId::new(8)).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Malformed);
}

#[test]
fn test_action_result_json() {
    let mut game = new_game(3);
    let player = game.active_player();
    let result = game.process(&ActionRequest::new(player, "submitTurn").with("attackType", "Surrender"));
    assert!(result.ok);

    let json = serde_json::to_string(&result).unwrap();
    let back: dice_duel::ActionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
