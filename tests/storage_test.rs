//! Unit tests for storage functionality

use chrono::{TimeZone, Utc};
use wnba_ingest::{
    storage::{models::*, LeagueDatabase},
    GameId, IngestError, PlayerId, Season, TeamId,
};

fn create_test_db() -> LeagueDatabase {
    LeagueDatabase::open_in_memory().unwrap()
}

fn make_team(id: u32) -> Team {
    Team {
        team_id: TeamId::new(id),
        name: format!("Team {id}"),
        abbreviation: format!("T{id}"),
        conference: Some("Western".to_string()),
        division: None,
    }
}

fn make_game(id: u64, home: u32, away: u32) -> Game {
    Game {
        game_id: GameId::new(id),
        season: Season::new(2025),
        scheduled_at: Utc.with_ymd_and_hms(2025, 6, 1, 19, 0, 0).unwrap(),
        home_team_id: TeamId::new(home),
        away_team_id: TeamId::new(away),
        status: GameStatus::Scheduled,
    }
}

fn make_game_teams(game: &Game) -> Vec<GameTeam> {
    vec![
        GameTeam {
            game_id: game.game_id,
            team_id: game.home_team_id,
            is_home: true,
            points: None,
        },
        GameTeam {
            game_id: game.game_id,
            team_id: game.away_team_id,
            is_home: false,
            points: None,
        },
    ]
}

fn make_stat(game_id: u64, player_id: u32, points: u32) -> PlayerGameStat {
    PlayerGameStat {
        game_id: GameId::new(game_id),
        player_id: PlayerId::new(player_id),
        minutes: Some(31.0),
        points,
        rebounds: 5,
        assists: 4,
        steals: 1,
        blocks: 0,
        turnovers: 2,
        field_goals_made: 6,
        field_goals_attempted: 13,
        three_pointers_made: 2,
        three_pointers_attempted: 5,
        free_throws_made: 4,
        free_throws_attempted: 4,
    }
}

/// A store with two teams and one game, the baseline for child-row tests.
fn db_with_game() -> LeagueDatabase {
    let mut db = create_test_db();
    db.persist_teams(&[make_team(1), make_team(2)]).unwrap();
    let game = make_game(100, 1, 2);
    db.persist_schedule(&[game.clone()], &make_game_teams(&game))
        .unwrap();
    db
}

#[test]
fn test_database_creation() {
    let db = create_test_db();
    assert_eq!(db.table_counts().unwrap(), TableCounts::default());
}

#[test]
fn test_open_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("league.db");
    let db = LeagueDatabase::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(db.table_counts().unwrap().teams, 0);
}

#[test]
fn test_upsert_team_updates_in_place() {
    let mut db = create_test_db();
    db.persist_teams(&[make_team(14)]).unwrap();

    let mut renamed = make_team(14);
    renamed.name = "Seattle Storm".to_string();
    db.persist_teams(&[renamed]).unwrap();

    let counts = db.table_counts().unwrap();
    assert_eq!(counts.teams, 1);
    let stored = db.get_team(TeamId::new(14)).unwrap().unwrap();
    assert_eq!(stored.name, "Seattle Storm");
}

#[test]
fn test_persist_schedule_requires_existing_teams() {
    let mut db = create_test_db();
    let game = make_game(100, 1, 2);

    let err = db
        .persist_schedule(&[game.clone()], &make_game_teams(&game))
        .unwrap_err();
    match err {
        IngestError::Persist { identifier, .. } => assert_eq!(identifier, "100"),
        other => panic!("expected persist error, got {other:?}"),
    }
    assert_eq!(db.table_counts().unwrap().games, 0);
}

#[test]
fn test_persist_schedule_is_atomic_per_batch() {
    let mut db = create_test_db();
    db.persist_teams(&[make_team(1), make_team(2)]).unwrap();

    // Second game references a team that was never persisted.
    let good = make_game(100, 1, 2);
    let bad = make_game(101, 1, 99);
    let mut game_teams = make_game_teams(&good);
    game_teams.extend(make_game_teams(&bad));

    let result = db.persist_schedule(&[good, bad], &game_teams);
    assert!(result.is_err());
    // Neither game committed.
    assert_eq!(db.table_counts().unwrap().games, 0);
    assert_eq!(db.table_counts().unwrap().game_teams, 0);
}

#[test]
fn test_upsert_game_updates_status_on_rerun() {
    let mut db = db_with_game();

    let mut finished = make_game(100, 1, 2);
    finished.status = GameStatus::Final;
    db.persist_schedule(&[finished], &[]).unwrap();

    let counts = db.table_counts().unwrap();
    assert_eq!(counts.games, 1);
    let stored = db.get_game(GameId::new(100)).unwrap().unwrap();
    assert_eq!(stored.status, GameStatus::Final);
}

#[test]
fn test_persist_plays_requires_existing_game() {
    let mut db = create_test_db();
    db.persist_teams(&[make_team(1)]).unwrap();

    let play = Play {
        game_id: GameId::new(555),
        sequence: 1,
        team_id: Some(TeamId::new(1)),
        period: 1,
        clock: None,
        description: "Tip off".to_string(),
        home_score: None,
        away_score: None,
    };

    let err = db.persist_plays(&[play]).unwrap_err();
    match err {
        IngestError::Persist { identifier, .. } => assert_eq!(identifier, "555#1"),
        other => panic!("expected persist error, got {other:?}"),
    }
    assert_eq!(db.table_counts().unwrap().plays, 0);
}

#[test]
fn test_persist_box_scores_requires_existing_game() {
    let mut db = create_test_db();

    let player = Player {
        player_id: PlayerId::new(7),
        name: "Jewell Loyd".to_string(),
        position: Some("G".to_string()),
        team_id: None,
    };

    let err = db
        .persist_box_scores(&[player], &[make_stat(777, 7, 20)])
        .unwrap_err();
    assert!(matches!(err, IngestError::Persist { .. }));
    // Rolled back together with the stat line.
    assert_eq!(db.table_counts().unwrap().players, 0);
}

#[test]
fn test_persist_box_scores_upserts_by_composite_key() {
    let mut db = db_with_game();

    let player = Player {
        player_id: PlayerId::new(7),
        name: "Jewell Loyd".to_string(),
        position: Some("G".to_string()),
        team_id: Some(TeamId::new(1)),
    };
    db.persist_box_scores(&[player.clone()], &[make_stat(100, 7, 20)])
        .unwrap();
    db.persist_box_scores(&[player], &[make_stat(100, 7, 24)])
        .unwrap();

    let counts = db.table_counts().unwrap();
    assert_eq!(counts.players, 1);
    assert_eq!(counts.player_games, 1);
}

#[test]
fn test_player_current_team_updates_on_rerun() {
    let mut db = db_with_game();

    let traded = |team: Option<u32>| Player {
        player_id: PlayerId::new(7),
        name: "Jewell Loyd".to_string(),
        position: Some("G".to_string()),
        team_id: team.map(TeamId::new),
    };

    db.persist_box_scores(&[traded(Some(1))], &[]).unwrap();
    db.persist_box_scores(&[traded(Some(2))], &[]).unwrap();

    let stored = db.get_player(PlayerId::new(7)).unwrap().unwrap();
    assert_eq!(stored.team_id, Some(TeamId::new(2)));
}

#[test]
fn test_reset_then_reimport_round_trip() {
    let mut db = db_with_game();
    db.persist_box_scores(
        &[Player {
            player_id: PlayerId::new(7),
            name: "Jewell Loyd".to_string(),
            position: None,
            team_id: Some(TeamId::new(1)),
        }],
        &[make_stat(100, 7, 20)],
    )
    .unwrap();

    let report = db.reset().unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(db.table_counts().unwrap(), TableCounts::default());

    // The store is immediately usable for a fresh load.
    db.persist_teams(&[make_team(1), make_team(2)]).unwrap();
    let game = make_game(100, 1, 2);
    db.persist_schedule(&[game.clone()], &make_game_teams(&game))
        .unwrap();
    assert_eq!(db.table_counts().unwrap().games, 1);
}

#[test]
fn test_plays_round_trip_in_sequence_order() {
    let mut db = db_with_game();

    let play = |sequence: u32, description: &str| Play {
        game_id: GameId::new(100),
        sequence,
        team_id: None,
        period: 1,
        clock: Some("10:00".to_string()),
        description: description.to_string(),
        home_score: None,
        away_score: None,
    };

    db.persist_plays(&[play(2, "second"), play(1, "first"), play(3, "third")])
        .unwrap();

    let stored = db.plays_for_game(GameId::new(100)).unwrap();
    let descriptions: Vec<&str> = stored.iter().map(|p| p.description.as_str()).collect();
    assert_eq!(descriptions, vec!["first", "second", "third"]);
}
