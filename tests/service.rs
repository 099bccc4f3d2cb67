//! Integration tests for the service layer: stores, snapshot events, roster import.

use padel_tournament_web::roster::read_roster;
use padel_tournament_web::{
    BracketData, BracketStore, Format, GroupColor, JsonFileStore, MemoryStore, Player, Side,
    StateError, TournamentError, TournamentService, ValidationError,
};
use uuid::Uuid;

fn sixteen() -> Vec<Player> {
    (1..=16)
        .map(|i| Player::new(format!("R{}", i * 10), f64::from(i * 10)))
        .collect()
}

#[test]
fn generate_and_score_are_saved_and_published() {
    let service = TournamentService::new(MemoryStore::new()).unwrap();
    let mut updates = service.subscribe();
    let created = service
        .create_tournament("Sunday ladder", Format::Mexicano, sixteen())
        .unwrap();
    let id = created.tournament.id;
    assert_eq!(updates.try_recv().unwrap().bracket.current_round(), 0);

    let bracket = service.generate_round(id).unwrap();
    let event = updates.try_recv().unwrap();
    assert_eq!(event.tournament_id, id);
    assert_eq!(*event.bracket, bracket);

    let match_id = bracket.live_matches().next().unwrap().id;
    service.update_score(id, match_id, Side::One, 6).unwrap();
    let update = service.update_score(id, match_id, Side::Two, 2).unwrap();
    assert_eq!(updates.try_recv().unwrap().bracket.completed_matches().len(), 0);
    assert_eq!(updates.try_recv().unwrap().bracket.completed_matches().len(), 1);

    let view = service.tournament(id).unwrap();
    assert_eq!(view.bracket, update.bracket);
    assert!(!service.can_advance(id).unwrap());
    let standings = service.standings(id).unwrap();
    assert_eq!(standings.standings.len(), 16);
    assert_eq!(standings.standings[0].points, 6);
    assert!(standings.groups.is_none());
}

#[test]
fn failed_operation_leaves_the_stored_bracket_alone() {
    let service = TournamentService::new(MemoryStore::new()).unwrap();
    let id = service
        .create_tournament("Sunday ladder", Format::Mexicano, sixteen())
        .unwrap()
        .tournament
        .id;
    let bracket = service.generate_round(id).unwrap();

    let result = service.generate_round(id);

    assert!(matches!(
        result,
        Err(TournamentError::State(StateError::PreviousRoundIncomplete { round: 1 }))
    ));
    assert_eq!(service.tournament(id).unwrap().bracket, bracket);
}

#[test]
fn roster_is_locked_once_play_starts() {
    let service = TournamentService::new(MemoryStore::new()).unwrap();
    let id = service
        .create_tournament("Open", Format::Mexicano, Vec::new())
        .unwrap()
        .tournament
        .id;
    for i in 0..4 {
        service.add_player(id, &format!("Player {i}"), 50.0 + f64::from(i)).unwrap();
    }
    assert!(matches!(
        service.add_player(id, "player 0", 1.0),
        Err(TournamentError::Validation(ValidationError::DuplicatePlayerName(_)))
    ));
    service.generate_round(id).unwrap();

    let first = service.tournament(id).unwrap().tournament.players[0].id;
    assert!(matches!(
        service.add_player(id, "Late", 10.0),
        Err(TournamentError::State(StateError::AlreadyStarted))
    ));
    assert!(matches!(
        service.remove_player(id, first),
        Err(TournamentError::State(StateError::AlreadyStarted))
    ));
}

#[test]
fn moving_a_player_between_groups_regenerates_the_schedule() {
    let service = TournamentService::new(MemoryStore::new()).unwrap();
    let id = service
        .create_tournament("Americano night", Format::Americano, sixteen())
        .unwrap()
        .tournament
        .id;
    service.generate_round(id).unwrap();
    let strongest = service
        .tournament(id)
        .unwrap()
        .tournament
        .players
        .iter()
        .find(|p| p.name == "R160")
        .unwrap()
        .id;

    let view = service
        .move_player_to_group(id, strongest, GroupColor::Pink, 0)
        .unwrap();

    let pink: Vec<_> = view
        .tournament
        .players
        .iter()
        .filter(|p| p.group == Some(GroupColor::Pink))
        .collect();
    assert_eq!(pink.len(), 5);
    assert!(view.tournament.players.iter().all(|p| p.group_order.is_some()));
    let BracketData::Americano(b) = &view.bracket else {
        panic!("not an Americano bracket");
    };
    let pink_round1 = b.rounds[0]
        .matches
        .iter()
        .find(|m| m.group_color == Some(GroupColor::Pink))
        .unwrap();
    assert!(pink_round1.involves(strongest));
    // Green is down to three players and sits out the within-group rounds.
    assert!(b.rounds[0].matches.iter().all(|m| m.group_color != Some(GroupColor::Green)));
    assert!(service.standings(id).unwrap().groups.is_some());
}

#[test]
fn unknown_tournament_is_not_found() {
    let service = TournamentService::new(MemoryStore::new()).unwrap();
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.generate_round(missing),
        Err(TournamentError::TournamentNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.can_advance(missing),
        Err(TournamentError::TournamentNotFound(_))
    ));
}

#[test]
fn rollback_through_the_service_requires_consent() {
    let service = TournamentService::new(MemoryStore::new()).unwrap();
    let id = service
        .create_tournament("Sunday ladder", Format::Mexicano, sixteen())
        .unwrap()
        .tournament
        .id;
    let mut bracket = service.generate_round(id).unwrap();
    for _ in 0..2 {
        let ids: Vec<_> = bracket.live_matches().map(|m| m.id).collect();
        for match_id in ids {
            service.update_score(id, match_id, Side::One, 6).unwrap();
            service.update_score(id, match_id, Side::Two, 1).unwrap();
        }
        bracket = service.generate_round(id).unwrap();
    }
    assert_eq!(bracket.current_round(), 3);

    assert!(service.rollback(id, 1, false).is_err());
    assert_eq!(service.tournament(id).unwrap().bracket.current_round(), 3);

    let rolled = service.rollback(id, 1, true).unwrap();
    assert_eq!(rolled.current_round(), 1);
    assert_eq!(service.tournament(id).unwrap().bracket, rolled);
}

#[test]
fn file_store_round_trips_whole_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("brackets")).unwrap();
    let id = Uuid::new_v4();
    assert!(store.load(id).unwrap().is_none());

    let bracket = padel_tournament_web::generate_round(
        &BracketData::new(Format::Americano),
        &sixteen(),
    )
    .unwrap();
    store.save(id, &bracket).unwrap();
    store.save(id, &bracket).unwrap();

    assert_eq!(store.load(id).unwrap(), Some(bracket));
    store.delete(id).unwrap();
    assert!(store.load(id).unwrap().is_none());
    store.delete(id).unwrap();
}

#[test]
fn file_backed_service_picks_up_saved_tournaments_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (id, bracket) = {
        let service = TournamentService::new(JsonFileStore::open(dir.path()).unwrap()).unwrap();
        let id = service
            .create_tournament("Open", Format::Mexicano, Vec::new())
            .unwrap()
            .tournament
            .id;
        for i in 0..8 {
            service.add_player(id, &format!("Player {i}"), f64::from(i)).unwrap();
        }
        (id, service.generate_round(id).unwrap())
    };

    let reopened = TournamentService::new(JsonFileStore::open(dir.path()).unwrap()).unwrap();

    let view = reopened.tournament(id).unwrap();
    assert_eq!(view.tournament.name, "Open");
    assert_eq!(view.tournament.format, Format::Mexicano);
    assert_eq!(view.tournament.players.len(), 8);
    assert_eq!(view.bracket, bracket);
    let match_id = bracket.live_matches().next().unwrap().id;
    reopened.update_score(id, match_id, Side::One, 6).unwrap();

    reopened.delete_tournament(id).unwrap();
    let again = TournamentService::new(JsonFileStore::open(dir.path()).unwrap()).unwrap();
    assert!(matches!(
        again.tournament(id),
        Err(TournamentError::TournamentNotFound(_))
    ));
}

#[test]
fn persisted_document_uses_the_tagged_camel_case_shape() {
    let bracket = padel_tournament_web::generate_round(
        &BracketData::new(Format::Mexicano),
        &sixteen(),
    )
    .unwrap();

    let json = serde_json::to_value(&bracket).unwrap();

    assert_eq!(json["format"], "Mexicano");
    assert_eq!(json["currentRound"], 1);
    assert!(json["completedMatches"].as_array().unwrap().is_empty());
    assert_eq!(json["courts"][0]["name"], "Padel Arenas");
    let m = &json["courts"][0]["matches"][0];
    assert_eq!(m["court"], "Padel Arenas");
    assert!(m["score1"].is_null());
    assert_eq!(m["completed"], false);
    assert_eq!(m["team1"].as_array().unwrap().len(), 2);
    assert_eq!(json["standings"][0]["gamesPlayed"], 0);
}

#[test]
fn roster_csv_import_reads_groups() {
    let csv = "name,rating,group,group_order\n\
               Anna, 7.5, green, 0\n\
               Ben, 6, blue,\n\
               Cleo, 5.5, ,\n";

    let players = read_roster(csv.as_bytes()).unwrap();

    assert_eq!(players.len(), 3);
    assert_eq!(players[0].name, "Anna");
    assert_eq!(players[0].group, Some(GroupColor::Green));
    assert_eq!(players[0].group_order, Some(0));
    assert_eq!(players[1].group, Some(GroupColor::Blue));
    assert_eq!(players[1].group_order, None);
    assert_eq!(players[2].group, None);
    assert_eq!(players[2].rating, 5.5);
}

#[test]
fn roster_csv_import_rejects_bad_rows() {
    let not_a_number = "name,rating\nAnna,strong\n";
    assert!(matches!(
        read_roster(not_a_number.as_bytes()),
        Err(ValidationError::MalformedRoster(_))
    ));

    let duplicate = "name,rating\nAnna,5\nanna,6\n";
    assert!(matches!(
        read_roster(duplicate.as_bytes()),
        Err(ValidationError::DuplicatePlayerName(_))
    ));
}
