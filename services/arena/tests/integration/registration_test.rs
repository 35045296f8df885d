use chrono::{Duration, Utc};
use futures::future::join_all;
use uuid::Uuid;

use courtside_arena::domain::types::{Team, Tournament, User};
use courtside_arena::error::ArenaError;
use courtside_arena::usecase::registration::{
    CreateTeamInput, CreateTeamUseCase, RegisterTeamInput, RegisterTeamUseCase,
};
use courtside_arena::usecase::tournament::ListRegistrationsUseCase;
use courtside_domain::pagination::PageRequest;

use crate::helpers::{MockDb, MockTournamentRepo, Yielding, organizer, player, team, tournament};

fn register(db: &MockDb) -> RegisterTeamUseCase<MockTournamentRepo> {
    RegisterTeamUseCase {
        tournaments: db.tournaments_repo(),
    }
}

fn entry(team: &Team) -> RegisterTeamInput {
    RegisterTeamInput {
        team_id: team.id,
        captain_name: "Captain".to_owned(),
        captain_contact: "+919800000000".to_owned(),
    }
}

/// A tournament plus `n` teams, each with its own captain.
fn setup(max_teams: i32, n: usize) -> (MockDb, Tournament, Vec<(User, Team)>) {
    let db = MockDb::new();
    let t = tournament(&organizer(), max_teams);
    db.add_tournament(&t);
    let teams = (0..n)
        .map(|_| {
            let captain = player();
            let team = team(&captain);
            db.add_team(&team);
            (captain, team)
        })
        .collect();
    (db, t, teams)
}

#[tokio::test]
async fn should_register_and_record_fee_and_registrant() {
    let (db, t, teams) = setup(4, 1);
    let (captain, team) = &teams[0];

    let registration = register(&db)
        .execute(captain, t.id, entry(team))
        .await
        .unwrap();

    assert_eq!(registration.tournament_id, t.id);
    assert_eq!(registration.team_id, team.id);
    assert_eq!(registration.registered_by, captain.id);
    assert_eq!(registration.entry_fee_paise, t.entry_fee_paise);
    assert_eq!(registration.payment_status, "pending");
    assert!(registration.registration_number.starts_with("REG-"));
    assert_eq!(db.tournament(t.id).current_teams, 1);
}

#[tokio::test]
async fn concurrent_registrations_never_exceed_capacity() {
    let (db, t, teams) = setup(2, 3);
    // All three see a free place before any claims one.
    let uc = RegisterTeamUseCase {
        tournaments: Yielding(db.tournaments_repo()),
    };

    let results = join_all(
        teams
            .iter()
            .map(|(captain, team)| uc.execute(captain, t.id, entry(team))),
    )
    .await;

    let ok = results.iter().filter(|r| r.is_ok()).count();
    let full = results
        .iter()
        .filter(|r| matches!(r, Err(ArenaError::TournamentFull)))
        .count();
    assert_eq!(ok, 2);
    assert_eq!(full, 1);
    assert_eq!(db.tournament(t.id).current_teams, 2);
    assert_eq!(db.registrations.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn same_team_cannot_register_twice() {
    let (db, t, teams) = setup(4, 1);
    let (captain, team) = &teams[0];

    register(&db)
        .execute(captain, t.id, entry(team))
        .await
        .unwrap();
    let result = register(&db).execute(captain, t.id, entry(team)).await;

    assert!(
        matches!(result, Err(ArenaError::AlreadyRegistered)),
        "expected AlreadyRegistered, got {result:?}"
    );
    assert_eq!(db.tournament(t.id).current_teams, 1);
}

#[tokio::test]
async fn only_the_captain_can_register_a_team() {
    let (db, t, teams) = setup(4, 1);
    let (_, team) = &teams[0];

    let result = register(&db).execute(&player(), t.id, entry(team)).await;

    assert!(matches!(result, Err(ArenaError::Forbidden(_))));
    assert_eq!(db.tournament(t.id).current_teams, 0);
}

#[tokio::test]
async fn closed_deadline_is_reported_before_captaincy() {
    let db = MockDb::new();
    let mut t = tournament(&organizer(), 4);
    t.registration_deadline = Utc::now() - Duration::hours(1);
    db.add_tournament(&t);
    let captain = player();
    let team = team(&captain);
    db.add_team(&team);

    let result = register(&db).execute(&captain, t.id, entry(&team)).await;
    assert!(matches!(result, Err(ArenaError::RegistrationClosed)));

    let result = register(&db).execute(&player(), t.id, entry(&team)).await;
    assert!(matches!(result, Err(ArenaError::RegistrationClosed)));
}

#[tokio::test]
async fn captaincy_is_checked_before_capacity() {
    let (db, t, teams) = setup(1, 2);
    let (first_captain, first_team) = &teams[0];
    let (_, second_team) = &teams[1];
    register(&db)
        .execute(first_captain, t.id, entry(first_team))
        .await
        .unwrap();

    let result = register(&db)
        .execute(&player(), t.id, entry(second_team))
        .await;
    assert!(matches!(result, Err(ArenaError::Forbidden(_))));

    let (second_captain, _) = &teams[1];
    let result = register(&db)
        .execute(second_captain, t.id, entry(second_team))
        .await;
    assert!(matches!(result, Err(ArenaError::TournamentFull)));
}

#[tokio::test]
async fn missing_tournament_or_team_is_not_found() {
    let (db, t, teams) = setup(4, 1);
    let (captain, team) = &teams[0];

    let result = register(&db)
        .execute(captain, Uuid::now_v7(), entry(team))
        .await;
    assert!(matches!(result, Err(ArenaError::TournamentNotFound)));

    let mut ghost = team.clone();
    ghost.id = Uuid::now_v7();
    let result = register(&db).execute(captain, t.id, entry(&ghost)).await;
    assert!(matches!(result, Err(ArenaError::TeamNotFound)));
}

#[tokio::test]
async fn deleted_tournament_takes_no_registrations() {
    let db = MockDb::new();
    let mut t = tournament(&organizer(), 4);
    t.is_active = false;
    db.add_tournament(&t);
    let captain = player();
    let team = team(&captain);
    db.add_team(&team);

    let result = register(&db).execute(&captain, t.id, entry(&team)).await;

    assert!(matches!(result, Err(ArenaError::TournamentNotFound)));
}

#[tokio::test]
async fn created_team_is_captained_by_its_creator() {
    let db = MockDb::new();
    let captain = player();

    let team = CreateTeamUseCase {
        tournaments: db.tournaments_repo(),
    }
    .execute(
        &captain,
        CreateTeamInput {
            name: "  Strikers ".to_owned(),
            sport_type: "football".to_owned(),
            city: "Pune".to_owned(),
        },
    )
    .await
    .unwrap();

    assert_eq!(team.captain_id, captain.id);
    assert_eq!(team.name, "Strikers");
    assert!(team.is_active);
    assert_eq!(db.teams.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn registrations_are_listed_oldest_first_for_the_organizer() {
    let org = organizer();
    let db = MockDb::new();
    let t = tournament(&org, 4);
    db.add_tournament(&t);
    let mut expected = Vec::new();
    for _ in 0..2 {
        let captain = player();
        let team = team(&captain);
        db.add_team(&team);
        register(&db)
            .execute(&captain, t.id, entry(&team))
            .await
            .unwrap();
        expected.push(team.id);
    }

    let uc = ListRegistrationsUseCase {
        tournaments: db.tournaments_repo(),
        grants: db.grants_repo(),
    };
    let listed = uc.execute(&org, t.id, PageRequest::default()).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|r| r.team_id).collect();
    assert_eq!(ids, expected);

    let result = uc.execute(&player(), t.id, PageRequest::default()).await;
    assert!(matches!(result, Err(ArenaError::Forbidden(_))));
}
