//! End-to-end registration invariants against a live Postgres instance.
//!
//! Run with `DATABASE_URL` pointing at a migrated database:
//! `cargo test -p storage -- --ignored`

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use storage::dto::tournament::CreateTournamentRequest;
use storage::error::StorageError;
use storage::repository::registration::RegistrationRepository;
use storage::repository::tournament::TournamentRepository;
use storage::repository::user::UserRepository;
use storage::services::registration::RegistrationService;

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.expect("connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

async fn create_user(pool: &PgPool) -> Uuid {
    let suffix = Uuid::new_v4().simple().to_string();
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
    )
    .bind(format!("player-{suffix}"))
    .bind(format!("player-{suffix}@example.com"))
    .fetch_one(pool)
    .await
    .expect("insert user");
    id
}

async fn create_tournament(pool: &PgPool, max_participants: i32) -> i32 {
    let start = Utc::now() + Duration::days(7);
    let req = CreateTournamentRequest {
        name: format!("Test Kubb Cup {}", Uuid::new_v4().simple()),
        description: String::new(),
        location: String::new(),
        maps_link: None,
        start_date: start,
        end_date: start + Duration::hours(8),
        registration_deadline: start - Duration::days(1),
        max_participants,
        fee: Decimal::ZERO,
    };
    TournamentRepository::new(pool)
        .create(&req)
        .await
        .expect("create tournament")
        .id
}

async fn participant_count(pool: &PgPool, tournament_id: i32) -> (i32, i64) {
    let tournament = TournamentRepository::new(pool)
        .find_by_id(tournament_id)
        .await
        .expect("find tournament");
    let (ledger,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM tournament_registrations WHERE tournament_id = $1",
    )
    .bind(tournament_id)
    .fetch_one(pool)
    .await
    .expect("count registrations");
    (tournament.current_participants, ledger)
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn last_seat_goes_to_exactly_one_caller() {
    let pool = connect().await;
    let tournament_id = create_tournament(&pool, 1).await;
    let user_a = create_user(&pool).await;
    let user_b = create_user(&pool).await;

    let service = RegistrationService::new(&pool);

    // A takes the only seat.
    service
        .register(tournament_id, user_a, Some("Team A"))
        .await
        .expect("first registration succeeds");
    let (counter, ledger) = participant_count(&pool, tournament_id).await;
    assert_eq!(counter, 1);
    assert_eq!(ledger, 1);

    // B is turned away.
    let err = service
        .register(tournament_id, user_b, None)
        .await
        .expect_err("tournament is full");
    assert!(matches!(err, StorageError::TournamentFull));

    // A withdraws; the seat frees up and B gets in.
    service.withdraw(tournament_id, user_a).await.expect("withdraw");
    let (counter, ledger) = participant_count(&pool, tournament_id).await;
    assert_eq!(counter, 0);
    assert_eq!(ledger, 0);

    service
        .register(tournament_id, user_b, None)
        .await
        .expect("seat is free again");
    let (counter, ledger) = participant_count(&pool, tournament_id).await;
    assert_eq!(counter, 1);
    assert_eq!(ledger, 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn duplicate_registration_is_rejected() {
    let pool = connect().await;
    let tournament_id = create_tournament(&pool, 8).await;
    let user = create_user(&pool).await;

    let service = RegistrationService::new(&pool);
    service
        .register(tournament_id, user, None)
        .await
        .expect("first registration");

    let ledger = RegistrationRepository::new(&pool);
    assert!(ledger.is_registered(tournament_id, user).await.unwrap());

    let err = service
        .register(tournament_id, user, None)
        .await
        .expect_err("duplicate registration");
    assert!(matches!(err, StorageError::AlreadyRegistered));

    let (counter, ledger) = participant_count(&pool, tournament_id).await;
    assert_eq!(counter, 1);
    assert_eq!(ledger, 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn closed_deadline_rejects_registration() {
    let pool = connect().await;
    let user = create_user(&pool).await;

    // Deadline already in the past.
    let start = Utc::now() + Duration::hours(2);
    let req = CreateTournamentRequest {
        name: format!("Closed Cup {}", Uuid::new_v4().simple()),
        description: String::new(),
        location: String::new(),
        maps_link: None,
        start_date: start,
        end_date: start + Duration::hours(8),
        registration_deadline: Utc::now() - Duration::hours(1),
        max_participants: 8,
        fee: Decimal::ZERO,
    };
    let tournament_id = TournamentRepository::new(&pool)
        .create(&req)
        .await
        .expect("create tournament")
        .id;

    let err = RegistrationService::new(&pool)
        .register(tournament_id, user, None)
        .await
        .expect_err("registration is closed");
    assert!(matches!(err, StorageError::RegistrationClosed));

    let (counter, ledger) = participant_count(&pool, tournament_id).await;
    assert_eq!(counter, 0);
    assert_eq!(ledger, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn second_withdraw_fails_cleanly() {
    let pool = connect().await;
    let tournament_id = create_tournament(&pool, 8).await;
    let user = create_user(&pool).await;

    let service = RegistrationService::new(&pool);
    service.register(tournament_id, user, None).await.expect("register");
    service.withdraw(tournament_id, user).await.expect("withdraw");

    let err = service
        .withdraw(tournament_id, user)
        .await
        .expect_err("second withdraw");
    assert!(matches!(err, StorageError::NotRegistered));

    let (counter, ledger) = participant_count(&pool, tournament_id).await;
    assert_eq!(counter, 0);
    assert_eq!(ledger, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn deleting_a_tournament_cascades_to_registrations() {
    let pool = connect().await;
    let tournament_id = create_tournament(&pool, 8).await;
    let user = create_user(&pool).await;

    RegistrationService::new(&pool)
        .register(tournament_id, user, Some("Team X"))
        .await
        .expect("register");

    TournamentRepository::new(&pool)
        .delete(tournament_id)
        .await
        .expect("delete tournament");

    let remaining = RegistrationRepository::new(&pool)
        .list_by_user(user)
        .await
        .expect("list user tournaments");
    assert!(remaining.iter().all(|t| t.id != tournament_id));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn full_tournament_reports_full_even_to_registered_users() {
    let pool = connect().await;
    let tournament_id = create_tournament(&pool, 1).await;
    let user = create_user(&pool).await;

    let service = RegistrationService::new(&pool);
    service
        .register(tournament_id, user, None)
        .await
        .expect("take the only seat");

    // Capacity is checked before the duplicate check, so a registered
    // user of a full tournament is told the tournament is full.
    let err = service
        .register(tournament_id, user, None)
        .await
        .expect_err("tournament is full");
    assert!(matches!(err, StorageError::TournamentFull));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn deleting_an_account_releases_its_seats() {
    let pool = connect().await;
    let first = create_tournament(&pool, 8).await;
    let second = create_tournament(&pool, 8).await;
    let user = create_user(&pool).await;

    let service = RegistrationService::new(&pool);
    service.register(first, user, None).await.expect("register first");
    service.register(second, user, None).await.expect("register second");

    UserRepository::new(&pool)
        .delete(user)
        .await
        .expect("delete account");

    for tournament_id in [first, second] {
        let (counter, ledger) = participant_count(&pool, tournament_id).await;
        assert_eq!(counter, 0);
        assert_eq!(ledger, 0);
    }
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn account_deletion_racing_a_registration_keeps_counter_consistent() {
    let pool = connect().await;

    // The deletion locks the user row before sweeping the ledger, so a
    // registration landing mid-delete either commits first and is swept,
    // or waits and fails on the missing user. Either way the counter must
    // match the ledger afterwards.
    for _ in 0..10 {
        let tournament_id = create_tournament(&pool, 8).await;
        let user = create_user(&pool).await;

        let register = {
            let pool = pool.clone();
            tokio::spawn(async move {
                RegistrationService::new(&pool)
                    .register(tournament_id, user, None)
                    .await
            })
        };
        let delete = {
            let pool = pool.clone();
            tokio::spawn(async move { UserRepository::new(&pool).delete(user).await })
        };

        let _ = register.await.expect("register task completes");
        let _ = delete.await.expect("delete task completes");

        let (counter, ledger) = participant_count(&pool, tournament_id).await;
        assert_eq!(counter as i64, ledger);
    }
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn concurrent_registrations_never_overshoot_capacity() {
    let pool = connect().await;
    let capacity = 4;
    let tournament_id = create_tournament(&pool, capacity).await;

    let mut users = Vec::new();
    for _ in 0..10 {
        users.push(create_user(&pool).await);
    }

    let mut handles = Vec::new();
    for user in users {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            RegistrationService::new(&pool)
                .register(tournament_id, user, None)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("task completes").is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, capacity);

    let (counter, ledger) = participant_count(&pool, tournament_id).await;
    assert_eq!(counter, capacity);
    assert_eq!(ledger, capacity as i64);
}
