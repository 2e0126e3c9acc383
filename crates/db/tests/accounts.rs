//! Integration tests for account creation and user lookups.

use assert_matches::assert_matches;
use inutile_db::models::user::{CreateUser, UpdateUser};
use inutile_db::repositories::{AccountRepo, FinanceRepo, ProfileRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str, first: &str, last: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone: None,
        role: None,
        company_id: None,
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_user_profile_and_finance(pool: PgPool) {
    let (user, profile) = AccountRepo::register(&pool, &new_user("Jane@Example.com", "Jane", "Doe"), "jane.doe")
        .await
        .unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.role, "user");
    assert!(user.is_active);
    assert_eq!(profile.user_id, user.id);
    assert_eq!(profile.slug, "jane.doe");
    assert_eq!(profile.display_name, "Jane Doe");
    assert!(profile.links.0.is_empty());

    let finance = FinanceRepo::find_by_user(&pool, user.id).await.unwrap();
    assert!(finance.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_disambiguates_slugs(pool: PgPool) {
    let (_, first) = AccountRepo::register(&pool, &new_user("a@example.com", "Jane", "Doe"), "jane.doe")
        .await
        .unwrap();
    let (_, second) = AccountRepo::register(&pool, &new_user("b@example.com", "Jane", "Doe"), "jane.doe")
        .await
        .unwrap();
    let (_, third) = AccountRepo::register(&pool, &new_user("c@example.com", "Jane", "Doe"), "jane.doe")
        .await
        .unwrap();

    assert_eq!(first.slug, "jane.doe");
    assert_eq!(second.slug, "jane.doe1");
    assert_eq!(third.slug, "jane.doe2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_leaves_no_side_effects(pool: PgPool) {
    AccountRepo::register(&pool, &new_user("dup@example.com", "Jane", "Doe"), "jane.doe")
        .await
        .unwrap();

    let err = AccountRepo::register(&pool, &new_user("DUP@example.com", "John", "Roe"), "john.roe")
        .await
        .unwrap_err();
    assert_matches!(
        &err,
        sqlx::Error::Database(db) if db.constraint() == Some("uq_users_email")
    );

    assert_eq!(count(&pool, "users").await, 1);
    assert_eq!(count(&pool, "profiles").await, 1);
    assert_eq!(count(&pool, "user_finances").await, 1);
    assert!(ProfileRepo::find_by_slug(&pool, "john.roe").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_lookup_is_case_insensitive(pool: PgPool) {
    AccountRepo::register(&pool, &new_user("mixed@example.com", "Mixed", "Case"), "mixed.case")
        .await
        .unwrap();

    assert!(UserRepo::email_exists(&pool, "MIXED@Example.COM").await.unwrap());
    let found = UserRepo::find_by_email(&pool, "Mixed@example.com").await.unwrap();
    assert_eq!(found.unwrap().first_name, "Mixed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_and_count_agree(pool: PgPool) {
    for (email, first) in [("ann@x.io", "Ann"), ("bob@x.io", "Bob"), ("annie@x.io", "Annie")] {
        AccountRepo::register(&pool, &new_user(email, first, "Smith"), &first.to_lowercase())
            .await
            .unwrap();
    }

    let found = UserRepo::list(&pool, Some("ann"), 20, 0).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(UserRepo::count(&pool, Some("ann")).await.unwrap(), 2);
    assert_eq!(UserRepo::count(&pool, None).await.unwrap(), 3);

    let page = UserRepo::list(&pool, None, 2, 2).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_keeps_other_fields(pool: PgPool) {
    let (user, _) = AccountRepo::register(&pool, &new_user("p@example.com", "Pat", "Lee"), "pat.lee")
        .await
        .unwrap();

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            phone: Some("+33 6 00 00 00 00".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.phone.as_deref(), Some("+33 6 00 00 00 00"));
    assert_eq!(updated.first_name, "Pat");
    assert_eq!(updated.email, "p@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_token_is_single_use_and_expires(pool: PgPool) {
    let (user, _) = AccountRepo::register(&pool, &new_user("r@example.com", "Rae", "Kim"), "rae.kim")
        .await
        .unwrap();

    let expires = chrono::Utc::now() + chrono::Duration::hours(1);
    UserRepo::set_reset_token(&pool, user.id, "digest", expires).await.unwrap();
    assert!(UserRepo::complete_password_reset(&pool, "wrong-digest", "x").await.unwrap().is_none());

    let reset = UserRepo::complete_password_reset(&pool, "digest", "new-hash")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reset.password_hash, "new-hash");
    assert!(reset.reset_password_token_hash.is_none());
    assert!(reset.reset_password_expires.is_none());
    assert!(UserRepo::complete_password_reset(&pool, "digest", "again").await.unwrap().is_none());

    let past = chrono::Utc::now() - chrono::Duration::minutes(1);
    UserRepo::set_reset_token(&pool, user.id, "stale", past).await.unwrap();
    assert!(UserRepo::complete_password_reset(&pool, "stale", "late-hash").await.unwrap().is_none());
    let unchanged = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(unchanged.password_hash, "new-hash");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hard_delete_cascades_to_profile(pool: PgPool) {
    let (user, profile) = AccountRepo::register(&pool, &new_user("d@example.com", "Dee", "Ray"), "dee.ray")
        .await
        .unwrap();

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(ProfileRepo::find_by_id(&pool, profile.id).await.unwrap().is_none());
    assert_eq!(count(&pool, "user_finances").await, 0);
}
