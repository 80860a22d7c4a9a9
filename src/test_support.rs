//! 테스트 공용 도우미: 마이그레이션된 메모리 SQLite 풀과 사용자 시드

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::db::users as db_users;

/// 마이그레이션으로 심어지는 "Classic" 템플릿
pub const CLASSIC_TEMPLATE_ID: &str = "0190c2a0-0000-7000-8000-000000000001";

/// 연결 하나짜리 메모리 DB. 연결이 닫히면 데이터도 사라지므로 수명 제한을 끕니다.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

/// 로그인할 일이 없는 사용자를 만들고 ID를 돌려줍니다.
pub async fn seed_user(pool: &SqlitePool, email: &str) -> String {
    let id = uuid::Uuid::now_v7().to_string();
    db_users::create_user(pool, &id, "Test User", email, "not-a-real-hash")
        .await
        .expect("seed user");
    id
}
