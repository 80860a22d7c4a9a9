//! # 애플리케이션 공유 상태
//!
//! 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.

use std::time::Instant;

use sqlx::SqlitePool;

use crate::controller::PersistGate;
use crate::db::SqliteResumeStore;

#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 액세스 토큰 유효 시간(분)
    pub session_ttl_minutes: i64,
    /// 문서별 저장 직렬화. 모든 요청이 같은 게이트를 공유해야 합니다.
    pub gate: PersistGate,
    /// 서버 시작 시각 (헬스체크의 uptime 계산용)
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_secret: String, session_ttl_minutes: i64) -> Self {
        Self {
            pool,
            jwt_secret,
            session_ttl_minutes,
            gate: PersistGate::new(),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> SqliteResumeStore {
        SqliteResumeStore::new(self.pool.clone())
    }
}
