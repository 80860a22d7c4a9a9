//! 문서별 저장 직렬화
//!
//! 같은 이력서에 대한 저장(최신 데이터 다시 읽기 → 슬라이스 병합 → 쓰기)이
//! 동시에 두 개 진행되지 않도록 문서 ID마다 비동기 뮤텍스를 하나씩 둡니다.
//! 서로 다른 문서의 저장은 서로를 기다리지 않습니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::OwnedMutexGuard;

type DocLock = tokio::sync::Mutex<()>;

#[derive(Debug, Clone, Default)]
pub struct PersistGate {
    locks: Arc<Mutex<HashMap<String, Weak<DocLock>>>>,
}

impl PersistGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서 하나의 저장 권한을 얻습니다. 가드가 drop되면 다음 저장이 진행됩니다.
    pub async fn acquire(&self, resume_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // 아무도 잡고 있지 않은 항목은 정리
            locks.retain(|_, weak| weak.strong_count() > 0);

            match locks.get(resume_id).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(DocLock::new(()));
                    locks.insert(resume_id.to_string(), Arc::downgrade(&lock));
                    lock
                }
            }
        };

        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_document_waits_for_previous_holder() {
        let gate = PersistGate::new();
        let first = gate.acquire("r1").await;

        let waiting = tokio::time::timeout(Duration::from_millis(50), gate.acquire("r1")).await;
        assert!(waiting.is_err());

        drop(first);
        let second = tokio::time::timeout(Duration::from_millis(50), gate.acquire("r1")).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn different_documents_do_not_block() {
        let gate = PersistGate::new();
        let _a = gate.acquire("r1").await;
        let b = tokio::time::timeout(Duration::from_millis(50), gate.acquire("r2")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_entries_are_pruned() {
        let gate = PersistGate::new();
        drop(gate.acquire("r1").await);
        drop(gate.acquire("r2").await);
        let _c = gate.acquire("r3").await;
        assert_eq!(gate.tracked(), 1);
    }
}
