//! # セッション管理
//!
//! プロセス内メモリによるセッション管理を提供する。
//! セッションは永続化せず、サーバー再起動で失われる。
//!
//! ## 保存形式
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | セッション ID（UUID v4） | SessionData (JSON) | 28800秒（8時間） |
//!
//! 期限切れのセッションは取得時に削除する。
//! 一度も取得されずに期限を迎えたセッションは、次のセッション作成時にまとめて削除する。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use checkup_domain::{
   clock::Clock,
   user::{DisplayName, User, Username},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::InfraError;

/// セッションの有効期限（秒）
/// 8時間 = 28800秒
pub const SESSION_TTL_SECONDS: i64 = 28800;

/// セッションデータ
///
/// ログイン成功時に作成され、ログアウトまたは TTL 経過で削除される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
   username:     Username,
   display_name: DisplayName,
   created_at:   DateTime<Utc>,
}

impl SessionData {
   pub fn new(user: &User, now: DateTime<Utc>) -> Self {
      Self {
         username:     user.username().clone(),
         display_name: user.display_name().clone(),
         created_at:   now,
      }
   }

   pub fn username(&self) -> &Username {
      &self.username
   }

   pub fn display_name(&self) -> &DisplayName {
      &self.display_name
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   /// セッションの利用者
   pub fn user(&self) -> User {
      User::new(self.username.clone(), self.display_name.clone())
   }
}

/// セッション管理トレイト
///
/// セッションの作成・取得・削除を行う。
#[async_trait]
pub trait SessionManager: Send + Sync {
   /// セッションを作成し、セッション ID を返す
   ///
   /// # 戻り値
   ///
   /// 生成されたセッション ID（UUID v4）
   async fn create(&self, data: &SessionData) -> Result<String, InfraError>;

   /// セッションを取得する
   ///
   /// 存在しない、または期限切れなら `None`。
   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError>;

   /// セッションを削除する
   ///
   /// 存在しないセッションを削除しても成功とする。
   async fn delete(&self, session_id: &str) -> Result<(), InfraError>;
}

struct StoredSession {
   json:       String,
   expires_at: DateTime<Utc>,
}

/// プロセス内メモリのセッションマネージャ
pub struct InMemorySessionManager {
   sessions: RwLock<HashMap<String, StoredSession>>,
   clock:    Arc<dyn Clock>,
   ttl:      Duration,
}

impl InMemorySessionManager {
   pub fn new(clock: Arc<dyn Clock>) -> Self {
      Self {
         sessions: RwLock::new(HashMap::new()),
         clock,
         ttl: Duration::seconds(SESSION_TTL_SECONDS),
      }
   }
}

#[async_trait]
impl SessionManager for InMemorySessionManager {
   async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
      // UUID v4 でセッション ID を生成（暗号論的に安全なランダム値）
      let session_id = Uuid::new_v4().to_string();
      let json = serde_json::to_string(data)?;
      let now = self.clock.now();
      let expires_at = now + self.ttl;

      let mut sessions = self.sessions.write().await;
      let before = sessions.len();
      sessions.retain(|_, s| s.expires_at > now);
      let swept = before - sessions.len();
      if swept > 0 {
         tracing::debug!(swept, "期限切れのセッションをまとめて削除しました");
      }
      sessions.insert(session_id.clone(), StoredSession { json, expires_at });

      Ok(session_id)
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
      let stored = self
         .sessions
         .read()
         .await
         .get(session_id)
         .map(|s| (s.json.clone(), s.expires_at));
      let Some((json, expires_at)) = stored else {
         return Ok(None);
      };

      if expires_at <= self.clock.now() {
         self.sessions.write().await.remove(session_id);
         tracing::debug!(session_id, "期限切れのセッションを削除しました");
         return Ok(None);
      }

      let data: SessionData = serde_json::from_str(&json)?;
      Ok(Some(data))
   }

   async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
      self.sessions.write().await.remove(session_id);
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Mutex;

   use chrono::TimeZone;
   use pretty_assertions::assert_eq;

   use super::*;

   /// 時刻を進められるテスト用 Clock
   struct SteppingClock(Mutex<DateTime<Utc>>);

   impl SteppingClock {
      fn advance(&self, duration: Duration) {
         let mut now = self.0.lock().unwrap();
         *now += duration;
      }
   }

   impl Clock for SteppingClock {
      fn now(&self) -> DateTime<Utc> {
         *self.0.lock().unwrap()
      }
   }

   fn start() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
   }

   fn session_data() -> SessionData {
      let user = User::new(
         Username::new("admin").unwrap(),
         DisplayName::new("홍길동").unwrap(),
      );
      SessionData::new(&user, start())
   }

   #[tokio::test]
   async fn test_作成したセッションを取得できる() {
      let clock = Arc::new(SteppingClock(Mutex::new(start())));
      let sut = InMemorySessionManager::new(clock);

      let session_id = sut.create(&session_data()).await.unwrap();
      let result = sut.get(&session_id).await.unwrap();

      assert_eq!(result, Some(session_data()));
      assert_eq!(result.unwrap().user().username().as_str(), "admin");
   }

   #[tokio::test]
   async fn test_セッションidは毎回異なる() {
      let sut = InMemorySessionManager::new(Arc::new(SteppingClock(Mutex::new(start()))));

      let first = sut.create(&session_data()).await.unwrap();
      let second = sut.create(&session_data()).await.unwrap();

      assert_ne!(first, second);
   }

   #[tokio::test]
   async fn test_存在しないセッションはnone() {
      let sut = InMemorySessionManager::new(Arc::new(SteppingClock(Mutex::new(start()))));

      assert_eq!(sut.get("unknown").await.unwrap(), None);
   }

   #[tokio::test]
   async fn test_削除したセッションは取得できない() {
      let sut = InMemorySessionManager::new(Arc::new(SteppingClock(Mutex::new(start()))));
      let session_id = sut.create(&session_data()).await.unwrap();

      sut.delete(&session_id).await.unwrap();

      assert_eq!(sut.get(&session_id).await.unwrap(), None);
   }

   #[tokio::test]
   async fn test_存在しないセッションの削除は成功する() {
      let sut = InMemorySessionManager::new(Arc::new(SteppingClock(Mutex::new(start()))));

      assert!(sut.delete("unknown").await.is_ok());
   }

   #[tokio::test]
   async fn test_8時間経過したセッションは期限切れ() {
      let clock = Arc::new(SteppingClock(Mutex::new(start())));
      let sut = InMemorySessionManager::new(clock.clone());
      let session_id = sut.create(&session_data()).await.unwrap();

      clock.advance(Duration::seconds(SESSION_TTL_SECONDS - 1));
      assert!(sut.get(&session_id).await.unwrap().is_some());

      clock.advance(Duration::seconds(1));
      assert_eq!(sut.get(&session_id).await.unwrap(), None);
   }

   #[tokio::test]
   async fn test_取得されないまま期限切れになったセッションは作成時に削除される() {
      let clock = Arc::new(SteppingClock(Mutex::new(start())));
      let sut = InMemorySessionManager::new(clock.clone());
      let stale = sut.create(&session_data()).await.unwrap();

      clock.advance(Duration::seconds(SESSION_TTL_SECONDS));
      let fresh = sut.create(&session_data()).await.unwrap();

      let sessions = sut.sessions.read().await;
      assert!(!sessions.contains_key(&stale));
      assert!(sessions.contains_key(&fresh));
      assert_eq!(sessions.len(), 1);
   }
}
