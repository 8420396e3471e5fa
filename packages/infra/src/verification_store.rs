//! # 照会フローストア
//!
//! セッションごとに照会フロー（[`VerificationFlow`]）を 1 つ保持する。
//!
//! 外部 API の応答を待つ間にログアウトや別の操作で状態が変わることがあるため、
//! 書き込みはステータスの compare-and-swap で行う。期待したステータスでなければ
//! 書き込まずに `false` を返し、呼び出し側は応答を破棄する。
//!
//! セッションより長くフローが残らないよう、最後の更新から
//! [`SESSION_TTL_SECONDS`] を過ぎたフローは読み書きの際に削除する。
//! フローはセッション作成より後に更新されるため、この時点でセッションも
//! 期限切れになっている。

use std::collections::HashMap;

use async_trait::async_trait;
use checkup_domain::verification::{VerificationFlow, VerificationStatus};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::{InfraError, session::SESSION_TTL_SECONDS};

/// 照会フローストア
#[async_trait]
pub trait VerificationFlowStore: Send + Sync {
   /// セッションの照会フローを取得する
   ///
   /// 未作成なら `now` 時点の `Idle` を返す。
   async fn load(
      &self,
      session_id: &str,
      now: DateTime<Utc>,
   ) -> Result<VerificationFlow, InfraError>;

   /// 現在のステータスが `expected` のときだけ `next` で置き換える
   ///
   /// 未作成のフローは `Idle` とみなす。
   ///
   /// # 戻り値
   ///
   /// 置き換えた場合は `true`
   async fn save_if(
      &self,
      session_id: &str,
      expected: VerificationStatus,
      next: VerificationFlow,
   ) -> Result<bool, InfraError>;

   /// セッションの照会フローを削除する
   async fn remove(&self, session_id: &str) -> Result<(), InfraError>;
}

/// プロセス内メモリの照会フローストア
pub struct InMemoryVerificationFlowStore {
   flows: Mutex<HashMap<String, VerificationFlow>>,
   ttl:   Duration,
}

impl Default for InMemoryVerificationFlowStore {
   fn default() -> Self {
      Self::new()
   }
}

impl InMemoryVerificationFlowStore {
   pub fn new() -> Self {
      Self {
         flows: Mutex::new(HashMap::new()),
         ttl:   Duration::seconds(SESSION_TTL_SECONDS),
      }
   }

   /// 最後の更新から TTL を過ぎたフローを削除する
   fn sweep(&self, flows: &mut HashMap<String, VerificationFlow>, now: DateTime<Utc>) {
      let before = flows.len();
      flows.retain(|_, flow| flow.updated_at() + self.ttl > now);
      let swept = before - flows.len();
      if swept > 0 {
         tracing::debug!(swept, "期限切れの照会フローを削除しました");
      }
   }
}

#[async_trait]
impl VerificationFlowStore for InMemoryVerificationFlowStore {
   async fn load(
      &self,
      session_id: &str,
      now: DateTime<Utc>,
   ) -> Result<VerificationFlow, InfraError> {
      let mut flows = self.flows.lock().await;
      self.sweep(&mut flows, now);
      Ok(flows
         .get(session_id)
         .cloned()
         .unwrap_or_else(|| VerificationFlow::new(now)))
   }

   async fn save_if(
      &self,
      session_id: &str,
      expected: VerificationStatus,
      next: VerificationFlow,
   ) -> Result<bool, InfraError> {
      let mut flows = self.flows.lock().await;
      self.sweep(&mut flows, next.updated_at());
      let current = flows
         .get(session_id)
         .map_or(VerificationStatus::Idle, VerificationFlow::status);

      if current != expected {
         tracing::debug!(
            session_id,
            %expected,
            %current,
            "照会フローのステータスが変わっていたため書き込みを見送りました"
         );
         return Ok(false);
      }

      flows.insert(session_id.to_string(), next);
      Ok(true)
   }

   async fn remove(&self, session_id: &str) -> Result<(), InfraError> {
      self.flows.lock().await.remove(session_id);
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use checkup_domain::{
      user::DisplayName,
      verification::{RequestId, VerificationForm, VerificationRequest},
   };
   use chrono::TimeZone;
   use pretty_assertions::assert_eq;

   use super::*;

   fn now() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
   }

   fn requesting() -> VerificationFlow {
      let request = VerificationRequest::new(
         RequestId::new(),
         DisplayName::new("홍길동").unwrap(),
         VerificationForm {
            birthdate: "19900101".to_string(),
            phone_no: "01012345678".to_string(),
            ..Default::default()
         },
         now(),
      )
      .unwrap();
      VerificationFlow::new(now()).submitted(request, now()).unwrap()
   }

   #[tokio::test]
   async fn test_未作成のフローはidle() {
      let sut = InMemoryVerificationFlowStore::new();

      let flow = sut.load("s1", now()).await.unwrap();

      assert_eq!(flow.status(), VerificationStatus::Idle);
   }

   #[tokio::test]
   async fn test_期待ステータスが一致すれば書き込む() {
      let sut = InMemoryVerificationFlowStore::new();

      let saved = sut
         .save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      assert!(saved);
      assert_eq!(
         sut.load("s1", now()).await.unwrap().status(),
         VerificationStatus::Requesting
      );
   }

   #[tokio::test]
   async fn test_期待ステータスが違えば書き込まない() {
      let sut = InMemoryVerificationFlowStore::new();
      sut.save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      // 2 回目の送信は Idle を期待しているが、既に Requesting
      let saved = sut
         .save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      assert!(!saved);
   }

   #[tokio::test]
   async fn test_削除後の書き込みはidleを期待しないと見送られる() {
      let sut = InMemoryVerificationFlowStore::new();
      sut.save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      sut.remove("s1").await.unwrap();
      let saved = sut
         .save_if("s1", VerificationStatus::Requesting, VerificationFlow::new(now()))
         .await
         .unwrap();

      assert!(!saved);
      assert_eq!(
         sut.load("s1", now()).await.unwrap().status(),
         VerificationStatus::Idle
      );
   }

   #[tokio::test]
   async fn test_セッションの有効期限を過ぎたフローは削除される() {
      let sut = InMemoryVerificationFlowStore::new();
      sut.save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      let expired = now() + Duration::seconds(SESSION_TTL_SECONDS);
      let flow = sut.load("s1", expired).await.unwrap();

      assert_eq!(flow.status(), VerificationStatus::Idle);
      assert!(sut.flows.lock().await.is_empty());
   }

   #[tokio::test]
   async fn test_放置されたフローは他のセッションの書き込みで削除される() {
      let sut = InMemoryVerificationFlowStore::new();
      sut.save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      let later = now() + Duration::seconds(SESSION_TTL_SECONDS + 60);
      let saved = sut
         .save_if("s2", VerificationStatus::Idle, VerificationFlow::new(later))
         .await
         .unwrap();

      assert!(saved);
      let flows = sut.flows.lock().await;
      assert!(!flows.contains_key("s1"));
      assert!(flows.contains_key("s2"));
   }

   #[tokio::test]
   async fn test_有効期限内のフローは残る() {
      let sut = InMemoryVerificationFlowStore::new();
      sut.save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      let before_expiry = now() + Duration::seconds(SESSION_TTL_SECONDS - 1);
      let flow = sut.load("s1", before_expiry).await.unwrap();

      assert_eq!(flow.status(), VerificationStatus::Requesting);
   }

   #[tokio::test]
   async fn test_セッションごとに独立している() {
      let sut = InMemoryVerificationFlowStore::new();
      sut.save_if("s1", VerificationStatus::Idle, requesting())
         .await
         .unwrap();

      assert_eq!(
         sut.load("s2", now()).await.unwrap().status(),
         VerificationStatus::Idle
      );
   }
}
