//! # 健診照会ユースケース
//!
//! セッションごとの照会フロー（[`VerificationFlow`]）を進め、外部 API を呼び出す。
//!
//! ## 並行性
//!
//! 外部 API の呼び出し中（`Requesting` / `Completing`）はストアにその状態を書いておき、
//! 同じセッションからの送信・完了・取り消しを 409 で拒否する。
//! 応答を反映するときは呼び出し前のステータスを期待値にした compare-and-swap で書き込み、
//! その間にログアウトなどで状態が変わっていれば応答を破棄する。

use std::{sync::Arc, time::Duration};

use checkup_domain::{
   DomainError,
   clock::Clock,
   summary::{CheckupHistory, CheckupSummary},
   user::User,
   verification::{
      DateRange,
      FailureCause,
      FlowFailure,
      RequestId,
      VerificationFlow,
      VerificationForm,
      VerificationRequest,
      VerificationState,
      VerificationStatus,
   },
};
use checkup_infra::{InfraError, VerificationFlowStore};
use checkup_shared::{event_log::event, log_business_event};
use thiserror::Error;

use crate::client::{CheckupApiClient, CheckupApiError, CheckupContinuation, CheckupInquiry};

/// 応答を反映する前に状態が変わっていたとき
pub const DISCARDED_MESSAGE: &str = "조회 상태가 변경되어 응답을 반영하지 못했습니다. 다시 조회해주세요.";
/// 照会結果がまだ無いとき
pub const NO_RESULT_MESSAGE: &str = "조회된 건강검진 결과가 없습니다.";
/// 照会結果に健診記録が 1 件も無いとき
pub const NO_RECORD_MESSAGE: &str = "건강검진 기록이 없습니다.";

/// 健診照会ユースケースのエラー
#[derive(Debug, Error)]
pub enum CheckupUseCaseError {
   /// 入力エラー（外部 API は呼ばない）
   #[error("{0}")]
   Validation(String),

   /// 現在の状態では実行できない
   #[error("{0}")]
   Conflict(String),

   /// 表示する結果が無い
   #[error("{0}")]
   NotFound(String),

   /// 外部 API が照会を受け付けなかった
   #[error("{}", .failure.message())]
   Rejected {
      failure: FlowFailure,
      #[source]
      source:  CheckupApiError,
   },

   /// 外部 API と通信できなかった
   #[error("{}", .failure.message())]
   Unavailable {
      failure: FlowFailure,
      #[source]
      source:  CheckupApiError,
   },

   /// 本人確認待ちの期限切れ
   #[error("{}", .0.message())]
   Expired(FlowFailure),

   /// ストアのエラー
   #[error("内部エラー: {0}")]
   Internal(#[from] InfraError),
}

impl From<DomainError> for CheckupUseCaseError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => Self::Validation(msg),
         DomainError::Conflict(msg) => Self::Conflict(msg),
      }
   }
}

/// 照会フローの現在の状態と、フォームの既定値
#[derive(Debug, Clone)]
pub struct VerificationSnapshot {
   pub flow:               VerificationFlow,
   pub default_date_range: DateRange,
}

/// 健診照会ユースケース
pub struct CheckupUseCase {
   client:           Arc<dyn CheckupApiClient>,
   flow_store:       Arc<dyn VerificationFlowStore>,
   clock:            Arc<dyn Clock>,
   verification_ttl: Option<Duration>,
}

impl CheckupUseCase {
   pub fn new(
      client: Arc<dyn CheckupApiClient>,
      flow_store: Arc<dyn VerificationFlowStore>,
      clock: Arc<dyn Clock>,
      verification_ttl: Option<Duration>,
   ) -> Self {
      Self {
         client,
         flow_store,
         clock,
         verification_ttl,
      }
   }

   /// 照会フローの現在の状態を取得する
   pub async fn status(&self, session_id: &str) -> Result<VerificationSnapshot, CheckupUseCaseError> {
      let now = self.clock.now();
      let flow = self.flow_store.load(session_id, now).await?;
      Ok(VerificationSnapshot {
         flow,
         default_date_range: DateRange::default_for(now),
      })
   }

   /// 照会フォームを送信する（一段階目）
   ///
   /// 生年月日か電話番号が空なら外部 API を呼ばずにバリデーションエラーを返す。
   /// 成功すると本人確認待ちの状態を返す。
   pub async fn submit(
      &self,
      session_id: &str,
      user: &User,
      form: VerificationForm,
   ) -> Result<VerificationFlow, CheckupUseCaseError> {
      let now = self.clock.now();
      let request =
         VerificationRequest::new(RequestId::new(), user.display_name().clone(), form, now)?;
      let inquiry = CheckupInquiry::from(&request);
      let request_id = request.id().clone();

      let current = self.flow_store.load(session_id, now).await?;
      let expected = current.status();
      let requesting = current.submitted(request, now)?;
      self.swap(session_id, expected, requesting.clone()).await?;

      log_business_event!(
         event.category = event::category::CHECKUP,
         event.action = event::action::CHECKUP_REQUESTED,
         event.entity_type = event::entity_type::CHECKUP_REQUEST,
         event.entity_id = %request_id,
         event.actor_id = %user.username(),
         event.result = event::result::SUCCESS,
         "健診照会を開始"
      );

      let result = self.client.request_verification(&inquiry).await;
      let now = self.clock.now();

      match result {
         Ok(challenge) => {
            let awaiting = requesting.challenge_issued(challenge, now)?;
            self.apply_response(session_id, VerificationStatus::Requesting, awaiting.clone())
               .await?;

            log_business_event!(
               event.category = event::category::CHECKUP,
               event.action = event::action::CHALLENGE_ISSUED,
               event.entity_type = event::entity_type::CHECKUP_REQUEST,
               event.entity_id = %request_id,
               event.actor_id = %user.username(),
               event.result = event::result::SUCCESS,
               "本人確認待ち"
            );
            Ok(awaiting)
         }
         Err(err) => {
            let failed = requesting.request_failed(cause_of(&err), now)?;
            self.apply_failure(session_id, VerificationStatus::Requesting, failed, err)
               .await
         }
      }
   }

   /// 本人確認の完了を申告する（二段階目）
   ///
   /// 成功すると健診データを取得済みの状態を返す。
   /// 失敗した場合はチャレンジ情報を破棄し、フォームからやり直しになる。
   pub async fn complete(&self, session_id: &str) -> Result<VerificationFlow, CheckupUseCaseError> {
      let now = self.clock.now();
      let current = self.flow_store.load(session_id, now).await?;
      let next = current.completion_started(now, self.verification_ttl)?;

      let (continuation, request_id) = match next.state() {
         VerificationState::Completing(completing) => (
            CheckupContinuation::new(&completing.request, &completing.challenge),
            completing.request.id().clone(),
         ),
         _ => {
            // 期限切れで Idle に戻った
            self.swap(
               session_id,
               VerificationStatus::AwaitingUserVerification,
               next.clone(),
            )
            .await?;
            let failure = next
               .last_failure()
               .copied()
               .ok_or_else(|| InfraError::unexpected("期限切れの失敗情報がありません"))?;
            log_failure(&failure, None);
            return Err(CheckupUseCaseError::Expired(failure));
         }
      };

      self.swap(
         session_id,
         VerificationStatus::AwaitingUserVerification,
         next.clone(),
      )
      .await?;

      let result = self.client.complete_verification(&continuation).await;
      let now = self.clock.now();

      match result {
         Ok(data) => {
            let resolved = next.resolved(data, now)?;
            self.apply_response(session_id, VerificationStatus::Completing, resolved.clone())
               .await?;

            log_business_event!(
               event.category = event::category::CHECKUP,
               event.action = event::action::CHECKUP_RESOLVED,
               event.entity_type = event::entity_type::CHECKUP_REQUEST,
               event.entity_id = %request_id,
               event.result = event::result::SUCCESS,
               "健診データを取得"
            );
            Ok(resolved)
         }
         Err(err) => {
            let failed = next.completion_failed(cause_of(&err), now)?;
            self.apply_failure(session_id, VerificationStatus::Completing, failed, err)
               .await
         }
      }
   }

   /// 照会を取り消して最初に戻る
   pub async fn cancel(&self, session_id: &str) -> Result<VerificationFlow, CheckupUseCaseError> {
      let now = self.clock.now();
      let current = self.flow_store.load(session_id, now).await?;
      let expected = current.status();
      let idle = current.cancelled(now)?;
      self.swap(session_id, expected, idle.clone()).await?;

      log_business_event!(
         event.category = event::category::CHECKUP,
         event.action = event::action::CHECKUP_CANCELLED,
         event.entity_type = event::entity_type::CHECKUP_REQUEST,
         event.from_status = %expected,
         event.result = event::result::SUCCESS,
         "健診照会を取り消し"
      );
      Ok(idle)
   }

   /// 最新健診の主要 6 指標
   pub async fn summary(&self, session_id: &str) -> Result<CheckupSummary, CheckupUseCaseError> {
      let flow = self.flow_store.load(session_id, self.clock.now()).await?;
      let data = flow
         .data()
         .ok_or_else(|| CheckupUseCaseError::NotFound(NO_RESULT_MESSAGE.to_string()))?;

      CheckupSummary::latest(data)
         .ok_or_else(|| CheckupUseCaseError::NotFound(NO_RECORD_MESSAGE.to_string()))
   }

   /// 全健診の履歴
   pub async fn history(&self, session_id: &str) -> Result<CheckupHistory, CheckupUseCaseError> {
      let flow = self.flow_store.load(session_id, self.clock.now()).await?;
      let data = flow
         .data()
         .ok_or_else(|| CheckupUseCaseError::NotFound(NO_RESULT_MESSAGE.to_string()))?;

      Ok(CheckupHistory::from_data(data))
   }

   /// セッションの照会フローを破棄する（ログアウト時）
   ///
   /// 呼び出し中の応答は、反映時の compare-and-swap で捨てられる。
   pub async fn discard(&self, session_id: &str) -> Result<(), CheckupUseCaseError> {
      self.flow_store.remove(session_id).await?;
      Ok(())
   }

   /// 利用者の操作による書き込み
   ///
   /// 読み込みから書き込みまでの間に別のリクエストが状態を変えていれば 409。
   async fn swap(
      &self,
      session_id: &str,
      expected: VerificationStatus,
      next: VerificationFlow,
   ) -> Result<(), CheckupUseCaseError> {
      if self.flow_store.save_if(session_id, expected, next).await? {
         Ok(())
      } else {
         Err(DomainError::Conflict(
            checkup_domain::verification::IN_FLIGHT_MESSAGE.to_string(),
         )
         .into())
      }
   }

   /// 外部 API の応答による書き込み
   ///
   /// 呼び出し中に状態が変わっていれば応答を破棄して 409。
   async fn apply_response(
      &self,
      session_id: &str,
      expected: VerificationStatus,
      next: VerificationFlow,
   ) -> Result<(), CheckupUseCaseError> {
      if self.flow_store.save_if(session_id, expected, next).await? {
         return Ok(());
      }

      log_business_event!(
         event.category = event::category::CHECKUP,
         event.action = event::action::RESPONSE_DISCARDED,
         event.entity_type = event::entity_type::CHECKUP_REQUEST,
         event.expected_status = %expected,
         event.result = event::result::FAILURE,
         "状態が変わっていたため応答を破棄"
      );
      Err(CheckupUseCaseError::Conflict(DISCARDED_MESSAGE.to_string()))
   }

   async fn apply_failure(
      &self,
      session_id: &str,
      expected: VerificationStatus,
      failed: VerificationFlow,
      err: CheckupApiError,
   ) -> Result<VerificationFlow, CheckupUseCaseError> {
      let failure = failed
         .last_failure()
         .copied()
         .ok_or_else(|| InfraError::unexpected("失敗情報がありません"))?;
      self.apply_response(session_id, expected, failed).await?;
      log_failure(&failure, Some(&err));

      Err(match failure.cause {
         FailureCause::Transport => CheckupUseCaseError::Unavailable {
            failure,
            source: err,
         },
         FailureCause::Rejected | FailureCause::Expired => CheckupUseCaseError::Rejected {
            failure,
            source: err,
         },
      })
   }
}

fn cause_of(err: &CheckupApiError) -> FailureCause {
   match err {
      CheckupApiError::Rejected(_) => FailureCause::Rejected,
      CheckupApiError::Network(_) => FailureCause::Transport,
   }
}

fn log_failure(failure: &FlowFailure, err: Option<&CheckupApiError>) {
   log_business_event!(
      event.category = event::category::CHECKUP,
      event.action = event::action::CHECKUP_FAILED,
      event.entity_type = event::entity_type::CHECKUP_REQUEST,
      event.phase = %failure.phase,
      event.reason = %failure.cause,
      event.result = event::result::FAILURE,
      error = err.map(tracing::field::display),
      "健診照会に失敗"
   );
}

#[cfg(test)]
mod tests {
   use std::sync::Mutex;

   use async_trait::async_trait;
   use checkup_domain::{
      checkup::{CheckupOverview, HealthCheckupData},
      clock::FixedClock,
      user::{DisplayName, Username},
      verification::{ChallengeDescriptor, FlowPhase},
   };
   use checkup_infra::InMemoryVerificationFlowStore;
   use chrono::{DateTime, TimeZone, Utc};
   use pretty_assertions::assert_eq;

   use super::*;

   const SESSION: &str = "session-1";

   // ===== スタブ =====

   /// 応答を事前に決めておけるクライアント
   ///
   /// 送信されたリクエストボディを JSON で記録する。
   #[derive(Default)]
   struct StubCheckupApiClient {
      request_result:  Mutex<Option<Result<ChallengeDescriptor, CheckupApiError>>>,
      complete_result: Mutex<Option<Result<HealthCheckupData, CheckupApiError>>>,
      sent:            Mutex<Vec<serde_json::Value>>,
      /// 呼び出し中にフローを削除する（ログアウトの再現）
      remove_during:   Option<Arc<InMemoryVerificationFlowStore>>,
   }

   impl StubCheckupApiClient {
      fn requesting(result: Result<ChallengeDescriptor, CheckupApiError>) -> Self {
         Self {
            request_result: Mutex::new(Some(result)),
            ..Default::default()
         }
      }

      fn then_complete(self, result: Result<HealthCheckupData, CheckupApiError>) -> Self {
         *self.complete_result.lock().unwrap() = Some(result);
         self
      }

      fn sent(&self) -> Vec<serde_json::Value> {
         self.sent.lock().unwrap().clone()
      }

      async fn maybe_remove(&self) {
         if let Some(store) = &self.remove_during {
            store.remove(SESSION).await.unwrap();
         }
      }
   }

   #[async_trait]
   impl CheckupApiClient for StubCheckupApiClient {
      async fn request_verification(
         &self,
         inquiry: &CheckupInquiry,
      ) -> Result<ChallengeDescriptor, CheckupApiError> {
         self.sent
            .lock()
            .unwrap()
            .push(serde_json::to_value(inquiry).unwrap());
         self.maybe_remove().await;
         self.request_result
            .lock()
            .unwrap()
            .take()
            .expect("request_verification の応答が未設定")
      }

      async fn complete_verification(
         &self,
         continuation: &CheckupContinuation,
      ) -> Result<HealthCheckupData, CheckupApiError> {
         self.sent
            .lock()
            .unwrap()
            .push(serde_json::to_value(continuation).unwrap());
         self.maybe_remove().await;
         self.complete_result
            .lock()
            .unwrap()
            .take()
            .expect("complete_verification の応答が未設定")
      }
   }

   // ===== ヘルパー =====

   fn t0() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
   }

   fn user() -> User {
      User::new(
         Username::new("admin").unwrap(),
         DisplayName::new("홍길동").unwrap(),
      )
   }

   fn form() -> VerificationForm {
      VerificationForm {
         birthdate: "19900101".to_string(),
         phone_no: "01012345678".to_string(),
         ..Default::default()
      }
   }

   fn challenge() -> ChallengeDescriptor {
      ChallengeDescriptor {
         transaction_id:      "t1".to_string(),
         job_index:           1,
         thread_index:        2,
         challenge_timestamp: 1000,
      }
   }

   fn checkup_data() -> HealthCheckupData {
      HealthCheckupData {
         patient_name: Some("홍길동".to_string()),
         overview_list: vec![CheckupOverview {
            checkup_date: Some("2024-05-12".to_string()),
            bmi: Some("22.1".to_string()),
            ..Default::default()
         }],
         ..Default::default()
      }
   }

   fn sut_with(
      client: Arc<StubCheckupApiClient>,
      store: Arc<InMemoryVerificationFlowStore>,
      now: DateTime<Utc>,
      ttl: Option<Duration>,
   ) -> CheckupUseCase {
      CheckupUseCase::new(client, store, Arc::new(FixedClock::new(now)), ttl)
   }

   fn sut(client: StubCheckupApiClient) -> (CheckupUseCase, Arc<StubCheckupApiClient>) {
      let client = Arc::new(client);
      let store = Arc::new(InMemoryVerificationFlowStore::new());
      (sut_with(client.clone(), store, t0(), None), client)
   }

   // ===== 一段階目 =====

   #[tokio::test]
   async fn test_生年月日が空なら外部apiを呼ばない() {
      let (sut, client) = sut(StubCheckupApiClient::default());

      let result = sut
         .submit(
            SESSION,
            &user(),
            VerificationForm {
               birthdate: String::new(),
               ..form()
            },
         )
         .await;

      assert!(matches!(result, Err(CheckupUseCaseError::Validation(_))));
      assert!(client.sent().is_empty());
      let status = sut.status(SESSION).await.unwrap();
      assert_eq!(status.flow.status(), VerificationStatus::Idle);
   }

   #[tokio::test]
   async fn test_チャレンジ情報を受け取ると本人確認待ちになる() {
      let (sut, client) = sut(StubCheckupApiClient::requesting(Ok(challenge())));

      let flow = sut.submit(SESSION, &user(), form()).await.unwrap();

      assert_eq!(flow.status(), VerificationStatus::AwaitingUserVerification);
      assert_eq!(flow.challenge(), Some(&challenge()));
      let sent = client.sent();
      assert_eq!(sent[0]["legalName"], "홍길동");
      assert_eq!(sent[0]["startDate"], "2024");
      assert_eq!(sent[0]["endDate"], "2025");
   }

   #[tokio::test]
   async fn test_一段階目の拒否はidleに戻り502相当のエラー() {
      let (sut, _) = sut(StubCheckupApiClient::requesting(Err(
         CheckupApiError::Rejected("status=error".to_string()),
      )));

      let err = sut.submit(SESSION, &user(), form()).await.unwrap_err();

      assert!(matches!(err, CheckupUseCaseError::Rejected { .. }));
      assert_eq!(err.to_string(), "조회 요청에 실패했습니다. 다시 시도해주세요.");
      let status = sut.status(SESSION).await.unwrap();
      assert_eq!(status.flow.status(), VerificationStatus::Idle);
      assert_eq!(
         status.flow.last_failure().map(|f| f.phase),
         Some(FlowPhase::Request)
      );
   }

   #[tokio::test]
   async fn test_一段階目の通信エラーは503相当のエラー() {
      let (sut, _) = sut(StubCheckupApiClient::requesting(Err(
         CheckupApiError::Network("connection refused".to_string()),
      )));

      let err = sut.submit(SESSION, &user(), form()).await.unwrap_err();

      assert!(matches!(err, CheckupUseCaseError::Unavailable { .. }));
      assert_eq!(
         err.to_string(),
         "네트워크 오류가 발생했습니다. 다시 시도해주세요."
      );
   }

   // ===== 二段階目 =====

   #[tokio::test]
   async fn test_二段階目はチャレンジ情報をそのまま送り健診データを受け取る() {
      let (sut, client) = sut(
         StubCheckupApiClient::requesting(Ok(challenge())).then_complete(Ok(checkup_data())),
      );
      sut.submit(SESSION, &user(), form()).await.unwrap();

      let flow = sut.complete(SESSION).await.unwrap();

      assert_eq!(flow.status(), VerificationStatus::Resolved);
      assert!(flow.challenge().is_none());
      let sent = client.sent();
      assert_eq!(sent[1]["id"], sent[0]["id"]);
      assert_eq!(sent[1]["isContinue"], "1");
      assert_eq!(
         sent[1]["multiFactorInfo"],
         serde_json::json!({
            "transactionId": "t1",
            "jobIndex": 1,
            "threadIndex": 2,
            "multiFactorTimestamp": 1000
         })
      );
   }

   #[tokio::test]
   async fn test_二段階目の拒否でチャレンジ情報を破棄してidleに戻る() {
      let (sut, _) = sut(
         StubCheckupApiClient::requesting(Ok(challenge()))
            .then_complete(Err(CheckupApiError::Rejected("status=error".to_string()))),
      );
      sut.submit(SESSION, &user(), form()).await.unwrap();

      let err = sut.complete(SESSION).await.unwrap_err();

      assert_eq!(err.to_string(), "건강검진 결과 조회에 실패했습니다.");
      let flow = sut.status(SESSION).await.unwrap().flow;
      assert_eq!(flow.status(), VerificationStatus::Idle);
      assert!(flow.challenge().is_none());
      // フォームからやり直す必要がある
      assert!(matches!(
         sut.complete(SESSION).await,
         Err(CheckupUseCaseError::Conflict(msg)) if msg == "인증 정보가 없습니다."
      ));
   }

   #[tokio::test]
   async fn test_二段階目の通信エラーの文言() {
      let (sut, _) = sut(
         StubCheckupApiClient::requesting(Ok(challenge()))
            .then_complete(Err(CheckupApiError::Network("timeout".to_string()))),
      );
      sut.submit(SESSION, &user(), form()).await.unwrap();

      let err = sut.complete(SESSION).await.unwrap_err();

      assert!(matches!(err, CheckupUseCaseError::Unavailable { .. }));
      assert_eq!(err.to_string(), "네트워크 오류가 발생했습니다.");
   }

   #[tokio::test]
   async fn test_期限を過ぎてから完了すると外部apiを呼ばずに期限切れ() {
      let client = Arc::new(StubCheckupApiClient::requesting(Ok(challenge())));
      let store = Arc::new(InMemoryVerificationFlowStore::new());
      let ttl = Some(Duration::from_secs(300));
      sut_with(client.clone(), store.clone(), t0(), ttl)
         .submit(SESSION, &user(), form())
         .await
         .unwrap();

      let later = sut_with(
         client.clone(),
         store,
         t0() + chrono::Duration::seconds(301),
         ttl,
      );
      let err = later.complete(SESSION).await.unwrap_err();

      assert!(matches!(err, CheckupUseCaseError::Expired(_)));
      assert_eq!(client.sent().len(), 1);
      assert_eq!(
         later.status(SESSION).await.unwrap().flow.status(),
         VerificationStatus::Idle
      );
   }

   // ===== 取り消し・破棄 =====

   #[tokio::test]
   async fn test_本人確認待ちを取り消すとidleに戻る() {
      let (sut, _) = sut(StubCheckupApiClient::requesting(Ok(challenge())));
      sut.submit(SESSION, &user(), form()).await.unwrap();

      let flow = sut.cancel(SESSION).await.unwrap();

      assert_eq!(flow.status(), VerificationStatus::Idle);
      assert!(flow.challenge().is_none());
   }

   #[tokio::test]
   async fn test_呼び出し中にフローが削除されると応答を破棄する() {
      let store = Arc::new(InMemoryVerificationFlowStore::new());
      let client = Arc::new(StubCheckupApiClient {
         remove_during: Some(store.clone()),
         ..StubCheckupApiClient::requesting(Ok(challenge()))
      });
      let sut = sut_with(client, store, t0(), None);

      let err = sut.submit(SESSION, &user(), form()).await.unwrap_err();

      assert!(matches!(err, CheckupUseCaseError::Conflict(msg) if msg == DISCARDED_MESSAGE));
      assert_eq!(
         sut.status(SESSION).await.unwrap().flow.status(),
         VerificationStatus::Idle
      );
   }

   // ===== 結果表示 =====

   #[tokio::test]
   async fn test_結果取得前のサマリーはnot_found() {
      let (sut, _) = sut(StubCheckupApiClient::default());

      let err = sut.summary(SESSION).await.unwrap_err();

      assert!(matches!(err, CheckupUseCaseError::NotFound(msg) if msg == NO_RESULT_MESSAGE));
   }

   #[tokio::test]
   async fn test_結果取得後にサマリーと履歴を取得できる() {
      let (sut, _) = sut(
         StubCheckupApiClient::requesting(Ok(challenge())).then_complete(Ok(checkup_data())),
      );
      sut.submit(SESSION, &user(), form()).await.unwrap();
      sut.complete(SESSION).await.unwrap();

      let summary = sut.summary(SESSION).await.unwrap();
      let history = sut.history(SESSION).await.unwrap();

      assert_eq!(summary.checkup_date, "2024-05-12");
      assert_eq!(summary.metrics.len(), 6);
      assert_eq!(history.entries.len(), 1);
      assert!(history.entries[0].is_latest);
   }

   #[tokio::test]
   async fn test_健診記録が空ならサマリーはnot_found() {
      let (sut, _) = sut(
         StubCheckupApiClient::requesting(Ok(challenge()))
            .then_complete(Ok(HealthCheckupData::default())),
      );
      sut.submit(SESSION, &user(), form()).await.unwrap();
      sut.complete(SESSION).await.unwrap();

      let err = sut.summary(SESSION).await.unwrap_err();

      assert!(matches!(err, CheckupUseCaseError::NotFound(msg) if msg == NO_RECORD_MESSAGE));
   }

   #[tokio::test]
   async fn test_破棄するとidleに戻る() {
      let (sut, _) = sut(StubCheckupApiClient::requesting(Ok(challenge())));
      sut.submit(SESSION, &user(), form()).await.unwrap();

      sut.discard(SESSION).await.unwrap();

      assert_eq!(
         sut.status(SESSION).await.unwrap().flow.status(),
         VerificationStatus::Idle
      );
   }
}
