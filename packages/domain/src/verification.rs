//! # 本人確認付き健診照会フロー
//!
//! 外部の健診 API は 1 つのエンドポイントを 2 回呼ぶ。
//!
//! 1. 照会リクエストを送ると、本人確認のチャレンジ情報（[`ChallengeDescriptor`]）が返る
//! 2. 利用者がスマートフォンで本人確認を済ませたら、同じ照会内容にチャレンジ情報を
//!    添えて再送し、健診データを受け取る
//!
//! 状態遷移は ADT で表現し、各状態で有効なフィールドのみを持たせる。
//!
//! ```text
//! Idle ──submit──▶ Requesting ──challenge──▶ AwaitingUserVerification
//!  ▲                  │                          │ complete
//!  │◀──── failure ────┘                          ▼
//!  │◀──────────────── failure / expiry ───── Completing ──data──▶ Resolved
//!  │◀──────────────────── cancel (Awaiting / Resolved) ─────────────┘
//! ```
//!
//! 失敗は `Idle` に戻り、直前の失敗（[`FlowFailure`]）を保持する。
//! チャレンジ情報は成功・失敗・取り消しのいずれでも破棄される。
//! 外部 API 呼び出し中（`Requesting` / `Completing`）は送信・完了・取り消しを受け付けない。

use std::{fmt, time::Duration};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DomainError, checkup::HealthCheckupData, user::DisplayName};

/// 生年月日・電話番号が未入力のとき
pub const MISSING_FIELDS_MESSAGE: &str = "생년월일과 휴대폰 번호를 입력해주세요.";
/// 本人確認待ちでないのに完了が要求されたとき
pub const NO_CHALLENGE_MESSAGE: &str = "인증 정보가 없습니다.";
/// 外部 API 呼び出し中に操作されたとき
pub const IN_FLIGHT_MESSAGE: &str = "조회를 처리하고 있습니다. 잠시 후 다시 시도해주세요.";
/// 本人確認待ちの最中に新しい照会が送られたとき
pub const AWAITING_MESSAGE: &str = "본인 인증을 기다리는 조회가 있습니다. 취소 후 다시 조회해주세요.";

// =========================================================================
// 照会リクエスト
// =========================================================================

/// 照会リクエスト ID（`id-<UUID v4>`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
pub struct RequestId(String);

impl RequestId {
   pub fn new() -> Self {
      Self(format!("id-{}", Uuid::new_v4()))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl Default for RequestId {
   fn default() -> Self {
      Self::new()
   }
}

/// 照会種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InquiryType {
   /// 健康診断結果
   #[default]
   Checkup,
}

impl InquiryType {
   /// API に送るコード値
   pub fn code(self) -> &'static str {
      match self {
         Self::Checkup => "0",
      }
   }
}

/// 照会期間（年）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
   pub start_date: String,
   pub end_date:   String,
}

impl DateRange {
   /// 前年から今年まで
   pub fn default_for(now: DateTime<Utc>) -> Self {
      let year = now.year();
      Self {
         start_date: (year - 1).to_string(),
         end_date:   year.to_string(),
      }
   }
}

/// 照会フォームの入力
#[derive(Debug, Clone, Default)]
pub struct VerificationForm {
   pub birthdate:  String,
   pub phone_no:   String,
   pub start_date: Option<String>,
   pub end_date:   Option<String>,
}

/// 照会リクエスト
///
/// フォーム送信時に作られ、以後は変更されない。
/// 二段階目の送信でも同じ内容を使う。
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationRequest {
   id:           RequestId,
   subject_name: DisplayName,
   birthdate:    String,
   phone_no:     String,
   date_range:   DateRange,
   inquiry_type: InquiryType,
}

impl VerificationRequest {
   /// フォーム入力から照会リクエストを作る
   ///
   /// 生年月日と電話番号はどちらも必須（空白だけの値も未入力とみなす）。
   /// 入力値は加工せずに外部 API へ送る。照会期間は未指定なら前年〜今年。
   pub fn new(
      id: RequestId,
      subject_name: DisplayName,
      form: VerificationForm,
      now: DateTime<Utc>,
   ) -> Result<Self, DomainError> {
      if form.birthdate.trim().is_empty() || form.phone_no.trim().is_empty() {
         return Err(DomainError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
      }

      let defaults = DateRange::default_for(now);
      let date_range = DateRange {
         start_date: non_empty(form.start_date).unwrap_or(defaults.start_date),
         end_date:   non_empty(form.end_date).unwrap_or(defaults.end_date),
      };

      Ok(Self {
         id,
         subject_name,
         birthdate: form.birthdate,
         phone_no: form.phone_no,
         date_range,
         inquiry_type: InquiryType::Checkup,
      })
   }

   pub fn id(&self) -> &RequestId {
      &self.id
   }

   pub fn subject_name(&self) -> &DisplayName {
      &self.subject_name
   }

   pub fn birthdate(&self) -> &str {
      &self.birthdate
   }

   pub fn phone_no(&self) -> &str {
      &self.phone_no
   }

   pub fn date_range(&self) -> &DateRange {
      &self.date_range
   }

   pub fn inquiry_type(&self) -> InquiryType {
      self.inquiry_type
   }
}

impl fmt::Debug for VerificationRequest {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("VerificationRequest")
         .field("id", &self.id)
         .field("subject_name", &self.subject_name)
         .field("birthdate", &crate::REDACTED)
         .field("phone_no", &crate::REDACTED)
         .field("date_range", &self.date_range)
         .field("inquiry_type", &self.inquiry_type)
         .finish()
   }
}

fn non_empty(value: Option<String>) -> Option<String> {
   value
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty())
}

/// 本人確認のチャレンジ情報
///
/// 一段階目の応答で受け取り、二段階目の送信でそのまま返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDescriptor {
   pub transaction_id:      String,
   pub job_index:           i64,
   pub thread_index:        i64,
   #[serde(rename = "multiFactorTimestamp")]
   pub challenge_timestamp: i64,
}

// =========================================================================
// 失敗
// =========================================================================

/// 失敗したフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowPhase {
   /// 一段階目（照会リクエスト）
   Request,
   /// 二段階目（本人確認後の結果取得）
   Completion,
}

/// 失敗の原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureCause {
   /// API が成功以外のステータスを返した、または応答が使えなかった
   Rejected,
   /// 通信自体が失敗した
   Transport,
   /// 本人確認待ちの期限切れ
   Expired,
}

/// 照会の失敗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowFailure {
   pub phase:       FlowPhase,
   pub cause:       FailureCause,
   pub occurred_at: DateTime<Utc>,
}

impl FlowFailure {
   /// 利用者に表示する文言
   pub fn message(&self) -> &'static str {
      match (self.phase, self.cause) {
         (_, FailureCause::Expired) => "인증 대기 시간이 만료되었습니다. 다시 조회해주세요.",
         (FlowPhase::Request, FailureCause::Rejected) => {
            "조회 요청에 실패했습니다. 다시 시도해주세요."
         }
         (FlowPhase::Request, FailureCause::Transport) => {
            "네트워크 오류가 발생했습니다. 다시 시도해주세요."
         }
         (FlowPhase::Completion, FailureCause::Rejected) => "건강검진 결과 조회에 실패했습니다.",
         (FlowPhase::Completion, FailureCause::Transport) => "네트워크 오류가 발생했습니다.",
      }
   }
}

// =========================================================================
// 状態
// =========================================================================

/// 照会フローのステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
   Idle,
   Requesting,
   AwaitingUserVerification,
   Completing,
   Resolved,
}

impl VerificationStatus {
   /// 外部 API 呼び出し中か
   pub fn is_in_flight(self) -> bool {
      matches!(self, Self::Requesting | Self::Completing)
   }
}

/// 照会フローの状態（ADT ベースステートマシン）
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
   /// 照会前、または失敗・取り消し後
   Idle(IdleState),
   /// 一段階目の応答待ち
   Requesting(RequestingState),
   /// 利用者の本人確認待ち
   AwaitingUserVerification(AwaitingState),
   /// 二段階目の応答待ち
   Completing(CompletingState),
   /// 健診データ取得済み
   Resolved(ResolvedState),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdleState {
   pub last_failure: Option<FlowFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestingState {
   pub request: VerificationRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AwaitingState {
   pub request:   VerificationRequest,
   pub challenge: ChallengeDescriptor,
   pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletingState {
   pub request:   VerificationRequest,
   pub challenge: ChallengeDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedState {
   pub data:        Box<HealthCheckupData>,
   pub resolved_at: DateTime<Utc>,
}

/// 照会フロー
///
/// セッションごとに 1 つ存在する。遷移メソッドは `self` を消費して次の状態を返す。
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationFlow {
   state:      VerificationState,
   updated_at: DateTime<Utc>,
}

impl VerificationFlow {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         state:      VerificationState::Idle(IdleState::default()),
         updated_at: now,
      }
   }

   pub fn state(&self) -> &VerificationState {
      &self.state
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }

   pub fn status(&self) -> VerificationStatus {
      match &self.state {
         VerificationState::Idle(_) => VerificationStatus::Idle,
         VerificationState::Requesting(_) => VerificationStatus::Requesting,
         VerificationState::AwaitingUserVerification(_) => {
            VerificationStatus::AwaitingUserVerification
         }
         VerificationState::Completing(_) => VerificationStatus::Completing,
         VerificationState::Resolved(_) => VerificationStatus::Resolved,
      }
   }

   /// 直前の失敗（`Idle` のときのみ）
   pub fn last_failure(&self) -> Option<&FlowFailure> {
      match &self.state {
         VerificationState::Idle(idle) => idle.last_failure.as_ref(),
         _ => None,
      }
   }

   /// 進行中の照会リクエスト
   pub fn request(&self) -> Option<&VerificationRequest> {
      match &self.state {
         VerificationState::Requesting(s) => Some(&s.request),
         VerificationState::AwaitingUserVerification(s) => Some(&s.request),
         VerificationState::Completing(s) => Some(&s.request),
         VerificationState::Idle(_) | VerificationState::Resolved(_) => None,
      }
   }

   /// 保持しているチャレンジ情報
   pub fn challenge(&self) -> Option<&ChallengeDescriptor> {
      match &self.state {
         VerificationState::AwaitingUserVerification(s) => Some(&s.challenge),
         VerificationState::Completing(s) => Some(&s.challenge),
         _ => None,
      }
   }

   /// 取得済みの健診データ
   pub fn data(&self) -> Option<&HealthCheckupData> {
      match &self.state {
         VerificationState::Resolved(s) => Some(&s.data),
         _ => None,
      }
   }

   fn with_state(self, state: VerificationState, now: DateTime<Utc>) -> Self {
      Self {
         state,
         updated_at: now,
      }
   }

   fn idle(self, last_failure: Option<FlowFailure>, now: DateTime<Utc>) -> Self {
      self.with_state(VerificationState::Idle(IdleState { last_failure }), now)
   }

   /// 照会フォームを送信する（→ Requesting）
   ///
   /// `Idle` と `Resolved`（新しい照会）から遷移できる。
   pub fn submitted(
      self,
      request: VerificationRequest,
      now: DateTime<Utc>,
   ) -> Result<Self, DomainError> {
      match self.state {
         VerificationState::Idle(_) | VerificationState::Resolved(_) => Ok(self.with_state(
            VerificationState::Requesting(RequestingState { request }),
            now,
         )),
         VerificationState::AwaitingUserVerification(_) => {
            Err(DomainError::Conflict(AWAITING_MESSAGE.to_string()))
         }
         VerificationState::Requesting(_) | VerificationState::Completing(_) => {
            Err(DomainError::Conflict(IN_FLIGHT_MESSAGE.to_string()))
         }
      }
   }

   /// 一段階目が成功しチャレンジ情報を受け取った（→ AwaitingUserVerification）
   pub fn challenge_issued(
      self,
      challenge: ChallengeDescriptor,
      now: DateTime<Utc>,
   ) -> Result<Self, DomainError> {
      match self.state {
         VerificationState::Requesting(requesting) => Ok(Self {
            state:      VerificationState::AwaitingUserVerification(AwaitingState {
               request: requesting.request,
               challenge,
               issued_at: now,
            }),
            updated_at: now,
         }),
         _ => Err(unexpected_state("challenge_issued", self.status())),
      }
   }

   /// 一段階目が失敗した（→ Idle）
   pub fn request_failed(self, cause: FailureCause, now: DateTime<Utc>) -> Result<Self, DomainError> {
      match self.state {
         VerificationState::Requesting(_) => Ok(self.idle(
            Some(FlowFailure {
               phase: FlowPhase::Request,
               cause,
               occurred_at: now,
            }),
            now,
         )),
         _ => Err(unexpected_state("request_failed", self.status())),
      }
   }

   /// 利用者が本人確認の完了を申告した（→ Completing）
   ///
   /// `verification_ttl` が指定されていて、チャレンジ発行から期限を過ぎている場合は
   /// 期限切れの失敗を保持した `Idle` を返す。呼び出し側は
   /// [`last_failure`](Self::last_failure) で判別する。
   pub fn completion_started(
      self,
      now: DateTime<Utc>,
      verification_ttl: Option<Duration>,
   ) -> Result<Self, DomainError> {
      match self.state {
         VerificationState::AwaitingUserVerification(awaiting) => {
            if is_expired(awaiting.issued_at, now, verification_ttl) {
               return Ok(Self {
                  state:      VerificationState::Idle(IdleState {
                     last_failure: Some(FlowFailure {
                        phase:       FlowPhase::Completion,
                        cause:       FailureCause::Expired,
                        occurred_at: now,
                     }),
                  }),
                  updated_at: now,
               });
            }
            Ok(Self {
               state:      VerificationState::Completing(CompletingState {
                  request:   awaiting.request,
                  challenge: awaiting.challenge,
               }),
               updated_at: now,
            })
         }
         VerificationState::Requesting(_) | VerificationState::Completing(_) => {
            Err(DomainError::Conflict(IN_FLIGHT_MESSAGE.to_string()))
         }
         VerificationState::Idle(_) | VerificationState::Resolved(_) => {
            Err(DomainError::Conflict(NO_CHALLENGE_MESSAGE.to_string()))
         }
      }
   }

   /// 二段階目が成功し健診データを受け取った（→ Resolved）
   pub fn resolved(self, data: HealthCheckupData, now: DateTime<Utc>) -> Result<Self, DomainError> {
      match self.state {
         VerificationState::Completing(_) => Ok(self.with_state(
            VerificationState::Resolved(ResolvedState {
               data:        Box::new(data),
               resolved_at: now,
            }),
            now,
         )),
         _ => Err(unexpected_state("resolved", self.status())),
      }
   }

   /// 二段階目が失敗した（→ Idle、チャレンジ情報は破棄）
   pub fn completion_failed(
      self,
      cause: FailureCause,
      now: DateTime<Utc>,
   ) -> Result<Self, DomainError> {
      match self.state {
         VerificationState::Completing(_) => Ok(self.idle(
            Some(FlowFailure {
               phase: FlowPhase::Completion,
               cause,
               occurred_at: now,
            }),
            now,
         )),
         _ => Err(unexpected_state("completion_failed", self.status())),
      }
   }

   /// 照会を取り消して最初に戻る（→ Idle）
   ///
   /// 外部 API 呼び出し中は取り消せない。
   pub fn cancelled(self, now: DateTime<Utc>) -> Result<Self, DomainError> {
      match self.state {
         VerificationState::Idle(_)
         | VerificationState::AwaitingUserVerification(_)
         | VerificationState::Resolved(_) => Ok(self.idle(None, now)),
         VerificationState::Requesting(_) | VerificationState::Completing(_) => {
            Err(DomainError::Conflict(IN_FLIGHT_MESSAGE.to_string()))
         }
      }
   }
}

fn is_expired(issued_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
   let Some(ttl) = ttl else {
      return false;
   };
   // 範囲外の TTL は無期限とみなす
   chrono::Duration::from_std(ttl).is_ok_and(|ttl| now - issued_at > ttl)
}

fn unexpected_state(transition: &str, status: VerificationStatus) -> DomainError {
   DomainError::Conflict(format!("{transition} は {status} 状態では実行できません"))
}
