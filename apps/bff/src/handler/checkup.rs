//! # 健診照会ハンドラ
//!
//! 本人確認フローの操作と、取得した健診結果の表示用データを提供する。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 内容 |
//! |---------|------|------|
//! | GET | `/api/v1/checkup/verification` | 照会フローの状態 |
//! | POST | `/api/v1/checkup/verification` | 照会フォームの送信（一段階目） |
//! | POST | `/api/v1/checkup/verification/complete` | 本人確認の完了（二段階目） |
//! | DELETE | `/api/v1/checkup/verification` | 照会の取り消し |
//! | GET | `/api/v1/checkup/summary` | 最新健診の主要 6 指標 |
//! | GET | `/api/v1/checkup/history` | 全健診の履歴 |
//!
//! すべてセッション必須。照会フローはセッションごとに 1 つ。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use checkup_domain::{
   summary::{CheckupHistory, CheckupSummary, HistoryEntry, HistoryGroup, MetricSummary},
   verification::{DateRange, FlowFailure, VerificationFlow, VerificationForm, VerificationState},
};
use checkup_infra::SessionManager;
use checkup_shared::{ApiResponse, ErrorResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::authenticate, usecase::CheckupUseCase};

/// 健診照会ハンドラの共有状態
pub struct CheckupState {
   pub usecase:         Arc<CheckupUseCase>,
   pub session_manager: Arc<dyn SessionManager>,
}

// --- リクエスト型 ---

/// 照会フォーム
///
/// 生年月日と電話番号は必須。期間を省略すると前年から今年までを照会する。
#[derive(Deserialize, ToSchema)]
pub struct VerificationRequestBody {
   /// 生年月日（`YYYYMMDD`）
   #[serde(default)]
   pub birthdate:  String,
   /// 携帯電話番号
   #[serde(default)]
   pub phone_no:   String,
   /// 照会開始年（`YYYY`）
   #[serde(default)]
   pub start_date: Option<String>,
   /// 照会終了年（`YYYY`）
   #[serde(default)]
   pub end_date:   Option<String>,
}

impl From<VerificationRequestBody> for VerificationForm {
   fn from(body: VerificationRequestBody) -> Self {
      Self {
         birthdate:  body.birthdate,
         phone_no:   body.phone_no,
         start_date: body.start_date,
         end_date:   body.end_date,
      }
   }
}

// --- レスポンス型 ---

/// 照会期間
#[derive(Debug, Serialize, ToSchema)]
pub struct DateRangeData {
   pub start_date: String,
   pub end_date:   String,
}

impl From<DateRange> for DateRangeData {
   fn from(range: DateRange) -> Self {
      Self {
         start_date: range.start_date,
         end_date:   range.end_date,
      }
   }
}

/// 直前の失敗
#[derive(Debug, Serialize, ToSchema)]
pub struct FailureData {
   /// `request` / `completion`
   pub phase:       String,
   /// `rejected` / `transport` / `expired`
   pub cause:       String,
   /// 利用者に表示する文言
   pub message:     String,
   pub occurred_at: DateTime<Utc>,
}

impl From<&FlowFailure> for FailureData {
   fn from(failure: &FlowFailure) -> Self {
      Self {
         phase:       failure.phase.to_string(),
         cause:       failure.cause.to_string(),
         message:     failure.message().to_string(),
         occurred_at: failure.occurred_at,
      }
   }
}

/// 照会フローの状態
#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationData {
   /// `idle` / `requesting` / `awaiting_user_verification` / `completing` / `resolved`
   pub status:             String,
   /// 照会中のリクエスト ID
   pub request_id:         Option<String>,
   /// 本人確認待ちになった時刻
   pub awaiting_since:     Option<DateTime<Utc>>,
   /// 健診結果を取得済みか
   pub has_result:         bool,
   pub last_failure:       Option<FailureData>,
   /// フォームの期間の既定値
   pub default_date_range: DateRangeData,
   pub updated_at:         DateTime<Utc>,
}

impl VerificationData {
   fn new(flow: &VerificationFlow, default_date_range: DateRange) -> Self {
      let awaiting_since = match flow.state() {
         VerificationState::AwaitingUserVerification(awaiting) => Some(awaiting.issued_at),
         _ => None,
      };

      Self {
         status: flow.status().to_string(),
         request_id: flow.request().map(|r| r.id().to_string()),
         awaiting_since,
         has_result: flow.data().is_some(),
         last_failure: flow.last_failure().map(FailureData::from),
         default_date_range: default_date_range.into(),
         updated_at: flow.updated_at(),
      }
   }

   fn from_flow(flow: &VerificationFlow) -> Self {
      Self::new(flow, DateRange::default_for(flow.updated_at()))
   }
}

/// 1 指標の表示データ
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricData {
   /// API の項目キー（`BMI`、`bloodPressure` など）
   pub key:           String,
   pub label:         String,
   pub unit:          String,
   /// 測定値の原文
   pub value:         String,
   /// グラフ用の数値（血圧は収縮期）
   pub chart_value:   Option<f64>,
   pub normal_range:  String,
   pub caution_range: String,
   /// `normal` / `caution` / `danger` / `unknown`
   pub status:        String,
   pub status_label:  String,
   /// CSS カラーコード
   pub color:         String,
}

impl From<&MetricSummary> for MetricData {
   fn from(metric: &MetricSummary) -> Self {
      Self {
         key:           metric.field.key().to_string(),
         label:         metric.field.label().to_string(),
         unit:          metric.field.unit().to_string(),
         value:         metric.value.clone(),
         chart_value:   metric.chart_value,
         normal_range:  metric.normal_range.clone(),
         caution_range: metric.caution_range.clone(),
         status:        metric.status.to_string(),
         status_label:  metric.label().to_string(),
         color:         metric.color().hex().to_string(),
      }
   }
}

/// 最新健診のサマリー
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryData {
   pub patient_name:      String,
   pub checkup_date:      String,
   pub evaluation:        String,
   pub organization_name: String,
   pub metrics:           Vec<MetricData>,
}

impl From<CheckupSummary> for SummaryData {
   fn from(summary: CheckupSummary) -> Self {
      Self {
         metrics:           summary.metrics.iter().map(MetricData::from).collect(),
         patient_name:      summary.patient_name,
         checkup_date:      summary.checkup_date,
         evaluation:        summary.evaluation,
         organization_name: summary.organization_name,
      }
   }
}

/// 履歴の 1 区分
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryGroupData {
   /// `body` / `blood` / `other`
   pub key:     String,
   pub label:   String,
   pub metrics: Vec<MetricData>,
}

impl From<&HistoryGroup> for HistoryGroupData {
   fn from(group: &HistoryGroup) -> Self {
      Self {
         key:     group.group.key().to_string(),
         label:   group.group.label().to_string(),
         metrics: group.metrics.iter().map(MetricData::from).collect(),
      }
   }
}

/// 健診 1 回分
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryData {
   pub checkup_date:      String,
   pub evaluation:        String,
   pub organization_name: String,
   pub is_latest:         bool,
   pub groups:            Vec<HistoryGroupData>,
}

impl From<&HistoryEntry> for HistoryEntryData {
   fn from(entry: &HistoryEntry) -> Self {
      Self {
         checkup_date:      entry.checkup_date.clone(),
         evaluation:        entry.evaluation.clone(),
         organization_name: entry.organization_name.clone(),
         is_latest:         entry.is_latest,
         groups:            entry.groups.iter().map(HistoryGroupData::from).collect(),
      }
   }
}

/// 健診履歴
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryData {
   pub patient_name: String,
   pub entries:      Vec<HistoryEntryData>,
}

impl From<CheckupHistory> for HistoryData {
   fn from(history: CheckupHistory) -> Self {
      Self {
         entries:      history.entries.iter().map(HistoryEntryData::from).collect(),
         patient_name: history.patient_name,
      }
   }
}

// --- ハンドラ ---

/// GET /api/v1/checkup/verification
///
/// 照会フローの状態と、フォームの期間の既定値を取得する。
#[utoipa::path(
   get,
   path = "/api/v1/checkup/verification",
   tag = "checkup",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "照会フローの状態", body = ApiResponse<VerificationData>),
      (status = 401, description = "未認証", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_verification(
   State(state): State<Arc<CheckupState>>,
   jar: CookieJar,
) -> impl IntoResponse {
   let (session_id, _) = match authenticate(state.session_manager.as_ref(), &jar).await {
      Ok(session) => session,
      Err(response) => return response,
   };

   match state.usecase.status(&session_id).await {
      Ok(snapshot) => {
         let data = VerificationData::new(&snapshot.flow, snapshot.default_date_range);
         (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
      }
      Err(e) => e.into_response(),
   }
}

/// POST /api/v1/checkup/verification
///
/// 照会フォームを送信する。成功すると本人確認待ちになり、
/// 利用者は本人確認アプリで認証してから完了を申告する。
#[utoipa::path(
   post,
   path = "/api/v1/checkup/verification",
   tag = "checkup",
   security(("session_auth" = [])),
   request_body = VerificationRequestBody,
   responses(
      (status = 200, description = "本人確認待ち", body = ApiResponse<VerificationData>),
      (status = 400, description = "生年月日または電話番号が空", body = ErrorResponse),
      (status = 401, description = "未認証", body = ErrorResponse),
      (status = 409, description = "照会中、または本人確認待ち", body = ErrorResponse),
      (status = 502, description = "健診照会 API が照会を拒否", body = ErrorResponse),
      (status = 503, description = "健診照会 API と通信不可", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn submit_verification(
   State(state): State<Arc<CheckupState>>,
   jar: CookieJar,
   Json(req): Json<VerificationRequestBody>,
) -> impl IntoResponse {
   let (session_id, session) = match authenticate(state.session_manager.as_ref(), &jar).await {
      Ok(session) => session,
      Err(response) => return response,
   };

   match state
      .usecase
      .submit(&session_id, &session.user(), req.into())
      .await
   {
      Ok(flow) => {
         let data = VerificationData::from_flow(&flow);
         (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
      }
      Err(e) => e.into_response(),
   }
}

/// POST /api/v1/checkup/verification/complete
///
/// 本人確認の完了を申告し、健診データを取得する。
/// 失敗した場合はフォームから入力し直す必要がある。
#[utoipa::path(
   post,
   path = "/api/v1/checkup/verification/complete",
   tag = "checkup",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "健診データ取得済み", body = ApiResponse<VerificationData>),
      (status = 401, description = "未認証", body = ErrorResponse),
      (status = 409, description = "本人確認待ちでない、または期限切れ", body = ErrorResponse),
      (status = 502, description = "健診照会 API が照会を拒否", body = ErrorResponse),
      (status = 503, description = "健診照会 API と通信不可", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn complete_verification(
   State(state): State<Arc<CheckupState>>,
   jar: CookieJar,
) -> impl IntoResponse {
   let (session_id, _) = match authenticate(state.session_manager.as_ref(), &jar).await {
      Ok(session) => session,
      Err(response) => return response,
   };

   match state.usecase.complete(&session_id).await {
      Ok(flow) => {
         let data = VerificationData::from_flow(&flow);
         (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
      }
      Err(e) => e.into_response(),
   }
}

/// DELETE /api/v1/checkup/verification
///
/// 本人確認待ち、または取得済みの結果を破棄して最初に戻る。
#[utoipa::path(
   delete,
   path = "/api/v1/checkup/verification",
   tag = "checkup",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "取り消し後の状態", body = ApiResponse<VerificationData>),
      (status = 401, description = "未認証", body = ErrorResponse),
      (status = 409, description = "照会中", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_verification(
   State(state): State<Arc<CheckupState>>,
   jar: CookieJar,
) -> impl IntoResponse {
   let (session_id, _) = match authenticate(state.session_manager.as_ref(), &jar).await {
      Ok(session) => session,
      Err(response) => return response,
   };

   match state.usecase.cancel(&session_id).await {
      Ok(flow) => {
         let data = VerificationData::from_flow(&flow);
         (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
      }
      Err(e) => e.into_response(),
   }
}

/// GET /api/v1/checkup/summary
///
/// 最新健診（概要リストの末尾）の主要 6 指標を判定付きで返す。
#[utoipa::path(
   get,
   path = "/api/v1/checkup/summary",
   tag = "checkup",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "最新健診のサマリー", body = ApiResponse<SummaryData>),
      (status = 401, description = "未認証", body = ErrorResponse),
      (status = 404, description = "健診結果がない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_summary(
   State(state): State<Arc<CheckupState>>,
   jar: CookieJar,
) -> impl IntoResponse {
   let (session_id, _) = match authenticate(state.session_manager.as_ref(), &jar).await {
      Ok(session) => session,
      Err(response) => return response,
   };

   match state.usecase.summary(&session_id).await {
      Ok(summary) => {
         let data = SummaryData::from(summary);
         (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
      }
      Err(e) => e.into_response(),
   }
}

/// GET /api/v1/checkup/history
///
/// 全健診を API から届いた順に、区分ごとの測定値と合わせて返す。
#[utoipa::path(
   get,
   path = "/api/v1/checkup/history",
   tag = "checkup",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "健診履歴", body = ApiResponse<HistoryData>),
      (status = 401, description = "未認証", body = ErrorResponse),
      (status = 404, description = "健診結果がない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_history(
   State(state): State<Arc<CheckupState>>,
   jar: CookieJar,
) -> impl IntoResponse {
   let (session_id, _) = match authenticate(state.session_manager.as_ref(), &jar).await {
      Ok(session) => session,
      Err(response) => return response,
   };

   match state.usecase.history(&session_id).await {
      Ok(history) => {
         let data = HistoryData::from(history);
         (StatusCode::OK, Json(ApiResponse::new(data))).into_response()
      }
      Err(e) => e.into_response(),
   }
}
