//! # BFF エラーハンドリング
//!
//! HTTP API のエラーレスポンスと、axum レスポンスへの変換。
//!
//! BFF の各ハンドラが共通で使うヘルパー関数を集約する。
//!
//! | エラー | ステータス | `type` の末尾 |
//! |--------|-----------|---------------|
//! | 入力エラー | 400 | `validation-error` |
//! | 未認証 | 401 | `unauthorized` |
//! | 結果なし | 404 | `not-found` |
//! | 状態の競合・期限切れ | 409 | `conflict` |
//! | 外部 API の拒否 | 502 | `checkup-request-rejected` |
//! | 外部 API と通信不可 | 503 | `checkup-api-unavailable` |

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use checkup_infra::{SessionData, SessionManager};
use checkup_shared::{ErrorResponse, event_log::error};

use crate::usecase::CheckupUseCaseError;

/// Cookie 名
pub(crate) const SESSION_COOKIE_NAME: &str = "session_id";

// --- 共通ヘルパー関数 ---

/// セッション認証を行う
///
/// Cookie のセッション ID でセッションを引き、ID とセッションデータを返す。
/// Cookie が無い、またはセッションが無効なら 401 レスポンスを返す。
pub async fn authenticate(
   session_manager: &dyn SessionManager,
   jar: &CookieJar,
) -> Result<(String, SessionData), Response> {
   let session_id = jar
      .get(SESSION_COOKIE_NAME)
      .map(|cookie| cookie.value().to_string())
      .ok_or_else(unauthorized_response)?;

   match session_manager.get(&session_id).await {
      Ok(Some(data)) => Ok((session_id, data)),
      Ok(None) => Err(unauthorized_response()),
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::SESSION,
            "セッション取得で内部エラー: {}",
            e
         );
         Err(internal_error_response())
      }
   }
}

// --- IntoResponse for CheckupUseCaseError ---

impl IntoResponse for CheckupUseCaseError {
   fn into_response(self) -> Response {
      match self {
         CheckupUseCaseError::Validation(ref detail) => validation_error_response(detail),
         CheckupUseCaseError::Conflict(ref detail) => conflict_response(detail),
         CheckupUseCaseError::NotFound(ref detail) => not_found_response(detail),
         CheckupUseCaseError::Expired(failure) => conflict_response(failure.message()),
         CheckupUseCaseError::Rejected { failure, source } => {
            tracing::warn!(
               phase = %failure.phase,
               "健診照会 API が照会を受け付けませんでした: {}",
               source
            );
            checkup_rejected_response(failure.message())
         }
         CheckupUseCaseError::Unavailable { failure, source } => {
            tracing::error!(
               error.category = error::category::EXTERNAL_SERVICE,
               error.kind = error::kind::SERVICE_COMMUNICATION,
               phase = %failure.phase,
               "健診照会 API との通信に失敗: {}",
               source
            );
            checkup_unavailable_response(failure.message())
         }
         CheckupUseCaseError::Internal(e) => {
            tracing::error!(
               error.category = error::category::INFRASTRUCTURE,
               error.kind = error::kind::VERIFICATION_STORE,
               "照会状態ストアで内部エラー: {}",
               e
            );
            internal_error_response()
         }
      }
   }
}

// --- レスポンスヘルパー ---

/// 未認証レスポンス
pub fn unauthorized_response() -> Response {
   (
      StatusCode::UNAUTHORIZED,
      Json(ErrorResponse::unauthorized("로그인이 필요합니다.")),
   )
      .into_response()
}

/// 認証失敗レスポンス
pub fn authentication_failed_response(detail: &str) -> Response {
   (
      StatusCode::UNAUTHORIZED,
      Json(ErrorResponse::new(
         "authentication-failed",
         "Authentication Failed",
         401,
         detail,
      )),
   )
      .into_response()
}

/// 内部エラーレスポンス
pub fn internal_error_response() -> Response {
   (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(ErrorResponse::internal_error()),
   )
      .into_response()
}

/// バリデーションエラーレスポンス
pub fn validation_error_response(detail: &str) -> Response {
   (
      StatusCode::BAD_REQUEST,
      Json(ErrorResponse::validation_error(detail)),
   )
      .into_response()
}

/// 404 Not Found レスポンス
pub fn not_found_response(detail: &str) -> Response {
   (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(detail))).into_response()
}

/// 409 Conflict レスポンス
pub fn conflict_response(detail: &str) -> Response {
   (StatusCode::CONFLICT, Json(ErrorResponse::conflict(detail))).into_response()
}

/// 健診照会 API が照会を拒否した
pub fn checkup_rejected_response(detail: &str) -> Response {
   (
      StatusCode::BAD_GATEWAY,
      Json(ErrorResponse::new(
         "checkup-request-rejected",
         "Checkup Request Rejected",
         502,
         detail,
      )),
   )
      .into_response()
}

/// 健診照会 API と通信できない
pub fn checkup_unavailable_response(detail: &str) -> Response {
   (
      StatusCode::SERVICE_UNAVAILABLE,
      Json(ErrorResponse::new(
         "checkup-api-unavailable",
         "Checkup API Unavailable",
         503,
         detail,
      )),
   )
      .into_response()
}
