//! セッション参照ハンドラ（me）

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use checkup_shared::{ApiResponse, ErrorResponse};

use super::{AuthState, MeResponseData};
use crate::error::authenticate;

/// GET /api/v1/auth/me
///
/// 現在のユーザー情報を取得する。
#[utoipa::path(
   get,
   path = "/api/v1/auth/me",
   tag = "auth",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "ユーザー情報", body = ApiResponse<MeResponseData>),
      (status = 401, description = "未認証", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn me(State(state): State<Arc<AuthState>>, jar: CookieJar) -> impl IntoResponse {
   match authenticate(state.session_manager.as_ref(), &jar).await {
      Ok((_, session)) => {
         let response = ApiResponse::new(MeResponseData::from(&session));
         (StatusCode::OK, Json(response)).into_response()
      }
      Err(response) => response,
   }
}
