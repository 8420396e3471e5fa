//! ログイン・ログアウトハンドラ

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use checkup_domain::user::Username;
use checkup_infra::SessionData;
use checkup_shared::{
   ApiResponse,
   ErrorResponse,
   event_log::{error, event},
   log_business_event,
};

use super::{
   AuthState,
   LoginRequest,
   LoginResponseData,
   LoginUserResponse,
   build_clear_cookie,
   build_session_cookie,
};
use crate::error::{
   SESSION_COOKIE_NAME,
   authentication_failed_response,
   internal_error_response,
   validation_error_response,
};

/// ID またはパスワードが空のとき
const MISSING_CREDENTIALS_MESSAGE: &str = "아이디와 비밀번호를 입력해주세요.";
/// 資格情報が一致しないとき
const INVALID_CREDENTIALS_MESSAGE: &str = "아이디 또는 비밀번호가 올바르지 않습니다.";

/// POST /api/v1/auth/login
///
/// ログイン ID とパスワードでログインし、セッションを確立する。
///
/// ## 認証フロー
///
/// 1. どちらかが空なら 400（照合しない）
/// 2. [`AuthProvider`](checkup_infra::AuthProvider) で資格情報を照合
/// 3. セッションを作成し Cookie を設定
///
/// ## リクエストボディ
///
/// ```json
/// {
///   "username": "admin",
///   "password": "1234"
/// }
/// ```
#[utoipa::path(
   post,
   path = "/api/v1/auth/login",
   tag = "auth",
   request_body = LoginRequest,
   responses(
      (status = 200, description = "ログイン成功", body = ApiResponse<LoginResponseData>),
      (status = 400, description = "入力エラー", body = ErrorResponse),
      (status = 401, description = "認証失敗", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
   State(state): State<Arc<AuthState>>,
   jar: CookieJar,
   Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
   if req.username.trim().is_empty() || req.password.is_empty() {
      return validation_error_response(MISSING_CREDENTIALS_MESSAGE);
   }

   let Ok(username) = Username::new(req.username.as_str()) else {
      return authentication_failed_response(INVALID_CREDENTIALS_MESSAGE);
   };

   // Step 1: 資格情報を照合
   let user = match state
      .auth_provider
      .authenticate(&username, &req.password)
      .await
   {
      Ok(Some(user)) => user,
      Ok(None) => {
         log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::LOGIN_FAILURE,
            event.entity_type = event::entity_type::USER,
            event.entity_id = checkup_domain::REDACTED,
            event.result = event::result::FAILURE,
            event.reason = "credential_mismatch",
            "ログイン失敗: 資格情報の不一致"
         );
         return authentication_failed_response(INVALID_CREDENTIALS_MESSAGE);
      }
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::CREDENTIAL_LOOKUP,
            "資格情報の照合で内部エラー: {}",
            e
         );
         return internal_error_response();
      }
   };

   // Step 2: セッションを作成
   let session_data = SessionData::new(&user, state.clock.now());

   let session_id = match state.session_manager.create(&session_data).await {
      Ok(id) => id,
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::SESSION,
            "セッション作成に失敗: {}",
            e
         );
         return internal_error_response();
      }
   };

   // Cookie を設定
   let jar = jar.add(build_session_cookie(&session_id));

   let response = ApiResponse::new(LoginResponseData {
      user: LoginUserResponse {
         username: user.username().as_str().to_string(),
         name:     user.display_name().as_str().to_string(),
      },
   });

   log_business_event!(
      event.category = event::category::AUTH,
      event.action = event::action::LOGIN_SUCCESS,
      event.entity_type = event::entity_type::SESSION,
      event.entity_id = %session_id,
      event.actor_id = %user.username(),
      event.result = event::result::SUCCESS,
      "ログイン成功"
   );

   (jar, Json(response)).into_response()
}

/// POST /api/v1/auth/logout
///
/// セッションと照会フローを破棄してログアウトする。
/// 照会中の応答は、届いても反映されずに捨てられる。
#[utoipa::path(
   post,
   path = "/api/v1/auth/logout",
   tag = "auth",
   security(("session_auth" = [])),
   responses(
      (status = 204, description = "ログアウト成功")
   )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<Arc<AuthState>>, jar: CookieJar) -> impl IntoResponse {
   if let Some(session_cookie) = jar.get(SESSION_COOKIE_NAME) {
      let session_id = session_cookie.value();

      // 照会フローを破棄（エラーは無視）
      if let Err(e) = state.checkup_usecase.discard(session_id).await {
         tracing::warn!("照会フローの破棄に失敗（無視）: {}", e);
      }

      // セッションを削除（エラーは無視）
      if let Err(e) = state.session_manager.delete(session_id).await {
         tracing::warn!("セッション削除に失敗（無視）: {}", e);
      }

      log_business_event!(
         event.category = event::category::AUTH,
         event.action = event::action::LOGOUT,
         event.entity_type = event::entity_type::SESSION,
         event.entity_id = %session_id,
         event.result = event::result::SUCCESS,
         "ログアウト"
      );
   }

   // Cookie をクリア
   let jar = jar.add(build_clear_cookie());

   (jar, StatusCode::NO_CONTENT).into_response()
}
