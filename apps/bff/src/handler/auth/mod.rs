//! # 認証ハンドラ
//!
//! BFF の認証エンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/v1/auth/login` - ログイン
//! - `POST /api/v1/auth/logout` - ログアウト
//! - `GET /api/v1/auth/me` - 現在のユーザー情報を取得
//!
//! 資格情報の照合は [`AuthProvider`] に委譲する。
//! 既定の実装は固定アカウント表を持つ [`checkup_infra::InMemoryAuthProvider`]。

mod login;
mod session;

use std::sync::Arc;

use checkup_domain::clock::Clock;
use checkup_infra::{AuthProvider, SessionData, SessionManager};
pub use login::*;
use serde::{Deserialize, Serialize};
pub use session::*;
use utoipa::ToSchema;

use crate::{error::SESSION_COOKIE_NAME, usecase::CheckupUseCase};

/// 認証ハンドラの共有状態
pub struct AuthState {
   pub auth_provider:   Arc<dyn AuthProvider>,
   pub session_manager: Arc<dyn SessionManager>,
   /// ログアウト時に照会フローを破棄する
   pub checkup_usecase: Arc<CheckupUseCase>,
   pub clock:           Arc<dyn Clock>,
}

// --- リクエスト/レスポンス型 ---

/// ログインリクエスト
///
/// 欠けた項目は空文字列として扱い、バリデーションで弾く。
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
   #[serde(default)]
   pub username: String,
   #[serde(default)]
   pub password: String,
}

/// ログインレスポンスデータ
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponseData {
   pub user: LoginUserResponse,
}

/// ログインユーザー情報
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginUserResponse {
   pub username: String,
   pub name:     String,
}

/// 現在のユーザー情報データ
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponseData {
   pub username:      String,
   pub name:          String,
   pub authenticated: bool,
}

impl From<&SessionData> for MeResponseData {
   fn from(session: &SessionData) -> Self {
      Self {
         username:      session.username().as_str().to_string(),
         name:          session.display_name().as_str().to_string(),
         authenticated: true,
      }
   }
}

// --- 共有定数 ---

/// セッション有効期限（秒）
const SESSION_MAX_AGE: i64 = checkup_infra::session::SESSION_TTL_SECONDS;

// --- Cookie ヘルパー ---

/// セッション Cookie を構築する
fn build_session_cookie(session_id: &str) -> axum_extra::extract::cookie::Cookie<'static> {
   use axum_extra::extract::cookie::SameSite;

   // ENV=production の場合は HTTPS 必須
   let is_production = std::env::var("ENV").unwrap_or_default() == "production";

   let mut builder =
      axum_extra::extract::cookie::Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
         .path("/")
         .max_age(time::Duration::seconds(SESSION_MAX_AGE))
         .http_only(true)
         .same_site(SameSite::Lax);

   if is_production {
      builder = builder.secure(true);
   }

   builder.build()
}

/// Cookie をクリアするための Cookie を構築する
fn build_clear_cookie() -> axum_extra::extract::cookie::Cookie<'static> {
   axum_extra::extract::cookie::Cookie::build((SESSION_COOKIE_NAME, ""))
      .path("/")
      .max_age(time::Duration::seconds(0))
      .http_only(true)
      .same_site(axum_extra::extract::cookie::SameSite::Lax)
      .build()
}

// --- テストユーティリティ ---
