//! # BFF アプリケーション構築
//!
//! DI（ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` は設定の読み込みとサーバー起動に集中する。
//! 結合テストも同じ関数でルーターを組み立てる。

use std::{sync::Arc, time::Duration};

use axum::{
   Router,
   middleware::from_fn,
   routing::{get, post},
};
use checkup_domain::clock::Clock;
use checkup_infra::{AuthProvider, SessionManager, VerificationFlowStore};
use checkup_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::{
   client::CheckupApiClient,
   handler::{
      AuthState,
      CheckupState,
      cancel_verification,
      complete_verification,
      get_history,
      get_summary,
      get_verification,
      health_check,
      login,
      logout,
      me,
      submit_verification,
   },
   middleware::no_cache,
   usecase::CheckupUseCase,
};

/// ルーター構築に必要な依存
pub struct AppDependencies {
   pub auth_provider:    Arc<dyn AuthProvider>,
   pub session_manager:  Arc<dyn SessionManager>,
   pub checkup_client:   Arc<dyn CheckupApiClient>,
   pub flow_store:       Arc<dyn VerificationFlowStore>,
   pub clock:            Arc<dyn Clock>,
   /// 本人確認待ちの有効期限（`None` なら無期限）
   pub verification_ttl: Option<Duration>,
}

/// DI コンテナの構築とルーター定義を行う
///
/// 依存を受け取り、ユースケース → State → Router の順に組み立てる。
pub fn build_app(deps: AppDependencies) -> Router {
   let checkup_usecase = Arc::new(CheckupUseCase::new(
      deps.checkup_client,
      deps.flow_store,
      deps.clock.clone(),
      deps.verification_ttl,
   ));

   // ログアウトで照会フローも破棄するため、AuthState もユースケースを持つ
   let auth_state = Arc::new(AuthState {
      auth_provider:   deps.auth_provider,
      session_manager: deps.session_manager.clone(),
      checkup_usecase: checkup_usecase.clone(),
      clock:           deps.clock,
   });

   let checkup_state = Arc::new(CheckupState {
      usecase:         checkup_usecase,
      session_manager: deps.session_manager,
   });

   // Request ID + TraceLayer により、すべての HTTP リクエストに request_id が付与されログに自動注入される
   Router::new()
      .route("/health", get(health_check))
      .route("/api/v1/auth/login", post(login))
      .route("/api/v1/auth/logout", post(logout))
      .route("/api/v1/auth/me", get(me))
      .with_state(auth_state)
      .route(
         "/api/v1/checkup/verification",
         get(get_verification)
            .post(submit_verification)
            .delete(cancel_verification),
      )
      .route(
         "/api/v1/checkup/verification/complete",
         post(complete_verification),
      )
      .route("/api/v1/checkup/summary", get(get_summary))
      .route("/api/v1/checkup/history", get(get_history))
      .with_state(checkup_state)
      .layer(from_fn(no_cache))
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
