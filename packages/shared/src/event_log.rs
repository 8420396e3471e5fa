//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用する。JSON 出力ではフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
/// - `event.actor_id`: 操作者（ユーザー名）
///
/// 生年月日・電話番号などの個人情報はフィールドに含めないこと。
#[macro_export]
macro_rules! log_business_event {
   ($($args:tt)*) => {
      ::tracing::info!(
         event.kind = "business_event",
         $($args)*
      )
   };
}

/// イベントフィールドの定数
pub mod event {
   /// イベントカテゴリ
   pub mod category {
      pub const AUTH: &str = "auth";
      pub const CHECKUP: &str = "checkup";
   }

   /// イベントアクション
   pub mod action {
      // 認証
      pub const LOGIN_SUCCESS: &str = "auth.login_success";
      pub const LOGIN_FAILURE: &str = "auth.login_failure";
      pub const LOGOUT: &str = "auth.logout";

      // 健診照会
      pub const CHECKUP_REQUESTED: &str = "checkup.requested";
      pub const CHALLENGE_ISSUED: &str = "checkup.challenge_issued";
      pub const CHECKUP_RESOLVED: &str = "checkup.resolved";
      pub const CHECKUP_FAILED: &str = "checkup.failed";
      pub const CHECKUP_CANCELLED: &str = "checkup.cancelled";
      pub const RESPONSE_DISCARDED: &str = "checkup.response_discarded";
   }

   /// エンティティ種別
   pub mod entity_type {
      pub const USER: &str = "user";
      pub const SESSION: &str = "session";
      pub const CHECKUP_REQUEST: &str = "checkup_request";
   }

   /// イベント結果
   pub mod result {
      pub const SUCCESS: &str = "success";
      pub const FAILURE: &str = "failure";
   }
}

/// エラーコンテキストフィールドの定数
pub mod error {
   /// エラーカテゴリ
   pub mod category {
      /// インフラストラクチャ（セッションストア、照会状態ストア）
      pub const INFRASTRUCTURE: &str = "infrastructure";
      /// 外部サービス呼び出し（健診 API）
      pub const EXTERNAL_SERVICE: &str = "external_service";
   }

   /// エラー種別
   pub mod kind {
      pub const SESSION: &str = "session";
      pub const INTERNAL: &str = "internal";
      pub const CREDENTIAL_LOOKUP: &str = "credential_lookup";
      pub const VERIFICATION_STORE: &str = "verification_store";
      pub const SERVICE_COMMUNICATION: &str = "service_communication";
   }
}
