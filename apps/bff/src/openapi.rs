//! # OpenAPI 仕様定義
//!
//! utoipa を使用して BFF の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use utoipa::{
   Modify,
   OpenApi,
   openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::handler::{auth, checkup, health};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "Checkup API",
      version = "0.1.0",
      description = "国民健康保険の健診結果照会画面向け BFF API"
   ),
   paths(
      // health
      health::health_check,
      // auth
      auth::login,
      auth::logout,
      auth::me,
      // checkup
      checkup::get_verification,
      checkup::submit_verification,
      checkup::complete_verification,
      checkup::cancel_verification,
      checkup::get_summary,
      checkup::get_history,
   ),
   components(schemas(
      checkup_shared::ErrorResponse,
   )),
   tags(
      (name = "health", description = "ヘルスチェック"),
      (name = "auth", description = "認証"),
      (name = "checkup", description = "健診照会"),
   ),
   modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// セキュリティスキーム定義
///
/// Cookie ベースのセッション認証を追加する。
struct SecurityAddon;

impl Modify for SecurityAddon {
   fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
      let components = openapi.components.get_or_insert_default();
      components.add_security_scheme(
         "session_auth",
         SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_id"))),
      );
   }
}
