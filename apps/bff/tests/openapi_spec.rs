//! # OpenAPI 仕様テスト
//!
//! utoipa から生成される OpenAPI 仕様の整合性を検証する。

use checkup_bff::openapi::ApiDoc;
use utoipa::OpenApi;

#[test]
fn test_openapi仕様がパニックせず生成される() {
   let doc = ApiDoc::openapi();
   let _yaml = doc.to_yaml().unwrap();
}

#[test]
fn test_全パスが含まれている() {
   let doc = ApiDoc::openapi();
   let paths: Vec<&str> = doc.paths.paths.keys().map(|k| k.as_str()).collect();

   // 10 ハンドラ、同一パスに複数メソッドがあるため 8 パス
   assert_eq!(paths.len(), 8, "パス数が 8 であること: {paths:?}");

   assert!(paths.contains(&"/health"));
   assert!(paths.contains(&"/api/v1/auth/login"));
   assert!(paths.contains(&"/api/v1/auth/logout"));
   assert!(paths.contains(&"/api/v1/auth/me"));
   assert!(paths.contains(&"/api/v1/checkup/verification"));
   assert!(paths.contains(&"/api/v1/checkup/verification/complete"));
   assert!(paths.contains(&"/api/v1/checkup/summary"));
   assert!(paths.contains(&"/api/v1/checkup/history"));
}

#[test]
fn test_照会フローのパスは3メソッドを持つ() {
   let doc = ApiDoc::openapi();
   let item = doc
      .paths
      .paths
      .get("/api/v1/checkup/verification")
      .expect("照会フローのパスが存在すること");

   assert!(item.get.is_some());
   assert!(item.post.is_some());
   assert!(item.delete.is_some());
}

#[test]
fn test_session_authセキュリティスキームが含まれている() {
   let doc = ApiDoc::openapi();
   let components = doc.components.as_ref().expect("components が存在すること");
   assert!(
      components.security_schemes.contains_key("session_auth"),
      "session_auth セキュリティスキームが存在すること"
   );
}

#[test]
fn test_全タグが含まれている() {
   let doc = ApiDoc::openapi();
   let tags: Vec<&str> = doc
      .tags
      .as_ref()
      .expect("tags が存在すること")
      .iter()
      .map(|t| t.name.as_str())
      .collect();

   assert_eq!(tags, vec!["health", "auth", "checkup"]);
}

#[test]
fn test_problem_detailsスキーマが登録されている() {
   let doc = ApiDoc::openapi();
   let components = doc.components.as_ref().expect("components が存在すること");
   assert!(components.schemas.contains_key("ErrorResponse"));
}
