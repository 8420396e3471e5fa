//! # キャッシュ制御ミドルウェア
//!
//! 健診結果や照会状態がブラウザにキャッシュされないよう、
//! `Cache-Control: no-store` を全レスポンスに設定する。

use axum::{
   extract::Request,
   http::{HeaderValue, header},
   middleware::Next,
   response::Response,
};

/// API レスポンスに `Cache-Control: no-store` を付与する
pub async fn no_cache(request: Request, next: Next) -> Response {
   let mut response = next.run(request).await;
   response
      .headers_mut()
      .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
   response
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      body::Body,
      http::{Request, StatusCode},
      middleware::from_fn,
      routing::get,
   };
   use tower::ServiceExt;

   use super::*;

   #[tokio::test]
   async fn test_エラーレスポンスにもno_storeを付与する() {
      // Given
      let sut = Router::new()
         .route("/ok", get(|| async { "ok" }))
         .route("/error", get(|| async { StatusCode::CONFLICT }))
         .layer(from_fn(no_cache));

      for uri in ["/ok", "/error"] {
         // When
         let response = sut
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

         // Then
         assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
         );
      }
   }
}
