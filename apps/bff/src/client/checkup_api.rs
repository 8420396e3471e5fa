//! # 健診照会 API クライアント
//!
//! 外部の健診照会 API（`POST /v1/nhis/checkup?response_type=candiy`）を呼び出す。
//! 同じエンドポイントを二段階で使う。
//!
//! 1. [`request_verification`](CheckupApiClient::request_verification): 照会を開始し、
//!    本人確認のチャレンジ情報を受け取る
//! 2. [`complete_verification`](CheckupApiClient::complete_verification): 本人確認後に
//!    チャレンジ情報を添えて再送し、健診データを受け取る
//!
//! ## 応答の判定
//!
//! HTTP ステータスに関わらず本文を `{ status, data }` として読む。
//!
//! | 応答 | 結果 |
//! |------|------|
//! | `status == "success"` かつ `data` を解釈できる | 成功 |
//! | それ以外の `status`、`data` 欠落、`data` の形が違う | [`CheckupApiError::Rejected`] |
//! | 接続失敗・タイムアウト・本文が JSON でない | [`CheckupApiError::Network`] |

mod error;
mod types;

use std::time::Duration;

use async_trait::async_trait;
use checkup_domain::{checkup::HealthCheckupData, verification::ChallengeDescriptor};
pub use error::CheckupApiError;
use serde::{Serialize, de::DeserializeOwned};
use types::CheckupEnvelope;
pub use types::{CheckupContinuation, CheckupInquiry};

/// 照会エンドポイントのパス
const CHECKUP_PATH: &str = "/v1/nhis/checkup?response_type=candiy";

/// API キーのヘッダー名
const API_KEY_HEADER: &str = "x-api-key";

/// 健診照会 API クライアントトレイト
#[async_trait]
pub trait CheckupApiClient: Send + Sync {
   /// 照会を開始し、本人確認のチャレンジ情報を受け取る
   async fn request_verification(
      &self,
      inquiry: &CheckupInquiry,
   ) -> Result<ChallengeDescriptor, CheckupApiError>;

   /// 本人確認後に照会を完了し、健診データを受け取る
   async fn complete_verification(
      &self,
      continuation: &CheckupContinuation,
   ) -> Result<HealthCheckupData, CheckupApiError>;
}

/// 健診照会 API クライアント実装
#[derive(Clone)]
pub struct CheckupApiClientImpl {
   endpoint: String,
   api_key:  String,
   client:   reqwest::Client,
}

impl CheckupApiClientImpl {
   /// 新しい CheckupApiClient を作成する
   ///
   /// # 引数
   ///
   /// - `base_url`: API のベース URL（例: `https://api.candiy.io`）
   /// - `api_key`: `x-api-key` ヘッダーに載せる値
   /// - `timeout`: 1 回の呼び出しの上限時間。`None` なら無制限
   pub fn new(
      base_url: &str,
      api_key: impl Into<String>,
      timeout: Option<Duration>,
   ) -> Result<Self, reqwest::Error> {
      let mut builder = reqwest::Client::builder();
      if let Some(timeout) = timeout {
         builder = builder.timeout(timeout);
      }

      Ok(Self {
         endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHECKUP_PATH),
         api_key:  api_key.into(),
         client:   builder.build()?,
      })
   }

   async fn post<B, T>(&self, body: &B) -> Result<T, CheckupApiError>
   where
      B: Serialize + Sync,
      T: DeserializeOwned,
   {
      let response = self
         .client
         .post(&self.endpoint)
         .header(API_KEY_HEADER, &self.api_key)
         .json(body)
         .send()
         .await?;

      parse_envelope(response).await
   }
}

#[async_trait]
impl CheckupApiClient for CheckupApiClientImpl {
   #[tracing::instrument(skip_all, fields(request_id = %inquiry.id))]
   async fn request_verification(
      &self,
      inquiry: &CheckupInquiry,
   ) -> Result<ChallengeDescriptor, CheckupApiError> {
      tracing::debug!("健診照会 API に照会を送信します");
      self.post(inquiry).await
   }

   #[tracing::instrument(skip_all, fields(request_id = %continuation.inquiry.id))]
   async fn complete_verification(
      &self,
      continuation: &CheckupContinuation,
   ) -> Result<HealthCheckupData, CheckupApiError> {
      tracing::debug!("健診照会 API に本人確認完了を送信します");
      self.post(continuation).await
   }
}

/// 応答エンベロープを読み、`data` を `T` として取り出す
async fn parse_envelope<T: DeserializeOwned>(
   response: reqwest::Response,
) -> Result<T, CheckupApiError> {
   let http_status = response.status();
   let body = response.text().await?;

   let envelope: CheckupEnvelope = serde_json::from_str(&body).map_err(|e| {
      CheckupApiError::Network(format!("JSON でない応答 (HTTP {http_status}): {e}"))
   })?;

   let status = envelope.status.unwrap_or_default();
   if status != CheckupEnvelope::SUCCESS {
      return Err(CheckupApiError::Rejected(format!(
         "status={status} (HTTP {http_status})"
      )));
   }

   let data = envelope
      .data
      .filter(|data| !data.is_null())
      .ok_or_else(|| CheckupApiError::Rejected("data がありません".to_string()))?;

   serde_json::from_value(data)
      .map_err(|e| CheckupApiError::Rejected(format!("data を解釈できません: {e}")))
}
