//! 健診照会 API クライアントのエラー型

use thiserror::Error;

/// 健診照会 API クライアントエラー
#[derive(Debug, Clone, Error)]
pub enum CheckupApiError {
   /// API が成功以外のステータスを返した、または応答データを解釈できない
   #[error("照会が受け付けられませんでした: {0}")]
   Rejected(String),

   /// 通信エラー（接続失敗・タイムアウト・JSON でない応答）
   #[error("ネットワークエラー: {0}")]
   Network(String),
}

impl From<reqwest::Error> for CheckupApiError {
   fn from(err: reqwest::Error) -> Self {
      CheckupApiError::Network(err.to_string())
   }
}
