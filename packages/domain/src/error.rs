//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `Conflict` | 409 Conflict | 現在の照会状態では実行できない操作 |
//!
//! ## 使用例
//!
//! ```rust
//! use checkup_domain::DomainError;
//!
//! fn validate_phone(phone: &str) -> Result<(), DomainError> {
//!     if phone.is_empty() {
//!         return Err(DomainError::Validation("휴대폰 번호를 입력해주세요.".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// 文字列を持つバリアントは、そのまま利用者に表示できる文言を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
   /// バリデーションエラー
   ///
   /// 必須項目の未入力など。ネットワーク呼び出しより前に検出される。
   #[error("{0}")]
   Validation(String),

   /// 競合エラー
   ///
   /// 照会が処理中のときの再送信や、本人確認待ちでない状態での完了要求など。
   #[error("{0}")]
   Conflict(String),
}
