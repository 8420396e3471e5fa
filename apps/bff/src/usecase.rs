//! # ユースケース層
//!
//! BFF のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: クライアント・ストア・時刻を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - `checkup`: 健診照会（二段階の本人確認フロー）と結果の表示

pub mod checkup;

pub use checkup::{CheckupUseCase, CheckupUseCaseError, VerificationSnapshot};
