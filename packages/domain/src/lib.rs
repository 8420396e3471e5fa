//! # Checkup ドメイン層
//!
//! 健康診断結果照会のビジネスルールを表現する。
//!
//! ## モジュール構成
//!
//! - [`metric`]: 測定値と基準範囲文字列から判定区分（정상/주의/위험）を求める分類器
//! - [`checkup`]: 外部 API が返す健診データのモデル（概要・基準値・結果）
//! - [`summary`]: 最新健診の主要 6 指標サマリーと健診履歴の組み立て
//! - [`verification`]: 二段階の本人確認照会フローの状態機械
//! - [`user`]: 利用者の識別情報
//! - [`clock`]: 時刻プロバイダ
//! - [`error`]: ドメインエラー
//!
//! ## 設計方針
//!
//! - I/O を持たない（HTTP・ストアはインフラ層と BFF の責務）
//! - 状態遷移は `self` を消費して新しい状態を返す

pub mod checkup;
pub mod clock;
pub mod error;
pub mod metric;
pub mod summary;
pub mod user;
pub mod verification;

pub use error::DomainError;

/// ログ出力時に個人情報を伏せるためのプレースホルダ
pub const REDACTED: &str = "[REDACTED]";
