//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、照会フローのロジックはユースケースに委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `auth`: 認証関連（ログイン、ログアウト、セッション確認）
//! - `checkup`: 健診照会（本人確認フロー、結果表示）

pub mod auth;
pub mod checkup;
pub mod health;

pub use auth::{AuthState, login, logout, me};
pub use checkup::{
   CheckupState,
   cancel_verification,
   complete_verification,
   get_history,
   get_summary,
   get_verification,
   submit_verification,
};
pub use health::health_check;
