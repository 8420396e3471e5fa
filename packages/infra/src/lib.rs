//! # Checkup インフラ層
//!
//! BFF が使うストアと認証プロバイダの具体的な実装を提供する。
//!
//! ## 設計方針
//!
//! 各関心事はトレイトで抽象化し、既定実装はプロセス内メモリに置く。
//! セッションも照会結果も永続化しないため、外部ストアは持たない。
//! BFF はトレイトオブジェクト経由で利用し、テストでは任意の実装に差し替える。
//!
//! ## 依存関係
//!
//! ```text
//! bff → infra → domain
//!   ↘          ↗
//!     domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`credential`] - 認証プロバイダ（ログイン ID とパスワードの照合）
//! - [`session`] - セッション管理
//! - [`verification_store`] - セッションごとの照会フローの保管
//! - [`error`] - インフラ層エラー定義

pub mod credential;
pub mod error;
pub mod session;
pub mod verification_store;

pub use credential::{AuthProvider, InMemoryAuthProvider};
pub use error::{InfraError, InfraErrorKind};
pub use session::{InMemorySessionManager, SessionData, SessionManager};
pub use verification_store::{InMemoryVerificationFlowStore, VerificationFlowStore};
