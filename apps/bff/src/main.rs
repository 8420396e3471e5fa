//! # BFF (Backend for Frontend) サーバー
//!
//! 健診照会画面専用の API サーバー。
//!
//! ## 役割
//!
//! - **認証・セッション管理**: HTTPOnly Cookie によるセッション管理
//! - **健診照会の仲介**: 外部の健診照会 API を二段階（照会 → 本人確認完了）で呼び出す
//! - **レスポンス最適化**: 健診データを画面向けの判定付きデータに変換
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │   Browser    │────▶│     BFF      │────▶│  健診照会 API     │
//! │              │     │  port: 13000 │     │ (x-api-key 認証) │
//! └──────────────┘     └──────────────┘     └──────────────────┘
//! ```
//!
//! セッションと照会フローはプロセス内メモリに置く。再起動で失われる。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `BFF_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `BFF_PORT` | No | ポート番号（デフォルト: `13000`） |
//! | `CHECKUP_API_URL` | No | 健診照会 API のベース URL（デフォルト: `https://api.candiy.io`） |
//! | `CHECKUP_API_KEY` | **Yes** | 健診照会 API の API キー |
//! | `CHECKUP_API_TIMEOUT_SECS` | No | 健診照会 API 呼び出しのタイムアウト秒数 |
//! | `VERIFICATION_TTL_SECS` | No | 本人確認待ちの有効期限秒数 |
//! | `ENV` | No | `production` で Cookie に Secure 属性を付与 |
//! | `LOG_FORMAT` / `RUST_LOG` | No | ログ形式（`json` / `pretty`）とフィルタ |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p checkup-bff
//!
//! # 本番環境（環境変数を直接指定）
//! CHECKUP_API_KEY=... ENV=production cargo run -p checkup-bff --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use checkup_bff::{
   app_builder::{AppDependencies, build_app},
   client::CheckupApiClientImpl,
   config::BffConfig,
};
use checkup_domain::clock::SystemClock;
use checkup_infra::{InMemoryAuthProvider, InMemorySessionManager, InMemoryVerificationFlowStore};
use checkup_shared::observability::TracingConfig;
use tokio::net::TcpListener;

/// BFF サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_env("bff");
   checkup_shared::observability::init_tracing(tracing_config);
   let _tracing_guard = tracing::info_span!("app", service = "bff").entered();

   let config = BffConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!("BFF サーバーを起動します: {}:{}", config.host, config.port);
   tracing::debug!(?config, "設定");

   let clock = Arc::new(SystemClock);
   let checkup_client = CheckupApiClientImpl::new(
      &config.checkup_api_url,
      config.checkup_api_key.clone(),
      config.checkup_api_timeout,
   )
   .context("健診照会 API クライアントの初期化に失敗しました")?;

   let app = build_app(AppDependencies {
      auth_provider:    Arc::new(InMemoryAuthProvider::mock()),
      session_manager:  Arc::new(InMemorySessionManager::new(clock.clone())),
      checkup_client:   Arc::new(checkup_client),
      flow_store:       Arc::new(InMemoryVerificationFlowStore::new()),
      clock,
      verification_ttl: config.verification_ttl,
   });

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("バインドアドレスが不正です")?;
   let listener = TcpListener::bind(addr).await?;
   tracing::info!("BFF サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
