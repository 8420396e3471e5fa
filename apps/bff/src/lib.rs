//! # BFF (Backend for Frontend) ライブラリ
//!
//! 健診照会画面専用の API サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: State の組み立てとルーター構築
//! - `client`: 外部 API クライアント（健診照会 API）
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーレスポンスと認証ヘルパー
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（キャッシュ制御）
//! - `openapi`: OpenAPI 仕様の集約
//! - `usecase`: 健診照会フローのビジネスロジック

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod usecase;
