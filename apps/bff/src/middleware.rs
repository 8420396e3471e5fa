//! # ミドルウェア
//!
//! BFF 用のミドルウェアを提供する。

mod cache_control;

pub use cache_control::no_cache;
