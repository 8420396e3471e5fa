//! # 外部 API クライアント
//!
//! 健診照会 API との通信を担当する。

pub mod checkup_api;

pub use checkup_api::{
   CheckupApiClient,
   CheckupApiClientImpl,
   CheckupApiError,
   CheckupContinuation,
   CheckupInquiry,
};
