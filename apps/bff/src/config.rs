//! # BFF 設定
//!
//! 環境変数から BFF サーバーの設定を読み込む。
//!
//! 数値の形式が不正な値は既定値に置き換えず、[`ConfigError`] として起動を止める。

use std::{env, fmt, time::Duration};

use thiserror::Error;

/// 既定のバインドアドレス
const DEFAULT_HOST: &str = "0.0.0.0";
/// 既定のポート番号
const DEFAULT_PORT: u16 = 13000;
/// 既定の健診照会 API ベース URL
const DEFAULT_CHECKUP_API_URL: &str = "https://api.candiy.io";

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {value}")]
   Invalid { name: &'static str, value: String },
}

/// BFF サーバーの設定
#[derive(Clone)]
pub struct BffConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// 健診照会 API のベース URL
   pub checkup_api_url: String,
   /// `x-api-key` ヘッダーに載せる API キー
   pub checkup_api_key: String,
   /// 健診照会 API 呼び出しのタイムアウト（未設定なら無制限）
   pub checkup_api_timeout: Option<Duration>,
   /// 本人確認待ちの有効期限（未設定なら無期限）
   pub verification_ttl: Option<Duration>,
}

impl fmt::Debug for BffConfig {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("BffConfig")
         .field("host", &self.host)
         .field("port", &self.port)
         .field("checkup_api_url", &self.checkup_api_url)
         .field("checkup_api_key", &checkup_domain::REDACTED)
         .field("checkup_api_timeout", &self.checkup_api_timeout)
         .field("verification_ttl", &self.verification_ttl)
         .finish()
   }
}

impl BffConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// 空文字列は未設定として扱う。
   pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
   where
      F: Fn(&str) -> Option<String>,
   {
      let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

      let port = match get("BFF_PORT") {
         Some(v) => parse_number("BFF_PORT", &v)?,
         None => DEFAULT_PORT,
      };

      Ok(Self {
         host: get("BFF_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
         port,
         checkup_api_url: get("CHECKUP_API_URL")
            .unwrap_or_else(|| DEFAULT_CHECKUP_API_URL.to_string()),
         checkup_api_key: get("CHECKUP_API_KEY").ok_or(ConfigError::Missing("CHECKUP_API_KEY"))?,
         checkup_api_timeout: get("CHECKUP_API_TIMEOUT_SECS")
            .map(|v| parse_seconds("CHECKUP_API_TIMEOUT_SECS", &v))
            .transpose()?,
         verification_ttl: get("VERIFICATION_TTL_SECS")
            .map(|v| parse_seconds("VERIFICATION_TTL_SECS", &v))
            .transpose()?,
      })
   }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
   value.trim().parse().map_err(|_| ConfigError::Invalid {
      name,
      value: value.to_string(),
   })
}

/// 秒数を読む。0 は意味を持たないため不正とする
fn parse_seconds(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
   match parse_number::<u64>(name, value)? {
      0 => Err(ConfigError::Invalid {
         name,
         value: value.to_string(),
      }),
      secs => Ok(Duration::from_secs(secs)),
   }
}
