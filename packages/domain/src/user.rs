//! # 利用者
//!
//! ログイン中の利用者を表す値オブジェクトとエンティティ。
//!
//! 表示名は照会リクエストの `legalName`（照会対象者の氏名）としてそのまま
//! 外部 API に送られるため、PII として扱い Debug 出力をマスクする。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// ログイン ID（値オブジェクト）
///
/// 空白だけの値は受け付けない。資格情報は完全一致で照合するため、
/// 入力された文字列は加工せずに保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
pub struct Username(String);

impl Username {
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();
      if value.trim().is_empty() {
         return Err(DomainError::Validation("아이디를 입력해주세요.".to_string()));
      }
      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// 表示名（値オブジェクト）
///
/// 照会対象者の氏名として使われる。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into().trim().to_string();
      if value.is_empty() {
         return Err(DomainError::Validation("이름이 비어 있습니다.".to_string()));
      }
      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl fmt::Debug for DisplayName {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_tuple("DisplayName").field(&crate::REDACTED).finish()
   }
}

/// 認証済み利用者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
   username:     Username,
   display_name: DisplayName,
}

impl User {
   pub fn new(username: Username, display_name: DisplayName) -> Self {
      Self {
         username,
         display_name,
      }
   }

   pub fn username(&self) -> &Username {
      &self.username
   }

   pub fn display_name(&self) -> &DisplayName {
      &self.display_name
   }
}
