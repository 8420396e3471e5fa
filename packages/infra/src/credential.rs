//! # 認証プロバイダ
//!
//! ログイン ID とパスワードを照合し、一致すれば利用者を返す。
//!
//! 既定実装の [`InMemoryAuthProvider`] は固定の資格情報テーブルを持つ。
//! 外部の ID プロバイダに置き換える場合は [`AuthProvider`] を実装する。

use std::collections::HashMap;

use async_trait::async_trait;
use checkup_domain::user::{DisplayName, User, Username};
use subtle::ConstantTimeEq;

use crate::InfraError;

/// 認証プロバイダ
#[async_trait]
pub trait AuthProvider: Send + Sync {
   /// 資格情報を照合する
   ///
   /// # 戻り値
   ///
   /// 一致すれば `Some(User)`、ログイン ID が無いかパスワードが違えば `None`
   async fn authenticate(
      &self,
      username: &Username,
      password: &str,
   ) -> Result<Option<User>, InfraError>;
}

struct CredentialEntry {
   password:     String,
   display_name: String,
}

/// 固定テーブルによる認証プロバイダ
pub struct InMemoryAuthProvider {
   entries: HashMap<String, CredentialEntry>,
}

impl InMemoryAuthProvider {
   /// `(ログイン ID, パスワード, 表示名)` の組からテーブルを作る
   pub fn new<I, S>(entries: I) -> Self
   where
      I: IntoIterator<Item = (S, S, S)>,
      S: Into<String>,
   {
      let entries = entries
         .into_iter()
         .map(|(username, password, display_name)| {
            (
               username.into(),
               CredentialEntry {
                  password:     password.into(),
                  display_name: display_name.into(),
               },
            )
         })
         .collect();
      Self { entries }
   }

   /// 開発用の固定アカウント
   pub fn mock() -> Self {
      Self::new([
         ("admin", "1234", "홍길동"),
         ("assignee", "1124", "남궁민"),
         ("user1", "5678", "이순신"),
         ("user2", "2468", "유관순"),
      ])
   }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
   async fn authenticate(
      &self,
      username: &Username,
      password: &str,
   ) -> Result<Option<User>, InfraError> {
      let Some(entry) = self.entries.get(username.as_str()) else {
         return Ok(None);
      };

      let matched: bool = entry
         .password
         .as_bytes()
         .ct_eq(password.as_bytes())
         .into();
      if !matched {
         return Ok(None);
      }

      let display_name = DisplayName::new(entry.display_name.as_str()).map_err(|e| {
         InfraError::corrupted(format!("{username} の表示名が不正です: {e}"))
      })?;
      Ok(Some(User::new(username.clone(), display_name)))
   }
}
