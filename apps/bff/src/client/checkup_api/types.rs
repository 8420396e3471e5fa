//! 健診照会 API のリクエスト・レスポンス型

use checkup_domain::verification::{ChallengeDescriptor, VerificationRequest};
use serde::{Deserialize, Serialize};

/// 簡易認証（本人確認アプリ）を使う
const LOGIN_TYPE_LEVEL: &str = "1";
/// 通信事業者の指定なし
const TELECOM: &str = "0";
/// 二段階目の送信
const IS_CONTINUE: &str = "1";

/// 一段階目の照会リクエスト
///
/// 生年月日・電話番号を含むため Debug は実装しない。
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckupInquiry {
   pub id:               String,
   pub login_type_level: String,
   pub legal_name:       String,
   pub birthdate:        String,
   pub phone_no:         String,
   pub telecom:          String,
   pub start_date:       String,
   pub end_date:         String,
   pub inquiry_type:     String,
}

impl From<&VerificationRequest> for CheckupInquiry {
   fn from(request: &VerificationRequest) -> Self {
      Self {
         id:               request.id().to_string(),
         login_type_level: LOGIN_TYPE_LEVEL.to_string(),
         legal_name:       request.subject_name().as_str().to_string(),
         birthdate:        request.birthdate().to_string(),
         phone_no:         request.phone_no().to_string(),
         telecom:          TELECOM.to_string(),
         start_date:       request.date_range().start_date.clone(),
         end_date:         request.date_range().end_date.clone(),
         inquiry_type:     request.inquiry_type().code().to_string(),
      }
   }
}

/// 二段階目の照会リクエスト
///
/// 一段階目と同じ内容に、継続フラグとチャレンジ情報を添える。
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckupContinuation {
   #[serde(flatten)]
   pub inquiry:           CheckupInquiry,
   pub is_continue:       String,
   pub multi_factor_info: ChallengeDescriptor,
}

impl CheckupContinuation {
   pub fn new(request: &VerificationRequest, challenge: &ChallengeDescriptor) -> Self {
      Self {
         inquiry:           CheckupInquiry::from(request),
         is_continue:       IS_CONTINUE.to_string(),
         multi_factor_info: challenge.clone(),
      }
   }
}

/// 応答エンベロープ `{ status, data }`
#[derive(Debug, Deserialize)]
pub(super) struct CheckupEnvelope {
   #[serde(default)]
   pub status: Option<String>,
   #[serde(default)]
   pub data:   Option<serde_json::Value>,
}

impl CheckupEnvelope {
   pub(super) const SUCCESS: &'static str = "success";
}
