//! 結合テスト共通のスタブとヘルパー

#![allow(dead_code)]

use std::{
   collections::VecDeque,
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{Router, body::Body, response::Response};
use checkup_bff::{
   app_builder::{AppDependencies, build_app},
   client::{CheckupApiClient, CheckupApiError, CheckupContinuation, CheckupInquiry},
};
use checkup_domain::{
   checkup::HealthCheckupData,
   clock::SystemClock,
   verification::ChallengeDescriptor,
};
use checkup_infra::{InMemoryAuthProvider, InMemorySessionManager, InMemoryVerificationFlowStore};
use http::{Method, Request};
use tokio::sync::Notify;
use tower::ServiceExt;

/// 応答を順に返す健診照会 API クライアント
///
/// 送信されたリクエストボディを JSON で記録する。
/// `gate` を設定すると、呼び出しは `gate` が通知されるまで応答を返さない。
#[derive(Default)]
pub struct ScriptedCheckupApiClient {
   request_results:  Mutex<VecDeque<Result<ChallengeDescriptor, CheckupApiError>>>,
   complete_results: Mutex<VecDeque<Result<HealthCheckupData, CheckupApiError>>>,
   sent:             Mutex<Vec<serde_json::Value>>,
   pub entered:      Arc<Notify>,
   pub gate:         Option<Arc<Notify>>,
}

impl ScriptedCheckupApiClient {
   pub fn on_request(self, result: Result<ChallengeDescriptor, CheckupApiError>) -> Self {
      self.request_results.lock().unwrap().push_back(result);
      self
   }

   pub fn on_complete(self, result: Result<HealthCheckupData, CheckupApiError>) -> Self {
      self.complete_results.lock().unwrap().push_back(result);
      self
   }

   pub fn gated(mut self, gate: Arc<Notify>) -> Self {
      self.gate = Some(gate);
      self
   }

   pub fn sent(&self) -> Vec<serde_json::Value> {
      self.sent.lock().unwrap().clone()
   }

   async fn wait_gate(&self) {
      self.entered.notify_one();
      if let Some(gate) = &self.gate {
         gate.notified().await;
      }
   }
}

#[async_trait]
impl CheckupApiClient for ScriptedCheckupApiClient {
   async fn request_verification(
      &self,
      inquiry: &CheckupInquiry,
   ) -> Result<ChallengeDescriptor, CheckupApiError> {
      self.sent
         .lock()
         .unwrap()
         .push(serde_json::to_value(inquiry).unwrap());
      self.wait_gate().await;
      self.request_results
         .lock()
         .unwrap()
         .pop_front()
         .expect("一段階目の応答が未設定")
   }

   async fn complete_verification(
      &self,
      continuation: &CheckupContinuation,
   ) -> Result<HealthCheckupData, CheckupApiError> {
      self.sent
         .lock()
         .unwrap()
         .push(serde_json::to_value(continuation).unwrap());
      self.wait_gate().await;
      self.complete_results
         .lock()
         .unwrap()
         .pop_front()
         .expect("二段階目の応答が未設定")
   }
}

/// テスト対象のアプリと、検証に使う依存
pub struct TestContext {
   pub client:     Arc<ScriptedCheckupApiClient>,
   pub flow_store: Arc<InMemoryVerificationFlowStore>,
}

pub fn test_app(client: ScriptedCheckupApiClient) -> (Router, TestContext) {
   let clock = Arc::new(SystemClock);
   let client = Arc::new(client);
   let flow_store = Arc::new(InMemoryVerificationFlowStore::new());

   let app = build_app(AppDependencies {
      auth_provider:    Arc::new(InMemoryAuthProvider::mock()),
      session_manager:  Arc::new(InMemorySessionManager::new(clock.clone())),
      checkup_client:   client.clone(),
      flow_store:       flow_store.clone(),
      clock,
      verification_ttl: None,
   });

   (app, TestContext { client, flow_store })
}

/// ログインしてセッション ID を返す
pub async fn login(app: &Router, username: &str, password: &str) -> String {
   let response = app
      .clone()
      .oneshot(
         Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(
               serde_json::json!({"username": username, "password": password}).to_string(),
            ))
            .unwrap(),
      )
      .await
      .unwrap();

   let set_cookie = response
      .headers()
      .get("set-cookie")
      .expect("ログイン成功時は Set-Cookie が返ること")
      .to_str()
      .unwrap();
   set_cookie
      .split(';')
      .next()
      .and_then(|pair| pair.strip_prefix("session_id="))
      .expect("session_id Cookie であること")
      .to_string()
}

/// セッション付きのリクエストを送る
pub async fn send(
   app: &Router,
   session_id: &str,
   method: Method,
   uri: &str,
   body: Option<serde_json::Value>,
) -> Response {
   let builder = Request::builder()
      .method(method)
      .uri(uri)
      .header("Cookie", format!("session_id={session_id}"));
   let request = match body {
      Some(body) => builder
         .header("content-type", "application/json")
         .body(Body::from(body.to_string()))
         .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
   };
   app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
   let body = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
   serde_json::from_slice(&body).unwrap()
}

pub fn challenge() -> ChallengeDescriptor {
   ChallengeDescriptor {
      transaction_id:      "t1".to_string(),
      job_index:           1,
      thread_index:        2,
      challenge_timestamp: 1000,
   }
}

pub fn form() -> serde_json::Value {
   serde_json::json!({
      "birthdate": "19900101",
      "phone_no": "01012345678"
   })
}

/// 外部 API の二段階目の応答 `data` と同じ形の健診データ
pub fn checkup_data() -> HealthCheckupData {
   serde_json::from_value(serde_json::json!({
      "patientName": "홍길동",
      "overviewList": [
         {
            "checkupDate": "2022-10-01",
            "BMI": "25.3",
            "bloodPressure": "135/88",
            "fastingBloodGlucose": "130",
            "totalCholesterol": "210",
            "HDLCholesterol": "45",
            "triglyceride": "180",
            "evaluation": "정상B"
         },
         {
            "checkupDate": "2024-05-12",
            "height": "172.5",
            "weight": "66.0",
            "BMI": "22.1",
            "bloodPressure": "118/76",
            "fastingBloodGlucose": "95",
            "totalCholesterol": "185",
            "HDLCholesterol": "52",
            "triglyceride": null,
            "evaluation": "정상A"
         }
      ],
      "referenceList": [
         {
            "refType": "정상(A)",
            "BMI": "18.5-24.9",
            "bloodPressure": "120미만",
            "fastingBloodGlucose": "100미만",
            "totalCholesterol": "200미만",
            "HDLCholesterol": "60이상",
            "triglyceride": "150미만"
         },
         {
            "refType": "정상(B)",
            "BMI": "25-29.9",
            "bloodPressure": "120-139",
            "fastingBloodGlucose": "100-125",
            "totalCholesterol": "200-239",
            "HDLCholesterol": "40-59",
            "triglyceride": "150-199"
         }
      ],
      "resultList": [
         {
            "checkupDate": "2024-05-12",
            "organizationName": "서울건강의원",
            "questionnaire": []
         }
      ]
   }))
   .unwrap()
}
