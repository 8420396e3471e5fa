//! # 健診データモデル
//!
//! 外部の健診照会 API が二段階目の応答で返すデータ。
//!
//! - [`CheckupOverview`]: 健診日ごとの測定値（すべて文字列）
//! - [`ReferenceRange`]: 同じ項目名を持つ基準範囲の文字列（正常・注意の 2 レコード）
//! - [`CheckupResult`]: 健診日ごとの受診情報（受診機関名など）
//! - [`HealthCheckupData`]: 上記をまとめたペイロード
//!
//! フィールド名は API の JSON キーをそのまま使う（`BMI`, `HDLCholesterol`, `yGPT` など）。
//! 値が `null` または欠落している項目は空文字として扱う。

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// 受診機関名が見つからないときの表示
pub const PLACEHOLDER: &str = "-";

/// 測定項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum MetricField {
   #[serde(rename = "height")]
   Height,
   #[serde(rename = "weight")]
   Weight,
   #[serde(rename = "waist")]
   Waist,
   #[serde(rename = "BMI")]
   Bmi,
   #[serde(rename = "vision")]
   Vision,
   #[serde(rename = "hearing")]
   Hearing,
   #[serde(rename = "bloodPressure")]
   BloodPressure,
   #[serde(rename = "proteinuria")]
   Proteinuria,
   #[serde(rename = "hemoglobin")]
   Hemoglobin,
   #[serde(rename = "fastingBloodGlucose")]
   FastingBloodGlucose,
   #[serde(rename = "totalCholesterol")]
   TotalCholesterol,
   #[serde(rename = "HDLCholesterol")]
   HdlCholesterol,
   #[serde(rename = "triglyceride")]
   Triglyceride,
   #[serde(rename = "LDLCholesterol")]
   LdlCholesterol,
   #[serde(rename = "serumCreatinine")]
   SerumCreatinine,
   #[serde(rename = "GFR")]
   Gfr,
   #[serde(rename = "AST")]
   Ast,
   #[serde(rename = "ALT")]
   Alt,
   #[serde(rename = "yGPT")]
   YGpt,
   #[serde(rename = "chestXrayResult")]
   ChestXray,
   #[serde(rename = "osteoporosis")]
   Osteoporosis,
}

/// 健診履歴で項目をまとめる区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
   /// 신체 측정
   Body,
   /// 혈액 검사
   Blood,
   /// 기타 검사
   Other,
}

impl MetricGroup {
   pub fn key(self) -> &'static str {
      match self {
         Self::Body => "body",
         Self::Blood => "blood",
         Self::Other => "other",
      }
   }

   pub fn label(self) -> &'static str {
      match self {
         Self::Body => "신체 측정",
         Self::Blood => "혈액 검사",
         Self::Other => "기타 검사",
      }
   }

   /// この区分に属する項目（表示順）
   pub fn fields(self) -> impl Iterator<Item = MetricField> {
      MetricField::iter().filter(move |field| field.group() == self)
   }
}

impl MetricField {
   /// API の JSON キー
   pub fn key(self) -> &'static str {
      match self {
         Self::Height => "height",
         Self::Weight => "weight",
         Self::Waist => "waist",
         Self::Bmi => "BMI",
         Self::Vision => "vision",
         Self::Hearing => "hearing",
         Self::BloodPressure => "bloodPressure",
         Self::Proteinuria => "proteinuria",
         Self::Hemoglobin => "hemoglobin",
         Self::FastingBloodGlucose => "fastingBloodGlucose",
         Self::TotalCholesterol => "totalCholesterol",
         Self::HdlCholesterol => "HDLCholesterol",
         Self::Triglyceride => "triglyceride",
         Self::LdlCholesterol => "LDLCholesterol",
         Self::SerumCreatinine => "serumCreatinine",
         Self::Gfr => "GFR",
         Self::Ast => "AST",
         Self::Alt => "ALT",
         Self::YGpt => "yGPT",
         Self::ChestXray => "chestXrayResult",
         Self::Osteoporosis => "osteoporosis",
      }
   }

   /// 表示名
   pub fn label(self) -> &'static str {
      match self {
         Self::Height => "신장",
         Self::Weight => "체중",
         Self::Waist => "허리둘레",
         Self::Bmi => "BMI",
         Self::Vision => "시력",
         Self::Hearing => "청력",
         Self::BloodPressure => "혈압",
         Self::Proteinuria => "요단백",
         Self::Hemoglobin => "혈색소",
         Self::FastingBloodGlucose => "공복혈당",
         Self::TotalCholesterol => "총콜레스테롤",
         Self::HdlCholesterol => "HDL 콜레스테롤",
         Self::Triglyceride => "중성지방",
         Self::LdlCholesterol => "LDL 콜레스테롤",
         Self::SerumCreatinine => "혈청크레아티닌",
         Self::Gfr => "신사구체여과율",
         Self::Ast => "AST",
         Self::Alt => "ALT",
         Self::YGpt => "감마지티피",
         Self::ChestXray => "흉부촬영",
         Self::Osteoporosis => "골다공증",
      }
   }

   /// 単位（単位の無い所見項目は空文字）
   pub fn unit(self) -> &'static str {
      match self {
         Self::Height | Self::Waist => "cm",
         Self::Weight => "kg",
         Self::Bmi => "kg/m²",
         Self::BloodPressure => "mmHg",
         Self::Hemoglobin => "g/dL",
         Self::FastingBloodGlucose
         | Self::TotalCholesterol
         | Self::HdlCholesterol
         | Self::Triglyceride
         | Self::LdlCholesterol
         | Self::SerumCreatinine => "mg/dL",
         Self::Gfr => "mL/min/1.73m²",
         Self::Ast | Self::Alt | Self::YGpt => "U/L",
         Self::Vision
         | Self::Hearing
         | Self::Proteinuria
         | Self::ChestXray
         | Self::Osteoporosis => "",
      }
   }

   pub fn group(self) -> MetricGroup {
      match self {
         Self::Height | Self::Weight | Self::Waist | Self::Bmi => MetricGroup::Body,
         Self::BloodPressure
         | Self::Hemoglobin
         | Self::FastingBloodGlucose
         | Self::TotalCholesterol
         | Self::HdlCholesterol
         | Self::Triglyceride
         | Self::LdlCholesterol
         | Self::SerumCreatinine
         | Self::Gfr
         | Self::Ast
         | Self::Alt
         | Self::YGpt => MetricGroup::Blood,
         Self::Vision
         | Self::Hearing
         | Self::Proteinuria
         | Self::ChestXray
         | Self::Osteoporosis => MetricGroup::Other,
      }
   }
}

/// 健診日ごとの測定値
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckupOverview {
   pub height: Option<String>,
   pub weight: Option<String>,
   pub waist: Option<String>,
   #[serde(rename = "BMI")]
   pub bmi: Option<String>,
   pub vision: Option<String>,
   pub hearing: Option<String>,
   pub blood_pressure: Option<String>,
   pub proteinuria: Option<String>,
   pub hemoglobin: Option<String>,
   pub fasting_blood_glucose: Option<String>,
   pub total_cholesterol: Option<String>,
   #[serde(rename = "HDLCholesterol")]
   pub hdl_cholesterol: Option<String>,
   pub triglyceride: Option<String>,
   #[serde(rename = "LDLCholesterol")]
   pub ldl_cholesterol: Option<String>,
   pub serum_creatinine: Option<String>,
   #[serde(rename = "GFR")]
   pub gfr: Option<String>,
   #[serde(rename = "AST")]
   pub ast: Option<String>,
   #[serde(rename = "ALT")]
   pub alt: Option<String>,
   #[serde(rename = "yGPT")]
   pub y_gpt: Option<String>,
   pub chest_xray_result: Option<String>,
   pub osteoporosis: Option<String>,
   pub checkup_date: Option<String>,
   pub evaluation: Option<String>,
}

impl CheckupOverview {
   /// 項目の測定値（欠落時は空文字）
   pub fn value(&self, field: MetricField) -> &str {
      let value = match field {
         MetricField::Height => &self.height,
         MetricField::Weight => &self.weight,
         MetricField::Waist => &self.waist,
         MetricField::Bmi => &self.bmi,
         MetricField::Vision => &self.vision,
         MetricField::Hearing => &self.hearing,
         MetricField::BloodPressure => &self.blood_pressure,
         MetricField::Proteinuria => &self.proteinuria,
         MetricField::Hemoglobin => &self.hemoglobin,
         MetricField::FastingBloodGlucose => &self.fasting_blood_glucose,
         MetricField::TotalCholesterol => &self.total_cholesterol,
         MetricField::HdlCholesterol => &self.hdl_cholesterol,
         MetricField::Triglyceride => &self.triglyceride,
         MetricField::LdlCholesterol => &self.ldl_cholesterol,
         MetricField::SerumCreatinine => &self.serum_creatinine,
         MetricField::Gfr => &self.gfr,
         MetricField::Ast => &self.ast,
         MetricField::Alt => &self.alt,
         MetricField::YGpt => &self.y_gpt,
         MetricField::ChestXray => &self.chest_xray_result,
         MetricField::Osteoporosis => &self.osteoporosis,
      };
      value.as_deref().unwrap_or_default()
   }

   /// 健診日（結果リストとの結合キー）
   pub fn date(&self) -> &str {
      self.checkup_date.as_deref().unwrap_or_default()
   }

   /// 総合評価
   pub fn evaluation_text(&self) -> &str {
      self.evaluation.as_deref().unwrap_or_default()
   }
}

/// 基準範囲レコードの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
   Normal,
   Caution,
   Other,
}

/// 基準範囲（項目ごとの範囲式）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceRange {
   pub height: Option<String>,
   pub weight: Option<String>,
   pub waist: Option<String>,
   #[serde(rename = "BMI")]
   pub bmi: Option<String>,
   pub vision: Option<String>,
   pub hearing: Option<String>,
   pub blood_pressure: Option<String>,
   pub proteinuria: Option<String>,
   pub hemoglobin: Option<String>,
   pub fasting_blood_glucose: Option<String>,
   pub total_cholesterol: Option<String>,
   #[serde(rename = "HDLCholesterol")]
   pub hdl_cholesterol: Option<String>,
   pub triglyceride: Option<String>,
   #[serde(rename = "LDLCholesterol")]
   pub ldl_cholesterol: Option<String>,
   pub serum_creatinine: Option<String>,
   #[serde(rename = "GFR")]
   pub gfr: Option<String>,
   #[serde(rename = "AST")]
   pub ast: Option<String>,
   #[serde(rename = "ALT")]
   pub alt: Option<String>,
   #[serde(rename = "yGPT")]
   pub y_gpt: Option<String>,
   pub chest_xray_result: Option<String>,
   pub osteoporosis: Option<String>,
   pub ref_type: Option<String>,
}

impl ReferenceRange {
   /// 項目の範囲式（欠落時は空文字）
   pub fn range(&self, field: MetricField) -> &str {
      let range = match field {
         MetricField::Height => &self.height,
         MetricField::Weight => &self.weight,
         MetricField::Waist => &self.waist,
         MetricField::Bmi => &self.bmi,
         MetricField::Vision => &self.vision,
         MetricField::Hearing => &self.hearing,
         MetricField::BloodPressure => &self.blood_pressure,
         MetricField::Proteinuria => &self.proteinuria,
         MetricField::Hemoglobin => &self.hemoglobin,
         MetricField::FastingBloodGlucose => &self.fasting_blood_glucose,
         MetricField::TotalCholesterol => &self.total_cholesterol,
         MetricField::HdlCholesterol => &self.hdl_cholesterol,
         MetricField::Triglyceride => &self.triglyceride,
         MetricField::LdlCholesterol => &self.ldl_cholesterol,
         MetricField::SerumCreatinine => &self.serum_creatinine,
         MetricField::Gfr => &self.gfr,
         MetricField::Ast => &self.ast,
         MetricField::Alt => &self.alt,
         MetricField::YGpt => &self.y_gpt,
         MetricField::ChestXray => &self.chest_xray_result,
         MetricField::Osteoporosis => &self.osteoporosis,
      };
      range.as_deref().unwrap_or_default()
   }

   /// `refType` から正常・注意のどちらの範囲かを判別する
   ///
   /// `"정상(A)"` は正常、`"정상(B)"` や `"경계"` を含むものは注意として扱う。
   pub fn kind(&self) -> ReferenceKind {
      let tag = self.ref_type.as_deref().unwrap_or_default().trim();

      if tag.contains("정상(B)")
         || tag.contains("경계")
         || tag == "주의"
         || tag.eq_ignore_ascii_case("caution")
      {
         ReferenceKind::Caution
      } else if tag.contains("정상(A)") || tag == "정상" || tag.eq_ignore_ascii_case("normal") {
         ReferenceKind::Normal
      } else {
         ReferenceKind::Other
      }
   }
}

/// 正常範囲と注意範囲の組
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferencePair<'a> {
   pub normal:  Option<&'a ReferenceRange>,
   pub caution: Option<&'a ReferenceRange>,
}

impl ReferencePair<'_> {
   pub fn normal_range(&self, field: MetricField) -> &str {
      self.normal.map(|r| r.range(field)).unwrap_or_default()
   }

   pub fn caution_range(&self, field: MetricField) -> &str {
      self.caution.map(|r| r.range(field)).unwrap_or_default()
   }
}

/// 健診日ごとの受診情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckupResult {
   pub case_type: Option<i64>,
   pub checkup_type: Option<String>,
   pub checkup_date: Option<String>,
   pub organization_name: Option<String>,
   pub checkup_findings: Option<String>,
   pub pdf_data: Option<String>,
   pub questionnaire: Vec<serde_json::Value>,
   pub infants_checkup_list: Vec<serde_json::Value>,
   pub infants_dental_list: Vec<serde_json::Value>,
}

/// 二段階目の照会で得られる健診データ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthCheckupData {
   pub patient_name:   Option<String>,
   pub overview_list:  Vec<CheckupOverview>,
   pub reference_list: Vec<ReferenceRange>,
   pub result_list:    Vec<CheckupResult>,
}

impl HealthCheckupData {
   /// 最新の健診
   ///
   /// 概要リストは健診日の昇順で届く前提で、末尾を最新とみなす。
   /// 並び順の検証は行わない。
   pub fn latest_overview(&self) -> Option<&CheckupOverview> {
      self.overview_list.last()
   }

   /// 正常範囲と注意範囲のレコードを選ぶ
   ///
   /// `refType` で判別できるレコードがあればそれを使い、
   /// どれも判別できなければ先頭を正常、2 番目を注意とみなす。
   pub fn reference_pair(&self) -> ReferencePair<'_> {
      let find = |kind| self.reference_list.iter().find(|r| r.kind() == kind);
      let normal = find(ReferenceKind::Normal);
      let caution = find(ReferenceKind::Caution);

      if normal.is_none() && caution.is_none() {
         return ReferencePair {
            normal:  self.reference_list.first(),
            caution: self.reference_list.get(1),
         };
      }
      ReferencePair { normal, caution }
   }

   /// 健診日に対応する受診情報（線形探索）
   pub fn find_result(&self, checkup_date: &str) -> Option<&CheckupResult> {
      self.result_list
         .iter()
         .find(|r| r.checkup_date.as_deref() == Some(checkup_date))
   }

   /// 健診日に対応する受診機関名
   ///
   /// 結果が見つからない、または機関名が空のときは [`PLACEHOLDER`]。
   pub fn organization_name_for(&self, checkup_date: &str) -> &str {
      self.find_result(checkup_date)
         .and_then(|r| r.organization_name.as_deref())
         .filter(|name| !name.is_empty())
         .unwrap_or(PLACEHOLDER)
   }
}
