//! # 健診結果の表示モデル
//!
//! 照会で得た [`HealthCheckupData`] から、画面に出す 2 種類のビューを組み立てる。
//!
//! - [`CheckupSummary`]: 最新健診の主要 6 指標（判定区分・色・ラベル付き）
//! - [`CheckupHistory`]: 全健診の一覧（受診機関名と区分別の測定値）

use crate::{
   checkup::{CheckupOverview, HealthCheckupData, MetricField, MetricGroup, ReferencePair},
   metric::{MetricStatus, StatusColor, classify, parse_leading_float},
};

/// サマリーに載せる指標（表示順）
pub const SUMMARY_FIELDS: [MetricField; 6] = [
   MetricField::Bmi,
   MetricField::BloodPressure,
   MetricField::FastingBloodGlucose,
   MetricField::TotalCholesterol,
   MetricField::HdlCholesterol,
   MetricField::Triglyceride,
];

/// 1 指標の判定結果
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
   pub field:         MetricField,
   /// 測定値の原文（詳細表示用）
   pub value:         String,
   /// グラフ描画用の数値
   pub chart_value:   Option<f64>,
   pub normal_range:  String,
   pub caution_range: String,
   pub status:        MetricStatus,
}

impl MetricSummary {
   /// 測定値を基準範囲で判定する
   pub fn evaluate(
      overview: &CheckupOverview,
      references: &ReferencePair<'_>,
      field: MetricField,
   ) -> Self {
      let value = overview.value(field);
      let normal_range = references.normal_range(field);
      let caution_range = references.caution_range(field);

      Self {
         field,
         value: value.to_string(),
         chart_value: chart_value(field, value),
         normal_range: normal_range.to_string(),
         caution_range: caution_range.to_string(),
         status: classify(value, normal_range, caution_range),
      }
   }

   pub fn label(&self) -> &'static str {
      self.status.label()
   }

   pub fn color(&self) -> StatusColor {
      self.status.color()
   }
}

/// グラフ用の数値
///
/// 血圧（`"120/80"`）はスラッシュより前の収縮期血圧を使う。
fn chart_value(field: MetricField, value: &str) -> Option<f64> {
   let numeric_part = match field {
      MetricField::BloodPressure => value.split('/').next().unwrap_or_default(),
      _ => value,
   };
   parse_leading_float(numeric_part)
}

/// 最新健診のサマリー
#[derive(Debug, Clone, PartialEq)]
pub struct CheckupSummary {
   pub patient_name:      String,
   pub checkup_date:      String,
   pub evaluation:        String,
   pub organization_name: String,
   pub metrics:           Vec<MetricSummary>,
}

impl CheckupSummary {
   /// 概要リストの末尾を最新とみなしてサマリーを作る
   ///
   /// 概要リストが空なら `None`。
   pub fn latest(data: &HealthCheckupData) -> Option<Self> {
      let overview = data.latest_overview()?;
      let references = data.reference_pair();

      let metrics = SUMMARY_FIELDS
         .iter()
         .map(|&field| MetricSummary::evaluate(overview, &references, field))
         .collect();

      Some(Self {
         patient_name: data.patient_name.clone().unwrap_or_default(),
         checkup_date: overview.date().to_string(),
         evaluation: overview.evaluation_text().to_string(),
         organization_name: data.organization_name_for(overview.date()).to_string(),
         metrics,
      })
   }
}

/// 履歴の 1 区分（신체 측정 など）
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryGroup {
   pub group:   MetricGroup,
   pub metrics: Vec<MetricSummary>,
}

/// 健診 1 回分の履歴
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
   pub checkup_date:      String,
   pub evaluation:        String,
   pub organization_name: String,
   /// 履歴の先頭の健診に「최신」を表示する
   pub is_latest:         bool,
   pub groups:            Vec<HistoryGroup>,
}

/// 健診履歴
#[derive(Debug, Clone, PartialEq)]
pub struct CheckupHistory {
   pub patient_name: String,
   /// API から届いた順
   pub entries:      Vec<HistoryEntry>,
}

impl CheckupHistory {
   pub fn from_data(data: &HealthCheckupData) -> Self {
      let references = data.reference_pair();

      let entries = data
         .overview_list
         .iter()
         .enumerate()
         .map(|(index, overview)| HistoryEntry {
            checkup_date: overview.date().to_string(),
            evaluation: overview.evaluation_text().to_string(),
            organization_name: data.organization_name_for(overview.date()).to_string(),
            is_latest: index == 0,
            groups: [MetricGroup::Body, MetricGroup::Blood, MetricGroup::Other]
               .into_iter()
               .map(|group| HistoryGroup {
                  group,
                  metrics: group
                     .fields()
                     .map(|field| MetricSummary::evaluate(overview, &references, field))
                     .collect(),
               })
               .collect(),
         })
         .collect();

      Self {
         patient_name: data.patient_name.clone().unwrap_or_default(),
         entries,
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;
   use crate::checkup::{CheckupResult, ReferenceRange};

   fn overview(date: &str, bmi: &str, blood_pressure: &str, glucose: &str) -> CheckupOverview {
      CheckupOverview {
         checkup_date: Some(date.to_string()),
         bmi: Some(bmi.to_string()),
         blood_pressure: Some(blood_pressure.to_string()),
         fasting_blood_glucose: Some(glucose.to_string()),
         total_cholesterol: Some("180".to_string()),
         hdl_cholesterol: Some("".to_string()),
         triglyceride: Some("abc".to_string()),
         evaluation: Some("정상A".to_string()),
         ..Default::default()
      }
   }

   fn data() -> HealthCheckupData {
      HealthCheckupData {
         patient_name:   Some("홍길동".to_string()),
         overview_list:  vec![
            overview("2023-05-10", "27.0", "135/85", "130"),
            overview("2024-05-12", "22.1", "118/76", "110"),
         ],
         reference_list: vec![
            ReferenceRange {
               ref_type: Some("정상(A)".to_string()),
               bmi: Some("18.5-24.9".to_string()),
               blood_pressure: Some("120미만".to_string()),
               fasting_blood_glucose: Some("100미만".to_string()),
               total_cholesterol: Some("200미만".to_string()),
               hdl_cholesterol: Some("60이상".to_string()),
               triglyceride: Some("150미만".to_string()),
               ..Default::default()
            },
            ReferenceRange {
               ref_type: Some("정상(B)".to_string()),
               bmi: Some("25-29.9".to_string()),
               blood_pressure: Some("120-139".to_string()),
               fasting_blood_glucose: Some("100-125".to_string()),
               ..Default::default()
            },
         ],
         result_list:    vec![CheckupResult {
            checkup_date: Some("2024-05-12".to_string()),
            organization_name: Some("서울의원".to_string()),
            ..Default::default()
         }],
      }
   }

   #[test]
   fn test_サマリーは末尾の健診の6指標を判定する() {
      let summary = CheckupSummary::latest(&data()).unwrap();

      assert_eq!(summary.checkup_date, "2024-05-12");
      assert_eq!(summary.organization_name, "서울의원");
      let fields: Vec<_> = summary.metrics.iter().map(|m| m.field).collect();
      assert_eq!(fields, SUMMARY_FIELDS.to_vec());

      let statuses: Vec<_> = summary.metrics.iter().map(|m| m.status).collect();
      assert_eq!(
         statuses,
         vec![
            MetricStatus::Normal,
            MetricStatus::Normal,
            MetricStatus::Caution,
            MetricStatus::Normal,
            MetricStatus::Unknown,
            MetricStatus::Unknown,
         ]
      );
   }

   #[test]
   fn test_血圧のグラフ値はスラッシュより前で原文はそのまま() {
      let summary = CheckupSummary::latest(&data()).unwrap();
      let blood_pressure = &summary.metrics[1];

      assert_eq!(blood_pressure.value, "118/76");
      assert_eq!(blood_pressure.chart_value, Some(118.0));
   }

   #[test]
   fn test_数値でない測定値のグラフ値はnone() {
      let summary = CheckupSummary::latest(&data()).unwrap();
      let triglyceride = &summary.metrics[5];

      assert_eq!(triglyceride.chart_value, None);
      assert_eq!(triglyceride.label(), "-");
      assert_eq!(triglyceride.color(), StatusColor::Gray);
   }

   #[test]
   fn test_概要リストが空ならサマリーは作れない() {
      assert!(CheckupSummary::latest(&HealthCheckupData::default()).is_none());
   }

   #[test]
   fn test_履歴は届いた順で先頭に最新の印が付く() {
      let history = CheckupHistory::from_data(&data());

      assert_eq!(history.patient_name, "홍길동");
      let dates: Vec<_> = history
         .entries
         .iter()
         .map(|e| (e.checkup_date.as_str(), e.is_latest))
         .collect();
      assert_eq!(dates, vec![("2023-05-10", true), ("2024-05-12", false)]);
   }

   #[test]
   fn test_降順で届いた履歴は最新の健診に印が付く() {
      let mut data = data();
      data.overview_list.reverse();

      let history = CheckupHistory::from_data(&data);

      let dates: Vec<_> = history
         .entries
         .iter()
         .map(|e| (e.checkup_date.as_str(), e.is_latest))
         .collect();
      assert_eq!(dates, vec![("2024-05-12", true), ("2023-05-10", false)]);
   }

   #[test]
   fn test_履歴の受診機関名が無ければプレースホルダ() {
      let history = CheckupHistory::from_data(&data());

      assert_eq!(history.entries[0].organization_name, "-");
      assert_eq!(history.entries[1].organization_name, "서울의원");
   }

   #[test]
   fn test_履歴の測定値は区分ごとにまとまる() {
      let history = CheckupHistory::from_data(&data());
      let groups: Vec<_> = history.entries[0].groups.iter().map(|g| g.group).collect();

      assert_eq!(
         groups,
         vec![MetricGroup::Body, MetricGroup::Blood, MetricGroup::Other]
      );
      let bmi = &history.entries[0].groups[0].metrics[3];
      assert_eq!(bmi.field, MetricField::Bmi);
      assert_eq!(bmi.status, MetricStatus::Caution);
   }
}
