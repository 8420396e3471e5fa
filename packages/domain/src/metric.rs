//! # 測定値の判定
//!
//! 健診の測定値を、正常範囲・注意範囲の文字列と照らし合わせて
//! 4 つの判定区分に分類する。
//!
//! ## 範囲式の文法
//!
//! | 形式 | 意味 |
//! |------|------|
//! | `"<N>미만"` | x < N |
//! | `"<N>이상"` | x ≥ N |
//! | `"<A>-<B>"` | A ≤ x ≤ B（両端を含む） |
//!
//! それ以外の形式は範囲として認識せず、どの値にも一致しない。
//!
//! ## 数値の読み取り
//!
//! 文字列先頭から読める最長の 10 進小数を数値とする（`"120/80"` は 120）。
//! 範囲式の中の数値が読めない場合は NaN となり、比較は常に偽になる。
//! 判定はエラーを返さない。

use serde::{Deserialize, Serialize};
use strum::Display;

/// 判定区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricStatus {
   /// 正常範囲内
   Normal,
   /// 注意範囲内
   Caution,
   /// どちらの範囲にも入らない
   Danger,
   /// 値または正常範囲が無い、もしくは値が数値でない
   Unknown,
}

impl MetricStatus {
   /// 画面表示用ラベル
   pub fn label(self) -> &'static str {
      match self {
         Self::Normal => "정상",
         Self::Caution => "주의",
         Self::Danger => "위험",
         Self::Unknown => "-",
      }
   }

   /// 表示色
   pub fn color(self) -> StatusColor {
      match self {
         Self::Normal => StatusColor::Green,
         Self::Caution => StatusColor::Yellow,
         Self::Danger => StatusColor::Red,
         Self::Unknown => StatusColor::Gray,
      }
   }
}

/// 判定区分ごとの表示色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusColor {
   Green,
   Yellow,
   Red,
   Gray,
}

impl StatusColor {
   /// CSS 用の 16 進カラーコード
   pub fn hex(self) -> &'static str {
      match self {
         Self::Green => "#16a34a",
         Self::Yellow => "#ca8a04",
         Self::Red => "#dc2626",
         Self::Gray => "#6b7280",
      }
   }
}

/// 範囲式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeExpr {
   /// `"<N>미만"`
   LessThan(f64),
   /// `"<N>이상"`
   AtLeast(f64),
   /// `"<A>-<B>"`
   Between { min: f64, max: f64 },
}

impl RangeExpr {
   /// 範囲式をパースする
   ///
   /// 文法に合わない文字列は `None`。数値部分が読めない場合は NaN を保持した
   /// 範囲を返す（どの値にも一致しない）。
   pub fn parse(expr: &str) -> Option<Self> {
      let expr = expr.trim();

      if let Some(bound) = expr.strip_suffix("미만") {
         return Some(Self::LessThan(parse_bound(bound)));
      }
      if let Some(bound) = expr.strip_suffix("이상") {
         return Some(Self::AtLeast(parse_bound(bound)));
      }
      if let Some((min, max)) = expr.split_once('-') {
         return Some(Self::Between {
            min: parse_bound(min),
            max: parse_bound(max),
         });
      }

      None
   }

   /// 値が範囲に含まれるか
   ///
   /// NaN を含む比較は偽。`min > max` の区間はどの値も含まない。
   pub fn contains(&self, value: f64) -> bool {
      match *self {
         Self::LessThan(bound) => value < bound,
         Self::AtLeast(bound) => value >= bound,
         Self::Between { min, max } => min <= value && value <= max,
      }
   }

   /// `"<A>-<B>"` 形式か
   pub fn is_interval(&self) -> bool {
      matches!(self, Self::Between { .. })
   }
}

/// 測定値を判定区分に分類する
///
/// 1. 値・正常範囲のどちらかが空、または値が数値として読めなければ `Unknown`
/// 2. 正常範囲に含まれれば `Normal`
/// 3. 注意範囲が区間形式で、その区間に含まれれば `Caution`
/// 4. それ以外は `Danger`
///
/// ```
/// use checkup_domain::metric::{MetricStatus, classify};
///
/// assert_eq!(classify("95", "100미만", "100-125"), MetricStatus::Normal);
/// assert_eq!(classify("110", "100미만", "100-125"), MetricStatus::Caution);
/// assert_eq!(classify("130", "100미만", "100-125"), MetricStatus::Danger);
/// ```
pub fn classify(value: &str, normal_range: &str, caution_range: &str) -> MetricStatus {
   if value.trim().is_empty() || normal_range.trim().is_empty() {
      return MetricStatus::Unknown;
   }
   let Some(measured) = parse_leading_float(value) else {
      return MetricStatus::Unknown;
   };

   let in_normal = RangeExpr::parse(normal_range).is_some_and(|range| range.contains(measured));
   if in_normal {
      return MetricStatus::Normal;
   }

   let in_caution = RangeExpr::parse(caution_range)
      .filter(RangeExpr::is_interval)
      .is_some_and(|range| range.contains(measured));
   if in_caution {
      return MetricStatus::Caution;
   }

   MetricStatus::Danger
}

/// 文字列先頭の 10 進小数を読み取る
///
/// 先頭の空白を読み飛ばし、符号・整数部・小数部・指数部からなる最長の接頭辞を
/// 数値とする。数字が 1 つも無ければ `None`。
///
/// ```
/// use checkup_domain::metric::parse_leading_float;
///
/// assert_eq!(parse_leading_float("120/80"), Some(120.0));
/// assert_eq!(parse_leading_float(" 23.5kg"), Some(23.5));
/// assert_eq!(parse_leading_float("abc"), None);
/// ```
pub fn parse_leading_float(input: &str) -> Option<f64> {
   let s = input.trim_start();
   let bytes = s.as_bytes();

   let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
   let int_digits = count_digits(&bytes[end..]);
   end += int_digits;

   let mut mantissa_digits = int_digits;
   if bytes.get(end) == Some(&b'.') {
      let frac_digits = count_digits(&bytes[end + 1..]);
      if int_digits + frac_digits > 0 {
         end += 1 + frac_digits;
         mantissa_digits += frac_digits;
      }
   }
   if mantissa_digits == 0 {
      return None;
   }

   if matches!(bytes.get(end), Some(b'e' | b'E')) {
      let mut exp_end = end + 1;
      if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
         exp_end += 1;
      }
      let exp_digits = count_digits(&bytes[exp_end..]);
      if exp_digits > 0 {
         end = exp_end + exp_digits;
      }
   }

   s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
   bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn parse_bound(text: &str) -> f64 {
   parse_leading_float(text).unwrap_or(f64::NAN)
}
