//! # Type Inference Service
//!
//! 列のセル値から推論型を決める

use crate::domain::entities::cell::CellValue;
use crate::domain::entities::column::SourceType;

/// 型推論サービス
///
/// 表をCSVに書き出して読み直した場合と同じ型になるように推論する
pub struct TypeInferenceService;

impl TypeInferenceService {
    /// 列の推論型を返す
    ///
    /// - 全て整数で空セルがない → `int64`
    /// - 全て数値（数値文字列を含む） → `float64`（空セルを含む整数列もここ）
    /// - 全て真偽値 → `bool`
    /// - 全て日付・日時 → `datetime64[ns]`
    /// - それ以外（全て空の列を含む） → `object`
    pub fn infer(cells: &[CellValue]) -> SourceType {
        let mut has_null = false;
        let mut non_null = 0usize;
        let mut all_int = true;
        let mut all_numeric = true;
        let mut all_bool = true;
        let mut all_datetime = true;

        for cell in cells {
            if cell.is_null() {
                has_null = true;
                continue;
            }
            non_null += 1;

            let (is_int, is_numeric) = match cell {
                CellValue::Int(_) => (true, true),
                CellValue::Float(f) => (f.is_finite() && f.fract() == 0.0, f.is_finite()),
                CellValue::String(s) => {
                    let s = s.trim();
                    (s.parse::<i64>().is_ok(), s.parse::<f64>().is_ok())
                }
                _ => (false, false),
            };
            all_int &= is_int;
            all_numeric &= is_numeric;
            all_bool &= matches!(cell, CellValue::Bool(_));
            all_datetime &= matches!(cell, CellValue::DateTime(_));
        }

        if non_null == 0 {
            return SourceType::Object;
        }
        if all_int && !has_null {
            return SourceType::Int64;
        }
        if all_numeric {
            return SourceType::Float64;
        }
        if all_bool {
            return SourceType::Bool;
        }
        if all_datetime {
            return SourceType::DateTime;
        }
        SourceType::Object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn test_infer_int() {
        let cells = vec![CellValue::Int(1), CellValue::Float(2.0), s("3")];
        assert_eq!(TypeInferenceService::infer(&cells), SourceType::Int64);
    }

    #[test]
    fn test_infer_int_with_null_is_float() {
        let cells = vec![CellValue::Int(1), CellValue::Null];
        assert_eq!(TypeInferenceService::infer(&cells), SourceType::Float64);
    }

    #[test]
    fn test_infer_float() {
        let cells = vec![CellValue::Float(1.5), CellValue::Int(2), s(" 3.25 ")];
        assert_eq!(TypeInferenceService::infer(&cells), SourceType::Float64);
    }

    #[test]
    fn test_infer_bool() {
        let cells = vec![CellValue::Bool(true), CellValue::Null, CellValue::Bool(false)];
        assert_eq!(TypeInferenceService::infer(&cells), SourceType::Bool);
    }

    #[test]
    fn test_infer_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let cells = vec![CellValue::DateTime(dt), CellValue::Null];
        assert_eq!(TypeInferenceService::infer(&cells), SourceType::DateTime);
    }

    #[test]
    fn test_infer_mixed_is_object() {
        let cells = vec![CellValue::Int(1), s("abc")];
        assert_eq!(TypeInferenceService::infer(&cells), SourceType::Object);
    }

    #[test]
    fn test_infer_all_null_is_object() {
        let cells = vec![CellValue::Null, s("  ")];
        assert_eq!(TypeInferenceService::infer(&cells), SourceType::Object);
        assert_eq!(TypeInferenceService::infer(&[]), SourceType::Object);
    }
}
