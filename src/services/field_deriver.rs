//! 派生字段服务 - 业务能力层
//!
//! 只负责"一周各天时数求和"这一能力

use crate::models::Record;
use serde_json::Value as JsonValue;
use tracing::debug;

/// 一周七天的时数字段，按求和顺序排列
pub const WEEKDAY_HOUR_FIELDS: [&str; 7] = [
    "hora_lunes",
    "hora_martes",
    "hora_miercoles",
    "hora_jueves",
    "hora_viernes",
    "hora_sabado",
    "hora_domingo",
];

/// 派生的合计字段
pub const TOTAL_HOURS_FIELD: &str = "hora_total";

/// 派生字段计算
///
/// 缺失或无法解析为数字的子字段按 0 计入，不产生错误。
#[derive(Debug, Clone)]
pub struct FieldDeriver {
    source_fields: Vec<String>,
    target_field: String,
}

impl FieldDeriver {
    pub fn new(source_fields: Vec<String>, target_field: impl Into<String>) -> Self {
        Self {
            source_fields,
            target_field: target_field.into(),
        }
    }

    /// 一周时数合计：`hora_lunes` … `hora_domingo` → `hora_total`
    pub fn weekly_hours() -> Self {
        Self::new(
            WEEKDAY_HOUR_FIELDS.iter().map(|s| s.to_string()).collect(),
            TOTAL_HOURS_FIELD,
        )
    }

    pub fn target_field(&self) -> &str {
        &self.target_field
    }

    /// 返回带合计字段的新记录，原记录不变
    pub fn derive(&self, record: &Record) -> Record {
        let total: f64 = self
            .source_fields
            .iter()
            .map(|field| match record.get(field) {
                Some(value) => parse_number(value).unwrap_or_else(|| {
                    debug!("字段 {} 的值 {} 不是数字，按 0 计", field, value);
                    0.0
                }),
                None => 0.0,
            })
            .sum();

        let mut derived = record.clone();
        derived.insert(self.target_field.clone(), format_total(total));
        derived
    }
}

impl Default for FieldDeriver {
    fn default() -> Self {
        Self::weekly_hours()
    }
}

/// 尽力解析数字：JSON 数字或去掉空白后的数字字符串，只接受有限值
fn parse_number(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// 合计按浮点格式输出：整数值带 `.0`
fn format_total(total: f64) -> String {
    if total.fract() == 0.0 && total.abs() < 1e16 {
        format!("{:.1}", total)
    } else {
        total.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn total_of(record: &Record) -> String {
        FieldDeriver::weekly_hours()
            .derive(record)
            .get_text(TOTAL_HOURS_FIELD)
            .unwrap()
    }

    #[test]
    fn test_non_numeric_contributes_zero() {
        let record = Record::new()
            .with("estudiante", "Ana")
            .with("numero_semana", "5")
            .with("hora_lunes", "8")
            .with("hora_martes", "abc");

        assert_eq!(total_of(&record), "8.0");
    }

    #[test]
    fn test_adds_exactly_one_field() {
        let record = Record::new().with("estudiante", "Ana");
        let derived = FieldDeriver::weekly_hours().derive(&record);

        assert_eq!(derived.len(), record.len() + 1);
        assert_eq!(derived.get("estudiante"), record.get("estudiante"));
        assert_eq!(derived.get_text(TOTAL_HOURS_FIELD).as_deref(), Some("0.0"));
    }

    #[test]
    fn test_mixed_value_kinds() {
        let record = Record::new()
            .with("hora_lunes", json!(2))
            .with("hora_martes", json!(1.5))
            .with("hora_miercoles", " 3 ")
            .with("hora_jueves", json!(null))
            .with("hora_viernes", json!(true))
            .with("hora_sabado", "NaN")
            .with("hora_domingo", json!([4]));

        assert_eq!(total_of(&record), "6.5");
    }

    #[test]
    fn test_all_seven_days_are_summed() {
        let mut record = Record::new();
        for field in WEEKDAY_HOUR_FIELDS {
            record.insert(field, 1);
        }
        assert_eq!(total_of(&record), "7.0");
    }

    #[test]
    fn test_input_is_not_modified() {
        let record = Record::new().with("hora_lunes", "4");
        let _ = FieldDeriver::weekly_hours().derive(&record);
        assert!(!record.contains(TOTAL_HOURS_FIELD));
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(0.0), "0.0");
        assert_eq!(format_total(12.0), "12.0");
        assert_eq!(format_total(7.25), "7.25");
        assert_eq!(format_total(-3.0), "-3.0");
    }
}
