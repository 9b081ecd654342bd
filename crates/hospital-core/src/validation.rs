//! 字段校验
//!
//! 每条规则都是一个返回 `Result<T, FieldError>` 的函数。创建接口通过 [`Validator`]
//! 收集全部错误后一次性返回；更新接口直接用 `?` 在第一个错误处返回。

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HospitalError;
use crate::models::Gender;
use crate::utils::parse_date;

/// 名称类字段的最大长度
pub const NAME_MAX_LEN: usize = 50;
/// 其它文本字段的最大长度
pub const TEXT_MAX_LEN: usize = 255;

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip)]
    pub code: String,
}

impl FieldError {
    pub fn new(field: &str, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            code: code.into(),
        }
    }

    /// 使用默认错误码 `INVALID_<FIELD>`
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::new(field, format!("INVALID_{}", field.to_ascii_uppercase()), message)
    }
}

/// 请求体中的标量值，兼容 `"12"` 与 `12` 两种写法
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Scalar::Int(n) => i32::try_from(*n).ok(),
            Scalar::Float(f) if f.fract() == 0.0 => i32::try_from(*f as i64).ok(),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Scalar::Int(n) => Some(Decimal::from(*n)),
            Scalar::Float(f) => Decimal::from_f64(*f),
            Scalar::Text(s) => Decimal::from_str(s.trim()).ok(),
            Scalar::Other(_) => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// 错误收集器
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录规则结果，失败时保存错误并返回 `None`
    pub fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    pub fn push(&mut self, err: FieldError) {
        self.errors.push(err);
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_error(self) -> HospitalError {
        HospitalError::Validation(self.errors)
    }

    pub fn finish(self) -> crate::Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

fn raw_text<'a>(field: &str, value: Option<&'a Scalar>, label: &str) -> Result<&'a str, FieldError> {
    match value {
        None => Ok(""),
        Some(Scalar::Text(s)) => Ok(s.trim()),
        Some(_) => Err(FieldError::invalid(field, format!("{label}必须为字符串"))),
    }
}

/// 必填文本，去除首尾空白
pub fn required_text(
    field: &str,
    value: Option<&Scalar>,
    label: &str,
    max_len: usize,
) -> Result<String, FieldError> {
    let text = raw_text(field, value, label)?;
    if text.is_empty() {
        return Err(FieldError::invalid(field, format!("{label}不能为空")));
    }
    if text.chars().count() > max_len {
        return Err(FieldError::invalid(
            field,
            format!("{label}长度不能超过{max_len}个字符"),
        ));
    }
    Ok(text.to_string())
}

/// 可选文本，空字符串视为未填写
pub fn optional_text(
    field: &str,
    value: Option<&Scalar>,
    label: &str,
    max_len: usize,
) -> Result<Option<String>, FieldError> {
    let text = raw_text(field, value, label)?;
    if text.is_empty() {
        return Ok(None);
    }
    if text.chars().count() > max_len {
        return Err(FieldError::invalid(
            field,
            format!("{label}长度不能超过{max_len}个字符"),
        ));
    }
    Ok(Some(text.to_string()))
}

pub fn integer(field: &str, value: Option<&Scalar>, label: &str) -> Result<i32, FieldError> {
    value
        .and_then(Scalar::as_i32)
        .ok_or_else(|| FieldError::invalid(field, format!("{label}必须为整数")))
}

pub fn positive_integer(field: &str, value: Option<&Scalar>, label: &str) -> Result<i32, FieldError> {
    let n = integer(field, value, label)?;
    if n <= 0 {
        return Err(FieldError::invalid(field, format!("{label}必须大于0")));
    }
    Ok(n)
}

/// 金额：大于0，至多两位小数，不超过 `NUMERIC(10, 2)` 的上限
pub fn fee(field: &str, value: Option<&Scalar>) -> Result<Decimal, FieldError> {
    let amount = value
        .and_then(Scalar::as_decimal)
        .ok_or_else(|| FieldError::invalid(field, "费用必须为正数"))?
        .normalize();
    if amount.scale() > 2 {
        return Err(FieldError::invalid(field, "费用最多保留两位小数"));
    }
    if amount <= Decimal::ZERO {
        return Err(FieldError::invalid(field, "费用必须大于0"));
    }
    if amount > fee_max() {
        return Err(FieldError::invalid(field, "费用不能超过99999999.99"));
    }
    Ok(amount)
}

fn fee_max() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

pub fn required_date(field: &str, value: Option<&Scalar>, label: &str) -> Result<NaiveDate, FieldError> {
    let text = raw_text(field, value, label)?;
    if text.is_empty() {
        return Err(FieldError::invalid(field, format!("{label}不能为空")));
    }
    parse_date(text).ok_or_else(|| {
        FieldError::invalid(field, format!("{label}格式不正确，应该为 YYYY-MM-DD"))
    })
}

pub fn optional_date(
    field: &str,
    value: Option<&Scalar>,
    label: &str,
) -> Result<Option<NaiveDate>, FieldError> {
    let text = raw_text(field, value, label)?;
    if text.is_empty() {
        return Ok(None);
    }
    parse_date(text).map(Some).ok_or_else(|| {
        FieldError::invalid(field, format!("{label}格式不正确，应该为 YYYY-MM-DD"))
    })
}

fn identity_no_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{18}$").expect("valid identity pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^1[0-9]{10}$").expect("valid phone pattern"))
}

/// 身份证号：18位数字
pub fn identity_no(field: &str, value: Option<&Scalar>) -> Result<String, FieldError> {
    let text = raw_text(field, value, "身份证号")?;
    if !identity_no_pattern().is_match(text) {
        return Err(FieldError::invalid(field, "身份证号必须为18位数字"));
    }
    Ok(text.to_string())
}

pub fn gender(field: &str, value: Option<&Scalar>) -> Result<Gender, FieldError> {
    let text = raw_text(field, value, "性别")?;
    text.parse()
        .map_err(|_| FieldError::invalid(field, "性别必须为'男'或'女'"))
}

/// 手机号：以1开头的11位数字，空值表示清空
pub fn phone(field: &str, value: Option<&Scalar>) -> Result<Option<String>, FieldError> {
    let text = raw_text(field, value, "手机号")?;
    if text.is_empty() {
        return Ok(None);
    }
    if !phone_pattern().is_match(text) {
        return Err(FieldError::invalid(field, "手机号格式不正确"));
    }
    Ok(Some(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Scalar {
        Scalar::from(s)
    }

    #[test]
    fn test_required_text() {
        assert_eq!(
            required_text("Name", Some(&text("  张三 ")), "姓名", NAME_MAX_LEN).unwrap(),
            "张三"
        );

        let err = required_text("Name", None, "姓名", NAME_MAX_LEN).unwrap_err();
        assert_eq!(err.code, "INVALID_NAME");
        assert_eq!(err.message, "姓名不能为空");

        let long = "床".repeat(51);
        let err = required_text("WardName", Some(&text(&long)), "病房名称", NAME_MAX_LEN).unwrap_err();
        assert_eq!(err.message, "病房名称长度不能超过50个字符");

        let err = required_text("Name", Some(&Scalar::Int(3)), "姓名", NAME_MAX_LEN).unwrap_err();
        assert_eq!(err.message, "姓名必须为字符串");
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(integer("Floor", Some(&Scalar::Int(3)), "楼层").unwrap(), 3);
        assert_eq!(integer("Floor", Some(&text(" 4 ")), "楼层").unwrap(), 4);
        assert_eq!(integer("Floor", Some(&Scalar::Float(5.0)), "楼层").unwrap(), 5);
        assert!(integer("Floor", Some(&Scalar::Float(5.5)), "楼层").is_err());
        assert!(integer("Floor", Some(&text("三楼")), "楼层").is_err());
        assert!(integer("Floor", None, "楼层").is_err());

        let err = positive_integer("Capacity", Some(&Scalar::Int(0)), "床位容量").unwrap_err();
        assert_eq!(err.message, "床位容量必须大于0");
    }

    #[test]
    fn test_fee() {
        assert_eq!(
            fee("Fee", Some(&Scalar::Float(12.5))).unwrap(),
            Decimal::new(1250, 2)
        );
        assert_eq!(fee("Fee", Some(&text("30"))).unwrap(), Decimal::from(30));
        assert_eq!(fee("Fee", Some(&Scalar::Int(0))).unwrap_err().message, "费用必须大于0");
        assert_eq!(fee("Fee", Some(&text("abc"))).unwrap_err().message, "费用必须为正数");
        assert_eq!(fee("Fee", None).unwrap_err().message, "费用必须为正数");
    }

    #[test]
    fn test_fee_precision_and_range() {
        let err = fee("Fee", Some(&Scalar::Float(0.001))).unwrap_err();
        assert_eq!(err.code, "INVALID_FEE");
        assert_eq!(err.message, "费用最多保留两位小数");
        assert!(fee("Fee", Some(&text("0.004"))).is_err());
        assert!(fee("Fee", Some(&text("12.345"))).is_err());
        assert_eq!(fee("Fee", Some(&text("12.340"))).unwrap(), Decimal::new(1234, 2));
        assert_eq!(fee("Fee", Some(&text("0.01"))).unwrap(), Decimal::new(1, 2));

        assert_eq!(
            fee("Fee", Some(&text("99999999.99"))).unwrap(),
            Decimal::new(9_999_999_999, 2)
        );
        let err = fee("Fee", Some(&Scalar::Int(1_000_000_000))).unwrap_err();
        assert_eq!(err.message, "费用不能超过99999999.99");
        assert!(fee("Fee", Some(&text("100000000"))).is_err());
    }

    #[test]
    fn test_dates() {
        let d = required_date("VisitDate", Some(&text("2024-01-15")), "就诊日期").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        assert_eq!(
            required_date("VisitDate", None, "就诊日期").unwrap_err().message,
            "就诊日期不能为空"
        );
        assert!(required_date("VisitDate", Some(&text("2024/01/15")), "就诊日期").is_err());
        assert!(required_date("VisitDate", Some(&text("2024-02-30")), "就诊日期").is_err());

        assert_eq!(optional_date("BirthDate", Some(&text("")), "出生日期").unwrap(), None);
        assert!(optional_date("BirthDate", Some(&text("1990-13-01")), "出生日期").is_err());
    }

    #[test]
    fn test_identity_no() {
        assert!(identity_no("IdentityNo", Some(&text("110101199001011234"))).is_ok());
        assert!(identity_no("IdentityNo", Some(&text("11010119900101123X"))).is_err());
        assert!(identity_no("IdentityNo", Some(&text("1101011990"))).is_err());
        assert!(identity_no("IdentityNo", None).is_err());
    }

    #[test]
    fn test_gender_and_phone() {
        assert_eq!(gender("Gender", Some(&text("男"))).unwrap(), Gender::Male);
        assert_eq!(gender("Gender", Some(&text("女"))).unwrap(), Gender::Female);
        assert_eq!(gender("Gender", Some(&text("M"))).unwrap_err().code, "INVALID_GENDER");

        assert_eq!(
            phone("Phone", Some(&text("13800138000"))).unwrap(),
            Some("13800138000".to_string())
        );
        assert_eq!(phone("Phone", Some(&text(""))).unwrap(), None);
        assert!(phone("Phone", Some(&text("23800138000"))).is_err());
        assert!(phone("Phone", Some(&text("1380013800"))).is_err());
    }

    #[test]
    fn test_validator_collects_in_order() {
        let mut v = Validator::new();
        let name = v.check(required_text("Name", None, "姓名", NAME_MAX_LEN));
        let floor = v.check(integer("Floor", Some(&Scalar::Int(2)), "楼层"));
        let capacity = v.check(positive_integer("Capacity", Some(&Scalar::Int(-1)), "床位容量"));

        assert_eq!(name, None);
        assert_eq!(floor, Some(2));
        assert_eq!(capacity, None);

        let fields: Vec<_> = v.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Capacity"]);

        match v.finish() {
            Err(HospitalError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_scalar_deserialize() {
        let value: Scalar = serde_json::from_str("12").unwrap();
        assert_eq!(value, Scalar::Int(12));
        let value: Scalar = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(value.as_i32(), Some(12));
        let value: Scalar = serde_json::from_str("true").unwrap();
        assert_eq!(value.as_i32(), None);
    }
}
