//! 通用工具函数

use chrono::NaiveDate;

use crate::error::{HospitalError, Result};

/// 日期格式 YYYY-MM-DD
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 严格解析 YYYY-MM-DD 日期
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // chrono 接受不补零的月份和日期，这里要求固定长度
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// 宽松解析查询参数中的整数，非法值视为未提供
pub fn parse_query_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    /// 从查询参数构造分页，`page` 与 `pageSize` 均须大于0
    pub fn from_query(
        page: Option<&str>,
        page_size: Option<&str>,
        default_size: i64,
        max_size: i64,
    ) -> Result<Self> {
        let page = parse_query_int(page).unwrap_or(1);
        let page_size = parse_query_int(page_size).unwrap_or(default_size);

        if page < 1 || page_size < 1 {
            return Err(HospitalError::bad_request(
                "INVALID_PAGINATION",
                "分页参数必须大于0",
            ));
        }

        Ok(Self {
            page,
            page_size: page_size.min(max_size.max(1)),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// 统计接口的日期窗口，缺失的一端视为不限
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// 解析 `startDate` / `endDate` 查询参数
    pub fn from_query(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = Self::parse_bound("startDate", start)?;
        let end = Self::parse_bound("endDate", end)?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(HospitalError::bad_request(
                    "INVALID_DATE_RANGE",
                    "startDate 不能晚于 endDate",
                ));
            }
        }

        Ok(Self { start, end })
    }

    fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => parse_date(v).map(Some).ok_or_else(|| {
                HospitalError::bad_request(
                    "INVALID_DATE_FORMAT",
                    format!("{name} 格式不正确，应该是 'YYYY-MM-DD'"),
                )
            }),
        }
    }
}

/// 构造大小写不敏感的包含匹配模式，转义 LIKE 通配符
pub fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
