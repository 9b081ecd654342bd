//! 列表查询组合器
//!
//! 基础查询 + 可选联表 + 仅在参数出现时追加的过滤条件（全部以 AND 连接）+ 偏移分页。
//! 总数在分页之前单独统计。

use chrono::NaiveDate;
use hospital_core::utils::{contains_pattern, Pagination};
use hospital_core::{Page, Result};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};
use tracing::debug;

/// 单个过滤条件，列名为带表别名的静态字符串
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// 等值
    Eq(&'static str, i32),
    /// 大小写不敏感的包含匹配
    Contains(&'static str, String),
    /// 日期下界（含）
    OnOrAfter(&'static str, NaiveDate),
    /// 日期上界（含）
    OnOrBefore(&'static str, NaiveDate),
    IsNull(&'static str),
}

impl Filter {
    fn push_to(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Filter::Eq(column, value) => {
                qb.push(*column).push(" = ").push_bind(*value);
            }
            Filter::Contains(column, value) => {
                qb.push(*column)
                    .push(" ILIKE ")
                    .push_bind(contains_pattern(value));
            }
            Filter::OnOrAfter(column, date) => {
                qb.push(*column).push(" >= ").push_bind(*date);
            }
            Filter::OnOrBefore(column, date) => {
                qb.push(*column).push(" <= ").push_bind(*date);
            }
            Filter::IsNull(column) => {
                qb.push(*column).push(" IS NULL");
            }
        }
    }
}

/// 以 WHERE / AND 追加全部过滤条件
pub fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        filter.push_to(qb);
    }
}

/// 列表查询
#[derive(Debug, Clone)]
pub struct ListQuery {
    select: &'static str,
    from: &'static str,
    count_from: Option<&'static str>,
    group_by: Option<&'static str>,
    order_by: &'static str,
    filters: Vec<Filter>,
}

impl ListQuery {
    /// `select` 为选择列表，`from` 为 FROM 子句（不含 FROM 关键字，可包含联表）
    pub fn new(select: &'static str, from: &'static str) -> Self {
        Self {
            select,
            from,
            count_from: None,
            group_by: None,
            order_by: "1",
            filters: Vec::new(),
        }
    }

    /// 统计总数时使用的 FROM 子句，用于主查询含一对多联表的情况
    pub fn count_from(mut self, from: &'static str) -> Self {
        self.count_from = Some(from);
        self
    }

    pub fn group_by(mut self, group_by: &'static str) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// 仅当值存在时追加过滤条件
    pub fn filter_opt<T>(self, value: Option<T>, make: impl FnOnce(T) -> Filter) -> Self {
        match value {
            Some(v) => self.filter(make(v)),
            None => self,
        }
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn count_builder(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ");
        qb.push(self.count_from.unwrap_or(self.from));
        push_filters(&mut qb, &self.filters);
        qb
    }

    pub fn page_builder(&self, pagination: &Pagination) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(self.select).push(" FROM ").push(self.from);
        push_filters(&mut qb, &self.filters);
        if let Some(group_by) = self.group_by {
            qb.push(" GROUP BY ").push(group_by);
        }
        qb.push(" ORDER BY ").push(self.order_by);
        qb.push(" LIMIT ").push_bind(pagination.limit());
        qb.push(" OFFSET ").push_bind(pagination.offset());
        qb
    }

    /// 统计总数并读取当前页
    pub async fn fetch_page<T>(&self, conn: &mut PgConnection, pagination: Pagination) -> Result<Page<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut count = self.count_builder();
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

        let mut page = self.page_builder(&pagination);
        debug!(sql = page.sql(), total, "list query");
        let list: Vec<T> = page.build_query_as::<T>().fetch_all(&mut *conn).await?;

        Ok(Page {
            total,
            page: pagination.page,
            page_size: pagination.page_size,
            list,
        })
    }
}
