//! 客户列表查询与部分更新语句构建
//!
//! 把不可信的查询参数翻译为参数化 SQL：
//!
//! - 所有筛选值通过 `$N` 占位符绑定，不拼接进 SQL 文本
//! - 排序字段与方向只能取自封闭白名单，非法值静默回退为默认值
//! - 分页参数在进入 SQL 前完成归一化（默认值、下限、上限）
//!
//! 部分更新同理：可更新的列来自代码中的固定列表，请求中的任意键不会映射到 SQL。

/// 默认页码
pub const DEFAULT_PAGE: i64 = 1;
/// 默认每页条数
pub const DEFAULT_LIMIT: i64 = 10;
/// 每页条数上限
pub const MAX_LIMIT: i64 = 100;

/// 客户表的返回列，列表查询与更新语句的 RETURNING 共用
pub const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, phone_number";

/// 按 JavaScript `parseInt` 的方式解析整数参数
///
/// 忽略首尾空白，读取可选符号与前导数字，其后的字符被忽略；
/// 没有前导数字或溢出时返回 None。
pub fn parse_int_param(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// 归一化页码：缺失或非数字取默认值，小于 1 时钳制为 1
pub fn normalize_page(raw: Option<&str>) -> i64 {
    raw.and_then(parse_int_param)
        .unwrap_or(DEFAULT_PAGE)
        .max(1)
}

/// 归一化每页条数：缺失、非数字或非正数取默认值，超过上限时钳制为上限
pub fn normalize_limit(raw: Option<&str>) -> i64 {
    match raw.and_then(parse_int_param) {
        Some(limit) if limit > 0 => limit.min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

/// 转义 LIKE 通配符，使搜索词按字面子串匹配
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// 可排序字段白名单
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    FirstName,
    LastName,
    PhoneNumber,
}

impl SortField {
    /// 解析字段名，白名单外的值返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "id" => Some(Self::Id),
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "phone_number" => Some(Self::PhoneNumber),
            _ => None,
        }
    }

    /// 对应的 SQL 列（带表别名）
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "c.id",
            Self::FirstName => "c.first_name",
            Self::LastName => "c.last_name",
            Self::PhoneNumber => "c.phone_number",
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// 大小写不敏感的 `desc` 为降序，其余一律升序
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// 排序规则，来自 `field:direction` 形式的参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    /// 解析 `field:direction`，缺失方向视为升序
    ///
    /// 字段不在白名单内时整体回退为默认排序（id 升序），忽略给出的方向。
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let (field, direction) = match raw.split_once(':') {
            Some((field, direction)) => (field, direction),
            None => (raw, ""),
        };

        match SortField::parse(field) {
            Some(field) => Self {
                field,
                direction: SortDirection::parse(direction),
            },
            None => Self::default(),
        }
    }

    /// ORDER BY 子句主体
    ///
    /// 非 id 排序时追加 `c.id ASC`，保证翻页稳定
    fn order_by(&self) -> String {
        match self.field {
            SortField::Id => format!("{} {}", self.field.column(), self.direction.keyword()),
            _ => format!(
                "{} {}, c.id ASC",
                self.field.column(),
                self.direction.keyword()
            ),
        }
    }
}

/// 客户列表筛选条件（空值视为未设置）
///
/// `search` 去除首尾空白后做子串匹配；地址字段按原值精确匹配，与写入时保存的值一致。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin_code: Option<String>,
}

impl CustomerFilter {
    /// 搜索词：去除首尾空白，丢弃空白值
    pub fn normalize(value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    }

    /// 地址精确匹配值：仅丢弃空串，不改写内容
    pub fn exact(value: Option<&str>) -> Option<String> {
        value.filter(|v| !v.is_empty()).map(String::from)
    }

    /// 是否存在任意筛选条件
    pub fn is_active(&self) -> bool {
        self.search.is_some()
            || self.city.is_some()
            || self.state.is_some()
            || self.pin_code.is_some()
    }
}

/// 归一化后的客户列表查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerListQuery {
    pub page: i64,
    pub limit: i64,
    pub filter: CustomerFilter,
    pub sort: SortOrder,
}

impl Default for CustomerListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            filter: CustomerFilter::default(),
            sort: SortOrder::default(),
        }
    }
}

impl CustomerListQuery {
    /// 计算数据库查询的 offset
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.limit)
    }

    /// 构建计数与分页语句
    pub fn build(&self) -> ListStatement {
        let mut conditions = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref search) = self.filter.search {
            binds.push(format!("%{}%", escape_like(search)));
            let idx = binds.len();
            conditions.push(format!(
                "(CONCAT(c.first_name, ' ', c.last_name) ILIKE ${idx} OR c.phone_number ILIKE ${idx})"
            ));
        }

        // 每个地址条件各自独立存在即可，不要求命中同一行地址
        let address_filters = [
            ("city", &self.filter.city),
            ("state", &self.filter.state),
            ("pin_code", &self.filter.pin_code),
        ];
        for (column, value) in address_filters {
            if let Some(value) = value {
                binds.push(value.clone());
                conditions.push(format!(
                    "EXISTS (SELECT 1 FROM addresses a WHERE a.customer_id = c.id AND a.{} = ${})",
                    column,
                    binds.len()
                ));
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        ListStatement {
            where_clause,
            binds,
            order_by: self.sort.order_by(),
            limit: self.limit,
            offset: self.offset(),
        }
    }
}

/// 构建完成的列表语句
///
/// 计数语句与分页语句共享同一组筛选绑定值，分页语句在末尾追加 limit / offset。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStatement {
    where_clause: String,
    binds: Vec<String>,
    order_by: String,
    limit: i64,
    offset: i64,
}

impl ListStatement {
    /// 计数 SQL
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM customers c{}", self.where_clause)
    }

    /// 分页 SQL
    pub fn page_sql(&self) -> String {
        let next_idx = self.binds.len() + 1;
        format!(
            "SELECT {} FROM customers c{} ORDER BY {} LIMIT ${} OFFSET ${}",
            CUSTOMER_COLUMNS,
            self.where_clause,
            self.order_by,
            next_idx,
            next_idx + 1
        )
    }

    /// 筛选条件绑定值（按占位符顺序）
    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// 部分更新的字段变更集合
///
/// 列名只能是 `&'static str`，由调用方从固定的可更新字段列表中给出。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldChanges {
    assignments: Vec<(&'static str, String)>,
}

impl FieldChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个字段变更，值为 None 时跳过
    pub fn set(&mut self, column: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.assignments.push((column, value.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// 被修改的列名
    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    /// 新值（按占位符顺序）
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|(_, value)| value.as_str())
    }

    /// 查找某列的新值
    pub fn get(&self, column: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, value)| value.as_str())
    }

    /// 构建 `UPDATE ... SET ... WHERE id = $N RETURNING ...`
    ///
    /// 行 ID 是最后一个绑定参数
    pub fn update_sql(&self, table: &'static str, returning: &'static str) -> String {
        let sets: Vec<String> = self
            .assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", column, i + 1))
            .collect();

        format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            table,
            sets.join(", "),
            self.assignments.len() + 1,
            returning
        )
    }
}
