//! Stock domain — basic info, listings, search suggestions.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::{StockCode, StockCodeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Basic reference data for one listed stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBasic {
    pub ts_code: StockCode,
    pub symbol: String,
    pub name: String,
    pub area: Option<String>,
    pub industry: Option<String>,
    pub market: Option<String>,
    /// Listing date, normalized to `YYYY-MM-DD`.
    pub list_date: Option<String>,
}

impl StockBasic {
    /// Placeholder used when the basic-info request fails: the locally known
    /// name for well-known codes, else `股票<symbol>`.
    pub fn fallback(code: &StockCode) -> Self {
        let name = local_name(code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("股票{}", code.symbol()));
        Self {
            ts_code: code.clone(),
            symbol: code.symbol().to_string(),
            name,
            area: None,
            industry: None,
            market: None,
            list_date: None,
        }
    }

    /// Suggestion / search-field text: `贵州茅台 (600519.SH)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.ts_code)
    }
}

/// A page of the stock listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockList {
    pub total: usize,
    pub stocks: Vec<StockBasic>,
}

/// Outcome of `POST /stocks/refresh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshResult {
    pub message: String,
    pub count: u64,
}

lazy_static::lazy_static! {
    /// Names of frequently viewed stocks, used when basic info is unavailable.
    static ref LOCAL_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("000001.SZ", "平安银行"),
        ("000002.SZ", "万科A"),
        ("000858.SZ", "五粮液"),
        ("000876.SZ", "新希望"),
        ("000895.SZ", "双汇发展"),
        ("000938.SZ", "紫光股份"),
        ("002304.SZ", "洋河股份"),
        ("002415.SZ", "海康威视"),
        ("002594.SZ", "比亚迪"),
        ("002714.SZ", "牧原股份"),
        ("300015.SZ", "爱尔眼科"),
        ("300059.SZ", "东方财富"),
        ("300142.SZ", "沃森生物"),
        ("300750.SZ", "宁德时代"),
        ("600000.SH", "浦发银行"),
        ("600009.SH", "上海机场"),
        ("600031.SH", "三一重工"),
        ("600036.SH", "招商银行"),
        ("600104.SH", "上汽集团"),
        ("600196.SH", "复星医药"),
        ("600276.SH", "恒瑞医药"),
        ("600309.SH", "万华化学"),
        ("600436.SH", "片仔癀"),
        ("600519.SH", "贵州茅台"),
        ("600690.SH", "海尔智家"),
        ("600703.SH", "三安光电"),
        ("600745.SH", "闻泰科技"),
        ("600809.SH", "山西汾酒"),
        ("600887.SH", "伊利股份"),
        ("600893.SH", "航发动力"),
        ("601012.SH", "隆基绿能"),
        ("601166.SH", "兴业银行"),
        ("601318.SH", "中国平安"),
        ("601888.SH", "中国中免"),
        ("688036.SH", "传音控股"),
        ("688111.SH", "金山办公"),
        ("688599.SH", "天合光能"),
        ("688981.SH", "中芯国际"),
    ]);
}

/// Locally known display name for `code`, if any.
pub fn local_name(code: &StockCode) -> Option<&'static str> {
    LOCAL_NAMES.get(code.as_str()).copied()
}

/// Errors converting a wire stock record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Code(StockCodeError),
    MissingName(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Code(err) => write!(f, "Stock code: {}", err),
            ValidationError::MissingName(code) => write!(f, "Missing name for {}", code),
        }
    }
}

impl std::error::Error for ValidationError {}
