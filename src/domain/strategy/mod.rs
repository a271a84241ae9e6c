//! Strategy domain — named, parameterized trading strategies used by backtests.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

pub use convert::strategies_from_wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    #[default]
    Technical,
    Fundamental,
    Ml,
    Composite,
}

impl StrategyType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Some(Self::Technical),
            "fundamental" => Some(Self::Fundamental),
            "ml" => Some(Self::Ml),
            "composite" => Some(Self::Composite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Fundamental => "fundamental",
            Self::Ml => "ml",
            Self::Composite => "composite",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Technical => "技术指标",
            Self::Fundamental => "基本面",
            Self::Ml => "机器学习",
            Self::Composite => "复合策略",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Active,
    #[default]
    Inactive,
    Testing,
}

impl StrategyStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "testing" => Some(Self::Testing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Testing => "testing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "活跃",
            Self::Inactive => "非活跃",
            Self::Testing => "测试中",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub strategy_type: StrategyType,
    pub status: StrategyStatus,
    /// Free-form parameters, e.g. `fast_period` / `slow_period` for MACD.
    pub parameters: Map<String, Value>,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Strategy {
    pub fn is_active(&self) -> bool {
        self.status == StrategyStatus::Active
    }

    /// `(label, value)` rows for a parameter table, in key order.
    pub fn parameter_rows(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .map(|(key, value)| (parameter_label(key).to_string(), parameter_value(key, value)))
            .collect()
    }
}

/// Display name for a known parameter key; unknown keys pass through.
pub fn parameter_label(key: &str) -> &str {
    match key {
        "fast_period" => "快线周期",
        "slow_period" => "慢线周期",
        "signal_period" => "信号线周期",
        "buy_threshold" => "买入阈值",
        "sell_threshold" => "卖出阈值",
        "short_period" => "短期周期",
        "long_period" => "长期周期",
        "ma_type" => "均线类型",
        "threshold" => "阈值",
        "period" => "周期",
        "overbought" => "超买线",
        "oversold" => "超卖线",
        "std_dev" => "标准差倍数",
        other => other,
    }
}

/// Thresholds and `std_dev` get two decimals; MA types get their Chinese name.
pub fn parameter_value(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) if key == "ma_type" => match s.as_str() {
            "sma" => "简单移动平均".to_string(),
            "ema" => "指数移动平均".to_string(),
            "wma" => "加权移动平均".to_string(),
            other => other.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Number(n) if key.contains("threshold") || key == "std_dev" => n
            .as_f64()
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Body of `POST /strategies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStrategy {
    pub name: String,
    pub description: String,
    pub strategy_type: StrategyType,
    pub parameters: Map<String, Value>,
    pub code: String,
}

impl NewStrategy {
    /// The server's own create rules, checked before sending.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::NameTooLong);
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooLong);
        }
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyCode);
        }
        Ok(())
    }
}

/// Body of `PUT /strategies/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StrategyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Filters for `GET /strategies`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyQuery {
    pub page: u32,
    /// Clamped to `1..=100` by the server.
    pub size: u32,
    pub status: Option<StrategyStatus>,
    pub strategy_type: Option<StrategyType>,
    pub keyword: Option<String>,
}

impl Default for StrategyQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 20,
            status: None,
            strategy_type: None,
            keyword: None,
        }
    }
}

impl StrategyQuery {
    pub fn to_query_string(&self) -> String {
        let mut parts = vec![
            format!("page={}", self.page.max(1)),
            format!("size={}", self.size.clamp(1, 100)),
        ];
        if let Some(status) = self.status {
            parts.push(format!("status={}", status.as_str()));
        }
        if let Some(kind) = self.strategy_type {
            parts.push(format!("type={}", kind.as_str()));
        }
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            parts.push(format!("keyword={}", urlencoding::encode(keyword)));
        }
        parts.join("&")
    }
}

/// One page of strategies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyPage {
    pub total: u32,
    pub page: u32,
    pub size: u32,
    pub items: Vec<Strategy>,
}

/// Aggregate results of a strategy's past backtests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyPerformance {
    pub strategy_id: String,
    pub total_return: Option<f64>,
    pub annual_return: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub win_rate: Option<f64>,
    pub total_trades: Option<u32>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong,
    DescriptionTooLong,
    EmptyCode,
    MissingId,
    UnknownType(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "策略名称不能为空"),
            ValidationError::NameTooLong => {
                write!(f, "策略名称长度不能超过{}个字符", MAX_NAME_CHARS)
            }
            ValidationError::DescriptionTooLong => {
                write!(f, "策略描述长度不能超过{}个字符", MAX_DESCRIPTION_CHARS)
            }
            ValidationError::EmptyCode => write!(f, "策略代码不能为空"),
            ValidationError::MissingId => write!(f, "Missing strategy id"),
            ValidationError::UnknownType(t) => write!(f, "无效的策略类型: {}", t),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_strategy_validation() {
        let mut s = NewStrategy {
            name: "MACD金叉策略".into(),
            code: "macd".into(),
            ..NewStrategy::default()
        };
        assert_eq!(s.validate(), Ok(()));

        s.name = "   ".into();
        assert_eq!(s.validate(), Err(ValidationError::EmptyName));

        s.name = "策".repeat(101);
        assert_eq!(s.validate(), Err(ValidationError::NameTooLong));

        s.name = "ok".into();
        s.code = String::new();
        assert_eq!(s.validate().unwrap_err().to_string(), "策略代码不能为空");
    }

    #[test]
    fn test_parameter_rows() {
        let mut parameters = Map::new();
        parameters.insert("buy_threshold".into(), json!(0));
        parameters.insert("fast_period".into(), json!(12));
        parameters.insert("ma_type".into(), json!("ema"));
        parameters.insert("custom".into(), json!(true));
        let strategy = Strategy {
            id: "macd_strategy".into(),
            name: "MACD金叉策略".into(),
            description: String::new(),
            strategy_type: StrategyType::Technical,
            status: StrategyStatus::Active,
            parameters,
            created_by: None,
            created_at: None,
            updated_at: None,
        };
        let rows = strategy.parameter_rows();
        assert!(rows.contains(&("买入阈值".into(), "0.00".into())));
        assert!(rows.contains(&("快线周期".into(), "12".into())));
        assert!(rows.contains(&("均线类型".into(), "指数移动平均".into())));
        assert!(rows.contains(&("custom".into(), "true".into())));
    }

    #[test]
    fn test_query_string() {
        assert_eq!(StrategyQuery::default().to_query_string(), "page=1&size=20");
        let q = StrategyQuery {
            page: 0,
            size: 500,
            status: Some(StrategyStatus::Active),
            strategy_type: Some(StrategyType::Ml),
            keyword: Some(" 均线 ".into()),
        };
        assert_eq!(
            q.to_query_string(),
            "page=1&size=100&status=active&type=ml&keyword=%E5%9D%87%E7%BA%BF"
        );
    }
}
