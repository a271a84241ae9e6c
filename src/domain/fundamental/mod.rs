//! Fundamental domain — latest financial statements and valuation metrics.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::domain::stock::StockBasic;
use crate::shared::fmt::decimal::{display_percent_opt, display_yuan_opt};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── Statements ──────────────────────────────────────────────────────────────

/// Income statement. Amounts in yuan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub ann_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub report_type: Option<String>,
    pub basic_eps: Option<Decimal>,
    pub total_revenue: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub total_profit: Option<Decimal>,
    pub net_income: Option<Decimal>,
    pub net_income_attr_parent: Option<Decimal>,
}

impl IncomeStatement {
    /// Net income over total revenue, in percent.
    pub fn net_margin(&self) -> Option<Decimal> {
        let revenue = self.total_revenue.or(self.revenue)?;
        if revenue.is_zero() {
            return None;
        }
        Some(self.net_income? / revenue * Decimal::ONE_HUNDRED)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub end_date: Option<NaiveDate>,
    pub total_share: Option<Decimal>,
    pub total_assets: Option<Decimal>,
    pub total_liabilities: Option<Decimal>,
    pub total_equity: Option<Decimal>,
}

impl BalanceSheet {
    /// Liabilities over assets, in percent.
    pub fn debt_ratio(&self) -> Option<Decimal> {
        let assets = self.total_assets?;
        if assets.is_zero() {
            return None;
        }
        Some(self.total_liabilities? / assets * Decimal::ONE_HUNDRED)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub end_date: Option<NaiveDate>,
    pub operating: Option<Decimal>,
    pub investing: Option<Decimal>,
    pub financing: Option<Decimal>,
}

impl CashFlowStatement {
    pub fn free_cash_flow(&self) -> Option<Decimal> {
        Some(self.operating? + self.investing?)
    }
}

/// Daily valuation snapshot. `total_mv`/`circ_mv` are in 万元.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBasic {
    pub trade_date: Option<NaiveDate>,
    pub close: Option<Decimal>,
    pub turnover_rate: Option<Decimal>,
    pub pe: Option<Decimal>,
    pub pe_ttm: Option<Decimal>,
    pub pb: Option<Decimal>,
    pub ps: Option<Decimal>,
    pub total_mv: Option<Decimal>,
    pub circ_mv: Option<Decimal>,
}

// ─── FundamentalData ─────────────────────────────────────────────────────────

/// Everything the fundamental tab shows. Each part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalData {
    pub stock_basic: Option<StockBasic>,
    pub income: Option<IncomeStatement>,
    pub balance: Option<BalanceSheet>,
    pub cash_flow: Option<CashFlowStatement>,
    pub daily_basic: Option<DailyBasic>,
}

impl FundamentalData {
    pub fn is_empty(&self) -> bool {
        self.stock_basic.is_none()
            && self.income.is_none()
            && self.balance.is_none()
            && self.cash_flow.is_none()
            && self.daily_basic.is_none()
    }

    /// Label/value rows for the summary card, `--` for missing values.
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        let income = self.income.clone().unwrap_or_default();
        let balance = self.balance.clone().unwrap_or_default();
        let cash = self.cash_flow.clone().unwrap_or_default();
        let market = self.daily_basic.clone().unwrap_or_default();
        let wan = Decimal::from(10_000);

        vec![
            ("营业总收入", display_yuan_opt(income.total_revenue.as_ref())),
            ("净利润", display_yuan_opt(income.net_income.as_ref())),
            ("净利率", display_percent_opt(income.net_margin().as_ref())),
            ("总资产", display_yuan_opt(balance.total_assets.as_ref())),
            ("资产负债率", display_percent_opt(balance.debt_ratio().as_ref())),
            ("经营现金流", display_yuan_opt(cash.operating.as_ref())),
            ("市盈率(TTM)", decimal_or_dash(market.pe_ttm.as_ref())),
            ("市净率", decimal_or_dash(market.pb.as_ref())),
            (
                "总市值",
                display_yuan_opt(market.total_mv.map(|v| v * wan).as_ref()),
            ),
        ]
    }
}

fn decimal_or_dash(value: Option<&Decimal>) -> String {
    value
        .map(crate::shared::fmt::decimal::display)
        .unwrap_or_else(|| "--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_ratios() {
        let income = IncomeStatement {
            total_revenue: Some(d("1000")),
            net_income: Some(d("250")),
            ..Default::default()
        };
        assert_eq!(income.net_margin(), Some(d("25")));

        let balance = BalanceSheet {
            total_assets: Some(d("0")),
            total_liabilities: Some(d("10")),
            ..Default::default()
        };
        assert_eq!(balance.debt_ratio(), None);

        let cash = CashFlowStatement {
            operating: Some(d("500")),
            investing: Some(d("-200")),
            ..Default::default()
        };
        assert_eq!(cash.free_cash_flow(), Some(d("300")));
    }

    #[test]
    fn test_summary_rows_dash_for_missing() {
        let data = FundamentalData {
            income: Some(IncomeStatement {
                total_revenue: Some(d("150000000000")),
                ..Default::default()
            }),
            ..Default::default()
        };
        let rows = data.summary_rows();
        assert_eq!(rows[0], ("营业总收入", "1500.00亿元".to_string()));
        assert_eq!(rows[1].1, "--");
        assert!(FundamentalData::default().is_empty());
        assert!(!data.is_empty());
    }
}
