//! Wire types for `GET /stocks/{code}/fundamental`.

use crate::domain::stock::wire::StockBasicResponse;
use crate::shared::serde_util::lenient_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeStatementResponse {
    #[serde(default)]
    pub ann_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub report_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub basic_eps: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub total_revenue: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub revenue: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub total_profit: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub n_income: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub n_income_attr_p: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheetResponse {
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub total_share: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub total_assets: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub total_liab: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub total_hldr_eqy_inc_min_int: Option<Decimal>,
}

/// Field names differ between server versions; the older spellings are aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowResponse {
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(
        default,
        alias = "n_cashflow_operate_a",
        alias = "n_cashflow_act",
        deserialize_with = "lenient_decimal::deserialize"
    )]
    pub net_cash_oper_act: Option<Decimal>,
    #[serde(
        default,
        alias = "n_cashflow_invest_a",
        alias = "n_cashflow_inv_act",
        deserialize_with = "lenient_decimal::deserialize"
    )]
    pub net_cash_inv_act: Option<Decimal>,
    #[serde(
        default,
        alias = "n_cash_flows_fnc_act",
        alias = "n_cashflow_fin_act",
        deserialize_with = "lenient_decimal::deserialize"
    )]
    pub net_cash_fin_act: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyBasicResponse {
    #[serde(default)]
    pub trade_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub close: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub turnover_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub pe: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub pe_ttm: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub pb: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub ps: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub total_mv: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub circ_mv: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalResponse {
    #[serde(default)]
    pub stock_basic: Option<StockBasicResponse>,
    #[serde(default)]
    pub income_statement: Option<IncomeStatementResponse>,
    #[serde(default)]
    pub balance_sheet: Option<BalanceSheetResponse>,
    #[serde(default)]
    pub cash_flow_statement: Option<CashFlowResponse>,
    #[serde(default)]
    pub daily_basic: Option<DailyBasicResponse>,
}
