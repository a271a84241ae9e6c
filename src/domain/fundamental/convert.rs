//! Conversions from fundamental wire types.

use super::wire::*;
use super::*;
use crate::chart::normalize::normalize_date;

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|d| NaiveDate::parse_from_str(&normalize_date(d), "%Y-%m-%d").ok())
}

impl From<IncomeStatementResponse> for IncomeStatement {
    fn from(w: IncomeStatementResponse) -> Self {
        Self {
            ann_date: parse_date(w.ann_date.as_deref()),
            end_date: parse_date(w.end_date.as_deref()),
            report_type: w.report_type.filter(|s| !s.is_empty()),
            basic_eps: w.basic_eps,
            total_revenue: w.total_revenue,
            revenue: w.revenue,
            total_profit: w.total_profit,
            net_income: w.n_income,
            net_income_attr_parent: w.n_income_attr_p,
        }
    }
}

impl From<BalanceSheetResponse> for BalanceSheet {
    fn from(w: BalanceSheetResponse) -> Self {
        Self {
            end_date: parse_date(w.end_date.as_deref()),
            total_share: w.total_share,
            total_assets: w.total_assets,
            total_liabilities: w.total_liab,
            total_equity: w.total_hldr_eqy_inc_min_int,
        }
    }
}

impl From<CashFlowResponse> for CashFlowStatement {
    fn from(w: CashFlowResponse) -> Self {
        Self {
            end_date: parse_date(w.end_date.as_deref()),
            operating: w.net_cash_oper_act,
            investing: w.net_cash_inv_act,
            financing: w.net_cash_fin_act,
        }
    }
}

impl From<DailyBasicResponse> for DailyBasic {
    fn from(w: DailyBasicResponse) -> Self {
        Self {
            trade_date: parse_date(w.trade_date.as_deref()),
            close: w.close,
            turnover_rate: w.turnover_rate,
            pe: w.pe,
            pe_ttm: w.pe_ttm,
            pb: w.pb,
            ps: w.ps,
            total_mv: w.total_mv,
            circ_mv: w.circ_mv,
        }
    }
}

impl From<FundamentalResponse> for FundamentalData {
    /// A `stock_basic` with an invalid code is dropped rather than failing
    /// the whole payload.
    fn from(w: FundamentalResponse) -> Self {
        let stock_basic = w.stock_basic.and_then(|b| match StockBasic::try_from(b) {
            Ok(basic) => Some(basic),
            Err(e) => {
                tracing::warn!("dropping fundamental stock_basic: {}", e);
                None
            }
        });
        Self {
            stock_basic,
            income: w.income_statement.map(Into::into),
            balance: w.balance_sheet.map(Into::into),
            cash_flow: w.cash_flow_statement.map(Into::into),
            daily_basic: w.daily_basic.map(Into::into),
        }
    }
}
