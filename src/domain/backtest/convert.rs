use super::wire::{
    BacktestConfigResponse, BacktestListResponse, BacktestResponse, EquityPointResponse,
    MetricsResponse, ProgressResponse, ResultsResponse, TradeResponse,
};
use super::{
    Backtest, BacktestPage, BacktestProgress, BacktestResults, BacktestStatus, BacktestSummary,
    EquityPoint, PerformanceMetrics, Trade, TradeSide, ValidationError,
};
use crate::chart::normalize::normalize_date;
use crate::domain::strategy::strategies_from_wire;
use crate::shared::StockCode;
use chrono::NaiveDate;

/// `YYYY-MM-DD`, `YYYYMMDD`, or a timestamp in either `T` or space form.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = normalize_date(raw.trim());
    let day = day.split_whitespace().next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn percent(progress: Option<f64>) -> u8 {
    progress.map_or(0, |p| p.clamp(0.0, 100.0).round() as u8)
}

fn status(raw: Option<&str>) -> BacktestStatus {
    raw.and_then(BacktestStatus::parse).unwrap_or_default()
}

impl TryFrom<BacktestResponse> for Backtest {
    type Error = ValidationError;

    fn try_from(w: BacktestResponse) -> Result<Self, Self::Error> {
        if w.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        let symbols = w
            .symbols
            .iter()
            .filter_map(|s| {
                StockCode::parse(s)
                    .map_err(|e| tracing::warn!("backtest {}: {}", w.id, e))
                    .ok()
            })
            .collect();
        Ok(Self {
            status: status(w.status.as_deref()),
            progress: percent(w.progress),
            start_date: w.start_date.as_deref().and_then(parse_day),
            end_date: w.end_date.as_deref().and_then(parse_day),
            initial_cash: w.initial_cash.unwrap_or_default(),
            commission: w.commission.unwrap_or_default(),
            slippage: w.slippage.unwrap_or_default(),
            error_message: w.error_message.filter(|m| !m.trim().is_empty()),
            id: w.id,
            name: w.name,
            strategy_ids: w.strategy_ids,
            strategy_names: w.strategy_names,
            symbols,
            benchmark: w.benchmark.filter(|b| !b.is_empty()),
            created_at: w.created_at,
            started_at: w.started_at,
            completed_at: w.completed_at,
        })
    }
}

impl From<BacktestListResponse> for BacktestPage {
    fn from(w: BacktestListResponse) -> Self {
        let items = w
            .items
            .into_iter()
            .filter_map(|b| {
                let id = b.id.clone();
                Backtest::try_from(b)
                    .map_err(|e| tracing::warn!("skipping backtest {:?}: {}", id, e))
                    .ok()
            })
            .collect();
        Self {
            total: w.total,
            page: w.page,
            size: w.size,
            items,
        }
    }
}

impl From<ProgressResponse> for BacktestProgress {
    fn from(w: ProgressResponse) -> Self {
        let status = status(w.status.as_deref());
        // A completed run reports 100 even when the counter lagged.
        let progress = if status == BacktestStatus::Completed {
            100
        } else {
            percent(w.progress)
        };
        Self {
            backtest_id: w.backtest_id,
            status,
            progress,
            message: w.message.filter(|m| !m.trim().is_empty()),
            current_date: w.current_date.as_deref().and_then(parse_day),
            error: w.error.filter(|e| !e.trim().is_empty()),
        }
    }
}

impl From<MetricsResponse> for PerformanceMetrics {
    fn from(w: MetricsResponse) -> Self {
        Self {
            strategy_id: w.strategy_id,
            total_return: w.total_return,
            annual_return: w.annual_return,
            max_drawdown: w.max_drawdown,
            sharpe_ratio: w.sharpe_ratio,
            sortino_ratio: w.sortino_ratio,
            win_rate: w.win_rate,
            profit_factor: w.profit_factor,
            total_trades: w.total_trades.filter(|n| *n >= 0.0).map(|n| n as u32),
            avg_trade_return: w.avg_trade_return,
            benchmark_return: w.benchmark_return,
            alpha: w.alpha,
            beta: w.beta,
        }
    }
}

impl TryFrom<TradeResponse> for Trade {
    type Error = ValidationError;

    fn try_from(w: TradeResponse) -> Result<Self, Self::Error> {
        let side = match w.side.trim().to_ascii_lowercase().as_str() {
            "buy" => TradeSide::Buy,
            "sell" => TradeSide::Sell,
            other => return Err(ValidationError::UnknownSide(other.to_string())),
        };
        Ok(Self {
            id: w.id,
            strategy_id: w.strategy_id.filter(|s| !s.is_empty()),
            symbol: w.symbol,
            side,
            quantity: w.quantity.filter(|q| *q >= 0.0).map_or(0, |q| q as u64),
            price: w.price.unwrap_or_default(),
            commission: w.commission.unwrap_or_default(),
            pnl: w.pnl,
            signal_type: w.signal_type.filter(|s| !s.is_empty()),
            date: w.timestamp.as_deref().and_then(parse_day),
        })
    }
}

/// Points without a portfolio value are dropped; dates are normalized.
fn equity_from_wire(raw: Vec<EquityPointResponse>) -> Vec<EquityPoint> {
    raw.into_iter()
        .filter_map(|p| {
            Some(EquityPoint {
                date: normalize_date(p.date.trim()),
                portfolio_value: p.portfolio_value?,
                benchmark_value: p.benchmark_value,
                cash: p.cash,
                holdings: p.holdings,
            })
        })
        .collect()
}

impl From<BacktestConfigResponse> for BacktestSummary {
    fn from(w: BacktestConfigResponse) -> Self {
        Self {
            name: w.name,
            start_date: w.start_date.as_deref().and_then(parse_day),
            end_date: w.end_date.as_deref().and_then(parse_day),
            initial_cash: w.initial_cash.unwrap_or_default(),
            commission: w.commission.unwrap_or_default(),
            symbols: w.symbols,
        }
    }
}

impl From<ResultsResponse> for BacktestResults {
    fn from(w: ResultsResponse) -> Self {
        let mut strategies = w.strategies;
        if strategies.is_empty() {
            strategies.extend(w.strategy);
        }
        let trades = w
            .trades
            .into_iter()
            .filter_map(|t| {
                Trade::try_from(t)
                    .map_err(|e| tracing::warn!("skipping trade: {}", e))
                    .ok()
            })
            .collect();
        Self {
            backtest_id: w.backtest_id,
            performance: w
                .performance
                .map(|p| p.into_vec().into_iter().map(Into::into).collect())
                .unwrap_or_default(),
            combined: w.combined_metrics.map(Into::into),
            equity_curve: equity_from_wire(w.equity_curve),
            strategy_curves: w
                .strategy_performances
                .into_iter()
                .map(|s| equity_from_wire(s.equity_curve))
                .collect(),
            trades,
            strategies: strategies_from_wire(strategies),
            summary: w.backtest_config.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtest_conversion() {
        let raw = r#"{"total":2,"page":1,"size":20,"items":[
            {"id":"bt_001","name":"MACD回测","strategy_ids":["macd_strategy"],
             "symbols":["000001.sz","bad"],"start_date":"20230101","end_date":"2024-01-01",
             "initial_cash":"1000000","commission":0.0003,"status":"running","progress":42.6,
             "error_message":"","created_at":"2024-03-01 10:00:00"},
            {"name":"无ID"}
        ]}"#;
        let wire: BacktestListResponse = serde_json::from_str(raw).unwrap();
        let page = BacktestPage::from(wire);
        assert_eq!(page.items.len(), 1);

        let bt = &page.items[0];
        assert_eq!(bt.status, BacktestStatus::Running);
        assert_eq!(bt.progress, 43);
        assert_eq!(bt.symbols.len(), 1);
        assert_eq!(bt.symbols[0].as_str(), "000001.SZ");
        assert_eq!(bt.start_date, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(bt.initial_cash, 1_000_000.0);
        assert_eq!(bt.error_message, None);
    }

    #[test]
    fn test_progress_conversion() {
        let wire: ProgressResponse = serde_json::from_str(
            r#"{"backtest_id":"bt_001","status":"completed","progress":97,"message":"","current_date":"2024-01-01T00:00:00"}"#,
        )
        .unwrap();
        let p = BacktestProgress::from(wire);
        assert!(p.is_terminal());
        assert_eq!(p.progress, 100);
        assert_eq!(p.display_message(), "运行中...");
        assert_eq!(p.current_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_results_single_strategy_object() {
        let raw = r#"{"backtest_id":"bt_001",
            "performance":{"total_return":"0.12","max_drawdown":-0.06,"total_trades":8},
            "equity_curve":[{"date":"20240102","portfolio_value":1000000},
                            {"date":"2024-01-03","portfolio_value":null}],
            "trades":[{"id":1,"symbol":"000001.SZ","side":"BUY","quantity":100,"price":"10.5",
                       "commission":0.3,"timestamp":"2024-01-02T09:30:00"},
                      {"id":2,"symbol":"000001.SZ","side":"short","quantity":100}],
            "strategy":{"id":"macd_strategy","name":"MACD金叉策略"},
            "backtest_config":{"name":"MACD回测","start_date":"2024-01-01","initial_cash":1000000}}"#;
        let wire: ResultsResponse = serde_json::from_str(raw).unwrap();
        let results = BacktestResults::from(wire);

        assert_eq!(results.performance.len(), 1);
        assert!(!results.is_multi_strategy());
        assert_eq!(results.performance[0].total_return, Some(0.12));
        assert_eq!(results.performance[0].total_trades, Some(8));
        assert_eq!(results.equity_curve.len(), 1);
        assert_eq!(results.equity_curve[0].date, "2024-01-02");
        assert_eq!(results.trades.len(), 1);
        assert_eq!(results.trades[0].side, TradeSide::Buy);
        assert_eq!(results.trades[0].id, "1");
        assert_eq!(results.strategy_label(0), "MACD金叉策略");
        assert_eq!(results.summary.map(|s| s.initial_cash), Some(1_000_000.0));
    }

    #[test]
    fn test_results_multi_strategy_array() {
        let raw = r#"{"backtest_id":"bt_002",
            "performance":[{"strategy_id":"a","total_return":0.1},{"strategy_id":"b","total_return":-0.02}],
            "combined_metrics":{"total_return":0.04},
            "strategy_performances":[{"strategy_id":"a","equity_curve":[{"date":"2024-01-02","portfolio_value":500000}]}]}"#;
        let wire: ResultsResponse = serde_json::from_str(raw).unwrap();
        let results = BacktestResults::from(wire);
        assert!(results.is_multi_strategy());
        assert_eq!(results.performance[1].strategy_id.as_deref(), Some("b"));
        assert_eq!(results.combined.as_ref().and_then(|c| c.total_return), Some(0.04));
        assert_eq!(results.strategy_curve(0)[0].portfolio_value, 500_000.0);
    }
}
