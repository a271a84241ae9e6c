//! Backtest form state — the run being configured before it is submitted.

use super::{NewBacktest, ValidationError, MAX_STRATEGIES, MAX_SYMBOLS};
use crate::domain::favorite::Favorite;
use crate::domain::strategy::Strategy;
use crate::shared::StockCode;
use chrono::{Datelike, Months, NaiveDate};

pub const DEFAULT_INITIAL_CASH: f64 = 1_000_000.0;
pub const DEFAULT_COMMISSION: f64 = 0.0003;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestDraft {
    pub name: String,
    strategy_ids: Vec<String>,
    symbols: Vec<StockCode>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    pub commission: f64,
    pub slippage: f64,
}

impl BacktestDraft {
    /// The last year up to `today`, with default cash and commission.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            strategy_ids: Vec::new(),
            symbols: Vec::new(),
            start_date: today.checked_sub_months(Months::new(12)).unwrap_or(today),
            end_date: today,
            initial_cash: DEFAULT_INITIAL_CASH,
            commission: DEFAULT_COMMISSION,
            slippage: 0.0,
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    // ─── Strategies ──────────────────────────────────────────────────────

    pub fn strategy_ids(&self) -> &[String] {
        &self.strategy_ids
    }

    /// Replace the selection, keeping the first five distinct ids.
    pub fn select_strategies<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strategy_ids.clear();
        for id in ids {
            if self.strategy_ids.len() == MAX_STRATEGIES {
                break;
            }
            self.add_strategy(id);
        }
    }

    /// False when already selected or the selection is full.
    pub fn add_strategy(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.strategy_ids.len() >= MAX_STRATEGIES || self.strategy_ids.contains(&id) {
            return false;
        }
        self.strategy_ids.push(id);
        true
    }

    pub fn remove_strategy(&mut self, id: &str) {
        self.strategy_ids.retain(|s| s != id);
    }

    pub fn clear_strategies(&mut self) {
        self.strategy_ids.clear();
    }

    // ─── Stock pool ──────────────────────────────────────────────────────

    pub fn symbols(&self) -> &[StockCode] {
        &self.symbols
    }

    /// False when already in the pool or the pool is full.
    pub fn add_symbol(&mut self, code: StockCode) -> bool {
        if self.symbols.len() >= MAX_SYMBOLS || self.symbols.contains(&code) {
            return false;
        }
        self.symbols.push(code);
        true
    }

    pub fn remove_symbol(&mut self, code: &StockCode) {
        self.symbols.retain(|s| s != code);
    }

    /// Add every favorite not already in the pool. Returns how many were added.
    pub fn add_favorites(&mut self, favorites: &[Favorite]) -> usize {
        favorites
            .iter()
            .filter(|f| self.add_symbol(f.ts_code.clone()))
            .count()
    }

    // ─── Naming ──────────────────────────────────────────────────────────

    /// `MACD金叉策略-2024年3月回测` for one strategy,
    /// `MACD金叉策略等3策略-2024年3月` for several.
    pub fn auto_name(&self, strategies: &[Strategy], today: NaiveDate) -> Option<String> {
        let first = self
            .strategy_ids
            .iter()
            .find_map(|id| strategies.iter().find(|s| &s.id == id))?;
        let (year, month) = (today.year(), today.month());
        Some(if self.strategy_ids.len() == 1 {
            format!("{}-{}年{}月回测", first.name, year, month)
        } else {
            format!(
                "{}等{}策略-{}年{}月",
                first.name,
                self.strategy_ids.len(),
                year,
                month
            )
        })
    }

    /// Fill in the name from the selection unless the user typed one.
    pub fn apply_auto_name(&mut self, strategies: &[Strategy], today: NaiveDate) {
        if !self.name.trim().is_empty() {
            return;
        }
        if let Some(name) = self.auto_name(strategies, today) {
            self.name = name;
        }
    }

    /// The create request, validated.
    pub fn to_request(&self) -> Result<NewBacktest, ValidationError> {
        let request = NewBacktest {
            name: self.name.trim().to_string(),
            strategy_ids: self.strategy_ids.clone(),
            symbols: self.symbols.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            initial_cash: self.initial_cash,
            commission: self.commission,
            slippage: self.slippage,
            benchmark: None,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::{StrategyStatus, StrategyType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn strategy(id: &str, name: &str) -> Strategy {
        Strategy {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            strategy_type: StrategyType::Technical,
            status: StrategyStatus::Active,
            parameters: Default::default(),
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn code(s: &str) -> StockCode {
        StockCode::parse(s).unwrap()
    }

    #[test]
    fn test_draft_defaults() {
        let draft = BacktestDraft::new(today());
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(draft.end_date, today());
        assert_eq!(draft.initial_cash, 1_000_000.0);
        assert_eq!(draft.commission, 0.0003);
    }

    #[test]
    fn test_strategy_selection_capped_and_deduplicated() {
        let mut draft = BacktestDraft::new(today());
        draft.select_strategies(["a", "b", "a", "c", "d", "e", "f"]);
        assert_eq!(draft.strategy_ids(), ["a", "b", "c", "d", "e"]);
        assert!(!draft.add_strategy("g"));
        draft.remove_strategy("c");
        assert!(draft.add_strategy("g"));
        assert!(!draft.add_strategy("g"));
    }

    #[test]
    fn test_add_favorites_skips_existing() {
        let favorite = |ts: &str| Favorite {
            id: ts.into(),
            ts_code: code(ts),
            name: String::new(),
            start_date: None,
            end_date: None,
            group_id: "default".into(),
            sort_order: 0,
            created_at: None,
            updated_at: None,
        };
        let mut draft = BacktestDraft::new(today());
        draft.add_symbol(code("000001.SZ"));
        let added = draft.add_favorites(&[favorite("000001.SZ"), favorite("600519.SH")]);
        assert_eq!(added, 1);
        assert_eq!(draft.symbols().len(), 2);
    }

    #[test]
    fn test_auto_name() {
        let strategies = vec![strategy("macd", "MACD金叉策略"), strategy("rsi", "RSI超卖")];
        let mut draft = BacktestDraft::new(today());
        assert_eq!(draft.auto_name(&strategies, today()), None);

        draft.add_strategy("macd");
        assert_eq!(
            draft.auto_name(&strategies, today()).as_deref(),
            Some("MACD金叉策略-2024年3月回测")
        );

        draft.add_strategy("rsi");
        draft.add_strategy("unknown");
        draft.apply_auto_name(&strategies, today());
        assert_eq!(draft.name, "MACD金叉策略等3策略-2024年3月");

        draft.name = "我的回测".into();
        draft.apply_auto_name(&strategies, today());
        assert_eq!(draft.name, "我的回测");
    }

    #[test]
    fn test_to_request_validates() {
        let mut draft = BacktestDraft::new(today());
        assert_eq!(draft.to_request(), Err(ValidationError::EmptyName));

        draft.name = " 回测 ".into();
        draft.add_strategy("macd");
        draft.add_symbol(code("600519.SH"));
        let request = draft.to_request().unwrap();
        assert_eq!(request.name, "回测");
        assert_eq!(request.symbols[0].as_str(), "600519.SH");

        draft.reset(today());
        assert!(draft.strategy_ids().is_empty());
    }
}
