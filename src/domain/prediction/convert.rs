//! Conversions from wire predictions to domain types.

use super::wire::{PredictionItemResponse, PredictionResponse};
use super::{BacktestOutcome, PredictionItem, PredictionSet, ValidationError};
use crate::chart::normalize::normalize_date;
use crate::shared::{SignalType, StockCode};
use chrono::NaiveDate;

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|d| NaiveDate::parse_from_str(&normalize_date(d.trim()), "%Y-%m-%d").ok())
}

impl TryFrom<PredictionItemResponse> for PredictionItem {
    type Error = ValidationError;

    fn try_from(w: PredictionItemResponse) -> Result<Self, Self::Error> {
        let signal_type =
            SignalType::parse_label(&w.kind).ok_or_else(|| ValidationError::UnknownType(w.kind.clone()))?;
        let price = w.price.ok_or(ValidationError::MissingPrice)?;

        let mut reasons = w.reasons;
        if let Some(r) = w.reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
            if !reasons.contains(&r) {
                reasons.insert(0, r);
            }
        }

        let backtest = w.backtested.then(|| BacktestOutcome {
            is_correct: w.is_correct,
            next_day_price: w.next_day_price,
            price_diff: w.price_diff,
            price_diff_ratio: w.price_diff_ratio,
        });

        Ok(Self {
            signal_type,
            price,
            date: parse_date(w.date.as_deref()),
            probability: w.probability.unwrap_or(0.0).clamp(0.0, 1.0),
            signal_date: parse_date(w.signal_date.as_deref()),
            confidence: w.confidence.map(|c| c.clamp(0.0, 1.0)),
            reasons,
            indicators: w.indicators,
            target_price: w.target_price,
            stop_loss: w.stop_loss,
            backtest,
        })
    }
}

impl TryFrom<PredictionResponse> for PredictionSet {
    type Error = ValidationError;

    /// Individual malformed items are skipped; a bad stock code rejects the set.
    fn try_from(w: PredictionResponse) -> Result<Self, Self::Error> {
        let ts_code =
            StockCode::parse(&w.ts_code).map_err(|_| ValidationError::InvalidCode(w.ts_code.clone()))?;
        let items = w
            .predictions
            .into_iter()
            .filter_map(|p| match PredictionItem::try_from(p) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("skipping prediction for {}: {}", ts_code, e);
                    None
                }
            })
            .collect();
        Ok(Self {
            trade_date: parse_date(w.trade_date.as_deref()),
            confidence: w.confidence.map(|c| c.clamp(0.0, 1.0)),
            items,
            updated_at: w.updated_at,
            ts_code,
        })
    }
}
