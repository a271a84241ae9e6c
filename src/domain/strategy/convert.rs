use super::wire::{parameters_object, StrategyListResponse, StrategyPerformanceResponse, StrategyResponse};
use super::{Strategy, StrategyPage, StrategyPerformance, StrategyStatus, StrategyType, ValidationError};

impl TryFrom<StrategyResponse> for Strategy {
    type Error = ValidationError;

    fn try_from(w: StrategyResponse) -> Result<Self, Self::Error> {
        if w.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        let strategy_type = match w.strategy_type.as_deref().filter(|t| !t.trim().is_empty()) {
            None => StrategyType::default(),
            Some(raw) => {
                StrategyType::parse(raw).ok_or_else(|| ValidationError::UnknownType(raw.to_string()))?
            }
        };
        let status = w
            .status
            .as_deref()
            .and_then(StrategyStatus::parse)
            .unwrap_or_default();
        Ok(Self {
            id: w.id,
            name: w.name,
            description: w.description.unwrap_or_default(),
            strategy_type,
            status,
            parameters: parameters_object(w.parameters),
            created_by: w.created_by.filter(|c| !c.is_empty()),
            created_at: w.created_at,
            updated_at: w.updated_at,
        })
    }
}

/// Convert a list, skipping entries that fail validation.
pub fn strategies_from_wire(raw: Vec<StrategyResponse>) -> Vec<Strategy> {
    raw.into_iter()
        .filter_map(|w| {
            let id = w.id.clone();
            Strategy::try_from(w)
                .map_err(|e| tracing::warn!("skipping strategy {:?}: {}", id, e))
                .ok()
        })
        .collect()
}

impl From<StrategyListResponse> for StrategyPage {
    fn from(w: StrategyListResponse) -> Self {
        Self {
            total: w.total,
            page: w.page,
            size: w.size,
            items: strategies_from_wire(w.items),
        }
    }
}

impl From<StrategyPerformanceResponse> for StrategyPerformance {
    fn from(w: StrategyPerformanceResponse) -> Self {
        Self {
            strategy_id: w.strategy_id,
            total_return: w.total_return,
            annual_return: w.annual_return,
            max_drawdown: w.max_drawdown,
            sharpe_ratio: w.sharpe_ratio,
            win_rate: w.win_rate,
            total_trades: w.total_trades.filter(|n| *n >= 0.0).map(|n| n as u32),
            last_updated: w.last_updated,
        }
    }
}
