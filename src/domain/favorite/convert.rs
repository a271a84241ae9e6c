//! Conversions from favorites wire types.

use super::wire::*;
use super::*;
use crate::chart::normalize::normalize_date;

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|d| NaiveDate::parse_from_str(&normalize_date(d), "%Y-%m-%d").ok())
}

/// Empty or absent group ids belong to the default group.
fn group_or_default(raw: Option<String>) -> String {
    raw.map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string())
}

fn parse_code(raw: &str) -> Result<StockCode, ValidationError> {
    StockCode::parse(raw).map_err(|_| ValidationError::InvalidCode(raw.to_string()))
}

impl TryFrom<FavoriteResponse> for Favorite {
    type Error = ValidationError;

    fn try_from(w: FavoriteResponse) -> Result<Self, Self::Error> {
        if w.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        Ok(Self {
            ts_code: parse_code(&w.ts_code)?,
            id: w.id,
            name: w.name,
            start_date: parse_date(w.start_date.as_deref()),
            end_date: parse_date(w.end_date.as_deref()),
            group_id: group_or_default(w.group_id),
            sort_order: w.sort_order,
            created_at: w.created_at,
            updated_at: w.updated_at,
        })
    }
}

impl From<GroupResponse> for FavoriteGroup {
    fn from(w: GroupResponse) -> Self {
        Self {
            id: w.id,
            name: w.name,
            color: w.color,
            sort_order: w.sort_order,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

impl TryFrom<FavoriteSignalResponse> for FavoriteSignal {
    type Error = ValidationError;

    fn try_from(w: FavoriteSignalResponse) -> Result<Self, Self::Error> {
        let indicators = SignalIndicators {
            ma5: w.indicators.ma5,
            ma10: w.indicators.ma10,
            ma20: w.indicators.ma20,
            price_change: w.indicators.price_change,
            price_change_pct: w.indicators.price_change_pct,
            trend: w.indicators.trend.filter(|t| !t.is_empty()),
            last_update: w.indicators.last_update.filter(|t| !t.is_empty()),
        };
        Ok(Self {
            ts_code: parse_code(&w.ts_code)?,
            id: w.id,
            name: w.name,
            group_id: group_or_default(w.group_id),
            current_price: w.current_price.or(w.indicators.current_price),
            trade_date: parse_date(w.trade_date.as_deref()),
            indicators,
            predictions: w.predictions,
            updated_at: w.updated_at.filter(|t| !t.is_empty()),
        })
    }
}

/// Convert a list, skipping entries that fail validation.
pub fn favorites_from_wire(raw: Vec<FavoriteResponse>) -> Vec<Favorite> {
    raw.into_iter()
        .filter_map(|w| {
            let code = w.ts_code.clone();
            Favorite::try_from(w)
                .map_err(|e| tracing::warn!("skipping favorite {}: {}", code, e))
                .ok()
        })
        .collect()
}

impl From<SignalsResponse> for SignalsOverview {
    fn from(w: SignalsResponse) -> Self {
        let signals = w
            .signals
            .into_iter()
            .filter_map(|s| {
                let code = s.ts_code.clone();
                FavoriteSignal::try_from(s)
                    .map_err(|e| tracing::warn!("skipping signal {}: {}", code, e))
                    .ok()
            })
            .collect();
        Self {
            signals,
            calculating: w.calculating,
            calculation_status: w.calculation_status,
        }
    }
}
