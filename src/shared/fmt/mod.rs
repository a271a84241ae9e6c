//! Display formatting for prices, volumes and money amounts.

pub mod decimal;
pub mod num;
