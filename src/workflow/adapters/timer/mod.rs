//! Tokio-backed progress tickers.

mod ticker;

pub use ticker::{ImmediateTicker, IntervalTicker};
