//! Market data access port.

use crate::domain::error::TacticalError;
use crate::domain::ohlcv::Series;
use crate::domain::timeframe::Timeframe;

pub trait MarketDataPort {
    /// The most recent `limit` bars for `symbol`, oldest first.
    ///
    /// Either a complete, validated series or an error; never a partial one.
    fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, TacticalError>;
}
