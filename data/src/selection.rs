use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

pub const DEFAULT_COIN: &str = "bitcoin";

/// Fixed bounds of the date-range control, UTC-midnight milliseconds.
pub const SLIDER_MIN_MS: i64 = 1_368_316_800_000; // 12 May 2013
pub const SLIDER_MAX_MS: i64 = 1_509_408_000_000; // 31 Oct 2017

/// Slider step: one day.
pub const DAY_MS: i64 = 86_400_000;

/// Which per-record field the chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    #[serde(rename = "price_usd")]
    PriceUsd,
    #[serde(rename = "24h_vol")]
    Volume24h,
    #[serde(rename = "market_cap")]
    MarketCap,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::PriceUsd, Metric::Volume24h, Metric::MarketCap];

    pub fn axis_title(self) -> &'static str {
        match self {
            Metric::PriceUsd => "Price",
            Metric::Volume24h => "24 Hour Volume",
            Metric::MarketCap => "Market Capitalization",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::PriceUsd => write!(f, "Price in dollars"),
            Metric::Volume24h => write!(f, "24 hour trading volume"),
            Metric::MarketCap => write!(f, "Market capitalization"),
        }
    }
}

/// The complete input of one redraw: selected coin, metric, and the active
/// date range. Mutated only by UI messages; the range keeps its invariants
/// (ordered, inside the slider bounds) at the setter.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub coin: String,
    pub metric: Metric,
    range: (i64, i64),
}

impl Selection {
    /// Defaults: `bitcoin` (or the first coin holding data) over its full
    /// observed date range.
    pub fn initial(dataset: &Dataset) -> Self {
        let coin = if !dataset.records(DEFAULT_COIN).is_empty() {
            DEFAULT_COIN.to_owned()
        } else {
            dataset
                .coins()
                .iter()
                .find(|coin| !dataset.records(coin).is_empty())
                .or_else(|| dataset.coins().first())
                .cloned()
                .unwrap_or_default()
        };

        let (start, end) = dataset
            .date_bounds(&coin)
            .unwrap_or((SLIDER_MIN_MS, SLIDER_MAX_MS));

        let mut selection = Self {
            coin,
            metric: Metric::default(),
            range: (SLIDER_MIN_MS, SLIDER_MAX_MS),
        };
        selection.set_range(start, end);
        selection
    }

    pub fn range(&self) -> (i64, i64) {
        self.range
    }

    pub fn set_range(&mut self, start: i64, end: i64) {
        let (lo, hi) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        self.range = (
            lo.clamp(SLIDER_MIN_MS, SLIDER_MAX_MS),
            hi.clamp(SLIDER_MIN_MS, SLIDER_MAX_MS),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util;

    #[test]
    fn slider_bound_constants_match_their_dates() {
        assert_eq!(util::parse_date("12/05/2013"), Some(SLIDER_MIN_MS));
        assert_eq!(util::parse_date("31/10/2017"), Some(SLIDER_MAX_MS));
    }

    #[test]
    fn set_range_orders_and_clamps() {
        let mut selection = Selection {
            coin: DEFAULT_COIN.to_owned(),
            metric: Metric::default(),
            range: (SLIDER_MIN_MS, SLIDER_MAX_MS),
        };

        selection.set_range(SLIDER_MAX_MS, SLIDER_MIN_MS);
        assert_eq!(selection.range(), (SLIDER_MIN_MS, SLIDER_MAX_MS));

        selection.set_range(SLIDER_MIN_MS - DAY_MS, SLIDER_MAX_MS + DAY_MS);
        assert_eq!(selection.range(), (SLIDER_MIN_MS, SLIDER_MAX_MS));
    }

    #[test]
    fn initial_selection_prefers_bitcoin() {
        let input = r#"{
            "aardvarkcoin": [ { "date": "01/01/2015", "price_usd": "1", "24h_vol": "2", "market_cap": "3" } ],
            "bitcoin": [
                { "date": "12/05/2013", "price_usd": "115.91", "24h_vol": "1430750", "market_cap": "1292190000" },
                { "date": "31/10/2017", "price_usd": "6130.53", "24h_vol": "2697850000", "market_cap": "102e9" }
            ]
        }"#;
        let dataset = Dataset::from_json_str(input).unwrap();
        let selection = Selection::initial(&dataset);
        assert_eq!(selection.coin, "bitcoin");
        assert_eq!(selection.range(), (SLIDER_MIN_MS, SLIDER_MAX_MS));
        assert_eq!(selection.metric, Metric::PriceUsd);
    }

    #[test]
    fn initial_selection_falls_back_to_first_populated_coin() {
        let input = r#"{
            "zcash": [ { "date": "01/01/2017", "price_usd": "48.5", "24h_vol": "2", "market_cap": "3" } ],
            "litecoin": [ { "date": "", "price_usd": "", "24h_vol": "", "market_cap": "" } ]
        }"#;
        let dataset = Dataset::from_json_str(input).unwrap();
        let selection = Selection::initial(&dataset);
        assert_eq!(selection.coin, "zcash");
        let expected = util::parse_date("01/01/2017").unwrap();
        assert_eq!(selection.range(), (expected, expected));
    }
}
