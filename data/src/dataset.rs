use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::selection::Metric;
use crate::util;

#[derive(thiserror::Error, Debug, Clone)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("dataset contains no usable series")]
    EmptyDataset,
}

/// One cleaned daily observation for a coin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub date_ms: i64,
    pub price_usd: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
}

impl Record {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::PriceUsd => self.price_usd,
            Metric::Volume24h => self.volume_24h,
            Metric::MarketCap => self.market_cap,
        }
    }
}

/// Raw on-disk fields arrive as numbers or numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Num(f64),
    Str(String),
}

impl RawNumber {
    /// Coerce to a finite value. The number 0 and the empty string never
    /// count as present; the string "0" does.
    fn value(&self) -> Option<f64> {
        match self {
            RawNumber::Num(n) if *n != 0.0 && n.is_finite() => Some(*n),
            RawNumber::Num(_) => None,
            RawNumber::Str(s) if s.is_empty() => None,
            RawNumber::Str(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    price_usd: Option<RawNumber>,
    #[serde(rename = "24h_vol", default)]
    volume_24h: Option<RawNumber>,
    #[serde(default)]
    market_cap: Option<RawNumber>,
}

impl RawRecord {
    fn clean(&self, coin: &str) -> Option<Record> {
        let date = self.date.as_deref().filter(|s| !s.is_empty())?;
        let price_usd = self.price_usd.as_ref()?.value()?;
        let volume_24h = self.volume_24h.as_ref()?.value()?;
        let market_cap = self.market_cap.as_ref()?.value()?;

        let Some(date_ms) = util::parse_date(date) else {
            log::warn!("{coin}: dropping record with malformed date {date:?}");
            return None;
        };

        Some(Record {
            date_ms,
            price_usd,
            volume_24h,
            market_cap,
        })
    }
}

/// Immutable coin-id -> date-ordered records map, loaded once at startup.
/// Series order is taken as-is; nothing downstream re-sorts.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    series: FxHashMap<String, Vec<Record>>,
    coins: Vec<String>,
}

impl Dataset {
    pub fn from_json_str(input: &str) -> Result<Self, LoadError> {
        let raw: FxHashMap<String, Vec<RawRecord>> =
            serde_json::from_str(input).map_err(|err| LoadError::Json(err.to_string()))?;

        let mut series: FxHashMap<String, Vec<Record>> = FxHashMap::default();
        for (coin, records) in raw {
            let total = records.len();
            let cleaned: Vec<Record> = records.iter().filter_map(|r| r.clean(&coin)).collect();
            if cleaned.len() < total {
                log::debug!(
                    "{coin}: kept {} of {total} records after cleaning",
                    cleaned.len()
                );
            }
            series.insert(coin, cleaned);
        }

        if series.values().all(Vec::is_empty) {
            return Err(LoadError::EmptyDataset);
        }

        let mut coins: Vec<String> = series.keys().cloned().collect();
        coins.sort();

        Ok(Self { series, coins })
    }

    pub fn coins(&self) -> &[String] {
        &self.coins
    }

    pub fn records(&self, coin: &str) -> &[Record] {
        self.series.get(coin).map_or(&[], Vec::as_slice)
    }

    /// Observed [min, max] date of one series.
    pub fn date_bounds(&self, coin: &str) -> Option<(i64, i64)> {
        let records = self.series.get(coin)?;
        let min = records.iter().map(|r| r.date_ms).min()?;
        let max = records.iter().map(|r| r.date_ms).max()?;
        Some((min, max))
    }
}
