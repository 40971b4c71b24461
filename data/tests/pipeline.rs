use coinstats_data::selection::{Metric, SLIDER_MAX_MS, SLIDER_MIN_MS};
use coinstats_data::view::{self, compute_view};
use coinstats_data::{Dataset, Selection, util};

/// Bitcoin series spanning the full slider bounds, in the raw on-disk
/// shape: numeric strings, plus two records the loader must drop.
const COINS_JSON: &str = r#"{
    "bitcoin": [
        { "date": "12/05/2013", "price_usd": "115.91", "24h_vol": "1430750", "market_cap": "1292190000" },
        { "date": "01/01/2014", "price_usd": "771.4", "24h_vol": "25780200", "market_cap": "9408950000" },
        { "date": "01/07/2014", "price_usd": "641.8", "24h_vol": null, "market_cap": "8309300000" },
        { "date": "01/01/2015", "price_usd": "313.9", "24h_vol": "14575500", "market_cap": "4293960000" },
        { "date": "01/07/2015", "price_usd": "258.6", "24h_vol": "14032400", "market_cap": "3662250000" },
        { "date": "01/01/2016", "price_usd": "434.3", "24h_vol": "36278900", "market_cap": "6529300000" },
        { "date": "01/07/2016", "price_usd": "672.5", "24h_vol": "92442700", "market_cap": "10563100000" },
        { "date": "01/01/2017", "price_usd": "997.7", "24h_vol": "147775000", "market_cap": "16050100000" },
        { "price_usd": "1179.97", "24h_vol": "263825000", "market_cap": "19094800000" },
        { "date": "31/10/2017", "price_usd": "6130.53", "24h_vol": "2697850000", "market_cap": "102041000000" }
    ],
    "ripple": [
        { "date": "04/08/2013", "price_usd": "0.005882", "24h_vol": 0, "market_cap": "45921700" },
        { "date": "01/01/2016", "price_usd": "0.006084", "24h_vol": "349363", "market_cap": "208582000" }
    ]
}"#;

#[test]
fn full_range_price_scenario() {
    let dataset = Dataset::from_json_str(COINS_JSON).unwrap();
    let mut selection = Selection::initial(&dataset);
    selection.metric = Metric::PriceUsd;
    selection.set_range(SLIDER_MIN_MS, SLIDER_MAX_MS);

    let view = compute_view(&dataset, &selection);

    // Two raw records are incomplete; every survivor is a line vertex.
    assert_eq!(dataset.records("bitcoin").len(), 8);
    assert_eq!(view.visible.len(), 8);

    let tick_years: Vec<String> = view
        .x_ticks
        .iter()
        .map(|ts| util::format_year(*ts))
        .collect();
    assert_eq!(tick_years, ["2014", "2015", "2016", "2017"]);

    assert_eq!(view.domains.x, (SLIDER_MIN_MS as f64, SLIDER_MAX_MS as f64));
    assert_eq!(view.domains.y_max, 6130.53);
    assert_eq!(view.range_start_label, "12/05/2013");
    assert_eq!(view.range_end_label, "31/10/2017");
}

#[test]
fn switching_coin_and_metric_rederives_everything() {
    let dataset = Dataset::from_json_str(COINS_JSON).unwrap();
    let mut selection = Selection::initial(&dataset);
    selection.coin = "ripple".to_owned();
    selection.metric = Metric::MarketCap;
    selection.set_range(SLIDER_MIN_MS, SLIDER_MAX_MS);

    let view = compute_view(&dataset, &selection);

    // The zero-volume record is falsy-filtered at load.
    assert_eq!(view.visible.len(), 1);
    assert_eq!(view.domains.y_max, 208_582_000.0);
    assert_eq!(view.metric, Metric::MarketCap);
}

#[test]
fn range_excluding_every_point_renders_empty() {
    let dataset = Dataset::from_json_str(COINS_JSON).unwrap();
    let mut selection = Selection::initial(&dataset);
    let start = util::parse_date("02/01/2014").unwrap();
    let end = util::parse_date("30/06/2014").unwrap();
    selection.set_range(start, end);

    let view = compute_view(&dataset, &selection);

    assert!(view.visible.is_empty());
    assert_eq!(view.domains.y_max, 0.0);
    assert!(view.y_ticks.is_empty());
    assert_eq!(view::nearest_by_date(&view.visible, start), None);

    // Labels still reflect the active bounds.
    assert_eq!(view.range_start_label, "02/01/2014");
    assert_eq!(view.range_end_label, "30/06/2014");
}

#[test]
fn hover_lookup_runs_against_the_filtered_view() {
    let dataset = Dataset::from_json_str(COINS_JSON).unwrap();
    let mut selection = Selection::initial(&dataset);
    selection.set_range(
        util::parse_date("01/01/2015").unwrap(),
        util::parse_date("01/01/2017").unwrap(),
    );

    let view = compute_view(&dataset, &selection);
    assert_eq!(view.visible.len(), 5);

    // A query near the range edge must resolve inside the window, not to
    // the full series' closest record.
    let query = util::parse_date("20/02/2014").unwrap();
    let hit = view::nearest_by_date(&view.visible, query).unwrap();
    assert_eq!(util::format_date(hit.date_ms), "01/01/2015");

    let query = util::parse_date("20/03/2016").unwrap();
    let hit = view::nearest_by_date(&view.visible, query).unwrap();
    assert_eq!(util::format_date(hit.date_ms), "01/01/2016");
}
