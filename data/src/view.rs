use crate::dataset::{Dataset, Record};
use crate::selection::{Metric, Selection};
use crate::util;

/// Scale domains derived from the filtered data; the unit the 500ms
/// redraw transition interpolates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domains {
    pub x: (f64, f64),
    pub y_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueTick {
    pub value: f64,
    pub label: String,
}

/// Everything the rendering layer needs for one redraw, derived from
/// scratch on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub metric: Metric,
    pub visible: Vec<Record>,
    pub domains: Domains,
    pub x_ticks: Vec<i64>,
    pub y_ticks: Vec<ValueTick>,
    pub range_start_label: String,
    pub range_end_label: String,
}

/// The x axis is pinned to these four year marks.
pub const YEAR_MARKS: [i32; 4] = [2014, 2015, 2016, 2017];

const Y_TICK_TARGET: usize = 6;

/// The single redraw derivation: filter the selected series to the active
/// range, then rebuild domains, ticks, and labels from the result.
pub fn compute_view(dataset: &Dataset, selection: &Selection) -> ViewModel {
    let (start, end) = selection.range();

    let visible: Vec<Record> = dataset
        .records(&selection.coin)
        .iter()
        .filter(|r| r.date_ms >= start && r.date_ms <= end)
        .copied()
        .collect();

    let y_max = visible
        .iter()
        .map(|r| r.value(selection.metric))
        .fold(0.0, f64::max);

    ViewModel {
        metric: selection.metric,
        domains: Domains {
            x: (start as f64, end as f64),
            y_max,
        },
        x_ticks: year_ticks(start, end),
        y_ticks: value_ticks(y_max),
        range_start_label: util::format_date(start),
        range_end_label: util::format_date(end),
        visible,
    }
}

fn year_ticks(start: i64, end: i64) -> Vec<i64> {
    YEAR_MARKS
        .iter()
        .filter_map(|year| util::year_start_ms(*year))
        .filter(|ts| *ts >= start && *ts <= end)
        .collect()
}

fn value_ticks(y_max: f64) -> Vec<ValueTick> {
    if y_max <= 0.0 {
        return Vec::new();
    }

    let (ticks, step) = ticks(0.0, y_max, Y_TICK_TARGET);
    ticks
        .into_iter()
        .filter(|t| *t >= -step * 1e-6 && *t <= y_max + step * 1e-6)
        .map(|value| ValueTick {
            value,
            label: util::format_abbrev(value),
        })
        .collect()
}

/// Compute a "nice" step close to range/target using 1/2/5*10^k
fn nice_step(range: f64, target: usize) -> f64 {
    let target = target.max(2) as f64;
    let raw = (range / target).max(f64::EPSILON);
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let n = raw / base;
    let nice = if n <= 1.0 {
        1.0
    } else if n <= 2.0 {
        2.0
    } else if n <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

fn ticks(min: f64, max: f64, target: usize) -> (Vec<f64>, f64) {
    let span = (max - min).abs().max(1e-9);
    let step = nice_step(span, target);
    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;

    let mut v = Vec::new();
    let mut t = start;
    for _ in 0..100 {
        if t > end + step * 0.5 {
            break;
        }
        v.push(t);
        t += step;
    }
    (v, step)
}

/// Leftmost insertion index of `target_ms` in the date-sorted slice.
fn bisect_left(records: &[Record], target_ms: i64) -> usize {
    records.partition_point(|r| r.date_ms < target_ms)
}

/// Nearest record by date: bisect, then pick whichever neighbor is closer,
/// keeping the later one on exact ties.
pub fn nearest_by_date(records: &[Record], target_ms: i64) -> Option<&Record> {
    let i = bisect_left(records, target_ms);
    let before = i.checked_sub(1).and_then(|j| records.get(j));
    let at = records.get(i);

    match (before, at) {
        (None, None) => None,
        (Some(d0), None) => Some(d0),
        (None, Some(d1)) => Some(d1),
        (Some(d0), Some(d1)) => {
            if target_ms - d0.date_ms >= d1.date_ms - target_ms {
                Some(d1)
            } else {
                Some(d0)
            }
        }
    }
}
