//! Read-time view filters for the dashboard panels.
//!
//! Everything here is stateless and pure: filters are recomputed on every
//! render over the store's current snapshot and never mutate it. Windowing is
//! done in *simulated* time — elapsed milliseconds relative to the first
//! element of the series — so a replayed historical stream windows the same
//! way regardless of wall-clock pacing.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;

use crate::store::{
    AnomalyEntry, ChemicalPoint, EnergyPoint, FlowPoint, PhPoint,
};

// ---

/// Named time ranges offered by the chart and alert-panel selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    All,
    LastMinute,
    Last3Minutes,
    Last5Minutes,
    LastHour,
}

impl TimeRange {
    /// Window width in simulated milliseconds; `None` means unbounded.
    fn window_ms(self) -> Option<i64> {
        // ---
        match self {
            TimeRange::All => None,
            TimeRange::LastMinute => Some(60 * 1000),
            TimeRange::Last3Minutes => Some(3 * 60 * 1000),
            TimeRange::Last5Minutes => Some(5 * 60 * 1000),
            TimeRange::LastHour => Some(60 * 60 * 1000),
        }
    }
}

/// Anything carrying a normalized telemetry timestamp can be range-filtered.
pub trait Timestamped {
    fn timestamp(&self) -> &str;
}

macro_rules! impl_timestamped {
    ($($ty:ty),* $(,)?) => {
        $(impl Timestamped for $ty {
            fn timestamp(&self) -> &str {
                &self.timestamp
            }
        })*
    };
}

impl_timestamped!(FlowPoint, AnomalyEntry, EnergyPoint, PhPoint, ChemicalPoint);

/// Parse a normalized timestamp to epoch milliseconds.
///
/// Accepts the space-separated form the record sets use and the `T`-separated
/// ISO form. Returns `None` for anything else.
fn timestamp_millis(ts: &str) -> Option<i64> {
    // ---
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// Simulated elapsed time of `ts` relative to the series origin.
/// Unparseable timestamps count as elapsed 0.
fn elapsed_ms(ts: &str, origin_ms: i64) -> i64 {
    timestamp_millis(ts).map_or(0, |t| t - origin_ms)
}

// ---

/// Retain the elements of `series` inside the named range.
///
/// `now` is the elapsed simulated time of the last element relative to the
/// first; the cutoff is `now - window`. An empty series yields an empty
/// result for every range, and `All` returns the series unmodified.
pub fn clip_to_range<T: Timestamped>(series: &[T], range: TimeRange) -> Vec<&T> {
    // ---
    let Some(window) = range.window_ms() else {
        return series.iter().collect();
    };
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Vec::new();
    };

    let origin = timestamp_millis(first.timestamp()).unwrap_or(0);
    let now = elapsed_ms(last.timestamp(), origin);
    let cutoff = now - window;

    series
        .iter()
        .filter(|item| elapsed_ms(item.timestamp(), origin) >= cutoff)
        .collect()
}

// ---

/// Which series keys of a multi-line chart are currently rendered.
///
/// Toggling affects display only; the data handed to the chart is never
/// discarded, so re-enabling a key restores its full history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesVisibility {
    enabled: BTreeSet<String>,
}

impl SeriesVisibility {
    /// Start with the given keys enabled.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // ---
        Self {
            enabled: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip one key's visibility.
    pub fn toggle(&mut self, key: &str) {
        // ---
        if !self.enabled.remove(key) {
            self.enabled.insert(key.to_string());
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.enabled.contains(key)
    }

    /// Currently visible keys, in stable order.
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }
}

// ---

/// Anomaly entries matching the selected types inside the named range.
///
/// Mirrors the alert panel: the elapsed-time origin and `now` come from the
/// *full* log, then type and range predicates are applied together. Entries
/// keep arrival order; grouping happens afterwards.
pub fn filter_anomalies<'a>(
    entries: &'a [AnomalyEntry],
    selected_types: &BTreeSet<String>,
    range: TimeRange,
) -> Vec<&'a AnomalyEntry> {
    // ---
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return Vec::new();
    };

    let origin = timestamp_millis(first.timestamp()).unwrap_or(0);
    let now = elapsed_ms(last.timestamp(), origin);
    let cutoff = range.window_ms().map(|w| now - w);

    entries
        .iter()
        .filter(|entry| selected_types.contains(&entry.r#type))
        .filter(|entry| match cutoff {
            Some(cutoff) => elapsed_ms(entry.timestamp(), origin) >= cutoff,
            None => true,
        })
        .collect()
}

/// Alert entries sharing one exact timestamp, most recent cluster first.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyGroup<'a> {
    pub timestamp: &'a str,
    pub entries: Vec<&'a AnomalyEntry>,
}

/// Cluster entries by exact timestamp string.
///
/// Clusters come out in reverse arrival order (most recent first) while the
/// entries inside a cluster keep their original relative order.
pub fn group_by_timestamp<'a>(
    entries: impl IntoIterator<Item = &'a AnomalyEntry>,
) -> Vec<AnomalyGroup<'a>> {
    // ---
    let mut groups: Vec<AnomalyGroup<'a>> = Vec::new();
    for entry in entries {
        match groups.iter().position(|g| g.timestamp == entry.timestamp) {
            Some(idx) => groups[idx].entries.push(entry),
            None => groups.push(AnomalyGroup {
                timestamp: entry.timestamp.as_str(),
                entries: vec![entry],
            }),
        }
    }
    groups.reverse();
    groups
}
