//! FRED API integration for Treasury constant-maturity yield series.
//!
//! The client is an explicitly constructed value (no process-wide key or
//! shared handle); snapshot and panel assembly are generic over
//! [`SeriesSource`] so tests can substitute an in-memory fake.
//!
//! `DGS*` values arrive and stay in percent.

use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate};
use nalgebra::DMatrix;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{Observation, TreasuryTenor};
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 10000;

/// A provider of dated yield values for one Treasury series.
///
/// Dates may arrive in any order; missing days are simply absent. Failures
/// here are data-source failures (exit code 4) and pass through the numeric
/// core unchanged.
pub trait SeriesSource {
    fn fetch_series(
        &self,
        tenor: TreasuryTenor,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<(NaiveDate, f64)>, AppError>;
}

/// The latest yield per tenor, all observed on one common date.
#[derive(Debug, Clone)]
pub struct CurveSnapshot {
    pub date: NaiveDate,
    /// Sorted short to long (the order of [`TreasuryTenor::ALL`]).
    pub yields: Vec<(TreasuryTenor, f64)>,
}

impl CurveSnapshot {
    pub fn to_observations(&self) -> Vec<Observation> {
        self.yields
            .iter()
            .map(|&(tenor, y)| Observation::new(tenor.years(), y))
            .collect()
    }
}

/// An aligned panel of daily yields: one row per common date (ascending),
/// one column per tenor.
#[derive(Debug, Clone)]
pub struct YieldPanel {
    pub tenors: Vec<TreasuryTenor>,
    pub dates: Vec<NaiveDate>,
    pub values: DMatrix<f64>,
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(2, "Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self::new(api_key))
    }
}

impl SeriesSource for FredClient {
    fn fetch_series(
        &self,
        tenor: TreasuryTenor,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<(NaiveDate, f64)>, AppError> {
        let series_id = tenor.series_id();
        let limit = OBS_LIMIT.to_string();
        let mut req = self.client.get(BASE_URL).query(&[
            ("series_id", series_id),
            ("api_key", self.api_key.as_str()),
            ("file_type", "json"),
            ("sort_order", "desc"),
            ("limit", limit.as_str()),
        ]);

        if let Some(date) = end_date {
            req = req.query(&[("observation_end", &date.to_string())]);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::new(4, format!("FRED request for {series_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!(
                    "FRED request for {series_id} failed with status {}.",
                    resp.status()
                ),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse FRED response: {e}")))?;

        let mut out = Vec::new();
        for obs in body.observations {
            let value = match parse_value(&obs.value) {
                Some(v) => v,
                None => continue,
            };
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                .map_err(|e| AppError::new(4, format!("Invalid FRED date '{}': {e}", obs.date)))?;
            out.push((date, value));
        }

        Ok(out)
    }
}

/// Assemble the latest full-curve snapshot across all eleven tenors.
///
/// Series publish with differing lags, so we take the most recent date on
/// which every series has a value.
pub fn fetch_snapshot(
    source: &impl SeriesSource,
    end_date: Option<NaiveDate>,
) -> Result<CurveSnapshot, AppError> {
    let mut maps: Vec<(TreasuryTenor, HashMap<NaiveDate, f64>)> = Vec::new();
    for tenor in TreasuryTenor::ALL {
        let obs = source.fetch_series(tenor, end_date)?;
        if obs.is_empty() {
            return Err(AppError::new(
                4,
                format!("No observations returned for series {}.", tenor.series_id()),
            ));
        }
        maps.push((tenor, obs.into_iter().collect()));
    }

    let common_date = latest_common_date(maps.iter().map(|(_, m)| m))
        .ok_or_else(|| AppError::new(4, "No common observation date across series."))?;

    let mut yields = Vec::with_capacity(maps.len());
    for (tenor, map) in &maps {
        let value = *map.get(&common_date).ok_or_else(|| {
            AppError::new(
                4,
                format!("Missing {} value for {common_date}.", tenor.series_id()),
            )
        })?;
        if !value.is_finite() {
            return Err(AppError::new(
                4,
                format!("Invalid {} value from FRED.", tenor.series_id()),
            ));
        }
        yields.push((*tenor, value));
    }

    Ok(CurveSnapshot {
        date: common_date,
        yields,
    })
}

/// Assemble an aligned daily panel over a trailing window of months.
///
/// Only dates on which every requested series has a value become rows, so
/// holidays and publication gaps drop out instead of producing NaNs.
pub fn fetch_panel(
    source: &impl SeriesSource,
    tenors: &[TreasuryTenor],
    window_months: u32,
    end_date: Option<NaiveDate>,
) -> Result<YieldPanel, AppError> {
    if tenors.is_empty() {
        return Err(AppError::new(2, "Panel requires at least one series."));
    }

    let mut maps: Vec<(TreasuryTenor, HashMap<NaiveDate, f64>)> = Vec::new();
    for &tenor in tenors {
        let obs = source.fetch_series(tenor, end_date)?;
        if obs.is_empty() {
            return Err(AppError::new(
                4,
                format!("No observations returned for series {}.", tenor.series_id()),
            ));
        }
        maps.push((tenor, obs.into_iter().collect()));
    }

    let latest = latest_common_date(maps.iter().map(|(_, m)| m))
        .ok_or_else(|| AppError::new(4, "No common observation date across series."))?;
    let start = latest
        .checked_sub_months(Months::new(window_months))
        .ok_or_else(|| AppError::new(2, "Window start underflows the calendar."))?;

    let mut dates: Vec<NaiveDate> = maps[0]
        .1
        .keys()
        .filter(|d| **d >= start && **d <= latest)
        .filter(|d| maps[1..].iter().all(|(_, m)| m.contains_key(*d)))
        .cloned()
        .collect();
    dates.sort();

    if dates.len() < 3 {
        return Err(AppError::new(
            4,
            format!(
                "Only {} common dates in the {window_months}-month window; not enough for daily changes.",
                dates.len()
            ),
        ));
    }

    let mut values = DMatrix::zeros(dates.len(), maps.len());
    for (j, (_, map)) in maps.iter().enumerate() {
        for (i, date) in dates.iter().enumerate() {
            values[(i, j)] = map[date];
        }
    }

    Ok(YieldPanel {
        tenors: maps.iter().map(|(t, _)| *t).collect(),
        dates,
        values,
    })
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// FRED encodes missing values as `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn latest_common_date<'a>(
    maps: impl Iterator<Item = &'a HashMap<NaiveDate, f64>>,
) -> Option<NaiveDate> {
    let mut common: Option<HashSet<NaiveDate>> = None;
    for map in maps {
        let dates: HashSet<NaiveDate> = map.keys().cloned().collect();
        common = Some(match common {
            None => dates,
            Some(mut set) => {
                set.retain(|d| dates.contains(d));
                set
            }
        });
    }
    common.and_then(|set| set.into_iter().max())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        data: HashMap<&'static str, Vec<(NaiveDate, f64)>>,
    }

    impl SeriesSource for FakeSource {
        fn fetch_series(
            &self,
            tenor: TreasuryTenor,
            _end_date: Option<NaiveDate>,
        ) -> Result<Vec<(NaiveDate, f64)>, AppError> {
            self.data
                .get(tenor.series_id())
                .cloned()
                .ok_or_else(|| AppError::new(4, format!("no such series {}", tenor.series_id())))
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn parse_value_skips_fred_missing_markers() {
        assert_eq!(parse_value("4.35"), Some(4.35));
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("  5.1 "), Some(5.1));
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn snapshot_uses_latest_common_date() {
        // Every series has day 2; only some have day 3.
        let mut data: HashMap<&'static str, Vec<(NaiveDate, f64)>> = HashMap::new();
        for (i, tenor) in TreasuryTenor::ALL.iter().enumerate() {
            let mut series = vec![(d(1), 4.0), (d(2), 4.5 + i as f64 * 0.01)];
            if i % 2 == 0 {
                series.push((d(3), 9.9));
            }
            data.insert(tenor.series_id(), series);
        }
        let source = FakeSource { data };

        let snap = fetch_snapshot(&source, None).unwrap();
        assert_eq!(snap.date, d(2));
        assert_eq!(snap.yields.len(), 11);
        assert!((snap.yields[0].1 - 4.5).abs() < 1e-12);
        // Observations come out sorted short to long.
        let obs = snap.to_observations();
        assert!(obs.windows(2).all(|w| w[0].maturity_years < w[1].maturity_years));
    }

    #[test]
    fn panel_keeps_only_fully_observed_dates() {
        let tenors = [TreasuryTenor::M1, TreasuryTenor::M3];
        let mut data: HashMap<&'static str, Vec<(NaiveDate, f64)>> = HashMap::new();
        data.insert(
            "DGS1MO",
            vec![(d(1), 5.0), (d(2), 5.1), (d(3), 5.2), (d(4), 5.3)],
        );
        // DGS3MO is missing day 3.
        data.insert("DGS3MO", vec![(d(1), 5.4), (d(2), 5.5), (d(4), 5.6)]);
        let source = FakeSource { data };

        let panel = fetch_panel(&source, &tenors, 1, None).unwrap();
        assert_eq!(panel.dates, vec![d(1), d(2), d(4)]);
        assert_eq!(panel.values.nrows(), 3);
        assert_eq!(panel.values.ncols(), 2);
        assert!((panel.values[(2, 1)] - 5.6).abs() < 1e-12);
    }

    #[test]
    fn missing_series_is_a_data_source_error() {
        let source = FakeSource {
            data: HashMap::new(),
        };
        let err = fetch_snapshot(&source, None).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
