/*
 * covid-forecast, short-horizon COVID-19 forecasting with a searched CNN
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use burn::config::Config;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum_macros::{EnumIter, EnumString};

use crate::train::typedef::{HyperparameterConfig, SearchConfig};

pub const DEFAULT_DATE_FORMAT: &'static str = "%d/%m/%Y";

#[derive(Default, Serialize, Clone, Debug)]
pub struct ErrorInfo {
	pub title: Cow<'static, str>,
	pub message: String,
}

#[derive(
	Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, Deserialize, Serialize,
	Clone, Copy, Debug,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Study {
	#[default]
	Confirmed,
	Deaths,
	Recovered,
}

impl std::fmt::Display for Study {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Study::Confirmed => write!(f, "confirmed"),
			Study::Deaths => write!(f, "deaths"),
			Study::Recovered => write!(f, "recovered"),
		}
	}
}

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct NormalParam {
	pub mean: f64,
	pub stdev: f64,
}

/// Knobs of one forecast request. The defaults reproduce the dashboard's behaviour.
#[derive(Config, Debug)]
pub struct ForecastConfig {
	pub search: SearchConfig,

	/// Width of the sliding window fed to the network.
	#[config(default = 14)]
	pub window: usize,

	/// Days rolled forward autoregressively.
	#[config(default = 14)]
	pub horizon: usize,

	/// Days surfaced to the caller, taken from the front of the horizon.
	#[config(default = 7)]
	pub reported_days: usize,

	#[config(default = 0.85)]
	pub train_fraction: f64,

	/// Lag of the naive benchmark inside MASE.
	#[config(default = 1)]
	pub seasonality: usize,

	/// Held-out MASE at or below this value accepts the learned forecast.
	#[config(default = 1.0)]
	pub mase_threshold: f64,

	/// Number of trailing cumulative points inspected by the slope check.
	#[config(default = 5)]
	pub slope_points: usize,

	pub seed: Option<u64>,

	pub date_format: Option<String>,
}

impl ForecastConfig {
	pub fn date_format(&self) -> &str {
		self.date_format
			.as_deref()
			.unwrap_or(DEFAULT_DATE_FORMAT)
	}
}

impl Default for ForecastConfig {
	fn default() -> Self {
		ForecastConfig::new(SearchConfig::default())
	}
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ForecastOutcome {
	/// The CNN forecast was trusted.
	Learned { params: HyperparameterConfig },
	/// Flat repetition of the last known value.
	Naive,
}

/// What the presentation layer receives for one (country, study) request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
	pub country: String,
	pub study: Study,
	pub dates: Vec<NaiveDate>,
	pub cases: Vec<i64>,
	#[serde(with = "nullable_score")]
	pub accuracy_score: f64,
	pub outcome: ForecastOutcome,
}

impl ForecastResult {
	pub fn is_naive(&self) -> bool {
		matches!(self.outcome, ForecastOutcome::Naive)
	}

	pub fn formatted_dates(&self, format: &str) -> Vec<String> {
		self.dates
			.iter()
			.map(|each| each.format(format).to_string())
			.collect::<Vec<_>>()
	}
}

// A degenerate MASE (flat benchmark) is not representable in JSON, keep it as null
mod nullable_score {
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
		if value.is_finite() {
			serializer.serialize_some(value)
		} else {
			serializer.serialize_none()
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
		Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	#[test]
	fn study_parses_case_insensitively() {
		assert_eq!(Study::from_str("Deaths").unwrap(), Study::Deaths);
		assert_eq!(Study::from_str("recovered").unwrap(), Study::Recovered);
		assert!(Study::from_str("hospitalised").is_err());
		assert_eq!(Study::Confirmed.to_string(), "confirmed");
	}

	#[test]
	fn default_config_matches_dashboard() {
		let config = ForecastConfig::default();

		assert_eq!(config.window, 14);
		assert_eq!(config.horizon, 14);
		assert_eq!(config.reported_days, 7);
		assert_eq!(config.date_format(), "%d/%m/%Y");
		assert_eq!(config.search.grid.len(), 72);
	}

	#[test]
	fn non_finite_score_survives_json() {
		let result = ForecastResult {
			country: String::from("India"),
			study: Study::Confirmed,
			dates: vec![NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()],
			cases: vec![10],
			accuracy_score: f64::INFINITY,
			outcome: ForecastOutcome::Naive,
		};

		let json = serde_json::to_string(&result).unwrap();
		assert!(json.contains("\"accuracyScore\":null"));

		let back: ForecastResult = serde_json::from_str(&json).unwrap();
		assert!(back.accuracy_score.is_nan());
		assert_eq!(back.formatted_dates("%d/%m/%Y"), vec!["01/03/2021"]);
	}
}
