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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// Observed/predicted pair every metric is computed from.
///
/// Both sequences are owned and never mutated after construction; `treat_values` hands back a
/// new instance instead.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorMetrics {
	pub(super) observed: Vec<f64>,
	pub(super) predicted: Vec<f64>,
	pub(super) treatment: TreatmentOptions,
}

/// Cleaning applied by `ErrorMetrics::treat_values`, never implicitly.
#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentOptions {
	/// Substitute for NaN; rows holding NaN are dropped when unset.
	pub replace_nan: Option<f64>,
	/// Substitute for +/-Inf; rows holding Inf are dropped when unset.
	pub replace_inf: Option<f64>,
	pub remove_zero: bool,
	pub remove_neg: bool,
}

/// Reference forecast of the relative-error family.
#[derive(Clone, Debug, PartialEq)]
pub enum Benchmark<'a> {
	/// Naive forecast shifted by the given lag.
	Seasonality(usize),
	Series(&'a [f64]),
}

impl Default for Benchmark<'_> {
	fn default() -> Self {
		Benchmark::Seasonality(1)
	}
}

#[derive(Default, PartialEq, Eq, Serialize, Deserialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Center {
	#[default]
	Mean,
	Median,
}

/// A Kling-Gupta efficiency with its three components. `alpha` holds gamma for the modified KGE.
#[derive(Default, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct KgeComponents {
	pub kge: f64,
	pub cc: f64,
	pub alpha: f64,
	pub beta: f64,
}

#[derive(Default, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct SeriesStats {
	pub len: usize,
	pub minimum: f64,
	pub maximum: f64,
	pub mean: f64,
	pub median: f64,
	pub stdev: f64,
	pub variance: f64,
	pub q25: f64,
	pub q75: f64,
	pub skewness: f64,
	pub kurtosis: f64,
}

#[derive(Default, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct MetricsStats {
	pub observed: SeriesStats,
	pub predicted: SeriesStats,
}

#[derive(Default, Serialize, Clone, Debug, PartialEq)]
pub struct MetricsReport {
	pub errors: BTreeMap<&'static str, Option<f64>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stats: Option<MetricsStats>,
}

/// Properties of a dataset deciding which metrics may run on it.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataProfile {
	pub has_negative: bool,
	pub has_non_positive: bool,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Applicability {
	Always,
	/// Needs log1p of both sequences.
	NonNegative,
	/// Needs logs or ratios of both sequences.
	StrictlyPositive,
	/// Never part of `calculate_all`, only computed when asked for.
	OnRequest,
}

impl Applicability {
	pub fn applies(&self, profile: &DataProfile) -> bool {
		match self {
			Applicability::Always => true,
			Applicability::NonNegative => !profile.has_negative,
			Applicability::StrictlyPositive => !profile.has_non_positive,
			Applicability::OnRequest => false,
		}
	}
}

pub type MetricFn = fn(&ErrorMetrics) -> Result<Option<f64>>;

#[derive(Clone, Copy)]
pub struct MetricEntry {
	pub name: &'static str,
	pub applicability: Applicability,
	pub compute: MetricFn,
}

impl std::fmt::Debug for MetricEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MetricEntry")
			.field("name", &self.name)
			.field("applicability", &self.applicability)
			.finish()
	}
}
