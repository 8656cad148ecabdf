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

use std::{fs::File, io::BufWriter, path::Path};
use tracing::warn;

use super::helper::*;
use super::registry::registry;
use super::typedef::*;
use crate::error::{ForecastError, Result};

impl ErrorMetrics {
	/// Fails when either sequence is empty or their lengths differ.
	pub fn new(observed: &[f64], predicted: &[f64]) -> Result<Self> {
		if observed.is_empty() || predicted.is_empty() {
			return Err(ForecastError::Validation(String::from(
				"input arrays should not be empty",
			)));
		}

		if observed.len() != predicted.len() {
			return Err(ForecastError::Validation(format!(
				"lengths of provided arrays mismatch, predicted array: {}, true array: {}",
				predicted.len(),
				observed.len()
			)));
		}

		Ok(Self {
			observed: observed.to_vec(),
			predicted: predicted.to_vec(),
			treatment: TreatmentOptions::default(),
		})
	}

	pub fn with_treatment(mut self, treatment: TreatmentOptions) -> Self {
		self.treatment = treatment;
		self
	}

	pub fn observed(&self) -> &[f64] {
		&self.observed
	}

	pub fn predicted(&self) -> &[f64] {
		&self.predicted
	}

	pub fn treatment(&self) -> &TreatmentOptions {
		&self.treatment
	}

	pub fn len(&self) -> usize {
		self.observed.len()
	}

	pub fn is_empty(&self) -> bool {
		self.observed.is_empty()
	}

	/// Applies the configured NaN/Inf/zero/negative treatment and returns the cleaned pair.
	///
	/// Rows are dropped pairwise so positions keep corresponding. Fails when nothing survives.
	pub fn treat_values(&self) -> Result<Self> {
		let mut observed = self.observed.clone();
		let mut predicted = self.predicted.clone();
		let mut keep = vec![true; observed.len()];

		if observed.iter().chain(predicted.iter()).any(|each| each.is_nan()) {
			match self.treatment.replace_nan {
				Some(substitute) => {
					let replaced = replace_where(&mut observed, &mut predicted, |each| each.is_nan(), substitute);
					warn!(rows = ?replaced, "NaN values have been replaced");
				}
				None => {
					let dropped = drop_where(&observed, &predicted, &mut keep, |each| each.is_nan());
					warn!(rows = ?dropped, "rows containing NaN values have been removed");
				}
			}
		}

		if observed.iter().chain(predicted.iter()).any(|each| each.is_infinite()) {
			match self.treatment.replace_inf {
				Some(substitute) => {
					let replaced = replace_where(&mut observed, &mut predicted, |each| each.is_infinite(), substitute);
					warn!(rows = ?replaced, "Inf values have been replaced");
				}
				None => {
					let dropped = drop_where(&observed, &predicted, &mut keep, |each| each.is_infinite());
					warn!(rows = ?dropped, "rows containing Inf or -Inf values have been removed");
				}
			}
		}

		if self.treatment.remove_zero {
			let dropped = drop_where(&observed, &predicted, &mut keep, |each| each == 0f64);
			if !dropped.is_empty() {
				warn!(rows = ?dropped, "rows containing zero values have been removed");
			}
		}

		if self.treatment.remove_neg {
			let dropped = drop_where(&observed, &predicted, &mut keep, |each| each < 0f64);
			if !dropped.is_empty() {
				warn!(rows = ?dropped, "rows containing negative values have been removed");
			}
		}

		let observed = observed
			.iter()
			.zip(keep.iter())
			.filter_map(|(value, kept)| kept.then_some(*value))
			.collect::<Vec<_>>();
		let predicted = predicted
			.iter()
			.zip(keep.iter())
			.filter_map(|(value, kept)| kept.then_some(*value))
			.collect::<Vec<_>>();

		Ok(Self::new(&observed, &predicted)?.with_treatment(self.treatment))
	}

	pub fn profile(&self) -> DataProfile {
		let values = || self.observed.iter().chain(self.predicted.iter());

		DataProfile {
			has_negative: values().any(|each| *each < 0f64),
			has_non_positive: values().any(|each| *each <= 0f64),
		}
	}

	/// Names of the registered metrics that `calculate_all` would run on this data.
	pub fn enabled_metrics(&self) -> Vec<&'static str> {
		let profile = self.profile();
		registry()
			.iter()
			.filter(|each| each.applicability.applies(&profile))
			.map(|each| each.name)
			.collect::<Vec<_>>()
	}

	/// Computes a single registered metric by name, whatever its applicability.
	pub fn calculate(&self, name: &str) -> Result<Option<f64>> {
		let entry = registry()
			.into_iter()
			.find(|each| each.name == name)
			.ok_or_else(|| ForecastError::Validation(format!("unknown metric \"{}\"", name)))?;

		(entry.compute)(self)
	}

	/// Runs every applicable metric. A `None` entry is a metric that is undefined for this data.
	pub fn calculate_all(&self, statistics: bool) -> Result<MetricsReport> {
		let profile = self.profile();

		let errors = registry()
			.iter()
			.filter(|each| each.applicability.applies(&profile))
			.map(|each| Ok((each.name, (each.compute)(self)?)))
			.collect::<Result<_>>()?;

		Ok(MetricsReport {
			errors,
			stats: statistics.then(|| self.stats()),
		})
	}

	pub fn write_report<P: AsRef<Path>>(&self, path: P, statistics: bool) -> Result<MetricsReport> {
		let report = self.calculate_all(statistics)?;
		let writer = BufWriter::new(File::create(path)?);
		serde_json::to_writer_pretty(writer, &report)?;

		Ok(report)
	}

	pub fn stats(&self) -> MetricsStats {
		MetricsStats {
			observed: series_stats(&self.observed),
			predicted: series_stats(&self.predicted),
		}
	}
}

fn replace_where(
	observed: &mut [f64],
	predicted: &mut [f64],
	predicate: impl Fn(f64) -> bool,
	substitute: f64,
) -> Vec<usize> {
	let mut replaced = Vec::<usize>::new();
	for (index, (t, p)) in observed.iter_mut().zip(predicted.iter_mut()).enumerate() {
		let mut touched = false;
		if predicate(*t) {
			*t = substitute;
			touched = true;
		}
		if predicate(*p) {
			*p = substitute;
			touched = true;
		}
		if touched {
			replaced.push(index);
		}
	}
	replaced
}

fn drop_where(
	observed: &[f64],
	predicted: &[f64],
	keep: &mut [bool],
	predicate: impl Fn(f64) -> bool,
) -> Vec<usize> {
	let mut dropped = Vec::<usize>::new();
	for (index, (t, p)) in observed.iter().zip(predicted.iter()).enumerate() {
		if predicate(*t) || predicate(*p) {
			keep[index] = false;
			dropped.push(index);
		}
	}
	dropped
}

fn series_stats(values: &[f64]) -> SeriesStats {
	let m = mean(values);
	let stdev = std(values, 0);
	let moment = |order: i32| {
		values
			.iter()
			.fold(0f64, |last_value, each| last_value + ((each - m) / stdev).powi(order))
			/ values.len() as f64
	};

	SeriesStats {
		len: values.len(),
		minimum: values.iter().cloned().fold(f64::INFINITY, f64::min),
		maximum: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
		mean: m,
		median: median(values),
		stdev,
		variance: variance(values, 0),
		q25: percentile(values, 25f64),
		q75: percentile(values, 75f64),
		skewness: moment(3),
		kurtosis: moment(4) - 3f64,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn construction_validates_inputs() {
		assert!(matches!(
			ErrorMetrics::new(&[], &[]),
			Err(ForecastError::Validation(_))
		));
		assert!(matches!(
			ErrorMetrics::new(&[1.0, 2.0], &[1.0]),
			Err(ForecastError::Validation(_))
		));
		assert!(ErrorMetrics::new(&[1.0], &[2.0]).is_ok());
	}

	#[test]
	fn treatment_is_not_applied_implicitly() {
		let metrics = ErrorMetrics::new(&[1.0, 0.0, 3.0], &[1.0, 2.0, 3.0])
			.unwrap()
			.with_treatment(TreatmentOptions {
				remove_zero: true,
				..Default::default()
			});

		assert_eq!(metrics.len(), 3);
		let treated = metrics.treat_values().unwrap();
		assert_eq!(treated.observed(), &[1.0, 3.0]);
		assert_eq!(treated.predicted(), &[1.0, 3.0]);
		// the source pair is untouched
		assert_eq!(metrics.observed(), &[1.0, 0.0, 3.0]);
	}

	#[test]
	fn treatment_drops_rows_pairwise() {
		let metrics = ErrorMetrics::new(
			&[1.0, f64::NAN, 3.0, -4.0, 5.0],
			&[1.0, 2.0, f64::INFINITY, 4.0, 6.0],
		)
		.unwrap()
		.with_treatment(TreatmentOptions {
			remove_neg: true,
			..Default::default()
		});

		let treated = metrics.treat_values().unwrap();
		assert_eq!(treated.observed(), &[1.0, 5.0]);
		assert_eq!(treated.predicted(), &[1.0, 6.0]);
	}

	#[test]
	fn treatment_replaces_nan_and_inf_with_their_own_substitutes() {
		let metrics = ErrorMetrics::new(&[f64::NAN, 2.0], &[1.0, f64::NEG_INFINITY])
			.unwrap()
			.with_treatment(TreatmentOptions {
				replace_nan: Some(0.5),
				replace_inf: Some(9.0),
				..Default::default()
			});

		let treated = metrics.treat_values().unwrap();
		assert_eq!(treated.observed(), &[0.5, 2.0]);
		assert_eq!(treated.predicted(), &[1.0, 9.0]);
	}

	#[test]
	fn treatment_that_removes_everything_is_a_validation_error() {
		let metrics = ErrorMetrics::new(&[0.0, 0.0], &[1.0, 2.0])
			.unwrap()
			.with_treatment(TreatmentOptions {
				remove_zero: true,
				..Default::default()
			});

		assert!(matches!(
			metrics.treat_values(),
			Err(ForecastError::Validation(_))
		));
	}

	#[test]
	fn deviance_metrics_are_excluded_on_non_positive_data() {
		let positive = ErrorMetrics::new(&[1.0, 2.0, 3.0], &[1.5, 2.5, 2.0]).unwrap();
		let enabled = positive.enabled_metrics();
		assert!(enabled.contains(&"mean_gamma_deviance"));
		assert!(enabled.contains(&"mean_poisson_deviance"));
		assert!(enabled.contains(&"mean_square_log_error"));
		assert!(!enabled.contains(&"brier_score"));

		let with_zero = ErrorMetrics::new(&[0.0, 2.0, 3.0], &[1.5, 2.5, 2.0]).unwrap();
		let enabled = with_zero.enabled_metrics();
		assert!(!enabled.contains(&"mean_gamma_deviance"));
		assert!(!enabled.contains(&"mean_poisson_deviance"));
		assert!(enabled.contains(&"mean_square_log_error"));

		let with_negative = ErrorMetrics::new(&[-1.0, 2.0, 3.0], &[1.5, 2.5, 2.0]).unwrap();
		let enabled = with_negative.enabled_metrics();
		assert!(!enabled.contains(&"mean_square_log_error"));
	}

	#[test]
	fn calculate_all_keeps_undefined_metrics_as_none() {
		// one side is zero where the other is not, so the symmetric KL divergence is undefined
		let metrics = ErrorMetrics::new(&[0.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.5, 4.5]).unwrap();
		let report = metrics.calculate_all(true).unwrap();

		assert_eq!(report.errors.get("kl_sym"), Some(&None));
		assert!(report.errors.get("mae").unwrap().is_some());
		assert!(!report.errors.contains_key("brier_score"));
		assert!(report.stats.is_some());
	}

	#[test]
	fn calculate_by_name() {
		let metrics = ErrorMetrics::new(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]).unwrap();
		assert_relative_eq!(metrics.calculate("mae").unwrap().unwrap(), 2.0 / 3.0);
		assert!(metrics.calculate("no_such_metric").is_err());
	}

	#[test]
	fn report_is_written_as_json() {
		let directory = tempfile::tempdir().unwrap();
		let path = directory.path().join("errors.json");
		let metrics = ErrorMetrics::new(&[1.0, 2.0, 3.0, 4.0], &[1.1, 1.9, 3.2, 3.9]).unwrap();

		metrics.write_report(&path, false).unwrap();
		let written: serde_json::Value =
			serde_json::from_reader(File::open(&path).unwrap()).unwrap();
		assert!(written["errors"]["rmse"].is_number());
	}

	#[test]
	fn stats_summarise_both_sequences() {
		let metrics = ErrorMetrics::new(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 2.0, 2.0, 2.0, 2.0]).unwrap();
		let stats = metrics.stats();

		assert_eq!(stats.observed.len, 5);
		assert_relative_eq!(stats.observed.mean, 3.0);
		assert_relative_eq!(stats.observed.median, 3.0);
		assert_relative_eq!(stats.observed.skewness, 0.0);
		assert_relative_eq!(stats.observed.minimum, 1.0);
		assert_relative_eq!(stats.predicted.variance, 0.0);
	}
}
