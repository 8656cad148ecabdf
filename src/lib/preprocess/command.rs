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

use tracing::debug;

use super::helper::*;
use super::typedef::*;
use crate::data::CumulativeSeries;
use crate::error::{ForecastError, Result};

/// Drops zero days, differences the rest and slides a `window`-wide frame over the deltas.
///
/// Never fails: a history too short for one sample yields an empty sample list, and callers
/// that need samples go through `WindowedDataset::split`.
pub fn make_series(series: &CumulativeSeries, window: usize) -> WindowedDataset {
	let (dates, values): (Vec<_>, Vec<_>) = series
		.dates
		.iter()
		.zip(series.values.iter())
		.filter(|(_, value)| **value != 0f64)
		.map(|(date, value)| (*date, *value))
		.unzip();

	let deltas = DeltaSeries {
		dates: dates.iter().skip(1).cloned().collect::<Vec<_>>(),
		values: values
			.iter()
			.zip(values.iter().skip(1))
			.map(|(now, next)| next - now)
			.collect::<Vec<_>>(),
	};

	let samples = if window == 0 {
		Vec::new()
	} else {
		deltas
			.values
			.windows(window + 1)
			.map(|each| WindowedSample {
				window: each[..window].to_vec(),
				target: each[window],
			})
			.collect::<Vec<_>>()
	};

	debug!(
		country = %series.country,
		study = %series.study,
		retained = values.len(),
		samples = samples.len(),
		"windowed series"
	);

	WindowedDataset {
		history: CumulativeSeries {
			country: series.country.clone(),
			study: series.study,
			dates,
			values,
		},
		deltas,
		samples,
		window,
	}
}

impl DeltaSeries {
	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// The most recent `count` deltas, or all of them when there are fewer.
	pub fn tail(&self, count: usize) -> &[f64] {
		&self.values[self.values.len().saturating_sub(count)..]
	}

	/// Cumulative values rebuilt from `anchor`, the count on the day before the first delta.
	pub fn reconstruct(&self, anchor: f64) -> Vec<f64> {
		accumulate(anchor, self.values.iter().cloned())
	}
}

impl WindowedDataset {
	pub fn windows(&self) -> Vec<Vec<f64>> {
		self.samples
			.iter()
			.map(|each| each.window.clone())
			.collect::<Vec<_>>()
	}

	pub fn targets(&self) -> Vec<f64> {
		self.samples.iter().map(|each| each.target).collect::<Vec<_>>()
	}

	pub fn last_value(&self) -> Option<f64> {
		self.history.values.last().cloned()
	}

	/// Retained cumulative points needed before `split` can succeed.
	pub fn required_points(&self, train_fraction: f64) -> usize {
		minimum_samples(train_fraction).saturating_add(self.window + 1)
	}

	/// Chronological split; the first `train_fraction` of samples train, the rest test.
	pub fn split(&self, train_fraction: f64) -> Result<SampleSplit<'_>> {
		let train = train_length(self.samples.len(), train_fraction);
		if train == 0 || train >= self.samples.len() {
			return Err(ForecastError::InsufficientData {
				needed: self.required_points(train_fraction),
				got: self.history.values.len(),
			});
		}

		Ok(SampleSplit {
			train: &self.samples[..train],
			test: &self.samples[train..],
		})
	}

	/// Fails with `InsufficientData` unless at least one sample exists.
	pub fn ensure_samples(&self) -> Result<()> {
		if self.samples.is_empty() {
			return Err(ForecastError::InsufficientData {
				needed: self.window + 2,
				got: self.history.values.len(),
			});
		}
		Ok(())
	}
}
