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

use burn::tensor::backend::Backend;
use tracing::{debug, info};

use super::helper::*;
use super::typedef::*;
use crate::data::{CaseTables, CumulativeSeries};
use crate::error::{ForecastError, Result};
use crate::preprocess::helper::accumulate;
use crate::preprocess::{make_series, WindowedDataset};
use crate::train::{helper::predict, ModelSearch, TrainedModel};
use crate::typedef::{ForecastConfig, ForecastOutcome, ForecastResult, Study};

impl<B: Backend> StepModel for TrainedModel<B> {
	fn window(&self) -> usize {
		self.window
	}

	fn predict_next(&self, window: &[f64]) -> Result<f64> {
		let device = B::Device::default();
		predict(self, &[window], &device)?
			.first()
			.cloned()
			.ok_or_else(|| ForecastError::Training(String::from("the network returned no prediction")))
	}
}

impl Forecaster {
	pub fn new(horizon: usize, reported_days: usize) -> Self {
		Self {
			horizon,
			reported_days,
		}
	}

	pub fn from_config(config: &ForecastConfig) -> Self {
		Self::new(config.horizon, config.reported_days)
	}

	/// Predicts `horizon` deltas, feeding each prediction back as the newest window value.
	pub fn rollout<M: StepModel>(&self, model: &M, deltas: &[f64]) -> Result<Vec<f64>> {
		let window = model.window();
		if window == 0 || deltas.len() < window {
			return Err(ForecastError::InsufficientData {
				needed: window + 1,
				got: deltas.len() + 1,
			});
		}

		let mut recent = deltas[deltas.len() - window..].to_vec();
		let mut predicted = Vec::<f64>::with_capacity(self.horizon);
		for _ in 0..self.horizon {
			let next = model.predict_next(&recent)?;
			recent.rotate_left(1);
			if let Some(newest) = recent.last_mut() {
				*newest = next;
			}
			predicted.push(next);
		}

		Ok(predicted)
	}

	/// Rolls the model forward from the end of `dataset` and rebuilds cumulative values.
	pub fn forecast<M: StepModel>(&self, model: &M, dataset: &WindowedDataset) -> Result<LearnedForecast> {
		let anchor = dataset.last_value().ok_or(ForecastError::InsufficientData {
			needed: dataset.window + 1,
			got: 0,
		})?;

		let deltas = self.rollout(model, &dataset.deltas.values)?;
		let cumulative = accumulate(anchor, deltas.iter().cloned());
		let cases = truncate_cases(&cumulative[..self.reported_days.min(cumulative.len())]);

		Ok(LearnedForecast {
			deltas,
			cumulative,
			cases,
		})
	}
}

impl FallbackPolicy {
	pub fn new(mase_threshold: f64, slope_points: usize) -> Self {
		Self {
			mase_threshold,
			slope_points,
		}
	}

	pub fn from_config(config: &ForecastConfig) -> Self {
		Self::new(config.mase_threshold, config.slope_points)
	}

	/// A NaN score never passes the threshold; the slope check alone decides then.
	pub fn decide(&self, held_out_mase: f64, history: &[f64]) -> FallbackDecision {
		if held_out_mase <= self.mase_threshold {
			FallbackDecision::AcceptedByScore
		} else if check_slope(history, self.slope_points) {
			FallbackDecision::AcceptedBySlope
		} else {
			FallbackDecision::Naive
		}
	}

	/// The last known value repeated for every reported day.
	pub fn naive_forecast(&self, history: &[f64], days: usize) -> Vec<i64> {
		naive_forecast(history.last().cloned().unwrap_or_default(), days)
	}
}

pub fn validate_config(config: &ForecastConfig) -> Result<()> {
	let problem = if !(config.train_fraction > 0f64 && config.train_fraction < 1f64) {
		Some(format!("train_fraction {} is outside (0, 1)", config.train_fraction))
	} else if config.window == 0 {
		Some(String::from("window must be positive"))
	} else if config.horizon == 0 || config.reported_days == 0 {
		Some(String::from("horizon and reported_days must be positive"))
	} else if config.reported_days > config.horizon {
		Some(format!(
			"cannot report {} days out of a {} day horizon",
			config.reported_days, config.horizon
		))
	} else if config.seasonality == 0 {
		Some(String::from("seasonality must be positive"))
	} else if config.slope_points < 2 {
		Some(String::from("the slope check needs at least 2 points"))
	} else if config.search.batch_size == 0 {
		Some(String::from("batch_size must be positive"))
	} else {
		None
	};

	match problem {
		Some(message) => Err(ForecastError::Validation(message)),
		None => Ok(()),
	}
}

/// Full request for one cumulative series: window, search, held-out check, then forecast.
pub fn forecast_series(series: &CumulativeSeries, config: &ForecastConfig) -> Result<ForecastResult> {
	validate_config(config)?;

	let dataset = make_series(series, config.window);
	let split = dataset.split(config.train_fraction)?;
	let last_date = dataset
		.history
		.dates
		.last()
		.cloned()
		.ok_or(ForecastError::InsufficientData {
			needed: dataset.required_points(config.train_fraction),
			got: 0,
		})?;
	let dates = forecast_dates(last_date, config.reported_days)?;

	let search = ModelSearch::from_forecast_config(config);
	let outcome = search.select(split.train)?;
	let params = outcome.best.params;
	let held_out_mase = search.test_model(&params, &split, &dataset.history)?;

	let policy = FallbackPolicy::from_config(config);
	let decision = policy.decide(held_out_mase, &dataset.history.values);
	info!(
		country = %series.country,
		study = %series.study,
		held_out_mase,
		?decision,
		"fallback decision"
	);

	let (cases, accuracy_score, outcome) = if decision.is_learned() {
		let model = search.fit(&params, &dataset.samples)?;
		let forecast = Forecaster::from_config(config).forecast(&model, &dataset)?;
		debug!(deltas = ?forecast.deltas, "rolled forward");
		(forecast.cases, held_out_mase, ForecastOutcome::Learned { params })
	} else {
		(
			policy.naive_forecast(&dataset.history.values, config.reported_days),
			1f64,
			ForecastOutcome::Naive,
		)
	};

	Ok(ForecastResult {
		country: series.country.clone(),
		study: series.study,
		dates,
		cases,
		accuracy_score,
		outcome,
	})
}

/// Looks the series up in `tables` and forecasts it.
pub fn forecast(
	tables: &CaseTables,
	study: Study,
	country: &str,
	config: &ForecastConfig,
) -> Result<ForecastResult> {
	let series = tables.series(study, country)?;
	forecast_series(&series, config)
}
