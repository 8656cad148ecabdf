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

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::Autodiff;
use burn::backend::NdArray;
use burn::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::helper::*;
use super::typedef::*;
use crate::data::CumulativeSeries;
use crate::error::{ForecastError, Result};
use crate::metrics::ErrorMetrics;
use crate::preprocess::helper::accumulate;
use crate::preprocess::{SampleSplit, WindowedSample};
use crate::typedef::ForecastConfig;

pub type TrainBackend = Autodiff<NdArray>;
pub type InferenceBackend = NdArray;

impl ParamGrid {
	pub fn len(&self) -> usize {
		self.filters.len()
			* self.nodes.len()
			* self.epochs.len()
			* self.activation_conv.len()
			* self.activation_dense.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn contains(&self, params: &HyperparameterConfig) -> bool {
		self.filters.contains(&params.filters)
			&& self.nodes.contains(&params.nodes)
			&& self.epochs.contains(&params.epochs)
			&& self.activation_conv.contains(&params.activation_conv)
			&& self.activation_dense.contains(&params.activation_dense)
	}
}

/// Every grid point, keys taken in name order with the last key varying fastest.
pub fn create_param_grid(grid: &ParamGrid) -> Vec<HyperparameterConfig> {
	let mut points = Vec::<HyperparameterConfig>::with_capacity(grid.len());

	for activation_conv in grid.activation_conv.iter() {
		for activation_dense in grid.activation_dense.iter() {
			for epochs in grid.epochs.iter() {
				for filters in grid.filters.iter() {
					for nodes in grid.nodes.iter() {
						points.push(HyperparameterConfig {
							filters: *filters,
							nodes: *nodes,
							epochs: *epochs,
							activation_conv: *activation_conv,
							activation_dense: *activation_dense,
						});
					}
				}
			}
		}
	}

	points
}

/// Minimal score wins, a NaN score loses to anything, ties keep the earliest candidate.
pub fn get_best_params(candidates: &[ScoredConfig]) -> Option<ScoredConfig> {
	candidates.iter().fold(None, |last_value: Option<ScoredConfig>, each| match last_value {
		None => Some(*each),
		Some(best) => match compare_scores(each.score, best.score) {
			Ordering::Less => Some(*each),
			_ => Some(best),
		},
	})
}

fn compare_scores(left: f64, right: f64) -> Ordering {
	match (left.is_nan(), right.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
	}
}

/// MASE rounded to two decimals, half to even.
pub(crate) fn round_score(score: f64) -> f64 {
	if score.is_finite() {
		(score * 100f64).round_ties_even() / 100f64
	} else {
		score
	}
}

/// Grid search over CNN configurations for one windowed series.
#[derive(Clone, Debug)]
pub struct ModelSearch {
	config: SearchConfig,
	window: usize,
	seasonality: usize,
	seed: Option<u64>,
	device: NdArrayDevice,
}

impl ModelSearch {
	pub fn new(config: SearchConfig, window: usize) -> Self {
		Self {
			config,
			window,
			seasonality: 1,
			seed: None,
			device: NdArrayDevice::Cpu,
		}
	}

	pub fn from_forecast_config(config: &ForecastConfig) -> Self {
		Self::new(config.search.clone(), config.window)
			.with_seasonality(config.seasonality)
			.with_seed(config.seed)
	}

	pub fn with_seasonality(mut self, seasonality: usize) -> Self {
		self.seasonality = seasonality;
		self
	}

	pub fn with_seed(mut self, seed: Option<u64>) -> Self {
		self.seed = seed;
		self
	}

	pub fn config(&self) -> &SearchConfig {
		&self.config
	}

	pub fn device(&self) -> &NdArrayDevice {
		&self.device
	}

	/// Trains one configuration on `samples` and hands back the inference model.
	pub fn fit(
		&self,
		params: &HyperparameterConfig,
		samples: &[WindowedSample],
	) -> Result<TrainedModel<InferenceBackend>> {
		let random_seed: u64 = self.seed.unwrap_or_else(rand::random);
		TrainBackend::seed(random_seed);

		let input = send_batches_to_device::<TrainBackend>(
			samples,
			self.window,
			self.config.batch_size,
			&self.device,
		)?;
		train_new_model(input, params, self.window, &self.config, &self.device)
	}

	pub fn predict(
		&self,
		model: &TrainedModel<InferenceBackend>,
		samples: &[WindowedSample],
	) -> Result<Vec<f64>> {
		let windows = samples
			.iter()
			.map(|each| each.window.as_slice())
			.collect::<Vec<_>>();
		predict(model, &windows, &self.device)
	}

	/// In-sample MASE of one configuration trained on `samples`.
	pub fn score(&self, params: &HyperparameterConfig, samples: &[WindowedSample]) -> Result<ScoredConfig> {
		let model = self.fit(params, samples)?;
		let predictions = self.predict(&model, samples)?;
		let targets = samples.iter().map(|each| each.target).collect::<Vec<_>>();

		let score = ErrorMetrics::new(&targets, &predictions)?.mase(self.seasonality);
		debug!(%params, score, "scored candidate");

		Ok(ScoredConfig {
			params: *params,
			score,
		})
	}

	/// Scores every grid point. Failed candidates are left out; only a fully failed grid errors.
	pub fn hyperparameter_tuning(&self, train: &[WindowedSample]) -> Result<Vec<ScoredConfig>> {
		if train.is_empty() {
			return Err(ForecastError::InsufficientData {
				needed: self.window + 2,
				got: 0,
			});
		}

		let grid = create_param_grid(&self.config.grid);
		if grid.is_empty() {
			return Err(ForecastError::Validation(String::from(
				"the hyperparameter grid is empty",
			)));
		}

		let mut last_error = None;
		let scored = grid
			.iter()
			.filter_map(|params| match self.score(params, train) {
				Ok(ok) => Some(ok),
				Err(err) => {
					warn!(%params, error = %err, "candidate discarded");
					last_error = Some(err);
					None
				}
			})
			.collect::<Vec<_>>();

		if scored.is_empty() {
			return Err(ForecastError::Training(format!(
				"all {} candidates failed, last error: {}",
				grid.len(),
				last_error
					.map(|err| err.to_string())
					.unwrap_or_default()
			)));
		}

		Ok(scored)
	}

	/// Runs the grid on the train split and keeps the configuration with the lowest in-sample MASE.
	pub fn select(&self, train: &[WindowedSample]) -> Result<SearchOutcome> {
		let candidates = self.hyperparameter_tuning(train)?;
		let best = get_best_params(&candidates).ok_or_else(|| {
			ForecastError::Training(String::from("no candidate survived the search"))
		})?;

		info!(
			params = %best.params,
			score = best.score,
			candidates = candidates.len(),
			"selected configuration"
		);

		Ok(SearchOutcome { best, candidates })
	}

	/// Retrains on the train split and scores the cumulative reconstruction of the test split.
	///
	/// `history` is the zero-stripped cumulative series the split was windowed from; its tail
	/// holds the true cumulative values of the test targets.
	pub fn test_model(
		&self,
		params: &HyperparameterConfig,
		split: &SampleSplit<'_>,
		history: &CumulativeSeries,
	) -> Result<f64> {
		let test_length = split.test.len();
		if test_length == 0 || history.values.len() <= test_length {
			return Err(ForecastError::InsufficientData {
				needed: test_length + self.window + 2,
				got: history.values.len(),
			});
		}

		let model = self.fit(params, split.train)?;
		let predictions = self.predict(&model, split.test)?;

		let anchor_index = history.values.len() - test_length - 1;
		let reconstructed = accumulate(history.values[anchor_index], predictions);
		let observed = &history.values[anchor_index + 1..];

		let score = round_score(ErrorMetrics::new(observed, &reconstructed)?.mase(self.seasonality));
		info!(%params, held_out_mase = score, "held-out evaluation");
		Ok(score)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scored(filters: usize, score: f64) -> ScoredConfig {
		ScoredConfig {
			params: HyperparameterConfig {
				filters,
				nodes: 60,
				epochs: 60,
				activation_conv: Activation::Relu,
				activation_dense: Activation::Relu,
			},
			score,
		}
	}

	fn tiny_search() -> ModelSearch {
		let grid = ParamGrid {
			filters: vec![2],
			nodes: vec![3],
			epochs: vec![2, 3],
			activation_conv: vec![Activation::Relu],
			activation_dense: vec![Activation::Tanh],
		};
		ModelSearch::new(SearchConfig::new().with_grid(grid), 3).with_seed(Some(7))
	}

	fn linear_samples(count: usize) -> Vec<WindowedSample> {
		(0..count)
			.map(|index| WindowedSample {
				window: vec![index as f64, index as f64 + 1.0, index as f64 + 2.0],
				target: index as f64 + 3.0,
			})
			.collect::<Vec<_>>()
	}

	#[test]
	fn default_grid_has_seventy_two_points() {
		let grid = ParamGrid::default();
		let points = create_param_grid(&grid);

		assert_eq!(points.len(), 72);
		assert_eq!(grid.len(), 72);
		assert!(points.iter().all(|each| grid.contains(each)));

		assert_eq!(points[0].activation_conv, Activation::Swish);
		assert_eq!((points[0].filters, points[0].nodes), (60, 60));
		assert_eq!(points[1].nodes, 70);
		assert_eq!(points[71].activation_dense, Activation::Tanh);
	}

	#[test]
	fn best_params_is_minimal_and_stable() {
		let candidates = vec![
			scored(1, f64::NAN),
			scored(2, 0.4),
			scored(3, 0.4),
			scored(4, f64::INFINITY),
		];

		let best = get_best_params(&candidates).unwrap();
		assert_eq!(best.params.filters, 2);
		assert!(candidates
			.iter()
			.all(|each| each.score.is_nan() || best.score <= each.score));

		assert!(get_best_params(&[]).is_none());
		assert_eq!(get_best_params(&[scored(5, f64::NAN)]).unwrap().params.filters, 5);
	}

	#[test]
	fn scores_are_rounded_half_to_even() {
		assert_eq!(round_score(0.125), 0.12);
		assert_eq!(round_score(1.0), 1.0);
		assert!(round_score(f64::INFINITY).is_infinite());
	}

	#[test]
	fn tuning_scores_every_candidate() {
		let search = tiny_search();
		let scored = search.hyperparameter_tuning(&linear_samples(10)).unwrap();

		assert_eq!(scored.len(), 2);
		assert!(scored.iter().all(|each| search.config().grid.contains(&each.params)));
	}

	#[test]
	fn exhausted_budget_fails_the_whole_grid() {
		let search = ModelSearch::new(
			tiny_search().config().clone().with_candidate_budget_secs(Some(0)),
			3,
		);

		assert!(matches!(
			search.hyperparameter_tuning(&linear_samples(10)),
			Err(ForecastError::Training(_))
		));
	}

	#[test]
	fn empty_train_split_is_insufficient() {
		assert!(tiny_search()
			.hyperparameter_tuning(&[])
			.unwrap_err()
			.is_insufficient_data());
	}
}
