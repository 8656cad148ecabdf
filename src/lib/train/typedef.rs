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

use burn::{
	optim::AdamConfig,
	tensor::{backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use super::model::*;
use crate::typedef::NormalParam;

#[derive(
	Default, PartialEq, Eq, Hash, EnumIter, Deserialize, Serialize, Clone, Copy, Debug,
)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
	#[default]
	Swish,
	Relu,
	Tanh,
}

impl std::fmt::Display for Activation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Activation::Swish => write!(f, "swish"),
			Activation::Relu => write!(f, "relu"),
			Activation::Tanh => write!(f, "tanh"),
		}
	}
}

/// One point of the hyperparameter grid.
#[derive(PartialEq, Eq, Hash, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HyperparameterConfig {
	pub filters: usize,
	pub nodes: usize,
	pub epochs: usize,
	pub activation_conv: Activation,
	pub activation_dense: Activation,
}

impl HyperparameterConfig {
	pub fn network(&self, window: usize) -> CnnNetworkConfig {
		CnnNetworkConfig::new(self.activation_conv, self.activation_dense)
			.with_window(window)
			.with_filters(self.filters)
			.with_nodes(self.nodes)
	}
}

impl std::fmt::Display for HyperparameterConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"filters={} nodes={} epochs={} conv={} dense={}",
			self.filters, self.nodes, self.epochs, self.activation_conv, self.activation_dense
		)
	}
}

/// Candidate values per hyperparameter; the grid is their Cartesian product.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParamGrid {
	pub filters: Vec<usize>,
	pub nodes: Vec<usize>,
	pub epochs: Vec<usize>,
	pub activation_conv: Vec<Activation>,
	pub activation_dense: Vec<Activation>,
}

impl Default for ParamGrid {
	fn default() -> Self {
		let activations = vec![Activation::Swish, Activation::Relu, Activation::Tanh];

		Self {
			filters: vec![60, 70],
			nodes: vec![60, 70],
			epochs: vec![60, 70],
			activation_conv: activations.clone(),
			activation_dense: activations,
		}
	}
}

/// A grid point together with its in-sample MASE.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredConfig {
	pub params: HyperparameterConfig,
	pub score: f64,
}

/// What the grid search settled on, plus every candidate that trained.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
	pub best: ScoredConfig,
	pub candidates: Vec<ScoredConfig>,
}

#[derive(burn::config::Config)]
pub struct SearchConfig {
	#[config(default = "ParamGrid::default()")]
	pub grid: ParamGrid,

	#[config(default = "AdamConfig::new()")]
	pub optimizer: AdamConfig,

	#[config(default = 1e-3)]
	pub lr: f64,

	#[config(default = 32)]
	pub batch_size: usize,

	/// Wall-clock limit per candidate, in seconds. Unset means unlimited.
	pub candidate_budget_secs: Option<u64>,
}

// `AdamConfig` does not implement `Debug`; format it through its `Display`.
impl core::fmt::Debug for SearchConfig {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("SearchConfig")
			.field("grid", &self.grid)
			.field("optimizer", &format_args!("{}", self.optimizer))
			.field("lr", &self.lr)
			.field("batch_size", &self.batch_size)
			.field("candidate_budget_secs", &self.candidate_budget_secs)
			.finish()
	}
}

impl Default for SearchConfig {
	fn default() -> Self {
		SearchConfig::new()
	}
}

#[derive(Default, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IterativePoint {
	pub x: u32,
	pub y: f32,
}

pub(super) struct TrainInput<B: Backend> {
	pub batches: Vec<(Tensor<B, 3>, Tensor<B, 2>)>,
	pub normal: NormalParam,
}

/// A fitted network with the normalisation it was trained under.
#[derive(Debug)]
pub struct TrainedModel<B: Backend> {
	pub network: CnnNetwork<B>,
	pub normal: NormalParam,
	pub params: HyperparameterConfig,
	pub window: usize,
	/// Mean training loss per epoch.
	pub loss_points: Vec<IterativePoint>,
}
