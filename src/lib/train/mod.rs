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

pub mod command;
pub(crate) mod helper;
pub mod model;
pub mod typedef;

pub use command::{
	create_param_grid, get_best_params, InferenceBackend, ModelSearch, TrainBackend,
};
pub use model::{CnnNetwork, CnnNetworkConfig};
pub use typedef::{
	Activation, HyperparameterConfig, IterativePoint, ParamGrid, ScoredConfig, SearchConfig,
	SearchOutcome, TrainedModel,
};
