#![recursion_limit = "256"]

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

pub mod data;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod preprocess;
pub mod store;
pub mod train;
pub mod typedef;

pub use data::{CaseTable, CaseTables, CumulativeSeries};
pub use error::{ForecastError, Result};
pub use evaluate::{forecast, forecast_series, FallbackPolicy, Forecaster};
pub use metrics::ErrorMetrics;
pub use preprocess::make_series;
pub use store::{export_csv, PredictionStore};
pub use train::{HyperparameterConfig, ModelSearch, ParamGrid, SearchConfig};
pub use typedef::{ErrorInfo, ForecastConfig, ForecastOutcome, ForecastResult, Study};
