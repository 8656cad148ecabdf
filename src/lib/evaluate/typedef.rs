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

use serde::Serialize;

use crate::error::Result;

/// Anything that maps one window of deltas to the next delta.
pub trait StepModel {
	fn window(&self) -> usize;

	fn predict_next(&self, window: &[f64]) -> Result<f64>;
}

/// Autoregressive rollout settings.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Forecaster {
	pub horizon: usize,
	pub reported_days: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearnedForecast {
	/// Every predicted delta of the horizon.
	pub deltas: Vec<f64>,
	/// Running sum of `deltas` from the last true cumulative value.
	pub cumulative: Vec<f64>,
	/// The reported front of `cumulative`, truncated toward zero.
	pub cases: Vec<i64>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FallbackPolicy {
	pub mase_threshold: f64,
	pub slope_points: usize,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FallbackDecision {
	/// Held-out MASE is within the threshold.
	AcceptedByScore,
	/// The score failed but the recent history is still moving.
	AcceptedBySlope,
	Naive,
}

impl FallbackDecision {
	pub fn is_learned(&self) -> bool {
		!matches!(self, FallbackDecision::Naive)
	}
}
