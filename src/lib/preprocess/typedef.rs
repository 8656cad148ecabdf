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

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::CumulativeSeries;

/// First difference of the retained cumulative history.
///
/// `values[i] = history[i + 1] - history[i]`, dated by the later day.
#[derive(Default, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeltaSeries {
	pub dates: Vec<NaiveDate>,
	pub values: Vec<f64>,
}

/// `window` consecutive deltas and the delta that follows them.
#[derive(Default, Serialize, Clone, Debug, PartialEq)]
pub struct WindowedSample {
	pub window: Vec<f64>,
	pub target: f64,
}

/// Everything a forecast request derives from one country's history.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowedDataset {
	/// Cumulative history with every zero-valued day removed.
	pub history: CumulativeSeries,
	pub deltas: DeltaSeries,
	pub samples: Vec<WindowedSample>,
	pub window: usize,
}

/// Chronological train/test views over the samples of a `WindowedDataset`.
#[derive(Clone, Copy, Debug)]
pub struct SampleSplit<'a> {
	pub train: &'a [WindowedSample],
	pub test: &'a [WindowedSample],
}
