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

/// Running sum starting after `anchor`, one output per delta.
pub(crate) fn accumulate(anchor: f64, deltas: impl IntoIterator<Item = f64>) -> Vec<f64> {
	deltas
		.into_iter()
		.scan(anchor, |total, each| {
			*total += each;
			Some(*total)
		})
		.collect::<Vec<_>>()
}

/// Samples going to training, never rounding a full fraction down by float error.
pub(super) fn train_length(samples: usize, train_fraction: f64) -> usize {
	let exact = samples as f64 * train_fraction;
	let rounded = exact.round();
	if (exact - rounded).abs() < 1e-9 {
		rounded as usize
	} else {
		exact.floor() as usize
	}
}

/// Smallest sample count that leaves both sides of the split non-empty.
pub(super) fn minimum_samples(train_fraction: f64) -> usize {
	if train_fraction <= 0f64 || train_fraction >= 1f64 {
		return usize::MAX;
	}
	(1usize..)
		.find(|samples| {
			let train = train_length(*samples, train_fraction);
			train >= 1 && train < *samples
		})
		.unwrap_or(usize::MAX)
}
