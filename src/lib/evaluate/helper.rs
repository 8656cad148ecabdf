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

use chrono::{Days, NaiveDate};

use crate::error::{ForecastError, Result};

/// True when none of the last `points` values repeats its predecessor.
///
/// The points are evenly spaced, so a zero slope between neighbours is a zero difference.
pub(super) fn check_slope(values: &[f64], points: usize) -> bool {
	let recent = &values[values.len().saturating_sub(points)..];
	recent.windows(2).all(|pair| pair[1] - pair[0] != 0f64)
}

pub(super) fn truncate_cases(values: &[f64]) -> Vec<i64> {
	values.iter().map(|each| *each as i64).collect::<Vec<_>>()
}

pub(super) fn naive_forecast(last_value: f64, days: usize) -> Vec<i64> {
	vec![last_value as i64; days]
}

/// The `days` calendar dates immediately after `last`.
pub(super) fn forecast_dates(last: NaiveDate, days: usize) -> Result<Vec<NaiveDate>> {
	(1..=days as u64)
		.map(|offset| {
			last.checked_add_days(Days::new(offset)).ok_or_else(|| {
				ForecastError::Validation(format!("{} + {} days is out of range", last, offset))
			})
		})
		.collect::<Result<Vec<_>>>()
}
