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

use crate::error::{ForecastError, Result};

/// Added to denominators of percentage-style errors.
pub(crate) const EPS: f64 = 1e-10;

pub(crate) fn sum(values: &[f64]) -> f64 {
	values.iter().fold(0f64, |last_value, each| last_value + *each)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
	if values.is_empty() {
		return f64::NAN;
	}
	sum(values) / values.len() as f64
}

/// Weighted average, `None` weights fall back to the plain mean.
pub(crate) fn average(values: &[f64], weights: Option<&[f64]>) -> f64 {
	match weights {
		None => mean(values),
		Some(weights) => {
			let total_weight = sum(weights);
			values
				.iter()
				.zip(weights.iter())
				.fold(0f64, |last_value, (value, weight)| last_value + value * weight)
				/ total_weight
		}
	}
}

pub(crate) fn variance(values: &[f64], ddof: usize) -> f64 {
	if values.len() <= ddof {
		return f64::NAN;
	}
	let m = mean(values);
	let deviations = values
		.iter()
		.fold(0f64, |last_value, each| last_value + (*each - m).powi(2));
	deviations / (values.len() - ddof) as f64
}

pub(crate) fn std(values: &[f64], ddof: usize) -> f64 {
	variance(values, ddof).sqrt()
}

pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
	let mut output = values.to_vec();
	output.sort_by(|a, b| a.total_cmp(b));
	output
}

pub(crate) fn sorted_descending(values: &[f64]) -> Vec<f64> {
	let mut output = values.to_vec();
	output.sort_by(|a, b| b.total_cmp(a));
	output
}

/// Percentile with linear interpolation between closest ranks, `q` in [0, 100].
pub(crate) fn percentile(values: &[f64], q: f64) -> f64 {
	if values.is_empty() || values.iter().any(|each| each.is_nan()) {
		return f64::NAN;
	}

	let ordered = sorted(values);
	let rank = (q / 100f64) * (ordered.len() - 1) as f64;
	let lower = rank.floor() as usize;
	let upper = rank.ceil() as usize;
	let fraction = rank - lower as f64;

	ordered[lower] + (ordered[upper] - ordered[lower]) * fraction
}

pub(crate) fn median(values: &[f64]) -> f64 {
	percentile(values, 50f64)
}

pub(crate) fn geometric_mean(values: &[f64]) -> f64 {
	if values.is_empty() {
		return f64::NAN;
	}
	let log_sum = values
		.iter()
		.fold(0f64, |last_value, each| last_value + each.ln());
	(log_sum / values.len() as f64).exp()
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
	a.iter()
		.zip(b.iter())
		.fold(0f64, |last_value, (x, y)| last_value + x * y)
}

pub(crate) fn norm(values: &[f64]) -> f64 {
	dot(values, values).sqrt()
}

/// Element-wise `a[i] - b[i]`.
pub(crate) fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
	a.iter().zip(b.iter()).map(|(x, y)| x - y).collect::<Vec<_>>()
}

/// First difference, one element shorter than the input.
pub(crate) fn diff(values: &[f64]) -> Vec<f64> {
	values
		.iter()
		.zip(values.iter().skip(1))
		.map(|(now, next)| next - now)
		.collect::<Vec<_>>()
}

pub(crate) fn centered(values: &[f64]) -> Vec<f64> {
	let m = mean(values);
	values.iter().map(|each| each - m).collect::<Vec<_>>()
}

pub(crate) fn pearson(a: &[f64], b: &[f64]) -> f64 {
	let a = centered(a);
	let b = centered(b);
	dot(&a, &b) / (norm(&a) * norm(&b))
}

/// `x * ln(y)` that is zero whenever `x` is zero.
pub(crate) fn xlogy(x: f64, y: f64) -> f64 {
	if x == 0f64 && !y.is_nan() {
		0f64
	} else {
		x * y.ln()
	}
}

/// 1 - numerator/denominator with the degenerate cases of a zero numerator or denominator.
pub(crate) fn explained_ratio(numerator: f64, denominator: f64) -> f64 {
	if numerator == 0f64 {
		1f64
	} else if denominator == 0f64 {
		0f64
	} else {
		1f64 - numerator / denominator
	}
}

/// Bounded (C2M) transform of an efficiency score.
pub(crate) fn bounded(score: f64) -> f64 {
	score / (2f64 - score)
}

pub(crate) fn check_weights(weights: Option<&[f64]>, length: usize) -> Result<()> {
	match weights {
		Some(found) if found.len() != length => Err(ForecastError::Validation(format!(
			"weights length {} does not match input length {}",
			found.len(),
			length
		))),
		_ => Ok(()),
	}
}

pub(crate) fn any_negative(values: &[f64]) -> bool {
	values.iter().any(|each| *each < 0f64)
}

pub(crate) fn any_non_positive(values: &[f64]) -> bool {
	values.iter().any(|each| *each <= 0f64)
}

pub(crate) fn mean_tweedie_deviance(
	observed: &[f64],
	predicted: &[f64],
	power: f64,
	weights: Option<&[f64]>,
) -> Result<f64> {
	check_weights(weights, observed.len())?;

	let message = format!("Mean Tweedie deviance error with power={} can only be used on ", power);
	let deviance = if power < 0f64 {
		if any_non_positive(predicted) {
			return Err(ForecastError::Validation(message + "strictly positive predictions"));
		}
		observed
			.iter()
			.zip(predicted.iter())
			.map(|(t, p)| {
				2f64 * (t.max(0f64).powf(2f64 - power) / ((1f64 - power) * (2f64 - power))
					- t * p.powf(1f64 - power) / (1f64 - power)
					+ p.powf(2f64 - power) / (2f64 - power))
			})
			.collect::<Vec<_>>()
	} else if power == 0f64 {
		observed
			.iter()
			.zip(predicted.iter())
			.map(|(t, p)| (t - p).powi(2))
			.collect::<Vec<_>>()
	} else if power < 1f64 {
		return Err(ForecastError::Validation(String::from(
			"Tweedie deviance is only defined for power<=0 and power>=1",
		)));
	} else if power == 1f64 {
		if any_negative(observed) || any_non_positive(predicted) {
			return Err(ForecastError::Validation(
				message + "non-negative observed and strictly positive predictions",
			));
		}
		observed
			.iter()
			.zip(predicted.iter())
			.map(|(t, p)| 2f64 * (xlogy(*t, t / p) - t + p))
			.collect::<Vec<_>>()
	} else if power == 2f64 {
		if any_non_positive(observed) || any_non_positive(predicted) {
			return Err(ForecastError::Validation(
				message + "strictly positive observed and predictions",
			));
		}
		observed
			.iter()
			.zip(predicted.iter())
			.map(|(t, p)| 2f64 * ((p / t).ln() + t / p - 1f64))
			.collect::<Vec<_>>()
	} else {
		if power < 2f64 {
			if any_negative(observed) || any_non_positive(predicted) {
				return Err(ForecastError::Validation(
					message + "non-negative observed and strictly positive predictions",
				));
			}
		} else if any_non_positive(observed) || any_non_positive(predicted) {
			return Err(ForecastError::Validation(
				message + "strictly positive observed and predictions",
			));
		}
		observed
			.iter()
			.zip(predicted.iter())
			.map(|(t, p)| {
				2f64 * (t.powf(2f64 - power) / ((1f64 - power) * (2f64 - power))
					- t * p.powf(1f64 - power) / (1f64 - power)
					+ p.powf(2f64 - power) / (2f64 - power))
			})
			.collect::<Vec<_>>()
	};

	Ok(average(&deviance, weights))
}
