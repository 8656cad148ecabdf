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

use std::f64::consts::PI;

use super::helper::*;
use super::typedef::*;
use crate::error::{ForecastError, Result};

fn mean_absolute(a: &[f64], b: &[f64]) -> f64 {
	let absolute = a
		.iter()
		.zip(b.iter())
		.map(|(x, y)| (x - y).abs())
		.collect::<Vec<_>>();
	mean(&absolute)
}

// numpy's sign, zero stays zero
fn sign(value: f64) -> f64 {
	if value > 0f64 {
		1f64
	} else if value < 0f64 {
		-1f64
	} else {
		0f64
	}
}

// 1-based ordinal ranks of both sides. Observed ties keep input order,
// predicted ties keep the observed ranking.
fn paired_ranks(observed: &[f64], predicted: &[f64]) -> (Vec<f64>, Vec<f64>) {
	let mut order = (0..observed.len()).collect::<Vec<_>>();
	order.sort_by(|a, b| observed[*a].total_cmp(&observed[*b]));

	let mut observed_ranks = vec![0f64; observed.len()];
	for (rank, index) in order.iter().enumerate() {
		observed_ranks[*index] = (rank + 1) as f64;
	}

	// stable, so equal predictions stay in observed order
	order.sort_by(|a, b| predicted[*a].total_cmp(&predicted[*b]));

	let mut predicted_ranks = vec![0f64; predicted.len()];
	for (rank, index) in order.iter().enumerate() {
		predicted_ranks[*index] = (rank + 1) as f64;
	}

	(observed_ranks, predicted_ranks)
}

fn kge_from(cc: f64, alpha: f64, beta: f64) -> KgeComponents {
	KgeComponents {
		kge: 1f64 - ((cc - 1f64).powi(2) + (alpha - 1f64).powi(2) + (beta - 1f64).powi(2)).sqrt(),
		cc,
		alpha,
		beta,
	}
}

impl ErrorMetrics {
	fn error(&self) -> Vec<f64> {
		subtract(&self.observed, &self.predicted)
	}

	fn absolute_error(&self) -> Vec<f64> {
		self.error().iter().map(|each| each.abs()).collect::<Vec<_>>()
	}

	fn percentage_error(&self) -> Vec<f64> {
		self.observed
			.iter()
			.zip(self.predicted.iter())
			.map(|(t, p)| (t - p) / (t + EPS) * 100f64)
			.collect::<Vec<_>>()
	}

	/// Observed values from `lag` onward paired with the naive forecast shifted by `lag`.
	fn naive_pair(&self, lag: usize) -> (&[f64], &[f64]) {
		let length = self.observed.len();
		if lag >= length {
			return (&[], &[]);
		}
		(&self.observed[lag..], &self.observed[..length - lag])
	}

	fn check_benchmark(&self, benchmark: &Benchmark) -> Result<()> {
		match benchmark {
			Benchmark::Series(series) if series.len() != self.observed.len() => {
				Err(ForecastError::Validation(format!(
					"benchmark length {} does not match input length {}",
					series.len(),
					self.observed.len()
				)))
			}
			_ => Ok(()),
		}
	}

	fn relative_error(&self, benchmark: &Benchmark) -> Result<Vec<f64>> {
		self.check_benchmark(benchmark)?;

		let output = match benchmark {
			Benchmark::Seasonality(lag) => {
				let (observed, naive) = self.naive_pair(*lag);
				let predicted = &self.predicted[self.predicted.len() - observed.len()..];
				observed
					.iter()
					.zip(predicted.iter())
					.zip(naive.iter())
					.map(|((t, p), n)| (t - p) / ((t - n) + EPS))
					.collect::<Vec<_>>()
			}
			Benchmark::Series(series) => self
				.observed
				.iter()
				.zip(self.predicted.iter())
				.zip(series.iter())
				.map(|((t, p), b)| (t - p) / ((t - b) + EPS))
				.collect::<Vec<_>>(),
		};

		Ok(output)
	}

	fn bounded_relative_error(&self, benchmark: &Benchmark) -> Result<Vec<f64>> {
		self.check_benchmark(benchmark)?;

		let triples = match benchmark {
			Benchmark::Seasonality(lag) => {
				let (observed, naive) = self.naive_pair(*lag);
				let predicted = &self.predicted[self.predicted.len() - observed.len()..];
				observed
					.iter()
					.zip(predicted.iter())
					.zip(naive.iter())
					.map(|((t, p), n)| (*t, *p, *n))
					.collect::<Vec<_>>()
			}
			Benchmark::Series(series) => self
				.observed
				.iter()
				.zip(self.predicted.iter())
				.zip(series.iter())
				.map(|((t, p), b)| (*t, *p, *b))
				.collect::<Vec<_>>(),
		};

		Ok(triples
			.into_iter()
			.map(|(t, p, b)| {
				let error = (t - p).abs();
				let bench_error = (t - b).abs();
				error / (error + bench_error + EPS)
			})
			.collect::<Vec<_>>())
	}

	fn log1p_difference(&self) -> Vec<f64> {
		self.observed
			.iter()
			.zip(self.predicted.iter())
			.map(|(t, p)| t.ln_1p() - p.ln_1p())
			.collect::<Vec<_>>()
	}

	/// Anomaly correlation coefficient.
	pub fn acc(&self) -> f64 {
		let a = centered(&self.predicted);
		let b = centered(&self.observed);
		let c = std(&self.observed, 1) * std(&self.predicted, 1) * self.predicted.len() as f64;
		dot(&a, &b) / c
	}

	/// Mean absolute percentage deviation.
	pub fn mapd(&self) -> f64 {
		let absolute_observed = self.observed.iter().map(|each| each.abs()).collect::<Vec<_>>();
		sum(&self.absolute_error()) / sum(&absolute_observed)
	}

	/// Mean error.
	pub fn me(&self) -> f64 {
		mean(&self.error())
	}

	/// Mean log error.
	pub fn mle(&self) -> f64 {
		let difference = self.log1p_difference().iter().map(|each| -each).collect::<Vec<_>>();
		mean(&difference)
	}

	/// Sum of squared errors.
	pub fn sse(&self) -> f64 {
		self.error().iter().fold(0f64, |last_value, each| last_value + each.powi(2))
	}

	/// Mean absolute scaled error against the naive forecast shifted by `seasonality`.
	///
	/// A flat benchmark makes the denominator zero and the result infinite or NaN.
	pub fn mase(&self, seasonality: usize) -> f64 {
		let (observed, naive) = self.naive_pair(seasonality);
		self.mae() / mean_absolute(observed, naive)
	}

	/// Root mean squared scaled error.
	pub fn rmsse(&self, seasonality: usize) -> f64 {
		let (observed, naive) = self.naive_pair(seasonality);
		let scale = mean_absolute(observed, naive);
		let squared = self
			.absolute_error()
			.iter()
			.map(|each| (each / scale).powi(2))
			.collect::<Vec<_>>();
		mean(&squared).sqrt()
	}

	/// Median error.
	pub fn mde(&self) -> f64 {
		median(&subtract(&self.predicted, &self.observed))
	}

	/// Median squared error.
	pub fn med_seq_error(&self) -> f64 {
		let squared = self.error().iter().map(|each| each.powi(2)).collect::<Vec<_>>();
		median(&squared)
	}

	pub fn euclid_distance(&self) -> f64 {
		norm(&self.error())
	}

	pub fn norm_euclid_distance(&self) -> f64 {
		let observed_mean = mean(&self.observed);
		let predicted_mean = mean(&self.predicted);
		let difference = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.map(|(t, p)| t / observed_mean - p / predicted_mean)
			.collect::<Vec<_>>();
		norm(&difference)
	}

	/// Root mean square log error.
	pub fn rmsle(&self) -> f64 {
		let squared = self.log1p_difference().iter().map(|each| each.powi(2)).collect::<Vec<_>>();
		mean(&squared).sqrt()
	}

	fn observed_range(&self) -> f64 {
		let maximum = self.observed.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
		let minimum = self.observed.iter().cloned().fold(f64::INFINITY, f64::min);
		maximum - minimum
	}

	/// RMSE normalised by the range of observed values.
	pub fn nrmse_range(&self) -> f64 {
		self.mse_unweighted().sqrt() / self.observed_range()
	}

	/// RMSE normalised by the inter-percentile range of observed values.
	pub fn nrmse_ipercentile(&self, q1: f64, q2: f64) -> Result<f64> {
		if !(0f64..=100f64).contains(&q1) || !(0f64..=100f64).contains(&q2) || q1 >= q2 {
			return Err(ForecastError::Validation(format!(
				"percentiles must satisfy 0 <= q1 < q2 <= 100, got q1={} and q2={}",
				q1, q2
			)));
		}
		let spread = percentile(&self.observed, q2) - percentile(&self.observed, q1);
		Ok(self.mse_unweighted().sqrt() / spread)
	}

	/// RMSE normalised by the mean of observed values.
	pub fn nrmse_mean(&self) -> f64 {
		self.mse_unweighted().sqrt() / mean(&self.observed)
	}

	/// Inertial RMSE.
	pub fn irmse(&self) -> f64 {
		self.mse_unweighted().sqrt() / std(&diff(&self.observed), 1)
	}

	/// Root median squared percentage error.
	pub fn rmdspe(&self) -> f64 {
		let squared = self.percentage_error().iter().map(|each| each.powi(2)).collect::<Vec<_>>();
		median(&squared).sqrt() * 100f64
	}

	/// Integral normalised root squared error.
	pub fn inrse(&self) -> f64 {
		let spread = centered(&self.observed);
		(self.sse() / dot(&spread, &spread)).sqrt()
	}

	/// Root relative squared error.
	pub fn rrse(&self) -> f64 {
		self.inrse()
	}

	/// Mean directional accuracy.
	pub fn mda(&self) -> f64 {
		let matches = diff(&self.observed)
			.iter()
			.zip(diff(&self.predicted).iter())
			.map(|(t, p)| if sign(*t) == sign(*p) { 1f64 } else { 0f64 })
			.collect::<Vec<_>>();
		mean(&matches)
	}

	/// Geometric mean absolute error.
	pub fn gmae(&self) -> f64 {
		geometric_mean(&self.absolute_error())
	}

	/// Mean percentage error.
	pub fn mpe(&self) -> f64 {
		mean(&self.percentage_error())
	}

	/// Median absolute percentage error.
	pub fn mdape(&self) -> f64 {
		let absolute = self.percentage_error().iter().map(|each| each.abs()).collect::<Vec<_>>();
		median(&absolute) * 100f64
	}

	/// Symmetric median absolute percentage error, not scaled by 100.
	pub fn smdape(&self) -> f64 {
		let ratios = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.map(|(t, p)| 2f64 * (t - p).abs() / ((t.abs() + p.abs()) + EPS))
			.collect::<Vec<_>>();
		median(&ratios)
	}

	/// Mean arctangent absolute percentage error, not scaled by 100.
	pub fn maape(&self) -> f64 {
		let angles = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.map(|(t, p)| ((t - p) / (t + EPS)).abs().atan())
			.collect::<Vec<_>>();
		mean(&angles)
	}

	/// Normalised absolute error.
	pub fn norm_ae(&self) -> f64 {
		let mae = self.mae();
		let squared = self
			.error()
			.iter()
			.fold(0f64, |last_value, each| last_value + (each - mae).powi(2));
		(squared / (self.observed.len() as f64 - 1f64)).sqrt()
	}

	/// Normalised absolute percentage error.
	pub fn norm_ape(&self) -> f64 {
		let mape = self.mape();
		let squared = self
			.percentage_error()
			.iter()
			.fold(0f64, |last_value, each| last_value + (each - mape).powi(2));
		(squared / (self.observed.len() as f64 - 1f64)).sqrt()
	}

	/// Relative absolute error.
	pub fn rae(&self) -> f64 {
		let spread = centered(&self.observed).iter().map(|each| each.abs()).collect::<Vec<_>>();
		sum(&self.absolute_error()) / (sum(&spread) + EPS)
	}

	/// Mean relative absolute error.
	pub fn mrae(&self, benchmark: Benchmark) -> Result<f64> {
		let absolute = self
			.relative_error(&benchmark)?
			.iter()
			.map(|each| each.abs())
			.collect::<Vec<_>>();
		Ok(mean(&absolute))
	}

	/// Median relative absolute error.
	pub fn mdrae(&self, benchmark: Benchmark) -> Result<f64> {
		let absolute = self
			.relative_error(&benchmark)?
			.iter()
			.map(|each| each.abs())
			.collect::<Vec<_>>();
		Ok(median(&absolute))
	}

	/// Geometric mean relative absolute error.
	pub fn gmrae(&self, benchmark: Benchmark) -> Result<f64> {
		let absolute = self
			.relative_error(&benchmark)?
			.iter()
			.map(|each| each.abs())
			.collect::<Vec<_>>();
		Ok(geometric_mean(&absolute))
	}

	/// Mean bounded relative absolute error.
	pub fn mbrae(&self, benchmark: Benchmark) -> Result<f64> {
		Ok(mean(&self.bounded_relative_error(&benchmark)?))
	}

	/// Unscaled mean bounded relative absolute error.
	pub fn umbrae(&self, benchmark: Benchmark) -> Result<f64> {
		let mbrae = self.mbrae(benchmark)?;
		Ok(mbrae / (1f64 - mbrae))
	}

	fn squared_error(&self) -> Vec<f64> {
		self.error().iter().map(|each| each.powi(2)).collect::<Vec<_>>()
	}

	fn mse_unweighted(&self) -> f64 {
		mean(&self.squared_error())
	}

	pub fn rmse(&self, weights: Option<&[f64]>) -> Result<f64> {
		Ok(self.mse(weights)?.sqrt())
	}

	pub fn mse(&self, weights: Option<&[f64]>) -> Result<f64> {
		check_weights(weights, self.observed.len())?;
		Ok(average(&self.squared_error(), weights))
	}

	/// Squared Pearson correlation of the sample-standardised sequences.
	pub fn r2(&self) -> f64 {
		let zx_std = std(&self.observed, 1);
		let zy_std = std(&self.predicted, 1);
		let zx = centered(&self.observed).iter().map(|each| each / zx_std).collect::<Vec<_>>();
		let zy = centered(&self.predicted).iter().map(|each| each / zy_std).collect::<Vec<_>>();
		let r = dot(&zx, &zy) / (self.observed.len() as f64 - 1f64);
		r.powi(2)
	}

	/// Coefficient of determination, may be negative. NaN with fewer than two samples.
	pub fn r2_mod(&self, weights: Option<&[f64]>) -> Result<f64> {
		check_weights(weights, self.observed.len())?;
		if self.predicted.len() < 2 {
			return Ok(f64::NAN);
		}

		let weight_at = |index: usize| weights.map_or(1f64, |found| found[index]);
		let observed_average = average(&self.observed, weights);

		let (numerator, denominator) = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.enumerate()
			.fold((0f64, 0f64), |(numerator, denominator), (index, (t, p))| {
				(
					numerator + weight_at(index) * (t - p).powi(2),
					denominator + weight_at(index) * (t - observed_average).powi(2),
				)
			});

		Ok(explained_ratio(numerator, denominator))
	}

	/// RMSE over the population standard deviation of observed values.
	pub fn rsr(&self) -> f64 {
		self.mse_unweighted().sqrt() / std(&self.observed, 0)
	}

	/// Nash-Sutcliffe efficiency.
	pub fn nse(&self) -> f64 {
		let spread = centered(&self.observed);
		1f64 - self.sse() / dot(&spread, &spread)
	}

	/// Absolute percent bias.
	pub fn abs_pbias(&self) -> f64 {
		100f64 * sum(&self.absolute_error()) / sum(&self.observed)
	}

	/// Percent bias.
	pub fn pbias(&self) -> f64 {
		100f64 * sum(&subtract(&self.predicted, &self.observed)) / sum(&self.observed)
	}

	/// RMSE over the range of observed values.
	pub fn nrmse(&self) -> f64 {
		self.nrmse_range()
	}

	/// Mean absolute error.
	pub fn mae(&self) -> f64 {
		mean_absolute(&self.observed, &self.predicted)
	}

	/// Mean absolute percentage error.
	pub fn mape(&self) -> f64 {
		let ratios = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.map(|(t, p)| ((t - p) / (t + EPS)).abs())
			.collect::<Vec<_>>();
		mean(&ratios) * 100f64
	}

	/// Symmetric mean absolute percentage error.
	pub fn smape(&self) -> f64 {
		let total = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold(0f64, |last_value, (t, p)| {
				last_value + 2f64 * (p - t).abs() / (t.abs() + p.abs() + EPS)
			});
		100f64 / self.observed.len() as f64 * total
	}

	/// Weighted mean absolute percentage error.
	pub fn wmape(&self) -> f64 {
		let weighted = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold(0f64, |last_value, (t, p)| {
				last_value + t * ((t - p).abs() / (t + EPS))
			});
		weighted / sum(&self.observed)
	}

	/// Weighted absolute percentage error.
	pub fn wape(&self) -> f64 {
		sum(&self.absolute_error()) / sum(&self.observed)
	}

	pub fn mean_abs_rel_error(&self) -> f64 {
		self.wape()
	}

	pub fn mean_bias_error(&self) -> f64 {
		sum(&self.error()) / self.observed.len() as f64
	}

	/// Mean bias, NaN differences are skipped in the sum.
	pub fn bias(&self) -> f64 {
		let total = self
			.error()
			.iter()
			.filter(|each| !each.is_nan())
			.fold(0f64, |last_value, each| last_value + each);
		total / self.observed.len() as f64
	}

	/// Nash-Sutcliffe efficiency of log values, both shifted by `epsilon`.
	pub fn log_nse(&self, epsilon: f64) -> f64 {
		let observed = self.observed.iter().map(|each| (each + epsilon).ln()).collect::<Vec<_>>();
		let predicted = self.predicted.iter().map(|each| (each + epsilon).ln()).collect::<Vec<_>>();
		let squared_error = subtract(&observed, &predicted)
			.iter()
			.fold(0f64, |last_value, each| last_value + each.powi(2));
		let spread = centered(&observed);
		1f64 - squared_error / dot(&spread, &spread)
	}

	/// Logarithmic probability distribution.
	pub fn log_prob(&self) -> f64 {
		let scale = (mean(&self.observed) / 10f64).max(0.01);
		let density = self
			.error()
			.iter()
			.map(|each| {
				let y = each / scale;
				-(y.powi(2)) / 2f64 - (2f64 * PI).sqrt().ln()
			})
			.collect::<Vec<_>>();
		mean(&density)
	}

	pub fn corr_coeff(&self) -> f64 {
		pearson(&self.observed, &self.predicted)
	}

	pub fn relative_rmse(&self) -> f64 {
		self.nrmse_mean()
	}

	/// Root mean square percentage error, not scaled by 100.
	pub fn rmspe(&self) -> f64 {
		let squared = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.map(|(t, p)| ((t - p) / (t + EPS)).powi(2))
			.collect::<Vec<_>>();
		mean(&squared).sqrt()
	}

	/// Willmott's index of agreement.
	pub fn agreement_index(&self) -> f64 {
		self.mod_agreement_index(2f64)
	}

	/// Refined index of agreement, in [-1, 1].
	pub fn ref_agreement_index(&self) -> f64 {
		let a = sum(&self.absolute_error());
		let spread = centered(&self.observed).iter().map(|each| each.abs()).collect::<Vec<_>>();
		let b = 2f64 * sum(&spread);
		if a <= b {
			1f64 - a / b
		} else {
			b / a - 1f64
		}
	}

	/// Relative index of agreement.
	pub fn rel_agreement_index(&self) -> f64 {
		let observed_mean = mean(&self.observed);
		let (a, e) = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold((0f64, 0f64), |(a, e), (t, p)| {
				let spread = ((p - observed_mean).abs() + (t - observed_mean).abs()) / observed_mean;
				(a + ((p - t) / t).powi(2), e + spread.powi(2))
			});
		1f64 - a / e
	}

	/// Index of agreement with exponent `j`; `j = 2` is Willmott's original.
	pub fn mod_agreement_index(&self, j: f64) -> f64 {
		let observed_mean = mean(&self.observed);
		let (a, e) = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold((0f64, 0f64), |(a, e), (t, p)| {
				let spread = (p - observed_mean).abs() + (t - observed_mean).abs();
				(a + (p - t).abs().powf(j), e + spread.powf(j))
			});
		1f64 - a / e
	}

	/// Population covariance.
	pub fn covariance(&self) -> f64 {
		mean(
			&centered(&self.observed)
				.iter()
				.zip(centered(&self.predicted).iter())
				.map(|(t, p)| t * p)
				.collect::<Vec<_>>(),
		)
	}

	/// Kobayashi-Salam decomposition of the mean squared error.
	pub fn decomposed_mse(&self) -> f64 {
		let observed_std = std(&self.observed, 0);
		let predicted_std = std(&self.predicted, 0);
		let sdsd = (observed_std - predicted_std).powi(2);
		let lcs = 2f64 * observed_std * predicted_std * (1f64 - self.corr_coeff());
		self.bias().powi(2) + sdsd + lcs
	}

	/// Kling-Gupta efficiency with correlation, variability ratio and bias ratio.
	pub fn kge_components(&self) -> KgeComponents {
		let cc = self.corr_coeff();
		let alpha = std(&self.predicted, 0) / std(&self.observed, 0);
		let beta = sum(&self.predicted) / sum(&self.observed);
		kge_from(cc, alpha, beta)
	}

	pub fn kge(&self) -> f64 {
		self.kge_components().kge
	}

	/// Non-parametric KGE of Pool et al.: Spearman correlation and flow duration curves.
	pub fn kge_np_components(&self) -> KgeComponents {
		let cc = self.spearmann_corr();
		let duration_curve = |values: &[f64]| {
			let scale = mean(values) * values.len() as f64;
			sorted(&values.iter().map(|each| each / scale).collect::<Vec<_>>())
		};
		let alpha = 1f64
			- 0.5 * mean_absolute(&duration_curve(&self.predicted), &duration_curve(&self.observed));
		let beta = mean(&self.predicted) / mean(&self.observed);
		kge_from(cc, alpha, beta)
	}

	pub fn kge_np(&self) -> f64 {
		self.kge_np_components().kge
	}

	pub fn pearson_r(&self) -> f64 {
		pearson(&self.observed, &self.predicted)
	}

	/// Modified KGE of Kling et al. 2012. `alpha` carries the coefficient-of-variation ratio.
	pub fn kge_mod_components(&self) -> KgeComponents {
		let predicted_mean = mean(&self.predicted);
		let observed_mean = mean(&self.observed);
		let r = pearson(&self.predicted, &self.observed);
		let gamma = (std(&self.predicted, 0) / predicted_mean) / (std(&self.observed, 0) / observed_mean);
		let beta = predicted_mean / observed_mean;
		kge_from(r, gamma, beta)
	}

	pub fn kge_mod(&self) -> f64 {
		self.kge_mod_components().kge
	}

	pub fn volume_error(&self) -> f64 {
		sum(&subtract(&self.predicted, &self.observed)) / sum(&self.observed)
	}

	pub fn mean_poisson_deviance(&self, weights: Option<&[f64]>) -> Result<f64> {
		self.mean_tweedie_deviance(1f64, weights)
	}

	pub fn mean_gamma_deviance(&self, weights: Option<&[f64]>) -> Result<f64> {
		self.mean_tweedie_deviance(2f64, weights)
	}

	pub fn mean_tweedie_deviance(&self, power: f64, weights: Option<&[f64]>) -> Result<f64> {
		mean_tweedie_deviance(&self.observed, &self.predicted, power, weights)
	}

	pub fn median_abs_error(&self) -> f64 {
		median(&self.absolute_error())
	}

	pub fn mean_square_log_error(&self, weights: Option<&[f64]>) -> Result<f64> {
		check_weights(weights, self.observed.len())?;
		let squared = self.log1p_difference().iter().map(|each| each.powi(2)).collect::<Vec<_>>();
		Ok(average(&squared, weights))
	}

	pub fn max_error(&self) -> f64 {
		self.absolute_error().iter().cloned().fold(f64::NEG_INFINITY, f64::max)
	}

	/// Explained variance score.
	pub fn exp_var_score(&self, weights: Option<&[f64]>) -> Result<f64> {
		check_weights(weights, self.observed.len())?;
		let error = self.error();
		let error_average = average(&error, weights);
		let numerator = average(
			&error.iter().map(|each| (each - error_average).powi(2)).collect::<Vec<_>>(),
			weights,
		);
		let observed_average = average(&self.observed, weights);
		let denominator = average(
			&self
				.observed
				.iter()
				.map(|each| (each - observed_average).powi(2))
				.collect::<Vec<_>>(),
			weights,
		);
		Ok(explained_ratio(numerator, denominator))
	}

	/// Peak flow bias of the flow duration curve over the top `h` fraction, in percent.
	pub fn fdc_fhv(&self, h: f64) -> Result<f64> {
		if h <= 0f64 || h >= 1f64 {
			return Err(ForecastError::Validation(String::from(
				"h has to be in the range (0,1)",
			)));
		}

		let take = (h * self.observed.len() as f64).round_ties_even() as usize;
		let observed = sorted_descending(&self.observed);
		let predicted = sorted_descending(&self.predicted);
		let observed = &observed[..take];
		let predicted = &predicted[..take];

		Ok(sum(&subtract(predicted, observed)) / (sum(observed) + 1e-6) * 100f64)
	}

	/// Alpha decomposition of the NSE.
	pub fn nse_alpha(&self) -> f64 {
		std(&self.predicted, 0) / std(&self.observed, 0)
	}

	/// Beta decomposition of the NSE.
	pub fn nse_beta(&self) -> f64 {
		(mean(&self.predicted) - mean(&self.observed)) / std(&self.observed, 0)
	}

	/// NSE with exponent `j`; larger `j` weighs outliers more.
	pub fn nse_mod(&self, j: f64) -> f64 {
		let observed_mean = mean(&self.observed);
		let (a, b) = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold((0f64, 0f64), |(a, b), (t, p)| {
				(a + (p - t).abs().powf(j), b + (t - observed_mean).abs().powf(j))
			});
		1f64 - a / b
	}

	/// Relative NSE.
	pub fn nse_rel(&self) -> f64 {
		let observed_mean = mean(&self.observed);
		let (a, b) = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold((0f64, 0f64), |(a, b), (t, p)| {
				(
					a + ((p - t) / t).abs().powi(2),
					b + ((t - observed_mean) / observed_mean).abs().powi(2),
				)
			});
		1f64 - a / b
	}

	/// Bias of the bottom `low_flow` fraction of the flow duration curve, in percent.
	pub fn fdc_flv(&self, low_flow: f64) -> Result<f64> {
		if low_flow <= 0f64 || low_flow >= 1f64 {
			return Err(ForecastError::Validation(String::from(
				"low_flow has to be in the range (0,1)",
			)));
		}

		let skip = ((1f64 - low_flow) * self.observed.len() as f64).round_ties_even() as usize;
		let low_tail = |values: &[f64]| {
			let floored = values
				.iter()
				.map(|each| if *each == 0f64 { 1e-6 } else { *each })
				.collect::<Vec<_>>();
			sorted_descending(&floored)
				.into_iter()
				.skip(skip)
				.map(|each| (each + 1e-6).ln())
				.collect::<Vec<_>>()
		};
		let above_minimum = |values: &[f64]| {
			let minimum = values.iter().cloned().fold(f64::INFINITY, f64::min);
			values.iter().fold(0f64, |last_value, each| last_value + (each - minimum))
		};

		let observed = low_tail(&self.observed);
		let predicted = low_tail(&self.predicted);
		if observed.is_empty() {
			return Ok(f64::NAN);
		}

		let qsl = above_minimum(&predicted);
		let qol = above_minimum(&observed);
		Ok(-(qsl - qol) / (qol + 1e-6) * 100f64)
	}

	pub fn nse_bound(&self) -> f64 {
		bounded(self.nse())
	}

	pub fn kge_bound(&self) -> f64 {
		bounded(self.kge())
	}

	pub fn kgeprime_c2m(&self) -> f64 {
		bounded(self.kge_mod())
	}

	pub fn kgenp_bound(&self) -> f64 {
		bounded(self.kge_np())
	}

	/// Mielke-Berry R.
	pub fn mb_r(&self) -> f64 {
		let n = self.predicted.len() as f64;
		let total = self.observed.iter().fold(0f64, |last_value, t| {
			last_value
				+ self
					.predicted
					.iter()
					.fold(0f64, |inner, p| inner + (p - t).abs())
		});
		let mae = sum(&self.absolute_error()) / n;
		1f64 - n.powi(2) * mae / total
	}

	/// Legate-McCabe efficiency against `obs_bar_p`, or the observed mean when unset.
	pub fn lm_index(&self, obs_bar_p: Option<f64>) -> f64 {
		let reference = obs_bar_p.unwrap_or_else(|| mean(&self.observed));
		let spread = self
			.observed
			.iter()
			.fold(0f64, |last_value, t| last_value + (t - reference).abs());
		1f64 - sum(&self.absolute_error()) / spread
	}

	/// Watterson's M.
	pub fn watt_m(&self) -> f64 {
		let c = std(&self.observed, 1).powi(2) + std(&self.predicted, 1).powi(2);
		let e = (mean(&self.predicted) - mean(&self.observed)).powi(2);
		2f64 / PI * (1f64 - self.mse_unweighted() / (c + e)).asin()
	}

	/// Spearman rank correlation. Observed ties rank by position, predicted ties by observed rank.
	pub fn spearmann_corr(&self) -> f64 {
		let (observed, predicted) = paired_ranks(&self.observed, &self.predicted);
		pearson(&observed, &predicted)
	}

	/// Volumetric efficiency.
	pub fn ve(&self) -> f64 {
		1f64 - sum(&self.absolute_error()) / sum(&self.observed)
	}

	/// Spectral angle.
	pub fn sa(&self) -> f64 {
		(dot(&self.predicted, &self.observed) / (norm(&self.predicted) * norm(&self.observed))).acos()
	}

	/// Spectral correlation.
	pub fn sc(&self) -> f64 {
		let observed = centered(&self.observed);
		let predicted = centered(&self.predicted);
		(dot(&observed, &predicted) / (norm(&observed) * norm(&predicted))).acos()
	}

	/// Spectral information divergence.
	pub fn sid(&self) -> f64 {
		let observed_mean = mean(&self.observed);
		let predicted_mean = mean(&self.predicted);
		self.observed
			.iter()
			.zip(self.predicted.iter())
			.fold(0f64, |last_value, (t, p)| {
				let first = t / observed_mean - p / predicted_mean;
				let second = (t.log10() - observed_mean.log10()) - (p.log10() - predicted_mean.log10());
				last_value + first * second
			})
	}

	/// Spectral gradient angle.
	pub fn sga(&self) -> f64 {
		let observed = diff(&self.observed);
		let predicted = diff(&self.predicted);
		(dot(&observed, &predicted) / (norm(&observed) * norm(&predicted))).acos()
	}

	/// Ratio of the geometric means of the log1p-transformed sequences.
	pub fn gmean_diff(&self) -> f64 {
		let predicted = self.predicted.iter().map(|each| each.ln_1p()).collect::<Vec<_>>();
		let observed = self.observed.iter().map(|each| each.ln_1p()).collect::<Vec<_>>();
		(geometric_mean(&predicted) - geometric_mean(&observed)).exp()
	}

	/// Symmetric Kullback-Leibler divergence. `None` when exactly one side is zero somewhere.
	pub fn kl_sym(&self) -> Option<f64> {
		let zero_pattern_differs = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.any(|(t, p)| (*t == 0f64) != (*p == 0f64));
		if zero_pattern_differs {
			return None;
		}

		let lift = |value: f64| if value == 0f64 { 1f64 } else { value };
		let divergence = self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold(0f64, |last_value, (t, p)| {
				let (x, y) = (lift(*t), lift(*p));
				last_value + (x - y) * (x.log2() - y.log2())
			});

		Some(0.5 * divergence)
	}

	/// Aitchison distance of the centred log-ratio transforms.
	pub fn aitchison(&self, center: Center) -> f64 {
		let clr = |values: &[f64]| {
			let logs = values.iter().map(|each| each.ln()).collect::<Vec<_>>();
			let middle = match center {
				Center::Mean => mean(&logs),
				Center::Median => median(&logs),
			};
			logs.iter().map(|each| each - middle).collect::<Vec<_>>()
		};
		norm(&subtract(&clr(&self.observed), &clr(&self.predicted)))
	}

	/// Jensen-Shannon divergence; undefined terms count as zero.
	pub fn js(&self) -> f64 {
		let term = |x: f64, y: f64| {
			let value = x * (2f64 * x / (x + y)).log2();
			if value.is_nan() {
				0f64
			} else {
				value
			}
		};
		0.5 * self
			.observed
			.iter()
			.zip(self.predicted.iter())
			.fold(0f64, |last_value, (t, p)| last_value + term(*t, *p) + term(*p, *t))
	}

	/// Centred root-mean-square difference.
	pub fn centered_rms_dev(&self) -> f64 {
		let squared = subtract(&centered(&self.predicted), &centered(&self.observed))
			.iter()
			.map(|each| each.powi(2))
			.collect::<Vec<_>>();
		mean(&squared).sqrt()
	}

	/// Murphy's skill score.
	pub fn skill_score_murphy(&self) -> f64 {
		1f64 - self.mse_unweighted() / std(&self.observed, 1).powi(2)
	}

	/// Brier score of probability forecasts in [0, 1] against binary observations.
	pub fn brier_score(&self) -> Result<f64> {
		if self.predicted.iter().any(|each| *each < 0f64 || *each > 1f64) {
			return Err(ForecastError::Validation(String::from(
				"forecast has values outside interval [0,1]",
			)));
		}
		if self.observed.iter().any(|each| *each != 0f64 && *each != 1f64) {
			return Err(ForecastError::Validation(String::from(
				"observed has values not equal to 0 or 1",
			)));
		}

		Ok(self.sse() / self.predicted.len() as f64)
	}

	/// Variance of the log1p differences.
	pub fn mean_var(&self) -> f64 {
		variance(&self.log1p_difference(), 0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn sample() -> ErrorMetrics {
		ErrorMetrics::new(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.5, 2.0, 2.5, 4.5, 5.0]).unwrap()
	}

	#[test]
	fn absolute_and_squared_errors() {
		let metrics = sample();

		assert_relative_eq!(metrics.mae(), 0.3);
		assert_relative_eq!(metrics.mse(None).unwrap(), 0.15);
		assert_relative_eq!(metrics.rmse(None).unwrap(), 0.15f64.sqrt());
		assert_relative_eq!(metrics.sse(), 0.75);
		assert_relative_eq!(metrics.me(), -0.1);
		assert_relative_eq!(metrics.max_error(), 0.5);
		assert_relative_eq!(metrics.median_abs_error(), 0.5);
		assert_relative_eq!(metrics.euclid_distance(), 0.75f64.sqrt());
	}

	#[test]
	fn mase_scales_by_naive_forecast() {
		let metrics = sample();

		// the naive lag-1 forecast misses by exactly 1 at every step
		assert_relative_eq!(metrics.mase(1), 0.3);
		// lag-2 naive misses by 2
		assert_relative_eq!(metrics.mase(2), 0.15);
	}

	#[test]
	fn mase_on_flat_history_is_not_finite() {
		let metrics = ErrorMetrics::new(&[3.0, 3.0, 3.0], &[3.0, 4.0, 3.0]).unwrap();
		assert!(!metrics.mase(1).is_finite());

		let perfect = ErrorMetrics::new(&[3.0, 3.0, 3.0], &[3.0, 3.0, 3.0]).unwrap();
		assert!(perfect.mase(1).is_nan());
	}

	#[test]
	fn efficiency_scores() {
		let metrics = sample();

		assert_relative_eq!(metrics.nse(), 0.925);
		assert_relative_eq!(metrics.nse_bound(), 0.925 / 1.075);
		assert_relative_eq!(metrics.agreement_index(), 1.0 - 0.75 / 38.75);
		assert_relative_eq!(metrics.pbias(), 100.0 / 30.0);
		assert_relative_eq!(metrics.mda(), 1.0);
		assert_relative_eq!(metrics.lm_index(None), 1.0 - 1.5 / 6.0);
		assert_relative_eq!(metrics.lm_index(Some(0.0)), 1.0 - 1.5 / 15.0);
	}

	#[test]
	fn identical_series_have_perfect_scores() {
		let values = [1.0, 4.0, 2.0, 8.0, 5.0];
		let metrics = ErrorMetrics::new(&values, &values).unwrap();

		assert_eq!(metrics.rmse(None).unwrap(), 0.0);
		assert_eq!(metrics.mape(), 0.0);
		assert_relative_eq!(metrics.nse(), 1.0);
		assert_relative_eq!(metrics.kge(), 1.0);
		assert_relative_eq!(metrics.kge_np(), 1.0);
		assert_relative_eq!(metrics.kge_mod(), 1.0);
		assert_relative_eq!(metrics.spearmann_corr(), 1.0);
		assert_relative_eq!(metrics.kl_sym().unwrap(), 0.0);
		assert_relative_eq!(metrics.js(), 0.0);
		assert_relative_eq!(metrics.aitchison(Center::Median), 0.0);
	}

	#[test]
	fn kge_components_are_reported() {
		let metrics = ErrorMetrics::new(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
		let components = metrics.kge_components();

		assert_relative_eq!(components.cc, 1.0);
		assert_relative_eq!(components.alpha, 2.0);
		assert_relative_eq!(components.beta, 2.0);
		assert_relative_eq!(components.kge, 1.0 - 2f64.sqrt());
	}

	#[test]
	fn relative_errors_accept_a_benchmark_series() {
		let metrics = sample();
		let benchmark = [1.0, 2.0, 3.0, 4.0];

		assert!(matches!(
			metrics.mrae(Benchmark::Series(&benchmark)),
			Err(ForecastError::Validation(_))
		));

		// benchmark equal to the prediction makes every bounded term one half, or zero on exact hits
		let benchmark = [1.5, 2.0, 2.5, 4.5, 5.0];
		let mbrae = metrics.mbrae(Benchmark::Series(&benchmark)).unwrap();
		assert_relative_eq!(mbrae, 1.5 / 5.0, epsilon = 1e-6);

		let naive = metrics.mrae(Benchmark::default()).unwrap();
		assert_relative_eq!(naive, 1.0 / 4.0, epsilon = 1e-6);
	}

	#[test]
	fn parameters_are_validated() {
		let metrics = sample();

		assert!(metrics.fdc_fhv(0.0).is_err());
		assert!(metrics.fdc_fhv(1.0).is_err());
		assert!(metrics.fdc_flv(1.5).is_err());
		assert!(metrics.nrmse_ipercentile(75.0, 25.0).is_err());
		assert!(metrics.rmse(Some(&[1.0, 1.0])).is_err());
		assert!(metrics.mean_tweedie_deviance(0.5, None).is_err());
	}

	#[test]
	fn flow_duration_biases() {
		let metrics = ErrorMetrics::new(
			&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
			&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 12.0],
		)
		.unwrap();

		// top 20% of each curve: [10, 9] against [12, 9]
		assert_relative_eq!(metrics.fdc_fhv(0.2).unwrap(), 2.0 / (19.0 + 1e-6) * 100.0);
		assert_relative_eq!(metrics.fdc_flv(0.3).unwrap(), 0.0);
	}

	#[test]
	fn weighted_scores() {
		let metrics = sample();
		let weights = [0.0, 0.0, 1.0, 0.0, 0.0];

		assert_relative_eq!(metrics.mse(Some(&weights)).unwrap(), 0.25);
		assert_relative_eq!(metrics.r2_mod(None).unwrap(), 0.925);
	}

	#[test]
	fn kl_divergence_needs_matching_zeros() {
		let metrics = ErrorMetrics::new(&[0.0, 2.0], &[1.0, 2.0]).unwrap();
		assert_eq!(metrics.kl_sym(), None);

		let metrics = ErrorMetrics::new(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
		assert_relative_eq!(metrics.kl_sym().unwrap(), 0.5 * (-2.0) * (1.0 - 2.0));
		// inputs are left untouched
		assert_eq!(metrics.observed(), &[0.0, 2.0]);
	}

	#[test]
	fn brier_score_validates_probabilities() {
		let metrics = ErrorMetrics::new(&[0.0, 1.0, 1.0], &[0.2, 0.8, 0.6]).unwrap();
		assert_relative_eq!(metrics.brier_score().unwrap(), 0.08);

		let metrics = ErrorMetrics::new(&[0.0, 1.0], &[0.2, 1.4]).unwrap();
		assert!(metrics.brier_score().is_err());

		let metrics = ErrorMetrics::new(&[0.5, 1.0], &[0.2, 0.4]).unwrap();
		assert!(metrics.brier_score().is_err());
	}

	#[test]
	fn log_nse_compares_observed_with_predicted() {
		let metrics = ErrorMetrics::new(&[1.0, 10.0, 100.0], &[1.0, 10.0, 1000.0]).unwrap();
		assert!(metrics.log_nse(0.0) < 1.0);

		let metrics = ErrorMetrics::new(&[1.0, 10.0, 100.0], &[1.0, 10.0, 100.0]).unwrap();
		assert_relative_eq!(metrics.log_nse(0.0), 1.0);
	}

	fn skewed() -> ErrorMetrics {
		ErrorMetrics::new(&[1.0, 2.0, 4.0], &[2.0, 2.0, 3.0]).unwrap()
	}

	#[test]
	fn tied_predictions_follow_the_observed_ranking() {
		let metrics = ErrorMetrics::new(&[3.0, 1.0, 2.0], &[5.0, 5.0, 5.0]).unwrap();
		assert_relative_eq!(metrics.spearmann_corr(), 1.0);

		// cc = 1, alpha = 1 - 0.5 * mean(|[1/6, 0, 1/6]|), beta = 5 / 2
		let components = metrics.kge_np_components();
		assert_relative_eq!(components.cc, 1.0);
		assert_relative_eq!(components.alpha, 17.0 / 18.0, epsilon = 1e-12);
		assert_relative_eq!(components.beta, 2.5);
		assert_relative_eq!(
			components.kge,
			1.0 - ((1.0f64 / 18.0).powi(2) + 1.5f64.powi(2)).sqrt(),
			epsilon = 1e-12
		);

		// observed ranks [3, 1, 2, 4], predicted ranks [3, 2, 1, 4]
		let metrics = ErrorMetrics::new(&[3.0, 1.0, 2.0, 4.0], &[7.0, 7.0, 1.0, 9.0]).unwrap();
		assert_relative_eq!(metrics.spearmann_corr(), 0.8, epsilon = 1e-12);
	}

	#[test]
	fn rank_based_efficiency() {
		let metrics = ErrorMetrics::new(&[1.0, 2.0, 3.0, 4.0], &[2.0, 1.0, 3.0, 4.0]).unwrap();

		// identical duration curves and volumes leave only 1 - cc
		assert_relative_eq!(metrics.spearmann_corr(), 0.8, epsilon = 1e-12);
		assert_relative_eq!(metrics.kge_np(), 0.8, epsilon = 1e-12);
		assert_relative_eq!(metrics.kgenp_bound(), 0.8 / 1.2, epsilon = 1e-12);

		// shifted by one: r = 1, gamma = 2.5 / 3.5, beta = 3.5 / 2.5
		let metrics = ErrorMetrics::new(&[1.0, 2.0, 3.0, 4.0], &[2.0, 3.0, 4.0, 5.0]).unwrap();
		let kge = 1.0 - ((2.0f64 / 7.0).powi(2) + 0.4f64.powi(2)).sqrt();
		assert_relative_eq!(metrics.kge_mod(), kge, epsilon = 1e-12);
		assert_relative_eq!(metrics.kgeprime_c2m(), kge / (2.0 - kge), epsilon = 1e-12);
	}

	#[test]
	fn agreement_and_relative_efficiency() {
		let metrics = skewed();

		// sum |p - t| over every pair is 10, mae is 2/3
		assert_relative_eq!(metrics.mb_r(), 0.4, epsilon = 1e-12);
		// sample variances 7/3 and 1/3, equal means
		assert_relative_eq!(
			metrics.watt_m(),
			2.0 / PI * 0.75f64.asin(),
			epsilon = 1e-12
		);
		assert_relative_eq!(metrics.nse_rel(), -23.0 / 96.0, epsilon = 1e-12);
		assert_relative_eq!(metrics.rel_agreement_index(), 415.0 / 1248.0, epsilon = 1e-12);
		assert_relative_eq!(metrics.mod_agreement_index(1.0), 4.0 / 7.0, epsilon = 1e-12);
		assert_relative_eq!(metrics.mod_agreement_index(2.0), 10.0 / 13.0, epsilon = 1e-12);
	}

	#[test]
	fn spectral_angles() {
		let metrics = skewed();

		assert_relative_eq!(metrics.sa(), (18.0 / 357f64.sqrt()).acos(), epsilon = 1e-12);
		assert_relative_eq!(metrics.sc(), (5.0 / (2.0 * 7f64.sqrt())).acos(), epsilon = 1e-12);
		// first differences [1, 2] against [0, 1]
		assert_relative_eq!(metrics.sga(), (2.0 / 5f64.sqrt()).acos(), epsilon = 1e-12);

		// means are both 5.5, each term is 9 / 5.5
		let mirrored = ErrorMetrics::new(&[1.0, 10.0], &[10.0, 1.0]).unwrap();
		assert_relative_eq!(mirrored.sid(), 36.0 / 11.0, epsilon = 1e-12);
	}

	#[test]
	fn normalised_squared_errors() {
		let metrics = skewed();

		// rmse sqrt(2/3) over the stdev of [1, 2]
		assert_relative_eq!(metrics.irmse(), (4.0f64 / 3.0).sqrt(), epsilon = 1e-12);
		assert_relative_eq!(metrics.inrse(), (3.0f64 / 7.0).sqrt(), epsilon = 1e-12);
		assert_relative_eq!(metrics.rrse(), (3.0f64 / 7.0).sqrt(), epsilon = 1e-12);
		assert_relative_eq!(metrics.r2(), 25.0 / 28.0, epsilon = 1e-12);
	}

	#[test]
	fn percentage_medians_and_spread() {
		let metrics = skewed();

		// percentage errors [-100, 0, 25], mape 125/3
		assert_relative_eq!(metrics.mape(), 125.0 / 3.0, max_relative = 1e-9);
		assert_relative_eq!(metrics.norm_ape(), (198750.0f64 / 18.0).sqrt(), max_relative = 1e-9);
		assert_relative_eq!(metrics.mdape(), 2500.0, max_relative = 1e-9);
		assert_relative_eq!(metrics.smdape(), 2.0 / 7.0, max_relative = 1e-9);
		assert_relative_eq!(metrics.rmdspe(), 2500.0, max_relative = 1e-9);
	}

	#[test]
	fn relative_errors_against_a_benchmark() {
		let metrics = ErrorMetrics::new(&[2.0, 4.0, 8.0], &[3.0, 6.0, 4.0]).unwrap();
		let benchmark = [4.0, 5.0, 6.0];

		// relative errors [0.5, 2, 2], bounded errors [1/3, 2/3, 2/3]
		let mdrae = metrics.mdrae(Benchmark::Series(&benchmark)).unwrap();
		let gmrae = metrics.gmrae(Benchmark::Series(&benchmark)).unwrap();
		let umbrae = metrics.umbrae(Benchmark::Series(&benchmark)).unwrap();

		assert_relative_eq!(mdrae, 2.0, epsilon = 1e-6);
		assert_relative_eq!(gmrae, 2f64.cbrt(), epsilon = 1e-6);
		assert_relative_eq!(umbrae, 1.25, epsilon = 1e-6);
	}

	#[test]
	fn compositional_distances() {
		use std::f64::consts::E;

		// clr of observed is [-1, 0, 1] under both centres
		let metrics = ErrorMetrics::new(&[1.0, E, E * E], &[1.0, E * E, E * E]).unwrap();
		assert_relative_eq!(metrics.aitchison(Center::Mean), (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
		assert_relative_eq!(metrics.aitchison(Center::Median), 2f64.sqrt(), epsilon = 1e-12);

		let metrics = ErrorMetrics::new(&[1.0, 1.0], &[3.0, 1.0]).unwrap();
		assert_relative_eq!(metrics.js(), 0.5 * (3.0 * 1.5f64.log2() - 1.0), epsilon = 1e-12);

		// zero terms count as nothing
		let metrics = ErrorMetrics::new(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
		assert_relative_eq!(metrics.js(), 1.0);

		// log1p differences [ln 2, 2 ln 2]
		let metrics = ErrorMetrics::new(&[1.0, 3.0], &[0.0, 0.0]).unwrap();
		assert_relative_eq!(metrics.mean_var(), 2f64.ln().powi(2) / 4.0, epsilon = 1e-12);
	}

	#[test]
	fn deviances() {
		let metrics = ErrorMetrics::new(&[1.0, 2.0], &[2.0, 2.0]).unwrap();
		let ln2 = 2f64.ln();

		// only the first pair contributes
		assert_relative_eq!(metrics.mean_poisson_deviance(None).unwrap(), 1.0 - ln2, epsilon = 1e-12);
		assert_relative_eq!(metrics.mean_gamma_deviance(None).unwrap(), ln2 - 0.5, epsilon = 1e-12);
		assert_relative_eq!(
			metrics.mean_tweedie_deviance(1.5, None).unwrap(),
			3.0 * 2f64.sqrt() - 4.0,
			epsilon = 1e-12
		);
		assert_relative_eq!(metrics.mean_tweedie_deviance(3.0, None).unwrap(), 0.125, epsilon = 1e-12);
	}

	#[test]
	fn percentage_errors_survive_zero_observations() {
		let metrics = ErrorMetrics::new(&[0.0, 2.0, 4.0], &[1.0, 2.0, 3.0]).unwrap();
		assert!(metrics.mape().is_finite());
		assert!(metrics.smape().is_finite());
		assert!(metrics.rmspe().is_finite());
		assert!(metrics.wmape().is_finite());

		let exact = ErrorMetrics::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
		assert_eq!(exact.mape(), 0.0);
		assert_eq!(exact.smape(), 0.0);
		assert_eq!(exact.rmspe(), 0.0);
		assert_eq!(exact.wmape(), 0.0);
	}
}
