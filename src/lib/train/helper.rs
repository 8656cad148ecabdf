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

use std::time::{Duration, Instant};

use burn::{
	module::AutodiffModule,
	nn::loss::{MseLoss, Reduction::Mean},
	optim::{GradientsParams, Optimizer},
	tensor::{
		backend::{AutodiffBackend, Backend},
		ElementConversion, Tensor, TensorData,
	},
};
use tracing::debug;

use super::model::*;
use super::typedef::*;
use crate::error::{ForecastError, Result};
use crate::preprocess::WindowedSample;
use crate::typedef::NormalParam;

/// Mean and sample stdev over every value the samples hold. A flat series keeps stdev 1.
pub(super) fn normal_param(samples: &[WindowedSample]) -> NormalParam {
	let flatten_length = samples
		.iter()
		.map(|each| each.window.len() + 1)
		.sum::<usize>();
	if flatten_length == 0 {
		return NormalParam {
			mean: 0f64,
			stdev: 1f64,
		};
	}

	let values = || {
		samples
			.iter()
			.flat_map(|each| each.window.iter().chain(std::iter::once(&each.target)))
	};

	let sum = values().fold(0f64, |last_value, each| last_value + *each);
	let mean = sum / flatten_length as f64;
	let deviations = values().fold(0f64, |last_value, each| {
		last_value + (*each - mean).powf(2f64)
	});
	let stdev = (deviations / (flatten_length as f64 - 1f64)).sqrt();

	NormalParam {
		mean,
		stdev: if stdev.is_finite() && stdev > 0f64 {
			stdev
		} else {
			1f64
		},
	}
}

pub(super) fn windows_to_tensor<B: Backend>(
	windows: &[&[f64]],
	width: usize,
	normal: &NormalParam,
	device: &B::Device,
) -> Result<Tensor<B, 3>> {
	if let Some(found) = windows.iter().find(|each| each.len() != width) {
		return Err(ForecastError::Validation(format!(
			"window of {} values given to a network expecting {}",
			found.len(),
			width
		)));
	}

	let normalized = windows
		.iter()
		.flat_map(|each| each.iter().map(|value| ((*value - normal.mean) / normal.stdev) as f32))
		.collect::<Vec<_>>();

	Ok(Tensor::from_data(
		TensorData::new(normalized, [windows.len(), 1, width]),
		device,
	))
}

/// Normalises the samples and uploads them in chronological batches of `batch_size`.
pub(super) fn send_batches_to_device<B: Backend>(
	samples: &[WindowedSample],
	width: usize,
	batch_size: usize,
	device: &B::Device,
) -> Result<TrainInput<B>> {
	let normal = normal_param(samples);

	let batches = samples
		.chunks(batch_size.max(1))
		.map(|each_batch| {
			let windows = each_batch
				.iter()
				.map(|each| each.window.as_slice())
				.collect::<Vec<_>>();
			let input = windows_to_tensor::<B>(&windows, width, &normal, device)?;

			let targets = each_batch
				.iter()
				.map(|each| ((each.target - normal.mean) / normal.stdev) as f32)
				.collect::<Vec<_>>();
			let target = Tensor::<B, 2>::from_data(TensorData::new(targets, [each_batch.len(), 1]), device);

			Ok((input, target))
		})
		.collect::<Result<Vec<_>>>()?;

	Ok(TrainInput { batches, normal })
}

pub(super) fn train_new_model<B: AutodiffBackend>(
	input: TrainInput<B>,
	params: &HyperparameterConfig,
	window: usize,
	config: &SearchConfig,
	device: &B::Device,
) -> Result<TrainedModel<B::InnerBackend>> {
	if input.batches.is_empty() {
		return Err(ForecastError::Training(String::from("no training samples")));
	}

	let started = Instant::now();
	let budget = config.candidate_budget_secs.map(Duration::from_secs);

	let mut model = params.network(window).init::<B>(device);
	let mut optim = config.optimizer.init::<B, CnnNetwork<B>>();
	let mut loss_points = Vec::<IterativePoint>::with_capacity(params.epochs);

	for epoch in 1..=params.epochs {
		if let Some(limit) = budget {
			if started.elapsed() >= limit {
				return Err(ForecastError::Training(format!(
					"{} ran past its {}s budget at epoch {}",
					params,
					limit.as_secs(),
					epoch
				)));
			}
		}

		let mut epoch_loss = 0f32;
		for (windows, targets) in input.batches.iter() {
			let output = model.forward(windows.clone());
			let loss = MseLoss::new().forward(output, targets.clone(), Mean);
			epoch_loss += loss.clone().into_scalar().elem::<f32>();

			let grads = loss.backward();
			let grads = GradientsParams::from_grads(grads, &model);
			model = optim.step(config.lr, model, grads);
		}

		let avg_loss = epoch_loss / input.batches.len() as f32;
		if !avg_loss.is_finite() {
			return Err(ForecastError::Training(format!(
				"{} diverged at epoch {}",
				params, epoch
			)));
		}

		loss_points.push(IterativePoint {
			x: epoch as u32,
			y: avg_loss,
		});
	}

	debug!(
		%params,
		final_loss = loss_points.last().map(|each| each.y),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"trained candidate"
	);

	Ok(TrainedModel {
		network: model.valid(),
		normal: input.normal,
		params: *params,
		window,
		loss_points,
	})
}

/// One de-normalised next-delta prediction per window.
pub(crate) fn predict<B: Backend>(
	model: &TrainedModel<B>,
	windows: &[&[f64]],
	device: &B::Device,
) -> Result<Vec<f64>> {
	if windows.is_empty() {
		return Ok(Vec::new());
	}

	let input = windows_to_tensor::<B>(windows, model.window, &model.normal, device)?;
	let predictions = model
		.network
		.forward(input)
		.into_data()
		.iter::<f64>()
		.map(|each| each * model.normal.stdev + model.normal.mean)
		.collect::<Vec<_>>();

	if predictions.iter().any(|each| !each.is_finite()) {
		return Err(ForecastError::Training(String::from(
			"the network produced a non-finite prediction",
		)));
	}

	Ok(predictions)
}
