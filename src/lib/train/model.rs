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
	config::Config,
	module::{Ignored, Module},
	nn::{
		conv::{Conv1d, Conv1dConfig},
		pool::{MaxPool1d, MaxPool1dConfig},
		Linear, LinearConfig,
	},
	tensor::{activation, backend::Backend, Tensor},
};

use super::typedef::Activation;

impl Activation {
	pub(crate) fn apply<B: Backend, const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
		match self {
			Activation::Swish => activation::silu(input),
			Activation::Relu => activation::relu(input),
			Activation::Tanh => activation::tanh(input),
		}
	}
}

/// Conv1d -> max-pool -> flatten -> dense -> dense(1) regressor over one delta window.
#[derive(Module, Debug)]
pub struct CnnNetwork<B: Backend> {
	conv: Conv1d<B>,
	pool: MaxPool1d,
	dense: Linear<B>,
	output: Linear<B>,
	conv_activation: Ignored<Activation>,
	dense_activation: Ignored<Activation>,
}

#[derive(Config, Debug)]
pub struct CnnNetworkConfig {
	pub activation_conv: Activation,
	pub activation_dense: Activation,

	#[config(default = 14)]
	pub window: usize,

	#[config(default = 60)]
	pub filters: usize,

	#[config(default = 60)]
	pub nodes: usize,

	#[config(default = 2)]
	pub kernel_size: usize,

	#[config(default = 2)]
	pub pool_size: usize,
}

impl CnnNetworkConfig {
	/// Width of the flattened convolution output fed to the dense layer.
	pub fn flattened_size(&self) -> usize {
		let convolved = self.window.saturating_sub(self.kernel_size) + 1;
		let pooled = convolved.saturating_sub(self.pool_size) / self.pool_size + 1;
		self.filters * pooled
	}

	pub fn init<B: Backend>(&self, device: &B::Device) -> CnnNetwork<B> {
		CnnNetwork {
			conv: Conv1dConfig::new(1, self.filters, self.kernel_size).init(device),
			pool: MaxPool1dConfig::new(self.pool_size)
				.with_stride(self.pool_size)
				.init(),
			dense: LinearConfig::new(self.flattened_size(), self.nodes).init(device),
			output: LinearConfig::new(self.nodes, 1).init(device),
			conv_activation: Ignored(self.activation_conv),
			dense_activation: Ignored(self.activation_dense),
		}
	}
}

impl<B: Backend> CnnNetwork<B> {
	/// Maps `[batch, 1, window]` windows to `[batch, 1]` next-step values.
	pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
		let x = self.conv.forward(input);
		let x = self.conv_activation.0.apply(x);
		let x = self.pool.forward(x);
		let x = x.flatten::<2>(1, 2);
		let x = self.dense.forward(x);
		let x = self.dense_activation.0.apply(x);
		self.output.forward(x)
	}
}
