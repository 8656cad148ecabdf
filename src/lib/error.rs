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

use std::borrow::Cow;
use thiserror::Error;

use crate::typedef::ErrorInfo;

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
	/// Malformed metric input: empty or mismatched sequences, or values outside a metric's domain.
	#[error("validation error: {0}")]
	Validation(String),

	/// The series is too short to form a windowed sample or a non-empty train/test split.
	#[error("insufficient data: need at least {needed}, got {got}")]
	InsufficientData { needed: usize, got: usize },

	/// Fit or predict failed for reasons other than input shape.
	#[error("training failed: {0}")]
	Training(String),

	#[error("country \"{0}\" is not present in the table")]
	UnknownCountry(String),

	#[error("cannot read table: {0}")]
	Table(String),

	#[error("i/o error: {0}")]
	Io(String),
}

impl ForecastError {
	pub fn is_insufficient_data(&self) -> bool {
		matches!(self, ForecastError::InsufficientData { .. })
	}
}

impl From<std::io::Error> for ForecastError {
	fn from(err: std::io::Error) -> Self {
		ForecastError::Io(err.to_string())
	}
}

impl From<csv::Error> for ForecastError {
	fn from(err: csv::Error) -> Self {
		ForecastError::Table(err.to_string())
	}
}

impl From<serde_json::Error> for ForecastError {
	fn from(err: serde_json::Error) -> Self {
		ForecastError::Io(err.to_string())
	}
}

impl From<&ForecastError> for ErrorInfo {
	fn from(err: &ForecastError) -> Self {
		let title = match err {
			ForecastError::Validation(_) => "Invalid Metric Input",
			ForecastError::InsufficientData { .. } => "Insufficient Data",
			ForecastError::Training(_) => "Training Failed",
			ForecastError::UnknownCountry(_) => "Unknown Country",
			ForecastError::Table(_) => "Failed to Read Content",
			ForecastError::Io(_) => "Cannot Access File",
		};

		ErrorInfo {
			title: Cow::Borrowed(title),
			message: err.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_messages_are_descriptive() {
		let err = ForecastError::InsufficientData { needed: 17, got: 9 };
		assert_eq!(err.to_string(), "insufficient data: need at least 17, got 9");

		let err = ForecastError::Validation(String::from("input arrays should not be empty"));
		assert_eq!(
			err.to_string(),
			"validation error: input arrays should not be empty"
		);

		let err = ForecastError::UnknownCountry(String::from("Atlantis"));
		assert_eq!(
			err.to_string(),
			"country \"Atlantis\" is not present in the table"
		);
	}

	#[test]
	fn insufficient_data_renders_as_user_message() {
		let err = ForecastError::InsufficientData { needed: 17, got: 3 };
		let info = ErrorInfo::from(&err);

		assert!(err.is_insufficient_data());
		assert_eq!(info.title, "Insufficient Data");
		assert!(info.message.contains("need at least 17"));
	}
}
