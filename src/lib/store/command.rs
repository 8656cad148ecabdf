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

use std::{fs, io, path::Path, path::PathBuf};
use tracing::debug;

use super::helper::*;
use super::typedef::*;
use crate::error::{ForecastError, Result};
use crate::typedef::{ForecastResult, Study};

impl PredictionStore {
	/// Opens (and creates when missing) the store directory.
	pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
		let root = root.as_ref().to_path_buf();
		fs::create_dir_all(&root)?;
		Ok(Self { root })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn path_of(&self, country: &str) -> PathBuf {
		self.root.join(file_stem(country)).with_extension("json")
	}

	/// Every stored study of `country`; an empty document when nothing was saved yet.
	///
	/// Fails when the document at that path belongs to another country whose name maps to the same file.
	pub fn load_all(&self, country: &str) -> Result<StoredPredictions> {
		let path = self.path_of(country);
		let content = match fs::read_to_string(&path) {
			Ok(ok) => ok,
			Err(err) if err.kind() == io::ErrorKind::NotFound => {
				return Ok(StoredPredictions {
					country: country.to_string(),
					..Default::default()
				})
			}
			Err(err) => return Err(err.into()),
		};

		let document = serde_json::from_str::<StoredPredictions>(&content)?;
		if document.country != country {
			return Err(ForecastError::Io(format!(
				"{} holds predictions of \"{}\", not \"{}\"",
				path.display(),
				document.country,
				country
			)));
		}

		Ok(document)
	}

	pub fn load(&self, country: &str, study: Study) -> Result<Option<ForecastResult>> {
		Ok(self.load_all(country)?.studies.remove(&study))
	}

	/// Replaces the stored entry for the result's (country, study), keeping the other studies.
	pub fn save(&self, result: &ForecastResult) -> Result<PathBuf> {
		let mut document = self.load_all(&result.country)?;
		document.studies.insert(result.study, result.clone());

		let path = self.path_of(&result.country);
		fs::write(&path, serde_json::to_string_pretty(&document)?)?;
		debug!(country = %result.country, study = %result.study, path = %path.display(), "stored forecast");
		Ok(path)
	}
}

/// Writes `Date,Cases` rows, dates rendered with `date_format`.
pub fn export_csv<P: AsRef<Path>>(result: &ForecastResult, path: P, date_format: &str) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)?;
	writer.write_record(["Date", "Cases"])?;

	for (date, cases) in result.formatted_dates(date_format).iter().zip(result.cases.iter()) {
		writer.write_record([date.clone(), cases.to_string()])?;
	}

	writer.flush()?;
	Ok(())
}
