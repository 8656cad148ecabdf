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

use calamine::Reader;
use chrono::NaiveDate;
use std::{collections::BTreeMap, io, path::Path};
use tracing::debug;

use super::helper::*;
use super::typedef::*;
use crate::error::{ForecastError, Result};
use crate::typedef::Study;

const ERROR_EXTENSION: &'static str = "file type unsupported";

impl CaseTable {
	/// Builds a table from already-aggregated rows. Every row must hold one value per date.
	pub fn new(
		study: Study,
		dates: Vec<NaiveDate>,
		rows: impl IntoIterator<Item = (String, Vec<f64>)>,
	) -> Result<Self> {
		if dates.windows(2).any(|pair| pair[0] >= pair[1]) {
			return Err(ForecastError::Table(String::from(
				"dates must be strictly increasing",
			)));
		}

		let rows = rows.into_iter().collect::<BTreeMap<_, _>>();
		if let Some((country, values)) = rows.iter().find(|(_, values)| values.len() != dates.len()) {
			return Err(ForecastError::Table(format!(
				"\"{}\" holds {} values for {} dates",
				country,
				values.len(),
				dates.len()
			)));
		}

		Ok(Self { study, dates, rows })
	}

	/// Reads a CSV or spreadsheet, dispatching on the file extension. `sheet` is ignored for CSV.
	pub fn load<P: AsRef<Path>>(study: Study, path: P, sheet: Option<&str>) -> Result<Self> {
		let path = path.as_ref();
		let extension = path
			.extension()
			.and_then(|found| found.to_str())
			.map(|found| found.to_lowercase())
			.ok_or_else(|| {
				ForecastError::Table(format!(
					"{}: \"{}\" has no extension",
					ERROR_EXTENSION,
					path.to_string_lossy()
				))
			})?;

		match extension.as_str() {
			"csv" => Self::from_csv_path(study, path),
			"xlsx" | "xls" | "xlsb" | "ods" => Self::from_spreadsheet(study, path, sheet),
			_ => Err(ForecastError::Table(format!(
				"{}: cannot parse \"{}\" file extension",
				ERROR_EXTENSION, extension
			))),
		}
	}

	pub fn from_csv_path<P: AsRef<Path>>(study: Study, path: P) -> Result<Self> {
		let reader = csv::Reader::from_path(path)?;
		Self::from_csv(study, reader)
	}

	pub fn from_csv_reader<R: io::Read>(study: Study, source: R) -> Result<Self> {
		Self::from_csv(study, csv::Reader::from_reader(source))
	}

	fn from_csv<R: io::Read>(study: Study, mut reader: csv::Reader<R>) -> Result<Self> {
		let header = reader
			.headers()?
			.iter()
			.map(parse_cell)
			.collect::<Vec<_>>();

		let rows = reader
			.records()
			.map(|each| {
				let row = each?;
				Ok(row.iter().map(parse_cell).collect::<Vec<_>>())
			})
			.collect::<Result<Vec<_>>>()?;

		let table = assemble(study, header, rows)?;
		debug!(%study, countries = table.rows.len(), dates = table.dates.len(), "loaded CSV table");
		Ok(table)
	}

	/// Reads the named sheet, or the first one when `sheet` is unset.
	pub fn from_spreadsheet<P: AsRef<Path>>(study: Study, path: P, sheet: Option<&str>) -> Result<Self> {
		let mut workbook = calamine::open_workbook_auto(path)
			.map_err(|err| ForecastError::Table(err.to_string()))?;

		let sheet_name = match sheet {
			Some(found) => found.to_string(),
			None => workbook
				.sheet_names()
				.first()
				.cloned()
				.ok_or_else(|| ForecastError::Table(String::from("the workbook has no sheet")))?,
		};

		let range = workbook
			.worksheet_range(&sheet_name)
			.map_err(|err| ForecastError::Table(err.to_string()))?;

		let mut rows = range
			.rows()
			.map(|each| each.iter().map(spreadsheet_cell).collect::<Vec<_>>());
		let header = rows
			.next()
			.ok_or_else(|| ForecastError::Table(String::from("the selected sheet has no header")))?;

		let table = assemble(study, header, rows.collect::<Vec<_>>())?;
		debug!(%study, sheet = %sheet_name, countries = table.rows.len(), "loaded spreadsheet table");
		Ok(table)
	}

	pub fn study(&self) -> Study {
		self.study
	}

	pub fn dates(&self) -> &[NaiveDate] {
		&self.dates
	}

	pub fn countries(&self) -> impl Iterator<Item = &str> {
		self.rows.keys().map(|each| each.as_str())
	}

	pub fn contains(&self, country: &str) -> bool {
		self.rows.contains_key(country)
	}

	/// The cumulative history of one country, or `UnknownCountry`.
	pub fn series(&self, country: &str) -> Result<CumulativeSeries> {
		let values = self
			.rows
			.get(country)
			.ok_or_else(|| ForecastError::UnknownCountry(country.to_string()))?;

		Ok(CumulativeSeries {
			country: country.to_string(),
			study: self.study,
			dates: self.dates.clone(),
			values: values.clone(),
		})
	}
}

impl CaseTables {
	pub fn new(confirmed: CaseTable) -> Self {
		Self {
			confirmed,
			deaths: None,
			recovered: None,
		}
	}

	pub fn with_deaths(mut self, deaths: CaseTable) -> Self {
		self.deaths = Some(deaths);
		self
	}

	pub fn with_recovered(mut self, recovered: CaseTable) -> Self {
		self.recovered = Some(recovered);
		self
	}

	pub fn get(&self, study: Study) -> Result<&CaseTable> {
		let found = match study {
			Study::Confirmed => Some(&self.confirmed),
			Study::Deaths => self.deaths.as_ref(),
			Study::Recovered => self.recovered.as_ref(),
		};

		found.ok_or_else(|| ForecastError::Table(format!("no {} table has been loaded", study)))
	}

	pub fn series(&self, study: Study, country: &str) -> Result<CumulativeSeries> {
		self.get(study)?.series(country)
	}
}

impl CumulativeSeries {
	pub fn new(country: &str, study: Study, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
		if dates.len() != values.len() {
			return Err(ForecastError::Table(format!(
				"{} dates for {} values",
				dates.len(),
				values.len()
			)));
		}

		Ok(Self {
			country: country.to_string(),
			study,
			dates,
			values,
		})
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const SAMPLE: &'static str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
,Afghanistan,33.0,65.0,0,0,1
Ontario,Canada,51.2,-85.3,1,2,2
British Columbia,Canada,53.7,-127.6,0,1,3
";

	#[test]
	fn wide_csv_is_grouped_by_country() {
		let table = CaseTable::from_csv_reader(Study::Confirmed, SAMPLE.as_bytes()).unwrap();

		assert_eq!(table.study(), Study::Confirmed);
		assert_eq!(table.dates().len(), 3);
		assert_eq!(table.countries().collect::<Vec<_>>(), vec!["Afghanistan", "Canada"]);

		let canada = table.series("Canada").unwrap();
		assert_eq!(canada.values, vec![1.0, 3.0, 5.0]);
		assert_eq!(canada.dates[0], NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
	}

	#[test]
	fn unknown_country_is_reported() {
		let table = CaseTable::from_csv_reader(Study::Deaths, SAMPLE.as_bytes()).unwrap();
		assert_eq!(
			table.series("Atlantis"),
			Err(ForecastError::UnknownCountry(String::from("Atlantis")))
		);
	}

	#[test]
	fn csv_is_loaded_by_extension() {
		let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
		file.write_all(SAMPLE.as_bytes()).unwrap();

		let table = CaseTable::load(Study::Recovered, file.path(), None).unwrap();
		assert!(table.contains("Afghanistan"));

		let unsupported = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
		assert!(matches!(
			CaseTable::load(Study::Recovered, unsupported.path(), None),
			Err(ForecastError::Table(_))
		));
	}

	#[test]
	fn tables_are_picked_by_study() {
		let confirmed = CaseTable::from_csv_reader(Study::Confirmed, SAMPLE.as_bytes()).unwrap();
		let tables = CaseTables::new(confirmed);

		assert!(tables.series(Study::Confirmed, "Canada").is_ok());
		assert!(matches!(
			tables.series(Study::Deaths, "Canada"),
			Err(ForecastError::Table(_))
		));
	}

	#[test]
	fn programmatic_tables_are_checked() {
		let dates = vec![
			NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
			NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
		];

		assert!(CaseTable::new(Study::Confirmed, dates.clone(), [(String::from("X"), vec![1.0])]).is_err());
		assert!(CaseTable::new(
			Study::Confirmed,
			vec![dates[1], dates[0]],
			[(String::from("X"), vec![1.0, 2.0])]
		)
		.is_err());
		assert!(CaseTable::new(Study::Confirmed, dates, [(String::from("X"), vec![1.0, 2.0])]).is_ok());
	}
}
