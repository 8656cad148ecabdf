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

use calamine::DataType;
use chrono::NaiveDate;
use parse_datetime::parse_datetime;
use std::collections::BTreeMap;

use super::typedef::*;
use crate::error::{ForecastError, Result};
use crate::typedef::Study;

const DATE_FORMATS: [&'static str; 4] = ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Johns Hopkins headers are `m/d/yy`; anything else goes through the free-form parser.
pub(super) fn parse_date(cell: &str) -> Option<NaiveDate> {
	let cell = cell.trim();
	if cell.is_empty() {
		return None;
	}

	DATE_FORMATS
		.iter()
		.find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
		.or_else(|| {
			// bare numbers are counts, never dates
			if cell.parse::<f64>().is_ok() {
				return None;
			}
			parse_datetime(cell).ok().map(|found| found.date_naive())
		})
}

pub(super) fn parse_cell(cell: &str) -> CellValue {
	let trimmed = cell.trim();
	if trimmed.is_empty() {
		CellValue::Empty
	} else if let Ok(number_value) = trimmed.parse::<f64>() {
		CellValue::Number(number_value)
	} else if let Some(date_value) = parse_date(trimmed) {
		CellValue::Date(date_value)
	} else {
		CellValue::String(trimmed.to_string())
	}
}

pub(super) fn spreadsheet_cell(cell: &calamine::Data) -> CellValue {
	match cell {
		calamine::Data::Empty => CellValue::Empty,
		calamine::Data::Int(number_value) => CellValue::Number(*number_value as f64),
		calamine::Data::Float(number_value) => CellValue::Number(*number_value),
		calamine::Data::DateTime(_) | calamine::Data::DateTimeIso(_) => match cell.as_date() {
			Some(date_value) => CellValue::Date(date_value),
			None => parse_cell(cell.to_string().as_str()),
		},
		_ => parse_cell(cell.to_string().as_str()),
	}
}

fn country_column(header: &[CellValue]) -> Option<usize> {
	header.iter().position(|each| match each {
		CellValue::String(name) => COUNTRY_HEADERS
			.iter()
			.any(|candidate| candidate.eq_ignore_ascii_case(name)),
		_ => false,
	})
}

/// Builds a table from a header row and data rows, summing rows that share a country.
pub(super) fn assemble(
	study: Study,
	header: Vec<CellValue>,
	rows: Vec<Vec<CellValue>>,
) -> Result<CaseTable> {
	let country_index = country_column(&header).ok_or_else(|| {
		ForecastError::Table(format!(
			"no country column, expected one of {}",
			COUNTRY_HEADERS.join(", ")
		))
	})?;

	let mut date_columns = header
		.iter()
		.enumerate()
		.filter_map(|(index, each)| match each {
			CellValue::Date(date) => Some((*date, index)),
			_ => None,
		})
		.collect::<Vec<_>>();
	if date_columns.is_empty() {
		return Err(ForecastError::Table(String::from("no date columns in the header")));
	}
	date_columns.sort_by_key(|(date, _)| *date);
	date_columns.dedup_by_key(|(date, _)| *date);

	let mut grouped = BTreeMap::<String, Vec<f64>>::new();
	for (row_index, row) in rows.iter().enumerate() {
		let country = match row.get(country_index) {
			Some(CellValue::String(name)) => name.clone(),
			Some(CellValue::Number(number)) => number.to_string(),
			_ => continue,
		};

		let values = date_columns
			.iter()
			.map(|(date, column)| match row.get(*column) {
				None | Some(CellValue::Empty) => Ok(0f64),
				Some(CellValue::Number(number)) => Ok(*number),
				Some(other) => Err(ForecastError::Table(format!(
					"row {} holds a non-numeric value {:?} for {}",
					row_index + 1,
					other,
					date
				))),
			})
			.collect::<Result<Vec<_>>>()?;

		let total = grouped
			.entry(country)
			.or_insert_with(|| vec![0f64; date_columns.len()]);
		total
			.iter_mut()
			.zip(values.iter())
			.for_each(|(sum, each)| *sum += each);
	}

	Ok(CaseTable {
		study,
		dates: date_columns.into_iter().map(|(date, _)| date).collect::<Vec<_>>(),
		rows: grouped,
	})
}
