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

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::typedef::Study;

/// Header names the country column may carry, compared case-insensitively.
pub(crate) const COUNTRY_HEADERS: [&'static str; 3] = ["country", "Country/Region", "Country_Region"];

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CellValue {
	Empty,
	Number(f64),
	Date(NaiveDate),
	String(String),
}

/// One study's table: one row per country, one column per date, cumulative counts.
///
/// Dates are strictly increasing and every row holds exactly one value per date.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseTable {
	pub(super) study: Study,
	pub(super) dates: Vec<NaiveDate>,
	pub(super) rows: BTreeMap<String, Vec<f64>>,
}

/// The three study tables a forecast request can draw from.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseTables {
	pub confirmed: CaseTable,
	pub deaths: Option<CaseTable>,
	pub recovered: Option<CaseTable>,
}

/// Ordered (date, count) history of one country for one study.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeSeries {
	pub country: String,
	pub study: Study,
	pub dates: Vec<NaiveDate>,
	pub values: Vec<f64>,
}
