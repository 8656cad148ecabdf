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
use covid_forecast::train::Activation;
use covid_forecast::{
	forecast, forecast_series, make_series, CaseTable, CaseTables, CumulativeSeries,
	ForecastConfig, ForecastError, ForecastOutcome, ModelSearch, ParamGrid, SearchConfig, Study,
};

fn small_grid() -> ParamGrid {
	ParamGrid {
		filters: vec![8],
		nodes: vec![8],
		epochs: vec![60],
		activation_conv: vec![Activation::Relu],
		activation_dense: vec![Activation::Tanh, Activation::Swish],
	}
}

fn small_config() -> ForecastConfig {
	ForecastConfig::new(SearchConfig::new().with_grid(small_grid())).with_seed(Some(42))
}

fn series(values: Vec<f64>) -> CumulativeSeries {
	let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
	let dates = (0..values.len() as u64)
		.map(|offset| start.checked_add_days(Days::new(offset)).unwrap())
		.collect::<Vec<_>>();
	CumulativeSeries::new("Testland", Study::Confirmed, dates, values).unwrap()
}

#[test]
fn steady_growth_keeps_the_learned_forecast() {
	let values = (1..=30).map(|day| day as f64 * 10.0).collect::<Vec<_>>();
	let result = forecast_series(&series(values), &small_config()).unwrap();

	assert!(matches!(result.outcome, ForecastOutcome::Learned { .. }));
	assert!(result.accuracy_score <= 1.0);
	assert_eq!(result.cases.len(), 7);
	assert_eq!(result.dates.len(), 7);
	assert_eq!(result.dates[0], NaiveDate::from_ymd_opt(2020, 3, 31).unwrap());

	assert!(result.cases[0] >= 305 && result.cases[0] <= 315);
	assert!(result
		.cases
		.windows(2)
		.all(|pair| (5..=15).contains(&(pair[1] - pair[0]))));
}

#[test]
fn flat_tail_falls_back_to_naive() {
	let values = (1..=25)
		.map(|day| day as f64 * 10.0)
		.chain(std::iter::repeat(250.0).take(10))
		.collect::<Vec<_>>();
	let result = forecast_series(&series(values), &small_config()).unwrap();

	assert!(result.is_naive());
	assert_eq!(result.cases, vec![250; 7]);
	assert_eq!(result.accuracy_score, 1.0);
	assert_eq!(
		result.formatted_dates("%d/%m/%Y").first().map(|each| each.as_str()),
		Some("05/04/2020")
	);
}

#[test]
fn short_history_is_insufficient_data() {
	let values = std::iter::repeat(0.0)
		.take(10)
		.chain((1..=14).map(|day| day as f64))
		.collect::<Vec<_>>();

	let error = forecast_series(&series(values), &small_config()).unwrap_err();
	assert_eq!(error, ForecastError::InsufficientData { needed: 17, got: 14 });
}

#[test]
fn exhausted_budget_is_a_training_error() {
	let mut config = small_config();
	config.search = config.search.with_candidate_budget_secs(Some(0));

	let values = (1..=40).map(|day| (day * day) as f64).collect::<Vec<_>>();
	assert!(matches!(
		forecast_series(&series(values), &config),
		Err(ForecastError::Training(_))
	));
}

#[test]
fn selection_is_a_grid_member_with_minimal_score() {
	let values = (1..=40).map(|day| (day * day) as f64).collect::<Vec<_>>();
	let dataset = make_series(&series(values), 14);
	let split = dataset.split(0.85).unwrap();

	let grid = small_grid();
	let search = ModelSearch::new(SearchConfig::new().with_grid(grid.clone()), 14).with_seed(Some(3));
	let outcome = search.select(split.train).unwrap();

	assert!(grid.contains(&outcome.best.params));
	assert!(outcome
		.candidates
		.iter()
		.all(|each| each.score.is_nan() || outcome.best.score <= each.score));
}

#[test]
fn tables_route_requests_by_study_and_country() {
	let mut header = String::from("Province/State,Country/Region");
	let mut row = String::from(",Testland");
	for day in 1..=30 {
		header.push_str(&format!(",3/{}/20", day));
		row.push_str(&format!(",{}", day * 10));
	}
	let csv = format!("{}\n{}\n", header, row);

	let confirmed = CaseTable::from_csv_reader(Study::Confirmed, csv.as_bytes()).unwrap();
	let tables = CaseTables::new(confirmed);

	let result = forecast(&tables, Study::Confirmed, "Testland", &small_config()).unwrap();
	assert_eq!(result.country, "Testland");
	assert_eq!(result.study, Study::Confirmed);

	assert_eq!(
		forecast(&tables, Study::Confirmed, "Atlantis", &small_config()),
		Err(ForecastError::UnknownCountry(String::from("Atlantis")))
	);
	assert!(matches!(
		forecast(&tables, Study::Deaths, "Testland", &small_config()),
		Err(ForecastError::Table(_))
	));
}
