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
use covid_forecast::{make_series, CumulativeSeries, Study};
use proptest::prelude::*;

fn series(values: Vec<f64>) -> CumulativeSeries {
	let start = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
	let dates = (0..values.len() as u64)
		.map(|offset| start.checked_add_days(Days::new(offset)).unwrap())
		.collect::<Vec<_>>();
	CumulativeSeries::new("Testland", Study::Deaths, dates, values).unwrap()
}

/// Non-decreasing cumulative counts starting at 1, so no day is dropped.
fn cumulative(length: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
	prop::collection::vec(0u32..500, length).prop_map(|increments| {
		increments
			.into_iter()
			.scan(1f64, |total, each| {
				let current = *total;
				*total += each as f64;
				Some(current)
			})
			.collect::<Vec<_>>()
	})
}

proptest! {
	#[test]
	fn sample_count_is_delta_length_minus_window(values in cumulative(1..60)) {
		let dataset = make_series(&series(values), 14);
		let deltas = dataset.deltas.len();

		prop_assert_eq!(dataset.samples.len(), deltas.saturating_sub(14));
		for (index, sample) in dataset.samples.iter().enumerate() {
			prop_assert_eq!(&sample.window[..], &dataset.deltas.values[index..index + 14]);
			prop_assert_eq!(sample.target, dataset.deltas.values[index + 14]);
		}
	}

	#[test]
	fn running_sum_rebuilds_the_history(values in cumulative(2..60)) {
		let dataset = make_series(&series(values.clone()), 14);
		let rebuilt = dataset.deltas.reconstruct(values[0]);

		prop_assert_eq!(rebuilt, values[1..].to_vec());
	}

	#[test]
	fn zero_days_never_reach_the_deltas(
		values in cumulative(2..40),
		gaps in prop::collection::vec(0usize..40, 0..5),
	) {
		let mut raw = values.clone();
		for gap in gaps {
			raw.insert(gap.min(raw.len()), 0.0);
		}

		let dataset = make_series(&series(raw), 14);
		prop_assert_eq!(dataset.history.values, values);
	}
}
