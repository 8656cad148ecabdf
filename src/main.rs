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

use anyhow::{anyhow, Context};
use burn::config::Config;
use clap::Parser;
use covid_forecast::{
	export_csv, forecast, CaseTable, CaseTables, ErrorInfo, ForecastConfig, ForecastError,
	ForecastResult, PredictionStore, Study,
};
use std::{
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNTRIES: [&'static str; 5] = ["India", "US", "Brazil", "Canada", "United Kingdom"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Forecast the next week of COVID-19 cases per country")]
struct Args {
	/// Confirmed-cases table (CSV or spreadsheet, one column per date)
	#[arg(long)]
	confirmed: PathBuf,

	#[arg(long)]
	deaths: Option<PathBuf>,

	#[arg(long)]
	recovered: Option<PathBuf>,

	/// Sheet to read when the tables are spreadsheets
	#[arg(long)]
	sheet: Option<String>,

	/// Country to forecast, repeatable
	#[arg(short, long = "country")]
	countries: Vec<String>,

	/// Study to forecast, repeatable; every loaded table by default
	#[arg(short, long = "study")]
	studies: Vec<Study>,

	/// Directory of the prediction store
	#[arg(short, long, default_value = "predictions")]
	output: PathBuf,

	/// ForecastConfig as JSON
	#[arg(long)]
	config: Option<PathBuf>,

	/// Seed for weight initialisation and shuffling. The backend RNG is process-wide,
	/// so a seeded batch runs its requests one at a time
	#[arg(long)]
	seed: Option<u64>,

	/// Discard a request still running after this many seconds
	#[arg(long)]
	request_timeout_secs: Option<u64>,

	/// Also write `<country>_<study>.csv` next to the store documents
	#[arg(long)]
	export_csv: bool,
}

enum RequestOutcome {
	Forecast(ForecastResult),
	Failed(ForecastError),
	TimedOut,
	Aborted(String),
}

fn load_tables(args: &Args) -> anyhow::Result<CaseTables> {
	let sheet = args.sheet.as_deref();
	let load = |study: Study, path: &PathBuf| {
		CaseTable::load(study, path, sheet)
			.with_context(|| format!("loading {} table from {}", study, path.display()))
	};

	let mut tables = CaseTables::new(load(Study::Confirmed, &args.confirmed)?);
	if let Some(path) = &args.deaths {
		tables = tables.with_deaths(load(Study::Deaths, path)?);
	}
	if let Some(path) = &args.recovered {
		tables = tables.with_recovered(load(Study::Recovered, path)?);
	}

	Ok(tables)
}

fn load_config(args: &Args) -> anyhow::Result<ForecastConfig> {
	let mut config = match &args.config {
		Some(path) => ForecastConfig::load(path)
			.map_err(|err| anyhow!("cannot read config {}: {}", path.display(), err))?,
		None => ForecastConfig::default(),
	};

	if args.seed.is_some() {
		config.seed = args.seed;
	}

	Ok(config)
}

async fn run_request(
	tables: Arc<CaseTables>,
	config: Arc<ForecastConfig>,
	study: Study,
	country: String,
	timeout: Option<Duration>,
) -> (String, Study, RequestOutcome) {
	let cloned_country = country.clone();
	let job = tokio::task::spawn_blocking(move || forecast(&tables, study, &cloned_country, &config));

	let joined = match timeout {
		Some(limit) => match tokio::time::timeout(limit, job).await {
			Ok(ok) => ok,
			Err(_) => return (country, study, RequestOutcome::TimedOut),
		},
		None => job.await,
	};

	let outcome = match joined {
		Ok(Ok(ok)) => RequestOutcome::Forecast(ok),
		Ok(Err(err)) => RequestOutcome::Failed(err),
		Err(err) => RequestOutcome::Aborted(err.to_string()),
	};

	(country, study, outcome)
}

/// Stores the result and, when `csv_format` is set, exports `<stem>_<study>.csv` beside it.
fn persist(
	store: &PredictionStore,
	result: &ForecastResult,
	csv_format: Option<&str>,
) -> covid_forecast::Result<PathBuf> {
	let path = store.save(result)?;
	if let Some(date_format) = csv_format {
		export_csv(result, csv_path(&path, result.study), date_format)?;
	}
	Ok(path)
}

fn csv_path(stored: &Path, study: Study) -> PathBuf {
	stored.with_file_name(format!(
		"{}_{}.csv",
		stored.file_stem().and_then(|found| found.to_str()).unwrap_or("forecast"),
		study
	))
}

/// Seeded batches go one request at a time, the backend RNG is shared by the whole process.
fn runs_in_parallel(config: &ForecastConfig) -> bool {
	config.seed.is_none()
}

/// Logs one finished request. Returns true when it counts as a failure.
fn report(
	store: &PredictionStore,
	csv_format: Option<&str>,
	country: &str,
	study: Study,
	outcome: RequestOutcome,
) -> bool {
	match outcome {
		RequestOutcome::Forecast(result) => match persist(store, &result, csv_format) {
			Ok(path) => {
				info!(
					%country,
					%study,
					cases = ?result.cases,
					accuracy_score = result.accuracy_score,
					naive = result.is_naive(),
					path = %path.display(),
					"forecast stored"
				);
				false
			}
			Err(err) => {
				let info = ErrorInfo::from(&err);
				error!(%country, %study, title = %info.title, "forecast not stored: {}", info.message);
				true
			}
		},
		RequestOutcome::Failed(err) => {
			let info = ErrorInfo::from(&err);
			if err.is_insufficient_data() {
				warn!(%country, %study, title = %info.title, "{}", info.message);
				false
			} else {
				error!(%country, %study, title = %info.title, "{}", info.message);
				true
			}
		}
		RequestOutcome::TimedOut => {
			warn!(%country, %study, "request discarded after timeout");
			true
		}
		RequestOutcome::Aborted(message) => {
			error!(%country, %study, "request aborted: {}", message);
			true
		}
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();
	let config = Arc::new(load_config(&args)?);
	let tables = Arc::new(load_tables(&args)?);
	let store = PredictionStore::open(&args.output)
		.with_context(|| format!("opening prediction store at {}", args.output.display()))?;

	let countries = if args.countries.is_empty() {
		DEFAULT_COUNTRIES
			.iter()
			.map(|each| each.to_string())
			.collect::<Vec<_>>()
	} else {
		args.countries.clone()
	};
	let studies = if args.studies.is_empty() {
		[Study::Confirmed, Study::Deaths, Study::Recovered]
			.into_iter()
			.filter(|study| tables.get(*study).is_ok())
			.collect::<Vec<_>>()
	} else {
		args.studies.clone()
	};
	let timeout = args.request_timeout_secs.map(Duration::from_secs);

	let csv_format = args.export_csv.then(|| config.date_format());
	let mut failures = 0usize;

	if !runs_in_parallel(&config) {
		for study in studies.iter() {
			for country in countries.iter() {
				let (country, study, outcome) =
					run_request(tables.clone(), config.clone(), *study, country.clone(), timeout).await;
				if report(&store, csv_format, &country, study, outcome) {
					failures += 1;
				}
			}
		}
	} else {
		let mut tasks = JoinSet::new();
		for study in studies.iter() {
			for country in countries.iter() {
				tasks.spawn(run_request(
					tables.clone(),
					config.clone(),
					*study,
					country.clone(),
					timeout,
				));
			}
		}

		while let Some(joined) = tasks.join_next().await {
			let (country, study, outcome) = joined?;
			if report(&store, csv_format, &country, study, outcome) {
				failures += 1;
			}
		}
	}

	info!(
		requests = studies.len() * countries.len(),
		failures,
		"batch finished"
	);

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use covid_forecast::ForecastOutcome;
	use std::fs;

	fn result(country: &str) -> ForecastResult {
		ForecastResult {
			country: String::from(country),
			study: Study::Confirmed,
			dates: vec![NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()],
			cases: vec![100],
			accuracy_score: 1.0,
			outcome: ForecastOutcome::Naive,
		}
	}

	#[test]
	fn seeded_batches_run_sequentially() {
		assert!(runs_in_parallel(&ForecastConfig::default()));
		assert!(!runs_in_parallel(&ForecastConfig::default().with_seed(Some(7))));
	}

	#[test]
	fn stored_forecast_is_not_a_failure() {
		let directory = tempfile::tempdir().unwrap();
		let store = PredictionStore::open(directory.path()).unwrap();

		let failed = report(
			&store,
			Some("%d/%m/%Y"),
			"Testland",
			Study::Confirmed,
			RequestOutcome::Forecast(result("Testland")),
		);

		assert!(!failed);
		assert!(store.load("Testland", Study::Confirmed).unwrap().is_some());
		assert!(directory.path().join("Testland_confirmed.csv").exists());
	}

	#[test]
	fn unwritable_store_counts_as_a_failure() {
		let directory = tempfile::tempdir().unwrap();
		let store = PredictionStore::open(directory.path()).unwrap();
		// a directory where the document should be makes both read and write fail
		fs::create_dir(store.path_of("Testland")).unwrap();

		let failed = report(
			&store,
			None,
			"Testland",
			Study::Confirmed,
			RequestOutcome::Forecast(result("Testland")),
		);
		assert!(failed);

		// the next request still goes through
		let failed = report(
			&store,
			None,
			"Elsewhere",
			Study::Confirmed,
			RequestOutcome::Forecast(result("Elsewhere")),
		);
		assert!(!failed);
	}

	#[test]
	fn short_history_is_only_a_warning() {
		let directory = tempfile::tempdir().unwrap();
		let store = PredictionStore::open(directory.path()).unwrap();

		let insufficient = ForecastError::InsufficientData { needed: 17, got: 3 };
		assert!(!report(&store, None, "Testland", Study::Deaths, RequestOutcome::Failed(insufficient)));
		assert!(report(&store, None, "Testland", Study::Deaths, RequestOutcome::TimedOut));
		assert!(report(
			&store,
			None,
			"Testland",
			Study::Deaths,
			RequestOutcome::Failed(ForecastError::Training(String::from("diverged")))
		));
	}
}
