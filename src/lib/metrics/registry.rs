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

use super::typedef::*;

macro_rules! metric {
	($name:literal, $applicability:ident, $compute:expr) => {
		MetricEntry {
			name: $name,
			applicability: Applicability::$applicability,
			compute: $compute,
		}
	};
}

/// Every named metric with the parameters `calculate_all` runs it with.
pub fn registry() -> Vec<MetricEntry> {
	vec![
		metric!("abs_pbias", Always, |m| Ok(Some(m.abs_pbias()))),
		metric!("acc", Always, |m| Ok(Some(m.acc()))),
		metric!("agreement_index", Always, |m| Ok(Some(m.agreement_index()))),
		metric!("aitchison", Always, |m| Ok(Some(m.aitchison(Center::Mean)))),
		metric!("bias", Always, |m| Ok(Some(m.bias()))),
		metric!("brier_score", OnRequest, |m| Ok(Some(m.brier_score()?))),
		metric!("centered_rms_dev", Always, |m| Ok(Some(m.centered_rms_dev()))),
		metric!("corr_coeff", Always, |m| Ok(Some(m.corr_coeff()))),
		metric!("covariance", Always, |m| Ok(Some(m.covariance()))),
		metric!("decomposed_mse", Always, |m| Ok(Some(m.decomposed_mse()))),
		metric!("euclid_distance", Always, |m| Ok(Some(m.euclid_distance()))),
		metric!("exp_var_score", Always, |m| Ok(Some(m.exp_var_score(None)?))),
		metric!("fdc_fhv", Always, |m| Ok(Some(m.fdc_fhv(0.02)?))),
		metric!("fdc_flv", Always, |m| Ok(Some(m.fdc_flv(0.3)?))),
		metric!("gmae", Always, |m| Ok(Some(m.gmae()))),
		metric!("gmean_diff", Always, |m| Ok(Some(m.gmean_diff()))),
		metric!("gmrae", Always, |m| Ok(Some(m.gmrae(Benchmark::default())?))),
		metric!("inrse", Always, |m| Ok(Some(m.inrse()))),
		metric!("irmse", Always, |m| Ok(Some(m.irmse()))),
		metric!("js", Always, |m| Ok(Some(m.js()))),
		metric!("kge", Always, |m| Ok(Some(m.kge()))),
		metric!("kge_bound", Always, |m| Ok(Some(m.kge_bound()))),
		metric!("kge_mod", Always, |m| Ok(Some(m.kge_mod()))),
		metric!("kge_np", Always, |m| Ok(Some(m.kge_np()))),
		metric!("kgenp_bound", Always, |m| Ok(Some(m.kgenp_bound()))),
		metric!("kgeprime_c2m", Always, |m| Ok(Some(m.kgeprime_c2m()))),
		metric!("kl_sym", Always, |m| Ok(m.kl_sym())),
		metric!("lm_index", Always, |m| Ok(Some(m.lm_index(None)))),
		metric!("log_nse", Always, |m| Ok(Some(m.log_nse(0f64)))),
		metric!("log_prob", Always, |m| Ok(Some(m.log_prob()))),
		metric!("maape", Always, |m| Ok(Some(m.maape()))),
		metric!("mae", Always, |m| Ok(Some(m.mae()))),
		metric!("mape", Always, |m| Ok(Some(m.mape()))),
		metric!("mapd", Always, |m| Ok(Some(m.mapd()))),
		metric!("mase", Always, |m| Ok(Some(m.mase(1)))),
		metric!("max_error", Always, |m| Ok(Some(m.max_error()))),
		metric!("mb_r", Always, |m| Ok(Some(m.mb_r()))),
		metric!("mbrae", Always, |m| Ok(Some(m.mbrae(Benchmark::default())?))),
		metric!("mda", Always, |m| Ok(Some(m.mda()))),
		metric!("mdape", Always, |m| Ok(Some(m.mdape()))),
		metric!("mde", Always, |m| Ok(Some(m.mde()))),
		metric!("mdrae", Always, |m| Ok(Some(m.mdrae(Benchmark::default())?))),
		metric!("me", Always, |m| Ok(Some(m.me()))),
		metric!("mean_abs_rel_error", Always, |m| Ok(Some(m.mean_abs_rel_error()))),
		metric!("mean_bias_error", Always, |m| Ok(Some(m.mean_bias_error()))),
		metric!("mean_gamma_deviance", StrictlyPositive, |m| Ok(Some(m.mean_gamma_deviance(None)?))),
		metric!("mean_poisson_deviance", StrictlyPositive, |m| Ok(Some(m.mean_poisson_deviance(None)?))),
		metric!("mean_square_log_error", NonNegative, |m| Ok(Some(m.mean_square_log_error(None)?))),
		metric!("mean_var", Always, |m| Ok(Some(m.mean_var()))),
		metric!("med_seq_error", Always, |m| Ok(Some(m.med_seq_error()))),
		metric!("median_abs_error", Always, |m| Ok(Some(m.median_abs_error()))),
		metric!("mle", Always, |m| Ok(Some(m.mle()))),
		metric!("mod_agreement_index", Always, |m| Ok(Some(m.mod_agreement_index(1f64)))),
		metric!("mpe", Always, |m| Ok(Some(m.mpe()))),
		metric!("mrae", Always, |m| Ok(Some(m.mrae(Benchmark::default())?))),
		metric!("mse", Always, |m| Ok(Some(m.mse(None)?))),
		metric!("nrmse", Always, |m| Ok(Some(m.nrmse()))),
		metric!("nrmse_ipercentile", Always, |m| Ok(Some(m.nrmse_ipercentile(25f64, 75f64)?))),
		metric!("nrmse_mean", Always, |m| Ok(Some(m.nrmse_mean()))),
		metric!("nrmse_range", Always, |m| Ok(Some(m.nrmse_range()))),
		metric!("norm_ae", Always, |m| Ok(Some(m.norm_ae()))),
		metric!("norm_ape", Always, |m| Ok(Some(m.norm_ape()))),
		metric!("norm_euclid_distance", Always, |m| Ok(Some(m.norm_euclid_distance()))),
		metric!("nse", Always, |m| Ok(Some(m.nse()))),
		metric!("nse_alpha", Always, |m| Ok(Some(m.nse_alpha()))),
		metric!("nse_beta", Always, |m| Ok(Some(m.nse_beta()))),
		metric!("nse_bound", Always, |m| Ok(Some(m.nse_bound()))),
		metric!("nse_mod", Always, |m| Ok(Some(m.nse_mod(1f64)))),
		metric!("nse_rel", Always, |m| Ok(Some(m.nse_rel()))),
		metric!("pbias", Always, |m| Ok(Some(m.pbias()))),
		metric!("pearson_r", Always, |m| Ok(Some(m.pearson_r()))),
		metric!("r2", Always, |m| Ok(Some(m.r2()))),
		metric!("r2_mod", Always, |m| Ok(Some(m.r2_mod(None)?))),
		metric!("rae", Always, |m| Ok(Some(m.rae()))),
		metric!("ref_agreement_index", Always, |m| Ok(Some(m.ref_agreement_index()))),
		metric!("rel_agreement_index", Always, |m| Ok(Some(m.rel_agreement_index()))),
		metric!("relative_rmse", Always, |m| Ok(Some(m.relative_rmse()))),
		metric!("rmdspe", Always, |m| Ok(Some(m.rmdspe()))),
		metric!("rmse", Always, |m| Ok(Some(m.rmse(None)?))),
		metric!("rmsle", Always, |m| Ok(Some(m.rmsle()))),
		metric!("rmspe", Always, |m| Ok(Some(m.rmspe()))),
		metric!("rmsse", Always, |m| Ok(Some(m.rmsse(1)))),
		metric!("rrse", Always, |m| Ok(Some(m.rrse()))),
		metric!("rsr", Always, |m| Ok(Some(m.rsr()))),
		metric!("sa", Always, |m| Ok(Some(m.sa()))),
		metric!("sc", Always, |m| Ok(Some(m.sc()))),
		metric!("sga", Always, |m| Ok(Some(m.sga()))),
		metric!("sid", Always, |m| Ok(Some(m.sid()))),
		metric!("skill_score_murphy", Always, |m| Ok(Some(m.skill_score_murphy()))),
		metric!("smape", Always, |m| Ok(Some(m.smape()))),
		metric!("smdape", Always, |m| Ok(Some(m.smdape()))),
		metric!("spearmann_corr", Always, |m| Ok(Some(m.spearmann_corr()))),
		metric!("sse", Always, |m| Ok(Some(m.sse()))),
		metric!("umbrae", Always, |m| Ok(Some(m.umbrae(Benchmark::default())?))),
		metric!("ve", Always, |m| Ok(Some(m.ve()))),
		metric!("volume_error", Always, |m| Ok(Some(m.volume_error()))),
		metric!("watt_m", Always, |m| Ok(Some(m.watt_m()))),
		metric!("wape", Always, |m| Ok(Some(m.wape()))),
		metric!("wmape", Always, |m| Ok(Some(m.wmape()))),
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn names_are_unique() {
		let entries = registry();
		let names = entries.iter().map(|each| each.name).collect::<HashSet<_>>();
		assert_eq!(names.len(), entries.len());
	}

	#[test]
	fn only_brier_score_is_on_request() {
		let on_request = registry()
			.into_iter()
			.filter(|each| each.applicability == Applicability::OnRequest)
			.map(|each| each.name)
			.collect::<Vec<_>>();
		assert_eq!(on_request, vec!["brier_score"]);
	}
}
