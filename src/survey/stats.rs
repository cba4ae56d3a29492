use anyhow::Result;
use arrow::{array::Float64Array, compute::kernels::arity::binary, record_batch::RecordBatch};
use serde::Serialize;

use super::convert::{f64_column, N_ADULTS, N_CHILD, PROB_MOD_SEV, PROB_SEV, WT};

/// The six prevalence rates of one survey file. `None` means undefined
/// (zero denominator or a non-finite ratio).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Prevalence {
    #[serde(rename = "F_mod_sev_ad")]
    pub mod_sev_ad: Option<f64>,
    #[serde(rename = "F_sev_ad")]
    pub sev_ad: Option<f64>,
    #[serde(rename = "F_mod_sev_child")]
    pub mod_sev_child: Option<f64>,
    #[serde(rename = "F_sev_child")]
    pub sev_child: Option<f64>,
    #[serde(rename = "F_mod_sev_tot")]
    pub mod_sev_tot: Option<f64>,
    #[serde(rename = "F_sev_tot")]
    pub sev_tot: Option<f64>,
}

impl Prevalence {
    /// Rates in output column order.
    pub fn rates(&self) -> [Option<f64>; 6] {
        [
            self.mod_sev_ad,
            self.sev_ad,
            self.mod_sev_child,
            self.sev_child,
            self.mod_sev_tot,
            self.sev_tot,
        ]
    }

    pub fn has_undefined(&self) -> bool {
        self.rates().iter().any(Option::is_none)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RowCounts {
    /// Data rows in the sheet.
    pub read: usize,
    /// Rows that survived cleaning.
    pub used: usize,
    /// Rows removed for a missing or non-numeric required value.
    pub dropped: usize,
    /// Clean rows whose children weight is not finite (`N_adults = 0`);
    /// they count toward adult sums only.
    pub non_finite_child_weight: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FileResult {
    #[serde(flatten)]
    pub prevalence: Prevalence,
    pub pop_ad: f64,
    pub pop_child: f64,
    pub rows: RowCounts,
}

/// `wt / N_adults * N_child`, row by row. No guard on `N_adults = 0`.
pub fn children_weight(batch: &RecordBatch) -> Result<Float64Array> {
    let wt = f64_column(batch, WT)?;
    let n_adults = f64_column(batch, N_ADULTS)?;
    let n_child = f64_column(batch, N_CHILD)?;

    let per_adult: Float64Array = binary(wt, n_adults, |w, a| w / a)?;
    let child: Float64Array = binary(&per_adult, n_child, |p, c| p * c)?;
    Ok(child)
}

/// `num / den`, undefined when `den` is zero or the quotient is not finite.
pub fn ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 {
        return None;
    }
    let r = num / den;
    r.is_finite().then_some(r)
}

/// Population-weighted blend of an adult and a child rate.
///
/// A side with zero population contributes nothing even when its rate is
/// undefined; an undefined rate over a non-zero population makes the blend
/// undefined.
pub fn blend(adult: Option<f64>, pop_ad: f64, child: Option<f64>, pop_child: f64) -> Option<f64> {
    fn part(rate: Option<f64>, pop: f64) -> Option<f64> {
        match rate {
            Some(r) => Some(r * pop),
            None if pop == 0.0 => Some(0.0),
            None => None,
        }
    }
    ratio(part(adult, pop_ad)? + part(child, pop_child)?, pop_ad + pop_child)
}

/// Compute prevalence over a cleaned survey batch (no nulls in any column).
pub fn compute_file_result(clean: &RecordBatch, rows_read: usize) -> Result<FileResult> {
    let wt = f64_column(clean, WT)?;
    let mod_sev = f64_column(clean, PROB_MOD_SEV)?;
    let sev = f64_column(clean, PROB_SEV)?;
    let child_wt = children_weight(clean)?;

    let mut pop_ad = 0.0;
    let mut mod_sev_ad = 0.0;
    let mut sev_ad = 0.0;
    let mut pop_child = 0.0;
    let mut mod_sev_child = 0.0;
    let mut sev_child = 0.0;
    let mut non_finite = 0usize;

    for i in 0..clean.num_rows() {
        let (w, p_ms, p_s) = (wt.value(i), mod_sev.value(i), sev.value(i));
        pop_ad += w;
        mod_sev_ad += p_ms * w;
        sev_ad += p_s * w;

        let cw = child_wt.value(i);
        if !cw.is_finite() {
            non_finite += 1;
            continue;
        }
        pop_child += cw;
        mod_sev_child += p_ms * cw;
        sev_child += p_s * cw;
    }

    let f_mod_sev_ad = ratio(mod_sev_ad, pop_ad);
    let f_sev_ad = ratio(sev_ad, pop_ad);
    let f_mod_sev_child = ratio(mod_sev_child, pop_child);
    let f_sev_child = ratio(sev_child, pop_child);

    let prevalence = Prevalence {
        mod_sev_ad: f_mod_sev_ad,
        sev_ad: f_sev_ad,
        mod_sev_child: f_mod_sev_child,
        sev_child: f_sev_child,
        mod_sev_tot: blend(f_mod_sev_ad, pop_ad, f_mod_sev_child, pop_child),
        sev_tot: blend(f_sev_ad, pop_ad, f_sev_child, pop_child),
    };

    Ok(FileResult {
        prevalence,
        pop_ad,
        pop_child,
        rows: RowCounts {
            read: rows_read,
            used: clean.num_rows(),
            dropped: rows_read.saturating_sub(clean.num_rows()),
            non_finite_child_weight: non_finite,
        },
    })
}
