//! Time/flux series pulled out of a decoded photometry table.

use super::FitsDocument;
use serde::Serialize;

/// Flux columns tried in order when none is named explicitly.
const FLUX_CANDIDATES: &[&str] = &["PDCSAP_FLUX", "SAP_FLUX", "FLUX"];

/// One sample of a light curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    /// Time stamp, usually BJD - offset
    pub time: f64,
    /// Flux
    pub flux: f64,
    /// Flux uncertainty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
}

/// Which columns to read a light curve from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightCurveColumns {
    /// Time column
    pub time: String,
    /// Flux column; `None` picks the first of `PDCSAP_FLUX`, `SAP_FLUX`, `FLUX`
    pub flux: Option<String>,
    /// Error column; `None` uses `<flux>_ERR` when present
    pub error: Option<String>,
}

impl Default for LightCurveColumns {
    fn default() -> Self {
        LightCurveColumns {
            time: "TIME".to_string(),
            flux: None,
            error: None,
        }
    }
}

/// An ordered series of complete time/flux samples.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LightCurve {
    /// Samples in row order
    pub points: Vec<DataPoint>,
}

impl LightCurve {
    /// Build a light curve from a decoded table.
    ///
    /// Rows where the time or flux cell is missing are skipped. Returns `None`
    /// when the time or flux column is not in the table.
    pub fn from_document(
        document: &FitsDocument,
        columns: &LightCurveColumns,
    ) -> Option<LightCurve> {
        let table = document.table();
        let time = table.get(&columns.time)?;
        let flux_name = match &columns.flux {
            Some(name) => name.clone(),
            None => FLUX_CANDIDATES
                .iter()
                .find(|name| table.get(name).is_some())?
                .to_string(),
        };
        let flux = table.get(&flux_name)?;
        let error = match &columns.error {
            Some(name) => table.get(name),
            None => table.get(&format!("{}_ERR", flux_name)),
        };

        let points = time
            .iter()
            .zip(flux)
            .enumerate()
            .filter_map(|(row, (t, f))| {
                Some(DataPoint {
                    time: (*t)?,
                    flux: (*f)?,
                    error: error.and_then(|e| e.get(row).copied().flatten()),
                })
            })
            .collect();
        Some(LightCurve { points })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no samples
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Median flux, `None` for an empty curve.
    pub fn median_flux(&self) -> Option<f64> {
        let mut flux: Vec<f64> = self.points.iter().map(|p| p.flux).collect();
        if flux.is_empty() {
            return None;
        }
        flux.sort_by(f64::total_cmp);
        let mid = flux.len() / 2;
        Some(if flux.len() % 2 == 0 {
            (flux[mid - 1] + flux[mid]) / 2.0
        } else {
            flux[mid]
        })
    }

    /// Flux and error divided by the median flux.
    ///
    /// A curve whose median is zero is returned unchanged.
    pub fn normalized(&self) -> LightCurve {
        match self.median_flux() {
            Some(median) if median != 0.0 => LightCurve {
                points: self
                    .points
                    .iter()
                    .map(|p| DataPoint {
                        time: p.time,
                        flux: p.flux / median,
                        error: p.error.map(|e| e / median.abs()),
                    })
                    .collect(),
            },
            _ => self.clone(),
        }
    }

    /// Keep every `ceil(len / target)`-th point, starting with the first.
    pub fn downsample(&self, target: usize) -> LightCurve {
        if target == 0 || self.points.len() <= target {
            return self.clone();
        }
        let step = (self.points.len() + target - 1) / target;
        LightCurve {
            points: self.points.iter().step_by(step).copied().collect(),
        }
    }
}
