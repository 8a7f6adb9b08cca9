//! Forecasting utilities.

/// Smoothing factor used when the caller does not supply one.
pub const DEFAULT_ALPHA: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("smoothing factor must be in (0, 1], got {0}")]
    InvalidAlpha(f64),
}

/// Simple exponential smoothing with a flat projection.
///
/// The smoothed level of the history is repeated for every future period;
/// there is no trend or seasonal component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSmoothing {
    alpha: f64,
}

impl Default for ExponentialSmoothing {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ExponentialSmoothing {
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidAlpha`] unless `0 < alpha <= 1`.
    pub fn new(alpha: f64) -> Result<Self, ForecastError> {
        if alpha.is_finite() && alpha > 0.0 && alpha <= 1.0 {
            Ok(Self { alpha })
        } else {
            Err(ForecastError::InvalidAlpha(alpha))
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Final smoothed level of `history`, or `None` when it is empty.
    pub fn level(&self, history: &[f64]) -> Option<f64> {
        let (first, rest) = history.split_first()?;
        Some(
            rest.iter()
                .fold(*first, |level, v| self.alpha * v + (1.0 - self.alpha) * level),
        )
    }

    /// Produce a flat forecast for the given horizon.
    ///
    /// # Arguments
    ///
    /// * `history` - Historical values, oldest first
    /// * `periods` - Number of periods to forecast
    ///
    /// # Returns
    ///
    /// `periods` copies of the smoothed level, or an empty vector when
    /// `history` is empty.
    pub fn forecast(&self, history: &[f64], periods: usize) -> Vec<f64> {
        match self.level(history) {
            Some(level) => vec![level; periods],
            None => Vec::new(),
        }
    }
}

/// Forecasts with an explicit smoothing factor, defaulting to
/// [`DEFAULT_ALPHA`] when `alpha` is `None`.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidAlpha`] for an out-of-range `alpha`.
pub fn forecast(
    history: &[f64],
    periods: usize,
    alpha: Option<f64>,
) -> Result<Vec<f64>, ForecastError> {
    let model = match alpha {
        Some(a) => ExponentialSmoothing::new(a)?,
        None => ExponentialSmoothing::default(),
    };
    Ok(model.forecast(history, periods))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn forecast_matches_horizon_length() {
        let out = ExponentialSmoothing::default().forecast(&[1.0, 2.0, 3.0], 7);
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn constant_series_forecasts_itself() {
        for alpha in [0.1, 0.3, 0.9, 1.0] {
            let model = ExponentialSmoothing::new(alpha).expect("alpha should be valid");
            assert_eq!(model.forecast(&[4.0, 4.0, 4.0], 3), vec![4.0; 3]);
        }
    }

    #[test]
    fn empty_inputs_give_empty_forecast() {
        let model = ExponentialSmoothing::default();
        assert!(model.forecast(&[], 5).is_empty());
        assert!(model.forecast(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn smoothing_follows_recurrence() {
        // 450 -> 0.3*480 + 0.7*450 = 459 -> 0.3*520 + 0.7*459 = 477.3
        let out = forecast(&[450.0, 480.0, 520.0], 2, None).expect("default alpha is valid");
        assert_eq!(out.len(), 2);
        assert_abs_diff_eq!(out[0], 477.3, epsilon = 1e-9);
        assert_eq!(out[0], out[1]);
    }

    #[test]
    fn alpha_one_tracks_last_value() {
        let out = forecast(&[1.0, 5.0, 9.0], 1, Some(1.0)).expect("alpha 1 is valid");
        assert_eq!(out, vec![9.0]);
    }

    #[test]
    fn rejects_out_of_range_alpha() {
        assert!(ExponentialSmoothing::new(0.0).is_err());
        assert!(ExponentialSmoothing::new(1.5).is_err());
        assert!(ExponentialSmoothing::new(f64::NAN).is_err());
    }
}
