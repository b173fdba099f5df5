// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Interp
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-dimensional table interpolation.
//!
//! Tables of partition functions and tabulated rates are interpolated
//! linearly when they hold two points and with a natural cubic spline
//! otherwise.

use crate::tridiag::thomas_solve;
use nucnet_types::error::{NucnetError, NucnetResult};

/// Straight line through (x0, y0) and (x1, y1), evaluated at `x`.
pub fn linear_two_point(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Natural cubic spline (zero second derivative at both ends).
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots.
    m: Vec<f64>,
}

impl NaturalCubicSpline {
    pub fn new(x: &[f64], y: &[f64]) -> NucnetResult<Self> {
        let n = x.len();
        if y.len() != n {
            return Err(NucnetError::DimensionMismatch {
                expected: n,
                got: y.len(),
            });
        }
        if n < 3 {
            return Err(NucnetError::LinAlg(format!(
                "cubic spline needs at least 3 points, got {n}"
            )));
        }
        check_increasing(x)?;

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let interior = n - 2;
        let mut a = vec![0.0; interior];
        let mut b = vec![0.0; interior];
        let mut c = vec![0.0; interior];
        let mut d = vec![0.0; interior];
        for k in 0..interior {
            let i = k + 1;
            a[k] = h[i - 1];
            b[k] = 2.0 * (h[i - 1] + h[i]);
            c[k] = h[i];
            d[k] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }
        let inner = thomas_solve(&a, &b, &c, &d)?;

        let mut m = Vec::with_capacity(n);
        m.push(0.0);
        m.extend(inner);
        m.push(0.0);

        Ok(NaturalCubicSpline {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Evaluate inside the knot range; outside it the end cubic is extended.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        let k = self.x.partition_point(|&xi| xi <= t).clamp(1, n - 1) - 1;
        let h = self.x[k + 1] - self.x[k];
        let left = self.x[k + 1] - t;
        let right = t - self.x[k];
        self.m[k] * left.powi(3) / (6.0 * h)
            + self.m[k + 1] * right.powi(3) / (6.0 * h)
            + (self.y[k] / h - self.m[k] * h / 6.0) * left
            + (self.y[k + 1] / h - self.m[k + 1] * h / 6.0) * right
    }
}

fn check_increasing(x: &[f64]) -> NucnetResult<()> {
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(NucnetError::LinAlg(
            "interpolation abscissae must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

/// Interpolate a table at `t` strictly inside its range: linear for two
/// points, natural cubic spline for more.
pub fn interpolate_table(x: &[f64], y: &[f64], t: f64) -> NucnetResult<f64> {
    match x.len() {
        0 | 1 => Err(NucnetError::LinAlg(format!(
            "table needs at least 2 points, got {}",
            x.len()
        ))),
        2 => {
            if y.len() != 2 {
                return Err(NucnetError::DimensionMismatch {
                    expected: 2,
                    got: y.len(),
                });
            }
            check_increasing(x)?;
            Ok(linear_two_point(x[0], y[0], x[1], y[1], t))
        }
        _ => Ok(NaturalCubicSpline::new(x, y)?.eval(t)),
    }
}

/// Interpolate a table, holding the end values outside its range.
pub fn interpolate_clamped(x: &[f64], y: &[f64], t: f64) -> NucnetResult<f64> {
    if x.is_empty() || y.len() != x.len() {
        return Err(NucnetError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let last = x.len() - 1;
    if t <= x[0] {
        Ok(y[0])
    } else if t >= x[last] {
        Ok(y[last])
    } else {
        interpolate_table(x, y, t)
    }
}
