//! Savitzky–Golay smoothing.
//!
//! Every sample is replaced by the value of a least-squares polynomial fitted
//! over the window centered on it. The first and last half-windows have no
//! centered window, so they take their values from the polynomial fitted to
//! the first and last full window instead.

/// Orthonormal basis of the polynomials of degree `<= order` sampled on a
/// window of `window` points, built with modified Gram–Schmidt on the
/// Vandermonde columns. Sample positions are scaled to `[-1, 1]`.
fn polynomial_basis(window: usize, order: usize) -> Vec<Vec<f64>> {
    let half = ((window - 1) / 2).max(1) as f64;
    let positions: Vec<f64> = (0..window)
        .map(|j| (j as f64 - (window - 1) as f64 / 2.0) / half)
        .collect();

    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(order + 1);
    for degree in 0..=order {
        let mut column: Vec<f64> = positions.iter().map(|t| t.powi(degree as i32)).collect();
        for q in &basis {
            let d = dot(q, &column);
            for (c, qv) in column.iter_mut().zip(q) {
                *c -= d * qv;
            }
        }
        let norm = dot(&column, &column).sqrt();
        if norm < 1e-10 {
            continue;
        }
        for c in column.iter_mut() {
            *c /= norm;
        }
        basis.push(column);
    }
    basis
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Evaluates the fit of `ys` (one full window) at the window rows `rows`.
fn fit_rows(basis: &[Vec<f64>], ys: &[f64], rows: std::ops::Range<usize>) -> Vec<f64> {
    let coefficients: Vec<f64> = basis.iter().map(|q| dot(q, ys)).collect();
    rows.map(|i| basis.iter().zip(&coefficients).map(|(q, c)| q[i] * c).sum())
        .collect()
}

/// Smooths `ys` with a Savitzky–Golay filter.
///
/// Returns `None` when the parameters can't describe a fit: an even or
/// too-short window, a window longer than the data, or a polynomial order
/// that is not smaller than the window.
pub fn savgol_filter(ys: &[f64], window: usize, order: usize) -> Option<Vec<f64>> {
    if window < 3 || window % 2 == 0 || window > ys.len() || order >= window {
        return None;
    }

    let basis = polynomial_basis(window, order);
    let half = (window - 1) / 2;

    // convolution weights of the center row of the projection
    let weights: Vec<f64> = (0..window)
        .map(|j| basis.iter().map(|q| q[half] * q[j]).sum())
        .collect();

    let n = ys.len();
    let mut out = Vec::with_capacity(n);
    out.extend(fit_rows(&basis, &ys[..window], 0..half));
    for i in half..n - half {
        out.push(dot(&weights, &ys[i - half..=i + half]));
    }
    out.extend(fit_rows(&basis, &ys[n - window..], half + 1..window));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-6, "{x} != {y}");
        }
    }

    #[test]
    fn keeps_polynomials_of_lower_degree() {
        let ys: Vec<f64> = (0..21).map(|i| {
            let x = i as f64;
            0.5 * x * x - 3.0 * x + 2.0
        }).collect();
        let smooth = savgol_filter(&ys, 7, 2).unwrap();
        assert_close(&smooth, &ys);
    }

    #[test]
    fn flattens_alternating_noise() {
        let ys: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let smooth = savgol_filter(&ys, 15, 1).unwrap();
        let max = smooth.iter().cloned().fold(f64::MIN, f64::max);
        assert!(max < 0.5);
    }

    #[test]
    fn rejects_unusable_parameters() {
        let ys = [1.0, 2.0, 3.0, 4.0];
        assert!(savgol_filter(&ys, 4, 1).is_none());
        assert!(savgol_filter(&ys, 5, 1).is_none());
        assert!(savgol_filter(&ys, 3, 3).is_none());
        assert!(savgol_filter(&ys, 3, 2).is_some());
    }
}
