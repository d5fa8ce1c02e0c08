use ncollide2d::na::RealField;
use std::f64::consts::PI;

/// Returns the index of the last element of a sorted slice which is less than or equal to the
/// test value, clamped to the valid range of the slice.
pub fn preceding_index_search<N: RealField + Copy>(slice: &[N], test_value: N) -> usize {
    if slice.len() <= 1 || slice[1] > test_value {
        return 0;
    }

    let mut a = 1;
    let mut b = slice.len() - 1;
    if slice[b] <= test_value {
        return b;
    }

    while b > a + 1 {
        let check = (a + b) / 2;
        if test_value >= slice[check] {
            a = check;
        } else {
            b = check;
        }
    }
    a
}

/// `count` evenly spaced values from `start` to `stop`, both included
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// `count` values from 0 to 1 clustered towards both ends, x = (1 - cos(beta)) / 2 for evenly
/// spaced beta in [0, pi]
pub fn half_cosine_spacing(count: usize) -> Vec<f64> {
    let mut values: Vec<f64> = linspace(0.0, PI, count)
        .into_iter()
        .map(|b| 0.5 * (1.0 - b.cos()))
        .collect();

    // Pin the end points so that they are not left a rounding error away from 0 and 1
    if let Some(last) = values.last_mut() {
        *last = 1.0;
    }
    if let Some(first) = values.first_mut() {
        *first = 0.0;
    }
    values
}

/// Linear interpolation of y at x along a polyline whose x values are sorted ascending. Values
/// outside the range are clamped to the end points.
pub fn interpolate_linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    let last = xs.len() - 1;
    if x >= xs[last] {
        return ys[last];
    }

    let i = preceding_index_search(xs, x);
    let span = xs[i + 1] - xs[i];
    if span <= 0.0 {
        return ys[i];
    }
    let f = (x - xs[i]) / span;
    ys[i] * (1.0 - f) + ys[i + 1] * f
}

/// A natural cubic spline through a set of knots with strictly increasing x values
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    y2: Vec<f64>,
}

impl CubicSpline {
    /// Builds the spline by solving the tridiagonal system for the second derivatives, with
    /// zero curvature at both ends.
    pub fn natural(xs: &[f64], ys: &[f64]) -> CubicSpline {
        let n = xs.len().min(ys.len());
        let mut y2 = vec![0.0; n];
        let mut u = vec![0.0; n];

        for i in 1..n.saturating_sub(1) {
            let wx = xs[i + 1] - xs[i - 1];
            let sig = (xs[i] - xs[i - 1]) / wx;
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;

            let ddydx = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * ddydx / wx - sig * u[i - 1]) / p;
        }

        if n > 0 {
            y2[n - 1] = 0.0;
            for i in (0..n - 1).rev() {
                y2[i] = y2[i] * y2[i + 1] + u[i];
            }
        }

        CubicSpline {
            xs: xs[..n].to_vec(),
            ys: ys[..n].to_vec(),
            y2,
        }
    }

    pub fn at(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if n == 0 {
            return 0.0;
        }
        if n == 1 {
            return self.ys[0];
        }

        let lo = preceding_index_search(&self.xs, x).min(n - 2);
        let hi = lo + 1;
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2[lo] + (b * b * b - b) * self.y2[hi]) * (h * h) / 6.0
    }
}

/// Finds the location of the maximum of a unimodal function on [a, b] by golden-section search
pub fn golden_section_max<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, tol: f64) -> f64 {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut a = a;
    let mut b = b;
    let mut c = b - (b - a) * inv_phi;
    let mut d = a + (b - a) * inv_phi;
    let mut fc = f(c);
    let mut fd = f(d);

    while (b - a).abs() > tol {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - (b - a) * inv_phi;
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + (b - a) * inv_phi;
            fd = f(d);
        }
    }

    (a + b) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::prelude::*;
    use test_case::test_case;

    fn naive(slice: &[f64], test_value: f64) -> usize {
        if slice.len() <= 1 || slice[1] > test_value {
            return 0;
        }

        if slice[slice.len() - 1] <= test_value {
            return slice.len() - 1;
        }

        for (i, v) in slice.iter().skip(1).enumerate() {
            if *v > test_value {
                return i;
            }
        }

        slice.len() - 1
    }

    #[test_case(0, -1.0)]
    #[test_case(0, 0.05)]
    #[test_case(1, 0.1)]
    #[test_case(2, 0.25)]
    #[test_case(4, 0.5)]
    fn test_simple_binary_search(e: usize, v: f64) {
        let test = [0.0, 0.1, 0.2, 0.3, 0.4];
        assert_eq!(e, preceding_index_search(&test, v));
    }

    #[test]
    fn test_binary_search_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let count: usize = rng.gen_range(2..200);
            let mut values: Vec<f64> = (0..count).map(|_| rng.gen_range(-10.0..10.0)).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());

            for _ in 0..100 {
                let test = rng.gen_range(-11.0..11.0);
                assert_eq!(naive(&values, test), preceding_index_search(&values, test));
            }
        }
    }

    #[test]
    fn linspace_includes_both_ends() {
        let values = linspace(0.0, 3000.0, 20);
        assert_eq!(20, values.len());
        assert_eq!(0.0, values[0]);
        assert_eq!(3000.0, values[19]);
        assert_relative_eq!(3000.0 / 19.0, values[1], epsilon = 1e-12);
    }

    #[test]
    fn half_cosine_is_symmetric_and_clustered() {
        let values = half_cosine_spacing(11);
        assert_eq!(0.0, values[0]);
        assert_eq!(1.0, values[10]);
        assert_relative_eq!(0.5, values[5], epsilon = 1e-12);
        for i in 0..11 {
            assert_relative_eq!(values[i], 1.0 - values[10 - i], epsilon = 1e-12);
        }
        assert!(values[1] - values[0] < values[6] - values[5]);
    }

    #[test_case(0.0, 0.0)]
    #[test_case(0.5, 5.0)]
    #[test_case(1.5, 15.0)]
    #[test_case(-1.0, 0.0)]
    #[test_case(9.0, 20.0)]
    fn linear_interpolation(x: f64, e: f64) {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 10.0, 20.0];
        assert_relative_eq!(e, interpolate_linear(&xs, &ys, x), epsilon = 1e-12);
    }

    #[test]
    fn spline_passes_through_knots() {
        let xs = [0.05, 0.1, 0.15, 0.2, 0.25];
        let ys = [0.0580, 0.1260, 0.2025, 0.2900, 0.3910];
        let spline = CubicSpline::natural(&xs, &ys);
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(*y, spline.at(*x), epsilon = 1e-12);
        }
    }

    #[test]
    fn spline_reproduces_a_line() {
        let xs = [0.0, 1.0, 2.5, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let spline = CubicSpline::natural(&xs, &ys);
        assert_relative_eq!(4.0, spline.at(1.5), epsilon = 1e-12);
        assert_relative_eq!(7.4, spline.at(3.2), epsilon = 1e-12);
    }

    #[test]
    fn golden_section_finds_parabola_peak() {
        let x = golden_section_max(|x| -(x - 0.3) * (x - 0.3), 0.0, 1.0, 1e-10);
        assert_relative_eq!(0.3, x, epsilon = 1e-8);
    }
}
