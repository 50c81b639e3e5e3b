//! Embedded adaptive Runge–Kutta integration.
//!
//! Scalar Cash–Karp 4(5): a fifth-order solution with an embedded
//! fourth-order estimate whose difference drives the step-size
//! controller. The thermal solver caps the step so the output trace
//! resolves the chassis thermal time constant.

/// Accepted integration points, `t` in the caller's time unit.
#[derive(Debug, Clone)]
pub struct OdeSolution {
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}

// Cash–Karp tableau.
const B21: f64 = 1.0 / 5.0;
const B31: f64 = 3.0 / 40.0;
const B32: f64 = 9.0 / 40.0;
const B41: f64 = 3.0 / 10.0;
const B42: f64 = -9.0 / 10.0;
const B43: f64 = 6.0 / 5.0;
const B51: f64 = -11.0 / 54.0;
const B52: f64 = 5.0 / 2.0;
const B53: f64 = -70.0 / 27.0;
const B54: f64 = 35.0 / 27.0;
const B61: f64 = 1631.0 / 55296.0;
const B62: f64 = 175.0 / 512.0;
const B63: f64 = 575.0 / 13824.0;
const B64: f64 = 44275.0 / 110592.0;
const B65: f64 = 253.0 / 4096.0;

// Fifth-order weights.
const C1: f64 = 37.0 / 378.0;
const C3: f64 = 250.0 / 621.0;
const C4: f64 = 125.0 / 594.0;
const C6: f64 = 512.0 / 1771.0;

// Embedded fourth-order weights.
const D1: f64 = 2825.0 / 27648.0;
const D3: f64 = 18575.0 / 48384.0;
const D4: f64 = 13525.0 / 55296.0;
const D5: f64 = 277.0 / 14336.0;
const D6: f64 = 1.0 / 4.0;

const SAFETY: f64 = 0.9;
const MIN_SHRINK: f64 = 0.2;
const MAX_GROW: f64 = 5.0;

/// Integrate `dy/dt = f(t, y)` from `t0` to `t_end`.
///
/// `h_max` bounds the step so the solution is sampled at least that
/// often; `h_min` stops the controller from stalling on a stiff spot.
/// Returns every accepted point including both endpoints.
pub fn integrate_adaptive<F>(
    f: F,
    t0: f64,
    t_end: f64,
    y0: f64,
    h_max: f64,
    rel_tol: f64,
    abs_tol: f64,
) -> OdeSolution
where
    F: Fn(f64, f64) -> f64,
{
    let h_min = (h_max * 1e-6).max(1e-9);
    let mut t = t0;
    let mut y = y0;
    let mut h = h_max.min(t_end - t0);

    let mut sol = OdeSolution {
        t: vec![t0],
        y: vec![y0],
    };

    while t < t_end {
        h = h.min(t_end - t);

        let k1 = f(t, y);
        let k2 = f(t + B21 * h, y + h * B21 * k1);
        let k3 = f(t + 0.3 * h, y + h * (B31 * k1 + B32 * k2));
        let k4 = f(t + 0.6 * h, y + h * (B41 * k1 + B42 * k2 + B43 * k3));
        let k5 = f(t + h, y + h * (B51 * k1 + B52 * k2 + B53 * k3 + B54 * k4));
        let k6 = f(
            t + 0.875 * h,
            y + h * (B61 * k1 + B62 * k2 + B63 * k3 + B64 * k4 + B65 * k5),
        );

        let y5 = y + h * (C1 * k1 + C3 * k3 + C4 * k4 + C6 * k6);
        let y4 = y + h * (D1 * k1 + D3 * k3 + D4 * k4 + D5 * k5 + D6 * k6);

        let err = (y5 - y4).abs();
        let scale = abs_tol + rel_tol * y.abs().max(y5.abs());

        if err <= scale || h <= h_min {
            t += h;
            y = y5;
            sol.t.push(t);
            sol.y.push(y);
        }

        // Standard fifth-order step controller, clamped so a single
        // noisy error estimate cannot collapse or explode the step.
        let factor = if err > 0.0 {
            (SAFETY * (scale / err).powf(0.2)).clamp(MIN_SHRINK, MAX_GROW)
        } else {
            MAX_GROW
        };
        h = (h * factor).clamp(h_min, h_max);
    }

    sol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_decay_matches_analytic() {
        // dy/dt = -y, y(0) = 1 → y(t) = e^-t.
        let sol = integrate_adaptive(|_, y| -y, 0.0, 5.0, 1.0, 0.1, 1e-8, 1e-10);
        let last = *sol.y.last().unwrap();
        assert!((last - (-5.0f64).exp()).abs() < 1e-5, "got {last}");
    }

    #[test]
    fn first_order_relaxation_reaches_steady_state() {
        // dy/dt = (10 - y) / 2 relaxes to 10.
        let sol = integrate_adaptive(|_, y| (10.0 - y) / 2.0, 0.0, 40.0, 0.0, 1.0, 1e-7, 1e-9);
        let last = *sol.y.last().unwrap();
        assert!((last - 10.0).abs() < 1e-4, "got {last}");
    }

    #[test]
    fn step_cap_gives_minimum_sampling_density() {
        let sol = integrate_adaptive(|_, _| 0.0, 0.0, 600.0, 1.0, 60.0, 1e-6, 1e-9);
        // 600 units at h_max 60 needs at least 10 interior steps.
        assert!(sol.t.len() >= 11, "only {} points", sol.t.len());
        for pair in sol.t.windows(2) {
            assert!(pair[1] - pair[0] <= 60.0 + 1e-9);
        }
    }

    #[test]
    fn endpoints_are_included() {
        let sol = integrate_adaptive(|_, y| -0.1 * y, 0.0, 100.0, 3.0, 10.0, 1e-6, 1e-9);
        assert_eq!(sol.t[0], 0.0);
        assert!((sol.t.last().unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(sol.t.len(), sol.y.len());
    }
}
