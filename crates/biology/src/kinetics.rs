/**
 * Purpose: Closed-form interval integrators shared by `_step_vessel`
 * (spec §4.5). Every function here integrates its quantity analytically
 * over `[t0, t1)` rather than sampling an endpoint, per the spec's
 * "never use endpoint samples of lag or saturation" rule.
 */
use bvm_deterministic::DeterministicMath;

/// Exact mean, over `[t0, t1)`, of a linear ramp that is `0` before
/// `ramp_start`, rises linearly to `1` over `ramp_duration`, and is `1`
/// thereafter. Used for the lag-phase growth ramp.
///
/// Degenerates to [`DeterministicMath::interval_gate_fraction`] when
/// `ramp_duration <= 0` (an instantaneous step at `ramp_start`).
pub fn interval_mean_linear_ramp(t0: f64, t1: f64, ramp_start: f64, ramp_duration: f64) -> f64 {
    let dt = t1 - t0;
    if dt <= 0.0 {
        return 0.0;
    }
    if ramp_duration <= 0.0 {
        return DeterministicMath::interval_gate_fraction(t0, t1, ramp_start);
    }
    let ramp_end = ramp_start + ramp_duration;

    let ramp_lo = ramp_start.clamp(t0, t1);
    let ramp_hi = ramp_end.clamp(t0, t1);
    let integral_ramp = if ramp_hi > ramp_lo {
        let antideriv = |t: f64| (t - ramp_start).powi(2) / (2.0 * ramp_duration);
        antideriv(ramp_hi) - antideriv(ramp_lo)
    } else {
        0.0
    };

    let post_lo = ramp_end.clamp(t0, t1);
    let integral_post = (t1 - post_lo).max(0.0);

    (integral_ramp + integral_post) / dt
}

/// Closed-form logistic growth over `[0, dt]` given a constant
/// interval-mean rate `r_bar` and carrying capacity `capacity`:
/// `N(dt) = K / (1 + ((K - N0) / N0) * exp(-r_bar * dt))`.
///
/// This integrates the full logistic ODE rather than sampling the
/// saturation term `(1 - N/K)` at an endpoint.
pub fn logistic_growth(n0: f64, r_bar: f64, capacity: f64, dt: f64) -> f64 {
    if capacity <= 0.0 || n0 <= 0.0 || dt <= 0.0 {
        return n0.max(0.0);
    }
    if r_bar == 0.0 {
        return n0;
    }
    let ratio = (capacity - n0) / n0;
    let denom = 1.0 + ratio * DeterministicMath::safe_exp(-r_bar * dt);
    (capacity / denom).max(0.0)
}

/// Closed-form solution of the linear stress-kinetics ODE
/// `dS/dt = k_up * p - k_down * S` over `[0, dt]`, for a driving signal
/// `p` held constant across the interval (spec §4.5 step 4).
pub fn integrate_stress_latent(s0: f64, p: f64, k_up: f64, k_down: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return s0;
    }
    if k_down <= 0.0 {
        return s0 + k_up * p * dt;
    }
    let target = k_up * p / k_down;
    let decay = DeterministicMath::safe_exp(-k_down * dt);
    target + (s0 - target) * decay
}

/// Closed-form solution of the lagged contact-pressure ODE
/// `dCP/dt = (logistic(confluence) - CP) / tau` over `[0, dt]`, given a
/// representative target confluence for the interval.
pub fn integrate_contact_pressure(cp0: f64, target: f64, tau_h: f64, dt: f64) -> f64 {
    if dt <= 0.0 || tau_h <= 0.0 {
        return target;
    }
    let decay = DeterministicMath::safe_exp(-dt / tau_h);
    target + (cp0 - target) * decay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_mean_is_zero_entirely_before_start() {
        let mean = interval_mean_linear_ramp(0.0, 2.0, 10.0, 4.0);
        assert_eq!(mean, 0.0);
    }

    #[test]
    fn ramp_mean_is_one_entirely_after_end() {
        let mean = interval_mean_linear_ramp(20.0, 22.0, 10.0, 4.0);
        assert_eq!(mean, 1.0);
    }

    #[test]
    fn ramp_mean_spanning_whole_ramp_is_one_half() {
        // Ramp from [10, 14): the step [8, 16) fully contains it, with
        // 2h before and 2h after contributing 0 and 1 respectively, and
        // the ramp itself averaging 0.5 over its own span.
        let mean = interval_mean_linear_ramp(8.0, 16.0, 10.0, 4.0);
        // integral = 0 (pre) + 0.5*4 (ramp) + 1*2 (post) = 4, /8 = 0.5
        assert!((mean - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ramp_degenerates_to_gate_fraction_for_zero_duration() {
        let ramp = interval_mean_linear_ramp(10.0, 12.0, 11.0, 0.0);
        let gate = DeterministicMath::interval_gate_fraction(10.0, 12.0, 11.0);
        assert_eq!(ramp, gate);
    }

    #[test]
    fn logistic_growth_approaches_capacity() {
        let n = logistic_growth(100.0, 0.05, 1000.0, 1000.0);
        assert!((n - 1000.0).abs() < 1.0);
    }

    #[test]
    fn logistic_growth_is_identity_at_zero_rate() {
        assert_eq!(logistic_growth(100.0, 0.0, 1000.0, 48.0), 100.0);
    }

    #[test]
    fn stress_latent_converges_to_target() {
        let s = integrate_stress_latent(0.0, 1.0, 0.1, 0.1, 1000.0);
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn contact_pressure_converges_to_target() {
        let cp = integrate_contact_pressure(0.0, 0.8, 12.0, 1000.0);
        assert!((cp - 0.8).abs() < 1e-6);
    }
}
