//! Default longitudinal speed estimator.
//!
//! Steady-state 1-D Kalman filter over a constant-velocity model:
//!
//!   x' = A·x + K·(z − C·A·x),  A = [[1, dt], [0, 1]],  C = [1, 0]
//!
//! where `x = [speed, accel]` and `z` is the raw wheel-speed mean. The gain `K` is
//! precomputed, so each update is a handful of multiplies.

use carstate_traits::SpeedFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedFilterCfg {
    pub dt_s: f64,
    pub gain_speed: f64,
    pub gain_accel: f64,
    /// Jumps in raw speed larger than this (m/s) reset the estimate to the measurement.
    pub reset_threshold_ms: f64,
}

/// Defaults come from the config crate so a missing `[speed_filter]` section and
/// `SpeedFilterCfg::default()` agree.
impl Default for SpeedFilterCfg {
    fn default() -> Self {
        Self::from(&carstate_config::SpeedFilterCfg::default())
    }
}

#[derive(Debug, Clone)]
pub struct KalmanSpeedFilter {
    cfg: SpeedFilterCfg,
    speed: f64,
    accel: f64,
}

impl KalmanSpeedFilter {
    pub const fn new(cfg: SpeedFilterCfg) -> Self {
        Self {
            cfg,
            speed: 0.0,
            accel: 0.0,
        }
    }

    pub const fn state(&self) -> (f64, f64) {
        (self.speed, self.accel)
    }
}

impl Default for KalmanSpeedFilter {
    fn default() -> Self {
        Self::new(SpeedFilterCfg::default())
    }
}

impl SpeedFilter for KalmanSpeedFilter {
    fn update(&mut self, raw_speed: f64) -> (f64, f64) {
        if !raw_speed.is_finite() {
            return (self.speed, self.accel);
        }
        // Starting at non-zero speed would otherwise read as a huge acceleration.
        if (raw_speed - self.speed).abs() > self.cfg.reset_threshold_ms {
            self.speed = raw_speed;
            self.accel = 0.0;
        }
        let pred_speed = self.speed + self.cfg.dt_s * self.accel;
        let pred_accel = self.accel;
        let innovation = raw_speed - pred_speed;
        self.speed = pred_speed + self.cfg.gain_speed * innovation;
        self.accel = pred_accel + self.cfg.gain_accel * innovation;
        (self.speed, self.accel)
    }

    fn reset(&mut self) {
        self.speed = 0.0;
        self.accel = 0.0;
    }
}
