//! Core units, calendar constants, and shared primitives for the Kartographer workspace.

pub mod stepper;

pub use stepper::{Direction, Granularity, StepMagnitude, TimeStepper, apply_step};

/// Calendar constants expressed in seconds of simulation time.
///
/// The host runs on the Kerbin calendar: six-hour days and 426-day years.
pub mod constants {
    /// Seconds per minute.
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 60.0 * SECONDS_PER_MINUTE;
    /// Seconds per Kerbin day (6 h).
    pub const SECONDS_PER_DAY: f64 = 6.0 * SECONDS_PER_HOUR;
    /// Seconds per Kerbin year (426 d).
    pub const SECONDS_PER_YEAR: f64 = 426.0 * SECONDS_PER_DAY;
}

/// Basic unit conversion helpers.
pub mod units {
    use std::f64::consts::TAU;

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }

    /// Wrap an angle in radians into `[0, 2π)`.
    #[inline]
    pub fn normalize_angle(angle: f64) -> f64 {
        let wrapped = angle.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs.
        if wrapped >= TAU { 0.0 } else { wrapped }
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector; units depend on context.
    pub type Vector3 = [f64; 3];

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Right-handed cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Unit vector from spherical angles: polar angle `theta` from +z and azimuth `phi` from +x.
    #[inline]
    pub fn from_spherical(theta: f64, phi: f64) -> Vector3 {
        [theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()]
    }
}

/// Identity of a vessel as known to the host.
pub mod ids {
    use std::fmt;

    use serde::{Deserialize, Serialize};

    /// Host-assigned vessel identifier. Comparing ids is how controllers notice a vessel switch.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct VesselId(pub String);

    impl VesselId {
        pub fn new(name: impl Into<String>) -> Self {
            Self(name.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for VesselId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }
}

/// Human-readable formatting of durations, UT stamps and magnitudes.
pub mod time {
    use super::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, SECONDS_PER_YEAR};

    /// Format a signed duration as `"[-]Y y,D d,H h,M m,S.SS s"`, omitting leading zero fields.
    pub fn format_duration(seconds: f64) -> String {
        let mut out = String::new();
        let mut value = seconds;
        if value < 0.0 {
            out.push('-');
            value = value.abs();
        }
        for (unit, suffix) in [
            (SECONDS_PER_YEAR, "y"),
            (SECONDS_PER_DAY, "d"),
            (SECONDS_PER_HOUR, "h"),
            (SECONDS_PER_MINUTE, "m"),
        ] {
            if value >= unit {
                let whole = (value / unit).floor();
                value -= whole * unit;
                out.push_str(&format!("{whole:.0} {suffix},"));
            }
        }
        out.push_str(&format!("{} s", group_thousands(value)));
        out
    }

    /// Format an absolute UT as a calendar stamp; the calendar starts at year 1, day 1.
    pub fn format_ut(ut: f64) -> String {
        format_duration(ut + SECONDS_PER_YEAR + SECONDS_PER_DAY)
    }

    /// Format a magnitude with a `k`/`M` suffix, switching to scientific notation at the extremes.
    pub fn format_number(value: f64) -> String {
        if value > 1e12 || (value > 0.0 && value < 1e-2) {
            return format!("{value:.6e} ");
        }
        let (scaled, unit) = if value > 1e7 {
            (value / 1e6, " M")
        } else if value > 1e4 {
            (value / 1e3, " k")
        } else {
            (value, " ")
        };
        format!("{}{unit}", group_thousands(scaled))
    }

    /// Two-decimal rendering with `,` thousands separators.
    fn group_thousands(value: f64) -> String {
        let fixed = format!("{:.2}", value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{sign}{grouped}.{frac_part}")
    }
}
