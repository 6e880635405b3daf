//! Sliding-window log-phase detector.
//!
//! ## Purpose
//!
//! Locates the exponential ("log") growth window of a microbial growth
//! curve: the region where `ln(OD)` grows linearly in time. A fixed-width
//! window slides over the log-transformed series, each window gets a simple
//! linear regression, and the longest contiguous run of windows passing the
//! statistical and biological acceptance criteria becomes the selection.
//!
//! ## Key concepts
//!
//! * **mu**: the OLS slope of `ln(y)` on `x` inside a window — the
//!   specific growth rate.
//! * **Relative rate filter**: windows are compared against the steepest
//!   surviving window (`mu_rel = mu / mu_max`), so the acceptance range is
//!   scale-free across organisms and media.
//! * **Plateau guard**: a candidate run containing too many near-flat
//!   points (stationary-phase contamination) is rejected.
//!
//! ## Invariants
//!
//! * Options are clamped into their documented ranges, never rejected —
//!   they originate from free-text UI fields.
//! * "No detection" is a normal outcome (`start_time`/`end_time` = `None`),
//!   distinct from any error.
//! * Detection is deterministic; ties between runs resolve to the earliest
//!   start time, then to the run covering more points.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::regression::OlsLine;
use crate::primitives::point::Point;
use crate::primitives::sorting::sort_points;

// ============================================================================
// Options
// ============================================================================

/// Acceptance criteria for log-phase detection.
///
/// All fields are clamped into their documented ranges by [`LogPhaseOptions::clamped`]
/// before use; non-finite values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogPhaseOptions<T> {
    /// Number of consecutive points per regression window (>= 2).
    pub window_size: usize,

    /// Minimum r² for a window to survive, clamped to [0.1, 0.9999].
    pub r2_min: T,

    /// Minimum measurement value considered (pre-log filter), >= 0.
    pub od_min: T,

    /// Maximum tolerated fraction of near-flat points in a candidate run,
    /// clamped to [0.05, 0.95].
    pub frac_k_max: T,

    /// Lower bound on `mu / mu_max`, at least 0.1.
    pub mu_rel_min: T,

    /// Upper bound on `mu / mu_max`, at least `mu_rel_min + 1e-3`.
    pub mu_rel_max: T,
}

impl<T: Float> Default for LogPhaseOptions<T> {
    fn default() -> Self {
        Self {
            window_size: 5,
            r2_min: T::from(0.97).unwrap(),
            od_min: T::from(0.01).unwrap(),
            frac_k_max: T::from(0.2).unwrap(),
            mu_rel_min: T::from(0.5).unwrap(),
            mu_rel_max: T::one(),
        }
    }
}

impl<T: Float> LogPhaseOptions<T> {
    /// Clamp every field into its documented range.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();

        let r2_min = clamp_or(self.r2_min, 0.1, 0.9999, defaults.r2_min);
        let od_min = if self.od_min.is_finite() && self.od_min >= T::zero() {
            self.od_min
        } else {
            defaults.od_min
        };
        let frac_k_max = clamp_or(self.frac_k_max, 0.05, 0.95, defaults.frac_k_max);
        let mu_rel_min = if self.mu_rel_min.is_finite() {
            self.mu_rel_min.max(T::from(0.1).unwrap())
        } else {
            defaults.mu_rel_min
        };
        let floor = mu_rel_min + T::from(1e-3).unwrap();
        let mu_rel_max = if self.mu_rel_max.is_finite() {
            self.mu_rel_max.max(floor)
        } else {
            defaults.mu_rel_max.max(floor)
        };

        Self {
            window_size: self.window_size.max(2),
            r2_min,
            od_min,
            frac_k_max,
            mu_rel_min,
            mu_rel_max,
        }
    }
}

/// Clamp `v` into `[lo, hi]`, substituting `default` for non-finite input.
fn clamp_or<T: Float>(v: T, lo: f64, hi: f64, default: T) -> T {
    if !v.is_finite() {
        return default;
    }
    v.max(T::from(lo).unwrap()).min(T::from(hi).unwrap())
}

// ============================================================================
// Detection Result
// ============================================================================

/// Outcome of a detection run.
///
/// An empty `indices` with `None` bounds is the normal "no log phase found"
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPhaseDetection<T> {
    /// Source-point indices covered by the selected run (caller's order).
    pub indices: Vec<usize>,

    /// Time bound of the selected run's first point.
    pub start_time: Option<T>,

    /// Time bound of the selected run's last point.
    pub end_time: Option<T>,

    /// Growth rate: OLS slope of `ln(y)` on `x` over the selected run.
    pub mu: Option<T>,

    /// r² of that fit.
    pub r2: Option<T>,

    /// Steepest surviving window slope.
    pub mu_max: Option<T>,

    /// `mu / mu_max` for the selected run.
    pub mu_rel: Option<T>,

    /// Number of sliding windows evaluated.
    pub windows_evaluated: usize,
}

impl<T: Float> LogPhaseDetection<T> {
    fn none(windows_evaluated: usize) -> Self {
        Self {
            indices: Vec::new(),
            start_time: None,
            end_time: None,
            mu: None,
            r2: None,
            mu_max: None,
            mu_rel: None,
            windows_evaluated,
        }
    }

    /// True when a log phase was found.
    pub fn found(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }
}

// ============================================================================
// Detector
// ============================================================================

/// Detect the exponential growth window of a (possibly noisy) series.
pub fn detect<T: Float>(points: &[Point<T>], options: &LogPhaseOptions<T>) -> LogPhaseDetection<T> {
    let opts = options.clamped();
    let w = opts.window_size;

    // Time-order the series and keep only points usable under the log
    // transform: finite, strictly positive, and above the OD floor.
    let sorted = sort_points(points);
    let mut t: Vec<T> = Vec::new();
    let mut ln_y: Vec<T> = Vec::new();
    let mut source_idx: Vec<usize> = Vec::new();

    for (pos, (&xi, &yi)) in sorted.x.iter().zip(sorted.y.iter()).enumerate() {
        if xi.is_finite() && yi.is_finite() && yi > T::zero() && yi >= opts.od_min {
            t.push(xi);
            ln_y.push(yi.ln());
            source_idx.push(sorted.indices[pos]);
        }
    }

    let m = t.len();
    if m < w {
        return LogPhaseDetection::none(0);
    }

    // Per-window OLS of ln(y) on t.
    let window_count = m - w + 1;
    let mut fits: Vec<OlsLine<T>> = Vec::with_capacity(window_count);
    for start in 0..window_count {
        fits.push(OlsLine::fit(&t[start..start + w], &ln_y[start..start + w]));
    }

    // Statistical filter: r².
    let passes_r2: Vec<bool> = fits.iter().map(|f| f.r2 >= opts.r2_min).collect();
    let mu_max = fits
        .iter()
        .zip(passes_r2.iter())
        .filter(|&(_, &ok)| ok)
        .map(|(f, _)| f.slope)
        .fold(None, |acc: Option<T>, s| {
            Some(acc.map_or(s, |m: T| m.max(s)))
        });

    let mu_max = match mu_max {
        // No growth signal at all: every window was either noisy or flat.
        Some(m) if m > T::zero() => m,
        _ => return LogPhaseDetection::none(window_count),
    };

    // Biological filter: relative growth rate.
    let surviving: Vec<bool> = fits
        .iter()
        .zip(passes_r2.iter())
        .map(|(f, &ok)| {
            if !ok {
                return false;
            }
            let mu_rel = f.slope / mu_max;
            mu_rel >= opts.mu_rel_min && mu_rel <= opts.mu_rel_max
        })
        .collect();

    // Group surviving windows into contiguous runs and apply the plateau
    // guard to each candidate region.
    let plateau_cutoff = opts.mu_rel_min * mu_max;
    let mut best: Option<Run<T>> = None;
    let mut start = 0;
    while start < window_count {
        if !surviving[start] {
            start += 1;
            continue;
        }
        let mut end = start;
        while end + 1 < window_count && surviving[end + 1] {
            end += 1;
        }

        // Region of filtered points covered by windows [start, end].
        let first = start;
        let last = end + w - 1;

        if plateau_fraction(&t, &ln_y, first, last, plateau_cutoff) <= opts.frac_k_max {
            let candidate = Run {
                first,
                last,
                extent: t[last] - t[first],
            };
            best = Some(match best {
                None => candidate,
                Some(current) => pick_run(current, candidate, &t),
            });
        }

        start = end + 1;
    }

    let Some(run) = best else {
        return LogPhaseDetection::none(window_count);
    };

    // Report the overall fit across the selected region.
    let fit = OlsLine::fit(&t[run.first..=run.last], &ln_y[run.first..=run.last]);

    LogPhaseDetection {
        indices: source_idx[run.first..=run.last].to_vec(),
        start_time: Some(t[run.first]),
        end_time: Some(t[run.last]),
        mu: Some(fit.slope),
        r2: Some(fit.r2),
        mu_max: Some(mu_max),
        mu_rel: Some(fit.slope / mu_max),
        windows_evaluated: window_count,
    }
}

/// A contiguous candidate region, as filtered-point index bounds.
#[derive(Clone, Copy)]
struct Run<T> {
    first: usize,
    last: usize,
    extent: T,
}

/// Longest time extent wins; ties prefer the earliest start, then the run
/// covering more points.
fn pick_run<T: Float>(a: Run<T>, b: Run<T>, t: &[T]) -> Run<T> {
    if b.extent > a.extent {
        return b;
    }
    if b.extent < a.extent {
        return a;
    }
    if t[b.first] < t[a.first] {
        return b;
    }
    if t[b.first] > t[a.first] {
        return a;
    }
    if b.last - b.first > a.last - a.first { b } else { a }
}

/// Fraction of points in `[first, last]` whose local log-slope magnitude is
/// below `cutoff` (central differences, one-sided at the region edges).
fn plateau_fraction<T: Float>(t: &[T], ln_y: &[T], first: usize, last: usize, cutoff: T) -> T {
    let count = last - first + 1;
    if count < 2 {
        return T::zero();
    }

    let mut flat = 0usize;
    for i in first..=last {
        let (lo, hi) = if i == first {
            (i, i + 1)
        } else if i == last {
            (i - 1, i)
        } else {
            (i - 1, i + 1)
        };

        let dt = t[hi] - t[lo];
        let slope = if dt > T::zero() {
            (ln_y[hi] - ln_y[lo]) / dt
        } else {
            T::zero()
        };

        if slope.abs() < cutoff {
            flat += 1;
        }
    }

    T::from(flat).unwrap() / T::from(count).unwrap()
}
