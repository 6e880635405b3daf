//! Nearest-neighbor window primitives for local regression.
//!
//! A neighborhood is an inclusive index range `[lo, hi]` over an x-sorted
//! sequence. It is seeded once per smoothing pass and slid point by point so
//! that every target keeps its `k` nearest neighbors in `x`. Ties in
//! distance resolve toward lower indices, which together with the stable
//! input sort makes neighbor selection deterministic.

// External dependencies
use num_traits::Float;

/// Inclusive neighborhood bounds `[lo, hi]` for one local fit.
#[derive(Copy, Clone, Debug)]
pub struct Neighborhood {
    /// Left boundary index (inclusive).
    pub lo: usize,

    /// Right boundary index (inclusive).
    pub hi: usize,
}

impl Neighborhood {
    /// Seed a window of `k` points around the first target in a sequence of `n`.
    #[inline]
    pub fn seed(k: usize, n: usize) -> Self {
        debug_assert!(k >= 1, "Neighborhood::seed: k must be at least 1");

        if k >= n {
            return Self {
                lo: 0,
                hi: n.saturating_sub(1),
            };
        }
        Self { lo: 0, hi: k - 1 }
    }

    /// Slide the window so it holds the `k` nearest neighbors of `x[target]`.
    ///
    /// A neighbor just outside the window replaces the farthest point inside
    /// it whenever it is strictly closer; on equal distance the lower index
    /// wins, so the result does not depend on slide direction.
    #[inline]
    pub fn recenter<T: Float>(&mut self, x: &[T], target: usize) {
        let n = x.len();
        debug_assert!(target < n, "recenter: target index out of bounds");

        self.lo = self.lo.min(n - 1);
        self.hi = self.hi.min(n - 1);

        let xt = x[target];

        // Slide right while the point past the window is closer than the
        // leftmost point inside it.
        while self.hi < n - 1 {
            let d_lo = xt - x[self.lo];
            let d_next = x[self.hi + 1] - xt;
            if d_lo <= d_next {
                break;
            }
            self.lo += 1;
            self.hi += 1;
        }

        // Slide left while the point before the window is at least as close
        // as the rightmost point inside it (ties move toward lower indices,
        // mirroring the right slide's preference).
        while self.lo > 0 {
            let d_prev = xt - x[self.lo - 1];
            let d_hi = x[self.hi] - xt;
            if d_hi < d_prev {
                break;
            }
            self.lo -= 1;
            self.hi -= 1;
        }
    }

    /// Maximum distance from `xt` to any point in the window.
    #[inline]
    pub fn max_distance<T: Float>(&self, x: &[T], xt: T) -> T {
        T::max(xt - x[self.lo], x[self.hi] - xt)
    }

    /// Number of points in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.hi - self.lo + 1
    }

    /// True when the window holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve the effective window size `k` from the span parameter.
///
/// A span in `(0, 1]` is a fraction of the data (`k = ceil(span * n)`); a
/// span above 1 is an absolute point count (`k = round(span)`). Either way
/// the result is clamped to `[degree + 1, n]` so a local polynomial of the
/// requested degree is always determined.
#[inline]
pub fn window_size<T: Float>(n: usize, span: T, degree: u8) -> usize {
    let k = if span <= T::one() {
        (span * T::from(n).unwrap()).ceil().to_usize().unwrap_or(0)
    } else {
        span.round().to_usize().unwrap_or(n)
    };
    k.max(degree as usize + 1).min(n)
}
