//! Farthest Feasible Point filtering.
//!
//! A single forward pass keeps a subset of the points such that every
//! dropped point lies within `max_delta_y` (in Y) of the straight line
//! between the kept points around it. Starting from an anchor (alpha), a
//! probe (omega) walks forward while a slope corridor is narrowed to fit
//! every probed point. The last probe whose direct line from the anchor
//! still fits the corridor is the farthest feasible point. Once the corridor
//! collapses that point is kept and becomes the next anchor.

use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::accessor::{Accessor, Index, Kept, Projection, Raw, Value};
use crate::corridor::{Corridor, Doors};
use crate::error::{Error, Reason, Result};
use crate::tolerance::Tolerance;

/// Filter configuration: coordinate accessors, tolerance and the projection
/// applied to kept records.
///
/// A built filter is immutable. Every call to [`Ffp::filter`] owns its scan
/// state, so the same filter can serve concurrent calls.
pub struct Ffp<P, X = Index, Y = Value, R = Raw> {
    x: X,
    y: Y,
    result: R,
    tolerance: Tolerance,
    _point: PhantomData<fn(&P)>,
}

impl<P> Ffp<P> {
    pub fn new() -> Self {
        Ffp {
            x: Index,
            y: Value,
            result: Raw,
            tolerance: Tolerance::default(),
            _point: PhantomData,
        }
    }
}

impl<P> Default for Ffp<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, X: Clone, Y: Clone, R: Clone> Clone for Ffp<P, X, Y, R> {
    fn clone(&self) -> Self {
        Ffp {
            x: self.x.clone(),
            y: self.y.clone(),
            result: self.result.clone(),
            tolerance: self.tolerance,
            _point: PhantomData,
        }
    }
}

impl<P, X, Y, R> std::fmt::Debug for Ffp<P, X, Y, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Ffp")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl<P, X, Y, R> Ffp<P, X, Y, R> {
    pub fn with_x<F>(self, x: F) -> Ffp<P, F, Y, R>
    where
        F: Fn(&P, usize) -> f64,
    {
        Ffp {
            x,
            y: self.y,
            result: self.result,
            tolerance: self.tolerance,
            _point: PhantomData,
        }
    }

    pub fn with_y<F>(self, y: F) -> Ffp<P, X, F, R>
    where
        F: Fn(&P, usize) -> f64,
    {
        Ffp {
            x: self.x,
            y,
            result: self.result,
            tolerance: self.tolerance,
            _point: PhantomData,
        }
    }

    pub fn with_result<F, T>(self, result: F) -> Ffp<P, X, Y, F>
    where
        F: Fn(Kept<&P>) -> T,
    {
        Ffp {
            x: self.x,
            y: self.y,
            result,
            tolerance: self.tolerance,
            _point: PhantomData,
        }
    }

    pub fn with_max_delta_y(mut self, max_delta_y: f64) -> Self {
        self.tolerance.max_delta_y = max_delta_y;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.tolerance.epsilon = epsilon;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_delta_y(&self) -> f64 {
        self.tolerance.max_delta_y
    }

    pub fn epsilon(&self) -> f64 {
        self.tolerance.epsilon
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }
}

// Control state of the outer scan.
enum Step {
    // Probing forward from the anchor.
    Scanning { alpha: usize },
    // Keeping the farthest feasible point found from `alpha`.
    Committing { alpha: usize, farthest: usize },
}

impl<P, X, Y, R> Ffp<P, X, Y, R>
where
    X: Accessor<P>,
    Y: Accessor<P>,
{
    /// Returns the indices of the points to keep, in increasing order.
    ///
    /// Non-empty input always keeps its first and last index. Fails with
    /// [`Error::InvalidCoordinate`] as soon as a coordinate difference is not
    /// a finite number or a probe's X does not exceed the anchor's.
    pub fn keep(&self, points: &[P]) -> Result<Vec<usize>> {
        self.tolerance.validate()?;

        let Some(last) = points.len().checked_sub(1) else {
            return Ok(Vec::new());
        };

        let mut kept = vec![0];
        if last == 0 {
            return Ok(kept);
        }

        let mut step = Step::Scanning { alpha: 0 };
        loop {
            step = match step {
                Step::Scanning { alpha } => Step::Committing {
                    alpha,
                    farthest: self.scan(points, alpha)?,
                },
                Step::Committing { alpha, farthest } => {
                    let next = if farthest > alpha {
                        farthest
                    } else {
                        // Nothing past the anchor was admissible.
                        debug!(alpha, "no feasible point, keeping the next one");
                        alpha + 1
                    };
                    debug!(alpha = next, "kept");
                    kept.push(next);
                    if next == last {
                        break;
                    }
                    Step::Scanning { alpha: next }
                }
            };
        }

        debug!(points = points.len(), kept = kept.len(), "filtered");
        Ok(kept)
    }

    /// Filters `points` and maps every kept record through the configured
    /// projection.
    pub fn filter(&self, points: &[P]) -> Result<Vec<<R as Projection<P>>::Output>>
    where
        R: Projection<P>,
    {
        let kept = self.keep(points)?;
        Ok(kept
            .into_iter()
            .map(|index| {
                self.result.project(Kept {
                    index,
                    point: &points[index],
                })
            })
            .collect())
    }

    fn coordinates(&self, points: &[P], index: usize) -> (f64, f64) {
        let point = &points[index];
        (self.x.get(point, index), self.y.get(point, index))
    }

    // Walks the probe forward from `alpha` and returns the farthest feasible
    // index once the corridor collapses or the input is exhausted.
    fn scan(&self, points: &[P], alpha: usize) -> Result<usize> {
        let Tolerance {
            max_delta_y,
            epsilon,
        } = self.tolerance;
        let (alpha_x, alpha_y) = self.coordinates(points, alpha);

        let mut corridor = Corridor::new();
        let mut farthest = alpha;

        for omega in alpha + 1..points.len() {
            let (omega_x, omega_y) = self.coordinates(points, omega);
            let delta_x = omega_x - alpha_x;
            let delta_y = omega_y - alpha_y;
            check(delta_x, delta_y).map_err(|reason| Error::InvalidCoordinate {
                alpha,
                omega,
                reason,
            })?;

            let tg = delta_y / delta_x;
            corridor.narrow(Doors::around(tg, max_delta_y / delta_x), epsilon);

            if corridor.admits(tg, epsilon) {
                trace!(alpha, omega, tg, "admitted");
                farthest = omega;
            } else if corridor.collapsed(epsilon) {
                trace!(
                    alpha,
                    omega,
                    lower = corridor.lower(),
                    upper = corridor.upper(),
                    "corridor collapsed"
                );
                return Ok(farthest);
            }
        }

        Ok(farthest)
    }
}

fn check(delta_x: f64, delta_y: f64) -> core::result::Result<(), Reason> {
    if delta_x.is_nan() || delta_y.is_nan() {
        return Err(Reason::NotANumber);
    }
    if delta_x.is_infinite() || delta_y.is_infinite() {
        return Err(Reason::Infinite);
    }
    if delta_x <= 0.0 {
        return Err(Reason::NonIncreasingX);
    }
    Ok(())
}

/// Filters plain `(x, y)` pairs, returning the kept pairs.
pub fn simplify(data: &[(f64, f64)], tolerance: Tolerance) -> Result<Vec<(f64, f64)>> {
    Ffp::new()
        .with_x(|p: &(f64, f64), _| p.0)
        .with_y(|p: &(f64, f64), _| p.1)
        .with_tolerance(tolerance)
        .with_result(|kept: Kept<&(f64, f64)>| *kept.point)
        .filter(data)
}
