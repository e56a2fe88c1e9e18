use serde::Serialize;

/// Derives one scalar coordinate from a point at a given position.
///
/// Implementations must be deterministic in `(point, index)`: the filter may
/// evaluate the same position more than once.
pub trait Accessor<P: ?Sized> {
    fn get(&self, point: &P, index: usize) -> f64;
}

impl<P: ?Sized, F> Accessor<P> for F
where
    F: Fn(&P, usize) -> f64,
{
    fn get(&self, point: &P, index: usize) -> f64 {
        self(point, index)
    }
}

/// Uses the position in the sequence as coordinate. The default X.
#[derive(Debug, Default, Clone, Copy)]
pub struct Index;

impl<P: ?Sized> Accessor<P> for Index {
    fn get(&self, _point: &P, index: usize) -> f64 {
        index as f64
    }
}

/// Uses the point itself as coordinate. The default Y.
#[derive(Debug, Default, Clone, Copy)]
pub struct Value;

impl<P: Copy + Into<f64>> Accessor<P> for Value {
    fn get(&self, point: &P, _index: usize) -> f64 {
        (*point).into()
    }
}

// Kept is a point selected by the filter together with its original position.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Kept<T> {
    pub index: usize,
    pub point: T,
}

/// Maps kept records into the caller's output shape.
pub trait Projection<P> {
    type Output;

    fn project(&self, kept: Kept<&P>) -> Self::Output;
}

impl<P, T, F> Projection<P> for F
where
    F: Fn(Kept<&P>) -> T,
{
    type Output = T;

    fn project(&self, kept: Kept<&P>) -> T {
        self(kept)
    }
}

/// Returns the kept record itself, with an owned copy of the point.
#[derive(Debug, Default, Clone, Copy)]
pub struct Raw;

impl<P: Clone> Projection<P> for Raw {
    type Output = Kept<P>;

    fn project(&self, kept: Kept<&P>) -> Kept<P> {
        Kept {
            index: kept.index,
            point: kept.point.clone(),
        }
    }
}
