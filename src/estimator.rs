use crate::{
    error::Error,
    receiver::Receivers,
    solver::{Position, triangulate},
    system::LinearSystem,
};
use rand::Rng;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::Serialize;

/// Estimates something about the emitter from one power reading per receiver.
pub trait Estimator {
    type Output;
    fn estimate(&self, readings: &[f64]) -> Result<Self::Output, Error>;
}

/// Pick a pivot uniformly from the indices of `receivers`.
pub fn random_pivot<R: Rng + ?Sized>(rng: &mut R, receivers: &Receivers) -> usize {
    rng.random_range(0..receivers.len())
}

/// Locates the emitter by linearizing around a pivot receiver and solving by least squares.
#[derive(Clone, Debug)]
pub struct Multilateration {
    receivers: Receivers,
    pivot: usize,
}

impl Multilateration {
    /// Create a new `Multilateration` linearized around the receiver at `pivot`.
    pub fn new(receivers: Receivers, pivot: usize) -> Result<Self, Error> {
        receivers.check_pivot(pivot)?;
        Ok(Self { receivers, pivot })
    }

    /// Create a new `Multilateration` around a pivot drawn from `rng`.
    pub fn with_random_pivot<R: Rng + ?Sized>(receivers: Receivers, rng: &mut R) -> Self {
        let pivot = random_pivot(rng, &receivers);
        Self { receivers, pivot }
    }

    pub fn receivers(&self) -> &Receivers {
        &self.receivers
    }

    pub fn pivot(&self) -> usize {
        self.pivot
    }

    /// Estimate every set of readings in `batch` in parallel.
    ///
    /// Results are returned in the order of `batch`.
    pub fn par_estimate<V>(&self, batch: &[V]) -> Vec<Result<Solution, Error>>
    where
        V: AsRef<[f64]> + Sync,
    {
        batch
            .par_iter()
            .map(|readings| self.estimate(readings.as_ref()))
            .collect()
    }
}

impl Estimator for Multilateration {
    type Output = Solution;

    fn estimate(&self, readings: &[f64]) -> Result<Self::Output, Error> {
        let system = LinearSystem::build(&self.receivers, readings, self.pivot)?;
        let position = triangulate(system.coefficients(), system.results())?;
        Ok(Solution { system, position })
    }
}

/// The estimated position along with the system it was solved from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Solution {
    system: LinearSystem,
    position: Position,
}

impl Solution {
    pub fn system(&self) -> &LinearSystem {
        &self.system
    }

    pub fn position(&self) -> Position {
        self.position
    }
}
