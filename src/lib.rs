//! Emitter Localization from Received Signal Strength
//!
//! Each receiver converts its power reading into a distance with the
//! log-distance path-loss model ([`path_loss`]). The circle equations around
//! the receivers are linearized by subtracting a pivot equation ([`system`])
//! and the resulting overdetermined system is solved by least squares
//! ([`solver`]).
//!
//! ```
//! use trilat::prelude::*;
//!
//! let receivers = Receivers::new(vec![
//!     Receiver::new(0.0, 0.0, -40.0, 2.0)?,
//!     Receiver::new(10.0, 0.0, -40.0, 2.0)?,
//!     Receiver::new(0.0, 10.0, -40.0, 2.0)?,
//! ])?;
//!
//! // Readings rounded from an emitter at (3, 4).
//! let position = locate(&receivers, &[-53.9794, -58.1291, -56.5321], 0)?;
//! assert!(position.distance(&Position::new(3.0, 4.0)) < 1e-3);
//! # Ok::<(), trilat::error::Error>(())
//! ```

pub mod error;
pub mod estimator;
pub mod path_loss;
pub mod receiver;
pub mod solver;
pub mod system;

#[cfg(feature = "serde")]
pub mod config;

use crate::{
    error::Error,
    receiver::Receivers,
    solver::{Position, triangulate},
    system::{build_coefficient_matrix, build_result_vector},
};

/// Locate the emitter from `readings`, linearizing around the receiver at `pivot`.
///
/// Fails with [`Error::UnboundedDistance`] rather than returning a NaN
/// position when a reading is NaN or implies an overflowing distance.
pub fn locate(receivers: &Receivers, readings: &[f64], pivot: usize) -> Result<Position, Error> {
    let a = build_coefficient_matrix(receivers, pivot)?;
    let b = build_result_vector(receivers, readings, pivot)?;
    triangulate(&a, &b)
}

pub mod prelude {
    pub use crate::{
        error::Error,
        estimator::{Estimator, Multilateration, Solution, random_pivot},
        locate,
        path_loss::{estimate_distance, expected_power},
        receiver::{Receiver, Receivers},
        solver::{Position, triangulate},
        system::{
            CoefficientMatrix, LinearSystem, ResultVector, build_coefficient_matrix,
            build_result_vector,
        },
    };
}
