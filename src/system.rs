//! Linearization of the receiver circle equations.
//!
//! Receiver `i` constrains the emitter to the circle
//!
//! ```text
//! (x - x_i)^2 + (y - y_i)^2 = d_i^2
//! ```
//!
//! Subtracting the circle of the pivot receiver `p` from every other circle
//! eliminates the quadratic terms and leaves one linear equation per
//! non-pivot receiver:
//!
//! ```text
//! 2 (x_i - x_p) x + 2 (y_i - y_p) y = (x_i^2 + y_i^2 - d_i^2) - (x_p^2 + y_p^2 - d_p^2)
//! ```
//!
//! The left hand side depends only on geometry and forms the coefficient
//! matrix. The right hand side depends on the readings and forms the result
//! vector. Rows follow receiver order with the pivot skipped.

use crate::{error::Error, path_loss::estimate_distance, receiver::Receivers};
use nalgebra::{DVector, MatrixXx2};
use tracing::{debug, trace};

/// The `(n - 1) x 2` geometry matrix.
pub type CoefficientMatrix = MatrixXx2<f64>;

/// The `(n - 1) x 1` distance-derived vector, paired row for row with a [`CoefficientMatrix`].
pub type ResultVector = DVector<f64>;

/// Build the coefficient matrix for `receivers` linearized around `pivot`.
///
/// With exactly three receivers the matrix is square and must be invertible,
/// otherwise the receivers are collinear and [`Error::DegenerateGeometry`] is
/// returned. Larger systems are not checked here; poorly spread receivers
/// silently degrade the estimate.
pub fn build_coefficient_matrix(
    receivers: &Receivers,
    pivot: usize,
) -> Result<CoefficientMatrix, Error> {
    let origin = receivers.check_pivot(pivot)?;

    let rows: Vec<f64> = receivers
        .without(pivot)
        .flat_map(|(_, receiver)| {
            [
                2. * (receiver.x() - origin.x()),
                2. * (receiver.y() - origin.y()),
            ]
        })
        .collect();

    let a = CoefficientMatrix::from_row_slice(&rows);

    if a.nrows() == 2 && a.fixed_rows::<2>(0).determinant() == 0.0 {
        return Err(Error::DegenerateGeometry { pivot });
    }

    debug!(pivot, rows = a.nrows(), "built coefficient matrix");
    trace!("coefficient matrix: {a}");

    Ok(a)
}

/// Estimate the distance from every receiver to the emitter.
///
/// Returns [`Error::UnboundedDistance`] when a reading is NaN or so far below
/// the reference power that the squared distance overflows.
pub fn estimate_distances(receivers: &Receivers, readings: &[f64]) -> Result<Vec<f64>, Error> {
    receivers.check_readings(readings)?;

    receivers
        .iter()
        .zip(readings)
        .enumerate()
        .map(|(index, (receiver, power))| {
            let distance = estimate_distance(receiver, *power);
            match distance.powi(2).is_finite() {
                true => Ok(distance),
                false => Err(Error::UnboundedDistance {
                    receiver: index,
                    power: *power,
                    distance,
                }),
            }
        })
        .collect()
}

/// Build the result vector for `readings` linearized around `pivot`.
///
/// Row `k` is `c_pivot - (d_i^2 - x_i^2 - y_i^2)` for the `k`-th non-pivot
/// receiver `i`, where `c_pivot = d_pivot^2 - x_pivot^2 - y_pivot^2`. This is
/// the right hand side of the equation in the module docs, so that
/// `A * X = B` holds at the true emitter position. Writing the rows as
/// `(d_i^2 - x_i^2 - y_i^2) - c_pivot` instead would pair with coefficients
/// `2 (x_pivot - x_i)` and yield the same solution.
pub fn build_result_vector(
    receivers: &Receivers,
    readings: &[f64],
    pivot: usize,
) -> Result<ResultVector, Error> {
    receivers.check_pivot(pivot)?;
    let distances = estimate_distances(receivers, readings)?;
    Ok(result_vector(receivers, &distances, pivot))
}

fn result_vector(receivers: &Receivers, distances: &[f64], pivot: usize) -> ResultVector {
    let constant = |index: usize| receivers[index].norm_squared() - distances[index].powi(2);
    let pivot_constant = constant(pivot);

    let b = ResultVector::from_iterator(
        receivers.len() - 1,
        receivers
            .without(pivot)
            .map(|(index, _)| constant(index) - pivot_constant),
    );

    debug!(pivot, rows = b.nrows(), "built result vector");
    trace!("result vector: {b}");

    b
}

/// Both halves of the linearized system together with the distances behind them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinearSystem {
    pivot: usize,
    distances: Vec<f64>,
    a: CoefficientMatrix,
    b: ResultVector,
}

impl LinearSystem {
    /// Linearize the circle equations of `receivers` for `readings` around `pivot`.
    pub fn build(receivers: &Receivers, readings: &[f64], pivot: usize) -> Result<Self, Error> {
        let a = build_coefficient_matrix(receivers, pivot)?;
        let distances = estimate_distances(receivers, readings)?;
        debug!(?distances, "estimated distances");

        let b = result_vector(receivers, &distances, pivot);

        Ok(Self {
            pivot,
            distances,
            a,
            b,
        })
    }

    pub fn pivot(&self) -> usize {
        self.pivot
    }

    /// The estimated distance from each receiver, in receiver order.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn coefficients(&self) -> &CoefficientMatrix {
        &self.a
    }

    pub fn results(&self) -> &ResultVector {
        &self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{path_loss::expected_power, receiver::Receiver};
    use approx::assert_relative_eq;
    use nalgebra::Vector2;
    use quickcheck::{TestResult, quickcheck};
    use rstest::rstest;

    fn receivers(points: &[(f64, f64)]) -> Receivers {
        Receivers::new(
            points
                .iter()
                .map(|(x, y)| Receiver::new(*x, *y, -40.0, 2.0).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn square() -> Receivers {
        receivers(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)])
    }

    fn readings(receivers: &Receivers, emitter: (f64, f64)) -> Vec<f64> {
        receivers
            .iter()
            .map(|r| {
                let distance = ((r.x() - emitter.0).powi(2) + (r.y() - emitter.1).powi(2)).sqrt();
                expected_power(r, distance)
            })
            .collect()
    }

    #[rstest]
    #[case(0, &[20.0, 0.0, 0.0, 20.0, 20.0, 20.0])]
    #[case(1, &[-20.0, 0.0, -20.0, 20.0, 0.0, 20.0])]
    #[case(2, &[0.0, -20.0, 20.0, -20.0, 20.0, 0.0])]
    #[case(3, &[-20.0, -20.0, 0.0, -20.0, -20.0, 0.0])]
    fn coefficient_rows(#[case] pivot: usize, #[case] expected: &[f64]) {
        let a = build_coefficient_matrix(&square(), pivot).unwrap();
        assert_eq!(a, CoefficientMatrix::from_row_slice(expected));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn three_collinear(#[case] pivot: usize) {
        let receivers = receivers(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        assert_eq!(
            build_coefficient_matrix(&receivers, pivot),
            Err(Error::DegenerateGeometry { pivot })
        );
    }

    #[test]
    fn coincident_receivers() {
        let receivers = receivers(&[(3.0, 4.0), (3.0, 4.0), (0.0, 10.0)]);
        insta::assert_snapshot!(
            build_coefficient_matrix(&receivers, 0).unwrap_err(),
            @"receivers are collinear relative to pivot 0: coefficient matrix has null determinant"
        );
    }

    #[test]
    fn four_collinear_is_not_checked() {
        let receivers = receivers(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (15.0, 0.0)]);
        assert!(build_coefficient_matrix(&receivers, 0).is_ok());
    }

    #[test]
    fn invalid_pivot() {
        assert_eq!(
            build_coefficient_matrix(&square(), 4),
            Err(Error::InvalidPivot {
                pivot: 4,
                receivers: 4
            })
        );
        assert_eq!(
            build_result_vector(&square(), &[-50.0; 4], 7),
            Err(Error::InvalidPivot {
                pivot: 7,
                receivers: 4
            })
        );
    }

    #[test]
    fn five_receivers_every_pivot() {
        let receivers = receivers(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (4.0, -6.0),
        ]);
        let emitter = Vector2::new(2.5, 7.0);
        let readings = readings(&receivers, (2.5, 7.0));

        for pivot in 0..receivers.len() {
            let system = LinearSystem::build(&receivers, &readings, pivot).unwrap();
            assert_eq!(system.coefficients().shape(), (4, 2));
            assert_relative_eq!(
                system.coefficients() * emitter,
                *system.results(),
                epsilon = 1e-9
            );
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn fractional_collinear(#[case] pivot: usize) {
        let receivers = receivers(&[(0.0, 0.0), (0.1, 0.2), (0.3, 0.6)]);
        assert_eq!(
            build_coefficient_matrix(&receivers, pivot),
            Err(Error::DegenerateGeometry { pivot })
        );
    }

    #[rstest]
    #[case(-1e4)]
    #[case(-3200.0)]
    #[case(f64::NAN)]
    fn unbounded_distance(#[case] power: f64) {
        match build_result_vector(&square(), &[-50.0, power, -50.0, -50.0], 0) {
            Err(Error::UnboundedDistance { receiver, .. }) => assert_eq!(receiver, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn misaligned_readings() {
        assert_eq!(
            build_result_vector(&square(), &[-50.0; 3], 0),
            Err(Error::MisalignedReadings {
                receivers: 4,
                readings: 3
            })
        );
        assert_eq!(
            LinearSystem::build(&square(), &[-50.0; 5], 0),
            Err(Error::MisalignedReadings {
                receivers: 4,
                readings: 5
            })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn rows_are_paired(#[case] pivot: usize) {
        // Every row of the system holds exactly at the true emitter position.
        let receivers = square();
        let emitter = Vector2::new(3.0, 7.5);
        let system = LinearSystem::build(&receivers, &readings(&receivers, (3.0, 7.5)), pivot)
            .unwrap();

        assert_eq!(system.pivot(), pivot);
        assert_eq!(system.coefficients().nrows(), system.results().nrows());
        assert_relative_eq!(
            system.coefficients() * emitter,
            *system.results(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn result_vector_matches_system() {
        let receivers = square();
        let readings = readings(&receivers, (5.0, 5.0));
        let system = LinearSystem::build(&receivers, &readings, 2).unwrap();

        assert_eq!(
            &build_result_vector(&receivers, &readings, 2).unwrap(),
            system.results()
        );
        assert_eq!(system.distances().len(), 4);
        for distance in system.distances() {
            assert_relative_eq!(*distance, 50f64.sqrt(), max_relative = 1e-12);
        }
    }

    #[test]
    fn centered_emitter() {
        let receivers = square();
        let b = build_result_vector(&receivers, &readings(&receivers, (5.0, 5.0)), 0).unwrap();
        assert_relative_eq!(
            b,
            ResultVector::from_vec(vec![100.0, 100.0, 200.0]),
            epsilon = 1e-9
        );
    }

    quickcheck! {
        fn three_non_collinear_is_regular(points: Vec<(i8, i8)>, pivot: u8) -> TestResult {
            if points.len() < 3 {
                return TestResult::discard();
            }

            let (p, q, r) = (points[0], points[1], points[2]);
            let cross = (q.0 as i32 - p.0 as i32) * (r.1 as i32 - p.1 as i32)
                - (q.1 as i32 - p.1 as i32) * (r.0 as i32 - p.0 as i32);
            if cross == 0 {
                return TestResult::discard();
            }

            let receivers = receivers(&[
                (p.0 as f64, p.1 as f64),
                (q.0 as f64, q.1 as f64),
                (r.0 as f64, r.1 as f64),
            ]);
            let pivot = pivot as usize % 3;

            match build_coefficient_matrix(&receivers, pivot) {
                Ok(a) => TestResult::from_bool(a.fixed_rows::<2>(0).determinant() != 0.0),
                Err(_) => TestResult::failed(),
            }
        }
    }
}
