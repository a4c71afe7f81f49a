use crate::error::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A fixed receiver with known position and path-loss calibration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawReceiver"))]
pub struct Receiver {
    x: f64,
    y: f64,
    /// Power received at one unit of distance.
    p0: f64,
    /// Attenuation factor of the log-distance model.
    #[cfg_attr(feature = "serde", serde(rename = "L"))]
    attenuation: f64,
}

impl Receiver {
    /// Create a new `Receiver` at (`x`, `y`).
    ///
    /// Returns an error if any parameter is not finite or if `attenuation`
    /// is zero, since distance estimation divides by it.
    pub fn new(x: f64, y: f64, p0: f64, attenuation: f64) -> Result<Self, Error> {
        for (name, value) in [("x", x), ("y", y), ("p0", p0), ("L", attenuation)] {
            if !value.is_finite() {
                return Err(Error::NonFiniteParameter { name, value });
            }
        }

        if attenuation == 0.0 {
            return Err(Error::InvalidAttenuationFactor {
                factor: attenuation,
            });
        }

        Ok(Self {
            x,
            y,
            p0,
            attenuation,
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn p0(&self) -> f64 {
        self.p0
    }

    pub fn attenuation(&self) -> f64 {
        self.attenuation
    }

    /// Squared distance of the receiver from the origin.
    pub(crate) fn norm_squared(&self) -> f64 {
        self.x.powi(2) + self.y.powi(2)
    }
}

/// Receiver fields as they appear in JSON, before validation.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
pub(crate) struct RawReceiver {
    x: f64,
    y: f64,
    p0: f64,
    #[serde(rename = "L", alias = "l")]
    attenuation: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawReceiver> for Receiver {
    type Error = Error;

    fn try_from(raw: RawReceiver) -> Result<Self, Self::Error> {
        Receiver::new(raw.x, raw.y, raw.p0, raw.attenuation)
    }
}

/// An ordered set of at least three receivers.
///
/// Order is significant: readings and pivots refer to receivers by index.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Receiver>", into = "Vec<Receiver>"))]
pub struct Receivers {
    inner: Vec<Receiver>,
}

impl Receivers {
    pub const MIN_LEN: usize = 3;

    /// Create a new `Receivers` from `receivers`.
    ///
    /// Returns an error if fewer than three receivers are given.
    pub fn new(receivers: Vec<Receiver>) -> Result<Self, Error> {
        if receivers.len() < Self::MIN_LEN {
            return Err(Error::InsufficientReceivers {
                count: receivers.len(),
            });
        }

        Ok(Self { inner: receivers })
    }

    /// Returns an error unless `pivot` indexes one of the receivers.
    pub fn check_pivot(&self, pivot: usize) -> Result<&Receiver, Error> {
        self.inner.get(pivot).ok_or(Error::InvalidPivot {
            pivot,
            receivers: self.inner.len(),
        })
    }

    /// Returns an error unless there is exactly one reading per receiver.
    pub fn check_readings(&self, readings: &[f64]) -> Result<(), Error> {
        match readings.len() == self.inner.len() {
            true => Ok(()),
            false => Err(Error::MisalignedReadings {
                receivers: self.inner.len(),
                readings: readings.len(),
            }),
        }
    }

    /// Iterate over every receiver except the one at `pivot`, keeping index order.
    pub fn without(&self, pivot: usize) -> impl Iterator<Item = (usize, &Receiver)> {
        self.inner
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != pivot)
    }
}

impl Deref for Receivers {
    type Target = [Receiver];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl TryFrom<Vec<Receiver>> for Receivers {
    type Error = Error;

    fn try_from(receivers: Vec<Receiver>) -> Result<Self, Self::Error> {
        Self::new(receivers)
    }
}

impl From<Receivers> for Vec<Receiver> {
    fn from(receivers: Receivers) -> Self {
        receivers.inner
    }
}
