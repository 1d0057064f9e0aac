//! # Parameters
//!
//! Scalar-or-sweep bundles for the model parameters and momenta.
//!
//! A [`ParameterBundle`] is a closed record: the recognised fields are `t`,
//! `t2`, `m` and `phi`. A field holding a sequence marks a sweep axis, a
//! scalar field is held fixed. Momenta travel separately in a [`Momentum`]
//! because their names (`k_x`, `k_y`, `k_z`) are reserved and may not be
//! shadowed by parameters.

use crate::error::ParameterError;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;

/// The axis names reserved for momentum components
pub const RESERVED_MOMENTUM_NAMES: [&str; 3] = ["k_x", "k_y", "k_z"];

/// A value which is either held fixed or swept over a sequence
#[derive(Clone, Debug)]
pub enum AxisValue {
    /// A fixed scalar
    Scalar(f64),
    /// A sweep axis over the contained values
    Sweep(Vec<f64>),
}

impl Default for AxisValue {
    fn default() -> Self {
        AxisValue::Scalar(0.0)
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        AxisValue::Scalar(value)
    }
}

impl From<Vec<f64>> for AxisValue {
    fn from(values: Vec<f64>) -> Self {
        AxisValue::Sweep(values)
    }
}

impl From<&[f64]> for AxisValue {
    fn from(values: &[f64]) -> Self {
        AxisValue::Sweep(values.to_vec())
    }
}

impl AxisValue {
    /// The sweep values, if this axis is swept
    pub fn sweep_values(&self) -> Option<&[f64]> {
        match self {
            AxisValue::Scalar(_) => None,
            AxisValue::Sweep(values) => Some(values),
        }
    }

    // The fixed value of the axis. Swept axes fall back to their first entry,
    // the grid walk overrides them point by point.
    pub(crate) fn fixed_value(&self) -> f64 {
        match self {
            AxisValue::Scalar(value) => *value,
            AxisValue::Sweep(values) => values.first().copied().unwrap_or(0.0),
        }
    }
}

/// The model parameters at a single grid point
#[derive(Clone, Copy, Debug)]
pub struct ParameterValues {
    /// Nearest-neighbour hopping amplitude
    pub t: f64,
    /// Next-nearest-neighbour hopping amplitude
    pub t2: f64,
    /// Staggered onsite energy
    pub m: f64,
    /// Flux phase
    pub phi: f64,
}

/// The closed parameter record of the model
///
/// Defaults to all parameters zero apart from the flux phase, which sits at
/// π/2 so that the next-nearest-neighbour hopping is purely imaginary.
#[derive(Clone, Debug)]
pub struct ParameterBundle {
    t: AxisValue,
    t2: AxisValue,
    m: AxisValue,
    phi: AxisValue,
}

impl Default for ParameterBundle {
    fn default() -> Self {
        Self {
            t: AxisValue::default(),
            t2: AxisValue::default(),
            m: AxisValue::default(),
            phi: AxisValue::Scalar(FRAC_PI_2),
        }
    }
}

impl ParameterBundle {
    /// Set the nearest-neighbour hopping amplitude
    pub fn with_t(mut self, value: impl Into<AxisValue>) -> Self {
        self.t = value.into();
        self
    }

    /// Set the next-nearest-neighbour hopping amplitude
    pub fn with_t2(mut self, value: impl Into<AxisValue>) -> Self {
        self.t2 = value.into();
        self
    }

    /// Set the staggered onsite energy
    pub fn with_m(mut self, value: impl Into<AxisValue>) -> Self {
        self.m = value.into();
        self
    }

    /// Set the flux phase
    pub fn with_phi(mut self, value: impl Into<AxisValue>) -> Self {
        self.phi = value.into();
        self
    }

    /// Set a field by name
    ///
    /// This is the lookup-by-name contract for callers which carry parameter
    /// names as data. Names reserved for momentum are rejected outright, as
    /// is anything outside the recognised set.
    pub fn try_set(
        &mut self,
        name: &str,
        value: impl Into<AxisValue>,
    ) -> Result<(), ParameterError> {
        if RESERVED_MOMENTUM_NAMES.contains(&name) {
            return Err(ParameterError::ReservedMomentumName(name.to_owned()));
        }
        match name {
            "t" => self.t = value.into(),
            "t2" => self.t2 = value.into(),
            "m" => self.m = value.into(),
            "phi" => self.phi = value.into(),
            _ => return Err(ParameterError::UnknownField(name.to_owned())),
        }
        Ok(())
    }

    pub(crate) fn fields(&self) -> [(&'static str, &AxisValue); 4] {
        [
            ("m", &self.m),
            ("phi", &self.phi),
            ("t", &self.t),
            ("t2", &self.t2),
        ]
    }

    /// The swept fields and their value sequences
    pub fn swept(&self) -> Vec<(&'static str, &[f64])> {
        self.fields()
            .into_iter()
            .filter_map(|(name, axis)| axis.sweep_values().map(|values| (name, values)))
            .collect()
    }

    pub(crate) fn resolve(&self, assignment: &BTreeMap<&str, f64>) -> ParameterValues {
        let value = |name: &str, axis: &AxisValue| {
            assignment
                .get(name)
                .copied()
                .unwrap_or_else(|| axis.fixed_value())
        };
        ParameterValues {
            t: value("t", &self.t),
            t2: value("t2", &self.t2),
            m: value("m", &self.m),
            phi: value("phi", &self.phi),
        }
    }
}

/// The momentum components at which the Hamiltonian is evaluated
///
/// Unset components are taken as zero by the evaluator; the plot-oriented
/// spectrum entry point instead fills them with a default momentum window
/// for every retained translational direction.
#[derive(Clone, Debug, Default)]
pub struct Momentum {
    k_x: Option<AxisValue>,
    k_y: Option<AxisValue>,
    k_z: Option<AxisValue>,
}

impl Momentum {
    /// Set the first momentum component
    pub fn with_k_x(mut self, value: impl Into<AxisValue>) -> Self {
        self.k_x = Some(value.into());
        self
    }

    /// Set the second momentum component
    pub fn with_k_y(mut self, value: impl Into<AxisValue>) -> Self {
        self.k_y = Some(value.into());
        self
    }

    /// Set the third momentum component
    pub fn with_k_z(mut self, value: impl Into<AxisValue>) -> Self {
        self.k_z = Some(value.into());
        self
    }

    pub(crate) fn fields(&self) -> [(&'static str, Option<&AxisValue>); 3] {
        [
            ("k_x", self.k_x.as_ref()),
            ("k_y", self.k_y.as_ref()),
            ("k_z", self.k_z.as_ref()),
        ]
    }

    pub(crate) fn component(&self, index: usize) -> Option<&AxisValue> {
        match index {
            0 => self.k_x.as_ref(),
            1 => self.k_y.as_ref(),
            _ => self.k_z.as_ref(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AxisValue, ParameterBundle};

    #[test]
    fn reserved_momentum_names_are_rejected() {
        let mut bundle = ParameterBundle::default();
        for name in ["k_x", "k_y", "k_z"] {
            assert!(bundle.try_set(name, 1.0).is_err());
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut bundle = ParameterBundle::default();
        assert!(bundle.try_set("chemical_potential", 1.0).is_err());
    }

    #[test]
    fn recognised_fields_are_settable_by_name() {
        let mut bundle = ParameterBundle::default();
        bundle.try_set("t", 1.0).unwrap();
        bundle.try_set("m", vec![0.0, 0.1]).unwrap();
        let swept = bundle.swept();
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].0, "m");
        assert_eq!(swept[0].1, &[0.0, 0.1]);
    }

    #[test]
    fn scalar_axes_are_not_swept() {
        let bundle = ParameterBundle::default().with_t(1.0).with_m(0.2);
        assert!(bundle.swept().is_empty());
        assert_eq!(AxisValue::from(0.2).sweep_values(), None);
    }
}
