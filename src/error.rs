use miette::Diagnostic;

/// Errors raised while building a model
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum BuildError {
    /// Malformed lattice geometry
    #[error(transparent)]
    Lattice(#[from] haldane_lattice::LatticeError),
    /// A finite ribbon with no cross-section was requested
    #[error("ribbon width must be at least one unit cell")]
    ZeroWidth,
}

/// Errors raised when assembling a parameter bundle
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ParameterError {
    /// A parameter tried to use a name reserved for momentum
    #[error("`{0}` is reserved for momentum, rename the parameter")]
    ReservedMomentumName(String),
    /// A parameter name outside the recognised set
    #[error("unrecognised parameter `{0}`")]
    UnknownField(String),
}

/// Errors raised while evaluating the Hamiltonian over a grid
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum EvaluationError {
    /// Momentum was over-specified for a one-dimensional dispersion
    #[error("the dispersion is one-dimensional, but transverse momenta were provided")]
    TransverseMomentum,
    /// The requested momentum cannot be expressed on the reciprocal lattice
    #[error("requested momentum does not correspond to any lattice momentum (residual {residual:.3e})")]
    OffLattice {
        /// The least-squares residual of the projection
        residual: f64,
    },
    /// The retained translations do not span independent directions
    #[error("the retained lattice directions are linearly dependent")]
    DegenerateLattice,
    /// A fixed-parameter evaluation received a swept field
    #[error("curvature is evaluated at fixed parameters, but `{0}` is swept")]
    SweptParameter(&'static str),
    /// The momentum grid is too small for the curvature stencil
    #[error("the curvature stencil needs at least three points along each momentum axis")]
    GridTooCoarse,
    /// The dense eigensolver failed
    #[error(transparent)]
    Linalg(#[from] ndarray_linalg::error::LinalgError),
    /// A grid could not be assembled into the requested shape
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Errors raised by the plot-oriented spectrum entry point
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum SpectrumError {
    /// Nothing is swept, so there is no axis to resolve the bands against
    #[error("nothing is swept, a zero-dimensional spectrum was requested")]
    ZeroAxes,
    /// Band spectra are limited to two simultaneous axes
    #[error("{0} axes are swept, spectra cannot go beyond two dimensions")]
    TooManyAxes(usize),
    /// The underlying grid evaluation failed
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
