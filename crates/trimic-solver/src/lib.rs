pub mod gauss_newton;
pub mod model;

pub use gauss_newton::{GaussNewton, LeastSquares, Solution};
pub use model::hyperbolic_residual;
