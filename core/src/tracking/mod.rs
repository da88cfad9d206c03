pub mod aircraft;
pub mod extrapolation;
pub mod history;
pub mod registry;

pub use aircraft::{unix_now, AircraftId, TrackedAircraft};
pub use extrapolation::{Extrapolation, PolynomialFit, PolynomialFitParts};
pub use history::{Sample, SampleHistory};
pub use registry::AircraftRegistry;
