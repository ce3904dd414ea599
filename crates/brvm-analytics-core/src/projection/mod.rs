pub mod blend;
pub mod forecast;
pub mod growth;
pub mod regression;

pub use blend::BlendWeights;
pub use forecast::{project, project_default, ForecastYear, ProjectionResult};
pub use growth::cagr;
pub use regression::LinearFit;
