pub mod engine;
pub mod peers;
pub mod recommendation;

pub use engine::{compute_valuation, MethodValuation, Potential, ValuationMethod, ValuationResult};
pub use peers::{PeerMultiple, PeerObservation, PeerUniverse, SectorMedians, SubjectProfile};
pub use recommendation::{Recommendation, RecommendationTier};
