pub mod account;
pub mod recommendation;

pub use account::{Account, LoginRequest, NewAccount, Profile, ProfileAttributes, SignupRequest};
pub use recommendation::{
    confidence, EnrichedRecommendation, ModelInput, ModelOutput, ModelVariant,
    RecommendationItem, RecommendationRequest, RecommendationResponse,
};
