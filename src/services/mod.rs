pub mod accounts;
pub mod profile;
pub mod providers;
pub mod recommendations;

pub use accounts::AccountService;
pub use profile::ProfileService;
pub use providers::{HostedModel, RecommendationModel};
pub use recommendations::Recommender;
