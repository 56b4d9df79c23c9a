pub mod accounts;
pub mod lookups;
pub mod postgres;

pub use accounts::{AccountStore, PgAccountStore};
pub use lookups::{LookupStore, LookupTable, PgLookupStore};
pub use postgres::{create_pool, run_migrations};
