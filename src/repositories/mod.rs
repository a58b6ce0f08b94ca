pub mod memory;
pub mod route_repository;
pub mod user_repository;

pub use memory::{InMemoryIdentityStore, InMemoryRouteStore, SeedData};
pub use route_repository::{RouteRepository, RouteStore};
pub use user_repository::{IdentityStore, UserRepository};
