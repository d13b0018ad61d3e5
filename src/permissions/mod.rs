pub mod gate;
pub mod store;

pub use gate::{ActionGate, Action, Affordance, AffordanceTarget};
pub use store::{LoadState, PermissionCheck, PermissionStore};
