pub mod cache;
pub mod clock;
pub mod config;
pub mod consts;
pub mod error;
pub mod events;
pub mod factory;
pub mod logging;
pub mod platform;
pub mod registry;
pub mod state;

pub use error::{PlatformError, ReviewErrors};
pub use factory::{ReviewFactory, UseReview};
pub use platform::{Context, CustomQuery, Query, ReviewApi};
pub use registry::ReviewStore;
pub use state::ReviewSnapshot;
