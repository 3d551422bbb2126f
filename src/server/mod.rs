mod assets;
pub mod dto;
mod events;
mod keys;
pub mod lookup;
mod projects;
mod publishes;
pub mod ratelimit;
mod renders;
pub mod response;
mod router;
mod shots;
mod system;
mod tasks;
pub mod validation;
mod versions;

pub use ratelimit::{RateLimiter, SlidingWindow, Unlimited};
pub use router::{AppState, create_router};
