pub mod app;
pub mod bootstrap;
pub mod config;
pub mod device;
pub mod display;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod oneshot;
pub mod pipeline;
pub mod platform;
pub mod power;
pub mod stream;
pub mod types;

#[cfg(all(test, feature = "sim"))]
mod test_support;

// Re-exports
pub use app::*;
pub use config::*;
pub use device::*;
pub use display::*;
pub use error::*;
pub use stream::*;
pub use types::*;
