mod flow_control;
mod priority;
mod state;
mod store;
mod stream;
mod streams;

pub use self::priority::WriteScheduler;
pub use self::streams::{AbuseLimits, StreamRef, Streams};
