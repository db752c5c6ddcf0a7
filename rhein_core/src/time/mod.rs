pub mod conductor;

pub use conductor::{Conductor, ManualTime, MonotonicTime, TimeSource};
