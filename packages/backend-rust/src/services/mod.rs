pub mod progress;

pub use progress::{CurrentSession, ProgressEvent, ProgressService};
