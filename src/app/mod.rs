mod core;

pub use self::core::{describe_candidates, App, AttemptSummary, Report};
