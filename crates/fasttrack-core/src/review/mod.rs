mod gate;

pub use gate::{ReviewGate, PENDING_REVIEW_KEY};
