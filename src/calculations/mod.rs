pub mod forward_pass;

pub use forward_pass::{ForwardPass, ResolvedDates};
