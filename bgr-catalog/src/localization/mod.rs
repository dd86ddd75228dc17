//! Localized-variant detection
//!
//! Decides whether a localized (Japanese edition) name or publisher should be
//! displayed in place of the source catalog's data. Never fails; the worst
//! case is "use the original".

pub mod candidate;
pub mod decision;
pub mod publisher;
pub mod script;

pub use candidate::{extract_candidate, LocalizedCandidate};
pub use decision::{decide, DecisionReason, LocalizationDecision};
pub use publisher::is_localized_publisher;
pub use script::is_valid_localized_name;
