//! Services for registration normalization and aggregation

pub mod aggregator;
pub mod form_link;
pub mod normalizer;
pub mod quantity;

pub use aggregator::Aggregator;
pub use form_link::add_prefill_date;
pub use normalizer::normalize_meal_selection;
pub use quantity::clip_quantity;
