//! Record source: fetches raw registration rows from the external store

mod bitable;

pub use bitable::BitableSource;
