pub mod arrays;
pub mod geo;
pub mod record_kind;
pub mod time_range;
