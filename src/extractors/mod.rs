//! Request extractors that reject with `AppError`, so every 400 uses the envelope.

mod json;
mod pagination;
mod path_id;

pub use json::JsonBody;
pub use pagination::Pagination;
pub use path_id::EntityId;
