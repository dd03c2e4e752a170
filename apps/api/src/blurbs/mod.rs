// Blurb lifecycle: storage backends, review transitions and effective-text resolution.

pub mod handlers;
pub mod pg_store;
pub mod review;
pub mod store;
