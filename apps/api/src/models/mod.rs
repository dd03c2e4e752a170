pub mod blurb;
pub mod profile;
