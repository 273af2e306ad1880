pub mod access;
pub mod admin;
pub mod courses;
pub mod progress;
pub mod submissions;
