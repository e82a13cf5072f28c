pub mod chat;
pub mod profile;
pub mod quiz;
pub mod root;
