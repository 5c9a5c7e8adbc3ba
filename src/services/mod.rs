pub mod permissions;
pub mod stories;
pub mod validation;
