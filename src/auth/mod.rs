pub mod caller;
pub mod identity;
