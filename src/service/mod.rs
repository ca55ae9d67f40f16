pub mod attendance;
pub mod window;
