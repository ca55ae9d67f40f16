pub mod clock;
pub mod local_time;
