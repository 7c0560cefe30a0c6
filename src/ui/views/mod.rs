pub mod compile;
pub mod setup;
pub mod status;
pub mod watch;
