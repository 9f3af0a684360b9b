pub mod liveness_session;
pub mod session_config;
pub mod session_event;
pub mod session_observer;
pub mod session_runner;
pub mod session_state;
pub mod timer_set;
