pub mod capture;
pub mod pose;
pub mod session;
pub mod shared;
pub mod video;
