pub mod logger;
pub mod misc;
pub mod variant;
