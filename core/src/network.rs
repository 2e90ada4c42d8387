pub mod banner;
pub mod limiter;
pub mod tcp;
