pub mod lenient;
pub mod retry;
pub mod time;
