mod dispatch;
pub mod fry;

pub use dispatch::dispatch;
