#![forbid(unsafe_code)]

pub mod model;
pub mod scorer;
pub mod time;

pub use scorer::score;
pub use time::Clock;
