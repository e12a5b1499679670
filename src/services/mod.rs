pub mod formatter;
pub mod providers;
pub mod recommendations;

pub use providers::{JikanProvider, MediaProvider};
