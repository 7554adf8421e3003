pub mod cluster;
pub mod filter;
pub mod progress;
pub mod region;
pub mod view;

// Re-export commonly used types
pub use cluster::*;
pub use filter::*;
pub use progress::*;
pub use region::*;
pub use view::*;
