pub mod sale;
pub mod tract;
pub mod trend;

pub use sale::*;
pub use tract::*;
pub use trend::*;
