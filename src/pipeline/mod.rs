//! Filter → aggregate → join pipeline.
//!
//! Every stage is a pure function over borrowed records; nothing is cached
//! between calls.

pub mod aggregate;
pub mod filter;
pub mod format;
pub mod join;

pub use aggregate::{aggregate_by_month, aggregate_by_tract, kpis, median};
pub use filter::{apply, FilterCriteria, FilteredSet, GeographyScope, SizeBound, SizeRange, YearRange};
pub use join::join;
