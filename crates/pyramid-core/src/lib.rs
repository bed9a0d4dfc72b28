// crates/pyramid-core/src/lib.rs

//! Population pyramid datasets, chart adapters and demographic calculations.
//!
//! ```no_run
//! use pyramid_core::prelude::*;
//!
//! # fn main() -> pyramid_core::Result<()> {
//! let db = PopDb::load()?;
//! let japan = db.country_data("japan")?;
//! let chart = PyramidBuilder::from_year(japan.year(2024)?)
//!     .scale(Scale::Percent)
//!     .build();
//! assert_eq!(chart.series.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cleaner;
pub mod compare;
pub mod db;
pub mod error;
pub mod fertility;
pub mod format;
pub mod loader; // JSON directory + bincode snapshot
pub mod metrics;
pub mod model;
pub mod pyramid; // Chart adapters
pub mod search;
pub mod stage;
pub mod text;
pub mod traits;
pub mod trend;

// Re-exports
pub use crate::db::PopDb;
pub use crate::error::{PyramidError, Result};
pub use crate::model::{
    AgeGroup, CountryInfo, CountryPopulation, DbStats, StateInfo, StatePopulation, YearData,
    Years,
};
pub use crate::pyramid::{PyramidBuilder, PyramidChart, Scale, Series, Side};
pub use crate::traits::{NameMatch, PopSearch, PopulationSource, Source};

#[cfg(feature = "builder")]
pub use crate::loader::builder::{build_snapshot, CompressionMode};

pub mod prelude {
    pub use crate::compare::{side_by_side_summary, significant_differences};
    pub use crate::metrics::DemographicMetrics;
    pub use crate::pyramid::{difference_pyramid, overlay_pyramid, surplus_pyramid};
    pub use crate::{
        AgeGroup, PopDb, PopSearch, PopulationSource, PyramidBuilder, PyramidChart,
        PyramidError, Scale, YearData,
    };
}
