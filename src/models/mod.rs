pub mod budget;
pub mod collection;
pub mod compensation;
pub mod dpr;
pub mod estimate;
pub mod hearing;
pub mod money;
pub mod payable;
pub mod project;
pub mod receipt;
pub mod record;
pub mod rti;
pub mod site_progress;
pub mod status;
pub mod valuation;
pub mod workspace;

pub use collection::Collection;
pub use money::Amount;
pub use record::Record;
