pub mod household;
pub mod raw_row;
pub mod record;
pub mod registry;

pub use household::HouseholdGroup;
pub use raw_row::{CellValue, RawRow};
pub use record::{CanonicalHouseholdRecord, OUTPUT_COLUMNS};
pub use registry::{
    EnrichedRow, Flag, HouseholdType, OwnershipType, RegistrationPurpose, ResidenceType,
};
