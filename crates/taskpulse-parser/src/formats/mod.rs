mod csv_export;
mod dates;

pub use csv_export::parse_tabular;
pub use dates::{ExplicitFormats, LenientInterpreter, DEFAULT_DATE_FORMATS};
