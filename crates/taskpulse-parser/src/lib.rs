pub mod columns;
pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use columns::{
    normalize_header, resolve_columns, ColumnMatch, ColumnResolver, ColumnRole, ColumnSynonyms,
    MatchSource, ResolvedColumns, DATE_COLUMN_POSITION, DEFAULT_STATUS_HEADER,
};
pub use errors::ParserError;
pub use formats::{parse_tabular, ExplicitFormats, LenientInterpreter, DEFAULT_DATE_FORMATS};
pub use model::{RawRecord, TabularData};
pub use registry::{parse_task_date, parse_with_strategies, DateMatch, DateParser, DateStrategy};
