mod adapter;
mod builder;
mod transport;

pub use adapter::{export_day_end, preview_day_end, DayEndExport};
pub use builder::{
    build_entries, decimal_hours, export_row, prepare_export_data, EntryKind, EntryValue,
    ExportEntry, ExportItem, ExportPayload,
};
pub use transport::{ExportTransport, SheetsTransport};
