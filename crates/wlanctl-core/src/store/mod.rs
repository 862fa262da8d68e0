// ── Record storage ──
//
// `RecordStore` holds the selected group's editable records;
// `WlanCatalog` is the read-mostly view across many groups.

mod catalog;
mod records;

pub use catalog::WlanCatalog;
pub use records::RecordStore;
