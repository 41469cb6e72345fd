/// Data layer: core types, loading, lookup and formatting.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse first sheet → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  columns, rows, distinct values per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  account name / currency → first matching Record
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  format  │  Record → "Account Details:" text block
///   └──────────┘
/// ```

pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
