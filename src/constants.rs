//! Application constants and default values

/// Rows reserved at the top of a list widget for decorations (sort mode, page index)
pub const LIST_HEADER_ROWS: u16 = 2;
/// Rows reserved at the bottom of a list widget for decorations (filter line)
pub const LIST_FOOTER_ROWS: u16 = 1;
/// Minimum whitespace between list columns
pub const COLUMN_SPACING: u16 = 1;
/// Width of one source icon cell in the source map, e.g. "[g]"
pub const ICON_CELL_WIDTH: u16 = 3;
/// Maximum length of the filter input
pub const FILTER_MAX_LEN: usize = 256;

/// Default number of columns in the source map strip
pub const SOURCE_MAP_DEFAULT_COLUMNS: u16 = 3;
pub const SOURCE_MAP_MIN_COLUMNS: u16 = 1;
pub const SOURCE_MAP_MAX_COLUMNS: u16 = 9;

/// File names used by the demo binary
pub const CONFIG_FILE_NAME: &str = "stashlist.toml";
pub const STATE_FILE_NAME: &str = "state.json";
pub const LOG_FILE_NAME: &str = "stashlist.log";
