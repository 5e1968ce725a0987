pub mod app_settings;
pub mod books;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod html_content;
pub mod logger;
pub mod references;
pub mod sync;
pub mod types;
pub mod usx;
pub mod verse_table;
pub mod walker;

pub use error::{ConversionError, ReferenceError};
pub use extractor::{separate_verses, PassageExtractor};
pub use formats::{convert_book, usx_to_html, usx_to_html_verses, usx_to_txt, ConvertOptions};
pub use references::{parse_book_reference, PassageRange, VerseId};
pub use sync::sync_verses;
pub use types::{BookOutputs, SeparatedItem, SyncedRow, VerseSlot};
pub use verse_table::CanonicalVerseTable;

/// File extension of USX source files
pub static USX_EXTENSION: &str = "usx";
