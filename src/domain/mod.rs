pub mod date_codec;
pub mod diary;
pub mod document;
pub mod entry;
pub mod listing;
pub mod merge;
pub mod month;

pub use date_codec::*;
pub use diary::*;
pub use document::*;
pub use entry::*;
pub use listing::*;
pub use merge::*;
pub use month::*;
