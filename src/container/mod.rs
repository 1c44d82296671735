//! In-memory GOBS files
//!
//! A file is one [`FileHeader`](crate::FileHeader) followed by any number of
//! frames. [`GobsWriter`] produces one, [`GobsReader`] walks one.

mod options;
mod reader;
mod writer;

pub use options::Options;
pub use reader::GobsReader;
pub use writer::GobsWriter;
