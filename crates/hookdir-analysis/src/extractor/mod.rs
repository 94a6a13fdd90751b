//! Call-Site Extractor — literal hook names from registration calls.

pub mod callees;
pub mod extractor;

pub use callees::CalleeTable;
pub use extractor::CallSiteExtractor;
