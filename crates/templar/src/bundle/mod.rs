//! Message bundles.
//!
//! A bundle maps dotted message keys to raw templates for one (basename,
//! locale) pair. Bundles come from a [`BundleProvider`]; lookup walks the
//! locale fallback chain from the most specific candidate down to the root.

mod error;
mod fallback;
mod properties;
mod provider;

pub use error::{LoadError, ParseError};
pub use fallback::{bundle_suffix, candidate_suffixes};
pub use properties::Properties;
pub use provider::{Bundle, BundleProvider, DirectoryProvider, MemoryProvider};
