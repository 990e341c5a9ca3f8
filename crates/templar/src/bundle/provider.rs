//! Bundle stores: the collaborator that resolves (basename, locale) to a
//! key/value bundle.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use bon::Builder;
use icu_locale_core::Locale;
use tracing::{debug, trace};

use crate::bundle::error::{LoadError, ParseError};
use crate::bundle::fallback::{bundle_suffix, load_chain};
use crate::bundle::properties::Properties;

/// A resolved bundle: the merged keys of every candidate found along the
/// locale fallback chain.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    properties: Properties,
    chain: Vec<String>,
}

impl Bundle {
    pub(crate) fn new(properties: Properties, chain: Vec<String>) -> Self {
        Self { properties, chain }
    }

    /// Get the raw message for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Defined keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Suffixes of the candidates this bundle was merged from, most specific
    /// first. The root bundle has the empty suffix.
    pub fn loaded_from(&self) -> &[String] {
        &self.chain
    }
}

/// Resolves a (basename, locale) pair to a bundle.
///
/// Implementations must tolerate concurrent readers.
pub trait BundleProvider: Send + Sync {
    fn bundle(&self, basename: &str, locale: &Locale) -> Result<Arc<Bundle>, LoadError>;
}

fn not_found(basename: &str, locale: &Locale) -> LoadError {
    LoadError::NotFound {
        basename: basename.to_string(),
        locale: locale.to_string(),
    }
}

// =========================================================================
// MemoryProvider
// =========================================================================

/// Bundles registered in memory, keyed by basename and bundle suffix.
///
/// # Example
///
/// ```
/// use templar::Properties;
/// use templar::bundle::{BundleProvider, MemoryProvider};
///
/// let provider = MemoryProvider::new()
///     .with_root("messages", [("hello", "Hello")].into_iter().collect::<Properties>())
///     .with_bundle(
///         "messages",
///         &"de".parse().unwrap(),
///         [("hello", "Hallo")].into_iter().collect::<Properties>(),
///     );
///
/// let bundle = provider.bundle("messages", &"de-AT".parse().unwrap()).unwrap();
/// assert_eq!(bundle.get("hello"), Some("Hallo"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryProvider {
    bundles: HashMap<(String, String), Properties>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bundle for exactly `locale`.
    pub fn with_bundle(
        mut self,
        basename: impl Into<String>,
        locale: &Locale,
        properties: Properties,
    ) -> Self {
        self.insert(basename, bundle_suffix(locale), properties);
        self
    }

    /// Register the root bundle, used when no locale-specific bundle matches.
    pub fn with_root(mut self, basename: impl Into<String>, properties: Properties) -> Self {
        self.insert(basename, String::new(), properties);
        self
    }

    /// Register a bundle under an explicit suffix (`""` for the root).
    pub fn insert(
        &mut self,
        basename: impl Into<String>,
        suffix: impl Into<String>,
        properties: Properties,
    ) {
        self.bundles
            .insert((basename.into(), suffix.into()), properties);
    }
}

impl BundleProvider for MemoryProvider {
    fn bundle(&self, basename: &str, locale: &Locale) -> Result<Arc<Bundle>, LoadError> {
        let bundle = load_chain(locale, |suffix| {
            Ok(self
                .bundles
                .get(&(basename.to_string(), suffix.to_string()))
                .cloned())
        })?;
        bundle
            .map(Arc::new)
            .ok_or_else(|| not_found(basename, locale))
    }
}

// =========================================================================
// DirectoryProvider
// =========================================================================

/// Bundles read from `<root>/<basename>[_<suffix>].<extension>` files.
///
/// The basename may contain `/` to address subdirectories. Without caching,
/// every lookup re-reads the files, so edits are picked up immediately.
///
/// # Example
///
/// ```no_run
/// use templar::bundle::{BundleProvider, DirectoryProvider};
///
/// let provider = DirectoryProvider::builder()
///     .root("assets/i18n")
///     .cache(true)
///     .build();
/// let bundle = provider.bundle("errors", &"en-GB".parse().unwrap())?;
/// println!("{} keys", bundle.len());
/// # Ok::<(), templar::bundle::LoadError>(())
/// ```
#[derive(Debug, Builder)]
#[builder(on(String, into))]
pub struct DirectoryProvider {
    /// Directory the basenames are relative to.
    #[builder(into)]
    root: PathBuf,

    /// File extension of bundle files, without the dot.
    #[builder(default = "properties".to_string())]
    extension: String,

    /// Keep resolved bundles in memory, keyed by (basename, locale).
    #[builder(default)]
    cache: bool,

    #[builder(skip)]
    cached: RwLock<HashMap<(String, String), Arc<Bundle>>>,
}

impl DirectoryProvider {
    /// Create an uncached provider reading `.properties` files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryProvider::builder().root(root).build()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the bundle file for `basename` with the given suffix.
    pub fn bundle_path(&self, basename: &str, suffix: &str) -> PathBuf {
        let file = if suffix.is_empty() {
            format!("{basename}.{}", self.extension)
        } else {
            format!("{basename}_{suffix}.{}", self.extension)
        };
        self.root.join(file)
    }

    /// Drop every cached bundle.
    pub fn clear_cache(&self) {
        self.cached
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached bundles.
    pub fn cache_len(&self) -> usize {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn load_file(&self, path: &Path) -> Result<Option<Properties>, LoadError> {
        if !path.is_file() {
            trace!(path = %path.display(), "bundle candidate absent");
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let properties = Properties::parse(&content).map_err(|e| match e {
            ParseError::Syntax {
                line,
                column,
                message,
            } => LoadError::Parse {
                path: path.to_path_buf(),
                line,
                column,
                message,
            },
        })?;
        debug!(path = %path.display(), keys = properties.len(), "loaded bundle file");
        Ok(Some(properties))
    }

    fn load(&self, basename: &str, locale: &Locale) -> Result<Arc<Bundle>, LoadError> {
        let bundle = load_chain(locale, |suffix| {
            self.load_file(&self.bundle_path(basename, suffix))
        })?;
        bundle
            .map(Arc::new)
            .ok_or_else(|| not_found(basename, locale))
    }
}

impl BundleProvider for DirectoryProvider {
    fn bundle(&self, basename: &str, locale: &Locale) -> Result<Arc<Bundle>, LoadError> {
        if !self.cache {
            return self.load(basename, locale);
        }

        let key = (basename.to_string(), locale.to_string());
        {
            let cached = self.cached.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(bundle) = cached.get(&key) {
                trace!(basename, %locale, "bundle cache hit");
                return Ok(Arc::clone(bundle));
            }
        }

        let bundle = self.load(basename, locale)?;
        self.cached
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&bundle));
        Ok(bundle)
    }
}
