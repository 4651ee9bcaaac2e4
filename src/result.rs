//! Crate-wide result alias backed by `color-eyre`.
//!
//! Promotion failures almost always need to say *where* they happened: which
//! clone directory, which manifest file, which chart source. `color_eyre`
//! reports carry that context through `.wrap_err()`/`.wrap_err_with()` as the
//! error propagates, so the user sees one chain from the failing syscall up
//! to the promotion step that triggered it.
//!
//! Typed errors a caller may want to match on live in [`crate::error`]; they
//! convert into reports automatically.
//!
//! ```rust,ignore
//! use crate::result::Result;
//!
//! fn load_registry(path: &Path) -> Result<AppRegistry> {
//!     manifest::read_yaml(path)
//!         .wrap_err_with(|| format!("failed to load app registry {}", path.display()))
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Result type used throughout gitops-promote.
pub type Result<T> = EyreResult<T>;
