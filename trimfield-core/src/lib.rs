// trimfield-core/src/lib.rs
//! # trimfield Core Library
//!
//! `trimfield-core` provides the platform-independent logic behind trimfield:
//! deciding whether text cleaning is active on a page, cleaning text typed or
//! pasted into form fields, and keeping a cached copy of the user's settings in
//! sync with the settings store.
//!
//! ## Modules
//!
//! * `settings`: The `Settings` object, its storage keys and lenient conversions.
//! * `rules`: URL pattern compilation, caching and the `should_apply` decision.
//! * `cleaner`: Trimming and blank-line collapsing.
//! * `store`: The `SettingsStore` trait with file and in-memory implementations.
//! * `dom`: A small element tree and the selector for text-like fields.
//! * `session`: The per-page content session that reacts to blur, paste,
//!   mutation and storage-change events.
//! * `headless`: One-shot rule check plus clean.
//! * `errors`: The library error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use trimfield_core::{clean, should_apply, Mode, Settings};
//!
//! let settings = Settings {
//!     mode: Mode::Allow,
//!     allow_list: vec!["*://example.com/*".to_string()],
//!     collapse_newlines: true,
//!     ..Settings::default()
//! };
//!
//! assert!(should_apply(&settings, "https://example.com/contact"));
//! assert!(!should_apply(&settings, "https://evil-example.com/"));
//! assert_eq!(clean(&settings, "  a\n\n\n\nb  "), "a\n\nb");
//! ```
//!
//! ## Error Handling
//!
//! Matching and cleaning never fail. Store access and settings import return
//! [`TrimfieldError`].
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod cleaner;
pub mod dom;
pub mod errors;
pub mod headless;
pub mod rules;
pub mod session;
pub mod settings;
pub mod store;

/// Re-exports the settings model.
pub use settings::{parse_list, Items, ListKind, Mode, Settings};

/// Re-exports the custom error type for clear error reporting.
pub use errors::TrimfieldError;

/// Re-exports the rule matcher.
pub use rules::compiler::{compile_pattern, get_or_compile, MAX_PATTERN_LENGTH};
pub use rules::derive::domain_pattern;
pub use rules::matcher::should_apply;
pub use rules::normalize_patterns;

/// Re-exports the text cleaner.
pub use cleaner::{clean, clean_value};

/// Re-exports storage types.
pub use store::{ChangeSet, FileStore, MemoryStore, SettingsStore, StorageArea, StorageChange};

/// Re-exports the content session and its event types.
pub use dom::{Element, ElementId, FieldKind, FieldSelector};
pub use session::{BlurEvent, ContentSession, FieldEdit, MutationRecord, PasteEvent, PasteOutcome};

/// Re-exports the one-shot helper.
pub use headless::{headless_clean, CleanOutcome};
