//! # Nagless - Heuristic Overlay & Paywall Filter
//!
//! Nagless continuously detects and neutralizes UI elements that obstruct
//! page content: modal dialogs, overlays, paywalls, and scroll-locking
//! styles. It operates on an explicit [`dom::Document`] value so the engine
//! can be driven and tested against a constructed, isolated tree instead of
//! a singleton global.
//!
//! ## Features
//!
//! - **Two-factor classification**: an attribute/text identity match alone
//!   never removes an element; it must be corroborated by fixed/sticky
//!   positioning, viewport coverage, or a high z-index.
//! - **Change-driven**: a [`watcher::Watcher`] re-applies remediation on
//!   every added subtree and watched-attribute change, bounded to the
//!   mutated subtree.
//! - **Tunable heuristics**: pattern groups and geometry thresholds are
//!   configuration ([`config::ScrubConfig`]), not hard-coded constants.
//! - **Defensive by design**: detached nodes, missing attributes, and
//!   unparseable style values degrade to "signal absent", never to a fault.
//!
//! ## Quick Start
//!
//! ```
//! use nagless::dom::{Document, Element, Position, Viewport};
//! use nagless::watcher::Watcher;
//!
//! let mut doc = Document::new(Viewport::new(1280.0, 800.0));
//! doc.finish_parsing();
//!
//! let mut watcher = Watcher::with_defaults();
//! watcher.observe(&mut doc);
//!
//! let body = doc.body();
//! let overlay = doc
//!     .append(
//!         body,
//!         Element::new("div")
//!             .class("paywall-overlay")
//!             .position(Position::Fixed)
//!             .z_index(999)
//!             .size(1280.0, 800.0),
//!     )
//!     .unwrap();
//!
//! watcher.pump(&mut doc);
//! assert!(!doc.is_attached(overlay));
//! ```

pub mod classifier;
pub mod config;
pub mod dom;
pub mod engine;
pub mod patterns;
pub mod watcher;

pub use classifier::Classifier;
pub use config::ScrubConfig;
pub use dom::{Document, Element, Viewport};
pub use engine::{CleanReport, Scrubber};
pub use patterns::PatternLibrary;
pub use watcher::Watcher;

/// Result type alias for Nagless operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
