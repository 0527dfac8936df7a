//! Client-side page resolution and caching for tag-filtered, cursor-paginated
//! feeds.
//!
//! A feed backend orders items by an opaque cursor and answers three kinds of
//! questions: "which cursor does page N start at?" (expensive), "what is the
//! last page?" and "give me the items at this cursor" (cheap). This crate
//! keeps a directory of already-resolved page boundaries per active filter
//! and plans each navigation so that at most one boundary-resolution round
//! trip is needed, expanding outward from the nearest known page.
//!
//! Entry point is [`FeedController`], generic over a [`FeedBackend`]. The
//! bundled [`HttpBackend`] speaks the booru-style REST protocol via
//! reqwest; tests can substitute any other implementation.

mod backend;
mod controller;
mod directory;
mod filter;
mod model;
mod resolver;
mod settings;

pub use backend::{AuthTokenSource, FeedBackend, FeedError, HttpBackend, NoAuth};
pub use controller::{FeedController, FeedSnapshot};
pub use directory::PageDirectory;
pub use filter::SearchFilter;
pub use model::{Item, PageInfo};
pub use resolver::{PageResolver, ResolutionPlan};
pub use settings::{FeedSettings, SettingsError};
