//! Client-side route resolution and navigation for single-page applications.
//!
//! `route-navigator` owns an application's route table and turns navigation
//! targets (paths or named routes with params) into resolved routes: the
//! matched record chain from the outermost layout down to the leaf page,
//! the extracted params and the merged meta. A [`Router`] wraps the table
//! with a navigation pipeline: guards, hooks, lazy component loading,
//! history and a scroll policy.
//!
//! Rendering is left to the host. After a navigation commits, the host
//! reads [`Router::current_route`] (or listens through
//! [`NavigationHook::after_each`]) and mounts the matched components.
//!
//! # Quick start
//!
//! ```
//! use route_navigator::history::{HistoryMode, MemoryHistory};
//! use route_navigator::{Component, RouteRecord, Router, RouterOptions};
//!
//! let router = Router::new(
//!     RouterOptions::new()
//!         .history(MemoryHistory::new(HistoryMode::web("/")))
//!         .routes([
//!             RouteRecord::new("/").name("home").component(Component::page("HomePage")),
//!             RouteRecord::new("/posts")
//!                 .name("posts")
//!                 .component(Component::page("PostsLayout"))
//!                 .children([RouteRecord::new(":postId")
//!                     .name("post")
//!                     .component(Component::page("PostPage"))]),
//!             RouteRecord::new("/:pathMatch(.*)*")
//!                 .name("not-found")
//!                 .component(Component::page("NotFoundPage")),
//!         ]),
//! )
//! .unwrap();
//!
//! pollster::block_on(async {
//!     router.start().await;
//!     router.push("/posts/42").await;
//!
//!     let route = router.current_route().unwrap();
//!     assert_eq!(route.params.get("postId"), Some("42"));
//!     assert_eq!(route.matched.len(), 2);
//!
//!     router.push("/nowhere").await;
//!     assert_eq!(router.current_route().unwrap().name.as_deref(), Some("not-found"));
//! });
//! ```
//!
//! # Features
//!
//! - `log` (default): log through the `log` crate.
//! - `tracing`: log through `tracing` instead.
//! - `cache` (default): LRU cache of path resolutions.

mod logging;

pub mod action;
#[cfg(feature = "cache")]
pub mod cache;
pub mod error;
pub mod guards;
pub mod history;
pub mod hooks;
pub mod loader;
pub mod params;
pub mod pattern;
pub mod resolve;
pub mod route;
pub mod router;
pub mod scroll;
pub mod table;

pub use action::NavigationAction;
#[cfg(feature = "cache")]
pub use cache::{CacheStats, RouteCache};
pub use error::{ConfigError, NavigationError, NavigationResult};
pub use guards::{guard_fn, AuthGuard, GuardBuilder, Guards, RouteGuard};
pub use history::{History, HistoryMode, MemoryHistory};
pub use hooks::{hook_fn, NavigationHook};
pub use loader::{LazyComponent, LoadState};
pub use params::{QueryParams, RouteParams};
pub use pattern::RoutePattern;
pub use resolve::ResolvedRoute;
pub use route::{Component, ComponentId, MetaValue, NavigationTarget, RouteMeta, RouteRecord};
pub use router::{NavigationDirection, NavigationRequest, Router, RouterOptions};
pub use scroll::{ScrollBehavior, ScrollPosition};
pub use table::RouteTable;
