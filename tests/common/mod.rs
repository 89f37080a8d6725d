//! Test utilities shared by the integration tests.
//!
//! Provides route table fixtures, a recording hook and logging setup.

#![allow(dead_code)]

use route_navigator::*;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Route logs to the test output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The four-page portfolio site plus a catch-all.
pub fn portfolio_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/")
            .name("Home")
            .component(Component::page("HomePage")),
        RouteRecord::new("/about")
            .name("About")
            .component(Component::page("AboutPage")),
        RouteRecord::new("/projects")
            .name("Projects")
            .component(Component::page("ProjectsPage")),
        RouteRecord::new("/contact")
            .name("Contact")
            .component(Component::page("ContactPage")),
        RouteRecord::new("/:pathMatch(.*)*")
            .name("NotFound")
            .component(Component::page("NotFoundPage")),
    ]
}

/// Blog table: nested posts, an account area behind `requiresAuth`, an
/// alias and a record redirect.
pub fn blog_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/")
            .name("home")
            .alias("/home")
            .component(Component::page("HomePage")),
        RouteRecord::new("/about")
            .name("about")
            .component(Component::page("AboutPage")),
        RouteRecord::new("/posts")
            .name("posts")
            .component(Component::page("PostsLayout"))
            .meta("title", "Posts")
            .children([
                RouteRecord::new("")
                    .name("postList")
                    .component(Component::page("PostList")),
                RouteRecord::new(":postId")
                    .name("postDetail")
                    .component(Component::page("PostDetail"))
                    .meta("title", "Post"),
            ]),
        RouteRecord::new("/account")
            .name("account")
            .meta("requiresAuth", true)
            .component(Component::page("AccountLayout"))
            .children([RouteRecord::new("settings")
                .name("settings")
                .component(Component::page("SettingsPage"))]),
        RouteRecord::new("/login")
            .name("login")
            .component(Component::page("LoginPage")),
        RouteRecord::new("/blog").redirect("/posts"),
        RouteRecord::new("/:pathMatch(.*)*")
            .name("notFound")
            .component(Component::page("NotFoundPage")),
    ]
}

/// Router over `blog_routes` with in-memory history.
pub fn blog_router() -> Router {
    Router::new(RouterOptions::new().routes(blog_routes())).unwrap()
}

/// Names of the matched records, root first.
pub fn matched_names(route: &ResolvedRoute) -> Vec<String> {
    route
        .matched
        .iter()
        .map(|record| record.route_name().unwrap_or("<unnamed>").to_string())
        .collect()
}

/// Hook that records `before:<path>` / `after:<path>` events.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl NavigationHook for Recorder {
    fn before_each(&self, request: &NavigationRequest) {
        self.events
            .lock()
            .unwrap()
            .push(format!("before:{}", request.to.full_path));
    }

    fn after_each(&self, request: &NavigationRequest) {
        self.events
            .lock()
            .unwrap()
            .push(format!("after:{}", request.to.full_path));
    }

    fn name(&self) -> &'static str {
        "Recorder"
    }
}

/// A future that stays pending until [`Gate::open`] is called.
#[derive(Default)]
pub struct Gate {
    open: AtomicBool,
    waker: Mutex<Option<Waker>>,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        if let Some(waker) = self.waker.lock().unwrap().take() {
            waker.wake();
        }
    }

    pub fn wait(self: Arc<Self>) -> GateFuture {
        GateFuture(self)
    }
}

pub struct GateFuture(Arc<Gate>);

impl Future for GateFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0.open.load(Ordering::SeqCst) {
            return Poll::Ready(());
        }
        *self.0.waker.lock().unwrap() = Some(cx.waker().clone());
        if self.0.open.load(Ordering::SeqCst) {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// A lazy component that opens `started` when its loader runs and
/// resolves to `id` once `release` opens.
pub fn gated_component(started: &Arc<Gate>, release: &Arc<Gate>, id: &'static str) -> Component {
    let started = Arc::clone(started);
    let release = Arc::clone(release);
    Component::lazy(move || {
        started.open();
        let release = Arc::clone(&release);
        async move {
            release.wait().await;
            Ok(ComponentId::new(id))
        }
    })
}
