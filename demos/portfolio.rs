//! Portfolio Demo
//!
//! The four-page portfolio site (Home, About, Projects, Contact) on web
//! history. Projects loads lazily; the "mount" step is a hook that prints the
//! matched components. Run with `RUST_LOG=debug` to see the pipeline.

use route_navigator::{
    hook_fn, Component, ComponentId, HistoryMode, MemoryHistory, NavigationResult,
    NavigationTarget, RouteRecord, Router, RouterOptions, ScrollPosition,
};

fn main() {
    env_logger::init();

    let router = Router::new(
        RouterOptions::new()
            .history(MemoryHistory::new(HistoryMode::web("/")))
            .routes([
                RouteRecord::new("/")
                    .name("Home")
                    .component(Component::page("HomePage")),
                RouteRecord::new("/about")
                    .name("About")
                    .component(Component::page("AboutPage")),
                RouteRecord::new("/projects")
                    .name("Projects")
                    .component(Component::lazy(|| async {
                        Ok(ComponentId::new("ProjectsPage"))
                    })),
                RouteRecord::new("/contact")
                    .name("Contact")
                    .component(Component::page("ContactPage")),
                RouteRecord::new("/:pathMatch(.*)*")
                    .name("NotFound")
                    .component(Component::page("NotFoundPage")),
            ])
            .hook(hook_fn(
                |_| {},
                |request| {
                    let mounted: Vec<String> = request
                        .to
                        .components()
                        .filter_map(Component::ready)
                        .map(|id| id.to_string())
                        .collect();
                    println!("  mount {:?} for {}", mounted, request.to.full_path);
                },
            )),
    )
    .expect("portfolio routes are valid");

    pollster::block_on(async {
        report("start", router.start().await);
        report("push /about", router.push("/about").await);

        router.save_scroll_position(ScrollPosition::new(320.0, 0.0));
        report(
            "push Projects",
            router.push(NavigationTarget::named("Projects")).await,
        );
        report("push /contact?from=nav", router.push("/contact?from=nav").await);
        report("push /blog", router.push("/blog").await);

        if let Some(result) = router.back().await {
            report("back", result);
        }
    });

    for name in ["Home", "About", "Projects", "Contact"] {
        let href = router
            .href(NavigationTarget::named(name))
            .expect("named route exists");
        println!("<a href=\"{href}\">{name}</a>");
    }
}

fn report(action: &str, result: NavigationResult) {
    match result {
        NavigationResult::Success { path, scroll } => {
            println!("{action}: now at {path}, scroll to {scroll:?}");
        }
        other => println!("{action}: {other:?}"),
    }
}
