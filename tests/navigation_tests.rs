//! Navigation pipeline: history, guards, hooks, redirects, scroll.

mod common;

use common::*;
use pollster::block_on;
use route_navigator::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn router_with(options: RouterOptions) -> Router {
    init_logging();
    Router::new(options.routes(blog_routes())).unwrap()
}

#[test]
fn test_router_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Router>();
}

#[test]
fn test_push_back_forward() {
    let router = blog_router();
    block_on(async {
        assert!(router.start().await.is_success());
        assert!(!router.can_go_back());

        router.push("/about").await;
        router.push("/posts/42").await;
        assert_eq!(router.location(), "/posts/42");
        assert_eq!(router.history_len(), 3);

        let back = router.back().await.unwrap();
        assert_eq!(back.path(), Some("/about"));
        assert_eq!(router.current_route().unwrap().name.as_deref(), Some("about"));
        assert!(router.can_go_forward());

        let forward = router.forward().await.unwrap();
        assert_eq!(forward.path(), Some("/posts/42"));
        assert!(router.forward().await.is_none());

        let home = router.go(-2).await.unwrap();
        assert_eq!(home.path(), Some("/"));
        assert!(router.back().await.is_none());
    });
}

#[test]
fn test_replace_keeps_history_length() {
    let router = blog_router();
    block_on(async {
        router.start().await;
        router.push("/about").await;
        let result = router.replace("/posts").await;

        assert!(result.is_success());
        assert_eq!(router.history_len(), 2);
        assert_eq!(router.location(), "/posts");
    });
}

#[test]
fn test_push_named_route() {
    let router = blog_router();
    block_on(async {
        let target = NavigationTarget::named("postDetail")
            .param("postId", "7")
            .query("ref", "home");
        let result = router.push(target).await;

        assert_eq!(result.path(), Some("/posts/7?ref=home"));
        let route = router.current_route().unwrap();
        assert_eq!(matched_names(&route), ["posts", "postDetail"]);
        assert_eq!(route.query.get("ref"), Some("home"));
    });
}

#[test]
fn test_back_to_named_entry_keeps_reserved_characters() {
    let router = blog_router();
    block_on(async {
        router.start().await;
        let target = NavigationTarget::named("postDetail").param("postId", "q?x#y");
        let result = router.push(target).await;
        assert_eq!(result.path(), Some("/posts/q%3Fx%23y"));

        router.push("/about").await;
        router.back().await.unwrap();

        let route = router.current_route().unwrap();
        assert_eq!(route.params.get("postId"), Some("q?x#y"));
        assert!(route.query.is_empty());
        assert_eq!(route.hash, None);
    });
}

#[test]
fn test_named_missing_param_has_no_side_effects() {
    let router = blog_router();
    block_on(async {
        router.start().await;
        let result = router.push(NavigationTarget::named("postDetail")).await;

        assert!(matches!(
            result.error(),
            Some(NavigationError::MissingParam { .. })
        ));
        assert_eq!(router.history_len(), 1);
        assert_eq!(router.location(), "/");
    });
}

#[test]
fn test_unmatched_path_without_catch_all() {
    init_logging();
    let router = Router::new(RouterOptions::new().routes([
        RouteRecord::new("/"),
        RouteRecord::new("/about"),
    ]))
    .unwrap();

    block_on(async {
        router.start().await;
        let result = router.push("/missing").await;
        assert_eq!(
            result,
            NavigationResult::NotFound {
                path: "/missing".into()
            }
        );
        assert_eq!(router.current_route().unwrap().path, "/");
    });
}

#[test]
fn test_not_found_route_fallback() {
    init_logging();
    let router = Router::new(
        RouterOptions::new()
            .routes([
                RouteRecord::new("/"),
                RouteRecord::new("/404").name("missing"),
            ])
            .not_found("missing"),
    )
    .unwrap();

    block_on(async {
        let result = router.push("/nope?x=1").await;
        assert_eq!(result.path(), Some("/nope?x=1"));
        let route = router.current_route().unwrap();
        assert_eq!(route.name.as_deref(), Some("missing"));
        assert_eq!(route.path, "/nope");
    });
}

#[test]
fn test_unknown_not_found_route_rejected() {
    let result = Router::new(RouterOptions::new().route(RouteRecord::new("/")).not_found("nope"));
    assert_eq!(
        result.unwrap_err(),
        ConfigError::UnknownNotFoundRoute {
            name: "nope".into()
        }
    );
}

#[test]
fn test_requires_auth_blocks_without_side_effects() {
    let recorder = Recorder::default();
    let checks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&checks);
    let router = router_with(
        RouterOptions::new()
            .hook(recorder.clone())
            .authorization(move |_request| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            }),
    );

    block_on(async {
        router.start().await;
        let before = recorder.events();

        let result = router.push("/account/settings").await;
        assert!(result.is_blocked());
        assert_eq!(result.blocked_reason(), Some("Authentication required"));
        assert_eq!(router.history_len(), 1);
        assert_eq!(router.current_route().unwrap().path, "/");
        assert_eq!(recorder.events(), before);

        router.push("/about").await;
        assert_eq!(checks.load(Ordering::SeqCst), 1);
    });
}

#[test]
fn test_requires_auth_allows_authorized() {
    let router = router_with(RouterOptions::new().authorization(|_| true));
    block_on(async {
        let result = router.push("/account").await;
        assert!(result.is_success());
        let route = router.current_route().unwrap();
        assert_eq!(matched_names(&route), ["account"]);
    });
}

#[test]
fn test_auth_redirects_to_login() {
    let router = router_with(
        RouterOptions::new().auth_guard(AuthGuard::new(|_| false).redirect_to("/login")),
    );
    block_on(async {
        router.start().await;
        let result = router.push("/account/settings").await;

        assert_eq!(result.path(), Some("/login"));
        let route = router.current_route().unwrap();
        assert_eq!(route.name.as_deref(), Some("login"));
        assert_eq!(route.redirected_from.as_deref(), Some("/account/settings"));
        assert_eq!(router.history_len(), 2);
    });
}

#[test]
fn test_record_redirect() {
    let router = blog_router();
    block_on(async {
        let result = router.push("/blog").await;
        assert_eq!(result.path(), Some("/posts"));
        let route = router.current_route().unwrap();
        assert_eq!(route.redirected_from.as_deref(), Some("/blog"));
        assert_eq!(matched_names(&route), ["posts", "postList"]);
    });
}

#[test]
fn test_redirect_loop_is_capped() {
    init_logging();
    let router = Router::new(RouterOptions::new().routes([
        RouteRecord::new("/"),
        RouteRecord::new("/ping").redirect("/pong"),
        RouteRecord::new("/pong").redirect("/ping"),
    ]))
    .unwrap();

    block_on(async {
        router.start().await;
        let result = router.push("/ping").await;
        assert!(matches!(
            result.error(),
            Some(NavigationError::RedirectLoop { depth: 5, .. })
        ));
        assert_eq!(router.location(), "/");
    });
}

#[test]
fn test_guard_redirect_loop_is_capped() {
    let router = router_with(
        RouterOptions::new().guard(guard_fn(|_| NavigationAction::redirect("/about"))),
    );
    block_on(async {
        let result = router.push("/posts").await;
        assert!(matches!(
            result,
            NavigationResult::Error(NavigationError::RedirectLoop { .. })
        ));
        assert!(router.current_route().is_none());
    });
}

#[test]
fn test_per_route_guard_protects_children() {
    init_logging();
    let router = Router::new(RouterOptions::new().routes([
        RouteRecord::new("/"),
        RouteRecord::new("/admin")
            .guard(guard_fn(|request| {
                if request.to.query.contains("token") {
                    NavigationAction::Continue
                } else {
                    NavigationAction::deny("token required")
                }
            }))
            .children([RouteRecord::new("users")]),
    ]))
    .unwrap();

    block_on(async {
        let denied = router.push("/admin/users").await;
        assert_eq!(
            denied,
            NavigationResult::Blocked {
                reason: "token required".into()
            }
        );
        assert!(router.push("/admin/users?token=1").await.is_success());
    });
}

#[test]
fn test_hooks_see_committed_navigation() {
    let recorder = Recorder::default();
    let router = router_with(RouterOptions::new().hook(recorder.clone()));

    block_on(async {
        router.start().await;
        router.push("/about").await;
    });

    assert_eq!(
        recorder.events(),
        ["before:/", "after:/", "before:/about", "after:/about"]
    );
}

#[test]
fn test_request_carries_from_and_direction() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let router = router_with(RouterOptions::new().hook(hook_fn(
        |_| {},
        move |request| {
            let from = request.from.as_ref().map(|route| route.path.clone());
            log.lock().unwrap().push((from, request.direction));
        },
    )));

    block_on(async {
        router.start().await;
        router.push("/about").await;
        router.back().await;
    });

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (None, NavigationDirection::Initial),
            (Some("/".to_string()), NavigationDirection::Push),
            (Some("/about".to_string()), NavigationDirection::Back),
        ]
    );
}

#[test]
fn test_default_scroll_is_top() {
    let router = blog_router();
    block_on(async {
        let result = router.push("/about").await;
        assert_eq!(result.scroll(), Some(ScrollPosition::TOP));
    });
}

#[test]
fn test_scroll_restored_on_back() {
    let router = router_with(
        RouterOptions::new()
            .scroll_behavior(|_to, _from, saved| scroll::restore_or_top(saved)),
    );

    block_on(async {
        router.start().await;
        router.save_scroll_position(ScrollPosition::new(640.0, 0.0));

        let pushed = router.push("/about").await;
        assert_eq!(pushed.scroll(), Some(ScrollPosition::TOP));

        let back = router.back().await.unwrap();
        assert_eq!(back.scroll(), Some(ScrollPosition::new(640.0, 0.0)));
    });
}

#[test]
fn test_replace_drops_saved_scroll() {
    let router = router_with(
        RouterOptions::new()
            .scroll_behavior(|_to, _from, saved| scroll::restore_or_top(saved)),
    );

    block_on(async {
        router.start().await;
        router.push("/about").await;
        router.save_scroll_position(ScrollPosition::new(300.0, 0.0));

        router.replace("/posts").await;
        router.back().await.unwrap();
        let forward = router.forward().await.unwrap();

        assert_eq!(forward.path(), Some("/posts"));
        assert_eq!(forward.scroll(), Some(ScrollPosition::TOP));
    });
}

#[test]
fn test_scroll_behavior_can_opt_out() {
    let router = router_with(RouterOptions::new().scroll_behavior(|to, _, _| {
        if to.is_within("posts") {
            None
        } else {
            Some(ScrollPosition::TOP)
        }
    }));

    block_on(async {
        assert_eq!(router.push("/posts/3").await.scroll(), None);
        assert_eq!(router.push("/about").await.scroll(), Some(ScrollPosition::TOP));
    });
}

#[test]
fn test_hrefs_follow_history_mode() {
    let web = router_with(RouterOptions::new().history(MemoryHistory::new(HistoryMode::web("/app"))));
    assert_eq!(web.href("/posts/1").unwrap(), "/app/posts/1");

    let hash = router_with(RouterOptions::new().history(MemoryHistory::new(HistoryMode::hash("/"))));
    assert_eq!(
        hash.href(NavigationTarget::named("postDetail").param("postId", "1"))
            .unwrap(),
        "#/posts/1"
    );
}

#[test]
fn test_start_uses_history_location() {
    let history = MemoryHistory::starting_at(HistoryMode::web(""), "/posts/9");
    let router = router_with(RouterOptions::new().history(history));
    block_on(async {
        let result = router.start().await;
        assert_eq!(result.path(), Some("/posts/9"));
        assert_eq!(router.history_len(), 1);
    });
}

#[test]
fn test_case_sensitive_option() {
    init_logging();
    let router = Router::new(
        RouterOptions::new()
            .routes([RouteRecord::new("/About").name("about")])
            .sensitive(true),
    )
    .unwrap();
    assert!(router.resolve(&"/About".into()).is_ok());
    assert!(router.resolve(&"/about".into()).unwrap_err().is_not_found());
}

#[cfg(feature = "cache")]
#[test]
fn test_resolution_cache_stats() {
    let router = blog_router();
    router.resolve(&"/posts/1".into()).unwrap();
    router.resolve(&"/posts/1".into()).unwrap();
    router.resolve(&NavigationTarget::named("about")).unwrap();

    let stats = router.cache_stats().unwrap();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);

    let uncached = router_with(RouterOptions::new().cache_capacity(0));
    assert!(uncached.cache_stats().is_none());
}
