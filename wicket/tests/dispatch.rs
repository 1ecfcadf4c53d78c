use futures::FutureExt;
use http::{HeaderValue, StatusCode, header::CONTENT_LENGTH};
use regex::Regex;
use std::sync::Arc;
use wicket::{
    BoxError, Context, Handler, IntoResponse, Method, Outcome, Request, Response, Router,
    RouterConfig, StatusText, WicketError, compose, error_fn, handler_fn,
    testing::{Recorder, request},
};

mod common;
use common::{EchoParams, Trail, body_text, trail};

#[tokio::test]
async fn test_static_route() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .get("/about", recorder.responds("about", StatusCode::OK))
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/about")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(&res), "about");
}

#[tokio::test]
async fn test_params_reach_handler() {
    let mut builder = Router::builder();
    builder
        .get("/users/:id/books/:title", EchoParams)
        .unwrap()
        .get("/foo/:bar?/:baz", EchoParams)
        .unwrap()
        .get("/static/*", EchoParams)
        .unwrap();
    let router = builder.build();

    let res = router
        .run(request(Method::Get, "/users/42/books/dune"))
        .await
        .unwrap();
    assert_eq!(body_text(&res), "id=42&title=dune");

    let res = router.run(request(Method::Get, "/foo/baz")).await.unwrap();
    assert_eq!(body_text(&res), "baz=baz");

    let res = router.run(request(Method::Get, "/foo/x/baz")).await.unwrap();
    assert_eq!(body_text(&res), "bar=x&baz=baz");

    let res = router
        .run(request(Method::Get, "/static/js/app.js"))
        .await
        .unwrap();
    assert_eq!(body_text(&res), "wild=js/app.js");
}

#[tokio::test]
async fn test_regex_route() {
    let mut builder = Router::builder();
    builder
        .get(Regex::new(r"^/v(?P<version>\d+)/ping$").unwrap(), EchoParams)
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/v3/ping")).await.unwrap();
    assert_eq!(body_text(&res), "version=3");
}

#[tokio::test]
async fn test_static_table_precedence() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .get("/users/:id", recorder.responds("dynamic", StatusCode::OK))
        .unwrap()
        .get("/users/me", recorder.responds("static", StatusCode::OK))
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/users/me")).await.unwrap();
    assert_eq!(body_text(&res), "static");
}

#[tokio::test]
async fn test_earliest_dynamic_wins() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .get("/posts/:slug", recorder.responds("general", StatusCode::OK))
        .unwrap()
        .get("/posts/:slug.json", recorder.responds("specific", StatusCode::OK))
        .unwrap();
    let router = builder.build();

    let res = router
        .run(request(Method::Get, "/posts/hello.json"))
        .await
        .unwrap();
    assert_eq!(body_text(&res), "general");
}

#[tokio::test]
async fn test_not_found_uses_canned_text() {
    let router = Router::builder().build();

    let res = router.run(request(Method::Get, "/missing")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(&res), "Not Found");
    assert!(res.headers().is_empty());
}

#[tokio::test]
async fn test_method_mismatch_is_not_found() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .post("/items", recorder.responds("create", StatusCode::CREATED))
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/items")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_injected_status_text() {
    let mut builder = Router::builder();
    builder.config(
        RouterConfig::new()
            .with_status_text(StatusText::new().with(StatusCode::NOT_FOUND, "no such page")),
    );
    let router = builder.build();

    let res = router.run(request(Method::Get, "/missing")).await.unwrap();
    assert_eq!(body_text(&res), "no such page");

    // other routers keep the canonical text
    let res = Router::builder()
        .build()
        .run(request(Method::Get, "/missing"))
        .await
        .unwrap();
    assert_eq!(body_text(&res), "Not Found");
}

#[tokio::test]
async fn test_handler_fault_is_500_with_message() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder.get("/boom", recorder.fails("database unavailable")).unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/boom")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(&res), "database unavailable");
}

#[tokio::test]
async fn test_handler_panic_is_500() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder.get("/panic", recorder.panics("kaboom")).unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/panic")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(&res), "handler panicked: kaboom");
}

#[tokio::test]
async fn test_error_handler_sees_status_and_fault() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .get("/boom", recorder.fails("disk full"))
        .unwrap()
        .on_error(error_fn(|_req, ctx| {
            async move {
                let status = ctx.status().unwrap_or(StatusCode::IM_A_TEAPOT);
                let detail = ctx
                    .error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "none".into());
                Ok((status, format!("{}: {detail}", status.as_u16())).into_response())
            }
            .boxed()
        }));
    let router = builder.build();

    let res = router.run(request(Method::Get, "/boom")).await.unwrap();
    assert_eq!(body_text(&res), "500: disk full");

    let res = router.run(request(Method::Get, "/nope")).await.unwrap();
    assert_eq!(body_text(&res), "404: none");
}

#[tokio::test]
async fn test_error_handler_fault_escapes_run() {
    let mut builder = Router::builder();
    builder.on_error(error_fn(|_req, _ctx| {
        async { Err::<Response, BoxError>("renderer down".into()) }.boxed()
    }));
    let router = builder.build();

    let err = router
        .run(request(Method::Get, "/missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, WicketError::ErrorHandler(_)));
}

#[tokio::test]
async fn test_continue_becomes_empty_ok() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder.put("/items/1", recorder.continues("update")).unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Put, "/items/1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body().as_deref(), Some(&b""[..]));
}

#[tokio::test]
async fn test_prepare_runs_before_routing() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .prepare(recorder.continues("prepare"))
        .get("/", recorder.responds("root", StatusCode::OK))
        .unwrap();
    let router = builder.build();

    router.run(request(Method::Get, "/")).await.unwrap();
    router.run(request(Method::Get, "/missing")).await.unwrap();
    assert_eq!(recorder.calls(), ["prepare", "root", "prepare"]);
}

#[tokio::test]
async fn test_prepare_short_circuit_still_drains() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .prepare(compose![
            Trail("prepare"),
            recorder.responds("blocked", StatusCode::FORBIDDEN)
        ])
        .get("/", recorder.responds("root", StatusCode::OK))
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(trail(&res), ["prepare"]);
    assert_eq!(recorder.calls(), ["blocked"]);
}

#[tokio::test]
async fn test_prepare_fault_is_500() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .prepare(recorder.fails("auth backend down"))
        .get("/", recorder.responds("root", StatusCode::OK))
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(&res), "auth backend down");
    assert_eq!(recorder.calls(), ["auth backend down"]);
}

#[tokio::test]
async fn test_deferrals_run_lifo_across_stages() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .prepare(recorder.defers("prepare"))
        .get(
            "/",
            compose![
                recorder.defers("a"),
                recorder.defers("b"),
                recorder.responds("handler", StatusCode::OK)
            ],
        )
        .unwrap();
    let router = builder.build();

    router.run(request(Method::Get, "/")).await.unwrap();
    assert_eq!(recorder.calls(), ["handler", "b", "a", "prepare"]);
}

#[tokio::test]
async fn test_deferrals_run_on_error_responses() {
    let mut builder = Router::builder();
    builder.prepare(Trail("cors"));
    let router = builder.build();

    let res = router.run(request(Method::Get, "/missing")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(trail(&res), ["cors"]);
}

#[tokio::test]
async fn test_deferral_fault_does_not_abort() {
    let mut builder = Router::builder();
    builder
        .get(
            "/",
            handler_fn(|_req, ctx| {
                async move {
                    ctx.defer(|res| {
                        res.headers_mut()
                            .insert("x-cache", HeaderValue::from_static("MISS"));
                    });
                    ctx.defer_async(|_res| {
                        async { Err::<(), BoxError>("cache write failed".into()) }.boxed()
                    });
                    Ok(Outcome::respond("fresh"))
                }
                .boxed()
            }),
        )
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Get, "/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-cache"], "MISS");
    assert_eq!(body_text(&res), "fresh");
}

#[tokio::test]
async fn test_head_request_drops_body_keeps_length() {
    let mut builder = Router::builder();
    builder
        .get(
            "/doc",
            handler_fn(|_req, _ctx| {
                async {
                    let mut res = "hello".into_response();
                    res.headers_mut()
                        .insert(CONTENT_LENGTH, HeaderValue::from_static("5"));
                    Ok(Outcome::Respond(res))
                }
                .boxed()
            }),
        )
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Head, "/doc")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.body().is_none());
    assert_eq!(res.headers()[CONTENT_LENGTH], "5");
}

#[tokio::test]
async fn test_no_content_is_finalized() {
    let recorder = Recorder::new();
    let mut builder = Router::builder();
    builder
        .delete("/items/1", recorder.responds("deleted", StatusCode::NO_CONTENT))
        .unwrap();
    let router = builder.build();

    let res = router.run(request(Method::Delete, "/items/1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.body().is_none());
    assert!(res.headers().get(CONTENT_LENGTH).is_none());
}

#[tokio::test]
async fn test_bindings_reach_handlers() {
    #[derive(Clone)]
    struct Greeting(&'static str);

    struct Greet;

    impl Handler for Greet {
        async fn handle(&self, _req: &Request, ctx: &mut Context) -> Result<Outcome, BoxError> {
            let greeting = ctx
                .bindings()
                .get::<Greeting>()
                .map(|g| g.0)
                .ok_or("greeting binding missing")?;
            Ok(Outcome::respond(greeting))
        }
    }

    let mut builder = Router::builder();
    builder.get("/", Greet).unwrap();
    let router = builder.build();

    let req = request(Method::Get, "/");
    let mut bindings = http::Extensions::new();
    bindings.insert(Greeting("howdy"));
    let mut ctx = Context::from_request(&req).unwrap().with_bindings(bindings);

    let res = router.run_with(&req, &mut ctx).await.unwrap();
    assert_eq!(body_text(&res), "howdy");

    let res = router.run(request(Method::Get, "/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(&res), "greeting binding missing");
}

#[tokio::test]
async fn test_router_shared_across_tasks() {
    let mut builder = Router::builder();
    builder.get("/users/:id", EchoParams).unwrap();
    let router = Arc::new(builder.build());

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let router = Arc::clone(&router);
            tokio::spawn(async move { router.run(request(Method::Get, "/users/9")).await })
        })
        .collect();

    for task in tasks {
        let res = task.await.unwrap().unwrap();
        assert_eq!(body_text(&res), "id=9");
    }
}
