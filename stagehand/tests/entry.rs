mod common;

use common::{assign, echo, mounted, record, redirect};
use stagehand::{
    BoxError, Category, Controller, DispatchError, Middleware, Reply, Session, Socket, Value,
    testing::{CountingHandler, Journal},
};

#[tokio::test]
async fn scoped_middleware_runs_before_the_entry_handler() {
    let controller = Controller::builder("PageLive")
        .middleware(
            Middleware::new("mark_seen", |socket: Socket| async move {
                Ok::<_, BoxError>(socket.assign("seen", true))
            })
            .scope(|t| t.as_action() == Some("index")),
        )
        .entry("index", |socket: Socket, _params: Value| async move {
            let seen = socket.get("seen").cloned().unwrap_or_default();
            Ok::<_, BoxError>(socket.assign("seen_by_handler", seen))
        })
        .build()
        .unwrap();

    let reply = controller
        .entry(Socket::for_action("index"), Value::Nil, None)
        .await
        .unwrap();

    let Reply::Continue(socket) = reply else {
        panic!("expected Continue, got {reply:?}");
    };
    assert_eq!(socket.get("seen"), Some(&Value::Bool(true)));
    assert_eq!(socket.get("seen_by_handler"), Some(&Value::Bool(true)));
    assert!(!socket.is_mounted());
}

#[tokio::test]
async fn handler_receives_entry_params() {
    let controller = Controller::builder("PostLive")
        .entry("show", echo)
        .build()
        .unwrap();

    let params = Value::map([("id", Value::from("7"))]);
    let reply = controller
        .entry(Socket::for_action("show"), params.clone(), None)
        .await
        .unwrap();

    assert_eq!(reply.session().get("input"), Some(&params));
}

#[tokio::test]
async fn terminal_seed_skips_chain_and_handler() {
    let journal = Journal::new();
    let handler = CountingHandler::new();
    let controller = Controller::builder("AdminLive")
        .seed(|socket: Socket, data: Value| async move {
            match data.get("user") {
                Some(user) => Ok::<_, BoxError>(socket.assign("user", user.clone())),
                None => Ok(socket.redirect("/login")),
            }
        })
        .middleware(record("auth", &journal))
        .entry("index", handler.clone())
        .build()
        .unwrap();

    let reply = controller
        .entry(Socket::for_action("index"), Value::Nil, None)
        .await
        .unwrap();

    assert!(reply.is_redirect());
    assert_eq!(reply.session().redirected_to(), Some("/login"));
    assert!(journal.is_empty());
    assert_eq!(handler.count(), 0);
}

#[tokio::test]
async fn seed_data_enriches_the_session() {
    let controller = Controller::builder("AdminLive")
        .seed(|socket: Socket, data: Value| async move {
            let user = data.get("user").cloned().unwrap_or_default();
            Ok::<_, BoxError>(socket.assign("user", user))
        })
        .entry("index", echo)
        .build()
        .unwrap();

    let seed = Value::map([("user", Value::from("ada"))]);
    let reply = controller
        .entry(Socket::for_action("index"), Value::Nil, Some(seed))
        .await
        .unwrap();

    assert_eq!(reply.session().get("user"), Some(&Value::from("ada")));
}

#[tokio::test]
async fn redirect_in_chain_normalizes_to_redirect() {
    let handler = CountingHandler::new();
    let controller = Controller::builder("PageLive")
        .middleware(redirect("bounce", "/elsewhere"))
        .entry("index", handler.clone())
        .build()
        .unwrap();

    let reply = controller
        .entry(Socket::for_action("index"), Value::Nil, None)
        .await
        .unwrap();

    assert!(reply.is_redirect());
    assert_eq!(handler.count(), 0);
}

#[tokio::test]
async fn handler_redirect_normalizes_to_redirect() {
    let controller = Controller::builder("PageLive")
        .entry("index", |socket: Socket, _params: Value| async move {
            Ok::<_, BoxError>(socket.redirect("/done"))
        })
        .build()
        .unwrap();

    let reply = controller
        .entry(Socket::for_action("index"), Value::Nil, None)
        .await
        .unwrap();

    assert!(reply.is_redirect());
}

#[tokio::test]
async fn entry_keeps_options() {
    let controller = Controller::builder("PageLive")
        .entry("index", |socket: Socket, _params: Value| async move {
            let options = [("temporary_assigns".to_owned(), Value::list([Value::from("rows")]))]
                .into_iter()
                .collect();
            Ok::<_, BoxError>(Reply::ContinueWith(socket, options))
        })
        .build()
        .unwrap();

    let reply = controller
        .entry(Socket::for_action("index"), Value::Nil, None)
        .await
        .unwrap();

    let Reply::ContinueWith(_, options) = reply else {
        panic!("expected ContinueWith, got {reply:?}");
    };
    assert!(options.contains_key("temporary_assigns"));
}

#[tokio::test]
async fn missing_action_is_a_configuration_error() {
    let controller = Controller::builder("PageLive")
        .entry("index", echo)
        .build()
        .unwrap();

    let err = controller
        .entry(Socket::new(), Value::Nil, None)
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::MissingAction { .. }));
    assert!(err.is_configuration());
    assert!(err.to_string().contains("PageLive"));
}

#[tokio::test]
async fn unknown_action_names_the_missing_declaration() {
    let journal = Journal::new();
    let controller = Controller::builder("PageLive")
        .middleware(record("audit", &journal))
        .entry("index", echo)
        .build()
        .unwrap();

    let err = controller
        .entry(Socket::for_action("edit"), Value::Nil, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DispatchError::UnknownHandler { category: Category::Entry, ref name, .. } if name == "edit"
    ));
    let message = err.to_string();
    assert!(message.contains("PageLive"));
    assert!(message.contains(".entry(\"edit\""));
    assert!(journal.is_empty());
}

#[tokio::test]
async fn first_resume_only_mounts() {
    let handler = CountingHandler::new();
    let controller = Controller::builder("PageLive")
        .middleware(assign("touch", "touched", Value::Bool(true)))
        .entry("index", handler.clone())
        .build()
        .unwrap();

    let socket = controller
        .entry(Socket::for_action("index"), Value::Nil, None)
        .await
        .unwrap()
        .into_session();
    assert_eq!(handler.count(), 1);

    let before = socket.clone();
    let reply = controller
        .resume(socket, Value::map([("page", Value::Int(2))]))
        .await
        .unwrap();

    let Reply::Continue(socket) = reply else {
        panic!("expected Continue, got {reply:?}");
    };
    assert!(socket.is_mounted());
    assert_eq!(socket.assigns(), before.assigns());
    assert_eq!(handler.count(), 1);
}

#[tokio::test]
async fn later_resumes_rerun_chain_and_handler() {
    let journal = Journal::new();
    let controller = Controller::builder("PageLive")
        .middleware(record("load", &journal))
        .entry("index", echo)
        .build()
        .unwrap();

    let params = Value::map([("page", Value::Int(2))]);
    let reply = controller
        .resume(mounted("index"), params.clone())
        .await
        .unwrap();

    assert_eq!(journal.entries(), ["load"]);
    assert_eq!(reply.session().get("input"), Some(&params));
}

#[tokio::test]
async fn resume_collapses_redirects_into_continue() {
    let controller = Controller::builder("PageLive")
        .entry("index", |socket: Socket, _params: Value| async move {
            Ok::<_, BoxError>(socket.redirect("/gone"))
        })
        .build()
        .unwrap();

    let reply = controller
        .resume(mounted("index"), Value::Nil)
        .await
        .unwrap();

    let Reply::Continue(socket) = reply else {
        panic!("expected Continue, got {reply:?}");
    };
    assert_eq!(socket.redirected_to(), Some("/gone"));
}

#[tokio::test]
async fn handler_failures_propagate_unchanged() {
    let controller = Controller::builder("PageLive")
        .entry("index", |_socket: Socket, _params: Value| async move {
            Err::<Socket, _>("database down")
        })
        .build()
        .unwrap();

    let err = controller
        .entry(Socket::for_action("index"), Value::Nil, None)
        .await
        .unwrap_err();

    assert!(!err.is_configuration());
    assert_eq!(err.into_failure().map(|e| e.to_string()), Some("database down".to_owned()));
}
