//! End-to-end calls against the live server.
//!
//! # Design
//! Starts the server on a random port on a background runtime, then calls it
//! over real HTTP through `TodoRpc`. Validates that request building, the
//! server's dispatch and response parsing agree on the wire format.

use std::net::SocketAddr;
use std::time::Duration;

use todo_client::{TodoRpc, UreqTransport};
use todo_core::{CreateTodoInput, ErrorCode, ErrorKind};

/// Start the server on an ephemeral port and return its address.
fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn input(title: &str, description: &str) -> CreateTodoInput {
    CreateTodoInput {
        title: title.to_string(),
        description: description.to_string(),
    }
}

#[test]
fn create_todo_returns_id() {
    let addr = spawn_server();
    let rpc = TodoRpc::new(&format!("http://{addr}"));

    let output = rpc
        .create_todo()
        .mutate(&input("hello world", "welcome to world of programming"))
        .unwrap();
    assert_eq!(output.id, "1");

    // Calls are independent; repeating one still succeeds.
    let again = rpc.create_todo().mutate(&input("", "")).unwrap();
    assert!(!again.id.is_empty());
}

#[test]
fn wrong_type_surfaces_as_validation_error() {
    let addr = spawn_server();
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    // The typed client cannot produce a numeric title, so send it by hand.
    let mut response = agent
        .post(&format!("http://{addr}/createTodo"))
        .content_type("application/json")
        .send(r#"{"title":123,"description":"x"}"#.as_bytes())
        .unwrap();
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap();

    let err = todo_core::TodoClient::new(&format!("http://{addr}"))
        .parse_create_todo(todo_core::HttpResponse {
            status,
            body,
        })
        .unwrap_err();
    assert_eq!(status, 400);
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.code(), Some(ErrorCode::BadRequest));
    assert_eq!(err.issues()[0].path, vec!["title".to_string()]);
}

#[test]
fn unreachable_server_is_transport_error() {
    // Grab a free port, then release it so nothing is listening there.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let rpc = TodoRpc::with_transport(
        &format!("http://{addr}"),
        UreqTransport::new(Duration::from_secs(2)),
    );
    let err = rpc
        .create_todo()
        .mutate(&input("hello world", "welcome to world of programming"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.code(), None);
}

#[test]
fn batch_returns_results_in_order() {
    let addr = spawn_server();
    let rpc = TodoRpc::new(&format!("http://{addr}"));

    let results = rpc
        .create_todo_batch(&[input("first", "one"), input("second", "two")])
        .unwrap();
    assert_eq!(results.len(), 2);
    for result in results {
        assert_eq!(result.unwrap().id, "1");
    }
}
