//! End-to-end scenarios run over an in-process duplex pipe standing in
//! for a real transport, covering spec.md §8's testable properties: a
//! request/response round trip and a response body delivered through
//! the response's `RecvStream`.

use bytes::Bytes;
use http::{Request, StatusCode};

async fn pair() -> (tokio::io::DuplexStream, tokio::io::DuplexStream) {
    tokio::io::duplex(64 * 1024)
}

#[tokio::test]
async fn a_get_request_with_no_body_round_trips_to_a_200() {
    let (client_io, server_io) = pair().await;

    let server = tokio::spawn(async move {
        let mut connection = h2core::server::handshake(server_io).await.unwrap();
        let (request, mut respond) = connection.accept().await.unwrap();
        let request = request.unwrap();
        assert_eq!(request.method(), http::Method::GET);
        assert_eq!(request.uri().path(), "/");

        let response = http::Response::builder().status(StatusCode::OK).body(()).unwrap();
        respond.send_response(response, true).unwrap();

        tokio::select! {
            _ = connection.drive() => {}
            _ = tokio::time::sleep(std::time::Duration::from_millis(200)) => {}
        }
    });

    let (send_request, connection) = h2core::client::handshake(client_io).await.unwrap();
    let client = tokio::spawn(connection.drive());

    let request = Request::builder().method("GET").uri("https://example.com/").body(()).unwrap();
    let (response, _body) = send_request.send_request(request, true).unwrap();
    let response = response.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    drop(send_request);
    let _ = tokio::time::timeout(std::time::Duration::from_millis(200), client).await;
    let _ = server.await;
}

#[tokio::test]
async fn a_response_body_arrives_through_recv_stream() {
    let (client_io, server_io) = pair().await;

    let server = tokio::spawn(async move {
        let mut connection = h2core::server::handshake(server_io).await.unwrap();
        let (request, mut respond) = connection.accept().await.unwrap();
        let _ = request.unwrap();

        let response = http::Response::builder().status(StatusCode::OK).body(()).unwrap();
        respond.send_response(response, false).unwrap();
        respond.send_data(Bytes::from_static(b"hello, world"), true).unwrap();

        tokio::select! {
            _ = connection.drive() => {}
            _ = tokio::time::sleep(std::time::Duration::from_millis(200)) => {}
        }
    });

    let (send_request, connection) = h2core::client::handshake(client_io).await.unwrap();
    let client = tokio::spawn(connection.drive());

    let request = Request::builder().method("GET").uri("https://example.com/").body(()).unwrap();
    let (response, _body) = send_request.send_request(request, true).unwrap();
    let response = response.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body();
    let chunk = body.data().await.expect("a body chunk");
    assert_eq!(&chunk[..], b"hello, world");
    assert!(body.data().await.is_none());

    drop(send_request);
    let _ = tokio::time::timeout(std::time::Duration::from_millis(200), client).await;
    let _ = server.await;
}
