//! Full token lifecycle against the live mock vault.
//!
//! # Design
//! Starts the mock server on a random port, points a sandbox client at it
//! over plain HTTP, and drives every token operation through the default
//! ureq transport. Also checks that an unreachable host degrades to the 500
//! fault shape instead of an error. A one-shot raw TCP listener captures
//! the exact bytes of a request where the mock would hide them.

use std::io::{BufRead, BufReader, Read, Write};
use std::sync::mpsc;

use paymentsws::{CardData, Mode, PaymentsWsClient, RequestOptions};
use serde_json::{json, Value};

fn start_mock_server() -> std::net::SocketAddr {
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
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// A captured request: request line plus headers, and the raw body.
struct Captured {
    head: String,
    body: String,
}

/// Accept one connection, record the request, answer with a 200 envelope.
fn start_capture_server() -> (std::net::SocketAddr, mpsc::Receiver<Captured>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            head.push_str(&line);
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();

        let reply = r#"{"status":200,"message":"ok","items":null}"#;
        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            reply.len(),
            reply
        )
        .unwrap();
        stream.flush().unwrap();

        tx.send(Captured {
            head,
            body: String::from_utf8(body).unwrap(),
        })
        .unwrap();
    });

    (addr, rx)
}

fn local_client(addr: std::net::SocketAddr, api_key: &str) -> PaymentsWsClient {
    let mut client = PaymentsWsClient::with_options(
        api_key,
        Mode::Sandbox,
        RequestOptions::new().with("timeout", 5),
    );
    client.set_api_host(addr.to_string());
    client.set_api_is_https(false);
    client
}

#[test]
fn token_lifecycle() {
    let addr = start_mock_server();
    let client = local_client(addr, "integration-key");
    assert_eq!(client.api_url(), format!("http://{addr}/v1/"));
    let tokens = client.tokens();

    // Step 1: tokenize a plain string.
    let created = tokens.tokenize("hello");
    assert_eq!(created.status, 200, "{created:?}");
    let plain_token = created.token().expect("token in items");

    // Step 2: tokenize card fields.
    let created = tokens.tokenize(CardData {
        pan: "4100123412341234".to_string(),
        expiration_date: "12/22".to_string(),
        card_holder: "John Doe".to_string(),
    });
    assert_eq!(created.status, 200);
    let card_token = created.token().expect("token in items");
    assert_ne!(plain_token, card_token);

    // Step 3: detokenize both.
    let original = tokens.detokenize(plain_token.as_str());
    assert_eq!(original.status, 200);
    assert_eq!(original.items.unwrap()["data"], "hello");

    let original = tokens.detokenize(card_token.as_str());
    let items = original.items.unwrap();
    assert_eq!(items["data"]["pan"], "4100123412341234");
    assert_eq!(items["data"]["expirationDate"], "12/22");

    // Step 4: validate.
    let validated = tokens.validate(card_token.as_str());
    assert_eq!(validated.status, 200);
    assert!(validated.is_success());

    // Step 5: delete.
    let deleted = tokens.delete(card_token.as_str());
    assert_eq!(deleted.status, 200);
    assert!(deleted.items.is_none());

    // Step 6: the deleted token is gone; the server's 404 comes back verbatim.
    let validated = tokens.validate(card_token.as_str());
    assert_eq!(validated.status, 404);
    assert_eq!(validated.message.as_deref(), Some("Token not found"));

    let deleted = tokens.delete(card_token.as_str());
    assert_eq!(deleted.status, 404);

    // Step 7: the other token is untouched.
    assert_eq!(tokens.validate(plain_token.as_str()).status, 200);
}

#[test]
fn empty_api_key_gets_unauthorized_envelope() {
    let addr = start_mock_server();
    let client = local_client(addr, "");

    let response = client.tokens().tokenize("hello");
    assert_eq!(response.status, 401);
    assert_eq!(response.message.as_deref(), Some("Unauthorized"));
    assert!(response.items.is_none());
}

#[test]
fn unknown_api_version_returns_500_fault() {
    let addr = start_mock_server();
    let mut client = local_client(addr, "key");
    client.set_api_version("v2");

    // The mock serves only /v1; its bare 404 has no JSON body.
    let response = client.tokens().validate("anything");
    assert_eq!(response.status, 500);
    assert!(response.items.is_none());
}

#[test]
fn unreachable_host_returns_500_fault() {
    // Bind then drop to get a port with nothing listening.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = local_client(addr, "key");
    let tokens = client.tokens();

    for response in [
        tokens.tokenize("hello"),
        tokens.detokenize("TOK123"),
        tokens.validate("TOK123"),
        tokens.delete("TOK123"),
    ] {
        assert_eq!(response.status, 500);
        assert!(!response.message.as_deref().unwrap_or_default().is_empty());
        assert!(response.items.is_none());
    }
}

#[test]
fn delete_with_body_reaches_the_server() {
    let (addr, captured) = start_capture_server();
    let client = local_client(addr, "key");

    let response = client.delete("tokens/x", Some(json!({"reason": "gdpr"})));
    assert_eq!(response.status, 200, "{response:?}");

    let request = captured.recv().unwrap();
    assert!(request.head.starts_with("DELETE /v1/tokens/x "), "{}", request.head);
    assert!(request.head.to_ascii_lowercase().contains("content-type: application/json"));
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, json!({"reason": "gdpr"}));
}

#[test]
fn delete_without_body_sends_no_body() {
    let (addr, captured) = start_capture_server();
    let client = local_client(addr, "key");

    let response = client.tokens().delete("x");
    assert_eq!(response.status, 200, "{response:?}");

    let request = captured.recv().unwrap();
    assert!(request.head.starts_with("DELETE /v1/tokens/x "), "{}", request.head);
    assert!(request.body.is_empty());
}
