mod error {
    pub use ses::error::*;
}

mod models {
    pub use ses::api::models::*;
}

mod client_under_test {
    #![allow(dead_code)]

    include!("../src/api/client.rs");

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one request with `status` and hands back what was received.
    async fn serve_once(status: &'static str) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let port = listener.local_addr().expect("local addr").port();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut stream).await;
            let body = r#"{"name":"stub","message":"stub response","url":"/events/add"}"#;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            stream.shutdown().await.expect("shutdown");
            request
        });

        let url = Url::parse(&format!("http://127.0.0.1:{port}/events/add")).expect("url");
        (url, handle)
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let size = stream.read(&mut chunk).await.expect("read request");
            if size == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..size]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn client() -> MispClient {
        MispClient::new(Duration::from_secs(5)).expect("client")
    }

    #[tokio::test]
    async fn posts_event_with_required_headers() {
        let (url, server) = serve_once("200 OK").await;
        let envelope = EventEnvelope::for_raw_email("Subject: hi\r\n\r\nRAW");

        let result = client()
            .submit(&url, "s3cr3t-key", &envelope)
            .await
            .expect("submit");
        assert!(result.accepted);
        assert_eq!(result.status, 200);

        let request = server.await.expect("server task");
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /events/add HTTP/1.1\r\n"));
        assert!(lower.contains("accept: application/json\r\n"));
        assert!(lower.contains("content-type: application/json\r\n"));
        assert!(lower.contains("authorization: s3cr3t-key\r\n"));

        let body = request.split("\r\n\r\n").nth(1).expect("request body");
        let value: serde_json::Value = serde_json::from_str(body).expect("json body");
        assert_eq!(
            value["Event"]["Object"][0]["Attribute"][0]["data"],
            "Subject: hi\r\n\r\nRAW"
        );
        assert_eq!(value["Event"]["info"], "Suspicious Email Submitter");
    }

    #[tokio::test]
    async fn non_200_success_codes_are_not_accepted() {
        let (url, server) = serve_once("201 Created").await;
        let result = client()
            .submit(&url, "key", &EventEnvelope::for_raw_email("RAW"))
            .await
            .expect("submit");
        server.await.expect("server task");

        assert!(!result.accepted);
        assert_eq!(result.status, 201);
    }

    #[tokio::test]
    async fn server_errors_carry_their_status() {
        let (url, server) = serve_once("500 Internal Server Error").await;
        let result = client()
            .submit(&url, "key", &EventEnvelope::for_raw_email("RAW"))
            .await
            .expect("submit");
        server.await.expect("server task");

        assert!(!result.accepted);
        assert_eq!(result.status, 500);
    }

    #[tokio::test]
    async fn unreachable_server_is_an_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{port}/events/add")).expect("url");
        let err = client()
            .submit(&url, "key", &EventEnvelope::for_raw_email("RAW"))
            .await
            .expect_err("connection refused");
        assert!(matches!(err, crate::error::AppError::Http(_)));
    }

    #[test]
    fn reads_misp_error_name_when_message_is_missing() {
        assert_eq!(
            parse_error_message(r#"{"name":"Forbidden"}"#).as_deref(),
            Some("Forbidden")
        );
    }
}
