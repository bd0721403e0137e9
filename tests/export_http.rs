use krono::export::{
    EntryKind, EntryValue, ExportEntry, ExportPayload, ExportTransport, SheetsTransport,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn payload() -> ExportPayload {
    ExportPayload {
        entries: vec![ExportEntry {
            column: "B".to_string(),
            value: EntryValue::Hours(1.5),
            kind: EntryKind::Hours,
            company: "Acme".to_string(),
        }],
        row: 6,
    }
}

fn headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.expect("request read failed");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = headers_end(&buf) else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        while buf.len() < end + 4 + content_length {
            let n = stream.read(&mut chunk).await.expect("body read failed");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        break;
    }
    String::from_utf8_lossy(&buf).to_string()
}

async fn respond(stream: &mut TcpStream, status_line: &str, extra_headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status_line}\r\n{extra_headers}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(response.as_bytes())
        .await
        .expect("response write failed");
    stream.flush().await.expect("response flush failed");
}

#[tokio::test]
async fn follows_the_post_redirect_with_a_get() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        // The webhook answers the POST with a redirect to a result URL.
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        assert!(request.starts_with("POST /exec"));
        assert!(request.contains("\"row\":6"));
        respond(&mut stream, "302 Found", "Location: /result\r\n", "").await;

        // The result URL must be fetched with GET.
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        assert!(request.starts_with("GET /result"));
        respond(
            &mut stream,
            "200 OK",
            "Content-Type: application/json\r\n",
            r#"{"success":true,"updated":1}"#,
        )
        .await;
    });

    let transport = SheetsTransport::new().unwrap();
    let result = transport
        .send(&format!("http://{addr}/exec"), &payload())
        .await
        .unwrap();

    assert_eq!(result, json!({ "success": true, "updated": 1 }));
    server.await.unwrap();
}

#[tokio::test]
async fn a_non_json_body_still_counts_as_delivered() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_request(&mut stream).await;
        respond(&mut stream, "200 OK", "", "OK").await;
    });

    let transport = SheetsTransport::new().unwrap();
    let result = transport
        .send(&format!("http://{addr}/exec"), &payload())
        .await
        .unwrap();

    assert_eq!(
        result,
        json!({ "success": true, "message": "Request completed", "raw": "OK" })
    );
    server.await.unwrap();
}

#[tokio::test]
async fn gives_up_after_too_many_redirects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request(&mut stream).await;
            respond(&mut stream, "302 Found", "Location: /again\r\n", "").await;
        }
    });

    let transport = SheetsTransport::new().unwrap();
    let err = transport
        .send(&format!("http://{addr}/exec"), &payload())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("too many redirects"));
}
