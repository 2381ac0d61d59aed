//! Integration tests for the SysML v2 API client
//!
//! A one-shot HTTP server on an ephemeral port stands in for the API.

use semtag_core::{ApiClient, SemtagError};
use serde_json::{json, Value};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// Request line and Accept header of one served request
#[derive(Debug)]
struct Served {
    path: String,
    accept: Option<String>,
}

/// Serve `requests` connections, answering each path from `routes` (404 otherwise)
fn serve(routes: Vec<(&'static str, Value)>, requests: usize) -> (String, JoinHandle<Vec<Served>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut served = Vec::new();

        for stream in listener.incoming().take(requests) {
            let stream = stream.unwrap();
            let mut reader = BufReader::new(&stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let path = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();

            let mut accept = None;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("accept") {
                        accept = Some(value.trim().to_string());
                    }
                }
            }

            let (status, body) = match routes.iter().find(|(route, _)| *route == path) {
                Some((_, body)) => ("200 OK", body.to_string()),
                None => ("404 Not Found", String::new()),
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/ld+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            (&stream).write_all(response.as_bytes()).unwrap();
            (&stream).flush().unwrap();

            served.push(Served { path, accept });
        }

        served
    });

    (url, handle)
}

#[test]
fn test_empty_project_list_is_no_data() {
    let (url, server) = serve(vec![("/projects", json!([]))], 1);
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("elements.jsonld");

    let result = ApiClient::new(&url).download_latest_elements(&dest);

    match result {
        Err(SemtagError::NoData(msg)) => assert!(msg.contains("projects")),
        other => panic!("Expected NoData, got {:?}", other),
    }
    assert!(!dest.exists());

    let served = server.join().unwrap();
    assert_eq!(served.len(), 1);
    assert_eq!(served[0].accept.as_deref(), Some("application/ld+json"));
}

#[test]
fn test_empty_commit_list_is_no_data() {
    let (url, server) = serve(
        vec![
            ("/projects", json!([{"@id": "p1", "created": "2024-01-01T00:00:00Z"}])),
            ("/projects/p1/commits", json!([])),
        ],
        2,
    );
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("elements.jsonld");

    let result = ApiClient::new(&url).download_latest_elements(&dest);
    assert!(matches!(result, Err(SemtagError::NoData(_))));
    assert!(!dest.exists());

    server.join().unwrap();
}

#[test]
fn test_download_latest_elements() {
    let elements = json!([{"@id": "e1", "@type": "PartUsage", "declaredName": "thermo"}]);
    let (url, server) = serve(
        vec![
            (
                "/projects",
                json!([
                    {"@id": "old", "created": "2023-05-01T10:00:00Z"},
                    {"@id": "new", "created": "2024-05-01T10:00:00"}
                ]),
            ),
            (
                "/projects/new/commits",
                json!([
                    {"@id": "c1", "created": "2024-05-02T10:00:00Z"},
                    {"@id": "c2", "created": "2024-05-03T10:00:00Z"}
                ]),
            ),
            ("/projects/new/commits/c2/elements", elements.clone()),
        ],
        3,
    );
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("elements.jsonld");

    let latest = ApiClient::new(&url).download_latest_elements(&dest).unwrap();

    assert_eq!(latest.project_id, "new");
    assert_eq!(latest.commit_id, "c2");
    assert_eq!(latest.base_uri, "http://projects/new/commits/c2/elements/");
    assert_eq!(latest.path, fs::canonicalize(&dest).unwrap());

    let written = fs::read_to_string(&dest).unwrap();
    assert!(written.starts_with("[\n  {"));
    assert_eq!(serde_json::from_str::<Value>(&written).unwrap(), elements);

    let paths: Vec<String> = server.join().unwrap().into_iter().map(|s| s.path).collect();
    assert_eq!(
        paths,
        vec!["/projects", "/projects/new/commits", "/projects/new/commits/c2/elements"]
    );
}

#[test]
fn test_error_status_is_network_error() {
    let (url, server) = serve(Vec::new(), 1);

    let result = ApiClient::new(&url).get_projects();
    assert!(matches!(result, Err(SemtagError::Network(_))));

    server.join().unwrap();
}
