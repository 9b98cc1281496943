use tracing::info;

use crate::error::ScrapeError;

/// Fetch a single page and return its decoded text body.
///
/// A blank URL is rejected before any request goes out. Transport failures and
/// non-2xx statuses are surfaced as errors; there is no retry and no timeout,
/// the call runs to completion or failure.
pub async fn fetch_page(url: &str) -> Result<String, ScrapeError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ScrapeError::EmptyUrl);
    }

    info!("Fetching {}", url);
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|source| ScrapeError::Fetch {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn blank_url_rejected_before_request() {
        let err = fetch_page("").await.unwrap_err();
        assert!(matches!(err, ScrapeError::EmptyUrl));
    }

    #[tokio::test]
    async fn whitespace_url_rejected() {
        let err = fetch_page("   \t").await.unwrap_err();
        assert!(matches!(err, ScrapeError::EmptyUrl));
    }

    #[tokio::test]
    async fn transport_failure_is_a_fetch_error() {
        // Nothing listens on port 1; the connection is refused.
        let err = fetch_page("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { .. }));
    }

    #[tokio::test]
    async fn non_2xx_response_is_a_status_error() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                );
            }
        });

        let url = format!("http://{}/missing", addr);
        let err = fetch_page(&url).await.unwrap_err();
        match err {
            ScrapeError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_fetch_leaves_store_unchanged() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        db::insert_contacts(
            &conn,
            &[db::Contact {
                name: "Alice".to_string(),
                title: "Professor".to_string(),
                email: "alice@example.edu".to_string(),
            }],
        )
        .unwrap();

        // No records come back from a failed fetch, so nothing reaches the
        // store and the existing rows stay as they were.
        assert!(fetch_page("http://127.0.0.1:1/").await.is_err());

        let rows = db::fetch_contacts(&conn, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "alice@example.edu");
    }
}
