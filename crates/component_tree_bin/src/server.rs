use std::{
    convert::Infallible,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use anyhow::{anyhow, Result};
use hyper::{
    header::{HeaderValue, CONTENT_TYPE},
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};

/// Serves the files of `root` until the process is interrupted
pub async fn serve(root: PathBuf, port: u16, open: bool) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let root = Arc::new(root);

    let make_service = make_service_fn(move |_| {
        let root = Arc::clone(&root);
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let root = Arc::clone(&root);
                async move {
                    let method = req.method().clone();
                    let request_path = req.uri().path().to_string();
                    Ok::<_, Infallible>(respond(&root, &method, &request_path).await)
                }
            }))
        }
    });

    let server = Server::try_bind(&addr)
        .map_err(|err| anyhow!("failed to bind preview server on {addr}: {err}"))?
        .serve(make_service);

    let url = format!("http://localhost:{port}/");
    tracing::info!("Server running at {url}");
    if open {
        open_browser(&url);
    }

    server
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|err| anyhow!("preview server failed: {err}"))
}

async fn respond(root: &Path, method: &Method, request_path: &str) -> Response<Body> {
    if method != Method::GET && method != Method::HEAD {
        return status_response(StatusCode::METHOD_NOT_ALLOWED);
    }
    let Some(path) = resolve_request_path(root, request_path) else {
        return status_response(StatusCode::FORBIDDEN);
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            tracing::debug!("serving {}", path.display());
            let mut response = Response::new(Body::from(bytes));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type(&path)));
            response
        }
        Err(_) => status_response(StatusCode::NOT_FOUND),
    }
}

fn status_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::from(status.to_string()));
    *response.status_mut() = status;
    response
}

/// Maps a request path onto a file under `root`. `/` is the viewer page.
/// Paths that try to leave `root` are rejected.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() {
        "index.html"
    } else {
        relative
    };

    let mut resolved = root.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            segment if segment.contains('\\') || segment.contains(':') => return None,
            segment => resolved.push(segment),
        }
    }
    Some(resolved)
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn open_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let try_cmds = vec![("open", vec![url])];
    #[cfg(target_os = "windows")]
    let try_cmds = vec![("cmd", vec!["/C", "start", "", url])];
    #[cfg(all(not(target_os = "macos"), not(target_os = "windows")))]
    let try_cmds = vec![("xdg-open", vec![url])];

    for (program, args) in try_cmds {
        if Command::new(program).args(args).spawn().is_ok() {
            return;
        }
    }
    tracing::warn!("Could not open a browser automatically, visit {url}");
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use hyper::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use test_tmpdir::test_tmpdir;

    use super::{resolve_request_path, respond};

    #[test]
    fn test_resolve_request_path() {
        let root = Path::new("/srv/out");
        assert_eq!(
            resolve_request_path(root, "/"),
            Some(root.join("index.html"))
        );
        assert_eq!(
            resolve_request_path(root, "/tree.json"),
            Some(root.join("tree.json"))
        );
        assert_eq!(
            resolve_request_path(root, "/assets/./app.js"),
            Some(root.join("assets").join("app.js"))
        );
        assert_eq!(resolve_request_path(root, "/../secret"), None);
        assert_eq!(resolve_request_path(root, "/assets/../../secret"), None);
        assert_eq!(resolve_request_path(root, "/..\\secret"), None);
    }

    #[tokio::test]
    async fn test_serves_output_files() {
        let tmpdir = test_tmpdir!(
            "index.html" => "<html></html>",
            "tree.json" => "{}",
        );

        let index = respond(tmpdir.root(), &Method::GET, "/").await;
        assert_eq!(index.status(), StatusCode::OK);
        assert_eq!(
            index.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let body = hyper::body::to_bytes(index.into_body()).await.unwrap();
        assert_eq!(&body[..], b"<html></html>");

        let tree = respond(tmpdir.root(), &Method::GET, "/tree.json").await;
        assert_eq!(tree.status(), StatusCode::OK);

        let missing = respond(tmpdir.root(), &Method::GET, "/missing.js").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let escaped = respond(tmpdir.root(), &Method::GET, "/../etc/passwd").await;
        assert_eq!(escaped.status(), StatusCode::FORBIDDEN);

        let posted = respond(tmpdir.root(), &Method::POST, "/tree.json").await;
        assert_eq!(posted.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
