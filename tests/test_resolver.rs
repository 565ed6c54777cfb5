use sandstone::config::ContainmentPolicy;
use sandstone::http::resolver::{resolve, ResolvedResource, StaticResolver};
use sandstone::http::response::StatusCode;
use tokio::io::AsyncReadExt;

mod common;
use common::TempDir;

async fn read_all(resource: ResolvedResource) -> Vec<u8> {
    match resource {
        ResolvedResource::Ok { mut file, .. } => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).await.unwrap();
            buf
        }
        other => panic!("expected a file, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_existing_file() {
    let dir = TempDir::new("resolve-ok");
    dir.write("style.css", b"body { color: red }");

    let resource = resolve("/style.css", dir.path()).await;

    assert_eq!(resource.status(), StatusCode::Ok);
    assert_eq!(resource.mime_type(), Some("text/css"));
    assert_eq!(read_all(resource).await, b"body { color: red }");
}

#[tokio::test]
async fn test_resolve_root_serves_default_document() {
    let dir = TempDir::new("resolve-index");
    dir.write("index.html", b"<h1>home</h1>");

    let root = resolve("/", dir.path()).await;
    let explicit = resolve("/index.html", dir.path()).await;

    assert!(root.is_ok());
    assert_eq!(root.mime_type(), explicit.mime_type());
    assert_eq!(read_all(root).await, read_all(explicit).await);
}

#[tokio::test]
async fn test_resolve_custom_default_document() {
    let dir = TempDir::new("resolve-custom-index");
    dir.write("home.htm", b"home");

    let resolver = StaticResolver::new(dir.path(), "home.htm", ContainmentPolicy::Segment);
    let resource = resolver.resolve("/").await;

    assert_eq!(resource.mime_type(), Some("text/html"));
}

#[tokio::test]
async fn test_resolve_missing_file() {
    let dir = TempDir::new("resolve-missing");

    let resource = resolve("/missing.xyz", dir.path()).await;
    assert!(matches!(resource, ResolvedResource::NotFound));
    assert_eq!(resource.mime_type(), None);
}

#[tokio::test]
async fn test_resolve_root_without_index() {
    let dir = TempDir::new("resolve-no-index");

    assert!(matches!(resolve("/", dir.path()).await, ResolvedResource::NotFound));
}

#[tokio::test]
async fn test_resolve_traversal_never_ok() {
    let dir = TempDir::new("resolve-traversal");
    dir.write("index.html", b"x");

    for path in ["/../../etc/passwd", "/../../../../../../etc/passwd", "/a/../../etc/hosts"] {
        let resource = resolve(path, dir.path()).await;
        assert!(
            matches!(resource, ResolvedResource::Forbidden | ResolvedResource::NotFound),
            "{} resolved to {:?}",
            path,
            resource
        );
    }
}

#[tokio::test]
async fn test_resolve_traversal_to_existing_file_forbidden() {
    let base = TempDir::new("resolve-escape");
    base.write("secret.txt", b"top secret");
    let root = base.mkdir("public");

    let resource = resolve("/../secret.txt", &root).await;
    assert!(matches!(resource, ResolvedResource::Forbidden));
    assert_eq!(resource.status(), StatusCode::Forbidden);
}

#[tokio::test]
async fn test_resolve_dot_segments_inside_root() {
    let dir = TempDir::new("resolve-dots");
    dir.write("css/site.css", b"a");
    dir.mkdir("js");

    let resource = resolve("/js/../css/site.css", dir.path()).await;
    assert_eq!(resource.mime_type(), Some("text/css"));
}

#[tokio::test]
async fn test_resolve_sibling_prefix_by_policy() {
    let base = TempDir::new("resolve-sibling");
    let root = base.mkdir("site");
    base.write("sitehook/leak.txt", b"leak");

    let segment = StaticResolver::new(&root, "index.html", ContainmentPolicy::Segment);
    let prefix = StaticResolver::new(&root, "index.html", ContainmentPolicy::Prefix);

    assert!(matches!(
        segment.resolve("/../sitehook/leak.txt").await,
        ResolvedResource::Forbidden
    ));
    // The legacy string-prefix check lets the sibling through.
    assert!(prefix.resolve("/../sitehook/leak.txt").await.is_ok());
}

#[tokio::test]
async fn test_resolve_directory_not_found() {
    let dir = TempDir::new("resolve-dir");
    dir.mkdir("assets");

    assert!(matches!(resolve("/assets", dir.path()).await, ResolvedResource::NotFound));
}

#[tokio::test]
async fn test_resolve_missing_root_is_server_error() {
    let base = TempDir::new("resolve-no-root");
    let root = base.path().join("does-not-exist");

    let resource = resolve("/index.html", &root).await;
    assert!(matches!(resource, ResolvedResource::ServerError));
    assert_eq!(resource.status(), StatusCode::InternalServerError);
}

#[tokio::test]
async fn test_resolve_strips_query_string() {
    let dir = TempDir::new("resolve-query");
    dir.write("app.js", b"console.log(1)");

    let resource = resolve("/app.js?v=3", dir.path()).await;
    assert_eq!(resource.mime_type(), Some("application/javascript"));
}

#[tokio::test]
async fn test_resolve_unknown_extension_default_mime() {
    let dir = TempDir::new("resolve-default-mime");
    dir.write("README", b"read me");

    let resource = resolve("/README", dir.path()).await;
    assert_eq!(resource.mime_type(), Some("text/plain"));
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let dir = TempDir::new("resolve-idempotent");
    dir.write("logo.png", b"\x89PNG");

    for path in ["/logo.png", "/nope.png", "/../../etc/passwd"] {
        let first = resolve(path, dir.path()).await;
        let second = resolve(path, dir.path()).await;

        assert_eq!(first.status(), second.status(), "{}", path);
        assert_eq!(first.mime_type(), second.mime_type(), "{}", path);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_symlink_out_of_root_forbidden() {
    let base = TempDir::new("resolve-symlink");
    let outside = base.write("outside.txt", b"nope");
    let root = base.mkdir("www");
    std::os::unix::fs::symlink(&outside, root.join("link.css")).unwrap();

    assert!(matches!(resolve("/link.css", &root).await, ResolvedResource::Forbidden));
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_symlink_mime_from_requested_name() {
    let dir = TempDir::new("resolve-symlink-mime");
    let target = dir.write("data.bin", b"body{}");
    std::os::unix::fs::symlink(&target, dir.path().join("theme.css")).unwrap();

    let resource = resolve("/theme.css", dir.path()).await;
    assert_eq!(resource.mime_type(), Some("text/css"));
}
