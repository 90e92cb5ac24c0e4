//! Integration tests for the strategy chain using wiremock HTTP mocks.
//!
//! The live source's behavior is nondeterministic, so every test pins the
//! network layer: the resolver's base URL points at a local mock server.

use vibecheck_scraper::{FailureTag, ProfileResolver, ResolveMode, ScraperConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Image bodies must clear the ~1 KiB placeholder threshold.
fn image_body() -> Vec<u8> {
    vec![0xAB; 2_048]
}

fn resolver_for(server: &MockServer) -> ProfileResolver {
    ProfileResolver::new(ScraperConfig {
        base_url: server.uri(),
        delay_ms: (0, 0),
        ..ScraperConfig::default()
    })
    .expect("resolver construction should not fail")
}

async fn mount_image(server: &MockServer, img_path: &str) {
    Mock::given(method("GET"))
        .and(path(img_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(image_body()))
        .mount(server)
        .await;
}

fn api_user_body(uri: &str, edges: usize, private: bool) -> serde_json::Value {
    let edges: Vec<serde_json::Value> = (0..edges)
        .map(|i| {
            serde_json::json!({
                "node": {
                    "display_url": format!("{uri}/img/post{i}.jpg"),
                    "edge_media_to_caption": {
                        "edges": [{ "node": { "text": format!("caption {i}") } }]
                    },
                    "edge_liked_by": { "count": 100 + i },
                    "edge_media_to_comment": { "count": 10 + i }
                }
            })
        })
        .collect();

    serde_json::json!({
        "data": {
            "user": {
                "full_name": "Some User",
                "biography": "coffee and chaos",
                "profile_pic_url": format!("{uri}/img/profile.jpg"),
                "profile_pic_url_hd": format!("{uri}/img/profile_hd.jpg"),
                "is_private": private,
                "edge_followed_by": { "count": 1234 },
                "edge_follow": { "count": 321 },
                "edge_owner_to_timeline_media": {
                    "count": 42,
                    "edges": edges
                }
            }
        }
    })
}

#[tokio::test]
async fn profile_api_strategy_wins_when_available() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "some_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_user_body(&uri, 2, false)))
        .mount(&server)
        .await;
    mount_image(&server, "/img/profile_hd.jpg").await;
    mount_image(&server, "/img/post0.jpg").await;
    mount_image(&server, "/img/post1.jpg").await;

    let resolver = resolver_for(&server);
    let profile = resolver.resolve("some_user", ResolveMode::Shallow).await;

    assert_eq!(profile.failure, None);
    assert_eq!(profile.username, "some_user");
    assert_eq!(profile.full_name.as_deref(), Some("Some User"));
    assert_eq!(profile.follower_count, Some(1234));
    assert_eq!(profile.post_count, Some(42));
    assert!(profile.profile_pic.is_some());
    assert_eq!(profile.post_images.len(), 2);
    // Shallow resolution carries no per-post metadata.
    assert!(profile.captions.is_empty());
}

#[tokio::test]
async fn falls_through_to_page_extraction_when_api_is_blocked() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let html = format!(
        r#"<html><head>
        <meta property="og:image" content="{uri}/img/og.jpg">
        <meta property="og:title" content="Some User">
        </head><body>profile</body></html>"#
    );
    Mock::given(method("GET"))
        .and(path("/some_user/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;
    mount_image(&server, "/img/og.jpg").await;

    let resolver = resolver_for(&server);
    let profile = resolver.resolve("@some_user", ResolveMode::Shallow).await;

    assert_eq!(profile.failure, None);
    assert_eq!(profile.username, "some_user");
    assert!(profile.profile_pic.is_some());
}

#[tokio::test]
async fn exhausted_chain_is_tagged_all_methods_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ghost_user/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>Sorry, this page isn't available.</html>"),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let profile = resolver.resolve("ghost_user", ResolveMode::Shallow).await;

    // Per-strategy tags (here user_not_found) never win over the terminal tag.
    assert_eq!(profile.failure, Some(FailureTag::AllMethodsFailed));
    assert_eq!(profile.username, "ghost_user");
}

#[tokio::test]
async fn login_wall_exhausts_to_all_methods_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/walled_user/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div id="loginForm">Log in to continue</div>"#),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let profile = resolver.resolve("walled_user", ResolveMode::Shallow).await;

    assert_eq!(profile.failure, Some(FailureTag::AllMethodsFailed));
}

#[tokio::test]
async fn deep_result_below_three_images_falls_back_to_shallow() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "two_posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_user_body(&uri, 2, false)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/two_posts/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_image(&server, "/img/profile_hd.jpg").await;
    mount_image(&server, "/img/post0.jpg").await;
    mount_image(&server, "/img/post1.jpg").await;

    let resolver = resolver_for(&server);
    let profile = resolver
        .resolve("two_posts", ResolveMode::Deep { max_posts: 9 })
        .await;

    // Two images never satisfy the deep path; the shallow fallback still
    // resolves, with deep metadata simply absent.
    assert_eq!(profile.failure, None);
    assert_eq!(profile.post_images.len(), 2);
    assert!(profile.captions.is_empty());
    assert!(profile.like_counts.is_empty());
}

#[tokio::test]
async fn deep_result_with_three_images_carries_metadata() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "three_posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_user_body(&uri, 3, false)))
        .mount(&server)
        .await;
    mount_image(&server, "/img/profile_hd.jpg").await;
    for i in 0..3 {
        mount_image(&server, &format!("/img/post{i}.jpg")).await;
    }

    let resolver = resolver_for(&server);
    let profile = resolver
        .resolve("three_posts", ResolveMode::Deep { max_posts: 9 })
        .await;

    assert_eq!(profile.failure, None);
    assert_eq!(profile.post_images.len(), 3);
    assert_eq!(profile.captions.len(), 3);
    assert_eq!(profile.captions[0].as_deref(), Some("caption 0"));
    assert_eq!(profile.like_counts, vec![Some(100), Some(101), Some(102)]);
    assert_eq!(profile.comment_counts, vec![Some(10), Some(11), Some(12)]);
}

#[tokio::test]
async fn private_profile_resolves_without_post_images() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "private_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_user_body(&uri, 3, true)))
        .mount(&server)
        .await;
    mount_image(&server, "/img/profile_hd.jpg").await;

    let resolver = resolver_for(&server);
    let profile = resolver.resolve("private_user", ResolveMode::Shallow).await;

    // Private with a reachable profile picture is a success; whether that is
    // terminal is the caller's policy, not the resolver's.
    assert_eq!(profile.failure, None);
    assert!(profile.is_private);
    assert!(profile.post_images.is_empty());
    assert!(profile.profile_pic.is_some());
}

#[tokio::test]
async fn unknown_api_user_is_not_terminal_for_the_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maybe_user/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let profile = resolver.resolve("maybe_user", ResolveMode::Shallow).await;

    assert_eq!(profile.failure, Some(FailureTag::AllMethodsFailed));
}
