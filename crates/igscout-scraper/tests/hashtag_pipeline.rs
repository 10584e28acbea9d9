//! End-to-end runs of `HashtagPipeline` with post and profile pages served by
//! `wiremock` and the feed supplied by a static session.

mod common;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use igscout_core::{CrawlSettings, Field};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use igscout_scraper::{
    HashtagPipeline, HttpFetcher, PageFetcher, PageModel, PostDiscoveryCrawler,
    ProfileInfoExtractor, ProfileResolver, SharedDataModel,
};

use common::{feed_page, post_page, profile_page, StaticFeed};

async fn serve(server: &MockServer, route: String, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn pipeline(server: &MockServer, target: usize, workers: usize) -> HashtagPipeline {
    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpFetcher::new(5, "igscout-test/0.1", None).expect("test fetcher"));
    let model: Arc<dyn PageModel> = Arc::new(SharedDataModel);

    HashtagPipeline::new(
        PostDiscoveryCrawler::new(
            Arc::clone(&model),
            format!("{}/explore/tags/", server.uri()),
            r#"a[href*="/p/"]"#,
            CrawlSettings {
                poll_interval: Duration::ZERO,
                stagnation_limit: 2,
            },
        ),
        ProfileResolver::new(
            Arc::clone(&fetcher),
            Arc::clone(&model),
            format!("{}/", server.uri()),
        ),
        ProfileInfoExtractor::new(fetcher, model),
        target,
        NonZeroUsize::new(workers).unwrap(),
    )
}

fn post_links(server: &MockServer, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}/p/post{i:02}/", server.uri()))
        .collect()
}

#[tokio::test]
async fn failed_posts_shrink_output_and_failed_profiles_leave_placeholders() {
    let server = MockServer::start().await;

    // Posts 03 and 07 are never mounted and answer 404.
    let owners = ["ana", "ben", "cy", "", "dee", "eli", "fay", "", "gus", "hal"];
    for (i, owner) in owners.iter().enumerate() {
        if !owner.is_empty() {
            serve(&server, format!("/p/post{i:02}/"), 200, post_page(owner)).await;
        }
    }
    for owner in owners.iter().filter(|o| !o.is_empty()) {
        if *owner == "eli" {
            serve(&server, "/eli/".to_owned(), 500, String::new()).await;
        } else {
            let bio = format!("Business: {owner}@brand.co");
            serve(&server, format!("/{owner}/"), 200, profile_page(owner, "2.5k", &bio)).await;
        }
    }

    let mut feed = StaticFeed::new(feed_page(50_000), post_links(&server, 15));
    let run = pipeline(&server, 10, 3)
        .run(&mut feed, "ad")
        .await
        .unwrap();

    assert_eq!(feed.opened, [format!("{}/explore/tags/ad/", server.uri())]);
    assert!(feed.closed);
    assert_eq!(run.records.len(), 8);

    let placeholders = run
        .records
        .iter()
        .filter(|r| r.followers.is_unavailable())
        .count();
    assert_eq!(placeholders, 1);

    // Profiles are extracted in sorted URL order; eli sits fifth.
    let eli = &run.records[4];
    assert!(eli.username.is_unavailable());
    assert_eq!(eli.hashtag, Field::Value("ad".to_owned()));

    let ana = &run.records[0];
    assert_eq!(ana.username, Field::Value("ana Official (@ana)".to_owned()));
    assert_eq!(ana.followers, Field::Value(2500.0));
    assert_eq!(ana.following, Field::Value(120.0));
    assert_eq!(ana.posts, Field::Value(33.0));
    assert_eq!(ana.emails, Field::Value("ana@brand.co".to_owned()));
    assert_eq!(
        ana.profile_url,
        Field::Value(format!("{}/ana/", server.uri()))
    );
}

#[tokio::test]
async fn posts_by_one_owner_yield_one_record() {
    let server = MockServer::start().await;
    for i in 0..4 {
        serve(&server, format!("/p/post{i:02}/"), 200, post_page("solo")).await;
    }
    serve(
        &server,
        "/solo/".to_owned(),
        200,
        profile_page("solo", "900", "no contact"),
    )
    .await;

    let mut feed = StaticFeed::new(feed_page(4), post_links(&server, 4));
    let run = pipeline(&server, 10, 2)
        .run(&mut feed, "solo")
        .await
        .unwrap();

    assert_eq!(run.records.len(), 1);
    assert_eq!(run.records[0].followers, Field::Value(900.0));
    assert_eq!(run.records[0].emails, Field::Value(String::new()));
}

#[tokio::test]
async fn feed_without_declared_count_aborts_the_run() {
    let server = MockServer::start().await;
    let mut feed = StaticFeed::new(
        "<html><body>Log in to continue</body></html>".to_owned(),
        post_links(&server, 3),
    );

    let result = pipeline(&server, 10, 2).run(&mut feed, "ad").await;
    assert!(result.is_err());
    assert!(feed.closed);
}
