//! Shared fixtures for the integration tests

use profile_harvest::config::{
    Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig, UserAgentConfig,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const END_MARKER: &str = "We couldn't find any teachers for this language";

pub fn site_config(base_url: &str) -> SiteConfig {
    SiteConfig {
        listing_url: format!("{}/en/teachers/{{category}}?page={{page}}", base_url),
        profile_path: "/en/teacher".to_string(),
        end_marker: END_MARKER.to_string(),
    }
}

/// Creates a test configuration pointing at the mock server
pub fn create_test_config(
    base_url: &str,
    categories: &[&str],
    db_path: &str,
    listing_concurrency: u32,
) -> Config {
    Config {
        categories: categories.iter().map(|c| c.to_string()).collect(),
        crawler: CrawlerConfig {
            listing_concurrency,
            profile_concurrency: 4,
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        site: site_config(base_url),
        selectors: SelectorConfig::default(),
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
    }
}

/// A listing page holding the given hrefs
pub fn listing_page(hrefs: &[&str]) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| format!(r#"<div class="card"><a href="{}">Teacher</a></div>"#, href))
        .collect();
    format!(
        r#"<html><body><a href="/en/about">About</a>{}</body></html>"#,
        cards
    )
}

/// The page served once the listing runs out of results
pub fn end_page() -> String {
    format!(
        r#"<html><body><p>{}. Want to try another?</p></body></html>"#,
        END_MARKER
    )
}

/// A profile page with the given headline values, review line and price
pub fn profile_page(headline: &[&str], reviews: Option<&str>, price: Option<&str>) -> String {
    let mut html = String::from("<html><body><header>");
    for value in headline {
        html.push_str(&format!(r#"<div class="h4">{}</div>"#, value));
    }
    html.push_str("</header>");
    if let Some(reviews) = reviews {
        html.push_str(&format!(
            r#"<section id="reviews"><span class="text-gray1">{}</span></section>"#,
            reviews
        ));
    }
    if let Some(price) = price {
        html.push_str(&format!(
            r#"<div class="text-lg font-bold">{}</div>"#,
            price
        ));
    }
    html.push_str("</body></html>");
    html
}

pub fn full_profile(name: &str) -> String {
    profile_page(
        &[name, "4.9", "1,496", "12.7k", "100%", "98%"],
        Some("215 reviews"),
        Some("USD 12.50"),
    )
}

pub async fn mount_listing(server: &MockServer, category: &str, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/en/teachers/{}", category)))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

pub async fn mount_listing_status(server: &MockServer, category: &str, page: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/en/teachers/{}", category)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mount_profile(server: &MockServer, profile_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(profile_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}
