//! Per-category crawls merged into one deduplicated link set

use crate::config::{validate_categories, SiteConfig};
use crate::crawler::discover::LinkDiscoverer;
use crate::crawler::paginate::PaginatedCrawler;
use crate::model::{CategoryMembership, ProfileLink};
use crate::HarvestError;
use reqwest::Client;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Per-category line of the run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub distinct_links: usize,
    pub last_page: u32,
    pub failed_pages: usize,
}

/// The merged output of every category crawl
#[derive(Debug, Clone, Default)]
pub struct AggregatedLinks {
    /// Links deduplicated by URL, in category order then URL order
    pub links: Vec<ProfileLink>,

    /// Every (entity id, category) pair seen, before any id deduplication
    pub memberships: Vec<CategoryMembership>,

    pub summaries: Vec<CategorySummary>,
}

/// Runs one paginated crawl per category, sequentially, and merges the results
#[derive(Debug, Clone)]
pub struct LinkAggregator {
    client: Client,
    site: Arc<SiteConfig>,
    crawler: PaginatedCrawler,
}

impl LinkAggregator {
    pub fn new(client: Client, site: SiteConfig, listing_concurrency: u32) -> Self {
        Self {
            client,
            site: Arc::new(site),
            crawler: PaginatedCrawler::new(listing_concurrency),
        }
    }

    /// Crawls every category and merges the link sets
    ///
    /// The category list is checked before any request is made; an
    /// unsupported category fails the whole call.
    pub async fn aggregate_all(
        &self,
        categories: &[String],
    ) -> Result<AggregatedLinks, HarvestError> {
        validate_categories(categories)?;

        let mut seen_urls = HashSet::new();
        let mut memberships = BTreeSet::new();
        let mut aggregated = AggregatedLinks::default();

        for category in categories {
            let discoverer = LinkDiscoverer::new(self.client.clone(), self.site.clone(), category)?;
            let crawl = self.crawler.crawl(&discoverer).await;

            aggregated.summaries.push(CategorySummary {
                category: crawl.category.clone(),
                distinct_links: crawl.links.len(),
                last_page: crawl.last_page,
                failed_pages: crawl.failed_pages.len(),
            });

            for link in crawl.links {
                if let Some(membership) = link.membership() {
                    memberships.insert(membership);
                }
                if seen_urls.insert(link.url.clone()) {
                    aggregated.links.push(link);
                }
            }
        }

        aggregated.memberships = memberships.into_iter().collect();

        tracing::info!(
            "All links were collected, overall num = {}",
            aggregated.links.len()
        );

        Ok(aggregated)
    }
}
