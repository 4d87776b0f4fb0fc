use log::{debug, info};
use reqwest::Url;
use scraper::{Html, Selector};

use crate::{
    config::ELEMENT_SELECTOR,
    error::{Result, ScheduleError},
    link_classifier::{DateToken, extract_date_token},
    requests::Fetch,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleLink {
    pub url: String,
    pub date_token: DateToken,
}

pub struct LinkDiscovery<'a, F> {
    fetcher: &'a F,
    page_url: String,
    selector: Selector,
}

impl<'a, F: Fetch> LinkDiscovery<'a, F> {
    pub fn new(fetcher: &'a F, page_url: impl Into<String>) -> Result<Self> {
        let selector =
            Selector::parse(ELEMENT_SELECTOR).map_err(|e| ScheduleError::HtmlSelector {
                selector: ELEMENT_SELECTOR.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            fetcher,
            page_url: page_url.into(),
            selector,
        })
    }

    /// Fetches the schedule page and returns its schedule links in page order.
    pub async fn discover_links(&self) -> Result<Vec<ScheduleLink>> {
        let html = self.fetcher.fetch_text(&self.page_url).await?;
        let links = schedule_links_in(&html, &self.selector, &self.page_url);
        info!(
            "Discovered {} schedule link(s) on {}",
            links.len(),
            self.page_url
        );
        Ok(links)
    }
}

/// Classifies every selected anchor in `html`, keeping the schedule links.
///
/// Anchors without an `href` are skipped, as are hrefs that can't be made
/// absolute against `page_url`.
pub fn schedule_links_in(html: &str, selector: &Selector, page_url: &str) -> Vec<ScheduleLink> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| {
            let date_token = extract_date_token(href)?;
            let Some(url) = resolve(base.as_ref(), href) else {
                debug!("Skipping unresolvable schedule href {href}");
                return None;
            };
            Some(ScheduleLink { url, date_token })
        })
        .collect()
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base?.join(href).ok().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE_URL: &str = "https://school.example.ru/raspisanie/";

    const PAGE: &str = r#"
        <html><body>
          <a href="https://school.example.ru/uploads/5 сентября.pdf" target="_blank">5 сентября</a>
          <a href="https://school.example.ru/uploads/6 сентября.pdf">no target</a>
          <a href="https://school.example.ru/uploads/news.pdf" target="_blank">news</a>
          <a target="_blank">no href</a>
          <a href="/uploads/7 сентября.pdf" target="_blank">relative</a>
          <a href="https://school.example.ru/uploads/1 сентября.pdf" target="_blank">earlier date, later in page</a>
          <a href="https://school.example.ru/uploads/a.b.pdf" target="_blank">dotted</a>
        </body></html>
    "#;

    struct StaticPage {
        html: &'static str,
        hits: AtomicUsize,
    }

    #[async_trait]
    impl Fetch for StaticPage {
        async fn fetch_text(&self, _url: &str) -> Result<String> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.to_string())
        }

        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
            Err(ScheduleError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn tokens(links: &[ScheduleLink]) -> Vec<&str> {
        links.iter().map(|l| l.date_token.as_str()).collect()
    }

    #[tokio::test]
    async fn keeps_schedule_links_in_page_order() {
        let page = StaticPage {
            html: PAGE,
            hits: AtomicUsize::new(0),
        };
        let discovery = LinkDiscovery::new(&page, PAGE_URL).unwrap();
        let links = discovery.discover_links().await.unwrap();

        assert_eq!(tokens(&links), vec!["5 сентября", "7 сентября", "1 сентября"]);
        assert_eq!(page.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolves_relative_hrefs_against_the_page() {
        let page = StaticPage {
            html: PAGE,
            hits: AtomicUsize::new(0),
        };
        let links = LinkDiscovery::new(&page, PAGE_URL)
            .unwrap()
            .discover_links()
            .await
            .unwrap();
        let relative = &links[1];
        assert!(relative.url.starts_with("https://school.example.ru/uploads/"));
        assert_eq!(relative.date_token.as_str(), "7 сентября");
    }

    #[tokio::test]
    async fn repeated_discovery_is_stable() {
        let page = StaticPage {
            html: PAGE,
            hits: AtomicUsize::new(0),
        };
        let discovery = LinkDiscovery::new(&page, PAGE_URL).unwrap();
        let first = discovery.discover_links().await.unwrap();
        let second = discovery.discover_links().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn page_without_links_yields_nothing() {
        let page = StaticPage {
            html: "<html><body><p>Расписание скоро появится",
            hits: AtomicUsize::new(0),
        };
        let links = LinkDiscovery::new(&page, PAGE_URL)
            .unwrap()
            .discover_links()
            .await
            .unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn page_fetch_failure_is_propagated() {
        struct Down;

        #[async_trait]
        impl Fetch for Down {
            async fn fetch_text(&self, url: &str) -> Result<String> {
                Err(ScheduleError::Transport {
                    url: url.to_string(),
                    source: "connection refused".into(),
                })
            }

            async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>> {
                unreachable!()
            }
        }

        let err = LinkDiscovery::new(&Down, PAGE_URL)
            .unwrap()
            .discover_links()
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Transport { .. }));
    }
}
