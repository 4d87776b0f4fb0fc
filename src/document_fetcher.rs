use log::{info, warn};

use crate::{
    error::Result,
    link_classifier::DateToken,
    link_discovery::ScheduleLink,
    requests::Fetch,
};

#[derive(Debug, Clone)]
pub struct RawDocument {
    pub date_token: DateToken,
    pub url: String,
    pub bytes: Vec<u8>,
}

/// Downloads every link in order. The first failed download aborts the batch.
///
/// Date tokens are unique in the result: a later link with an already seen
/// token replaces the bytes but keeps the position of the first one.
pub async fn fetch_all(fetcher: &impl Fetch, links: &[ScheduleLink]) -> Result<Vec<RawDocument>> {
    let mut documents: Vec<RawDocument> = Vec::with_capacity(links.len());

    for link in links {
        let bytes = fetcher.fetch_bytes(&link.url).await?;
        info!("Fetched {} ({} bytes)", link.date_token, bytes.len());

        match documents
            .iter_mut()
            .find(|doc| doc.date_token == link.date_token)
        {
            Some(existing) => {
                warn!(
                    "{} is published twice, keeping {} over {}",
                    link.date_token, link.url, existing.url
                );
                existing.url = link.url.clone();
                existing.bytes = bytes;
            }
            None => documents.push(RawDocument {
                date_token: link.date_token.clone(),
                url: link.url.clone(),
                bytes,
            }),
        }
    }

    Ok(documents)
}
