//! Repository enumeration.
//!
//! Wildcard owners are paginated through their listing endpoint; any failed
//! page aborts the whole listing. Literal repositories go through the
//! tolerant fan-out in [`super::fetcher`].

use std::time::Duration;

use futures_util::future::try_join_all;

use ghexporter_core::api::{self, Endpoint, PER_PAGE};
use ghexporter_core::error::{ExporterError, Result};
use ghexporter_core::record::RepositoryRecord;
use ghexporter_core::target::{OwnerKind, TargetMap};

use super::client::UpstreamClient;
use super::fetcher::fetch_all;

/// All pages of one owner, starting at page 1, until a short page.
pub async fn list_owner(
    client: &UpstreamClient,
    owner: &str,
    kind: OwnerKind,
) -> Result<Vec<RepositoryRecord>> {
    let mut out = Vec::new();
    let mut page = 1;
    loop {
        let url = Endpoint::OwnerRepos { owner, kind, page }.url(client.base());
        let body = client.get_bytes(&url).await?;
        let batch = api::decode_repo_page(&url, &body)?;
        let len = batch.len();
        out.extend(batch);
        if len < PER_PAGE {
            break;
        }
        page += 1;
    }
    tracing::debug!(%owner, pages = page, repos = out.len(), "owner listed");
    Ok(out)
}

/// Concatenated listings of every wildcard owner. All-or-nothing.
pub async fn list_all(
    client: &UpstreamClient,
    targets: &TargetMap,
) -> Result<Vec<RepositoryRecord>> {
    let lists = try_join_all(
        targets
            .wildcard_owners()
            .map(|(owner, kind)| list_owner(client, owner, kind)),
    )
    .await?;
    Ok(lists.into_iter().flatten().collect())
}

/// Records decoded from the tolerant fan-out, plus what went wrong.
#[derive(Debug, Default)]
pub struct Fetched {
    pub records: Vec<RepositoryRecord>,
    pub errors: Vec<ExporterError>,
}

/// Fetch every literal `owner/repo` target concurrently.
pub async fn fetch_literal(
    client: &UpstreamClient,
    targets: &TargetMap,
    deadline: Duration,
) -> Fetched {
    let urls: Vec<String> = targets
        .literal_repos()
        .map(|(owner, repo)| Endpoint::Repo { owner, repo }.url(client.base()))
        .collect();

    let mut fetched = Fetched::default();
    for resp in fetch_all(client, urls, deadline).await {
        // transport/status failures were already logged by the fetcher
        let body = match resp.outcome {
            Ok(body) => body,
            Err(e) => {
                fetched.errors.push(e);
                continue;
            }
        };
        match api::decode_repo(&resp.url, &body) {
            Ok(record) => fetched.records.push(record),
            Err(e) => {
                tracing::error!(url = %resp.url, error = %e, "undecodable repository payload");
                fetched.errors.push(e);
            }
        }
    }
    fetched
}
