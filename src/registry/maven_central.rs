//! Maven Central Search API adapter
//!
//! Fetches artifact versions from Maven Central.
//! API endpoint: https://search.maven.org/solrsearch/select
//!
//! Query format: q=g:{groupId}+AND+a:{artifactId}&core=gav&rows=200&wt=json

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, ReleaseSet};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Maven Central Search API base URL
const MAVEN_CENTRAL_API_URL: &str = "https://search.maven.org/solrsearch/select";

/// Maximum number of versions to fetch
const MAX_VERSIONS: u32 = 200;

/// Maven Central adapter
pub struct MavenCentralAdapter {
    client: HttpClient,
    base_url: String,
}

/// Maven Central search response
#[derive(Debug, Deserialize)]
struct MavenSearchResponse {
    response: MavenResponseBody,
}

/// Maven Central response body
#[derive(Debug, Deserialize)]
struct MavenResponseBody {
    #[serde(rename = "numFound")]
    num_found: u64,
    docs: Vec<MavenVersionDoc>,
}

/// Maven Central version document
#[derive(Debug, Deserialize)]
struct MavenVersionDoc {
    /// Group id
    g: String,
    /// Artifact id
    a: String,
    /// Version string
    v: String,
}

impl MavenCentralAdapter {
    /// Create a new Maven Central adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: MAVEN_CENTRAL_API_URL.to_string(),
        }
    }

    /// Use another Solr search endpoint instead of Maven Central
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        self
    }

    /// Build search URL for group:artifact
    fn build_url(&self, package: &str) -> Result<String, RegistryError> {
        // package format: "group:artifact" (e.g., "org.apache.wicket:wicket-core")
        let parts: Vec<&str> = package.split(':').collect();
        let [group, artifact] = parts[..] else {
            return Err(RegistryError::invalid_package_name(
                package,
                self.registry_name(),
                "expected format 'groupId:artifactId'",
            ));
        };
        if group.is_empty() || artifact.is_empty() {
            return Err(RegistryError::invalid_package_name(
                package,
                self.registry_name(),
                "expected format 'groupId:artifactId'",
            ));
        }
        Ok(format!(
            "{}?q=g:{}+AND+a:{}&core=gav&rows={}&wt=json",
            self.base_url, group, artifact, MAX_VERSIONS
        ))
    }
}

fn into_release_set(
    response: MavenSearchResponse,
    package: &str,
    registry: &str,
) -> Result<ReleaseSet, RegistryError> {
    let body = response.response;
    // The search API answers unknown coordinates with an empty result, not a 404
    let Some(first) = body.docs.first() else {
        return Err(RegistryError::package_not_found(package, registry));
    };
    let name = format!("{}:{}", first.g, first.a);
    debug!(package, found = body.num_found, "maven search results");
    let releases = body.docs.into_iter().map(|doc| doc.v).collect();
    Ok(ReleaseSet::new(name, releases))
}

#[async_trait]
impl RegistryAdapter for MavenCentralAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    async fn fetch_releases(&self, package: &str) -> Result<ReleaseSet, RegistryError> {
        let url = self.build_url(package)?;
        let response: MavenSearchResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        into_release_set(response, package, self.registry_name())
    }
}
