//! Go Module Proxy adapter
//!
//! Fetches the tagged versions of a module from the Go Module Proxy.
//! API endpoint: https://proxy.golang.org/{module}/@v/list

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter, ReleaseSet};
use async_trait::async_trait;

/// Go Module Proxy base URL
const GO_PROXY_URL: &str = "https://proxy.golang.org";

/// Go Module Proxy adapter
pub struct GoProxyAdapter {
    client: HttpClient,
    base_url: String,
}

impl GoProxyAdapter {
    /// Create a new Go Proxy adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: GO_PROXY_URL.to_string(),
        }
    }

    /// Use another GOPROXY instead of proxy.golang.org
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        self
    }

    /// Build the URL for listing versions
    fn build_list_url(&self, module: &str) -> String {
        format!("{}/{}/@v/list", self.base_url, Self::encode_module_path(module))
    }

    /// Encode module path for the Go Proxy URL
    fn encode_module_path(module: &str) -> String {
        // Go Proxy uses case-encoded paths where uppercase letters become !lowercase
        let mut encoded = String::with_capacity(module.len() + 4);
        for ch in module.chars() {
            if ch.is_uppercase() {
                encoded.push('!');
                encoded.extend(ch.to_lowercase());
            } else {
                encoded.push(ch);
            }
        }
        encoded
    }
}

/// Parse the `@v/list` body: one version per line
fn parse_version_list(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl RegistryAdapter for GoProxyAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    async fn fetch_releases(&self, module: &str) -> Result<ReleaseSet, RegistryError> {
        let list_url = self.build_list_url(module);
        let body = self
            .client
            .get_text(&list_url, module, self.registry_name())
            .await?;

        // Module paths are case-sensitive; the proxy has no canonical spelling to offer
        Ok(ReleaseSet::new(module, parse_version_list(&body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> GoProxyAdapter {
        GoProxyAdapter::new(HttpClient::new().unwrap())
    }

    #[test]
    fn test_go_proxy_adapter_registry_name() {
        assert_eq!(adapter().registry_name(), "Go Proxy");
    }

    #[test]
    fn test_encode_module_path_simple() {
        assert_eq!(
            GoProxyAdapter::encode_module_path("github.com/gin-gonic/gin"),
            "github.com/gin-gonic/gin"
        );
    }

    #[test]
    fn test_encode_module_path_with_uppercase() {
        // Uppercase letters should be encoded as !lowercase
        assert_eq!(
            GoProxyAdapter::encode_module_path("github.com/Azure/azure-sdk-for-go"),
            "github.com/!azure/azure-sdk-for-go"
        );
    }

    #[test]
    fn test_build_list_url() {
        assert_eq!(
            adapter().build_list_url("github.com/gin-gonic/gin"),
            "https://proxy.golang.org/github.com/gin-gonic/gin/@v/list"
        );
    }

    #[test]
    fn test_build_list_url_with_mirror() {
        let adapter = adapter().with_base_url(Some("https://goproxy.cn"));
        assert_eq!(
            adapter.build_list_url("github.com/BurntSushi/toml"),
            "https://goproxy.cn/github.com/!burnt!sushi/toml/@v/list"
        );
    }

    #[test]
    fn test_parse_version_list() {
        let body = "v1.9.0\nv1.9.1\n\n  v1.10.0  \n";
        assert_eq!(
            parse_version_list(body),
            vec!["v1.9.0", "v1.9.1", "v1.10.0"]
        );
        assert!(parse_version_list("").is_empty());
    }
}
