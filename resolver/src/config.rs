use serde::Deserialize;
use std::collections::HashMap;

const DEFAULT_REVISION_QUERY_PARAM: &str = "index_key";

fn default_revision_query_param() -> String {
    DEFAULT_REVISION_QUERY_PARAM.to_string()
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct ResolverOptions {
    /// Name of the query parameter carrying an explicit revision token.
    #[serde(default = "default_revision_query_param")]
    pub revision_query_param: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            revision_query_param: default_revision_query_param(),
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum StoreConfig {
    Memory {
        #[serde(default)]
        entries: HashMap<String, String>,
    },
    Redis {
        url: String,
        timeout_ms: Option<u64>,
    },
}
