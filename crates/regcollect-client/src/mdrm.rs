use tracing::instrument;

use regcollect_common::records::MdrmItem;
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_mdrm_items(&self) -> Result<Vec<MdrmItem>> {
        self.get_json("/mdrm/items").await
    }

    /// Server-side search; matches identifier, name and definition.
    #[instrument(skip(self))]
    pub async fn search_mdrm(&self, query: &str, series_mnemonic: Option<&str>) -> Result<Vec<MdrmItem>> {
        let mut params = vec![("query", query)];
        if let Some(mnemonic) = series_mnemonic {
            params.push(("series_mnemonic", mnemonic));
        }
        self.get_json_with_query("/mdrm/search", &params).await
    }
}
