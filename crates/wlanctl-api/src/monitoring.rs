// Monitoring API endpoints
//
// Used to walk from an AP group to the gateway groups that serve it:
// APs of the group carry their site, gateways of a site carry their group.

use tracing::debug;

use crate::client::CentralClient;
use crate::error::Error;
use crate::models::{ApList, ApSummary, GatewayList, GatewaySummary};

impl CentralClient {
    /// List the access points assigned to a configuration group.
    ///
    /// `GET /monitoring/v2/aps?group={group}`
    pub async fn aps_for_group(&self, group: &str) -> Result<Vec<ApSummary>, Error> {
        let url = self.endpoint_with_query(&["monitoring", "v2", "aps"], &[("group", group)])?;
        debug!(group, "listing access points");
        let list: ApList = self.get_json(url).await?;
        Ok(list.aps)
    }

    /// List the gateways deployed at a site.
    ///
    /// `GET /monitoring/v1/gateways?site={site}`
    pub async fn gateways_for_site(&self, site: &str) -> Result<Vec<GatewaySummary>, Error> {
        let url = self.endpoint_with_query(&["monitoring", "v1", "gateways"], &[("site", site)])?;
        debug!(site, "listing gateways");
        let list: GatewayList = self.get_json(url).await?;
        Ok(list.gateways)
    }
}
