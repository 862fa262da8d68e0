// ── Platform backend seam ──
//
// The controller talks to the platform through this trait. `CentralClient`
// is the production implementation; tests substitute an in-memory one.

use std::future::Future;

use wlanctl_api::{CentralClient, WlanDetail};

use crate::error::CoreError;

/// Platform operations the controller needs.
pub trait CentralBackend: Sync {
    /// Ordered configuration lines of an AP group.
    fn fetch_group_config(
        &self,
        group: &str,
    ) -> impl Future<Output = Result<Vec<String>, CoreError>> + Send;

    /// Replace an AP group's configuration; `Ok` only once the platform confirms.
    fn push_group_config(
        &self,
        group: &str,
        lines: &[String],
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Structured record of one WLAN, the only source of its plaintext key.
    fn fetch_wlan(
        &self,
        group: &str,
        wlan: &str,
    ) -> impl Future<Output = Result<WlanDetail, CoreError>> + Send;

    /// Write back a WLAN record; `Ok` only once the platform confirms.
    fn update_wlan(
        &self,
        group: &str,
        wlan: &str,
        detail: &WlanDetail,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Run configuration commands on a gateway group.
    fn exec_gateway_commands(
        &self,
        group: &str,
        commands: &[String],
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_groups(&self) -> impl Future<Output = Result<Vec<String>, CoreError>> + Send;

    /// Sites of the APs assigned to an AP group.
    fn sites_for_group(
        &self,
        group: &str,
    ) -> impl Future<Output = Result<Vec<String>, CoreError>> + Send;

    /// Configuration groups of the gateways at a site.
    fn gateway_groups_for_site(
        &self,
        site: &str,
    ) -> impl Future<Output = Result<Vec<String>, CoreError>> + Send;
}

impl CentralBackend for CentralClient {
    async fn fetch_group_config(&self, group: &str) -> Result<Vec<String>, CoreError> {
        Ok(CentralClient::fetch_group_config(self, group).await?)
    }

    async fn push_group_config(&self, group: &str, lines: &[String]) -> Result<(), CoreError> {
        Ok(CentralClient::push_group_config(self, group, lines).await?)
    }

    async fn fetch_wlan(&self, group: &str, wlan: &str) -> Result<WlanDetail, CoreError> {
        Ok(CentralClient::fetch_wlan(self, group, wlan).await?)
    }

    async fn update_wlan(&self, group: &str, wlan: &str, detail: &WlanDetail) -> Result<(), CoreError> {
        Ok(CentralClient::update_wlan(self, group, wlan, detail).await?)
    }

    async fn exec_gateway_commands(&self, group: &str, commands: &[String]) -> Result<(), CoreError> {
        Ok(CentralClient::exec_gateway_commands(self, group, commands).await?)
    }

    async fn list_groups(&self) -> Result<Vec<String>, CoreError> {
        Ok(CentralClient::list_groups(self).await?)
    }

    async fn sites_for_group(&self, group: &str) -> Result<Vec<String>, CoreError> {
        let aps = self.aps_for_group(group).await?;
        Ok(aps.into_iter().filter_map(|ap| ap.site).collect())
    }

    async fn gateway_groups_for_site(&self, site: &str) -> Result<Vec<String>, CoreError> {
        let gateways = self.gateways_for_site(site).await?;
        Ok(gateways.into_iter().filter_map(|gw| gw.group_name).collect())
    }
}
