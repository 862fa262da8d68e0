// Configuration API endpoints
//
// AP group configuration is exchanged as a flat list of CLI lines:
// `GET /configuration/v1/ap_cli/{group}` returns it and a POST with
// `{"clis": [...]}` replaces it wholesale. The v2 WLAN endpoint exposes
// one profile as a JSON record and is the only place the platform returns
// a pre-shared key in plaintext.

use tracing::{debug, info};

use crate::client::{CentralClient, decode};
use crate::error::Error;
use crate::models::{ApCliBody, GroupPage, WlanDetail};

const GROUP_PAGE_SIZE: usize = 20;

impl CentralClient {
    /// Fetch the full configuration of an AP group as ordered lines.
    ///
    /// `GET /configuration/v1/ap_cli/{group}`
    pub async fn fetch_group_config(&self, group: &str) -> Result<Vec<String>, Error> {
        let url = self.endpoint(&["configuration", "v1", "ap_cli", group])?;
        debug!(group, "fetching group configuration");
        self.get_json(url).await
    }

    /// Replace the configuration of an AP group.
    ///
    /// `POST /configuration/v1/ap_cli/{group}` with `{"clis": [...]}`.
    /// The platform answers with the group name when the change is accepted;
    /// anything else means the push did not take.
    pub async fn push_group_config(&self, group: &str, lines: &[String]) -> Result<(), Error> {
        let url = self.endpoint(&["configuration", "v1", "ap_cli", group])?;
        debug!(group, lines = lines.len(), "pushing group configuration");
        let body = self
            .post(url, &ApCliBody { clis: lines })
            .await?
            .into_result()?;

        let confirmed = serde_json::from_str::<String>(&body)
            .unwrap_or_else(|_| body.trim().to_owned());
        if confirmed == group {
            info!(group, "group configuration applied");
            Ok(())
        } else {
            Err(Error::Rejected {
                message: format!("configuration was not applied to group {group}"),
            })
        }
    }

    /// Fetch the structured record of one WLAN profile.
    ///
    /// `GET /configuration/v2/wlan/{group}/{wlan}`
    pub async fn fetch_wlan(&self, group: &str, wlan: &str) -> Result<WlanDetail, Error> {
        let url = self.endpoint(&["configuration", "v2", "wlan", group, wlan])?;
        debug!(group, wlan, "fetching WLAN record");
        self.get_json(url).await
    }

    /// Write back a WLAN record obtained from [`fetch_wlan`](Self::fetch_wlan).
    ///
    /// `PUT /configuration/v2/wlan/{group}/{wlan}`. The platform answers
    /// with the WLAN name when the change is accepted.
    pub async fn update_wlan(
        &self,
        group: &str,
        wlan: &str,
        detail: &WlanDetail,
    ) -> Result<(), Error> {
        let url = self.endpoint(&["configuration", "v2", "wlan", group, wlan])?;
        debug!(group, wlan, "updating WLAN record");
        let body = self.put(url, detail).await?.into_result()?;

        let confirmed = serde_json::from_str::<String>(&body)
            .unwrap_or_else(|_| body.trim().to_owned());
        if confirmed == wlan {
            info!(group, wlan, "WLAN record updated");
            Ok(())
        } else {
            Err(Error::Rejected {
                message: format!("WLAN {wlan} was not updated in group {group}"),
            })
        }
    }

    /// List every configuration group name, following pagination.
    ///
    /// `GET /configuration/v2/groups?offset=N&limit=20`
    pub async fn list_groups(&self) -> Result<Vec<String>, Error> {
        let mut groups = Vec::new();
        let mut offset = 0usize;
        loop {
            let offset_param = offset.to_string();
            let limit_param = GROUP_PAGE_SIZE.to_string();
            let url = self.endpoint_with_query(
                &["configuration", "v2", "groups"],
                &[("offset", offset_param.as_str()), ("limit", limit_param.as_str())],
            )?;
            let body = self.get(url).await?.into_result()?;
            let page: GroupPage = decode(&body)?;
            let fetched = page.data.len();
            groups.extend(page.data.into_iter().filter_map(|row| row.into_iter().next()));
            if fetched < GROUP_PAGE_SIZE {
                break;
            }
            offset += fetched;
        }
        debug!(count = groups.len(), "listed configuration groups");
        Ok(groups)
    }
}
