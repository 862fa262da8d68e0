// Gateway command execution
//
// Gateway groups take configuration as CLI commands executed through
// `POST /caasapi/v1/exec/cmd?group_name={group}`.

use tracing::{debug, info};

use crate::client::{CentralClient, decode};
use crate::error::Error;
use crate::models::{ExecBody, ExecResponse};

const EXEC_SUCCESS: &str = "Success";

impl CentralClient {
    /// Execute configuration commands against a gateway group.
    ///
    /// Succeeds only when `_global_result.status_str` is `"Success"`.
    pub async fn exec_gateway_commands(&self, group: &str, commands: &[String]) -> Result<(), Error> {
        let url = self.endpoint_with_query(&["caasapi", "v1", "exec", "cmd"], &[("group_name", group)])?;
        debug!(group, commands = commands.len(), "executing gateway commands");
        let body = self
            .post(url, &ExecBody { cli_cmds: commands })
            .await?
            .into_result()?;

        let result: ExecResponse = decode(&body)?;
        if result.global_result.status_str == EXEC_SUCCESS {
            info!(group, "gateway configuration applied");
            Ok(())
        } else {
            Err(Error::Rejected {
                message: format!(
                    "gateway group {group} did not apply the configuration: {}",
                    if result.global_result.status_str.is_empty() {
                        "no status"
                    } else {
                        result.global_result.status_str.as_str()
                    }
                ),
            })
        }
    }
}
