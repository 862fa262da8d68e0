//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod config_cmd;
pub mod groups;
pub mod mpsk;
pub mod roles;
pub mod util;
pub mod wlans;

use wlanctl_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a platform-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Groups(args) => groups::handle(controller, args, global).await,
        Command::Wlans(args) => wlans::handle(controller, args, global).await,
        Command::Roles(args) => roles::handle(controller, args, global).await,
        Command::Mpsk(args) => mpsk::handle(controller, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
