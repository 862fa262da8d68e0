//! AP group command handlers.

use tabled::Tabled;
use wlanctl_core::Controller;

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    name: String,
}

pub async fn handle(
    controller: &Controller,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List => {
            let groups = controller.list_groups().await?;
            let out = output::render_list(
                &global.output,
                &groups,
                |g| GroupRow { name: g.clone() },
                Clone::clone,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Show { group } => {
            let document = controller.fetch_document(&group).await?;
            let out = output::render_single(
                &global.output,
                &document,
                |d| d.lines().join("\n"),
                |d| d.lines().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Push { group, file } => {
            let lines = util::read_config_file(&file)?;
            util::require_confirmation(
                &format!(
                    "Replace the whole configuration of group {group} with {} line(s)?",
                    lines.len()
                ),
                "groups push",
                global.yes,
            )?;
            let document = controller.replace_group_config(&group, lines).await?;
            output::success(
                global,
                &format!("Group {group} configured with {} line(s)", document.lines().len()),
            );
            Ok(())
        }
    }
}
