//! AP user role command handlers.

use tabled::Tabled;
use wlanctl_core::{Controller, UserRole};

use crate::cli::{GlobalOpts, RolesArgs, RolesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "Role")]
    name: String,
    #[tabled(rename = "ACLs")]
    acls: String,
}

impl From<&UserRole> for RoleRow {
    fn from(r: &UserRole) -> Self {
        Self {
            name: r.name.clone(),
            acls: r.acls.join("\n"),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: RolesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RolesCommand::List { group } => {
            let session = controller.open_session(&group).await?;
            let roles: Vec<UserRole> = session.records().roles().cloned().collect();
            let out = output::render_list(
                &global.output,
                &roles,
                |r| RoleRow::from(r),
                |r| r.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Ensure { name, group, acls } => {
            let role = if acls.is_empty() {
                UserRole::permit_all(name)
            } else {
                UserRole::new(name, acls)
            };
            let mut session = controller.open_session(&group).await?;
            if controller.ensure_ap_role(&mut session, &role).await? {
                output::success(global, &format!("Role {} saved in {group}", role.name));
            } else {
                output::success(global, &format!("Role {} already up to date", role.name));
            }
            Ok(())
        }
    }
}
