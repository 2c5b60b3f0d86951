use clap::Subcommand;
use simplehiit_core::Database;

#[derive(Subcommand)]
pub enum UsersAction {
    /// Add a user (selected for the next session)
    Add {
        /// Display name
        name: String,
    },
    /// List users
    List,
    /// Include a user in the next sessions
    Select {
        /// User ID
        id: i64,
    },
    /// Leave a user out of the next sessions
    Unselect {
        /// User ID
        id: i64,
    },
    /// Remove a user
    Remove {
        /// User ID
        id: i64,
    },
}

pub fn run(action: UsersAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        UsersAction::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err("user name must not be empty".into());
            }
            let user = db.insert_user(name)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UsersAction::List => {
            let users = db.users()?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
        UsersAction::Select { id } => {
            db.set_user_selected(id, true)?;
            println!("ok");
        }
        UsersAction::Unselect { id } => {
            db.set_user_selected(id, false)?;
            println!("ok");
        }
        UsersAction::Remove { id } => {
            db.delete_user(id)?;
            println!("user {id} removed");
        }
    }
    Ok(())
}
