use crate::cli::{AccountCommand, Commands};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Import { json, .. }
        | Commands::Recurring { json, .. }
        | Commands::Forecast { json, .. }
        | Commands::Hide { json, .. }
        | Commands::Unhide { json, .. }
        | Commands::Hidden { json } => *json,
        Commands::Account { command } => match command {
            AccountCommand::SetBalance { json, .. }
            | AccountCommand::Include { json, .. }
            | AccountCommand::Exclude { json, .. }
            | AccountCommand::List { json } => *json,
        },
    };
    OutputMode::from_flag(json)
}
