//! Category CLI commands

use clap::Subcommand;

use crate::error::SplitpennyResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category commands
#[derive(Debug, Subcommand)]
pub enum CategoryCommands {
    /// List the category catalog
    List,
}

/// Handle a category subcommand
pub fn handle_category_command(
    storage: &Storage,
    command: CategoryCommands,
) -> SplitpennyResult<()> {
    let service = CategoryService::new(storage);

    match command {
        CategoryCommands::List => {
            for category in service.list()? {
                println!("{:<16} {}", category.key, category);
            }
        }
    }

    Ok(())
}
