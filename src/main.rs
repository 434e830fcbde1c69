use clap::Parser;
use color_eyre::Result;
use daybook::cli::{self, Cli, Commands, Session, TaskEdit};
use daybook::{Config, Profile, logging, utils};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps a separate config and snapshot
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(&utils::expand_path(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };
    logging::init_logging(&config.log_filter);

    let snapshot_path = cli.file.clone().unwrap_or_else(|| config.get_snapshot_path());
    let mut session = Session::open(&snapshot_path, config.seed_sample_data)?;

    let command = cli.command.unwrap_or(Commands::Dashboard);
    let mutates = command.is_mutation();
    let store = &mut session.store;

    match command {
        Commands::Dashboard => cli::handle_dashboard(&config, store)?,
        Commands::AddEntry { text } => cli::handle_add_entry(&text, store)?,
        Commands::EditEntry { id, text } => cli::handle_edit_entry(&id, &text, store)?,
        Commands::DeleteEntry { id } => cli::handle_delete_entry(&id, store)?,
        Commands::Entries { query, date, tag, json } => {
            cli::handle_entries(query, date, tag, json, store)?
        }
        Commands::AddTask { title, description, priority, due, tags } => {
            cli::handle_add_task(title, description, priority, due, tags, store)?
        }
        Commands::EditTask { id, title, description, priority, due, clear_due, tags } => {
            let edit = TaskEdit { title, description, priority, due, clear_due, tags };
            cli::handle_edit_task(&id, edit, store)?
        }
        Commands::ToggleTask { id } => cli::handle_toggle_task(&id, store)?,
        Commands::DeleteTask { id } => cli::handle_delete_task(&id, store)?,
        Commands::Tasks { query, tag, status, json } => {
            cli::handle_tasks(query, tag, status, json, store)?
        }
        Commands::Tags => cli::handle_tags(store)?,
        Commands::Stats { json } => cli::handle_stats(json, store)?,
        Commands::Random => cli::handle_random(store)?,
        Commands::Export { out } => {
            cli::handle_export(out, &config, store)?;
        }
        Commands::Import { file } => cli::handle_import(&file, store)?,
    }

    // Changes only survive the session through the working snapshot
    if mutates {
        session.save()?;
    }

    Ok(())
}
