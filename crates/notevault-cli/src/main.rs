//! NoteVault CLI - a single-user, local-only encrypted note vault
//!
//! This is the command-line interface for NoteVault. Each invocation opens
//! the vault file, unlocks it with the passphrase, performs its work, and
//! exits - the process is the session.

use std::io::{self, IsTerminal, Read};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use dialoguer::{Confirm, Password};
use uuid::Uuid;

use notevault_core::note::{Note, NoteDraft, NoteFilter};
use notevault_core::{Vault, VERSION};

/// NoteVault - a single-user, local-only encrypted note vault
#[derive(Parser)]
#[command(name = "notevault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the vault file
    #[arg(short = 'f', long, global = true, env = "NOTEVAULT_PATH")]
    vault: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new encrypted vault
    Init,

    /// Add a new note
    Add {
        /// Note title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Note content (overrides stdin)
        #[arg(long)]
        content: Option<String>,

        /// Pin the note
        #[arg(long)]
        pin: bool,
    },

    /// List notes
    List {
        /// Show the archive instead of active notes
        #[arg(long)]
        archived: bool,

        /// Filter by a case-insensitive substring of title or content
        #[arg(long)]
        query: Option<String>,

        /// Limit number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Output format (table, plain)
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,
    },

    /// Show a specific note by ID
    Show {
        /// Note ID (full UUID or unique prefix)
        #[arg(value_name = "ID")]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a note's title and/or content
    Edit {
        /// Note ID (full UUID or unique prefix)
        #[arg(value_name = "ID")]
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New content
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note ID (full UUID or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Toggle a note's pin state
    Pin {
        /// Note ID (full UUID or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Toggle a note's archive state
    Archive {
        /// Note ID (full UUID or unique prefix)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Export all notes, archived included
    Export {
        /// Output format
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Show vault status
    Status,

    /// Destroy the vault: delete the verifier and every note. Irreversible.
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let Cli {
        vault,
        command,
        quiet,
    } = Cli::parse();

    match command {
        Some(Commands::Init) => {
            let target = vault_path(&vault)?;
            let mut vault = Vault::open(&target)?;
            if vault.is_initialized()? {
                return Err(anyhow::anyhow!("Vault at {} is already initialized", target));
            }

            let passphrase = prompt_init_passphrase()?;
            vault.bootstrap(&passphrase)?;

            if !quiet {
                println!("Initialized new vault at {}", target);
            }
        }
        Some(Commands::Add {
            title,
            content,
            pin,
        }) => {
            let mut vault = unlock_vault(&vault)?;

            let content = read_content(content)?;
            let mut draft = NoteDraft::new(title, content);
            if pin {
                draft = draft.pinned(true);
            }
            let note = vault.persist_note(draft)?;

            if !quiet {
                println!("Added note {}", note.id);
            }
        }
        Some(Commands::List {
            archived,
            query,
            limit,
            json,
            format,
        }) => {
            let vault = unlock_vault(&vault)?;

            let mut filter = NoteFilter::new().archived(archived);
            if let Some(q) = query {
                filter = filter.query(q);
            }
            let mut notes = vault.filtered(&filter)?;
            if let Some(limit) = limit {
                notes.truncate(limit);
            }

            let format = parse_output_format(format.as_deref())?;
            if json {
                if format.is_some() {
                    return Err(anyhow::anyhow!("--format cannot be used with --json"));
                }
                let values: Vec<_> = notes
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<_, _>>()?;
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                match format.unwrap_or(OutputFormat::Table) {
                    OutputFormat::Table => {
                        if !quiet {
                            println!("ID | UPDATED_AT | FLAGS | TITLE");
                        }
                        for note in &notes {
                            println!(
                                "{} | {} | {} | {}",
                                note.id,
                                note.updated_at.to_rfc3339(),
                                flags(note),
                                summary(note)
                            );
                        }
                    }
                    OutputFormat::Plain => {
                        for note in &notes {
                            println!("{} {}", note.id, summary(note));
                        }
                    }
                }
            }
        }
        Some(Commands::Show { id, json }) => {
            let vault = unlock_vault(&vault)?;
            let id = resolve_note_id(&vault, &id)?;
            let note = vault
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("Note not found"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&note)?);
            } else {
                println!("Title:    {}", note.title);
                println!("Id:       {}", note.id);
                println!("Flags:    {}", flags(note));
                println!("Created:  {}", note.created_at.to_rfc3339());
                println!("Updated:  {}", note.updated_at.to_rfc3339());
                println!();
                println!("{}", note.content);
            }
        }
        Some(Commands::Edit { id, title, content }) => {
            let mut vault = unlock_vault(&vault)?;
            let id = resolve_note_id(&vault, &id)?;
            let note = vault
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("Note not found"))?;

            let draft = NoteDraft::new(
                title.unwrap_or_else(|| note.title.clone()),
                content.unwrap_or_else(|| note.content.clone()),
            )
            .with_id(id);
            let note = vault.persist_note(draft)?;

            if !quiet {
                println!("Updated note {}", note.id);
            }
        }
        Some(Commands::Delete { id }) => {
            let mut vault = unlock_vault(&vault)?;
            let id = resolve_note_id(&vault, &id)?;
            vault.delete_note(&id)?;

            if !quiet {
                println!("Deleted note {}", id);
            }
        }
        Some(Commands::Pin { id }) => {
            let mut vault = unlock_vault(&vault)?;
            let id = resolve_note_id(&vault, &id)?;
            let note = vault.toggle_pin(&id)?;

            if !quiet {
                println!(
                    "Note {} is now {}",
                    note.id,
                    if note.pinned { "pinned" } else { "unpinned" }
                );
            }
        }
        Some(Commands::Archive { id }) => {
            let mut vault = unlock_vault(&vault)?;
            let id = resolve_note_id(&vault, &id)?;
            let note = vault.toggle_archive(&id)?;

            if !quiet {
                println!(
                    "Note {} is now {}",
                    note.id,
                    if note.archived { "archived" } else { "active" }
                );
            }
        }
        Some(Commands::Export { format }) => {
            let vault = unlock_vault(&vault)?;
            let notes = vault.notes()?;

            match format.as_str() {
                "json" => {
                    let values: Vec<_> = notes
                        .iter()
                        .map(serde_json::to_value)
                        .collect::<Result<_, _>>()?;
                    println!("{}", serde_json::to_string_pretty(&values)?);
                }
                "jsonl" => {
                    for note in notes {
                        println!("{}", serde_json::to_string(note)?);
                    }
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "Unsupported export format: {} (use json or jsonl)",
                        other
                    ));
                }
            }
        }
        Some(Commands::Status) => {
            let target = vault_path(&vault)?;
            let mut vault = Vault::open(&target)?;

            if !vault.is_initialized()? {
                println!("Vault at {} is not initialized", target);
                return Ok(());
            }

            let passphrase = prompt_passphrase()?;
            let outcome = vault.unlock(&passphrase)?;
            let notes = vault.notes()?;
            let archived = notes.iter().filter(|n| n.archived).count();
            let pinned = notes.iter().filter(|n| n.pinned).count();

            println!("Vault:    {}", target);
            println!("Notes:    {} ({} archived, {} pinned)", notes.len(), archived, pinned);
            if !outcome.skipped.is_empty() {
                println!("Unreadable records: {}", outcome.skipped.len());
                for skipped in &outcome.skipped {
                    println!("- {}: {}", skipped.id, skipped.error);
                }
            }
        }
        Some(Commands::Reset { yes }) => {
            let target = vault_path(&vault)?;
            let mut vault = Vault::open(&target)?;

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Destroy this vault and every note in it? This cannot be undone")
                    .default(false)
                    .interact()
                    .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
                if !confirmed {
                    return Err(anyhow::anyhow!("Reset aborted"));
                }
            }

            vault.reset()?;
            if !quiet {
                println!("Vault at {} destroyed", target);
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "notevault", &mut std::io::stdout());
        }
        None => {
            println!("NoteVault v{}", VERSION);
            println!("\nRun `notevault --help` for usage information.");
        }
    }

    Ok(())
}

fn vault_path(vault: &Option<String>) -> anyhow::Result<String> {
    vault
        .clone()
        .ok_or_else(|| anyhow::anyhow!("No vault path provided. Use --vault or NOTEVAULT_PATH."))
}

/// Open the vault, prompt for the passphrase, and hydrate. Unreadable
/// records are reported on stderr but never block the rest of the vault.
fn unlock_vault(vault: &Option<String>) -> anyhow::Result<Vault> {
    let target = vault_path(vault)?;
    let mut vault = Vault::open(&target)?;
    let passphrase = prompt_passphrase()?;
    let outcome = vault.unlock(&passphrase)?;

    if !outcome.skipped.is_empty() {
        eprintln!(
            "warning: {} unreadable record(s) skipped; run `notevault status` for details",
            outcome.skipped.len()
        );
    }

    Ok(vault)
}

fn prompt_passphrase() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("NOTEVAULT_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

fn prompt_init_passphrase() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("NOTEVAULT_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Enter passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

fn read_content(content: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = content {
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer.trim_end().to_string());
    }

    Ok(String::new())
}

/// Resolve a full UUID or a unique prefix against the unlocked view.
fn resolve_note_id(vault: &Vault, input: &str) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }

    let needle = input.to_lowercase();
    let matches: Vec<Uuid> = vault
        .notes()?
        .iter()
        .map(|n| n.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(anyhow::anyhow!("No note matches id {}", input)),
        _ => Err(anyhow::anyhow!(
            "Ambiguous id prefix {} ({} matches)",
            input,
            matches.len()
        )),
    }
}

fn flags(note: &Note) -> String {
    match (note.pinned, note.archived) {
        (true, true) => "pinned,archived".to_string(),
        (true, false) => "pinned".to_string(),
        (false, true) => "archived".to_string(),
        (false, false) => "-".to_string(),
    }
}

fn summary(note: &Note) -> String {
    if !note.title.is_empty() {
        note.title.clone()
    } else {
        note.content.chars().take(60).collect()
    }
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Table,
    Plain,
}

fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    match value {
        None => Ok(None),
        Some("table") => Ok(Some(OutputFormat::Table)),
        Some("plain") => Ok(Some(OutputFormat::Plain)),
        Some(other) => Err(anyhow::anyhow!(
            "Unsupported format: {} (use table or plain)",
            other
        )),
    }
}
