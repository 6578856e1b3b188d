use crate::application::DiaryApp;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "diarist")]
#[command(about = "An offline diary kept as a single XML document")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save an entry (overwrites any entry already on that date)
    Write {
        /// Specific date (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Entry text; read from stdin when omitted
        text: Option<String>,
    },
    /// Edit an entry in $EDITOR
    Edit {
        /// Specific date (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Print one entry
    Show {
        /// Specific date (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Only entries whose date or text contains this
        #[arg(short, long)]
        search: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Merge entries from a diary XML file
    Import {
        file: PathBuf,
    },
    /// Write the diary to diary.xml
    Export {
        /// Target file or directory (defaults to ./diary.xml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Browse and search entries interactively
    Browse,
}

impl Cli {
    pub fn run() -> anyhow::Result<()> {
        let cli = Self::parse();
        let mut app = DiaryApp::new();

        match cli.command {
            Some(Commands::Write { date, text }) => {
                let text = match text {
                    Some(text) => text,
                    None => read_stdin()?,
                };
                app.write_entry(date.as_deref(), &text)?;
                println!("Entry saved.");
            }
            Some(Commands::Edit { date }) => {
                let date = date.unwrap_or_else(crate::domain::iso_today);
                match app.edit_entry_for_date(&date)? {
                    Some(_) => println!("Entry saved."),
                    None => println!("Nothing to save."),
                }
            }
            Some(Commands::Show { date }) => {
                let renderer = app.renderer();
                match app.show_entry(date.as_deref())? {
                    Some(entry) => print!("{}", renderer.render_entry(&entry)),
                    None => print!(
                        "{}",
                        renderer.render_missing(
                            &date.unwrap_or_else(crate::domain::iso_today)
                        )
                    ),
                }
            }
            Some(Commands::List { search, json }) => {
                let entries = app.list_entries(search.as_deref())?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else {
                    print!("{}", app.renderer().render_list(&entries));
                }
            }
            Some(Commands::Import { file }) => {
                let report = app.import_file(&file)?;
                print!("{}", app.renderer().render_import(&report.summary));
            }
            Some(Commands::Export { output }) => {
                let target = app.export_to(output.as_deref())?;
                println!("Exported to {}", target.display());
            }
            Some(Commands::Browse) | None => {
                app.run_browser()?;
            }
        }

        Ok(())
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No entry text given; pass it as an argument or pipe it in");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("Failed to read entry text from stdin")?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_write_with_date_and_text() {
        let cli = Cli::try_parse_from(["diarist", "write", "--date", "2024-01-05", "grocery list"])
            .unwrap();
        match cli.command {
            Some(Commands::Write { date, text }) => {
                assert_eq!(date.as_deref(), Some("2024-01-05"));
                assert_eq!(text.as_deref(), Some("grocery list"));
            }
            _ => panic!("expected write"),
        }
    }

    #[test]
    fn no_subcommand_means_browse() {
        let cli = Cli::try_parse_from(["diarist"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from(["diarist", "list", "-s", "holiday", "--json"]).unwrap();
        match cli.command {
            Some(Commands::List { search, json }) => {
                assert_eq!(search.as_deref(), Some("holiday"));
                assert!(json);
            }
            _ => panic!("expected list"),
        }
    }
}
