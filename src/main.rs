mod commands;
mod logging;
mod map;
mod parser;
mod store;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::style::StyleChange;
use crate::logging::LogTarget;
use crate::map::color::Rgb;
use crate::map::model::{BorderStyle, FontWeight};

#[derive(Parser)]
#[command(
    name = "mindtree",
    about = "A terminal mind-map editor with numbered topic paths"
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a map store in the current directory
    Init,
    /// Create a new map
    New {
        /// Map name, also used as the root topic
        name: String,
        /// Build the map from an indented outline file instead
        #[arg(long, value_name = "FILE")]
        from_outline: Option<PathBuf>,
    },
    /// List stored maps, most recently edited first
    List {
        /// Only maps whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Give a map a new name (its root topic is unchanged)
    RenameMap {
        /// Map id or name
        map: String,
        /// New map name
        name: String,
    },
    /// Delete a map permanently
    DeleteMap {
        /// Map id or name
        map: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print a map as an indented outline
    Outline {
        /// Map id or name
        map: String,
    },
    /// Show every topic with its path, color and position
    Show {
        /// Map id or name
        map: String,
    },
    /// Add a topic
    Add {
        /// Map id or name
        map: String,
        /// Label of the new topic
        label: String,
        /// Topic to add under (id or path, default: the root)
        #[arg(long)]
        parent: Option<String>,
        /// Add beside --parent instead of below it
        #[arg(long, requires = "parent")]
        sibling: bool,
    },
    /// Delete a topic and everything below it
    Delete {
        /// Map id or name
        map: String,
        /// Topic id or path
        node: String,
    },
    /// Draw a manual connection between two topics
    Connect {
        /// Map id or name
        map: String,
        /// Source topic id or path
        from: String,
        /// Target topic id or path
        to: String,
    },
    /// Remove a manual connection
    Disconnect {
        /// Map id or name
        map: String,
        /// Connection id, as printed by `show`
        edge: String,
    },
    /// Rename a topic
    Rename {
        /// Map id or name
        map: String,
        /// Topic id or path
        node: String,
        /// New label
        label: String,
    },
    /// Set or clear a topic's style overrides
    Style {
        /// Map id or name
        map: String,
        /// Topic id or path
        node: String,
        /// Background color (`#rrggbb` or `rgb(r, g, b)`)
        #[arg(long)]
        bg: Option<Rgb>,
        /// Border color
        #[arg(long)]
        border: Option<Rgb>,
        /// Border line: solid, dashed or dotted
        #[arg(long)]
        border_style: Option<BorderStyle>,
        /// Text color
        #[arg(long)]
        text: Option<Rgb>,
        /// Font weight: normal, medium, semibold or bold
        #[arg(long)]
        weight: Option<FontWeight>,
        /// Drop all overrides before applying the others
        #[arg(long)]
        clear: bool,
    },
    /// Open the interactive editor
    View {
        /// Map id or name (default: the most recently edited)
        map: Option<String>,
        /// Launch with a built-in sample map (no store required)
        #[arg(long, conflicts_with = "map")]
        demo: bool,
    },
    /// Open the editor's settings panel
    Setup {
        /// Edit settings for the sample map only
        #[arg(long)]
        demo: bool,
    },
}

impl Command {
    /// The editor owns the terminal, so it logs to the store's log file.
    fn log_target(&self) -> LogTarget {
        match self {
            Command::View { demo: true, .. } | Command::Setup { demo: true } => LogTarget::Off,
            Command::View { .. } | Command::Setup { .. } => store::find_root()
                .map(|root| LogTarget::File(store::log_path(&root)))
                .unwrap_or(LogTarget::Off),
            _ => LogTarget::Stderr,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.command.log_target(), cli.verbose)?;

    match cli.command {
        Command::Init => commands::init::run(),
        Command::New { name, from_outline } => {
            commands::new::run(&name, from_outline.as_deref())
        }
        Command::List { search } => commands::list::run(search.as_deref()),
        Command::RenameMap { map, name } => commands::maps::run_rename(&map, &name),
        Command::DeleteMap { map, yes } => commands::maps::run_delete(&map, yes),
        Command::Outline { map } => commands::outline::run(&map),
        Command::Show { map } => commands::show::run(&map),
        Command::Add {
            map,
            label,
            parent,
            sibling,
        } => commands::add::run(&map, &label, parent.as_deref(), sibling),
        Command::Delete { map, node } => commands::delete::run(&map, &node),
        Command::Connect { map, from, to } => commands::connect::run(&map, &from, &to),
        Command::Disconnect { map, edge } => commands::connect::run_disconnect(&map, &edge),
        Command::Rename { map, node, label } => commands::rename::run(&map, &node, &label),
        Command::Style {
            map,
            node,
            bg,
            border,
            border_style,
            text,
            weight,
            clear,
        } => {
            let change = StyleChange {
                background: bg,
                border,
                border_style,
                text,
                weight,
                clear,
            };
            commands::style::run(&map, &node, &change)
        }
        Command::View { map, demo } => commands::view::run(map.as_deref(), demo),
        Command::Setup { demo } => commands::view::run_setup(demo),
    }
}
