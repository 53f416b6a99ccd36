use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::sync::Arc;
use storyxcel_core::repositories::friends::FriendService;
use storyxcel_core::repositories::projects::{ProjectKind, ProjectService};
use storyxcel_core::{
    constants::DEFAULT_DATA_DIR, BeatsOutcome, ConfirmOverwrite, ConflictArchetype, CoreConfig,
    OverwritePrompt, RecordId, StoryOverview,
};
use storyxcel_types::NonEmptyText;

#[derive(Parser)]
#[command(name = "storyxcel")]
#[command(about = "StoryXcel project and story-editor CLI")]
struct Cli {
    /// Data storage root
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Story,
    Production,
    AssetVault,
}

impl From<KindArg> for ProjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Story => ProjectKind::Story,
            KindArg::Production => ProjectKind::Production,
            KindArg::AssetVault => ProjectKind::AssetVault,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all projects
    List,
    /// Create a new project
    NewProject {
        /// Project name
        name: String,
        /// Owner username
        owner: String,
        /// Project kind
        #[arg(long, value_enum, default_value = "story")]
        kind: KindArg,
    },
    /// Print a project's story document HTML
    Render {
        /// Project id (32 lowercase hex characters)
        project_id: String,
    },
    /// Delete a project
    DeleteProject {
        /// Project id
        project_id: String,
    },
    /// Apply overview fields to a project's story document
    SetOverview {
        /// Project id
        project_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        project_type: Option<String>,
        #[arg(long)]
        runtime: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        sub_genre: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        sub_theme: Option<String>,
        #[arg(long)]
        plot_summary: Option<String>,
        #[arg(long)]
        plot_notes: Option<String>,
    },
    /// List the central-conflict archetypes
    Conflicts,
    /// Select a central conflict and write its story beats
    Beats {
        /// Project id
        project_id: String,
        /// Conflict label, e.g. "[Wo]Man vs. Nature"
        conflict: String,
        /// Overwrite an edited beats region without prompting
        #[arg(long)]
        yes: bool,
    },
    /// Manage a user's friend list
    Friends {
        /// Username
        user: String,
        #[command(subcommand)]
        action: FriendAction,
    },
}

#[derive(Subcommand)]
enum FriendAction {
    /// Show friends and pending requests
    List,
    /// Send a friend request
    Request { to: String },
    /// Accept an incoming request
    Accept { from: String },
    /// Remove a friend or pending request
    Remove { other: String },
}

/// Terminal y/N prompt for beats overwrites.
struct StdinConfirm;

#[async_trait::async_trait]
impl ConfirmOverwrite for StdinConfirm {
    async fn confirm_overwrite(&self, prompt: &OverwritePrompt) -> bool {
        if prompt.edited {
            println!("The beats region has been edited since it was generated.");
        }
        match &prompt.stored_label {
            Some(label) => println!("Replace beats for \"{label}\" with \"{}\"?", prompt.requested),
            None => println!("Replace the current beats region with \"{}\"?", prompt.requested),
        }
        print!("Overwrite? [y/N] ");
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.data_dir)?;
    let cfg = Arc::new(CoreConfig::new(cli.data_dir.clone())?);
    cfg.ensure_layout()?;
    let projects = ProjectService::new(cfg.clone());

    match cli.command {
        Some(Commands::List) => {
            let listed = projects.list();
            if listed.is_empty() {
                println!("No projects found.");
            } else {
                for project in listed {
                    println!(
                        "ID: {}, Name: {}, Owner: {}, Updated: {}",
                        project.id, project.name, project.owner, project.updated_at
                    );
                }
            }
        }
        Some(Commands::NewProject { name, owner, kind }) => {
            let name = NonEmptyText::new(&name)?;
            let owner = NonEmptyText::new(&owner)?;
            match projects.create(name, kind.into(), owner) {
                Ok(project) => println!("Created project with ID: {}", project.id),
                Err(e) => eprintln!("Error creating project: {e}"),
            }
        }
        Some(Commands::Render { project_id }) => {
            let id = RecordId::parse(&project_id)?;
            match projects.get(&id) {
                Ok(project) => println!("{}", project.script_html),
                Err(e) => eprintln!("Error reading project: {e}"),
            }
        }
        Some(Commands::DeleteProject { project_id }) => {
            let id = RecordId::parse(&project_id)?;
            match projects.delete(&id) {
                Ok(()) => println!("Deleted project {id}"),
                Err(e) => eprintln!("Error deleting project: {e}"),
            }
        }
        Some(Commands::SetOverview {
            project_id,
            title,
            project_type,
            runtime,
            genre,
            sub_genre,
            theme,
            sub_theme,
            plot_summary,
            plot_notes,
        }) => {
            let id = RecordId::parse(&project_id)?;
            let current = projects.get(&id)?.overview;
            let overview = StoryOverview {
                title: title.unwrap_or(current.title),
                project_type: project_type.unwrap_or(current.project_type),
                runtime: runtime.unwrap_or(current.runtime),
                genre: genre.unwrap_or(current.genre),
                sub_genre: sub_genre.unwrap_or(current.sub_genre),
                theme: theme.unwrap_or(current.theme),
                sub_theme: sub_theme.unwrap_or(current.sub_theme),
                central_conflict: current.central_conflict,
                plot_summary: plot_summary.unwrap_or(current.plot_summary),
                plot_notes: plot_notes.unwrap_or(current.plot_notes),
            };
            match projects.apply_overview(&id, overview) {
                Ok(_) => println!("Updated overview for project {id}"),
                Err(e) => eprintln!("Error updating overview: {e}"),
            }
        }
        Some(Commands::Conflicts) => {
            for archetype in ConflictArchetype::ALL {
                println!("{archetype}");
            }
        }
        Some(Commands::Beats {
            project_id,
            conflict,
            yes,
        }) => {
            let id = RecordId::parse(&project_id)?;
            let Some(conflict) = ConflictArchetype::parse(&conflict) else {
                eprintln!("Unknown conflict \"{conflict}\". Run 'storyxcel conflicts' for the list.");
                return Ok(());
            };
            let outcome = if yes {
                projects
                    .select_conflict(&id, conflict, &storyxcel_core::Preconfirmed(true))
                    .await
            } else {
                projects.select_conflict(&id, conflict, &StdinConfirm).await
            };
            match outcome {
                Ok((_, BeatsOutcome::Updated)) => println!("Wrote beats for {conflict}"),
                Ok((_, BeatsOutcome::Unchanged)) => println!("Beats already up to date"),
                Ok((_, BeatsOutcome::Declined)) => println!("Left the document unchanged"),
                Err(e) => eprintln!("Error selecting beats: {e}"),
            }
        }
        Some(Commands::Friends { user, action }) => {
            let friends = FriendService::new(cfg);
            match action {
                FriendAction::List => match friends.list(&user) {
                    Ok(entries) if entries.is_empty() => println!("No friends yet."),
                    Ok(entries) => {
                        for entry in entries {
                            println!("{} ({:?}, since {})", entry.user, entry.status, entry.since);
                        }
                    }
                    Err(e) => eprintln!("Error listing friends: {e}"),
                },
                FriendAction::Request { to } => match friends.request(&user, &to) {
                    Ok(()) => println!("Request sent to {to}"),
                    Err(e) => eprintln!("Error sending request: {e}"),
                },
                FriendAction::Accept { from } => match friends.accept(&user, &from) {
                    Ok(()) => println!("You are now friends with {from}"),
                    Err(e) => eprintln!("Error accepting request: {e}"),
                },
                FriendAction::Remove { other } => match friends.remove(&user, &other) {
                    Ok(()) => println!("Removed {other}"),
                    Err(e) => eprintln!("Error removing friend: {e}"),
                },
            }
        }
        None => {
            println!("Use 'storyxcel --help' for commands");
        }
    }

    Ok(())
}
