use clap::{Parser, Subcommand};
use mylibrary::config::LibraryPaths;
use mylibrary::library::{Library, ALL_TRACKS_NAME};
use mylibrary::playlist::Playlist;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mylibrary", about = "Personal audio-track catalogue CLI")]
struct Cli {
    /// Directory of audio files
    #[arg(long)]
    songs_dir: Option<PathBuf>,
    /// Directory of saved playlist files
    #[arg(long)]
    playlists_dir: Option<PathBuf>,
    /// Log filter (e.g. "info" or "mylibrary=debug")
    #[arg(long, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show catalogue status
    Status,
    /// List every track discovered in the songs directory
    Tracks,
    /// Copy an audio file into the songs directory
    Import {
        /// Audio file to import
        file: PathBuf,
    },
    /// Playlist management
    Playlist {
        #[command(subcommand)]
        action: PlaylistCmd,
    },
}

#[derive(Subcommand)]
enum PlaylistCmd {
    /// Create a new empty playlist
    Create { name: String },
    /// List saved playlists
    List,
    /// Show the tracks in a playlist
    Show { name: String },
    /// Add track(s) from the songs directory to a playlist
    Add {
        /// Playlist name
        name: String,
        /// Track numbers from `tracks` output (1-based)
        #[arg(required = true)]
        tracks: Vec<usize>,
    },
    /// Remove a track from a playlist by position (1-based)
    Remove {
        /// Playlist name
        name: String,
        /// Track number to remove (1-based)
        track: usize,
    },
    /// Swap two tracks in a playlist (1-based)
    Swap {
        /// Playlist name
        name: String,
        /// First track number
        first: usize,
        /// Second track number
        second: usize,
    },
    /// Delete a saved playlist
    Delete { name: String },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut paths = LibraryPaths::default_dirs();
    if let Some(dir) = cli.songs_dir {
        paths.songs_dir = dir;
    }
    if let Some(dir) = cli.playlists_dir {
        paths.playlists_dir = dir;
    }
    let mut library = Library::open(paths);

    match cli.command {
        Commands::Status => {
            println!("mylibrary v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "Songs dir: {} | Playlists dir: {}",
                library.paths().songs_dir.display(),
                library.paths().playlists_dir.display()
            );
            println!(
                "Tracks: {} ({}) | Playlists: {}",
                library.all_tracks().len(),
                library.all_tracks().total_duration_pretty(),
                library.playlist_names().len() - 1
            );
        }
        Commands::Tracks => {
            print_tracks(library.all_tracks());
        }
        Commands::Import { file } => match library.import_track(&file) {
            Ok(true) => println!("Imported '{}'", file.display()),
            Ok(false) => {
                eprintln!("Could not decode '{}' — not imported", file.display());
                process::exit(1);
            }
            Err(e) => fail(&e.to_string()),
        },
        Commands::Playlist { action } => playlist_command(&mut library, action),
    }
}

fn playlist_command(library: &mut Library, action: PlaylistCmd) {
    match action {
        PlaylistCmd::Create { name } => match library.create_playlist(&name) {
            Ok(Some(pl)) => println!(
                "Created playlist '{}' at {}",
                pl.name(),
                pl.location().map(|p| p.display().to_string()).unwrap_or_default()
            ),
            Ok(None) => fail(&format!("Playlist '{}' already exists", name)),
            Err(e) => fail(&e.to_string()),
        },
        PlaylistCmd::List => {
            for name in library.playlist_names() {
                if name == ALL_TRACKS_NAME {
                    continue;
                }
                println!("{name}");
            }
        }
        PlaylistCmd::Show { name } => {
            let pl = open_or_fail(library, &name);
            print_tracks(&pl);
        }
        PlaylistCmd::Add { name, tracks } => {
            let mut pl = open_or_fail(library, &name);
            let available = library.all_tracks().tracks();
            let mut added = 0;
            for number in tracks {
                match number.checked_sub(1).and_then(|i| available.get(i)) {
                    Some(track) => {
                        if pl.add_track(track.clone()) {
                            added += 1;
                        }
                    }
                    None => fail(&format!("No track #{number} in the songs directory")),
                }
            }
            save_or_fail(library, &pl);
            println!("Added {added} track(s) to '{}'", pl.name());
        }
        PlaylistCmd::Remove { name, track } => {
            let mut pl = open_or_fail(library, &name);
            match track.checked_sub(1).map(|i| pl.remove_track(i)) {
                Some(true) => {
                    save_or_fail(library, &pl);
                    println!("Removed track #{track} from '{}'", pl.name());
                }
                _ => fail(&format!("No track #{track} in '{}'", pl.name())),
            }
        }
        PlaylistCmd::Swap {
            name,
            first,
            second,
        } => {
            let mut pl = open_or_fail(library, &name);
            let swapped = match (first.checked_sub(1), second.checked_sub(1)) {
                (Some(i), Some(j)) => pl.swap_tracks(i, j),
                _ => false,
            };
            if !swapped {
                fail(&format!("Cannot swap #{first} and #{second} in '{}'", pl.name()));
            }
            save_or_fail(library, &pl);
            println!("Swapped #{first} and #{second} in '{}'", pl.name());
        }
        PlaylistCmd::Delete { name } => {
            let pl = open_or_fail(library, &name);
            match library.delete_playlist(&pl) {
                Ok(true) => println!("Deleted playlist '{}'", pl.name()),
                Ok(false) => fail(&format!("'{}' has no backing file to delete", pl.name())),
                Err(e) => fail(&e.to_string()),
            }
        }
    }
}

fn open_or_fail(library: &Library, name: &str) -> Playlist {
    match library.open_playlist(name) {
        Ok(Some(pl)) => pl,
        Ok(None) => fail(&format!("'{name}' is not a valid playlist file")),
        Err(e) => fail(&e.to_string()),
    }
}

fn save_or_fail(library: &Library, playlist: &Playlist) {
    if let Err(e) = playlist.save(library.paths().playlists_dir.as_path()) {
        fail(&e.to_string());
    }
}

fn print_tracks(playlist: &Playlist) {
    for (i, track) in playlist.iter().enumerate() {
        println!(
            "{:3}. {} — {} [{}] ({})",
            i + 1,
            track.artist(),
            track.title(),
            track.album(),
            track.duration_pretty(false, true, true)
        );
    }
    println!(
        "{} track(s), total {}",
        playlist.len(),
        playlist.total_duration_pretty()
    );
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}
