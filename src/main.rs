// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

mod auth;
mod database;
mod error;
mod lookup;
mod recipes;
mod search;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new user.
    AddUser {
        username: String,
        email: String,
        password: String,
        diet: String,
    },
    /// Exchange a username and password for a bearer token.
    Login { username: String, password: String },
    /// Submit the recipe described by a JSON file.
    CreateRecipe {
        path: PathBuf,
        #[arg(long)]
        token: String,
    },
    /// Find recipes whose name or category contains the term.
    Search { term: String },
    /// Print every recipe in the catalog.
    ListRecipes,
}

/// This is where the database and other user-data lives on-disk. On Linux it should be like:
/// `~/.local/share/recipe_book/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().expect("failed to get user home directory");
    let path = dirs.data_dir().join("recipe_book");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn token_secret() -> String {
    std::env::var("RECIPE_BOOK_SECRET").unwrap_or_else(|_| "your-jwt-secret".into())
}

/// Prints the success body, or the `{ error, status }` body on failure with
/// a non-zero exit.
fn report<T: serde::Serialize>(outcome: std::result::Result<T, error::Error>) -> Result<()> {
    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(err) => {
            log::error!("{err}");
            println!("{}", serde_json::to_string_pretty(&err.to_response())?);
            std::process::exit(1)
        }
    }
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let args = Args::parse();
    let mut conn = database::establish_connection(data_path()?.join("data.sqlite"))?;
    log::info!("database connected");

    let keys = auth::AuthKeys::new(&token_secret());

    match args.commands {
        Commands::AddUser {
            username,
            email,
            password,
            diet,
        } => report(auth::register(
            &mut conn,
            &auth::Registration {
                username,
                email,
                password,
                diet,
            },
        )),
        Commands::Login { username, password } => {
            report(auth::login(&mut conn, &keys, &username, &password))
        }
        Commands::CreateRecipe { path, token } => {
            let file = std::fs::File::open(&path)?;
            let outcome = auth::authenticate(&keys, &token).and_then(|claim| {
                let submission: recipes::RecipeSubmission = serde_json::from_reader(file)
                    .map_err(|e| error::Error::validation(format!("malformed submission: {e}")))?;
                recipes::create_recipe(&mut conn, &claim, &submission)
            });
            report(outcome)
        }
        Commands::Search { term } => report(search::search_recipes(&mut conn, &term)),
        Commands::ListRecipes => report(search::list_recipes(&mut conn)),
    }
}
