//! Demo harness for the social film catalog core.
//!
//! The store is in-memory, so every command seeds its own data and runs a
//! self-contained scenario against the services.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::Rng;

use catalog::{Film, User, UserId};
use services::{FilmService, GenreService, RatingService, UserService};
use storage::MemoryStore;

/// ReelMates - social film catalog
#[derive(Parser)]
#[command(name = "reel-mates")]
#[command(about = "Social film catalog: likes, friendships, and rankings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the core rules: name fill, release-date floor,
    /// idempotent likes, friendships, and cascade deletes
    Demo,

    /// Seed a random catalog and print the most-liked films
    Rank {
        /// Number of users to seed
        #[arg(long, default_value = "50")]
        users: u32,

        /// Number of films to seed
        #[arg(long, default_value = "20")]
        films: u32,

        /// Number of random like edges to add
        #[arg(long, default_value = "400")]
        likes: u32,

        /// Number of films to show
        #[arg(long, default_value = "10")]
        limit: i64,

        /// Print the ranking as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Seed and list the genre / rating-class reference catalog
    Catalog,
}

struct Services {
    users: UserService<MemoryStore>,
    films: FilmService<MemoryStore>,
    genres: GenreService<MemoryStore>,
    ratings: RatingService<MemoryStore>,
}

fn create_services() -> Services {
    let store = Arc::new(MemoryStore::new());
    Services {
        users: UserService::new(Arc::clone(&store)),
        films: FilmService::new(Arc::clone(&store)),
        genres: GenreService::new(Arc::clone(&store)),
        ratings: RatingService::new(Arc::clone(&store)),
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => handle_demo()?,
        Commands::Rank {
            users,
            films,
            likes,
            limit,
            json,
        } => handle_rank(users, films, likes, limit, json)?,
        Commands::Catalog => handle_catalog()?,
    }

    Ok(())
}

fn handle_demo() -> Result<()> {
    let services = create_services();

    println!("{}", "— users —".bold());
    let al = services.users.create(User {
        id: 0,
        email: "al@example.com".to_string(),
        login: "al".to_string(),
        name: String::new(),
        birthday: NaiveDate::from_ymd_opt(1988, 7, 14).context("valid date")?,
    })?;
    println!(
        "{} created user #{} with blank name, resolved to {:?}",
        "✓".green(),
        al.id,
        al.name
    );
    let bea = services.users.create(User {
        id: 0,
        email: "bea@example.com".to_string(),
        login: "bea".to_string(),
        name: "Bea".to_string(),
        birthday: NaiveDate::from_ymd_opt(1992, 2, 2).context("valid date")?,
    })?;

    println!("\n{}", "— films —".bold());
    let too_early = services.films.create(demo_film("F1", (1895, 12, 27)));
    match too_early {
        Err(err) => println!("{} rejected 1895-12-27 release: {err}", "✓".green()),
        Ok(_) => println!("{} pre-cinema release date was accepted", "✗".red()),
    }
    let f1 = services.films.create(demo_film("F1", (1895, 12, 28)))?;
    println!("{} created film #{} on the floor date", "✓".green(), f1.id);

    println!("\n{}", "— likes —".bold());
    services.films.add_like(f1.id, al.id)?;
    services.films.add_like(f1.id, al.id)?;
    println!(
        "{} liked twice, counted once: {} like(s)",
        "✓".green(),
        services.films.count_likes(f1.id)?
    );

    println!("\n{}", "— friendships —".bold());
    services.users.add_friend(al.id, bea.id)?;
    let friends = services.users.get_friends(al.id)?;
    println!(
        "{} {} now follows: {}",
        "✓".green(),
        al.login,
        friends
            .iter()
            .map(|u| u.login.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    match services.users.add_friend(al.id, al.id) {
        Err(err) => println!("{} self-friendship rejected: {err}", "✓".green()),
        Ok(()) => println!("{} self-friendship was accepted", "✗".red()),
    }

    println!("\n{}", "— cascade delete —".bold());
    services.users.delete(al.id)?;
    println!(
        "{} deleted {}; film #{} now has {} like(s)",
        "✓".green(),
        al.login,
        f1.id,
        services.films.count_likes(f1.id)?
    );

    Ok(())
}

fn handle_rank(users: u32, films: u32, likes: u32, limit: i64, json: bool) -> Result<()> {
    let services = create_services();
    let mut rng = rand::rng();

    let mut user_ids: Vec<UserId> = Vec::with_capacity(users as usize);
    for i in 0..users {
        let user = services.users.create(User {
            id: 0,
            email: format!("user{i}@example.com"),
            login: format!("user{i}"),
            name: String::new(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).context("valid date")?,
        })?;
        user_ids.push(user.id);
    }

    let comedy = services.genres.get_or_create("Comedy");
    let drama = services.genres.get_or_create("Drama");
    let pg = services.ratings.get_or_create("PG", None);

    let mut film_ids = Vec::with_capacity(films as usize);
    for i in 0..films {
        let mut film = demo_film(&format!("Film {i}"), (2000 + (i % 20) as i32, 6, 1));
        film.genre_ids = if i % 2 == 0 {
            vec![comedy.id]
        } else {
            vec![drama.id]
        };
        film.rating_id = Some(pg.id);
        film_ids.push(services.films.create(film)?.id);
    }

    // Random edges; repeats are harmless because likes are idempotent
    for _ in 0..likes {
        let film_id = film_ids[rng.random_range(0..film_ids.len())];
        let user_id = user_ids[rng.random_range(0..user_ids.len())];
        services.films.add_like(film_id, user_id)?;
    }

    let top = services.films.top_liked(limit);
    if json {
        println!("{}", serde_json::to_string_pretty(&top)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Top {} of {} films ({} users, {} like draws)", top.len(), films, users, likes)
            .bold()
    );
    for (rank, film) in top.iter().enumerate() {
        println!(
            "{:>3}. {} — {} like(s)",
            rank + 1,
            film.name,
            services.films.count_likes(film.id)?
        );
    }

    Ok(())
}

fn handle_catalog() -> Result<()> {
    let services = create_services();

    for name in ["Comedy", "Drama", "Cartoon", "Thriller", "Documentary", "Action"] {
        services.genres.get_or_create(name);
    }
    let ratings = [
        ("G", "General audiences"),
        ("PG", "Parental guidance suggested"),
        ("PG-13", "Parents strongly cautioned"),
        ("R", "Restricted"),
        ("NC-17", "Adults only"),
    ];
    for (name, description) in ratings {
        services.ratings.get_or_create(name, Some(description));
    }

    // A second sighting resolves to the same row
    let again = services.genres.get_or_create("Comedy");
    println!("{}", "genres".bold());
    for genre in services.genres.get_all() {
        let marker = if genre.id == again.id { " (stable)" } else { "" };
        println!("  {:>2}  {}{}", genre.id, genre.name, marker);
    }

    println!("{}", "rating classes".bold());
    for rating in services.ratings.get_all() {
        println!(
            "  {:>2}  {:<6} {}",
            rating.id,
            rating.name,
            rating.description.unwrap_or_default()
        );
    }

    Ok(())
}

fn demo_film(name: &str, release: (i32, u32, u32)) -> Film {
    Film {
        id: 0,
        name: name.to_string(),
        description: String::new(),
        release_date: NaiveDate::from_ymd_opt(release.0, release.1, release.2)
            .expect("valid calendar date"),
        duration: 90,
        genre_ids: vec![],
        rating_id: None,
    }
}
