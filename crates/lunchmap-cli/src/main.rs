//! `lunchmap`: rate lunch spots from the terminal.
//!
//! Every invocation is one interaction cycle against the CSV table in the
//! configured GitHub repository.
//!
//! # Usage
//!
//! ```
//! lunchmap --repo team/lunch list --cuisine Japonais
//! lunchmap rate "sushi zen" --user ana --score 4.5 --comment "omakase!"
//! lunchmap --config ~/.config/lunchmap.toml pick
//! ```

mod config;
mod render;
mod resolve;

use std::io::{self, IsTerminal as _};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use config::{ConfigFile, StoreArgs, github_config};
use lunchmap_core::{
  restaurant::{NewRestaurant, RatingSubmission},
  service::Lunchmap,
  store::TableStore,
};
use lunchmap_store::GithubStore;
use rand::{SeedableRng, rngs::StdRng};
use render::Printer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lunchmap", version, about = "Lunch spots, ratings and comments")]
struct Args {
  /// Path to a TOML config file (repo, path, branch, token, user).
  #[arg(short, long, global = true, value_name = "FILE", env = "LUNCHMAP_CONFIG")]
  config: Option<std::path::PathBuf>,

  #[command(flatten)]
  store: StoreArgs,

  /// Never colour the output.
  #[arg(long, global = true)]
  no_color: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List restaurants in table order.
  List {
    /// Only this cuisine tag (exact match).
    #[arg(long)]
    cuisine: Option<String>,
  },
  /// List the distinct cuisine tags.
  Cuisines,
  /// Show one restaurant with every rating and comment.
  Show {
    /// Id, or part of the name.
    restaurant: String,
  },
  /// Add a restaurant, optionally with a first rating.
  Add {
    #[arg(long)]
    name:    String,
    #[arg(long, allow_negative_numbers = true)]
    lat:     f64,
    #[arg(long, allow_negative_numbers = true)]
    lon:     f64,
    #[arg(long, default_value = "")]
    cuisine: String,
    #[arg(long, env = "LUNCHMAP_USER")]
    user:    Option<String>,
    /// 1 to 5, in steps of 0.5. Required with `--user`.
    #[arg(long)]
    score:   Option<f64>,
    #[arg(long)]
    comment: Option<String>,
  },
  /// Rate a restaurant; replaces your previous rating.
  Rate {
    /// Id, or part of the name.
    restaurant: String,
    #[arg(long, env = "LUNCHMAP_USER")]
    user:       Option<String>,
    /// 1 to 5, in steps of 0.5.
    #[arg(long)]
    score:      f64,
    /// Left unchanged when omitted or empty.
    #[arg(long)]
    comment:    Option<String>,
  },
  /// Pick a random rated restaurant.
  Pick {
    #[arg(long)]
    cuisine: Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg = match &args.config {
    Some(path) => ConfigFile::read(path)?,
    None => ConfigFile::default(),
  };
  let default_user = (!file_cfg.user.is_empty()).then(|| file_cfg.user.clone());

  let store = GithubStore::new(github_config(args.store, &file_cfg)?)
    .context("failed to build GitHub client")?;
  let svc = Lunchmap::new(store);

  let color = !args.no_color && io::stdout().is_terminal();
  let mut out = Printer::new(io::stdout().lock(), color);

  run(&svc, args.command, default_user, &mut out).await
}

async fn run<S, W>(
  svc: &Lunchmap<S>,
  command: Command,
  default_user: Option<String>,
  out: &mut Printer<W>,
) -> Result<()>
where
  S: TableStore,
  W: io::Write,
{
  match command {
    Command::List { cuisine } => {
      let listing = svc.list(cuisine.as_deref()).await;
      if let Some(warning) = &listing.warning {
        out.warning(warning)?;
      }
      if listing.restaurants.is_empty() {
        out.plain("No restaurants.")?;
      }
      for r in &listing.restaurants {
        out.summary(r)?;
      }
    }

    Command::Cuisines => {
      for tag in svc.cuisines().await {
        out.plain(&tag)?;
      }
    }

    Command::Show { restaurant } => {
      let loaded = svc.load().await;
      if let Some(warning) = &loaded.warning {
        out.warning(warning)?;
      }
      let record = resolve::resolve(&loaded.snapshot.table, &restaurant)?;
      out.detail(record)?;
    }

    Command::Add {
      name,
      lat,
      lon,
      cuisine,
      user,
      score,
      comment,
    } => {
      let seed = match user.or(default_user) {
        Some(user) if !user.trim().is_empty() => {
          let Some(score) = score else {
            bail!("--score is required with --user");
          };
          Some(RatingSubmission {
            user,
            score,
            comment,
          })
        }
        _ => None,
      };
      let saved = svc
        .add_restaurant(NewRestaurant {
          name,
          lat,
          lon,
          cuisine,
          seed,
        })
        .await
        .context("could not add the restaurant")?;
      out.plain(&format!("Added {} ({})", saved.restaurant.name, saved.restaurant.id))?;
      out.summary(&saved.restaurant)?;
    }

    Command::Rate {
      restaurant,
      user,
      score,
      comment,
    } => {
      let Some(user) = user.or(default_user) else {
        bail!("--user is required (or set `user` in the config file)");
      };
      let snapshot = svc
        .fetch()
        .await
        .context("could not load the restaurant table")?;
      let id = resolve::resolve(&snapshot.table, &restaurant)?.id.clone();
      // Pinned to the table the name was resolved against.
      let saved = svc
        .rate_at(
          &id,
          RatingSubmission {
            user,
            score,
            comment,
          },
          snapshot.revision,
        )
        .await
        .context("could not save the rating")?;
      out.plain(&format!("Rated {}", saved.restaurant.name))?;
      out.summary(&saved.restaurant)?;
    }

    Command::Pick { cuisine } => {
      let mut rng = StdRng::from_entropy();
      match svc.pick(cuisine.as_deref(), &mut rng).await {
        Some(pick) => out.detail(&pick.restaurant)?,
        None => out.plain("Nothing rated yet for that choice.")?,
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use lunchmap_store::MemoryStore;

  use super::*;

  const SEED_CSV: &str = "id,nom,lat,lon,type,ratings,comments\n\
                          r1,Sushi Zen,48.8727,2.3357,Japonais,\"{\"\"ana\"\": 4}\",{}\n\
                          r2,Da Mario,48.8719,2.3356,Italien,{},{}\n";

  async fn run_with(store: &MemoryStore, command: Command, user: Option<&str>) -> Result<String> {
    let svc = Lunchmap::new(store.clone());
    let mut out = Printer::new(Vec::new(), false);
    run(&svc, command, user.map(str::to_string), &mut out).await?;
    Ok(String::from_utf8(out.into_inner())?)
  }

  #[tokio::test]
  async fn list_prints_one_line_per_restaurant() {
    let store = MemoryStore::with_blob(SEED_CSV);
    let out = run_with(&store, Command::List { cuisine: None }, None).await.unwrap();
    assert_eq!(
      out,
      "🟢 🍣 Sushi Zen  4 ★★★★☆ (1)  [r1]\n🟠 🍝 Da Mario  not rated yet  [r2]\n"
    );
  }

  #[tokio::test]
  async fn rate_by_fuzzy_name_uses_default_user() {
    let store = MemoryStore::with_blob(SEED_CSV);
    let command = Command::Rate {
      restaurant: "mario".into(),
      user:       None,
      score:      3.5,
      comment:    Some("bonnes pâtes".into()),
    };
    let out = run_with(&store, command, Some("léo")).await.unwrap();
    assert!(out.starts_with("Rated Da Mario\n"), "{out}");

    let blob = store.blob().unwrap();
    assert!(blob.contains("léo"), "{blob}");
    assert_eq!(store.history().last().unwrap().message, "Rate Da Mario");
  }

  #[tokio::test]
  async fn rate_without_any_user_fails_before_loading() {
    let store = MemoryStore::with_blob(SEED_CSV);
    let command = Command::Rate {
      restaurant: "r1".into(),
      user:       None,
      score:      4.0,
      comment:    None,
    };
    assert!(run_with(&store, command, None).await.is_err());
    assert_eq!(store.history().len(), 1);
  }

  #[tokio::test]
  async fn rate_reports_an_unreadable_table() {
    let store = MemoryStore::with_blob("id,nom\nr1,\"oops\n");
    let command = Command::Rate {
      restaurant: "r1".into(),
      user:       Some("ana".into()),
      score:      4.0,
      comment:    None,
    };
    let err = run_with(&store, command, None).await.unwrap_err();
    assert_eq!(err.to_string(), "could not load the restaurant table");
    assert_eq!(store.history().len(), 1);
  }

  #[tokio::test]
  async fn add_requires_score_with_user() {
    let store = MemoryStore::new();
    let command = Command::Add {
      name:    "Pho 14".into(),
      lat:     48.83,
      lon:     2.36,
      cuisine: "Vietnamien".into(),
      user:    Some("ana".into()),
      score:   None,
      comment: None,
    };
    assert!(run_with(&store, command, None).await.is_err());
    assert!(store.blob().is_none());
  }

  #[tokio::test]
  async fn pick_with_nothing_rated() {
    let store = MemoryStore::with_blob(SEED_CSV);
    let out = run_with(&store, Command::Pick { cuisine: Some("Italien".into()) }, None)
      .await
      .unwrap();
    assert_eq!(out, "Nothing rated yet for that choice.\n");
  }
}
