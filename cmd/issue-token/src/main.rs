//! Mints bearer tokens for local development and operations.
//!
//! ```text
//! issue-token admin --id a1 --email root@example.com
//! issue-token user --id u1 --email ann@example.com --name Ann
//! ```

use std::path::PathBuf;

use anyhow::Context;
use auth_adapters::JwtIdentityResolver;
use clap::{Parser, Subcommand};
use configs::AppConfig;
use domains::Identity;
use secrecy::SecretString;

#[derive(Parser, Debug)]
#[command(name = "issue-token")]
#[command(about = "Mint an Inkwell bearer token", long_about = None)]
struct Args {
    /// Signing secret. Defaults to `auth.jwt_secret` from the configuration.
    #[arg(long, env = "INKWELL_JWT_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Token lifetime in seconds. Defaults to `auth.token_ttl_secs`.
    #[arg(long)]
    ttl: Option<u64>,

    #[arg(long, env = "INKWELL_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    #[arg(long, env = "INKWELL_ENV", default_value = "development")]
    profile: String,

    #[command(subcommand)]
    kind: Kind,
}

#[derive(Subcommand, Debug)]
enum Kind {
    /// Token for an admin account.
    Admin {
        #[arg(long)]
        id: String,
        #[arg(long)]
        email: String,
    },
    /// Token for a record user.
    User {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "users")]
        collection: String,
    },
}

impl From<Kind> for Identity {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Admin { id, email } => Identity::Admin { id, email },
            Kind::User {
                id,
                email,
                name,
                collection,
            } => Identity::RecordUser {
                id,
                collection,
                name,
                email,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let (secret, ttl) = match args.secret {
        Some(secret) => (SecretString::from(secret), args.ttl.unwrap_or(3600)),
        None => {
            let config = AppConfig::from_dir(&args.config_dir, &args.profile, true)
                .context("no --secret given and the configuration could not be loaded")?;
            let secret = config
                .auth
                .jwt_secret
                .context("auth.jwt_secret is not configured")?;
            (secret, args.ttl.unwrap_or(config.auth.token_ttl_secs))
        }
    };

    let resolver = JwtIdentityResolver::new(&secret, ttl);
    let token = resolver.issue(&Identity::from(args.kind))?;
    println!("{token}");
    Ok(())
}
