/*
 * Responsibility
 * - CLI の解析 (serve / seed-admin)
 * - app の呼び出し (ロジックは置かない)
 */
use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod api;
mod app;
mod config;
mod domain;
mod error;
mod middleware;
mod repos;
mod services;
mod state;
mod usecases;
mod validation;

use usecases::CreateUserInput;

/// MeuPet clinic backend
#[derive(Parser)]
#[command(name = "meupet-api")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,

    /// Create the initial admin account if it does not exist yet
    SeedAdmin(SeedAdminArgs),
}

#[derive(Args)]
struct SeedAdminArgs {
    #[arg(long, env = "SEED_ADMIN_EMAIL", default_value = "admin@gmail.com")]
    email: String,

    #[arg(long, env = "SEED_ADMIN_PASSWORD")]
    password: String,

    #[arg(long, default_value = "Administrador do Sistema")]
    name: String,

    #[arg(long, default_value = "123.456.789-09")]
    cpf: String,

    #[arg(long, default_value = "(11) 98765-4321")]
    phone: String,

    #[arg(long)]
    address: Option<String>,
}

impl From<SeedAdminArgs> for CreateUserInput {
    fn from(args: SeedAdminArgs) -> Self {
        CreateUserInput {
            name: args.name,
            cpf: args.cpf,
            user_type: "Tutor".to_string(),
            email: args.email,
            phone: args.phone,
            address: args.address,
            password: args.password,
            role: Some("admin".to_string()),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => app::serve().await,
        Command::SeedAdmin(args) => app::seed_admin(args.into()).await,
    }
}
