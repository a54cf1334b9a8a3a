use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use pennywise_cli::admin::{create_admin, grant};
use pennywise_core::{CredentialHasher, Role};
use pennywise_db::PgAccountStore;

#[derive(Parser)]
#[command(name = "pennywise-cli")]
#[command(about = "Pennywise CLI - Account administration tools", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin or super admin account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// admin or super_admin
        #[arg(short = 'r', long, default_value = "admin")]
        role: Role,
    },
    /// Set an existing account's role and permissions
    Grant {
        /// Email of the account to change
        #[arg(short = 'e', long)]
        email: String,

        /// New role: user, admin or super_admin
        #[arg(short = 'r', long)]
        role: Role,

        /// Permission to hold; repeat for several. Replaces the current set.
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new().with_prompt(label).interact_text()?),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = PgAccountStore::connect(&cli.database_url, CredentialHasher::new()).await?;

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
            role,
        } => {
            let name = prompt(name, "Name")?;
            let email = prompt(email, "Email address")?;
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()?,
            };

            let account = create_admin(&store, &name, &email, &password, role).await?;
            println!("\n✅ Account created successfully!");
            println!("   Email: {}", account.email);
            println!("   Role: {}", account.role);
        }
        Commands::Grant {
            email,
            role,
            permissions,
        } => {
            let account = grant(&store, &email, role, &permissions).await?;
            println!("\n✅ Access updated for {}", account.email);
            println!("   Role: {}", account.role);
            let held: Vec<&str> = account.permissions.iter().map(String::as_str).collect();
            println!("   Permissions: {}", held.join(", "));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ Error: {e:#}");
        std::process::exit(1);
    }
}
