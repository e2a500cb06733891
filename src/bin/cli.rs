use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use scholarstream::cli::bootstrap_admin;
use scholarstream::cli::seeder::{clear_seeded_data, seed_scholarships};

#[derive(Parser)]
#[command(name = "scholarstream-cli")]
#[command(about = "ScholarStream CLI - Administrative tools for ScholarStream", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the first admin account, or promote an existing one
    BootstrapAdmin {
        /// Email address of the admin
        #[arg(short = 'e', long, env = "ADMIN_EMAIL")]
        email: String,

        /// Display name
        #[arg(short = 'n', long, env = "ADMIN_NAME", default_value = "Administrator")]
        name: String,

        /// Identity-provider subject id, if already known
        #[arg(short = 's', long, env = "ADMIN_SUBJECT")]
        subject: Option<String>,
    },
    /// Seed the database with fake scholarships
    Seed {
        /// Number of scholarships to create
        #[arg(short = 'c', long, default_value = "30")]
        count: usize,
    },
    /// Clear all seeded data
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::BootstrapAdmin {
            email,
            name,
            subject,
        } => match bootstrap_admin(&pool, &email, &name, subject.as_deref()).await {
            Ok(created) => {
                if created {
                    println!("✅ Admin account created");
                } else {
                    println!("✅ Existing account promoted to Admin");
                }
                println!("   Email: {}", email);
            }
            Err(e) => {
                eprintln!("❌ Error bootstrapping admin: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Seed { count } => {
            if let Err(e) = seed_scholarships(&pool, count).await {
                eprintln!("❌ Error seeding database: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = clear_seeded_data(&pool).await {
                eprintln!("❌ Error clearing seeded data: {}", e);
                std::process::exit(1);
            }
        }
    }
}
