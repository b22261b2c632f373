use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use role_console::authz::Role;
use role_console::models::auth::RegisterRequest;
use role_console::models::log::{filter_logs, log_users};
use role_console::models::message::{search_messages, MessageStats};
use role_console::models::user::{role_stats, search_users};
use role_console::{create_console, AppError, AppResult, Console, ConsoleConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "role-based admin console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and persist the session token
    Login {
        user_name: String,
        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a new account (does not log in)
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        address: String,
    },
    /// Show the current session
    Whoami,
    /// Forget the persisted session
    Logout,
    /// List the pages the current session may open
    Pages,
    /// List users, optionally filtered
    Users {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one user and whether their role can be edited
    User { user_name: String },
    /// Change another user's role
    UpdateRole { user_name: String, role: Role },
    /// List possible message recipients
    Usernames,
    /// Send a message
    Send { to: String, text: String },
    /// Messages sent or received by the current user
    Inbox,
    /// Every message in the system
    Messages {
        #[arg(long)]
        search: Option<String>,
    },
    /// System activity log
    Logs {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Activity log of the current user
    MyLogs,
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env();
    init_tracing();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(kind = err.kind(), error = %err, "command failed");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> AppResult<()> {
    let config = ConsoleConfig::from_env()?;
    let console = create_console(&config)?;
    console.session.restore().await;

    match command {
        Commands::Login { user_name, password } => {
            let identity = console.session.login(&user_name, &password).await?;
            print_json(&identity)
        }
        Commands::Register {
            first_name,
            last_name,
            user_name,
            email,
            password,
            address,
        } => {
            let request = RegisterRequest {
                first_name,
                last_name,
                user_name,
                email,
                password,
                address,
            };
            console.session.register(&request).await?;
            println!("Registration successful. Log in with `login {}`.", request.user_name);
            Ok(())
        }
        Commands::Whoami => print_json(&console.session.snapshot()),
        Commands::Logout => console.session.logout(),
        Commands::Pages => {
            let pages = console.guard.accessible_pages(&console.session.snapshot());
            let listed: Vec<_> = pages
                .iter()
                .map(|page| serde_json::json!({ "label": page.label(), "path": page.path() }))
                .collect();
            print_json(&listed)
        }
        Commands::Users { search } => {
            let users = console.list_users().await?;
            let shown = search_users(&users, search.as_deref().unwrap_or(""));
            print_json(&serde_json::json!({
                "total": users.len(),
                "roles": role_stats(&users),
                "users": shown,
            }))
        }
        Commands::User { user_name } => {
            let (user, plan) = console.role_edit_plan(&user_name).await?;
            print_json(&serde_json::json!({ "user": user, "role_edit": plan }))
        }
        Commands::UpdateRole { user_name, role } => {
            console.update_role(&user_name, role).await?;
            println!("Role updated successfully!");
            Ok(())
        }
        Commands::Usernames => print_json(&console.usernames().await?),
        Commands::Send { to, text } => {
            console.send_message(&to, &text).await?;
            println!("Message sent successfully!");
            Ok(())
        }
        Commands::Inbox => inbox(&console).await,
        Commands::Messages { search } => {
            let messages = console.all_messages().await?;
            print_json(&search_messages(&messages, search.as_deref().unwrap_or("")))
        }
        Commands::Logs { search, user } => {
            let logs = console.system_logs().await?;
            print_json(&serde_json::json!({
                "users": log_users(&logs),
                "logs": filter_logs(&logs, search.as_deref().unwrap_or(""), user.as_deref()),
            }))
        }
        Commands::MyLogs => print_json(&console.my_logs().await?),
    }
}

async fn inbox(console: &Console) -> AppResult<()> {
    let messages = console.my_messages().await?;
    let user_name = console
        .session
        .identity()
        .map(|identity| identity.user_name)
        .unwrap_or_default();
    print_json(&serde_json::json!({
        "stats": MessageStats::for_user(&messages, &user_name),
        "messages": messages,
    }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::server(format!("failed to render output: {err}")))?;
    println!("{rendered}");
    Ok(())
}

/// `.env` in the working directory, then `~/.role-console/.env`.
fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Some(home) = std::env::var_os("HOME") {
        let _ = dotenvy::from_path(std::path::Path::new(&home).join(".role-console").join(".env"));
    }
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // stdout carries command output; diagnostics go to stderr.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // Only this crate by default; reqwest/hyper stay quiet.
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("role_console=info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
