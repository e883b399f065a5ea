use clap::{Parser, Subcommand};

use debitum::api::{ScenarioArgs, run_http_server, solve_to_json};

#[derive(Parser, Debug)]
#[command(
    name = "debitum",
    about = "Optimal monthly spending and borrowing plan under a revolving credit line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the optimal-living JSON API.
    Serve {
        #[arg(default_value_t = 8080)]
        port: u16,
    },
    /// Solve one scenario and print the plan as JSON.
    Solve {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    match Cli::parse().command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Solve { scenario, pretty } => match solve_to_json(&scenario, pretty) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
