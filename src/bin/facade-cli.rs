use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use url::Url;

#[derive(Parser)]
#[command(name = "facade-cli")]
#[command(about = "Command-line client for the employee facade", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every employee
    List,
    /// Show one employee
    Get { id: String },
    /// Find employees whose name contains a fragment
    Search { fragment: String },
    /// Show the highest salary
    HighestSalary,
    /// Show the ten best paid employee names
    TopEarners,
    /// Create an employee
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        salary: i64,
        #[arg(long)]
        age: i64,
        #[arg(long)]
        title: String,
    },
    /// Delete an employee by id
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = Url::parse(&cli.url)?;
    let endpoint = |segments: &[&str]| -> Result<Url, Box<dyn std::error::Error>> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| format!("'{}' cannot be used as a base URL", cli.url))?
            .pop_if_empty()
            .push("employees")
            .extend(segments);
        Ok(url)
    };

    let request = match cli.command {
        Commands::List => client.get(endpoint(&[])?),
        Commands::Get { id } => client.get(endpoint(&[id.as_str()])?),
        Commands::Search { fragment } => client.get(endpoint(&["search", fragment.as_str()])?),
        Commands::HighestSalary => client.get(endpoint(&["highestSalary"])?),
        Commands::TopEarners => client.get(endpoint(&["topTenHighestEarningEmployeeNames"])?),
        Commands::Create {
            name,
            salary,
            age,
            title,
        } => client
            .post(endpoint(&[])?)
            .json(&json!({ "name": name, "salary": salary, "age": age, "title": title })),
        Commands::Delete { id } => client.delete(endpoint(&[id.as_str()])?),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: facade returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
