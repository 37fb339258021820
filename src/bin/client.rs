use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "qr-ordering")]
#[command(about = "client cli used by restaurant staffs to interact with the server", version, long_about = None
)]
struct Cli {
    #[arg(long, global = true, default_value = "http://localhost:8080", help = "Server base url")]
    host: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// hotel related ops
    #[command(arg_required_else_help = true)]
    Hotel {
        #[command(subcommand)]
        command: HotelCmds,
    },
    /// menu related ops
    #[command(arg_required_else_help = true)]
    Menu(MenuArgs),
    /// table related ops
    #[command(arg_required_else_help = true)]
    Table(TableArgs),
    /// order related ops
    #[command(arg_required_else_help = true)]
    Order(OrderArgs),
    /// print live order events of a hotel until Ctrl-C
    #[command(arg_required_else_help = true)]
    Watch { slug: String },
}

#[derive(Debug, Args)]
struct MenuArgs {
    #[arg(help = "Hotel slug to operate")]
    slug: String,
    #[command(subcommand)]
    command: MenuCmds,
}

#[derive(Debug, Args)]
struct TableArgs {
    #[arg(help = "Hotel slug to operate")]
    slug: String,
    #[command(subcommand)]
    command: TableCmds,
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[arg(help = "Hotel slug to operate")]
    slug: String,
    #[command(subcommand)]
    command: OrderCmds,
}

#[derive(Debug, Subcommand)]
enum HotelCmds {
    List,
    #[command(arg_required_else_help = true)]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long, value_name = "URL")]
        review_url: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum MenuCmds {
    List,
    #[command(arg_required_else_help = true)]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Price in cents", value_parser = clap::value_parser!(u32))]
        price_cents: u32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Hide the item from customers")]
        unavailable: bool,
    },
    #[command(arg_required_else_help = true)]
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
enum TableCmds {
    List,
    #[command(arg_required_else_help = true)]
    Add {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
enum OrderCmds {
    List,
    #[command(arg_required_else_help = true)]
    Status {
        id: String,
        #[arg(value_parser = ["new", "accepted", "preparing", "ready", "served", "paid", "cancelled"])]
        status: String,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();
    let api = format!("{}/api", args.host.trim_end_matches('/'));
    let client = Client::new();

    match args.command {
        Commands::Hotel { command } => match command {
            HotelCmds::List => print_response(client.get(format!("{}/hotels", api)).send().await?).await?,
            HotelCmds::Create { name, slug, review_url } => {
                println!("creating hotel={}", slug);
                let res = client
                    .post(format!("{}/hotels", api))
                    .json(&json!({ "name": name, "slug": slug, "googleReviewUrl": review_url }))
                    .send()
                    .await?;
                print_response(res).await?;
            }
        },
        Commands::Menu(MenuArgs { slug, command }) => {
            let url = format!("{}/hotels/{}/menu", api, slug);
            let res = match command {
                MenuCmds::List => client.get(&url).send().await?,
                MenuCmds::Add { name, price_cents, category, description, unavailable } => {
                    client
                        .post(&url)
                        .json(&json!({
                            "name": name,
                            "priceCents": price_cents,
                            "category": category,
                            "description": description,
                            "available": !unavailable,
                        }))
                        .send()
                        .await?
                }
                MenuCmds::Remove { id } => client.delete(&url).query(&[("id", id)]).send().await?,
            };
            print_response(res).await?;
        }
        Commands::Table(TableArgs { slug, command }) => {
            let url = format!("{}/hotels/{}/tables", api, slug);
            let res = match command {
                TableCmds::List => client.get(&url).send().await?,
                TableCmds::Add { id, name } => client.post(&url).json(&json!({ "id": id, "name": name })).send().await?,
                TableCmds::Remove { id } => client.delete(&url).query(&[("id", id)]).send().await?,
            };
            print_response(res).await?;
        }
        Commands::Order(OrderArgs { slug, command }) => {
            let res = match command {
                OrderCmds::List => client.get(format!("{}/hotels/{}/orders", api, slug)).send().await?,
                OrderCmds::Status { id, status } => {
                    println!("moving order={} of hotel={} to {}", id, slug, status);
                    client
                        .patch(format!("{}/orders/{}", api, id))
                        .json(&json!({ "status": status }))
                        .send()
                        .await?
                }
            };
            print_response(res).await?;
        }
        Commands::Watch { slug } => watch(&client, &api, &slug).await?,
    };
    Ok(())
}

async fn print_response(res: Response) -> Result<(), anyhow::Error> {
    match res.status() {
        StatusCode::OK => {
            let body = res.json::<Value>().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        StatusCode::BAD_REQUEST => {
            let err = res.json::<ErrorResponse>().await?;
            println!("Bad request: {}", err.error);
        }
        StatusCode::NOT_FOUND => {
            let err = res.json::<ErrorResponse>().await?;
            println!("Resource not found: {}", err.error);
        }
        status if status.is_client_error() => {
            let err = res.json::<ErrorResponse>().await?;
            println!("Request failed ({}): {}", status, err.error);
        }
        unexpected => {
            println!("got unexpected status code, {}", unexpected);
        }
    }
    Ok(())
}

async fn watch(client: &Client, api: &str, slug: &str) -> Result<(), anyhow::Error> {
    let res = client.get(format!("{}/stream", api)).query(&[("hotel", slug)]).send().await?;
    if res.status() != StatusCode::OK {
        return print_response(res).await;
    }
    println!("watching orders of hotel={}, Ctrl-C to stop", slug);

    let mut frames = res.bytes_stream();
    let mut buf = String::new();
    loop {
        tokio::select! {
            chunk = frames.next() => {
                let Some(chunk) = chunk else {
                    println!("server closed the stream");
                    return Ok(());
                };
                buf.push_str(&String::from_utf8_lossy(&chunk?));
                while let Some(end) = buf.find("\n\n") {
                    let frame: String = buf.drain(..end + 2).collect();
                    print_frame(frame.trim_end());
                }
            },
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

fn print_frame(frame: &str) {
    for line in frame.lines() {
        if let Some(data) = line.strip_prefix("data: ") {
            match serde_json::from_str::<Value>(data) {
                Ok(event) => match (event["type"].as_str(), event["order"].as_object()) {
                    (Some(kind), Some(order)) => println!(
                        "{} order={} table={} status={}",
                        kind,
                        order.get("id").and_then(Value::as_str).unwrap_or("?"),
                        order.get("tableId").and_then(Value::as_str).unwrap_or("?"),
                        order.get("status").and_then(Value::as_str).unwrap_or("?"),
                    ),
                    _ => println!("{}", event),
                },
                Err(_) => println!("{}", data),
            }
        }
    }
}
