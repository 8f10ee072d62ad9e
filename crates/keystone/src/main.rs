use std::process;

#[tokio::main]
async fn main() {
    let args = std::env::args().collect::<Vec<String>>();
    if let Err(e) = keystone_cli::main(&args).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
