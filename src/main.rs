use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = ses::cli::Cli::parse();

    if let Err(err) = ses::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
