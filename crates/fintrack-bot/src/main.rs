use colored::Colorize;

#[tokio::main]
async fn main() {
    if let Err(e) = fintrack_bot::run(std::env::args().collect()).await {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
