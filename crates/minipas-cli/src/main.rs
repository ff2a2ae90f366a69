fn main() {
    if let Err(e) = minipas_cli::run() {
        eprintln!("✖ {e:#}");
        std::process::exit(1);
    }
}
