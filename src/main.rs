fn main() {
    if let Err(err) = reco_content_lib::run() {
        eprintln!("reco-content: {err:#}");
        std::process::exit(1);
    }
}
