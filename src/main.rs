fn main() {
    if let Err(err) = row_decoder::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
