fn main() {
    if let Err(err) = layer_grid::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
