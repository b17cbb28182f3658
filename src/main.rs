fn main() {
    if let Err(err) = famtree_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
