fn main() {
    if let Err(err) = agro_etl::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
