fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match rush_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[rush] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = rush_core::runtime::run_with_options(options) {
        eprintln!("[rush] runtime failed: {error}");
        std::process::exit(1);
    }
}
