fn main() {
    lounge_cli::init_tracing();
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let code = lounge_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
