//! Binary entrypoint for fontpath-cli (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = fontpath_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
