fn main() {
    match incmap::run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{}", incmap::format_error(&err));
            std::process::exit(1);
        }
    }
}
