use move_gtasks::cli::run;
use move_gtasks::MoverError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        // Show error chain if available
        let mut source = e.source();
        if source.is_some() {
            eprintln!("\nCaused by:");
            let mut indent = 1;
            while let Some(err) = source {
                eprintln!("{:indent$}  {}", "", err);
                source = err.source();
                indent += 1;
            }
        }
        let code = e.downcast_ref::<MoverError>().map(MoverError::exit_code).unwrap_or(2);
        std::process::exit(code);
    }
}
