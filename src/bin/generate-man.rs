// Render the move-gtasks man page to stdout

use std::io;

fn main() -> io::Result<()> {
    let man = clap_mangen::Man::new(move_gtasks::cli::command());
    man.render(&mut io::stdout())
}
