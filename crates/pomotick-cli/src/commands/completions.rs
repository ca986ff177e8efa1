//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::Shell;

/// Generate and print a shell completion script to stdout.
pub fn run<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    clap_complete::generate(shell, &mut cmd, "pomotick", &mut std::io::stdout());
}
