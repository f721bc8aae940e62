use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Print the completion script for `shell` to stdout
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    let stdout = io::stdout();
    write_script(shell, cmd, &mut stdout.lock())
}

/// Generate the completion script for every museo subcommand and global flag into `out`
pub fn write_script(shell: Shell, cmd: &mut Command, out: &mut dyn Write) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!(
        "Generating {} completion script for {} ({} subcommands)",
        shell,
        bin_name,
        cmd.get_subcommands().count()
    );

    generate(shell, cmd, bin_name, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn sample_command() -> Command {
        Command::new("museo")
            .arg(Arg::new("input").long("input").global(true))
            .subcommand(Command::new("data").arg(Arg::new("snapshot").long("snapshot")))
            .subcommand(Command::new("report"))
    }

    #[test]
    fn test_script_names_subcommands_and_flags() {
        let mut out = Vec::new();
        write_script(Shell::Bash, &mut sample_command(), &mut out).unwrap();

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("_museo()"));
        assert!(script.contains("report"));
        assert!(script.contains("--snapshot"));
        assert!(script.contains("--input"));
    }
}
