use clap::CommandFactory;
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Import the CLI definition from the library
include!("src/cli.rs");

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Cli::command();

    // Generate Unix shells only on Unix platforms
    #[cfg(unix)]
    {
        generate_to(Bash, &mut cmd, "imgconv", &outdir)?;
        generate_to(Fish, &mut cmd, "imgconv", &outdir)?;
        generate_to(Zsh, &mut cmd, "imgconv", &outdir)?;
    }

    // PowerShell works on all platforms
    generate_to(PowerShell, &mut cmd, "imgconv", &outdir)?;

    Ok(())
}
