use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

// cli.rs only needs clap, so it is compiled into the build script as-is.
#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out: PathBuf = std::env::var_os("OUT_DIR")
        .expect("cargo sets OUT_DIR for build scripts")
        .into();
    let mut cmd = cli::Cli::command();

    let man = out.join("man");
    fs::create_dir_all(&man).expect("create man dir");
    write_man(&cmd, "unet", &man);

    let completions = out.join("completions");
    fs::create_dir_all(&completions).expect("create completions dir");
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        clap_complete::generate_to(shell, &mut cmd, "unet", &completions)
            .unwrap_or_else(|e| panic!("{shell} completions: {e}"));
    }
}

/// One page per visible command, named `unet-events-export.1` and so on.
fn write_man(cmd: &clap::Command, name: &str, dir: &Path) {
    let page = cmd.clone().name(name.to_owned());
    let mut buf = Vec::new();
    clap_mangen::Man::new(page)
        .render(&mut buf)
        .unwrap_or_else(|e| panic!("render {name}.1: {e}"));
    fs::write(dir.join(format!("{name}.1")), buf).unwrap_or_else(|e| panic!("write {name}.1: {e}"));

    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        write_man(sub, &format!("{name}-{}", sub.get_name()), dir);
    }
}
