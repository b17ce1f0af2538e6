use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = tui_scrolly::config::Config::parse();
    tui_scrolly::app::run(cfg)
}
