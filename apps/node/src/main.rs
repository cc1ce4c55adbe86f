use anyhow::Context;
use clap::Parser;
use ggnet_kernel::config::{NodeConfig, load_config};
use ggnet_logger::{Logger, parse_level};
use ggnet_node::Node;
use ggnet_node::cli::Cli;
use ggnet_node::commands::{execute, execute_offline};
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg: NodeConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    cli.apply_overrides(&mut cfg);

    let _logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(parse_level(&cfg.logging.level)?)
        .directory(cfg.logging.directory.clone())
        .json(cfg.logging.json)
        .init()?;

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    if cli.command.needs_store() {
        let node = Node::builder().config(cfg).build()?;
        execute(&node, cli.command, &mut stdin, &mut stdout)
    } else {
        execute_offline(cli.command, &mut stdin, &mut stdout)
    }
}
