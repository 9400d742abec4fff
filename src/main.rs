//! Hybrid DRAM/Flash Memory Simulator CLI.
//!
//! Loads a configuration file, constructs the simulator, and drives the
//! interactive `p`/`c`/`r`/`h`/`q` menu over stdin/stdout until `q` or EOF.

use clap::Parser;
use std::process;

extern crate hybridmem_sim;

use hybridmem_sim::cli::{self, Args};
use hybridmem_sim::config::Config;
use hybridmem_sim::simulator::Simulator;

fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration from {}: {err:#}", args.config);
            process::exit(1);
        }
    };

    println!("Hybrid Memory Simulator");
    println!("------------------------");
    println!("config:          {}", args.config);
    println!("dram_banks:      {}", config.dram_banks);
    println!("dram_rows:       {}", config.dram_rows);
    println!("dram_columns:    {}", config.dram_columns);
    println!("enable_flash:    {}", config.enable_flash);
    if config.enable_flash {
        println!("flash_capacity:  {} bytes", config.flash_capacity);
        println!("flash_page_size: {} bytes", config.flash_page_size);
    }
    println!("------------------------");

    let mut simulator = Simulator::new(config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(err) = cli::run_interactive(&mut simulator, stdin.lock(), stdout.lock()) {
        eprintln!("I/O error driving interactive session: {err}");
        process::exit(1);
    }
}
