//! Command-line arguments and the interactive menu.
//!
//! Parses the config path argument, then drives a `p`/`c`/`r`/`h`/`q` menu
//! loop: print statistics, clear simulator state, run a trace (prompting for
//! a file path and falling back to the synthetic generator on an empty
//! line), show help, or quit.

use crate::counters::Counters;
use crate::simulator::Simulator;
use crate::trace::{FileTraceSource, SyntheticTraceSource};

use clap::Parser;
use log::{error, info};
use std::io::{self, BufRead, Write};

const DEFAULT_CONFIG_PATH: &str = "config/default.cfg";

/// Command-line arguments for the hybrid memory simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Hybrid DRAM/Flash Memory Simulator")]
pub struct Args {
    /// Path to the simulator configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

/// Renders a human-readable statistics snapshot.
pub fn report(counters: &Counters) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==========================================================");
    out.push_str("HYBRID MEMORY SIMULATION STATISTICS\n");
    let _ = writeln!(out, "==========================================================");
    let _ = writeln!(out, "total_accesses           {}", counters.total_accesses);
    let _ = writeln!(out, "avg_latency               {:.4} cycles", counters.average_latency());
    let _ = writeln!(out, "refresh_cycles            {}", counters.refresh_cycles);
    let _ = writeln!(out, "----------------------------------------------------------");
    out.push_str("DRAM ROW BUFFER\n");
    let _ = writeln!(out, "  row_hits                {}", counters.row_hits);
    let _ = writeln!(out, "  row_misses              {}", counters.row_misses);
    let _ = writeln!(out, "  row_hit_ratio           {:.2}%", counters.row_hit_ratio() * 100.0);
    let _ = writeln!(out, "  access_latency          {}", counters.dram_access_latency);
    let _ = writeln!(out, "----------------------------------------------------------");
    out.push_str("FLASH TIER\n");
    let _ = writeln!(out, "  flash_reads             {}", counters.flash_reads);
    let _ = writeln!(out, "  flash_writes            {}", counters.flash_writes);
    let _ = writeln!(out, "  access_latency          {}", counters.flash_access_latency);
    let _ = writeln!(out, "----------------------------------------------------------");
    out.push_str("DRAM CACHE (HYBRID MODE)\n");
    let _ = writeln!(out, "  cache_hits              {}", counters.dram_cache_hits);
    let _ = writeln!(out, "  cache_misses            {}", counters.dram_cache_misses);
    let _ = writeln!(out, "  promotions              {}", counters.cache_promotions);
    let _ = writeln!(out, "  evictions               {}", counters.cache_evictions);
    let _ = writeln!(out, "  overhead                {}", counters.cache_overhead);
    let _ = writeln!(out, "----------------------------------------------------------");
    out.push_str("EVENTS\n");
    let _ = writeln!(out, "  out_of_bounds           {}", counters.out_of_bounds_events);
    let _ = writeln!(out, "  malformed_lines         {}", counters.malformed_line_events);
    let _ = writeln!(out, "  unknown_ops             {}", counters.unknown_op_events);
    let _ = writeln!(out, "==========================================================");
    out
}

fn print_help<W: Write>(mut out: W) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  p   print current statistics")?;
    writeln!(out, "  c   clear simulator state")?;
    writeln!(out, "  r   run a trace (prompts for a file path; blank generates a synthetic trace)")?;
    writeln!(out, "  h   show this help")?;
    writeln!(out, "  q   quit")
}

/// Drives the `p`/`c`/`r`/`h`/`q` menu over `input`/`output` until `q` or EOF.
///
/// Generic over `BufRead`/`Write` so the menu loop can be exercised in tests
/// without touching real stdin/stdout.
pub fn run_interactive<R: BufRead, W: Write>(sim: &mut Simulator, mut input: R, mut output: W) -> io::Result<()> {
    loop {
        write!(output, "\n> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "p" => write!(output, "{}", report(sim.counters()))?,
            "c" => {
                sim.clear();
                writeln!(output, "state cleared")?;
            }
            "r" => run_trace_command(sim, &mut input, &mut output)?,
            "h" => print_help(&mut output)?,
            "q" => break,
            other if other.is_empty() => {}
            other => writeln!(output, "unknown command: {other} (press h for help)")?,
        }
    }
    Ok(())
}

fn run_trace_command<R: BufRead, W: Write>(sim: &mut Simulator, input: &mut R, mut output: W) -> io::Result<()> {
    write!(output, "trace file path (blank for a generated trace): ")?;
    output.flush()?;

    let mut path_line = String::new();
    input.read_line(&mut path_line)?;
    let path = path_line.trim();

    if path.is_empty() {
        let trace_lines = sim.config().trace_lines;
        writeln!(output, "generating a synthetic trace of {trace_lines} accesses")?;
        let seed = rand::random::<u64>();
        let source = SyntheticTraceSource::new(seed, trace_lines);
        let consumed = sim.run_trace(source);
        writeln!(output, "synthetic trace complete: {consumed} accesses")?;
        return Ok(());
    }

    match FileTraceSource::open(path) {
        Ok(source) => {
            let consumed = sim.run_trace(source);
            info!("processed trace file {path}: {consumed} lines");
            writeln!(output, "trace file complete: {consumed} lines")?;
        }
        Err(err) => {
            error!("failed to open trace file {path}: {err:#}");
            writeln!(output, "could not open trace file: {err}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn report_contains_expected_sections() {
        let text = report(&Counters::new());
        assert!(text.contains("HYBRID MEMORY SIMULATION STATISTICS"));
        assert!(text.contains("DRAM ROW BUFFER"));
        assert!(text.contains("FLASH TIER"));
    }

    #[test]
    fn quit_command_ends_loop_immediately() {
        let mut sim = Simulator::new(Config::default());
        let input = io::Cursor::new(b"q\n".to_vec());
        let mut output = Vec::new();
        run_interactive(&mut sim, input, &mut output).unwrap();
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains('>'));
    }

    #[test]
    fn clear_command_resets_counters() {
        let mut sim = Simulator::new(Config::default());
        sim.process_access(Some(crate::common::Operation::Read), 0x10);
        let input = io::Cursor::new(b"c\nq\n".to_vec());
        let mut output = Vec::new();
        run_interactive(&mut sim, input, &mut output).unwrap();
        assert_eq!(sim.counters().total_accesses, 0);
    }

    #[test]
    fn unknown_command_reports_itself() {
        let mut sim = Simulator::new(Config::default());
        let input = io::Cursor::new(b"z\nq\n".to_vec());
        let mut output = Vec::new();
        run_interactive(&mut sim, input, &mut output).unwrap();
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("unknown command: z"));
    }

    #[test]
    fn eof_ends_loop_without_q() {
        let mut sim = Simulator::new(Config::default());
        let input = io::Cursor::new(Vec::new());
        let mut output = Vec::new();
        run_interactive(&mut sim, input, &mut output).unwrap();
    }
}
