//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use dripcu::config::{Config, Locale};
use dripcu::display::{self, log_info};
use dripcu::input::{self, GridLayout, MeasurementSet};
use dripcu::report::{self, Report};
use dripcu::session::{Computation, Session};

/// Drip-irrigation uniformity coefficient (CU) calculator
#[derive(Parser, Debug)]
#[command(name = "dripcu")]
#[command(
    version,
    about = "Compute the uniformity coefficient (CU) of a drip-irrigation system from emitter flow rates",
    after_help = "\
Examples:
  dripcu calc 3.5 3.6 3.8 3.2 4.0 2.0 3.9 3.7      Values on the command line
  dripcu calc --file caudales.txt --chart          Values from a file, with a bar chart
  dripcu calc --report informe.txt < caudales.txt  Values from stdin, export a report
  dripcu grid --emitters 12 --columns 4            Prompt for one value per emitter
  dripcu shell                                     Interactive session"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ./dripcu.toml when present)
    #[arg(long, global = true, env = "DRIPCU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Language for labels and reports
    #[arg(long, global = true, value_parser = ["es", "en"])]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Show a bar chart of the measurements
    #[arg(long)]
    pub chart: bool,

    /// Show the measurements as a table
    #[arg(long)]
    pub table: bool,

    /// Export a report; '-' prints it, no value uses the default file name
    #[arg(long, short = 'r')]
    pub report: Option<Option<PathBuf>>,

    /// Report format: text, markdown, json
    #[arg(long, short = 'f', value_parser = ["text", "txt", "markdown", "md", "json"])]
    pub format: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute CU from values separated by commas, spaces or newlines
    Calc {
        /// Flow rates in ml (read from --file or stdin when omitted)
        values: Vec<String>,

        /// Read flow rates from a file
        #[arg(long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Enter one flow rate per emitter on a numbered grid
    Grid {
        /// Number of emitters
        #[arg(long, short = 'n')]
        emitters: Option<usize>,

        /// Fields per grid row
        #[arg(long)]
        columns: Option<usize>,

        /// Numbering direction: rows or columns
        #[arg(long, value_parser = ["rows", "columns"])]
        order: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Interactive session: each line of values recomputes CU
    Shell,
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(locale) = &cli.locale {
        config.locale = locale.parse()?;
    }

    match cli.command {
        Commands::Calc {
            values,
            file,
            output,
        } => run_calc(values, file, output, config),
        Commands::Grid {
            emitters,
            columns,
            order,
            output,
        } => {
            if let Some(emitters) = emitters {
                config.grid.emitters = emitters;
            }
            if let Some(columns) = columns {
                config.grid.columns = columns;
            }
            if let Some(order) = order {
                config.grid.order = order.parse()?;
            }
            config.validate()?;
            run_grid(output, config)
        }
        Commands::Shell => run_shell(config),
    }
}

fn apply_output_args(config: &mut Config, output: &OutputArgs) -> Result<()> {
    config.display.chart |= output.chart;
    config.display.table |= output.table;
    if let Some(format) = &output.format {
        config.report.format = format.parse()?;
    }
    Ok(())
}

fn run_calc(
    values: Vec<String>,
    file: Option<PathBuf>,
    output: OutputArgs,
    mut config: Config,
) -> Result<()> {
    apply_output_args(&mut config, &output)?;

    let text = if !values.is_empty() {
        values.join(" ")
    } else if let Some(path) = &file {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read measurements from {}", path.display()))?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read measurements from stdin")?;
        buf
    };

    let set = input::parse_free_text(&text)?;
    compute_and_present(set, &output, &config)
}

fn run_grid(output: OutputArgs, mut config: Config) -> Result<()> {
    apply_output_args(&mut config, &output)?;

    let grid = GridLayout::new(
        config.grid.emitters,
        config.grid.columns,
        config.grid.order,
        config.locale,
    );
    let stdin = io::stdin();
    let set = grid.collect(&mut stdin.lock(), &mut io::stdout())?;
    compute_and_present(set, &output, &config)
}

fn compute_and_present(set: MeasurementSet, output: &OutputArgs, config: &Config) -> Result<()> {
    if set.is_empty() {
        println!("{}", no_data_message(config.locale).blue());
        return Ok(());
    }

    let mut session = Session::new();
    let computation = session.recompute(set)?;
    present(computation, config);

    if let Some(target) = &output.report {
        export_report(computation, target.as_deref(), config)?;
    }
    Ok(())
}

fn present(computation: &Computation, config: &Config) {
    display::print_metrics(&computation.result, config.locale);
    if config.display.table {
        println!();
        print_table(computation, config);
    }
    if config.display.chart {
        println!();
        print_chart(computation, config);
    }
}

fn print_table(computation: &Computation, config: &Config) {
    print!("{}", display::table(&computation.measurements, config.locale));
}

fn print_chart(computation: &Computation, config: &Config) {
    let threshold = display::low_quartile_threshold(&computation.measurements, &computation.result);
    print!(
        "{}",
        display::bar_chart(
            &computation.measurements,
            threshold,
            config.display.chart_width
        )
    );
}

fn export_report(computation: &Computation, target: Option<&Path>, config: &Config) -> Result<()> {
    let report = Report::new(&computation.result, &computation.measurements, config.locale)
        .with_group_size(config.report.group_size);
    let format = config.report.format;

    match target {
        Some(path) if path == Path::new("-") => {
            print!("{}", report.render(format)?);
        }
        Some(path) => {
            report.export(path, format)?;
            log_info("Report", &path.display().to_string());
        }
        None => {
            let path = PathBuf::from(report::default_file_name(config.locale, format));
            report.export(&path, format)?;
            log_info("Report", &path.display().to_string());
        }
    }
    Ok(())
}

fn no_data_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "Introduce los caudales para calcular el CU.",
        Locale::En => "Enter the flow rates to compute the CU.",
    }
}

fn shell_help(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "\
Escribe caudales (ml) separados por comas, espacios o saltos de línea.
Comandos: chart, table, report [RUTA], clear, help, quit",
        Locale::En => "\
Type flow rates (ml) separated by commas, spaces or newlines.
Commands: chart, table, report [PATH], clear, help, quit",
    }
}

fn run_shell(config: Config) -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock();
    let mut line = String::new();

    println!("{}", shell_help(config.locale).dimmed());
    loop {
        print!("{} ", ">".green().bold());
        io::stdout().flush()?;

        line.clear();
        if lines.read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let trimmed = line.trim();
        let (command, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, Some(arg.trim())),
            None => (trimmed, None),
        };

        match command {
            "" => {}
            "quit" | "exit" | "salir" => break,
            "help" | "?" | "ayuda" => println!("{}", shell_help(config.locale)),
            "clear" => session.clear(),
            "chart" | "table" | "report" => {
                let Some(computation) = session.last() else {
                    println!("{}", no_data_message(config.locale).blue());
                    continue;
                };
                match command {
                    "chart" => print_chart(computation, &config),
                    "table" => print_table(computation, &config),
                    _ => {
                        let target = arg.filter(|a| !a.is_empty()).map(PathBuf::from);
                        if let Err(err) = export_report(computation, target.as_deref(), &config)
                        {
                            eprintln!("{} {:#}", "error:".red().bold(), err);
                        }
                    }
                }
            }
            _ => {
                let set = match input::parse_free_text(trimmed) {
                    Ok(set) => set,
                    Err(err) => {
                        eprintln!("{} {}", "error:".red().bold(), err);
                        continue;
                    }
                };
                match session.recompute(set) {
                    Ok(computation) => present(computation, &config),
                    Err(err) => eprintln!("{} {}", "error:".red().bold(), err),
                }
            }
        }
    }

    Ok(())
}
