//! Simple command that prints one or '-n count' COMB strings in '-f format', or reformats the
//! COMBs given as arguments

use std::{env, io, io::Write, process::ExitCode};

use combid::{Comb, Format};

#[derive(Debug, Default)]
struct Options {
    count: Option<usize>,
    format: Option<Format>,
    inputs: Vec<String>,
}

fn main() -> io::Result<ExitCode> {
    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count] [-f N|D|B|P|X] [comb ...]",
                    program.as_deref().unwrap_or("comb")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };
    let format = opts.format.unwrap_or_default();

    let mut buf = io::BufWriter::new(io::stdout());
    if opts.inputs.is_empty() {
        for _ in 0..opts.count.unwrap_or(1) {
            writeln!(buf, "{}", combid::comb().format(format))?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut status = ExitCode::SUCCESS;
    for input in &opts.inputs {
        match Comb::parse(input) {
            Ok(e) => writeln!(buf, "{}\t{}", e.format(format), e.timestamp())?,
            Err(err) => {
                buf.flush()?;
                eprintln!("Error: '{}': {}", input, err);
                status = ExitCode::FAILURE;
            }
        }
    }
    Ok(status)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-n" => {
                if opts.count.is_some() {
                    return Err("option 'n' given more than once".to_owned());
                }
                let Some(n_arg) = args.next() else {
                    return Err("argument to option 'n' missing".to_owned());
                };
                let Ok(c) = n_arg.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", n_arg));
                };
                opts.count.replace(c);
            }
            "-f" => {
                if opts.format.is_some() {
                    return Err("option 'f' given more than once".to_owned());
                }
                let Some(f_arg) = args.next() else {
                    return Err("argument to option 'f' missing".to_owned());
                };
                let Ok(f) = f_arg.parse() else {
                    return Err(format!("invalid argument to option 'f': '{}'", f_arg));
                };
                opts.format.replace(f);
            }
            _ if arg.starts_with('-') && arg.len() == 2 => {
                return Err(format!("unrecognized argument '{}'", arg));
            }
            _ => opts.inputs.push(arg),
        }
    }
    if opts.count.is_some() && !opts.inputs.is_empty() {
        return Err("option 'n' cannot be combined with input COMBs".to_owned());
    }
    Ok(opts)
}
