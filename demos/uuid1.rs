//! Simple command that prints one or '-n count' UUIDv1 strings
//!
//! Pass '-c' to use the cryptographic generator and '-i id' to fix the 30-bit instance id.

use std::{env, io, io::Write, process::ExitCode};

use uuid1::V1Generator;

#[derive(Debug, Default, PartialEq)]
struct Options {
    count: Option<usize>,
    crypto: bool,
    instance_id: Option<u32>,
}

fn main() -> io::Result<ExitCode> {
    let mut args = env::args();
    let program = args.next();
    let opts = match parse_args(args) {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!(
                "Usage: {} [-n count] [-c] [-i instance_id]",
                program.as_deref().unwrap_or("uuid1")
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let g = match V1Generator::new() {
        Ok(g) => g,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };
    if let Some(instance_id) = opts.instance_id {
        if let Err(err) = g.set_instance_id(instance_id) {
            eprintln!("Warning: {}", err);
        }
    }

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count.unwrap_or(1) {
        let uuid = if opts.crypto {
            g.generate_crypto()
        } else {
            g.generate()
        };
        writeln!(buf, "{}", uuid)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" => opts.crypto = true,
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
            "-i" => {
                if opts.instance_id.is_some() {
                    return Err("option 'i' given more than once".to_owned());
                }
                let Some(i_arg) = args.next() else {
                    return Err("argument to option 'i' missing".to_owned());
                };
                let Ok(id) = i_arg.parse() else {
                    return Err(format!("invalid argument to option 'i': '{}'", i_arg));
                };
                opts.instance_id.replace(id);
            }
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }
    Ok(opts)
}
