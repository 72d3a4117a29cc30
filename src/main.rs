use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use rvstep::riscv::decoder::{parse_imm, parse_reg};
use rvstep::riscv::interpreter::strip_comment;
use rvstep::riscv::memory::DEFAULT_BUCKETS;
use rvstep::riscv::registers::REGISTER_COUNT;
use rvstep::{Instruction, Interpreter, IsaConfig, Registers};
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Parser, Debug)]
#[command(name = "rvstep")]
#[command(about = "Runs RV32I instructions one line at a time", long_about = None)]
struct Args {
    /// Instruction listing; reads stdin line by line when omitted
    file: Option<PathBuf>,

    /// Hash buckets in the sparse memory
    #[arg(long, default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,

    /// Accept `nor` and `sla`
    #[arg(long, action = ArgAction::SetTrue)]
    extended: bool,

    /// Initial register value, e.g. `--set x1=100` (repeatable)
    #[arg(long = "set", value_name = "REG=VALUE", value_parser = parse_assignment)]
    set: Vec<(u8, i32)>,

    /// Print every executed instruction
    #[arg(long, action = ArgAction::SetTrue)]
    trace: bool,

    /// Print written memory cells at exit
    #[arg(long, action = ArgAction::SetTrue)]
    dump_memory: bool,
}

fn parse_assignment(s: &str) -> Result<(u8, i32), String> {
    let (reg, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected REG=VALUE, got `{s}`"))?;
    let reg = parse_reg(reg).map_err(|e| e.to_string())?;
    let value = parse_imm(value).map_err(|e| e.to_string())?;
    Ok((reg, value))
}

fn setup_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let _ = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let mut regs = Registers::new();
    for &(r, v) in &args.set {
        regs.write(r, v);
    }
    let config = IsaConfig { bucket_count: args.buckets, extended: args.extended };
    let mut interp = Interpreter::new(regs, config)?;

    let outcome = match &args.file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            interp
                .run_script_with(&text, |line, inst, regs| {
                    if args.trace {
                        print_trace(line, inst, regs);
                    }
                })
                .map(|_| ())
                .with_context(|| format!("in {}", path.display()))
        }
        None => run_stdin(&mut interp, args.trace),
    };

    dump_registers(interp.registers());
    if args.dump_memory {
        dump_memory(&interp);
    }
    outcome
}

fn run_stdin(interp: &mut Interpreter, trace: bool) -> Result<()> {
    for (line, src) in io::stdin().lock().lines().enumerate() {
        let src = src.context("reading stdin")?;
        let src = strip_comment(&src);
        if src.is_empty() {
            continue;
        }
        match interp.step(src) {
            Ok(inst) if trace => print_trace(line, inst, interp.registers()),
            Ok(_) => {}
            Err(e) => bail!("line {}: {e}", line + 1),
        }
    }
    Ok(())
}

fn print_trace(line: usize, inst: Option<Instruction>, regs: &Registers) {
    match inst {
        Some(inst) => match inst.dest() {
            Some(rd) if rd != 0 => {
                let v = regs.read(rd);
                let text = inst.to_string();
                println!("{:>4}: {text:<24} x{rd} = 0x{:08x} ({v})", line + 1, v as u32);
            }
            _ => println!("{:>4}: {inst}", line + 1),
        },
        None => println!("{:>4}: (skipped)", line + 1),
    }
}

fn dump_registers(regs: &Registers) {
    const PER_ROW: usize = 4;
    const PER_COLUMN: usize = REGISTER_COUNT / PER_ROW;

    for i in 0..REGISTER_COUNT {
        if i % PER_ROW == 0 {
            if i > 0 {
                println!();
            }
        } else {
            print!("  |  ");
        }
        let r = (i % PER_ROW) * PER_COLUMN + i / PER_ROW;
        print!("x{r:<2}  0x{:08x}", regs.x[r] as u32);
    }
    println!();
}

fn dump_memory(interp: &Interpreter) {
    println!("memory ({} cells):", interp.memory_len());
    for (addr, value) in interp.memory().cells() {
        println!("[0x{:08x}] 0x{:02x}", addr as u32, value);
    }
}
