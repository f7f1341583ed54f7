use binq_cli::commands::{inspect, pack, unpack, verify};
use binq_cli::config::CodecConfig;
use binq_cli::telemetry;
use binq_kernel::types::DType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "binq")]
#[command(about = "One-bit tensor packing: pack, unpack and check packed containers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CodecArgs {
    /// Bits used per storage word (1, 2, 4, 8, 16 or 32)
    #[arg(long, default_value_t = CodecConfig::default().word_bits)]
    word_bits: usize,

    /// Float values below this pack to bit 1
    #[arg(long, default_value_t = CodecConfig::default().float_threshold, allow_negative_numbers = true)]
    threshold: f32,
}

impl From<CodecArgs> for CodecConfig {
    fn from(args: CodecArgs) -> Self {
        CodecConfig {
            word_bits: args.word_bits,
            float_threshold: args.threshold,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a dense JSON tensor into a container
    Pack {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Reconstruct a dense JSON tensor from a container
    Unpack {
        input: PathBuf,
        output: PathBuf,

        /// Target dtype (float32, int8, bool); defaults to the packed source dtype
        #[arg(long, value_parser = parse_dtype)]
        dtype: Option<DType>,

        /// int8 target scale
        #[arg(long)]
        scale: Option<f32>,

        /// int8 target zero point
        #[arg(long, allow_negative_numbers = true)]
        zero_point: Option<i32>,
    },
    /// Show container headers
    Inspect {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Verify the payload checksum of a container
    Verify { path: PathBuf },
}

fn parse_dtype(s: &str) -> Result<DType, String> {
    match s {
        "float32" | "f32" => Ok(DType::Float32),
        "int8" | "i8" => Ok(DType::Int8),
        "bool" => Ok(DType::Bool),
        other => Err(format!("unsupported dtype '{}'", other)),
    }
}

fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack { input, output, codec } => pack::run(&input, &output, codec.into()).map(|_| ()),
        Commands::Unpack {
            input,
            output,
            dtype,
            scale,
            zero_point,
        } => unpack::run(
            &input,
            &output,
            unpack::UnpackOptions {
                dtype,
                scale,
                zero_point,
            },
        )
        .map(|_| ()),
        Commands::Inspect { paths } => inspect::run(&paths),
        Commands::Verify { path } => verify::run(&path),
    }
}
