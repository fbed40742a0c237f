use clap::Parser;
use logdigest::digest::{self, DigestOptions, DEFAULT_TOP_N};
use logdigest::reader::{self, RecordBatch};
use logdigest::report::{self, ColorMode};
use std::sync::Once;

fn init_parallelism() {
    static START: Once = Once::new();
    START.call_once(|| {
        let n = num_cpus::get();
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    });
}

#[derive(Parser, Debug)]
#[command(name = "logdigest", version, about = "Diagnostic summaries from collected service logs")]
struct Cli {
    /// Input files (`-` for stdin). May be repeated.
    #[arg(required = false)]
    input: Vec<String>,

    /// Rows to keep per section
    #[arg(long = "top", default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Output format: text | json
    #[arg(long = "format", default_value = "text")]
    format: String,

    /// Colour section headers: auto | always | never
    #[arg(long = "color", default_value = "auto")]
    color: String,
}

fn main() -> anyhow::Result<()> {
    init_parallelism();
    let cli = Cli::parse();

    let input_files = if cli.input.is_empty() {
        vec!["-".to_string()]
    } else {
        cli.input.clone()
    };

    let mut batch = RecordBatch::default();
    for path in &input_files {
        let source = reader::load_source(path)?;
        batch.extend(reader::read_records(&source));
    }

    let opts = DigestOptions { top_n: cli.top };
    let out = digest::digest(&batch, &opts);

    eprintln!(
        "[digest] records={} skipped={} events={} pairs={} unpaired={}",
        out.stats.records,
        out.stats.malformed_units,
        out.stats.correlation.events,
        out.stats.correlation.pairs,
        out.stats.correlation.unpaired_ids,
    );

    if cli.format == "json" {
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let color = match cli.color.as_str() {
        "always" => ColorMode::Ansi,
        "never" => ColorMode::Plain,
        _ => {
            if atty::is(atty::Stream::Stdout) {
                ColorMode::Ansi
            } else {
                ColorMode::Plain
            }
        }
    };
    print!("{}", report::render(&out, color));
    Ok(())
}
