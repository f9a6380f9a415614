use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use effect_stitcher::{
    dsl,
    stitch::{Dialect, StitchedShader},
};
use log::info;

#[derive(Debug, Default, Clone)]
struct Cli {
    chain_json: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dialect: Option<Dialect>,
}

fn parse_dialect(v: &str) -> Result<Dialect> {
    match v {
        "gl" => Ok(Dialect::Gl),
        "metal" => Ok(Dialect::Metal),
        other => Err(anyhow!("unknown dialect: {other} (supported: gl, metal)")),
    }
}

fn parse_cli(args: &[String]) -> Result<Cli> {
    let mut cli = Cli::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--chain" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --chain"));
                };
                cli.chain_json = Some(PathBuf::from(v));
                i += 2;
            }
            "--outputdir" | "--output-dir" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --output-dir"));
                };
                cli.output_dir = Some(PathBuf::from(v));
                i += 2;
            }
            "--dialect" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --dialect"));
                };
                cli.dialect = Some(parse_dialect(v)?);
                i += 2;
            }
            other => {
                return Err(anyhow!(
                    "unknown argument: {other} (supported: --chain <chain.json>, --output-dir <dir>, --dialect gl|metal)"
                ));
            }
        }
    }
    Ok(cli)
}

fn pass_manifest(index: usize, shader: &StitchedShader) -> serde_json::Value {
    let structs: Vec<&str> = shader.structs.iter().map(|s| s.name.as_str()).collect();
    serde_json::json!({
        "pass": index,
        "vertexBindings": shader.vertex_bindings,
        "fragmentBindings": shader.fragment_bindings,
        "structs": structs,
        "parameters": shader.parameters,
    })
}

fn write_passes(name: &str, output_dir: &Path, shaders: &[StitchedShader]) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let mut manifest = Vec::with_capacity(shaders.len());
    for (i, shader) in shaders.iter().enumerate() {
        let ext = shader.dialect.file_extension();
        for (stage, source) in [("vertex", &shader.vertex), ("fragment", &shader.fragment)] {
            let path = output_dir.join(format!("{name}.pass{i}.{stage}.{ext}"));
            std::fs::write(&path, source)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("[stitch] wrote {}", path.display());
        }
        manifest.push(pass_manifest(i, shader));
    }

    let path = output_dir.join(format!("{name}.bindings.json"));
    let text = serde_json::to_string_pretty(&manifest).context("failed to encode bindings")?;
    std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    info!("[stitch] wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli(&argv)?;
    let chain_path = cli
        .chain_json
        .ok_or_else(|| anyhow!("--chain <chain.json> is required"))?;

    let mut chain = dsl::load_chain_from_path(&chain_path)?;
    if let Some(dialect) = cli.dialect {
        chain.dialect = dialect;
    }
    let output_dir = cli.output_dir.unwrap_or_else(|| {
        chain_path
            .parent()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let shaders = dsl::build_stack(&chain)
        .build(chain.dialect)
        .with_context(|| format!("failed to stitch chain {}", chain_path.display()))?;
    info!(
        "[stitch] {} -> {} pass(es), dialect={}",
        chain.name(),
        shaders.len(),
        chain.dialect
    );

    write_passes(chain.name(), &output_dir, &shaders)
}
