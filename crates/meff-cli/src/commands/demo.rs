use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use meff_core::{synthetic_configuration, SyntheticSpec};
use meff_ingest::format_configuration;
use serde::Serialize;
use zip::write::FileOptions;
use zip::ZipWriter;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Output directory for the generated ensemble.
    #[arg(long)]
    pub out: PathBuf,
    /// Time extent T.
    #[arg(long, default_value_t = 64)]
    pub time_slices: usize,
    /// Number of configurations.
    #[arg(long, default_value_t = 32)]
    pub configurations: usize,
    /// Ground-state energy of the synthetic correlator.
    #[arg(long, default_value_t = 0.125)]
    pub mass: f64,
    /// Relative noise level.
    #[arg(long, default_value_t = 0.02)]
    pub noise: f64,
    /// Master seed.
    #[arg(long, default_value_t = 2024)]
    pub seed: u64,
    /// Column the value is written to.
    #[arg(long, default_value_t = 4)]
    pub column: usize,
    /// Pack the files into `ensemble.zip` instead of a directory.
    #[arg(long)]
    pub zip: bool,
}

#[derive(Debug, Serialize)]
struct DemoManifest<'a> {
    spec: &'a SyntheticSpec,
    seed: u64,
    column: usize,
    files: Vec<String>,
}

pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    let spec = SyntheticSpec {
        time_slices: args.time_slices,
        configurations: args.configurations,
        mass: args.mass,
        noise: args.noise,
        ..SyntheticSpec::default()
    };
    spec.validate()?;

    fs::create_dir_all(&args.out)?;
    let files: Vec<(String, String)> = (0..spec.configurations)
        .map(|index| {
            let values = synthetic_configuration(&spec, args.seed, index);
            (
                format!("ensemble/cfg_{index:04}.dat"),
                format_configuration(&values, args.column),
            )
        })
        .collect();

    let target = if args.zip {
        let path = args.out.join("ensemble.zip");
        let mut writer = ZipWriter::new(File::create(&path)?);
        for (name, contents) in &files {
            writer.start_file(name.as_str(), FileOptions::default())?;
            writer.write_all(contents.as_bytes())?;
        }
        writer.finish()?;
        path
    } else {
        for (name, contents) in &files {
            let path = args.out.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)?;
        }
        args.out.join("ensemble")
    };

    let manifest = DemoManifest {
        spec: &spec,
        seed: args.seed,
        column: args.column,
        files: files.into_iter().map(|(name, _)| name).collect(),
    };
    fs::write(args.out.join("demo.yaml"), serde_yaml::to_string(&manifest)?)?;
    log::info!(
        "wrote {} synthetic configurations (m = {})",
        spec.configurations,
        spec.mass
    );
    println!("{}", target.display());
    Ok(())
}
